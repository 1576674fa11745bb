mod collision;
mod config;
mod error;
mod index;
mod model;
mod mutate;
mod resolve;
mod session;
mod target;

pub use crate::collision::*;
pub use crate::config::*;
pub use crate::error::*;
pub use crate::index::*;
pub use crate::model::*;
pub use crate::mutate::*;
pub use crate::resolve::*;
pub use crate::session::*;
pub use crate::target::*;
