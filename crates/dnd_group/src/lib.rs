mod list;

pub use crate::list::*;
