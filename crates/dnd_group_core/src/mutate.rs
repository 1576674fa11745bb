use tracing::{debug, warn};

use crate::error::{ReorderError, Result};
use crate::model::{Coordinate, Element, Tree};

/// Move the element at `source` to `destination`, returning a new tree.
///
/// Any rejected move returns `tree` unchanged. See [`try_move_element`] for the
/// coordinate rules.
pub fn move_element(source: Coordinate, destination: Coordinate, tree: &Tree) -> Tree {
    match try_move_element(source, destination, tree) {
        Ok(moved) => moved,
        Err(err) => {
            debug_assert!(!err.is_invariant_violation(), "{err}");
            warn!(%source, %destination, %err, "move rejected");
            tree.clone()
        }
    }
}

/// Move the element at `source` to `destination`.
///
/// `Root(k)` is the element's final root index; indexes past the end append.
/// `Interior { group, offset }` names the group by its root index *before* the
/// element is taken out, so it shifts down by one when a root element above
/// the group is removed. Taking a leaf out of a group shifts nothing. An offset
/// past the end of the group appends.
///
/// The input is never modified: the result is built from a copy, and on error
/// the copy is dropped.
pub fn try_move_element(source: Coordinate, destination: Coordinate, tree: &Tree) -> Result<Tree> {
    let mut elements = tree.elements().to_vec();

    let moved = take_at(&mut elements, source)
        .ok_or(ReorderError::SourceOutOfRange { coordinate: source })?;

    match destination {
        Coordinate::Root(dest) => {
            if dest > tree.len() {
                return Err(ReorderError::OutOfRangeInsertion { destination });
            }
            let ix = dest.min(elements.len());
            elements.insert(ix, moved);
        }
        Coordinate::Interior { group, offset } => {
            let leaf = match moved {
                Element::Leaf(leaf) => leaf,
                Element::Group(moved) => {
                    return Err(ReorderError::InvalidStructuralMove {
                        group: moved.id,
                        target: format!("group interior {destination}"),
                    });
                }
            };

            let in_range = tree
                .group_at(group)
                .is_some_and(|target| offset <= target.items.len())
                && source != Coordinate::Root(group);
            if !in_range {
                return Err(ReorderError::OutOfRangeInsertion { destination });
            }

            let group = match source {
                Coordinate::Root(removed) if removed < group => group - 1,
                _ => group,
            };
            let Some(Element::Group(target)) = elements.get_mut(group) else {
                return Err(ReorderError::OutOfRangeInsertion { destination });
            };
            let ix = offset.min(target.items.len());
            target.items.insert(ix, leaf);
        }
    }

    debug!(%source, %destination, "moved element");
    Ok(Tree::from_elements_unchecked(elements))
}

fn take_at(elements: &mut Vec<Element>, at: Coordinate) -> Option<Element> {
    match at {
        Coordinate::Root(ix) => (ix < elements.len()).then(|| elements.remove(ix)),
        Coordinate::Interior { group, offset } => {
            let Some(Element::Group(group)) = elements.get_mut(group) else {
                return None;
            };
            (offset < group.items.len()).then(|| Element::Leaf(group.items.remove(offset)))
        }
    }
}
