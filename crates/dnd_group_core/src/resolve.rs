use crate::error::{ReorderError, Result};
use crate::index::TreeIndex;
use crate::model::{Coordinate, Element, Tree};
use crate::target::{DropTarget, SlotEdge};

/// Where a dragged element is taken from and where it goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub source: Coordinate,
    pub destination: Coordinate,
}

/// Locate the dragged element.
pub fn resolve_source(tree: &Tree, index: &TreeIndex, active_id: &str) -> Result<Coordinate> {
    if let Some(root) = tree.root_index(active_id) {
        return Ok(Coordinate::Root(root));
    }

    index
        .group_of(active_id)
        .and_then(|group_id| {
            let group = tree.root_index(group_id)?;
            let offset = tree.group_at(group)?.position(active_id)?;
            Some(Coordinate::Interior { group, offset })
        })
        .ok_or_else(|| ReorderError::UnresolvedSource {
            id: active_id.into(),
        })
}

/// Turn a drop target into an insertion coordinate.
///
/// Hovering a leaf nested in a group targets the group's root position; only
/// the group's own slot puts an element inside it.
pub fn resolve_destination(
    tree: &Tree,
    index: &TreeIndex,
    target: &DropTarget,
) -> Result<Coordinate> {
    let resolved = match target {
        DropTarget::RootSlot(SlotEdge::Top) => Some(Coordinate::Root(0)),
        DropTarget::RootSlot(SlotEdge::Bottom) => Some(Coordinate::Root(tree.len())),
        DropTarget::GroupSlot(group_id) => tree.root_index(group_id).and_then(|group| {
            let offset = tree.group_at(group)?.items.len();
            Some(Coordinate::Interior { group, offset })
        }),
        DropTarget::Item(id) => tree.root_index(id).map(Coordinate::Root).or_else(|| {
            index
                .group_of(id)
                .and_then(|group_id| tree.root_index(group_id))
                .map(Coordinate::Root)
        }),
    };

    resolved.ok_or_else(|| ReorderError::UnresolvedTarget {
        target: target.clone(),
    })
}

/// Resolve both ends of a drag step.
///
/// A dragged group may land next to leaves or in a root slot, but never on
/// another group's row and never inside a group.
pub fn resolve_move(
    tree: &Tree,
    index: &TreeIndex,
    active_id: &str,
    target: &DropTarget,
) -> Result<Move> {
    let source = resolve_source(tree, index, active_id)?;
    let destination = resolve_destination(tree, index, target)?;

    if let Coordinate::Root(root) = source
        && let Some(Element::Group(group)) = tree.elements().get(root)
    {
        let onto_other_group = match destination {
            Coordinate::Interior { .. } => true,
            Coordinate::Root(dest) => {
                matches!(target, DropTarget::Item(id) if *id != *active_id)
                    && tree.group_at(dest).is_some()
            }
        };
        if onto_other_group {
            return Err(ReorderError::InvalidStructuralMove {
                group: group.id.clone(),
                target: target.to_string(),
            });
        }
    }

    Ok(Move {
        source,
        destination,
    })
}
