use std::fmt;

use crate::model::ElementId;

/// Marker prefixed to synthetic drop-slot ids, e.g. `group-target-TOP`.
pub const DEFAULT_SLOT_MARKER: &str = "group-target";

const TOP_TOKEN: &str = "TOP";
const BOTTOM_TOKEN: &str = "BOTTOM";

/// Which end of the root list a root slot sits at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotEdge {
    Top,
    Bottom,
}

impl SlotEdge {
    fn token(self) -> &'static str {
        match self {
            SlotEdge::Top => TOP_TOKEN,
            SlotEdge::Bottom => BOTTOM_TOKEN,
        }
    }
}

/// Something a dragged element can be dropped on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// Insert at the top or bottom of the root list.
    RootSlot(SlotEdge),
    /// Append to the end of the given group.
    GroupSlot(ElementId),
    /// An element's own row.
    Item(ElementId),
}

impl DropTarget {
    pub fn item(id: impl Into<ElementId>) -> Self {
        DropTarget::Item(id.into())
    }

    pub fn group_slot(group_id: impl Into<ElementId>) -> Self {
        DropTarget::GroupSlot(group_id.into())
    }

    /// Whether this is a synthetic insertion slot rather than an element row.
    pub fn is_slot(&self) -> bool {
        !matches!(self, DropTarget::Item(_))
    }

    /// Decode a rendered target id.
    ///
    /// `<marker>-TOP` and `<marker>-BOTTOM` are root slots, `<marker>-<group>`
    /// is a group slot, anything else is a plain element id.
    pub fn parse(dom_id: &str, marker: &str) -> Self {
        let Some(rest) = dom_id
            .strip_prefix(marker)
            .and_then(|rest| rest.strip_prefix('-'))
            .filter(|rest| !rest.is_empty())
        else {
            return DropTarget::Item(dom_id.into());
        };

        match rest {
            TOP_TOKEN => DropTarget::RootSlot(SlotEdge::Top),
            BOTTOM_TOKEN => DropTarget::RootSlot(SlotEdge::Bottom),
            group_id => DropTarget::GroupSlot(group_id.into()),
        }
    }

    /// Encode this target the way [`DropTarget::parse`] reads it.
    pub fn dom_id(&self, marker: &str) -> String {
        match self {
            DropTarget::RootSlot(edge) => format!("{marker}-{}", edge.token()),
            DropTarget::GroupSlot(group_id) => format!("{marker}-{group_id}"),
            DropTarget::Item(id) => id.to_string(),
        }
    }
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropTarget::RootSlot(edge) => write!(f, "root slot {}", edge.token()),
            DropTarget::GroupSlot(group_id) => write!(f, "slot of group `{group_id}`"),
            DropTarget::Item(id) => write!(f, "`{id}`"),
        }
    }
}
