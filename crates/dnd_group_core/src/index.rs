use std::collections::HashMap;

use crate::model::{Element, ElementId, Tree};

/// Lookups derived from a [`Tree`].
///
/// Always built from a whole tree and never edited in place, so it cannot drift
/// from the tree it was built from. [`crate::DragSession`] rebuilds it in the
/// same call that replaces its tree.
#[derive(Clone, Debug, Default)]
pub struct TreeIndex {
    membership: HashMap<ElementId, ElementId>,
    flattened: HashMap<ElementId, Element>,
}

impl TreeIndex {
    pub fn build(tree: &Tree) -> Self {
        let mut membership = HashMap::new();
        let mut flattened = HashMap::new();

        for element in tree.elements() {
            if let Element::Group(group) = element {
                for leaf in &group.items {
                    membership.insert(leaf.id.clone(), group.id.clone());
                    flattened.insert(leaf.id.clone(), Element::Leaf(leaf.clone()));
                }
            }
            flattened.insert(element.id().clone(), element.clone());
        }

        Self {
            membership,
            flattened,
        }
    }

    /// The group containing `id`, when `id` is a nested leaf.
    pub fn group_of(&self, id: &str) -> Option<&ElementId> {
        self.membership.get(id)
    }

    pub fn is_member(&self, id: &str) -> bool {
        self.membership.contains_key(id)
    }

    /// Any element by id, root or nested.
    pub fn lookup(&self, id: &str) -> Option<&Element> {
        self.flattened.get(id)
    }

    pub fn len(&self) -> usize {
        self.flattened.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flattened.is_empty()
    }
}
