use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ReorderError, Result};

/// An element id, unique across the whole tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Arc<str>);

impl ElementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl Deref for ElementId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ElementId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-container row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub id: ElementId,
    pub content: String,
}

impl Leaf {
    pub fn new(id: impl Into<ElementId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// A root-level container of leaves.
///
/// Items are typed as [`Leaf`], so a group can never hold another group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: ElementId,
    pub content: String,
    #[serde(default)]
    pub items: Vec<Leaf>,
}

impl Group {
    pub fn new(id: impl Into<ElementId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            items: Vec::new(),
        }
    }

    pub fn item(mut self, item: Leaf) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: impl Into<Vec<Leaf>>) -> Self {
        self.items.extend(items.into());
        self
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == *id)
    }
}

/// A root-level entry. The seed record shape is `{"id", "type", "content", "items"?}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    #[serde(rename = "item")]
    Leaf(Leaf),
    Group(Group),
}

impl Element {
    pub fn id(&self) -> &ElementId {
        match self {
            Element::Leaf(leaf) => &leaf.id,
            Element::Group(group) => &group.id,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Element::Leaf(leaf) => &leaf.content,
            Element::Group(group) => &group.content,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Element::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Element::Group(group) => Some(group),
            Element::Leaf(_) => None,
        }
    }
}

impl From<Leaf> for Element {
    fn from(value: Leaf) -> Self {
        Element::Leaf(value)
    }
}

impl From<Group> for Element {
    fn from(value: Group) -> Self {
        Element::Group(value)
    }
}

/// A location in the tree: a root index, or an offset inside the group at a root index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Coordinate {
    Root(usize),
    Interior { group: usize, offset: usize },
}

impl Coordinate {
    /// Build a coordinate from a `[i]` or `[i, j]` path.
    pub fn from_path(path: &[usize]) -> Option<Self> {
        match *path {
            [root] => Some(Coordinate::Root(root)),
            [group, offset] => Some(Coordinate::Interior { group, offset }),
            _ => None,
        }
    }

    /// The root index this coordinate starts at.
    pub fn root(&self) -> usize {
        match *self {
            Coordinate::Root(root) => root,
            Coordinate::Interior { group, .. } => group,
        }
    }

    /// Path length: 1 for root coordinates, 2 for group interiors.
    pub fn depth(&self) -> usize {
        match self {
            Coordinate::Root(_) => 1,
            Coordinate::Interior { .. } => 2,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Root(root) => write!(f, "[{root}]"),
            Coordinate::Interior { group, offset } => write!(f, "[{group}, {offset}]"),
        }
    }
}

/// The root-level sequence of elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tree {
    elements: Vec<Element>,
}

impl Tree {
    /// Build a tree from seed elements, rejecting ids that appear more than once.
    pub fn from_seed(elements: impl Into<Vec<Element>>) -> Result<Self> {
        let tree = Self {
            elements: elements.into(),
        };
        let mut seen = HashSet::new();
        for id in tree.ids() {
            if !seen.insert(id) {
                return Err(ReorderError::DuplicateId { id: id.clone() });
            }
        }
        Ok(tree)
    }

    /// Parse a JSON array of seed records.
    pub fn from_json(json: &str) -> Result<Self> {
        let elements: Vec<Element> = serde_json::from_str(json)?;
        Self::from_seed(elements)
    }

    /// Two loose items, two groups, and a trailing item.
    pub fn demo() -> Self {
        Self {
            elements: vec![
                Leaf::new("item1", "Item 1").into(),
                Leaf::new("item2", "Item 2").into(),
                Group::new("group1", "Group 1")
                    .item(Leaf::new("item3", "Item 3"))
                    .into(),
                Group::new("group2", "Group 2")
                    .items([Leaf::new("item4", "Item 4"), Leaf::new("item5", "Item 5")])
                    .into(),
                Leaf::new("item6", "Item 6").into(),
            ],
        }
    }

    pub(crate) fn from_elements_unchecked(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Every id in the tree: root order, each group followed by its items.
    pub fn ids(&self) -> impl Iterator<Item = &ElementId> {
        self.elements.iter().flat_map(|element| {
            let nested = element
                .as_group()
                .map(|group| group.items.as_slice())
                .unwrap_or_default();
            std::iter::once(element.id()).chain(nested.iter().map(|leaf| &leaf.id))
        })
    }

    pub fn root_index(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|element| element.id() == id)
    }

    pub fn group_at(&self, ix: usize) -> Option<&Group> {
        self.elements.get(ix).and_then(Element::as_group)
    }

    /// The id stored at `at`, if the coordinate is in range.
    pub fn id_at(&self, at: Coordinate) -> Option<&ElementId> {
        match at {
            Coordinate::Root(ix) => self.elements.get(ix).map(Element::id),
            Coordinate::Interior { group, offset } => self
                .group_at(group)
                .and_then(|group| group.items.get(offset))
                .map(|leaf| &leaf.id),
        }
    }
}
