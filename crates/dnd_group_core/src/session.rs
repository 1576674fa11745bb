use tracing::{debug, warn};

use crate::collision::{CollisionCandidate, Rect, best_collision};
use crate::config::ReorderConfig;
use crate::error::{ReorderError, Result};
use crate::index::TreeIndex;
use crate::model::{Element, ElementId, Tree};
use crate::mutate::try_move_element;
use crate::resolve::{Move, resolve_move};
use crate::target::DropTarget;

/// What a drag step did to the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(Move),
    Unchanged,
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved(_))
    }
}

#[derive(Clone, Debug)]
struct ActiveDrag {
    id: ElementId,
    snapshot: Tree,
    last_target: Option<DropTarget>,
}

/// The tree being reordered, its derived lookups, and the drag in progress.
///
/// A drag goes `drag_start` → any number of `drag_move` → `drag_end` or
/// `drag_cancel`. Every move rebuilds the lookups before returning, and a
/// cancel puts back the tree exactly as it was at `drag_start`.
#[derive(Clone, Debug)]
pub struct DragSession {
    tree: Tree,
    index: TreeIndex,
    config: ReorderConfig,
    drag: Option<ActiveDrag>,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new(Tree::default())
    }
}

impl DragSession {
    pub fn new(tree: Tree) -> Self {
        Self::with_config(tree, ReorderConfig::default())
    }

    pub fn with_config(tree: Tree, config: ReorderConfig) -> Self {
        let index = TreeIndex::build(&tree);
        Self {
            tree,
            index,
            config,
            drag: None,
        }
    }

    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn index(&self) -> &TreeIndex {
        &self.index
    }

    /// Any element by id, for rendering a drag preview.
    pub fn lookup(&self, id: &str) -> Option<&Element> {
        self.index.lookup(id)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn active_id(&self) -> Option<&ElementId> {
        self.drag.as_ref().map(|drag| &drag.id)
    }

    pub fn active_element(&self) -> Option<&Element> {
        self.active_id().and_then(|id| self.index.lookup(id))
    }

    /// The last target the dragged element was moved onto.
    pub fn over(&self) -> Option<&DropTarget> {
        self.drag.as_ref().and_then(|drag| drag.last_target.as_ref())
    }

    /// The tree as it was when the current drag started.
    pub fn snapshot(&self) -> Option<&Tree> {
        self.drag.as_ref().map(|drag| &drag.snapshot)
    }

    /// Replace the whole tree. Any drag in progress is dropped.
    pub fn replace_tree(&mut self, tree: Tree) {
        self.drag = None;
        self.set_tree(tree);
    }

    /// Begin dragging `id`, remembering the current tree for [`Self::drag_cancel`].
    pub fn drag_start(&mut self, id: impl Into<ElementId>) -> Result<()> {
        let id = id.into();
        if let Some(drag) = &self.drag {
            return Err(ReorderError::DragInProgress {
                active: drag.id.clone(),
            });
        }
        if self.index.lookup(&id).is_none() {
            return Err(ReorderError::UnresolvedSource { id });
        }

        debug!(%id, "drag start");
        self.drag = Some(ActiveDrag {
            id,
            snapshot: self.tree.clone(),
            last_target: None,
        });
        Ok(())
    }

    /// Move the dragged element onto `target`.
    ///
    /// `None` means nothing is under the pointer. Repeating the previous target
    /// is a no-op: the element already sits there.
    pub fn drag_move(&mut self, target: Option<&DropTarget>) -> Result<MoveOutcome> {
        let drag = self.drag.as_mut().ok_or(ReorderError::NoActiveDrag)?;
        let Some(target) = target else {
            return Ok(MoveOutcome::Unchanged);
        };
        if drag.last_target.as_ref() == Some(target) {
            return Ok(MoveOutcome::Unchanged);
        }
        drag.last_target = Some(target.clone());

        let active = drag.id.clone();
        self.apply(&active, target)
    }

    /// [`Self::drag_move`] with a target id as rendered, e.g. `group-target-TOP`.
    pub fn drag_move_dom(&mut self, dom_id: &str) -> Result<MoveOutcome> {
        let target = DropTarget::parse(dom_id, &self.config.slot_marker);
        self.drag_move(Some(&target))
    }

    /// Rank `candidates` against the dragged rectangle and move onto the best one.
    pub fn drag_move_rects(
        &mut self,
        active_rect: &Rect,
        candidates: &[CollisionCandidate],
    ) -> Result<MoveOutcome> {
        let target = best_collision(
            active_rect,
            candidates,
            &self.index,
            self.config.ratio_decimals,
        );
        self.drag_move(target.as_ref())
    }

    /// Finish the drag, applying `target` if it differs from the last one moved to.
    ///
    /// The drag is over even when the final step is rejected.
    pub fn drag_end(&mut self, target: Option<&DropTarget>) -> Result<MoveOutcome> {
        let outcome = self.drag_move(target);
        if let Some(drag) = self.drag.take() {
            debug!(id = %drag.id, "drag end");
        }
        outcome
    }

    /// Abort the drag and restore the tree captured at [`Self::drag_start`].
    pub fn drag_cancel(&mut self) -> Result<()> {
        let drag = self.drag.take().ok_or(ReorderError::NoActiveDrag)?;
        debug!(id = %drag.id, "drag cancelled");
        self.set_tree(drag.snapshot);
        Ok(())
    }

    fn apply(&mut self, active: &ElementId, target: &DropTarget) -> Result<MoveOutcome> {
        if matches!(target, DropTarget::Item(id) if id == active) {
            return Ok(MoveOutcome::Unchanged);
        }

        let result = resolve_move(&self.tree, &self.index, active, target).and_then(|mv| {
            let tree = try_move_element(mv.source, mv.destination, &self.tree)?;
            Ok((mv, tree))
        });

        match result {
            Ok((mv, tree)) => {
                debug!(%active, %target, source = %mv.source, destination = %mv.destination, "drag move");
                self.set_tree(tree);
                Ok(MoveOutcome::Moved(mv))
            }
            Err(err) => {
                debug_assert!(!err.is_invariant_violation(), "{err}");
                warn!(%active, %target, %err, "drag move ignored");
                Err(err)
            }
        }
    }

    fn set_tree(&mut self, tree: Tree) {
        self.tree = tree;
        self.index = TreeIndex::build(&self.tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;
    use crate::target::SlotEdge;

    fn root_ids(session: &DragSession) -> Vec<&str> {
        session
            .tree()
            .elements()
            .iter()
            .map(|element| element.id().as_str())
            .collect()
    }

    #[test]
    fn start_requires_a_known_id_and_no_active_drag() {
        let mut session = DragSession::new(Tree::demo());

        assert!(matches!(
            session.drag_start("ghost"),
            Err(ReorderError::UnresolvedSource { .. })
        ));
        assert!(!session.is_dragging());

        session.drag_start("item4").unwrap();
        assert_eq!(session.active_id().map(ElementId::as_str), Some("item4"));
        assert_eq!(session.active_element().map(Element::content), Some("Item 4"));

        assert!(matches!(
            session.drag_start("item1"),
            Err(ReorderError::DragInProgress { active }) if active == *"item4"
        ));
    }

    #[test]
    fn move_requires_an_active_drag() {
        let mut session = DragSession::new(Tree::demo());
        assert!(matches!(
            session.drag_move(Some(&DropTarget::item("item2"))),
            Err(ReorderError::NoActiveDrag)
        ));
        assert!(matches!(session.drag_cancel(), Err(ReorderError::NoActiveDrag)));
    }

    #[test]
    fn move_reindexes_immediately() {
        let mut session = DragSession::new(Tree::demo());
        session.drag_start("item1").unwrap();

        let outcome = session
            .drag_move(Some(&DropTarget::group_slot("group2")))
            .unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Moved(Move {
                source: Coordinate::Root(0),
                destination: Coordinate::Interior {
                    group: 3,
                    offset: 2
                },
            })
        );
        assert_eq!(
            session.index().group_of("item1").map(ElementId::as_str),
            Some("group2")
        );
    }

    #[test]
    fn repeated_target_is_not_reapplied() {
        let mut session = DragSession::new(Tree::demo());
        session.drag_start("item1").unwrap();

        let target = DropTarget::item("item2");
        assert!(session.drag_move(Some(&target)).unwrap().is_moved());
        assert_eq!(root_ids(&session)[..2], ["item2", "item1"]);

        assert_eq!(
            session.drag_move(Some(&target)).unwrap(),
            MoveOutcome::Unchanged
        );
        assert_eq!(root_ids(&session)[..2], ["item2", "item1"]);
        assert_eq!(session.drag_move(None).unwrap(), MoveOutcome::Unchanged);
    }

    #[test]
    fn hovering_itself_is_unchanged() {
        let mut session = DragSession::new(Tree::demo());
        session.drag_start("item4").unwrap();
        assert_eq!(
            session.drag_move(Some(&DropTarget::item("item4"))).unwrap(),
            MoveOutcome::Unchanged
        );
        assert_eq!(session.tree(), &Tree::demo());
    }

    #[test]
    fn cancel_restores_the_snapshot() {
        let mut session = DragSession::new(Tree::demo());
        session.drag_start("item1").unwrap();
        session.drag_move_dom("group-target-group2").unwrap();
        session.drag_move_dom("group-target-TOP").unwrap();
        session.drag_move_dom("item6").unwrap();
        assert_ne!(session.tree(), &Tree::demo());
        assert_eq!(session.snapshot(), Some(&Tree::demo()));
        assert_eq!(session.over(), Some(&DropTarget::item("item6")));

        session.drag_cancel().unwrap();
        assert_eq!(session.tree(), &Tree::demo());
        assert!(!session.is_dragging());
        assert!(session.index().group_of("item1").is_none());
    }

    #[test]
    fn end_applies_a_new_target_and_clears_the_drag() {
        let mut session = DragSession::new(Tree::demo());
        session.drag_start("item6").unwrap();
        let outcome = session
            .drag_end(Some(&DropTarget::RootSlot(SlotEdge::Top)))
            .unwrap();

        assert!(outcome.is_moved());
        assert_eq!(root_ids(&session)[0], "item6");
        assert!(!session.is_dragging());
        assert!(matches!(session.drag_cancel(), Err(ReorderError::NoActiveDrag)));
    }

    #[test]
    fn rejected_end_still_ends_the_drag() {
        let mut session = DragSession::new(Tree::demo());
        session.drag_start("group1").unwrap();

        let err = session
            .drag_end(Some(&DropTarget::item("group2")))
            .unwrap_err();
        assert!(matches!(err, ReorderError::InvalidStructuralMove { .. }));
        assert!(!session.is_dragging());
        assert_eq!(session.tree(), &Tree::demo());
    }

    #[test]
    fn rects_drive_the_move() {
        let mut session = DragSession::new(Tree::demo());
        session.drag_start("item1").unwrap();

        let candidates = [
            CollisionCandidate::new(DropTarget::item("item2"), Rect::new(0., 40., 100., 40.)),
            CollisionCandidate::new(DropTarget::item("group1"), Rect::new(0., 80., 100., 80.)),
        ];
        let outcome = session
            .drag_move_rects(&Rect::new(0., 45., 100., 40.), &candidates)
            .unwrap();

        assert!(outcome.is_moved());
        assert_eq!(root_ids(&session)[..2], ["item2", "item1"]);
    }

    #[test]
    fn replace_tree_drops_the_drag() {
        let mut session = DragSession::new(Tree::demo());
        session.drag_start("item1").unwrap();
        session.replace_tree(Tree::default());

        assert!(!session.is_dragging());
        assert!(session.tree().is_empty());
        assert!(session.index().is_empty());
    }
}
