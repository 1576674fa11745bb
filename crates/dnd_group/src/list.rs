use std::rc::Rc;

use gpui::{
    AnyElement, App, AppContext as _, Bounds, Context, CursorStyle, Div, DragMoveEvent, Entity,
    EntityId, FocusHandle, InteractiveElement as _, IntoElement, ParentElement as _, Pixels, Point,
    Render, RenderOnce, SharedString, Stateful, StatefulInteractiveElement as _, StyleRefinement,
    Styled, Window, div, prelude::FluentBuilder as _, px,
};
use gpui_component::list::ListItem;
use gpui_component::{ActiveTheme as _, StyledExt as _, v_flex};
use gpui_dnd_group_core::{
    CollisionCandidate, DragSession, DropTarget, Element, ElementId, MoveOutcome, Rect,
    ReorderConfig, SlotEdge, Tree, intersection_ratio,
};
use tracing::debug;

const CONTEXT: &str = "DndGroupList";

type RenderRow = Rc<dyn Fn(&DndGroupRow, DndGroupRowState, &mut Window, &mut App) -> ListItem>;

/// Create a [`DndGroupList`].
pub fn dnd_group_list<R>(state: &Entity<DndGroupListState>, render_row: R) -> DndGroupList
where
    R: Fn(&DndGroupRow, DndGroupRowState, &mut Window, &mut App) -> ListItem + 'static,
{
    DndGroupList::new(state, render_row)
}

/// A row handed to the row renderer: a root element, a group header, or a
/// leaf nested in a group.
#[derive(Clone, Debug)]
pub struct DndGroupRow {
    pub element: Element,
    /// `0` for root elements and group headers, `1` inside a group.
    pub depth: usize,
    pub group_id: Option<ElementId>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DndGroupRowState {
    pub dragging: bool,
    pub drop_target: bool,
}

#[derive(Clone)]
struct DndGroupDrag {
    list_id: EntityId,
    item_id: ElementId,
    label: SharedString,
}

struct DragGhost {
    label: SharedString,
}

impl DragGhost {
    fn new(label: SharedString) -> Self {
        Self { label }
    }
}

impl Render for DragGhost {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        div()
            .px(px(10.))
            .py(px(6.))
            .rounded(px(8.))
            .bg(theme.popover)
            .border_1()
            .border_color(theme.border)
            .shadow_md()
            .text_color(theme.popover_foreground)
            .text_sm()
            .child(self.label.clone())
    }
}

/// State for a list of leaves and single-level groups that reorders live
/// while an element is dragged.
pub struct DndGroupListState {
    focus_handle: FocusHandle,
    session: DragSession,
    row_height: Pixels,
    slot_height: Pixels,
    drag_offset_y: Option<Pixels>,
    candidates: Vec<CollisionCandidate>,
    on_reorder: Option<Rc<dyn Fn(&Tree)>>,
    render_row: RenderRow,
}

impl DndGroupListState {
    pub fn new(cx: &mut App) -> Self {
        Self {
            focus_handle: cx.focus_handle(),
            session: DragSession::default(),
            row_height: px(36.),
            slot_height: px(12.),
            drag_offset_y: None,
            candidates: Vec::new(),
            on_reorder: None,
            render_row: Rc::new(|_, _, _, _| ListItem::new("dnd-group-empty")),
        }
    }

    pub fn tree(mut self, tree: Tree) -> Self {
        self.session.replace_tree(tree);
        self
    }

    pub fn config(mut self, config: ReorderConfig) -> Self {
        self.session = DragSession::with_config(self.session.tree().clone(), config);
        self
    }

    /// Height of the dragged rectangle used for collision ranking.
    ///
    /// Should match the height of the rows produced by the row renderer.
    pub fn row_height(mut self, height: Pixels) -> Self {
        self.row_height = height;
        self
    }

    pub fn slot_height(mut self, height: Pixels) -> Self {
        self.slot_height = height;
        self
    }

    /// Provide a callback invoked when a drop leaves the tree changed.
    pub fn on_reorder(mut self, on_reorder: impl Fn(&Tree) + 'static) -> Self {
        self.on_reorder = Some(Rc::new(on_reorder));
        self
    }

    pub fn set_tree(&mut self, tree: Tree, cx: &mut Context<Self>) {
        self.session.replace_tree(tree);
        self.reset_drag();
        cx.notify();
    }

    pub fn tree_ref(&self) -> &Tree {
        self.session.tree()
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    fn reset_drag(&mut self) {
        self.drag_offset_y = None;
        self.candidates.clear();
    }

    fn on_drag_start(
        &mut self,
        drag: &DndGroupDrag,
        cursor_offset: Point<Pixels>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if drag.list_id != cx.entity_id() {
            return;
        }
        if self.session.is_dragging() {
            let _ = self.session.drag_cancel();
        }
        if let Err(err) = self.session.drag_start(drag.item_id.clone()) {
            debug!(%err, "drag not started");
            return;
        }

        self.drag_offset_y = Some(cursor_offset.y);
        self.candidates.clear();
        cx.notify();
    }

    fn on_candidate_drag_move(
        &mut self,
        target: &DropTarget,
        event: &DragMoveEvent<DndGroupDrag>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !cx.has_active_drag() || !self.session.is_dragging() {
            return;
        }
        if event.drag(cx).list_id != cx.entity_id() {
            return;
        }
        let Some(offset_y) = self.drag_offset_y else {
            return;
        };

        let rect = bounds_to_rect(event.bounds);
        upsert_candidate(&mut self.candidates, target, rect);

        let active = active_rect(event.event.position.y, offset_y, self.row_height);
        if intersection_ratio(&active, &rect, self.session.config().ratio_decimals) <= 0. {
            return;
        }

        let over = self.session.over().cloned();
        match self.session.drag_move_rects(&active, &self.candidates) {
            Ok(MoveOutcome::Moved(mv)) => {
                debug!(source = %mv.source, destination = %mv.destination, "live reorder");
                // Every recorded rect is stale once the rows shift.
                self.candidates.clear();
                cx.notify();
            }
            Ok(MoveOutcome::Unchanged) => {
                if self.session.over() != over.as_ref() {
                    cx.notify();
                }
            }
            Err(err) => {
                debug!(%err, "drag step ignored");
                cx.notify();
            }
        }
    }

    fn on_drop(&mut self, drag: &DndGroupDrag, _window: &mut Window, cx: &mut Context<Self>) {
        if drag.list_id != cx.entity_id() || !self.session.is_dragging() {
            return;
        }

        let start = self.session.snapshot().cloned();
        if let Err(err) = self.session.drag_end(None) {
            debug!(%err, "drop step ignored");
        }
        self.reset_drag();
        cx.notify();

        let changed = start.is_some_and(|start| &start != self.session.tree());
        if changed && let Some(on_reorder) = self.on_reorder.as_ref() {
            on_reorder(self.session.tree());
        }
    }

    fn track(
        target: DropTarget,
        cx: &Context<Self>,
    ) -> impl Fn(&DragMoveEvent<DndGroupDrag>, &mut Window, &mut App) + 'static {
        cx.listener(
            move |this, event: &DragMoveEvent<DndGroupDrag>, window, cx| {
                this.on_candidate_drag_move(&target, event, window, cx);
            },
        )
    }

    fn render_slot(&self, target: DropTarget, cx: &mut Context<Self>) -> Stateful<Div> {
        let drop_target_bg = cx.theme().drop_target;
        let drag_border = cx.theme().drag_border;
        let border = cx.theme().border;
        let dragging = self.session.is_dragging();
        let over = self.session.over() == Some(&target);
        let dom_id = target.dom_id(&self.session.config().slot_marker);

        div()
            .id(SharedString::from(dom_id))
            .w_full()
            .h(self.slot_height)
            .rounded(px(4.))
            .when(dragging, |this| this.border_1().border_color(border))
            .when(over, |this| this.bg(drop_target_bg).border_color(drag_border))
            .on_drag_move::<DndGroupDrag>(Self::track(target, cx))
    }

    fn render_draggable(
        &self,
        row: &DndGroupRow,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Stateful<Div> {
        let id = row.element.id().clone();
        let row_state = DndGroupRowState {
            dragging: self.session.active_id() == Some(&id),
            drop_target: self.session.over() == Some(&DropTarget::Item(id.clone())),
        };
        let render_row = Rc::clone(&self.render_row);
        let list_item = (render_row)(row, row_state, window, cx);

        let state_entity = cx.entity();
        let drag_value = DndGroupDrag {
            list_id: cx.entity_id(),
            item_id: id.clone(),
            label: row.element.content().to_string().into(),
        };

        div()
            .id(SharedString::from(id.to_string()))
            .w_full()
            .cursor(CursorStyle::OpenHand)
            .child(list_item)
            .on_drag(drag_value, move |drag, cursor_offset, window, cx| {
                state_entity.update(cx, |state, cx| {
                    state.on_drag_start(drag, cursor_offset, window, cx);
                });
                let label = drag.label.clone();
                cx.new(|_| DragGhost::new(label))
            })
    }

    fn render_element(
        &self,
        element: &Element,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let group = match element {
            Element::Leaf(_) => {
                let row = DndGroupRow {
                    element: element.clone(),
                    depth: 0,
                    group_id: None,
                };
                return self
                    .render_draggable(&row, window, cx)
                    .on_drag_move::<DndGroupDrag>(Self::track(
                        DropTarget::Item(element.id().clone()),
                        cx,
                    ))
                    .into_any_element();
            }
            Element::Group(group) => group,
        };

        let drop_target_bg = cx.theme().drop_target;
        let drag_border = cx.theme().drag_border;
        let border = cx.theme().border;
        let group_target = DropTarget::Item(group.id.clone());
        let over = self.session.over() == Some(&group_target);

        let header = DndGroupRow {
            element: element.clone(),
            depth: 0,
            group_id: None,
        };
        let mut leaves = Vec::with_capacity(group.items.len());
        for leaf in &group.items {
            let row = DndGroupRow {
                element: Element::Leaf(leaf.clone()),
                depth: 1,
                group_id: Some(group.id.clone()),
            };
            leaves.push(
                self.render_draggable(&row, window, cx)
                    .pl(px(16.))
                    .on_drag_move::<DndGroupDrag>(Self::track(
                        DropTarget::Item(leaf.id.clone()),
                        cx,
                    )),
            );
        }

        v_flex()
            .w_full()
            .p(px(4.))
            .gap_y_1()
            .rounded(px(8.))
            .border_1()
            .border_color(border)
            .when(over, |this| this.bg(drop_target_bg).border_color(drag_border))
            .child(self.render_draggable(&header, window, cx))
            .children(leaves)
            .child(self.render_slot(DropTarget::GroupSlot(group.id.clone()), cx))
            .on_drag_move::<DndGroupDrag>(Self::track(group_target, cx))
            .into_any_element()
    }
}

impl Render for DndGroupListState {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        // Released outside of any drop area.
        if !cx.has_active_drag() && self.session.is_dragging() {
            debug!("drag released outside the list");
            let _ = self.session.drag_cancel();
            self.reset_drag();
        }

        let tree = self.session.tree().clone();
        let mut rows = Vec::with_capacity(tree.len() + 2);
        rows.push(
            self.render_slot(DropTarget::RootSlot(SlotEdge::Top), cx)
                .into_any_element(),
        );
        for element in tree.elements() {
            rows.push(self.render_element(element, window, cx));
        }
        rows.push(
            self.render_slot(DropTarget::RootSlot(SlotEdge::Bottom), cx)
                .into_any_element(),
        );

        div()
            .id("dnd-group-list-state")
            .size_full()
            .overflow_y_scroll()
            .on_drop::<DndGroupDrag>(cx.listener(Self::on_drop))
            .child(v_flex().w_full().p(px(4.)).gap_y_1().children(rows))
    }
}

/// A grouped list element that supports live drag-and-drop reordering.
#[derive(IntoElement)]
pub struct DndGroupList {
    id: gpui::ElementId,
    state: Entity<DndGroupListState>,
    style: StyleRefinement,
    render_row: RenderRow,
}

impl DndGroupList {
    pub fn new<R>(state: &Entity<DndGroupListState>, render_row: R) -> Self
    where
        R: Fn(&DndGroupRow, DndGroupRowState, &mut Window, &mut App) -> ListItem + 'static,
    {
        Self {
            id: gpui::ElementId::Name(format!("dnd-group-list-{}", state.entity_id()).into()),
            state: state.clone(),
            style: StyleRefinement::default(),
            render_row: Rc::new(move |row, row_state, window, cx| {
                render_row(row, row_state, window, cx)
            }),
        }
    }
}

impl Styled for DndGroupList {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl RenderOnce for DndGroupList {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let focus_handle = self.state.read(cx).focus_handle.clone();
        self.state
            .update(cx, |state, _| state.render_row = self.render_row);

        div()
            .id(self.id)
            .key_context(CONTEXT)
            .track_focus(&focus_handle)
            .size_full()
            .child(self.state)
            .refine_style(&self.style)
    }
}

fn bounds_to_rect(bounds: Bounds<Pixels>) -> Rect {
    Rect::new(
        bounds.origin.x.into(),
        bounds.origin.y.into(),
        bounds.size.width.into(),
        bounds.size.height.into(),
    )
}

/// The dragged row as it sits under the pointer, keeping the grab offset.
fn active_rect(pointer_y: Pixels, grab_offset_y: Pixels, row_height: Pixels) -> Rect {
    Rect::new(0., (pointer_y - grab_offset_y).into(), 0., row_height.into())
}

fn upsert_candidate(candidates: &mut Vec<CollisionCandidate>, target: &DropTarget, rect: Rect) {
    match candidates.iter_mut().find(|c| c.target == *target) {
        Some(candidate) => candidate.rect = rect,
        None => candidates.push(CollisionCandidate::new(target.clone(), rect)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpui::{point, size};

    #[test]
    fn bounds_become_rects() {
        let bounds = Bounds::new(point(px(4.), px(40.)), size(px(300.), px(36.)));
        assert_eq!(bounds_to_rect(bounds), Rect::new(4., 40., 300., 36.));
    }

    #[test]
    fn active_rect_keeps_the_grab_offset() {
        let rect = active_rect(px(100.), px(10.), px(36.));
        assert_eq!(rect.top, 90.);
        assert_eq!(rect.bottom(), 126.);
    }

    #[test]
    fn candidates_are_updated_in_place() {
        let mut candidates = Vec::new();
        let item = DropTarget::item("item1");
        let slot = DropTarget::RootSlot(SlotEdge::Top);

        upsert_candidate(&mut candidates, &slot, Rect::new(0., 0., 300., 12.));
        upsert_candidate(&mut candidates, &item, Rect::new(0., 16., 300., 36.));
        upsert_candidate(&mut candidates, &slot, Rect::new(0., 4., 300., 12.));

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].target, slot);
        assert_eq!(candidates[0].rect.top, 4.);
    }

    #[test]
    fn recorded_rows_drive_the_session() {
        let mut session = DragSession::new(Tree::demo());
        session.drag_start("item6").unwrap();

        let mut candidates = Vec::new();
        let top = DropTarget::RootSlot(SlotEdge::Top);
        upsert_candidate(&mut candidates, &top, Rect::new(0., 0., 300., 12.));
        upsert_candidate(&mut candidates, &DropTarget::item("item1"), Rect::new(0., 16., 300., 36.));

        let active = active_rect(px(12.), px(8.), px(36.));
        assert!(session.drag_move_rects(&active, &candidates).unwrap().is_moved());
        assert_eq!(session.tree().elements()[0].id(), "item6");
        assert_eq!(session.over(), Some(&top));
    }
}
