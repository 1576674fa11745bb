use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::ActiveTheme as _;
use gpui_component::list::ListItem;
use gpui_component::{Icon, Sizable as _, h_flex, v_flex};
use gpui_dnd_group::{DndGroupListState, DndGroupRow, DndGroupRowState, dnd_group_list};
use gpui_dnd_group_core::{Element, Tree};
use tracing::info;

pub struct DndGroupExample {
    list: Entity<DndGroupListState>,
}

impl DndGroupExample {
    pub fn view(_window: &mut Window, cx: &mut App) -> Entity<Self> {
        let list = cx.new(|cx| {
            DndGroupListState::new(cx)
                .row_height(px(32.))
                .tree(Tree::demo())
                .on_reorder(|tree| {
                    info!(roots = tree.len(), "reordered");
                })
        });
        cx.new(|_| Self { list })
    }
}

impl Render for DndGroupExample {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let session = self.list.read(cx).session();
        let tree_dump = format_tree(session.tree());
        let dragging = session
            .active_element()
            .map(|element| element.content().to_string())
            .unwrap_or_else(|| "<none>".to_string());
        let over = session
            .over()
            .map(|target| target.dom_id(&session.config().slot_marker))
            .unwrap_or_else(|| "<none>".to_string());

        v_flex()
            .size_full()
            .p(px(16.))
            .gap_y_3()
            .child(
                v_flex()
                    .gap_y_1()
                    .child(div().text_xl().font_weight(FontWeight::BOLD).child("DnD Groups"))
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child("Tip: the list reorders while you drag. Hovering a nested item places the dragged item next to its group; drop it on the slot at the bottom of a group to put it inside. Groups only move between items or to the slots at the top and bottom of the list. Release outside the list to cancel."),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child(format!("Dragging: {dragging} · Over: {over}")),
                    ),
            )
            .child(
                h_flex()
                    .flex_1()
                    .min_h(px(0.))
                    .gap_x_3()
                    .child(
                        v_flex()
                            .w(px(420.))
                            .min_w(px(0.))
                            .h_full()
                            .gap_y_2()
                            .child(div().text_sm().font_weight(FontWeight::MEDIUM).child("List"))
                            .child(
                                div()
                                    .flex_1()
                                    .min_h(px(0.))
                                    .rounded(px(12.))
                                    .border_1()
                                    .border_color(theme.border)
                                    .bg(theme.background)
                                    .child(dnd_group_list(&self.list, move |row, row_state, _window, cx| {
                                        render_group_row(row, row_state, cx)
                                    })),
                            ),
                    )
                    .child(
                        v_flex()
                            .flex_1()
                            .min_w(px(0.))
                            .h_full()
                            .gap_y_2()
                            .child(
                                div()
                                    .text_sm()
                                    .font_weight(FontWeight::MEDIUM)
                                    .child("Debug (tree structure)"),
                            )
                            .child(
                                div()
                                    .flex_1()
                                    .min_h(px(0.))
                                    .rounded(px(12.))
                                    .border_1()
                                    .border_color(theme.border)
                                    .bg(theme.background)
                                    .p(px(12.))
                                    .child(render_tree_dump(tree_dump)),
                            ),
                    ),
            )
    }
}

fn render_group_row(row: &DndGroupRow, row_state: DndGroupRowState, cx: &mut App) -> ListItem {
    let theme = cx.theme();
    let is_group = row.element.is_group();
    let icon_path = if is_group {
        "icons/library.svg"
    } else {
        "icons/text-align-start.svg"
    };
    let icon_color = if row_state.drop_target {
        theme.foreground
    } else {
        theme.muted_foreground
    };

    ListItem::new(SharedString::from(row.element.id().to_string()))
        .h(px(32.))
        .pl(px(10.))
        .when(row_state.dragging, |this| this.opacity(0.4))
        .child(
            h_flex()
                .gap_x_2()
                .items_center()
                .child(Icon::empty().path(icon_path).small().text_color(icon_color))
                .child(row.element.content().to_string())
                .when(is_group, |this| this.font_weight(FontWeight::MEDIUM)),
        )
}

fn render_tree_dump(text: String) -> impl IntoElement {
    let lines = text
        .lines()
        .map(|line| div().text_sm().child(line.to_string()));
    v_flex().gap_y_0p5().children(lines)
}

fn format_tree(tree: &Tree) -> String {
    let mut out = String::new();
    for element in tree.elements() {
        out.push_str(element.id());
        out.push('\n');
        if let Element::Group(group) = element {
            for leaf in &group.items {
                out.push_str("  ");
                out.push_str(&leaf.id);
                out.push('\n');
            }
        }
    }
    out
}
