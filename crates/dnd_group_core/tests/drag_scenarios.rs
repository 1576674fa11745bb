use gpui_dnd_group_core::{
    CollisionCandidate, DragSession, DropTarget, Element, MoveOutcome, Rect, ReorderConfig,
    ReorderError, SlotEdge, Tree,
};

fn dump(tree: &Tree) -> String {
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
    out.trim_end().to_string()
}

fn demo_session() -> DragSession {
    DragSession::new(Tree::demo())
}

#[test]
fn leaf_into_group_then_out_again() {
    let mut session = demo_session();
    session.drag_start("item1").unwrap();

    session.drag_move_dom("group-target-group2").unwrap();
    assert_eq!(
        dump(session.tree()),
        r#"item2
group1
  item3
group2
  item4
  item5
  item1
item6"#
    );

    // item6 is at root 3 once item1 has left the root list.
    session.drag_move_dom("item6").unwrap();
    session.drag_end(None).unwrap();
    assert_eq!(
        dump(session.tree()),
        r#"item2
group1
  item3
group2
  item4
  item5
item1
item6"#
    );
}

#[test]
fn hovering_a_nested_leaf_targets_its_group_row() {
    let mut session = demo_session();
    session.drag_start("item6").unwrap();

    let outcome = session.drag_end(Some(&DropTarget::item("item4"))).unwrap();
    assert!(outcome.is_moved());
    assert_eq!(
        dump(session.tree()),
        r#"item1
item2
group1
  item3
item6
group2
  item4
  item5"#
    );
}

#[test]
fn leaf_leaves_its_group_for_the_top_slot() {
    let mut session = demo_session();
    session.drag_start("item5").unwrap();
    session.drag_end(Some(&DropTarget::RootSlot(SlotEdge::Top))).unwrap();

    assert_eq!(
        dump(session.tree()),
        r#"item5
item1
item2
group1
  item3
group2
  item4
item6"#
    );
}

#[test]
fn groups_reorder_through_root_slots_only() {
    let mut session = demo_session();
    session.drag_start("group2").unwrap();

    let err = session.drag_move_dom("group1").unwrap_err();
    assert!(matches!(err, ReorderError::InvalidStructuralMove { .. }));
    assert_eq!(session.tree(), &Tree::demo());

    session.drag_move_dom("group-target-TOP").unwrap();
    session.drag_end(None).unwrap();
    assert_eq!(
        dump(session.tree()),
        r#"group2
  item4
  item5
item1
item2
group1
  item3
item6"#
    );
}

#[test]
fn group_can_be_moved_over_a_leaf() {
    let mut session = demo_session();
    session.drag_start("group1").unwrap();
    session.drag_end(Some(&DropTarget::item("item6"))).unwrap();

    assert_eq!(
        dump(session.tree()),
        r#"item1
item2
group2
  item4
  item5
item6
group1
  item3"#
    );
}

#[test]
fn bottom_slot_from_root_and_from_group() {
    let mut session = demo_session();
    session.drag_start("item1").unwrap();
    session.drag_end(Some(&DropTarget::RootSlot(SlotEdge::Bottom))).unwrap();
    assert_eq!(session.tree().elements().last().unwrap().id(), "item1");

    session.drag_start("item3").unwrap();
    session.drag_end(Some(&DropTarget::RootSlot(SlotEdge::Bottom))).unwrap();
    assert_eq!(session.tree().elements().last().unwrap().id(), "item3");
    assert!(session.tree().group_at(1).unwrap().items.is_empty());
}

#[test]
fn unknown_targets_are_ignored() {
    let mut session = demo_session();
    session.drag_start("item2").unwrap();

    for dom_id in ["nothing-here", "group-target-missing", "group-target-item1"] {
        let err = session.drag_move_dom(dom_id).unwrap_err();
        assert!(matches!(err, ReorderError::UnresolvedTarget { .. }), "{dom_id}");
    }
    assert_eq!(session.tree(), &Tree::demo());
    assert!(session.is_dragging());
}

#[test]
fn custom_marker_from_config() {
    let config = ReorderConfig::from_json(r#"{"slot_marker": "drop"}"#).unwrap();
    let mut session = DragSession::with_config(Tree::demo(), config);
    session.drag_start("item2").unwrap();

    assert!(session.drag_move_dom("drop-group1").unwrap().is_moved());
    assert_eq!(
        session
            .index()
            .group_of("item2")
            .map(|group| group.to_string()),
        Some("group1".to_string())
    );
}

#[test]
fn preview_lookup_follows_the_drag() {
    let mut session = demo_session();
    session.drag_start("item4").unwrap();
    session.drag_move_dom("group-target-group1").unwrap();

    let preview = session.active_element().unwrap();
    assert_eq!(preview.content(), "Item 4");
    assert_eq!(
        session.lookup("group1").and_then(Element::as_group).map(|g| g.items.len()),
        Some(2)
    );
}

#[test]
fn pointer_frames_over_rendered_rows() {
    // 40px rows: item1, item2, then group1 with its slot and item3.
    let candidates = vec![
        CollisionCandidate::new(DropTarget::item("item1"), Rect::new(0., 0., 300., 40.)),
        CollisionCandidate::new(DropTarget::item("item2"), Rect::new(0., 40., 300., 40.)),
        CollisionCandidate::new(DropTarget::item("group1"), Rect::new(0., 80., 300., 100.)),
        CollisionCandidate::new(DropTarget::group_slot("group1"), Rect::new(20., 90., 280., 20.)),
        CollisionCandidate::new(DropTarget::item("item3"), Rect::new(20., 120., 280., 40.)),
    ];

    let mut session = demo_session();
    session.drag_start("item1").unwrap();

    // Over item2's row.
    let outcome = session
        .drag_move_rects(&Rect::new(0., 42., 300., 40.), &candidates)
        .unwrap();
    assert!(outcome.is_moved());

    // Touching group1's slot wins over every row.
    let outcome = session
        .drag_move_rects(&Rect::new(0., 75., 300., 40.), &candidates)
        .unwrap();
    assert!(outcome.is_moved());
    assert_eq!(
        session.index().group_of("item1").map(|g| g.to_string()),
        Some("group1".to_string())
    );

    // Nothing under the pointer keeps the tree as is.
    let outcome = session
        .drag_move_rects(&Rect::new(0., 900., 300., 40.), &candidates)
        .unwrap();
    assert_eq!(outcome, MoveOutcome::Unchanged);

    session.drag_cancel().unwrap();
    assert_eq!(session.tree(), &Tree::demo());
}
