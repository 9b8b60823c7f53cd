use design_studio::error::SceneError;
use design_studio::geometry::{contains_point, element_at, elements_in_rect};
use design_studio::scene::{
    Alignment, DistributeAxis, ElementId, ElementKind, ElementPatch, ReorderDirection, SceneElement, SceneGraph,
};
use egui::{Color32, Pos2, Rect, Vec2};

fn rect_at(x: f32, y: f32, w: f32, h: f32) -> SceneElement {
    SceneElement::new(
        ElementKind::Rect {
            size: Vec2::new(w, h),
            corner_radius: 0.0,
        },
        Pos2::new(x, y),
    )
}

/// Three 10x10 rects, returned bottom to top.
fn three_rects() -> (SceneGraph, [ElementId; 3]) {
    let mut scene = SceneGraph::new();
    let a = scene.add(rect_at(0.0, 0.0, 10.0, 10.0));
    let b = scene.add(rect_at(20.0, 0.0, 10.0, 10.0));
    let c = scene.add(rect_at(40.0, 0.0, 10.0, 10.0));
    (scene, [a, b, c])
}

fn paint_order(scene: &SceneGraph) -> Vec<ElementId> {
    scene.ids().collect()
}

fn assert_unique_sorted_layers(scene: &SceneGraph) {
    let layers: Vec<i64> = scene.elements().iter().map(|e| e.layer).collect();
    assert!(layers.windows(2).all(|w| w[0] < w[1]), "layers not strictly increasing: {:?}", layers);
}

#[test]
fn test_add_assigns_fresh_id_and_top_layer() {
    let mut scene = SceneGraph::new();
    let element = rect_at(0.0, 0.0, 10.0, 10.0);
    let original_id = element.id;
    let id = scene.add(element.clone());
    let second = scene.add(element);

    assert_ne!(id, original_id);
    assert_ne!(id, second);
    assert_eq!(scene.get(id).unwrap().layer, 0);
    assert_eq!(scene.get(second).unwrap().layer, 1);
    assert_eq!(scene.max_layer(), Some(1));
}

#[test]
fn test_send_to_back_is_strictly_lowest() {
    let (mut scene, [a, b, c]) = three_rects();
    assert!(scene.reorder(&[c], ReorderDirection::ToBack).unwrap());

    assert_eq!(paint_order(&scene), vec![c, a, b]);
    let c_layer = scene.get(c).unwrap().layer;
    assert!(scene.elements().iter().filter(|e| e.id != c).all(|e| e.layer > c_layer));
    assert_unique_sorted_layers(&scene);
}

#[test]
fn test_bring_to_front_keeps_relative_order() {
    let (mut scene, [a, b, c]) = three_rects();
    scene.reorder(&[a, b], ReorderDirection::ToFront).unwrap();
    assert_eq!(paint_order(&scene), vec![c, a, b]);
    assert_unique_sorted_layers(&scene);
}

#[test]
fn test_forward_and_backward_swap_neighbours() {
    let (mut scene, [a, b, c]) = three_rects();

    assert!(scene.reorder(&[a], ReorderDirection::Forward).unwrap());
    assert_eq!(paint_order(&scene), vec![b, a, c]);

    assert!(scene.reorder(&[c], ReorderDirection::Backward).unwrap());
    assert_eq!(paint_order(&scene), vec![b, c, a]);
    assert_unique_sorted_layers(&scene);

    // Already on top: nothing to do.
    assert!(!scene.reorder(&[a], ReorderDirection::Forward).unwrap());
}

#[test]
fn test_forward_moves_a_block_as_a_unit() {
    let (mut scene, [a, b, c]) = three_rects();
    scene.reorder(&[a, b], ReorderDirection::Forward).unwrap();
    assert_eq!(paint_order(&scene), vec![c, a, b]);
}

#[test]
fn test_reorder_unknown_id_fails() {
    let (mut scene, [a, _, _]) = three_rects();
    let ghost = ElementId::new();
    assert_eq!(
        scene.reorder(&[a, ghost], ReorderDirection::ToFront),
        Err(SceneError::NotFound(ghost))
    );
}

#[test]
fn test_duplicate_offsets_copy_under_new_id() {
    let (mut scene, [a, _, _]) = three_rects();
    let copies = scene.duplicate(&[a], Vec2::new(20.0, 20.0)).unwrap();

    assert_eq!(copies.len(), 1);
    let copy = scene.get(copies[0]).unwrap();
    assert_ne!(copy.id, a);
    assert_eq!(copy.position, Pos2::new(20.0, 20.0));
    assert_eq!(copy.kind, scene.get(a).unwrap().kind);
    assert_eq!(scene.elements().last().map(|e| e.id), Some(copy.id));
    assert_eq!(scene.len(), 4);
}

#[test]
fn test_update_applies_patch() {
    let (mut scene, [a, _, _]) = three_rects();
    let patch = ElementPatch {
        opacity: Some(2.0),
        fill: Some(Color32::RED),
        ..ElementPatch::default()
    };
    scene.update(a, &patch).unwrap();

    let element = scene.get(a).unwrap();
    assert_eq!(element.opacity, 1.0);
    assert_eq!(element.style.fill, Color32::RED);
}

#[test]
fn test_update_rejects_kind_change() {
    let (mut scene, [a, _, _]) = three_rects();
    let patch = ElementPatch {
        kind: Some(ElementKind::Circle { diameter: 5.0 }),
        ..ElementPatch::default()
    };
    assert!(matches!(scene.update(a, &patch), Err(SceneError::KindMismatch { .. })));
}

#[test]
fn test_locked_elements_reject_edits_but_not_unlock() {
    let (mut scene, [a, b, _]) = three_rects();
    scene.set_locked(&[a], true).unwrap();

    assert_eq!(scene.translate(&[a, b], Vec2::new(5.0, 0.0)), Err(SceneError::Locked(a)));
    // All or nothing: the unlocked one did not move either.
    assert_eq!(scene.get(b).unwrap().position, Pos2::new(20.0, 0.0));

    assert_eq!(
        scene.update(a, &ElementPatch::fill(Color32::RED)),
        Err(SceneError::Locked(a))
    );
    assert_eq!(scene.align(&[a, b], Alignment::Top), Err(SceneError::Locked(a)));

    // Visibility is allowed while locked.
    assert!(scene.set_visible(&[a], false).unwrap());

    scene.update(a, &ElementPatch::locked(false)).unwrap();
    scene.translate(&[a], Vec2::new(5.0, 0.0)).unwrap();
    assert_eq!(scene.get(a).unwrap().position, Pos2::new(5.0, 0.0));
}

#[test]
fn test_remove_many_is_atomic() {
    let (mut scene, [a, b, _]) = three_rects();
    let ghost = ElementId::new();
    assert!(scene.remove_many(&[a, ghost]).is_err());
    assert_eq!(scene.len(), 3);

    let removed = scene.remove_many(&[a, b]).unwrap();
    assert_eq!(removed.len(), 2);
    assert_eq!(scene.len(), 1);
}

#[test]
fn test_align_left_and_bottom() {
    let mut scene = SceneGraph::new();
    let a = scene.add(rect_at(10.0, 0.0, 10.0, 10.0));
    let b = scene.add(rect_at(50.0, 30.0, 20.0, 40.0));

    scene.align(&[a, b], Alignment::Left).unwrap();
    assert_eq!(scene.get(a).unwrap().position.x, 10.0);
    assert_eq!(scene.get(b).unwrap().position.x, 10.0);

    scene.align(&[a, b], Alignment::Bottom).unwrap();
    assert_eq!(scene.get(a).unwrap().bounds().max.y, 70.0);
    assert_eq!(scene.get(b).unwrap().bounds().max.y, 70.0);
}

#[test]
fn test_align_center() {
    let mut scene = SceneGraph::new();
    let a = scene.add(rect_at(0.0, 0.0, 10.0, 10.0));
    let b = scene.add(rect_at(90.0, 0.0, 10.0, 10.0));
    scene.align(&[a, b], Alignment::CenterH).unwrap();
    assert_eq!(scene.get(a).unwrap().center().x, 50.0);
    assert_eq!(scene.get(b).unwrap().center().x, 50.0);
}

#[test]
fn test_align_needs_two() {
    let (mut scene, [a, _, _]) = three_rects();
    assert_eq!(
        scene.align(&[a], Alignment::Left),
        Err(SceneError::NotEnoughElements { needed: 2, got: 1 })
    );
}

#[test]
fn test_distribute_spaces_interior_evenly() {
    let mut scene = SceneGraph::new();
    let a = scene.add(rect_at(0.0, 0.0, 10.0, 10.0));
    let b = scene.add(rect_at(10.0, 0.0, 10.0, 10.0));
    let c = scene.add(rect_at(90.0, 0.0, 10.0, 10.0));
    let d = scene.add(rect_at(15.0, 5.0, 10.0, 10.0));

    scene.distribute(&[a, b, c, d], DistributeAxis::Horizontal).unwrap();
    assert_eq!(scene.get(a).unwrap().position.x, 0.0);
    assert_eq!(scene.get(b).unwrap().position.x, 30.0);
    assert_eq!(scene.get(d).unwrap().position, Pos2::new(60.0, 5.0));
    assert_eq!(scene.get(c).unwrap().position.x, 90.0);
}

#[test]
fn test_distribute_needs_three() {
    let (mut scene, [a, b, _]) = three_rects();
    assert_eq!(
        scene.distribute(&[a, b], DistributeAxis::Vertical),
        Err(SceneError::NotEnoughElements { needed: 3, got: 2 })
    );
}

#[test]
fn test_from_elements_normalizes_layers_and_ids() {
    let first = rect_at(0.0, 0.0, 10.0, 10.0);
    let mut second = rect_at(5.0, 5.0, 10.0, 10.0);
    second.id = first.id;

    let scene = SceneGraph::from_elements(vec![first.clone(), second]);
    assert_eq!(scene.len(), 2);
    let ids: Vec<ElementId> = scene.ids().collect();
    assert_ne!(ids[0], ids[1]);
    assert_eq!(ids[0], first.id);
    assert_unique_sorted_layers(&scene);
}

#[test]
fn test_group_copy_refreshes_child_ids() {
    let child = rect_at(0.0, 0.0, 10.0, 10.0);
    let child_id = child.id;
    let group = SceneElement::new(ElementKind::Group { children: vec![child] }, Pos2::ZERO);
    let copy = group.fresh_copy(Vec2::new(1.0, 1.0));

    let ElementKind::Group { children } = &copy.kind else {
        panic!("copy is not a group");
    };
    assert_ne!(children[0].id, child_id);
    assert_eq!(copy.position, Pos2::new(1.0, 1.0));
}

#[test]
fn test_hit_testing_prefers_topmost_visible() {
    let mut scene = SceneGraph::new();
    let below = scene.add(rect_at(0.0, 0.0, 50.0, 50.0));
    let above = scene.add(rect_at(25.0, 25.0, 50.0, 50.0));

    assert_eq!(element_at(&scene, Pos2::new(30.0, 30.0)), Some(above));
    assert_eq!(element_at(&scene, Pos2::new(10.0, 10.0)), Some(below));
    assert_eq!(element_at(&scene, Pos2::new(90.0, 90.0)), None);

    scene.set_visible(&[above], false).unwrap();
    assert_eq!(element_at(&scene, Pos2::new(30.0, 30.0)), Some(below));
}

#[test]
fn test_hit_testing_circle_and_rotation() {
    let circle = SceneElement::new(ElementKind::Circle { diameter: 100.0 }, Pos2::ZERO);
    assert!(contains_point(&circle, Pos2::new(50.0, 50.0)));
    // Inside the bounds, outside the ellipse.
    assert!(!contains_point(&circle, Pos2::new(3.0, 3.0)));

    let bar = rect_at(0.0, 45.0, 100.0, 10.0).with_rotation(90.0);
    assert!(contains_point(&bar, Pos2::new(50.0, 5.0)));
    assert!(!contains_point(&bar, Pos2::new(5.0, 50.0)));
}

#[test]
fn test_marquee_selects_intersecting() {
    let (scene, [a, b, c]) = three_rects();
    let hits = elements_in_rect(&scene, Rect::from_min_max(Pos2::new(5.0, 5.0), Pos2::new(25.0, 25.0)));
    assert_eq!(hits, vec![a, b]);
    assert!(!hits.contains(&c));
}

#[test]
fn test_send_to_back_holds_after_repeats_and_adds() {
    let (mut scene, [a, b, _]) = three_rects();
    scene.reorder(&[b], ReorderDirection::ToBack).unwrap();
    scene.reorder(&[b], ReorderDirection::ToBack).unwrap();
    scene.add(rect_at(0.0, 0.0, 5.0, 5.0));
    scene.reorder(&[a], ReorderDirection::ToBack).unwrap();
    scene.add(rect_at(0.0, 0.0, 5.0, 5.0));

    let a_layer = scene.get(a).unwrap().layer;
    assert!(scene.elements().iter().filter(|e| e.id != a).all(|e| e.layer > a_layer));
    assert_eq!(scene.elements()[0].id, a);
    assert_unique_sorted_layers(&scene);
}

#[test]
fn test_editing_duplicate_leaves_source_alone() {
    let (mut scene, [a, _, _]) = three_rects();
    let copy = scene.duplicate(&[a], Vec2::new(20.0, 20.0)).unwrap()[0];
    assert_eq!(scene.get(copy).unwrap().style, scene.get(a).unwrap().style);

    scene.update(copy, &ElementPatch::fill(Color32::GREEN)).unwrap();
    scene.translate(&[copy], Vec2::new(3.0, 3.0)).unwrap();

    let source = scene.get(a).unwrap();
    assert_ne!(source.style.fill, Color32::GREEN);
    assert_eq!(source.position, Pos2::ZERO);
}

#[test]
fn test_add_after_extreme_imported_layers() {
    let mut top = rect_at(0.0, 0.0, 10.0, 10.0);
    top.layer = i64::MAX;
    let mut bottom = rect_at(20.0, 0.0, 10.0, 10.0);
    bottom.layer = i64::MIN;

    let mut scene = SceneGraph::from_elements(vec![top.clone(), bottom.clone()]);
    assert_eq!(paint_order(&scene), vec![bottom.id, top.id]);

    let added = scene.add(rect_at(40.0, 0.0, 10.0, 10.0));
    assert_eq!(scene.elements().last().unwrap().id, added);
    assert_unique_sorted_layers(&scene);

    scene.reorder(&[added], ReorderDirection::ToBack).unwrap();
    scene.reorder(&[bottom.id], ReorderDirection::ToFront).unwrap();
    assert_eq!(paint_order(&scene), vec![added, top.id, bottom.id]);
    assert_unique_sorted_layers(&scene);
}

#[test]
fn test_repeated_layer_moves_stay_ordered() {
    let (mut scene, [a, b, c]) = three_rects();
    for _ in 0..50 {
        scene.reorder(&[a], ReorderDirection::ToFront).unwrap();
        scene.reorder(&[c], ReorderDirection::ToBack).unwrap();
    }
    scene.duplicate(&[b], Vec2::new(5.0, 5.0)).unwrap();
    assert_eq!(scene.elements()[0].id, c);
    assert_eq!(scene.elements()[2].id, a);
    assert_unique_sorted_layers(&scene);
}

#[test]
fn test_translate_counts_repeated_ids_once() {
    let (mut scene, [a, b, _]) = three_rects();
    scene.translate(&[a, a, b, a], Vec2::new(10.0, 0.0)).unwrap();
    assert_eq!(scene.get(a).unwrap().position, Pos2::new(10.0, 0.0));
    assert_eq!(scene.get(b).unwrap().position, Pos2::new(30.0, 0.0));
}

#[test]
fn test_align_reports_whether_anything_moved() {
    let (mut scene, [a, b, c]) = three_rects();
    assert!(!scene.align(&[a, b, c], Alignment::Top).unwrap());
    assert!(scene.align(&[a, b, c], Alignment::Left).unwrap());
    assert!(!scene.align(&[a, b, c], Alignment::Left).unwrap());
    assert!(!scene.distribute(&[a, b, c], DistributeAxis::Vertical).unwrap());
}
