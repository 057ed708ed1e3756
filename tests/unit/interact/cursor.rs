use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{foundation::core::Rect, interact::regions::RegionLayer};

const OWN: ElementId = ElementId(99);

fn recording_cursor(vp: Viewport) -> (InteractionCursor, Rc<RefCell<Vec<Option<RegionId>>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let cursor = InteractionCursor::new(vp, OWN, move |r| sink.borrow_mut().push(r));
    (cursor, log)
}

fn scene() -> RegionLayer {
    let mut layer = RegionLayer::new();
    // Card 1 on the left half, card 2 on the right half, a plain decoration over card 2.
    layer.push(ElementId(1), Rect::new(0.0, 100.0, 200.0, 300.0), 0, Some(RegionId(1)));
    layer.push(ElementId(2), Rect::new(200.0, 100.0, 400.0, 300.0), 0, Some(RegionId(2)));
    layer.push(ElementId(3), Rect::new(250.0, 150.0, 300.0, 200.0), 1, None);
    layer
}

#[test]
fn starts_near_the_top_right_corner() {
    let (cursor, _) = recording_cursor(Viewport::new(400, 800).unwrap());
    assert_eq!(cursor.position(), Point::new(320.0, 40.0));
    assert_eq!(cursor.center(), Point::new(340.0, 60.0));
    assert_eq!(cursor.hint(), HintState::Shown);
}

#[test]
fn every_drag_reports_the_region_under_the_center() {
    let (mut cursor, log) = recording_cursor(Viewport::new(400, 800).unwrap());
    let layer = scene();

    assert_eq!(cursor.drag_by(Vec2::new(0.0, 10.0), &layer), None);
    // The untagged decoration on top is skipped in favour of card 2 below it.
    assert_eq!(cursor.drag_by(Vec2::new(-70.0, 110.0), &layer), Some(RegionId(2)));
    assert_eq!(cursor.drag_by(Vec2::new(-1.0, 0.0), &layer), Some(RegionId(2)));
    assert_eq!(cursor.drag_by(Vec2::new(-200.0, 0.0), &layer), Some(RegionId(1)));
    assert_eq!(cursor.drag_by(Vec2::new(0.0, 500.0), &layer), None);

    assert_eq!(
        *log.borrow(),
        vec![None, Some(RegionId(2)), Some(RegionId(2)), Some(RegionId(1)), None]
    );
    assert_eq!(cursor.hovered(), None);
}

#[test]
fn own_element_never_counts_as_a_hit() {
    let (mut cursor, _) = recording_cursor(Viewport::new(400, 800).unwrap());
    let mut layer = RegionLayer::new();
    layer.push(OWN, Rect::new(0.0, 0.0, 1000.0, 1000.0), 100, Some(RegionId(42)));
    layer.push(ElementId(1), Rect::new(0.0, 0.0, 1000.0, 1000.0), 0, Some(RegionId(1)));
    assert_eq!(cursor.drag_by(Vec2::ZERO, &layer), Some(RegionId(1)));
}

#[test]
fn hint_fades_in_after_delay_and_dismissal_is_permanent() {
    let (mut cursor, _) = recording_cursor(Viewport::new(400, 800).unwrap());
    assert_eq!(cursor.hint_opacity(Millis(1_999)), 0.0);
    assert_eq!(cursor.hint_opacity(Millis(2_000)), 0.0);
    assert!((cursor.hint_opacity(Millis(2_100)) - 0.5).abs() < 1e-12);
    assert_eq!(cursor.hint_opacity(Millis(9_000)), 1.0);

    cursor.pointer_down();
    assert_eq!(cursor.hint(), HintState::Dismissed);
    assert_eq!(cursor.hint_opacity(Millis(9_000)), 0.0);
    cursor.pointer_down();
    assert_eq!(cursor.hint(), HintState::Dismissed);
}

#[test]
fn first_drag_dismisses_the_hint() {
    let (mut cursor, _) = recording_cursor(Viewport::new(400, 800).unwrap());
    cursor.drag_by(Vec2::new(1.0, 1.0), &RegionLayer::new());
    assert_eq!(cursor.hint(), HintState::Dismissed);
}
