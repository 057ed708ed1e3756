use super::*;

fn hits(layer: &RegionLayer, x: f64, y: f64) -> Vec<Hit> {
    let mut out = Vec::new();
    layer.hits_at(Point::new(x, y), &mut out);
    out
}

#[test]
fn hits_are_topmost_first() {
    let mut layer = RegionLayer::new();
    layer.push(ElementId(1), Rect::new(0.0, 0.0, 100.0, 100.0), 0, None);
    layer.push(ElementId(2), Rect::new(10.0, 10.0, 50.0, 50.0), 5, Some(RegionId(7)));
    layer.push(ElementId(3), Rect::new(0.0, 0.0, 30.0, 30.0), 0, Some(RegionId(8)));

    let got: Vec<u32> = hits(&layer, 20.0, 20.0).iter().map(|h| h.element.0).collect();
    assert_eq!(got, vec![2, 3, 1]);
    assert!(hits(&layer, 200.0, 20.0).is_empty());
}

#[test]
fn far_edges_are_exclusive() {
    let mut layer = RegionLayer::new();
    layer.push(ElementId(1), Rect::new(0.0, 0.0, 10.0, 10.0), 0, None);
    layer.push(ElementId(2), Rect::new(10.0, 0.0, 20.0, 10.0), 0, None);
    let got = hits(&layer, 10.0, 5.0);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].element, ElementId(2));
}

#[test]
fn set_rect_moves_known_elements_only() {
    let mut layer = RegionLayer::new();
    layer.push(ElementId(1), Rect::new(0.0, 0.0, 10.0, 10.0), 0, None);
    assert!(layer.set_rect(ElementId(1), Rect::new(50.0, 50.0, 60.0, 60.0)));
    assert!(!layer.set_rect(ElementId(9), Rect::ZERO));
    assert!(hits(&layer, 5.0, 5.0).is_empty());
    assert_eq!(hits(&layer, 55.0, 55.0).len(), 1);
    assert_eq!(layer.len(), 1);
}
