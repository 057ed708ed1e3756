use super::*;

#[test]
fn accepts_strictly_increasing_offsets() {
    let t = Timeline::from_pairs([("p1", 0), ("p2", 3_000), ("p3", 7_000)]).unwrap();
    assert_eq!(t.len(), 3);
    assert_eq!(t.terminal_index(), 2);
    assert!(t.is_terminal(2));
    assert_eq!(t.duration(), Millis(7_000));
    assert_eq!(t.index_of("p2"), Some(1));
}

#[test]
fn rejects_bad_timelines() {
    assert!(Timeline::new(vec![]).is_err());
    assert!(Timeline::from_pairs([("p1", 10)]).is_err());
    assert!(Timeline::from_pairs([("p1", 0), ("p2", 0)]).is_err());
    assert!(Timeline::from_pairs([("p1", 0), ("p2", 500), ("p3", 400)]).is_err());
    assert!(Timeline::from_pairs([("p1", 0), ("p1", 500)]).is_err());
    assert!(Timeline::from_pairs([("p1", 0), (" ", 500)]).is_err());
}

#[test]
fn phase_at_maps_elapsed_to_active_index() {
    let t = Timeline::from_pairs([("p1", 0), ("p2", 3_000), ("p3", 7_000)]).unwrap();
    assert_eq!(t.phase_at(Millis(0)), 0);
    assert_eq!(t.phase_at(Millis(2_999)), 0);
    assert_eq!(t.phase_at(Millis(3_000)), 1);
    assert_eq!(t.phase_at(Millis(50_000)), 2);
}

#[test]
fn deserialize_validates() {
    let ok: Timeline =
        serde_json::from_str(r#"[{"phase":"a","at":0},{"phase":"b","at":10}]"#).unwrap();
    assert_eq!(ok.len(), 2);
    let bad = serde_json::from_str::<Timeline>(r#"[{"phase":"a","at":5}]"#);
    assert!(bad.is_err());
}
