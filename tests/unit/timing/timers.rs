use super::*;

#[test]
fn pops_in_due_order_then_schedule_order() {
    let mut set = TimerSet::new();
    set.schedule(Millis(300), "c");
    set.schedule(Millis(100), "a");
    set.schedule(Millis(300), "d");
    set.schedule(Millis(200), "b");

    let mut fired = Vec::new();
    while let Some((_, p)) = set.pop_due(Millis(1_000)) {
        fired.push(p);
    }
    assert_eq!(fired, vec!["a", "b", "c", "d"]);
}

#[test]
fn pop_due_respects_now() {
    let mut set = TimerSet::new();
    set.schedule(Millis(50), 1);
    assert_eq!(set.pop_due(Millis(49)), None);
    assert_eq!(set.pop_due(Millis(50)), Some((Millis(50), 1)));
    assert!(set.is_empty());
}

#[test]
fn cancel_is_idempotent() {
    let mut set = TimerSet::new();
    let id = set.schedule(Millis(10), ());
    assert!(set.cancel(id));
    assert!(!set.cancel(id));
    assert_eq!(set.next_due(), None);
}

#[test]
fn cancel_all_reports_count() {
    let mut set = TimerSet::new();
    for i in 0..4 {
        set.schedule(Millis(i * 10), i);
    }
    assert_eq!(set.len(), 4);
    assert_eq!(set.cancel_all(), 4);
    assert_eq!(set.cancel_all(), 0);
    assert_eq!(set.pop_due(Millis(u64::MAX)), None);
}
