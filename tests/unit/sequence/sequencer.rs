use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::timing::clock::VirtualClock;

fn three_phase() -> Timeline {
    Timeline::from_pairs([("p1", 0), ("p2", 3_000), ("p3", 7_000)]).unwrap()
}

#[test]
fn is_in_second_phase_at_its_offset_and_never_returns() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let mut seq = PhaseSequencer::start(three_phase(), Millis(0))
        .with_on_phase(move |c| sink.borrow_mut().push(c.phase.clone()));
    assert_eq!(seq.current().phase, "p1");

    seq.advance_to(Millis(2_999));
    assert_eq!(seq.current().phase, "p1");
    seq.advance_to(Millis(3_000));
    assert_eq!(seq.current().phase, "p2");

    for t in (3_000..7_000).step_by(250) {
        seq.advance_to(Millis(t));
        assert_ne!(seq.current().phase, "p1");
    }
    seq.advance_to(Millis(7_000));
    assert_eq!(seq.current().phase, "p3");
    assert_eq!(*seen.borrow(), vec!["p2", "p3"]);
}

#[test]
fn offsets_are_relative_to_the_epoch() {
    let mut seq = PhaseSequencer::start(three_phase(), Millis(1_250));
    assert_eq!(seq.next_deadline(), Some(Millis(4_250)));
    seq.advance_to(Millis(4_249));
    assert_eq!(seq.current_index(), 0);
    seq.advance_to(Millis(4_250));
    assert_eq!(seq.current_index(), 1);
    assert_eq!(seq.epoch(), Millis(1_250));
}

#[test]
fn late_advance_applies_skipped_transitions_in_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let mut seq = PhaseSequencer::start(three_phase(), Millis(0))
        .with_on_phase(move |c| sink.borrow_mut().push((c.from, c.to, c.scheduled, c.applied)));
    seq.advance_to(Millis(9_000));
    assert_eq!(
        *seen.borrow(),
        vec![
            (0, 1, Millis(3_000), Millis(9_000)),
            (1, 2, Millis(7_000), Millis(9_000)),
        ]
    );
}

#[test]
fn completion_fires_exactly_once() {
    let done = Rc::new(RefCell::new(Vec::new()));
    let sink = done.clone();
    let mut seq = PhaseSequencer::start(three_phase(), Millis(0))
        .with_on_complete(move |at| sink.borrow_mut().push(at));

    let mut clock = VirtualClock::new(Millis(0));
    clock.run_until(&mut [&mut seq], Millis(20_000));
    seq.advance_to(Millis(30_000));

    assert_eq!(*done.borrow(), vec![Millis(7_000)]);
    assert!(seq.is_complete());
    assert_eq!(seq.next_deadline(), None);
    assert_eq!(seq.pending_transitions(), 0);
}

#[test]
fn dispose_before_transition_prevents_it() {
    let seen = Rc::new(RefCell::new(0usize));
    let done = Rc::new(RefCell::new(false));
    let (s, d) = (seen.clone(), done.clone());
    let mut seq = PhaseSequencer::start(three_phase(), Millis(0))
        .with_on_phase(move |_| *s.borrow_mut() += 1)
        .with_on_complete(move |_| *d.borrow_mut() = true);

    seq.advance_to(Millis(1_000));
    seq.dispose();
    seq.dispose();
    assert_eq!(seq.state(), SequencerState::Disposed);
    assert_eq!(seq.pending_transitions(), 0);

    seq.advance_to(Millis(10_000));
    assert_eq!(seq.current().phase, "p1");
    assert_eq!(*seen.borrow(), 0);
    assert!(!*done.borrow());
}

#[test]
fn dispose_after_completion_keeps_completed_state() {
    let mut seq = PhaseSequencer::start(three_phase(), Millis(0));
    seq.advance_to(Millis(7_000));
    seq.dispose();
    assert_eq!(seq.state(), SequencerState::Completed);
}

#[test]
fn single_phase_timeline_completes_at_epoch() {
    let done = Rc::new(RefCell::new(0u32));
    let d = done.clone();
    let phases = Rc::new(RefCell::new(0u32));
    let p = phases.clone();
    let mut seq = PhaseSequencer::start(Timeline::from_pairs([("only", 0)]).unwrap(), Millis(50))
        .with_on_phase(move |_| *p.borrow_mut() += 1)
        .with_on_complete(move |_| *d.borrow_mut() += 1);
    assert_eq!(seq.next_deadline(), Some(Millis(50)));
    seq.advance_to(Millis(50));
    seq.advance_to(Millis(60));
    assert_eq!(*done.borrow(), 1);
    assert_eq!(*phases.borrow(), 0);
}
