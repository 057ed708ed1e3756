use super::*;

/// Fires at a fixed list of instants and records when it was advanced.
struct Beeper {
    due: Vec<Millis>,
    seen: Vec<Millis>,
}

impl Beeper {
    fn new(due: &[u64]) -> Self {
        Self {
            due: due.iter().rev().map(|&d| Millis(d)).collect(),
            seen: Vec::new(),
        }
    }
}

impl Scheduled for Beeper {
    fn next_deadline(&self) -> Option<Millis> {
        self.due.last().copied()
    }

    fn advance_to(&mut self, now: Millis) {
        while self.due.last().is_some_and(|d| *d <= now) {
            let d = self.due.pop().unwrap();
            self.seen.push(d);
        }
    }
}

/// Misbehaving item whose deadline never moves forward.
struct Stuck;

impl Scheduled for Stuck {
    fn next_deadline(&self) -> Option<Millis> {
        Some(Millis(0))
    }

    fn advance_to(&mut self, _now: Millis) {}
}

#[test]
fn virtual_clock_visits_every_deadline_in_order() {
    let mut a = Beeper::new(&[10, 30]);
    let mut b = Beeper::new(&[20]);
    let mut clock = VirtualClock::new(Millis::ZERO);

    let steps = clock.run_until(&mut [&mut a, &mut b], Millis(100));
    assert_eq!(steps, 3);
    assert_eq!(clock.now(), Millis(100));
    assert_eq!(a.seen, vec![Millis(10), Millis(30)]);
    assert_eq!(b.seen, vec![Millis(20)]);
}

#[test]
fn virtual_clock_stops_at_limit() {
    let mut a = Beeper::new(&[10, 500]);
    let mut clock = VirtualClock::new(Millis::ZERO);
    clock.run_until(&mut [&mut a], Millis(100));
    assert_eq!(a.seen, vec![Millis(10)]);
    assert_eq!(a.next_deadline(), Some(Millis(500)));
}

#[test]
fn virtual_clock_does_not_spin_on_stale_deadlines() {
    let mut s = Stuck;
    let mut clock = VirtualClock::new(Millis::ZERO);
    let steps = clock.run_until(&mut [&mut s], Millis(5));
    assert!(steps <= 6);
    assert_eq!(clock.now(), Millis(5));
}

#[test]
fn wall_clock_drive_stops_when_done() {
    let mut a = Beeper::new(&[0]);
    let clock = WallClock::start();
    let mut calls = 0;
    clock.drive(
        &mut [&mut a],
        Millis(5_000),
        Duration::from_millis(1),
        || {
            calls += 1;
            calls >= 2
        },
    );
    assert_eq!(a.seen, vec![Millis(0)]);
    assert_eq!(calls, 2);
}
