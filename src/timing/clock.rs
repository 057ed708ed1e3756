use std::time::{Duration, Instant};

use crate::foundation::core::Millis;

/// A timed object driven by a clock: sequencers, preloaders, frame loops.
///
/// Contract: after `advance_to(now)` returns, `next_deadline()` is either `None` or
/// strictly later than `now`.
pub trait Scheduled {
    /// Earliest instant at which this object has pending work.
    fn next_deadline(&self) -> Option<Millis>;

    /// Run everything due at or before `now`.
    fn advance_to(&mut self, now: Millis);
}

impl<T: Scheduled + ?Sized> Scheduled for Box<T> {
    fn next_deadline(&self) -> Option<Millis> {
        (**self).next_deadline()
    }

    fn advance_to(&mut self, now: Millis) {
        (**self).advance_to(now)
    }
}

fn earliest(items: &[&mut dyn Scheduled]) -> Option<Millis> {
    items.iter().filter_map(|s| s.next_deadline()).min()
}

/// Deterministic clock that jumps straight to the next pending deadline.
#[derive(Clone, Copy, Debug)]
pub struct VirtualClock {
    now: Millis,
    settled: bool,
}

impl VirtualClock {
    /// Clock positioned at `start`.
    pub fn new(start: Millis) -> Self {
        Self {
            now: start,
            settled: false,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Advance to the earliest deadline among `items` if it is at or before `limit`.
    ///
    /// Returns the instant every item was advanced to, or `None` when nothing is due.
    pub fn step(&mut self, items: &mut [&mut dyn Scheduled], limit: Millis) -> Option<Millis> {
        let due = earliest(items)?;
        let mut at = due.max(self.now);
        if at == self.now && self.settled {
            // Items already ran at `now`; a deadline that did not move forward must not spin.
            at = self.now + Millis(1);
        }
        if at > limit {
            return None;
        }
        self.now = at;
        for item in items.iter_mut() {
            item.advance_to(at);
        }
        self.settled = true;
        Some(at)
    }

    /// Step through every deadline up to `end`, then advance all items to `end`.
    ///
    /// Returns the number of intermediate steps taken.
    pub fn run_until(&mut self, items: &mut [&mut dyn Scheduled], end: Millis) -> usize {
        let mut steps = 0;
        while self.step(items, end).is_some() {
            steps += 1;
        }
        if end > self.now || !self.settled {
            self.now = self.now.max(end);
            for item in items.iter_mut() {
                item.advance_to(self.now);
            }
            self.settled = true;
        }
        steps
    }
}

/// Wall clock mapping [`Instant`] onto sequence milliseconds.
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    /// Clock whose zero is the current instant.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since [`WallClock::start`].
    pub fn now(&self) -> Millis {
        Millis(u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX))
    }

    /// Drive `items` in real time until `done` reports true or `until` passes.
    ///
    /// Sleeps until the next deadline, but never longer than `poll` so objects fed by
    /// background work (file fetches) are polled regularly.
    pub fn drive(
        &self,
        items: &mut [&mut dyn Scheduled],
        until: Millis,
        poll: Duration,
        mut done: impl FnMut() -> bool,
    ) -> Millis {
        loop {
            let now = self.now();
            for item in items.iter_mut() {
                item.advance_to(now);
            }
            if done() || now >= until {
                return now;
            }
            let wait = earliest(items)
                .map(|d| Duration::from_millis(d.since(now).0))
                .unwrap_or(poll)
                .min(poll)
                .min(Duration::from_millis(until.since(now).0));
            std::thread::sleep(wait.max(Duration::from_millis(1)));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/clock.rs"]
mod tests;
