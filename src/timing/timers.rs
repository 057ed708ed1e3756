use crate::foundation::core::Millis;

/// Handle to one scheduled timer inside a [`TimerSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<K> {
    id: TimerId,
    due: Millis,
    payload: K,
}

/// Owned queue of one-shot timers.
///
/// Timers pop in `(due, scheduling order)` order, so two timers due at the same instant
/// fire in the order they were scheduled. Dropping the set revokes every timer it holds.
#[derive(Debug)]
pub struct TimerSet<K> {
    next_id: u64,
    pending: Vec<Pending<K>>,
}

impl<K> Default for TimerSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerSet<K> {
    /// Empty set.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule `payload` to fire at `due`.
    pub fn schedule(&mut self, due: Millis, payload: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // Ids grow monotonically, so inserting after every entry with `due <= new due`
        // keeps the vector sorted by (due, id).
        let at = self.pending.partition_point(|p| p.due <= due);
        self.pending.insert(at, Pending { id, due, payload });
        id
    }

    /// Revoke one timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.iter().position(|p| p.id == id) {
            Some(pos) => {
                self.pending.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Revoke every pending timer, returning how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    /// Earliest pending due time.
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.first().map(|p| p.due)
    }

    /// Remove and return the earliest timer if it is due at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, K)> {
        if self.pending.first()?.due > now {
            return None;
        }
        let p = self.pending.remove(0);
        Some((p.due, p.payload))
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/timers.rs"]
mod tests;
