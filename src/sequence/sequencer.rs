use crate::{
    foundation::core::Millis,
    sequence::timeline::{Timeline, TimelineEntry},
    timing::{clock::Scheduled, timers::TimerSet},
};

/// Lifecycle of a [`PhaseSequencer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerState {
    /// Transitions are still scheduled.
    Running,
    /// The terminal phase was entered and the completion signal fired.
    Completed,
    /// Disposed before completion; no further transitions will happen.
    Disposed,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// One transition as observed by phase listeners.
pub struct PhaseChange {
    /// Index of the phase that was exited.
    pub from: usize,
    /// Index of the phase that was entered.
    pub to: usize,
    /// Label of the entered phase.
    pub phase: String,
    /// Scheduled instant (epoch + offset).
    pub scheduled: Millis,
    /// Clock time at which the transition was applied.
    pub applied: Millis,
}

type PhaseFn = Box<dyn FnMut(&PhaseChange)>;
type CompleteFn = Box<dyn FnOnce(Millis)>;

/// Timed finite-state machine over a [`Timeline`].
///
/// The epoch is captured at construction and one timer is scheduled per transition.
/// Phases only move forward. Disposing (explicitly, or by dropping the sequencer) revokes
/// every pending timer, so no transition can run afterwards.
pub struct PhaseSequencer {
    timeline: Timeline,
    epoch: Millis,
    current: usize,
    state: SequencerState,
    timers: TimerSet<usize>,
    on_phase: Option<PhaseFn>,
    on_complete: Option<CompleteFn>,
}

impl PhaseSequencer {
    /// Start a sequence whose epoch is `epoch`. The first phase is active immediately.
    pub fn start(timeline: Timeline, epoch: Millis) -> Self {
        let mut timers = TimerSet::new();
        if timeline.len() == 1 {
            // A lone phase is already terminal; complete at the epoch.
            timers.schedule(epoch, 0);
        } else {
            for (index, entry) in timeline.entries().iter().enumerate().skip(1) {
                timers.schedule(epoch + entry.at, index);
            }
        }
        tracing::debug!(
            phases = timeline.len(),
            epoch_ms = epoch.0,
            first = %timeline.entries()[0].phase,
            "sequencer started"
        );
        Self {
            timeline,
            epoch,
            current: 0,
            state: SequencerState::Running,
            timers,
            on_phase: None,
            on_complete: None,
        }
    }

    /// Listener invoked on every applied transition.
    pub fn with_on_phase(mut self, f: impl FnMut(&PhaseChange) + 'static) -> Self {
        self.on_phase = Some(Box::new(f));
        self
    }

    /// Callback invoked exactly once when the terminal phase is entered.
    pub fn with_on_complete(mut self, f: impl FnOnce(Millis) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Currently active entry.
    pub fn current(&self) -> &TimelineEntry {
        &self.timeline.entries()[self.current]
    }

    /// Index of the currently active entry.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Lifecycle state.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// True once the completion signal fired.
    pub fn is_complete(&self) -> bool {
        self.state == SequencerState::Completed
    }

    /// Start instant of the sequence.
    pub fn epoch(&self) -> Millis {
        self.epoch
    }

    /// The timeline being played.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Transitions still scheduled.
    pub fn pending_transitions(&self) -> usize {
        self.timers.len()
    }

    /// Revoke every pending transition and drop all callbacks. Idempotent.
    pub fn dispose(&mut self) {
        if self.state != SequencerState::Running {
            self.timers.cancel_all();
            self.on_phase = None;
            self.on_complete = None;
            return;
        }
        let revoked = self.timers.cancel_all();
        self.on_phase = None;
        self.on_complete = None;
        self.state = SequencerState::Disposed;
        tracing::debug!(
            revoked,
            phase = %self.current().phase,
            "sequencer disposed"
        );
    }

    fn enter(&mut self, index: usize, scheduled: Millis, now: Millis) {
        let change = PhaseChange {
            from: self.current,
            to: index,
            phase: self.timeline.entries()[index].phase.clone(),
            scheduled,
            applied: now,
        };
        self.current = index;
        tracing::debug!(
            from = %self.timeline.entries()[change.from].phase,
            to = %change.phase,
            scheduled_ms = scheduled.0,
            applied_ms = now.0,
            "phase transition"
        );
        if index != change.from
            && let Some(f) = self.on_phase.as_mut()
        {
            f(&change);
        }

        if self.timeline.is_terminal(index) {
            self.state = SequencerState::Completed;
            self.timers.cancel_all();
            self.on_phase = None;
            if let Some(f) = self.on_complete.take() {
                f(now);
            }
        }
    }
}

impl Scheduled for PhaseSequencer {
    fn next_deadline(&self) -> Option<Millis> {
        match self.state {
            SequencerState::Running => self.timers.next_due(),
            SequencerState::Completed | SequencerState::Disposed => None,
        }
    }

    fn advance_to(&mut self, now: Millis) {
        while self.state == SequencerState::Running {
            let Some((due, index)) = self.timers.pop_due(now) else {
                break;
            };
            // Strictly forward: a stale timer for an already-passed phase is dropped.
            if index < self.current || (index == self.current && index != 0) {
                continue;
            }
            self.enter(index, due, now);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/sequencer.rs"]
mod tests;
