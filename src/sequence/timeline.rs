use std::collections::HashSet;

use crate::foundation::{
    core::Millis,
    error::{CineError, CineResult},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One phase of a timeline and its start offset from the sequence epoch.
pub struct TimelineEntry {
    /// Phase label. Labels are presentation data; any non-empty unique string works.
    pub phase: String,
    /// Offset from the sequence start.
    pub at: Millis,
}

impl TimelineEntry {
    /// Convenience constructor.
    pub fn new(phase: impl Into<String>, at: Millis) -> Self {
        Self {
            phase: phase.into(),
            at,
        }
    }
}

/// Validated, ordered phase timeline.
///
/// The first entry starts at offset 0, offsets strictly increase, labels are unique, and
/// the last entry is the terminal phase.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// Validate `entries` and build a timeline.
    pub fn new(entries: Vec<TimelineEntry>) -> CineResult<Self> {
        Self::check(&entries)?;
        Ok(Self { entries })
    }

    /// Build from entries already known to satisfy [`Timeline::new`]'s rules.
    pub(crate) fn from_checked(entries: Vec<TimelineEntry>) -> Self {
        debug_assert!(Self::check(&entries).is_ok(), "built-in timeline is invalid");
        Self { entries }
    }

    fn check(entries: &[TimelineEntry]) -> CineResult<()> {
        let Some(first) = entries.first() else {
            return Err(CineError::validation("timeline must have at least one phase"));
        };
        if first.at != Millis::ZERO {
            return Err(CineError::validation(format!(
                "first phase '{}' must start at offset 0",
                first.phase
            )));
        }

        let mut seen = HashSet::new();
        for e in entries {
            if e.phase.trim().is_empty() {
                return Err(CineError::validation("phase label must be non-empty"));
            }
            if !seen.insert(e.phase.as_str()) {
                return Err(CineError::validation(format!(
                    "phase '{}' appears more than once",
                    e.phase
                )));
            }
        }
        for w in entries.windows(2) {
            if w[1].at <= w[0].at {
                return Err(CineError::validation(format!(
                    "phase '{}' (at {}ms) must start after '{}' (at {}ms)",
                    w[1].phase, w[1].at.0, w[0].phase, w[0].at.0
                )));
            }
        }
        Ok(())
    }

    /// Build from `(label, offset_ms)` pairs.
    pub fn from_pairs<S: Into<String>>(
        pairs: impl IntoIterator<Item = (S, u64)>,
    ) -> CineResult<Self> {
        Self::new(
            pairs
                .into_iter()
                .map(|(p, at)| TimelineEntry::new(p, Millis(at)))
                .collect(),
        )
    }

    /// All entries in order.
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&TimelineEntry> {
        self.entries.get(index)
    }

    /// Number of phases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a validated timeline.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the terminal phase.
    pub fn terminal_index(&self) -> usize {
        self.entries.len() - 1
    }

    /// Whether `index` names the terminal phase.
    pub fn is_terminal(&self, index: usize) -> bool {
        index == self.terminal_index()
    }

    /// Index of the phase labelled `phase`.
    pub fn index_of(&self, phase: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.phase == phase)
    }

    /// Offset of the terminal phase, i.e. the sequence length.
    pub fn duration(&self) -> Millis {
        self.entries[self.terminal_index()].at
    }

    /// Index of the phase active `elapsed` after the epoch.
    pub fn phase_at(&self, elapsed: Millis) -> usize {
        self.entries
            .partition_point(|e| e.at <= elapsed)
            .saturating_sub(1)
    }
}

impl<'de> serde::Deserialize<'de> for Timeline {
    fn deserialize<D: serde::Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let entries = Vec::<TimelineEntry>::deserialize(de)?;
        Timeline::new(entries).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/timeline.rs"]
mod tests;
