use crate::{
    assets::fetch::{AssetFetcher, Settle},
    foundation::core::Millis,
    timing::{clock::Scheduled, timers::TimerSet},
};

/// Load state of one reference while preloading is in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleState {
    /// Attempt still in flight.
    Pending,
    /// Attempt finished successfully.
    Loaded,
    /// Attempt finished with an error.
    Failed,
}

impl From<Settle> for SettleState {
    fn from(s: Settle) -> Self {
        match s {
            Settle::Loaded => Self::Loaded,
            Settle::Failed => Self::Failed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// One reference and its settle state.
pub struct AssetRecord {
    /// Reference as supplied by the caller.
    pub reference: String,
    /// Current state.
    pub state: SettleState,
}

/// Why the ready signal fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyCause {
    /// Every reference settled (or there were none).
    AllSettled,
    /// The timeout elapsed with references still pending.
    TimedOut,
}

/// Summary handed to the ready callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PreloadReport {
    /// What released the gate.
    pub cause: ReadyCause,
    /// Instant the ready signal fired.
    pub at: Millis,
    /// References that loaded before the signal.
    pub loaded: usize,
    /// References that failed before the signal.
    pub failed: usize,
    /// Number of references requested.
    pub total: usize,
}

type ReadyFn = Box<dyn FnOnce(&PreloadReport)>;

/// Bounded image preloader.
///
/// Fires its ready signal exactly once: when `loaded + failed == total`, or when the
/// timeout elapses, whichever comes first. Failures count as settled. After the signal
/// (or after [`AssetPreloader::dispose`]) no further event mutates the preloader.
pub struct AssetPreloader<F> {
    fetcher: F,
    records: Vec<AssetRecord>,
    loaded: usize,
    failed: usize,
    total: usize,
    started_at: Millis,
    timeout: TimerSet<()>,
    on_ready: Option<ReadyFn>,
    report: Option<PreloadReport>,
    disposed: bool,
    scratch: Vec<(usize, Settle)>,
}

impl<F: AssetFetcher> AssetPreloader<F> {
    /// Begin loading every reference at `now`, giving up after `timeout`.
    ///
    /// Duplicate references are attempted (and counted) independently.
    pub fn start<I, S>(references: I, timeout: Millis, now: Millis, mut fetcher: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records: Vec<AssetRecord> = references
            .into_iter()
            .map(|r| AssetRecord {
                reference: r.into(),
                state: SettleState::Pending,
            })
            .collect();
        for (index, rec) in records.iter().enumerate() {
            fetcher.begin(index, &rec.reference);
        }

        let mut timers = TimerSet::new();
        timers.schedule(now + timeout, ());

        let total = records.len();
        tracing::debug!(total, timeout_ms = timeout.0, "preload started");

        let mut out = Self {
            fetcher,
            records,
            loaded: 0,
            failed: 0,
            total,
            started_at: now,
            timeout: timers,
            on_ready: None,
            report: None,
            disposed: false,
            scratch: Vec::new(),
        };
        if total == 0 {
            out.fire(ReadyCause::AllSettled, now);
        }
        out
    }

    /// Install the ready callback.
    ///
    /// If the preloader is already ready (empty reference list) the callback runs
    /// immediately.
    pub fn with_on_ready(mut self, f: impl FnOnce(&PreloadReport) + 'static) -> Self {
        match self.report {
            Some(report) if !self.disposed => f(&report),
            Some(_) => {}
            None if !self.disposed => self.on_ready = Some(Box::new(f)),
            None => {}
        }
        self
    }

    /// Record that attempt `index` settled with `outcome` at `now`.
    ///
    /// Ignored for unknown indices, already-settled attempts, and after the ready
    /// signal or disposal.
    pub fn settle(&mut self, index: usize, outcome: Settle, now: Millis) {
        if self.report.is_some() || self.disposed {
            return;
        }
        let Some(rec) = self.records.get_mut(index) else {
            return;
        };
        if rec.state != SettleState::Pending {
            return;
        }
        rec.state = outcome.into();
        match outcome {
            Settle::Loaded => self.loaded += 1,
            Settle::Failed => self.failed += 1,
        }
        tracing::debug!(
            index,
            ?outcome,
            settled = self.loaded + self.failed,
            total = self.total,
            "asset settled"
        );
        if self.loaded + self.failed == self.total {
            self.fire(ReadyCause::AllSettled, now);
        }
    }

    fn fire(&mut self, cause: ReadyCause, now: Millis) {
        let report = PreloadReport {
            cause,
            at: now,
            loaded: self.loaded,
            failed: self.failed,
            total: self.total,
        };
        self.report = Some(report);
        self.timeout.cancel_all();
        self.records = Vec::new();
        tracing::debug!(
            ?cause,
            waited_ms = now.since(self.started_at).0,
            loaded = report.loaded,
            failed = report.failed,
            "preload ready"
        );
        if let Some(f) = self.on_ready.take() {
            f(&report);
        }
    }

    /// Stop listening for settle events and drop the ready callback. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.on_ready = None;
        self.timeout.cancel_all();
    }

    /// Whether the ready signal has fired.
    pub fn is_ready(&self) -> bool {
        self.report.is_some()
    }

    /// Whether [`AssetPreloader::dispose`] was called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Report of the ready signal, once it fired.
    pub fn report(&self) -> Option<&PreloadReport> {
        self.report.as_ref()
    }

    /// Per-reference records; empty once preloading is over.
    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    /// References settled so far.
    pub fn settled(&self) -> usize {
        self.loaded + self.failed
    }

    /// Number of references requested.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Access the fetcher (e.g. to read decoded images).
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Consume the preloader, returning its fetcher.
    pub fn into_fetcher(self) -> F {
        self.fetcher
    }
}

impl<F: AssetFetcher> Scheduled for AssetPreloader<F> {
    fn next_deadline(&self) -> Option<Millis> {
        if self.disposed || self.report.is_some() {
            return None;
        }
        self.timeout.next_due()
    }

    fn advance_to(&mut self, now: Millis) {
        if self.disposed || self.report.is_some() {
            return;
        }

        let mut settled = std::mem::take(&mut self.scratch);
        self.fetcher.poll_settled(&mut settled);
        for (index, outcome) in settled.drain(..) {
            self.settle(index, outcome, now);
        }
        self.scratch = settled;

        if self.report.is_none() && self.timeout.pop_due(now).is_some() {
            self.fire(ReadyCause::TimedOut, now);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/preload.rs"]
mod tests;
