use std::{cell::Cell, rc::Rc};

/// Shared, single-threaded cancellation flag.
///
/// Clones observe the same flag. Once cancelled a token stays cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Rc<Cell<bool>>,
}

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.set(true);
    }

    /// Whether cancellation was requested through any clone.
    pub fn is_cancelled(&self) -> bool {
        self.flag.get()
    }
}
