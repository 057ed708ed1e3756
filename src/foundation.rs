pub(crate) mod core;
pub(crate) mod ease;
pub(crate) mod error;
pub(crate) mod rng;
