pub(crate) mod looks;
pub(crate) mod sequencer;
pub(crate) mod timeline;
