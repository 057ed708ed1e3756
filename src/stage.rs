pub(crate) mod intro;
pub(crate) mod warp;
