pub(crate) mod particles;
pub(crate) mod starfield;
