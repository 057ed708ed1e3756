pub(crate) mod cursor;
pub(crate) mod regions;
