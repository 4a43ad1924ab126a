pub(crate) mod paint;
pub(crate) mod surface;
