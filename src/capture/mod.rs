pub(crate) mod buffer;
pub(crate) mod color;
pub(crate) mod fallback;
pub(crate) mod rasterizer;
pub(crate) mod text;
