pub(crate) mod tiles;
