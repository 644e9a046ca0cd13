//! Wave geometry: generation, parsing and blending of wave outlines.

pub(crate) mod codec;
pub(crate) mod generate;
pub(crate) mod interpolate;
