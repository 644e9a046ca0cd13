//! Frame-driven sequencing of wave transitions.

pub(crate) mod host;
pub(crate) mod sequencer;
