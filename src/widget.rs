//! Host-facing widget glue: settings, markup and the attach/detach lifecycle.

pub(crate) mod instance;
pub(crate) mod settings;
pub(crate) mod svg;
