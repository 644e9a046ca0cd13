/// Convenience result type used across dynawave.
pub type DynawaveResult<T> = Result<T, DynawaveError>;

#[derive(thiserror::Error, Debug)]
pub enum DynawaveError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("point mismatch: {from} points cannot blend into {to} points")]
    PointMismatch {
        from: usize,
        to: usize,
    },

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DynawaveError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
