use thiserror::Error;

/// Everything that can go wrong outside of a broken genome invariant. Broken invariants, like
/// a cycle reaching [crate::Network::evaluate], panic instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("expected {expected} input(s), got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("specie has no members")]
    EmptySpecie,

    #[error("population has no species left to reproduce from")]
    Extinct,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
