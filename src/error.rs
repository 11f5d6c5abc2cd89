use thiserror::Error;

/// Errors raised while building or querying models.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NgramError {
    /// Bad hyperparameters or model order. Fatal at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A query violated its contract, e.g. a context of the wrong length.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Not enough sentences to estimate something (e.g. empty held-out set).
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    /// The generator reached a context it never saw during training.
    #[error("no continuations for context {0:?}")]
    UnreachableContext(Vec<String>),
    /// Every candidate path had probability zero.
    #[error("no path with nonzero probability")]
    NoViablePath,
}

pub type Result<T> = std::result::Result<T, NgramError>;
