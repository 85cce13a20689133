use thiserror::Error;

/// Faults that can surface from a tileblas call.
///
/// `InvalidArgument` is raised only by the wrapper layer before any kernel
/// is dispatched; the argument index follows the classical BLAS convention
/// of numbering the routine's parameters from one. The remaining variants
/// can occur once a call is in flight; none are retried, and a fault leaves
/// the destination storage in an unspecified state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlasError {
    #[error("{routine}: invalid argument {index}")]
    InvalidArgument { routine: &'static str, index: usize },
    #[error("{routine}: unsupported feature: {detail}")]
    UnsupportedFeature {
        routine: &'static str,
        detail: &'static str,
    },
    #[error("execution fault: {0}")]
    ExecutionFault(String),
    #[error("scratch allocation failed for {0}")]
    OutOfMemory(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl BlasError {
    /// Invalid-argument error for parameter `index` (one-based) of `routine`.
    pub fn invalid_argument(routine: &'static str, index: usize) -> Self {
        BlasError::InvalidArgument { routine, index }
    }

    /// A structurally valid request with no implemented code path.
    pub fn unsupported(routine: &'static str, detail: &'static str) -> Self {
        BlasError::UnsupportedFeature { routine, detail }
    }
}

pub type Result<T> = std::result::Result<T, BlasError>;
