use tb_core::{BlasError, Transpose, Uplo};

/// Status codes returned by all FFI functions.
///
/// There is no process-wide error code: every call returns its own status,
/// and concurrent calls on different threads are independent. A message
/// describing the most recent failure on the calling thread is available
/// through `tb_last_error`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TbStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorUnsupportedFeature = 2,
    ErrorExecutionFault = 3,
    ErrorOutOfMemory = 4,
    ErrorInternal = 5,
}

impl From<&BlasError> for TbStatus {
    fn from(e: &BlasError) -> Self {
        match e {
            BlasError::InvalidArgument { .. } => TbStatus::ErrorInvalidArgument,
            BlasError::UnsupportedFeature { .. } => TbStatus::ErrorUnsupportedFeature,
            BlasError::ExecutionFault(_) => TbStatus::ErrorExecutionFault,
            BlasError::OutOfMemory(_) => TbStatus::ErrorOutOfMemory,
            BlasError::Internal(_) => TbStatus::ErrorInternal,
        }
    }
}

/// Compute backend selector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TbBackend {
    Cpu = 0,
    Accelerator = 1,
}

/// Triangle selector, diagonal inclusive.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TbUplo {
    Upper = 0,
    Lower = 1,
}

impl From<TbUplo> for Uplo {
    fn from(u: TbUplo) -> Self {
        match u {
            TbUplo::Upper => Uplo::Upper,
            TbUplo::Lower => Uplo::Lower,
        }
    }
}

/// Operand orientation selector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TbTranspose {
    NoTrans = 0,
    Trans = 1,
    ConjTrans = 2,
}

impl From<TbTranspose> for Transpose {
    fn from(t: TbTranspose) -> Self {
        match t {
            TbTranspose::NoTrans => Transpose::NoTrans,
            TbTranspose::Trans => Transpose::Trans,
            TbTranspose::ConjTrans => Transpose::ConjTrans,
        }
    }
}
