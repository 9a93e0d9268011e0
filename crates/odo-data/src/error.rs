use std::fmt;

use odo_array::ArrayError;
use odo_base::TensorError;

#[derive(Debug)]
pub enum DataError {
    /// Frame and pose sequences disagree on their length.
    ShapeMismatch { frames: usize, poses: usize },
    InvalidShape(String),
    InvalidArgument(String),
    Config(String),
    Array(ArrayError),
    Tensor(TensorError),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::ShapeMismatch { frames, poses } => {
                write!(f, "shape mismatch: {frames} frames but {poses} poses")
            }
            DataError::InvalidShape(msg) => write!(f, "invalid shape: {msg}"),
            DataError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            DataError::Config(msg) => write!(f, "config error: {msg}"),
            DataError::Array(err) => write!(f, "array error: {err}"),
            DataError::Tensor(err) => write!(f, "tensor error: {err}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Array(err) => Some(err),
            DataError::Tensor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArrayError> for DataError {
    fn from(err: ArrayError) -> Self {
        DataError::Array(err)
    }
}

impl From<TensorError> for DataError {
    fn from(err: TensorError) -> Self {
        DataError::Tensor(err)
    }
}
