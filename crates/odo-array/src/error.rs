use std::{fmt, path::PathBuf};

use odo_base::TensorError;

#[derive(Debug)]
pub enum ArrayError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Format {
        path: PathBuf,
        message: String,
    },
    UnsupportedDtype(String),
    Tensor(TensorError),
}

impl ArrayError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArrayError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        ArrayError::Format {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayError::Io { path, source } => write!(f, "io error on {}: {source}", path.display()),
            ArrayError::Format { path, message } => {
                write!(f, "malformed array file {}: {message}", path.display())
            }
            ArrayError::UnsupportedDtype(name) => write!(f, "unsupported dtype: {name}"),
            ArrayError::Tensor(err) => write!(f, "tensor error: {err}"),
        }
    }
}

impl std::error::Error for ArrayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArrayError::Io { source, .. } => Some(source),
            ArrayError::Tensor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TensorError> for ArrayError {
    fn from(err: TensorError) -> Self {
        ArrayError::Tensor(err)
    }
}
