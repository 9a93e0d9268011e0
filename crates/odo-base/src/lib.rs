//! Shared primitives for the odometry data pipeline: a flat row-major
//! `Tensor<T>`, the rotation math needed to convert poses, and `log`-crate
//! loggers used by the binaries.

pub mod logging;
pub mod quat;
pub mod tensor;
pub mod vec3;

pub use logging::{FileLogger, StdoutLogger, init_file_logger, init_stdout_logger};
pub use quat::Quat;
pub use tensor::{Tensor, TensorError};
pub use vec3::Vec3;

// Re-export log crate so downstream crates can use odo_base::log::*
pub use log;
