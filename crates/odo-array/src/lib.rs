//! Typed N-dimensional array files for the odometry pipeline.
//!
//! Arrays live on disk as little-endian `.npy` containers. [`NpyCodec`]
//! loads them into [`odo_base::Tensor`] (casting to the requested element
//! type) and writes tensors back; [`convert_large_array`] changes the element
//! type of arrays too large for memory by streaming through memory maps.

/// Run `$body` with `$t` bound to the Rust element type of a runtime [`DType`].
macro_rules! with_dtype {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype {
            $crate::DType::I8 => {
                type $t = i8;
                $body
            }
            $crate::DType::U8 => {
                type $t = u8;
                $body
            }
            $crate::DType::I16 => {
                type $t = i16;
                $body
            }
            $crate::DType::U16 => {
                type $t = u16;
                $body
            }
            $crate::DType::I32 => {
                type $t = i32;
                $body
            }
            $crate::DType::U32 => {
                type $t = u32;
                $body
            }
            $crate::DType::I64 => {
                type $t = i64;
                $body
            }
            $crate::DType::U64 => {
                type $t = u64;
                $body
            }
            $crate::DType::F32 => {
                type $t = f32;
                $body
            }
            $crate::DType::F64 => {
                type $t = f64;
                $body
            }
        }
    };
}

pub mod codec;
pub mod convert;
pub mod dtype;
pub mod error;

pub use codec::{ArrayCodec, ArrayInfo, NpyCodec};
pub use convert::convert_large_array;
pub use dtype::{DType, Element};
pub use error::ArrayError;
