use {
    crate::ArrayError,
    ndarray_npy::{ViewElement, ViewMutElement, WritableElement},
    num_traits::AsPrimitive,
    std::{fmt, str::FromStr},
};

/// Element types an array file may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl DType {
    pub const ALL: [DType; 10] = [
        DType::I8,
        DType::U8,
        DType::I16,
        DType::U16,
        DType::I32,
        DType::U32,
        DType::I64,
        DType::U64,
        DType::F32,
        DType::F64,
    ];

    /// NumPy name, e.g. `float32`.
    pub fn name(self) -> &'static str {
        match self {
            DType::I8 => "int8",
            DType::U8 => "uint8",
            DType::I16 => "int16",
            DType::U16 => "uint16",
            DType::I32 => "int32",
            DType::U32 => "uint32",
            DType::I64 => "int64",
            DType::U64 => "uint64",
            DType::F32 => "float32",
            DType::F64 => "float64",
        }
    }

    /// Little-endian `.npy` type descriptor, e.g. `<f4`.
    pub fn descr(self) -> &'static str {
        match self {
            DType::I8 => "|i1",
            DType::U8 => "|u1",
            DType::I16 => "<i2",
            DType::U16 => "<u2",
            DType::I32 => "<i4",
            DType::U32 => "<u4",
            DType::I64 => "<i8",
            DType::U64 => "<u8",
            DType::F32 => "<f4",
            DType::F64 => "<f8",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts NumPy names (`float32`), Rust names (`f32`) and descriptors (`<f4`).
impl FromStr for DType {
    type Err = ArrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DType::ALL
            .into_iter()
            .find(|dtype| {
                let descr = dtype.descr();
                s == dtype.name() || s == dtype.rust_name() || s == descr || s == &descr[1..]
            })
            .ok_or_else(|| ArrayError::UnsupportedDtype(s.to_string()))
    }
}

impl DType {
    fn rust_name(self) -> &'static str {
        with_dtype!(self, T => std::any::type_name::<T>())
    }
}

/// A primitive numeric type that can be viewed in, and written to, an
/// array file, and cast to and from every other supported type.
///
/// Casts follow `as` semantics: integer narrowing wraps, float to integer
/// saturates at the target bounds and maps NaN to zero.
pub trait Element:
    Copy
    + Default
    + PartialEq
    + fmt::Debug
    + Send
    + Sync
    + 'static
    + ViewElement
    + ViewMutElement
    + WritableElement
    + AsPrimitive<i8>
    + AsPrimitive<u8>
    + AsPrimitive<i16>
    + AsPrimitive<u16>
    + AsPrimitive<i32>
    + AsPrimitive<u32>
    + AsPrimitive<i64>
    + AsPrimitive<u64>
    + AsPrimitive<f32>
    + AsPrimitive<f64>
{
    const DTYPE: DType;

    fn cast_from<S: Element>(value: S) -> Self;

    /// `self * factor`, computed in f64 and cast back.
    fn scale(self, factor: f64) -> Self;
}

macro_rules! element {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            fn cast_from<S: Element>(value: S) -> Self {
                <S as AsPrimitive<$ty>>::as_(value)
            }

            fn scale(self, factor: f64) -> Self {
                let scaled = <$ty as AsPrimitive<f64>>::as_(self) * factor;
                <f64 as AsPrimitive<$ty>>::as_(scaled)
            }
        }
    };
}

element!(i8, DType::I8);
element!(u8, DType::U8);
element!(i16, DType::I16);
element!(u16, DType::U16);
element!(i32, DType::I32);
element!(u32, DType::U32);
element!(i64, DType::I64);
element!(u64, DType::U64);
element!(f32, DType::F32);
element!(f64, DType::F64);
