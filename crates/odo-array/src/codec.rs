use {
    crate::{ArrayError, DType, Element},
    memmap2::Mmap,
    ndarray::{ArrayViewD, IxDyn},
    ndarray_npy::{ViewNpyExt, WriteNpyExt},
    odo_base::Tensor,
    std::{
        fs::File,
        io::{BufWriter, Write},
        path::{Path, PathBuf},
    },
};

/// Element type and shape of an array file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayInfo {
    pub dtype: DType,
    pub shape: Vec<usize>,
}

/// Storage for typed N-dimensional arrays.
///
/// Implementations decide the container format; callers only see tensors,
/// element types and shapes.
pub trait ArrayCodec {
    /// Load the array at `path`, casting every element to `T`.
    fn load<T: Element>(&self, path: &Path) -> Result<Tensor<T>, ArrayError>;

    /// Write `tensor` to `path`, replacing any existing file.
    fn save<T: Element>(&self, path: &Path, tensor: &Tensor<T>) -> Result<(), ArrayError>;

    /// Element type and shape without reading the data.
    fn info(&self, path: &Path) -> Result<ArrayInfo, ArrayError>;

    fn dtype(&self, path: &Path) -> Result<DType, ArrayError> {
        Ok(self.info(path)?.dtype)
    }

    fn shape(&self, path: &Path) -> Result<Vec<usize>, ArrayError> {
        Ok(self.info(path)?.shape)
    }
}

/// `.npy` files, read through a memory map.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpyCodec;

impl ArrayCodec for NpyCodec {
    fn load<T: Element>(&self, path: &Path) -> Result<Tensor<T>, ArrayError> {
        let mapped = MappedArray::open(path)?;
        let data: Vec<T> = with_dtype!(mapped.info.dtype, S => {
            mapped.view::<S>()?.iter().map(|&value| T::cast_from(value)).collect()
        });
        log::debug!(
            "loaded {} as {} ({} elements, shape {:?})",
            path.display(),
            T::DTYPE,
            data.len(),
            mapped.info.shape
        );
        Ok(Tensor::new(mapped.info.shape.clone(), data)?)
    }

    fn save<T: Element>(&self, path: &Path, tensor: &Tensor<T>) -> Result<(), ArrayError> {
        let view = ArrayViewD::from_shape(IxDyn(&tensor.shape), &tensor.data)
            .map_err(|e| ArrayError::format(path, e))?;
        let file = File::create(path).map_err(|e| ArrayError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        view.write_npy(&mut writer)
            .map_err(|e| ArrayError::format(path, e))?;
        writer.flush().map_err(|e| ArrayError::io(path, e))
    }

    fn info(&self, path: &Path) -> Result<ArrayInfo, ArrayError> {
        Ok(MappedArray::open(path)?.info)
    }
}

/// A read-only memory map of an `.npy` file whose element type is known.
pub(crate) struct MappedArray {
    path: PathBuf,
    map: Mmap,
    pub(crate) info: ArrayInfo,
}

impl MappedArray {
    pub(crate) fn open(path: &Path) -> Result<Self, ArrayError> {
        let file = File::open(path).map_err(|e| ArrayError::io(path, e))?;
        // SAFETY: the file is only read through this map; concurrent writers
        // to the same path are not supported.
        let map = unsafe { Mmap::map(&file) }.map_err(|e| ArrayError::io(path, e))?;
        let info = probe_all(&map).ok_or_else(|| {
            ArrayError::format(path, "not a little-endian numeric .npy array")
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            map,
            info,
        })
    }

    pub(crate) fn view<S: Element>(&self) -> Result<ArrayViewD<'_, S>, ArrayError> {
        ArrayViewD::<S>::view_npy(&self.map).map_err(|e| ArrayError::format(&self.path, e))
    }
}

fn probe<S: Element>(bytes: &[u8]) -> Option<Vec<usize>> {
    ArrayViewD::<S>::view_npy(bytes)
        .ok()
        .map(|view| view.shape().to_vec())
}

/// The header descriptor matches exactly one element type; views fail for the others.
fn probe_all(bytes: &[u8]) -> Option<ArrayInfo> {
    DType::ALL.into_iter().find_map(|dtype| {
        with_dtype!(dtype, S => probe::<S>(bytes)).map(|shape| ArrayInfo { dtype, shape })
    })
}
