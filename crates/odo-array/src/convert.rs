use {
    crate::{ArrayError, DType, Element, codec::MappedArray},
    memmap2::MmapMut,
    ndarray::{ArrayViewD, ArrayViewMutD, IxDyn, Zip},
    ndarray_npy::{ViewMutNpyExt, write_zeroed_npy},
    std::{
        ffi::OsString,
        fs::{self, File, OpenOptions},
        path::{Path, PathBuf},
    },
};

/// Convert the `.npy` array at `path_in` to element type `dtype`, writing it
/// to `path_out` with the same shape and every value multiplied by `factor`.
///
/// Both files are memory-mapped, so the working set stays bounded no matter
/// how large the array is. Values are cast with `as` semantics before
/// scaling: integer narrowing wraps around, float to integer saturates and
/// maps NaN to zero. Scaling is skipped when `factor` is exactly 1.0, so a
/// same-dtype conversion reproduces the source values bit for bit.
///
/// The output is written to a temporary file beside `path_out` and renamed
/// over it once complete, so an existing `path_out` is never truncated, even
/// when it is a hard link to the input. On failure the temporary file is
/// removed and `path_out` is left as it was.
///
/// # Errors
///
/// Returns `ArrayError::Io` if either file cannot be opened, created or
/// mapped, and `ArrayError::Format` if the input is not a numeric
/// little-endian `.npy` array or `path_out` names the input file.
pub fn convert_large_array(
    path_in: impl AsRef<Path>,
    path_out: impl AsRef<Path>,
    dtype: DType,
    factor: f64,
) -> Result<(), ArrayError> {
    let (path_in, path_out) = (path_in.as_ref(), path_out.as_ref());
    let source = MappedArray::open(path_in)?;

    if same_file(path_in, path_out) {
        return Err(ArrayError::format(
            path_out,
            "output path is the input file; conversion is not in place",
        ));
    }

    log::info!(
        "converting {} ({} {:?}) to {} as {}, factor {}",
        path_in.display(),
        source.info.dtype,
        source.info.shape,
        path_out.display(),
        dtype,
        factor
    );

    with_dtype!(source.info.dtype, S => {
        with_dtype!(dtype, D => convert_typed::<S, D>(&source, path_out, factor))
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `<dir>/.<name>.<pid>.part` for `<dir>/<name>`.
fn partial_path(path_out: &Path) -> Result<PathBuf, ArrayError> {
    let name = path_out
        .file_name()
        .ok_or_else(|| ArrayError::format(path_out, "output path has no file name"))?;
    let mut partial = OsString::from(".");
    partial.push(name);
    partial.push(format!(".{}.part", std::process::id()));
    Ok(path_out.with_file_name(partial))
}

fn convert_typed<S: Element, D: Element>(
    source: &MappedArray,
    path_out: &Path,
    factor: f64,
) -> Result<(), ArrayError> {
    let input = source.view::<S>()?;
    let partial = partial_path(path_out)?;
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&partial)
        .map_err(|e| ArrayError::io(&partial, e))?;

    let result = fill::<S, D>(&file, &input, &partial, factor);
    drop(file);
    let result = result.and_then(|()| {
        fs::rename(&partial, path_out).map_err(|e| ArrayError::io(path_out, e))
    });
    if result.is_err() {
        fs::remove_file(&partial).ok();
    }
    result
}

fn fill<S: Element, D: Element>(
    file: &File,
    input: &ArrayViewD<'_, S>,
    path: &Path,
    factor: f64,
) -> Result<(), ArrayError> {
    write_zeroed_npy::<D, _>(file, IxDyn(input.shape()))
        .map_err(|e| ArrayError::format(path, e))?;

    // SAFETY: the output file was just created by this call and is not
    // shared; the map is dropped before returning.
    let mut map = unsafe { MmapMut::map_mut(file) }.map_err(|e| ArrayError::io(path, e))?;
    {
        let mut output = ArrayViewMutD::<D>::view_mut_npy(&mut map)
            .map_err(|e| ArrayError::format(path, e))?;
        let scale = factor != 1.0;
        Zip::from(&mut output).and(input).for_each(|out, &value| {
            let cast = D::cast_from(value);
            *out = if scale { cast.scale(factor) } else { cast };
        });
    }
    map.flush().map_err(|e| ArrayError::io(path, e))?;

    log::debug!("wrote {} elements to {}", input.len(), path.display());
    Ok(())
}
