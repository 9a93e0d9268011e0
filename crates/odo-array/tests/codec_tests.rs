use odo_array::{ArrayCodec, ArrayError, ArrayInfo, DType, NpyCodec};
use odo_base::Tensor;
use std::{fs, path::PathBuf};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("odo-codec-{}-{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_save_then_load_same_type() {
    let dir = scratch_dir("same");
    let path = dir.join("frames.npy");
    let frames = Tensor::new(vec![2, 2, 1, 3], (0..12).map(|v| v as f32 * 0.5).collect()).unwrap();

    NpyCodec.save(&path, &frames).unwrap();
    let loaded: Tensor<f32> = NpyCodec.load(&path).unwrap();
    assert_eq!(loaded, frames);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_casts_to_requested_type() {
    let dir = scratch_dir("cast");
    let path = dir.join("images.npy");
    let images = Tensor::new(vec![1, 2, 2, 1], vec![0u8, 17, 128, 255]).unwrap();

    NpyCodec.save(&path, &images).unwrap();
    let loaded: Tensor<f32> = NpyCodec.load(&path).unwrap();
    assert_eq!(loaded.shape, vec![1, 2, 2, 1]);
    assert_eq!(loaded.data, vec![0.0, 17.0, 128.0, 255.0]);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_info_reports_dtype_and_shape() {
    let dir = scratch_dir("info");
    let path = dir.join("poses.npy");
    let poses = Tensor::new(vec![3, 7], vec![0.0f64; 21]).unwrap();

    NpyCodec.save(&path, &poses).unwrap();
    assert_eq!(
        NpyCodec.info(&path).unwrap(),
        ArrayInfo {
            dtype: DType::F64,
            shape: vec![3, 7]
        }
    );
    assert_eq!(NpyCodec.dtype(&path).unwrap(), DType::F64);
    assert_eq!(NpyCodec.shape(&path).unwrap(), vec![3, 7]);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_info_distinguishes_same_width_types() {
    let dir = scratch_dir("width");
    let ints = dir.join("ints.npy");
    let floats = dir.join("floats.npy");
    NpyCodec.save(&ints, &Tensor::new(vec![2], vec![1i32, 2]).unwrap()).unwrap();
    NpyCodec.save(&floats, &Tensor::new(vec![2], vec![1.0f32, 2.0]).unwrap()).unwrap();

    assert_eq!(NpyCodec.dtype(&ints).unwrap(), DType::I32);
    assert_eq!(NpyCodec.dtype(&floats).unwrap(), DType::F32);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_missing_file_reports_path() {
    let path = std::env::temp_dir().join("odo-codec-definitely-missing.npy");
    let err = NpyCodec.load::<f32>(&path).unwrap_err();
    match &err {
        ArrayError::Io { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("expected io error, got {other:?}"),
    }
    assert!(err.to_string().contains("odo-codec-definitely-missing.npy"));
}

#[test]
fn test_load_malformed_file() {
    let dir = scratch_dir("malformed");
    let path = dir.join("garbage.npy");
    fs::write(&path, b"this is not an array container").unwrap();

    let err = NpyCodec.load::<f64>(&path).unwrap_err();
    assert!(matches!(err, ArrayError::Format { .. }));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_dtype_parsing() {
    assert_eq!("float32".parse::<DType>().unwrap(), DType::F32);
    assert_eq!("f64".parse::<DType>().unwrap(), DType::F64);
    assert_eq!("<u2".parse::<DType>().unwrap(), DType::U16);
    assert_eq!("u1".parse::<DType>().unwrap(), DType::U8);
    assert_eq!("uint8".parse::<DType>().unwrap(), DType::U8);
    assert!(matches!(
        "complex128".parse::<DType>(),
        Err(ArrayError::UnsupportedDtype(_))
    ));
}

#[test]
fn test_dtype_display_is_numpy_name() {
    assert_eq!(DType::I64.to_string(), "int64");
    assert_eq!(DType::U8.descr(), "|u1");
}
