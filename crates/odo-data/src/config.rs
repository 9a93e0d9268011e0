use {
    crate::DataError,
    serde::Deserialize,
    std::{
        fs::File,
        io::BufReader,
        path::{Path, PathBuf},
    },
};

/// Where the training arrays live and how to batch them.
///
/// Every field has a default, so a JSON file only needs the fields it
/// changes:
///
/// ```json
/// { "frame_path": "kitti/images.npy", "batch_size": 32, "seq_len": 3 }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    frame_path: PathBuf,
    pose_path: PathBuf,
    batch_size: usize,
    seq_len: usize,
    convert_quaternions: bool,
    subtract_mean: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            frame_path: PathBuf::from("data/images.npy"),
            pose_path: PathBuf::from("data/poses.npy"),
            batch_size: 100,
            seq_len: 2,
            convert_quaternions: false,
            subtract_mean: false,
        }
    }
}

impl BatchConfig {
    /// Read and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| DataError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| DataError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| DataError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.batch_size == 0 {
            return Err(DataError::Config("batch_size must be at least 1".to_string()));
        }
        if self.seq_len == 0 {
            return Err(DataError::Config("seq_len must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Set the path of the (N, H, W, C) frame array.
    pub fn with_frame_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.frame_path = path.into();
        self
    }

    /// Set the path of the (N, 6) or (N, 7) pose array.
    pub fn with_pose_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pose_path = path.into();
        self
    }

    /// Set the number of examples per batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the number of frames stacked into one example.
    pub fn with_seq_len(mut self, seq_len: usize) -> Self {
        self.seq_len = seq_len;
        self
    }

    /// Convert quaternion poses to Euler angles after loading.
    pub fn with_convert_quaternions(mut self, convert: bool) -> Self {
        self.convert_quaternions = convert;
        self
    }

    /// Subtract per-channel means from the frames after loading.
    pub fn with_subtract_mean(mut self, subtract: bool) -> Self {
        self.subtract_mean = subtract;
        self
    }

    // Getters
    pub fn frame_path(&self) -> &Path {
        &self.frame_path
    }

    pub fn pose_path(&self) -> &Path {
        &self.pose_path
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn convert_quaternions(&self) -> bool {
        self.convert_quaternions
    }

    pub fn subtract_mean(&self) -> bool {
        self.subtract_mean
    }
}
