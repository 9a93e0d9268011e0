use {
    crate::{
        BatchConfig, DataError,
        pose::{QUATERNION_POSE_WIDTH, pose_width, quaternion_poses_to_euler},
        stack::{FrameShape, stack_into},
    },
    odo_array::{ArrayCodec, NpyCodec},
    odo_base::Tensor,
    std::path::Path,
};

/// Batches of stacked frame windows and the pose change across each window.
///
/// Example `e` of a batch starting at frame `offset` stacks frames
/// `offset + e .. offset + e + seq_len` along the channel axis (oldest
/// first) and pairs them with `pose[offset + e + seq_len - 1] - pose[offset + e]`.
/// Examples within a batch slide by one frame; consecutive batches start
/// `batch_size + seq_len - 1` frames apart, so no batch reuses frames of
/// another. Frames left over after the last full batch are dropped.
///
/// The stacked images are written into one buffer allocated at construction
/// and overwritten by every step. [`Batch`] borrows that buffer, so a batch
/// must be dropped (or copied with [`Batch::into_owned`]) before the next
/// step; [`BatchManager::owned_batches`] copies every batch for you.
#[derive(Debug)]
pub struct BatchManager {
    frames: Tensor<f32>,
    poses: Tensor<f64>,
    shape: FrameShape,
    batch_size: usize,
    seq_len: usize,
    add_frames: usize,
    base_indices: Vec<usize>,
    global_indices: Vec<usize>,
    buffer: Tensor<f32>,
}

impl BatchManager {
    /// Load frames and poses from `.npy` files.
    pub fn new(
        frame_path: impl AsRef<Path>,
        pose_path: impl AsRef<Path>,
        batch_size: usize,
        seq_len: usize,
    ) -> Result<Self, DataError> {
        Self::with_codec(&NpyCodec, frame_path, pose_path, batch_size, seq_len)
    }

    /// Load frames and poses through any array codec.
    pub fn with_codec<C: ArrayCodec>(
        codec: &C,
        frame_path: impl AsRef<Path>,
        pose_path: impl AsRef<Path>,
        batch_size: usize,
        seq_len: usize,
    ) -> Result<Self, DataError> {
        let frames = codec.load::<f32>(frame_path.as_ref())?;
        let poses = codec.load::<f64>(pose_path.as_ref())?;
        log::info!(
            "loaded frames {:?} from {} and poses {:?} from {}",
            frames.shape,
            frame_path.as_ref().display(),
            poses.shape,
            pose_path.as_ref().display()
        );
        Self::from_tensors(frames, poses, batch_size, seq_len)
    }

    /// Load the arrays named by `config`, applying its batch parameters.
    ///
    /// Preprocessing flags in the config are left to the caller.
    pub fn from_config(config: &BatchConfig) -> Result<Self, DataError> {
        config.validate()?;
        Self::new(
            config.frame_path(),
            config.pose_path(),
            config.batch_size(),
            config.seq_len(),
        )
    }

    /// Build from in-memory (N, H, W, C) frames and (N, 6|7) poses.
    pub fn from_tensors(
        frames: Tensor<f32>,
        poses: Tensor<f64>,
        batch_size: usize,
        seq_len: usize,
    ) -> Result<Self, DataError> {
        if batch_size == 0 {
            return Err(DataError::InvalidArgument(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if seq_len == 0 {
            return Err(DataError::InvalidArgument(
                "seq_len must be at least 1".to_string(),
            ));
        }
        let (count, shape) = FrameShape::of(&frames)?;
        pose_width(&poses)?;
        if poses.items() != count {
            return Err(DataError::ShapeMismatch {
                frames: count,
                poses: poses.items(),
            });
        }

        let add_frames = seq_len - 1;
        let window = batch_size + add_frames;
        let buffer = Tensor::zeros(shape.stacked_shape(batch_size, seq_len))?;
        log::debug!(
            "batch buffer {:?}, window of {window} frames, {} batches",
            buffer.shape,
            count / window
        );

        Ok(Self {
            frames,
            poses,
            shape,
            batch_size,
            seq_len,
            add_frames,
            base_indices: (0..window).collect(),
            global_indices: vec![0; window],
            buffer,
        })
    }

    /// (H, W, C) of a single frame.
    pub fn image_shape(&self) -> (usize, usize, usize) {
        (self.shape.height, self.shape.width, self.shape.channels)
    }

    /// Whether poses are stored as quaternion + translation (width 7).
    pub fn pose_has_quaternion(&self) -> bool {
        self.poses.shape[1] == QUATERNION_POSE_WIDTH
    }

    /// Replace quaternion poses by roll/pitch/yaw + translation.
    ///
    /// Does nothing if the poses are already Euler.
    pub fn convert_poses_to_euler(&mut self) -> Result<(), DataError> {
        if !self.pose_has_quaternion() {
            log::debug!("poses already in Euler form");
            return Ok(());
        }
        self.poses = quaternion_poses_to_euler(&self.poses)?;
        log::info!("converted {} poses to Euler angles", self.poses.items());
        Ok(())
    }

    /// Number of frames (and poses).
    pub fn len(&self) -> usize {
        self.frames.items()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Frames needed beyond `batch_size` to complete the last window.
    pub fn add_frames(&self) -> usize {
        self.add_frames
    }

    /// Frames consumed by one batch.
    pub fn window(&self) -> usize {
        self.base_indices.len()
    }

    /// Full batches one pass produces.
    pub fn num_batches(&self) -> usize {
        self.len() / self.window()
    }

    pub fn frames(&self) -> &Tensor<f32> {
        &self.frames
    }

    pub fn poses(&self) -> &Tensor<f64> {
        &self.poses
    }

    /// Start a pass over the data. Each call starts again at frame 0.
    pub fn batches(&mut self) -> Batches<'_> {
        Batches {
            manager: self,
            offset: 0,
        }
    }

    /// Start a pass that yields independent copies of every batch.
    pub fn owned_batches(&mut self) -> OwnedBatches<'_> {
        OwnedBatches {
            inner: self.batches(),
        }
    }

    /// Fill the buffer for the window starting at `offset` and return the
    /// pose deltas.
    fn fill(&mut self, offset: usize) -> Tensor<f64> {
        for (global, base) in self.global_indices.iter_mut().zip(&self.base_indices) {
            *global = base + offset;
        }

        let width = self.poses.shape[1];
        let mut deltas = Vec::with_capacity(self.batch_size * width);
        let firsts = &self.global_indices[..self.batch_size];
        let lasts = &self.global_indices[self.add_frames..];
        for (&first, &last) in firsts.iter().zip(lasts) {
            let (start_pose, end_pose) = (self.poses.item(first), self.poses.item(last));
            deltas.extend(end_pose.iter().zip(start_pose).map(|(end, start)| end - start));
        }

        stack_into(
            &self.frames.data,
            self.shape,
            firsts.iter().copied(),
            self.seq_len,
            &mut self.buffer.data,
        );

        Tensor {
            shape: vec![self.batch_size, width],
            data: deltas,
        }
    }
}

/// One step of a pass: stacked images borrowed from the manager's buffer.
#[derive(Debug)]
pub struct Batch<'a> {
    /// (batch_size, H, W, C * seq_len), overwritten by the next step.
    pub images: &'a Tensor<f32>,
    /// (batch_size, P): last pose of each window minus its first.
    pub pose_deltas: Tensor<f64>,
    /// Global index of the first frame of example 0.
    pub first_frame: usize,
}

impl Batch<'_> {
    pub fn into_owned(self) -> OwnedBatch {
        OwnedBatch {
            images: self.images.clone(),
            pose_deltas: self.pose_deltas,
            first_frame: self.first_frame,
        }
    }
}

/// A batch that owns its images.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedBatch {
    pub images: Tensor<f32>,
    pub pose_deltas: Tensor<f64>,
    pub first_frame: usize,
}

/// A single pass over a [`BatchManager`].
///
/// Not a std `Iterator`: every batch borrows the shared buffer, so it must
/// be released before `next_batch` is called again.
pub struct Batches<'a> {
    manager: &'a mut BatchManager,
    offset: usize,
}

impl Batches<'_> {
    pub fn next_batch(&mut self) -> Option<Batch<'_>> {
        let window = self.manager.window();
        if self.offset + window > self.manager.len() {
            return None;
        }
        let first_frame = self.offset;
        self.offset += window;

        let manager = &mut *self.manager;
        let pose_deltas = manager.fill(first_frame);
        Some(Batch {
            images: &manager.buffer,
            pose_deltas,
            first_frame,
        })
    }

    /// Batches left in this pass.
    pub fn remaining(&self) -> usize {
        self.manager.len().saturating_sub(self.offset) / self.manager.window()
    }
}

/// A pass that copies each batch out of the shared buffer.
pub struct OwnedBatches<'a> {
    inner: Batches<'a>,
}

impl Iterator for OwnedBatches<'_> {
    type Item = OwnedBatch;

    fn next(&mut self) -> Option<OwnedBatch> {
        self.inner.next_batch().map(Batch::into_owned)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.inner.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for OwnedBatches<'_> {}
