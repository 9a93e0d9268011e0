//! Windowing and batching of image/pose sequences for visual-odometry
//! training.
//!
//! Frames are (N, H, W, C) tensors and poses (N, P) tables with P = 6
//! (roll, pitch, yaw, translation) or P = 7 (quaternion, translation).
//! [`BatchManager`] turns them into batches of `seq_len` frames stacked
//! along the channel axis plus the pose change across each window;
//! [`generate_pairs`] produces chunks of adjacent-frame pairs. Both share
//! [`stack_into`].

pub mod config;
pub mod error;
pub mod manager;
pub mod pairs;
pub mod pose;
pub mod preprocess;
pub mod stack;

pub use config::BatchConfig;
pub use error::DataError;
pub use manager::{Batch, BatchManager, Batches, OwnedBatch, OwnedBatches};
pub use pairs::{FramePairs, generate_pairs};
pub use pose::{EULER_POSE_WIDTH, QUATERNION_POSE_WIDTH, quaternion_poses_to_euler};
pub use preprocess::{StrideMultiple, resize_to_multiple, subtract_channel_mean};
pub use stack::{FrameShape, stack_into};
