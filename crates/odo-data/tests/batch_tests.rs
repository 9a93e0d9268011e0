use odo_array::{ArrayCodec, ArrayError, NpyCodec};
use odo_base::{Quat, Tensor, Vec3};
use odo_data::{BatchConfig, BatchManager, DataError};
use std::{fs, path::PathBuf};

const H: usize = 2;
const W: usize = 2;
const C: usize = 3;

/// Frame n, pixel p, channel c holds n * 100 + p * C + c.
fn frames(count: usize) -> Tensor<f32> {
    let frame_len = H * W * C;
    let data = (0..count * frame_len)
        .map(|i| ((i / frame_len) * 100 + i % frame_len) as f32)
        .collect();
    Tensor::new(vec![count, H, W, C], data).unwrap()
}

/// Pose n component j = n * n + 0.5 * j, so deltas are never constant.
fn poses(count: usize, width: usize) -> Tensor<f64> {
    let data = (0..count * width)
        .map(|i| ((i / width) * (i / width)) as f64 + 0.5 * (i % width) as f64)
        .collect();
    Tensor::new(vec![count, width], data).unwrap()
}

fn manager(count: usize, batch_size: usize, seq_len: usize) -> BatchManager {
    BatchManager::from_tensors(frames(count), poses(count, 6), batch_size, seq_len).unwrap()
}

/// Channel block `k` of an example with `depth` stacked frames.
fn block(example: &[f32], depth: usize, k: usize) -> Vec<f32> {
    example
        .chunks_exact(C * depth)
        .flat_map(|pixel| pixel[k * C..(k + 1) * C].to_vec())
        .collect()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("odo-batch-{}-{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_six_frames_pairs_of_two() {
    let mut manager = manager(6, 2, 2);
    assert_eq!(manager.add_frames(), 1);
    assert_eq!(manager.window(), 3);
    let input = manager.frames().clone();
    let pose = manager.poses().clone();

    let mut batches = manager.batches();

    let batch = batches.next_batch().unwrap();
    assert_eq!(batch.first_frame, 0);
    assert_eq!(batch.images.shape, vec![2, H, W, 2 * C]);
    assert_eq!(batch.pose_deltas.shape, vec![2, 6]);
    assert_eq!(block(batch.images.item(0), 2, 0), input.item(0));
    assert_eq!(block(batch.images.item(0), 2, 1), input.item(1));
    assert_eq!(block(batch.images.item(1), 2, 0), input.item(1));
    assert_eq!(block(batch.images.item(1), 2, 1), input.item(2));
    for j in 0..6 {
        assert_eq!(batch.pose_deltas.item(0)[j], pose.item(1)[j] - pose.item(0)[j]);
        assert_eq!(batch.pose_deltas.item(1)[j], pose.item(2)[j] - pose.item(1)[j]);
    }

    let batch = batches.next_batch().unwrap();
    assert_eq!(batch.first_frame, 3);
    assert_eq!(block(batch.images.item(0), 2, 0), input.item(3));
    assert_eq!(block(batch.images.item(1), 2, 1), input.item(5));

    assert!(batches.next_batch().is_none());
    assert!(batches.next_batch().is_none());
}

#[test]
fn test_batch_count_matches_window_division() {
    for (count, batch_size, seq_len) in [(6, 2, 2), (20, 4, 3), (21, 4, 3), (17, 5, 1), (100, 7, 4), (9, 10, 2)] {
        let mut manager = manager(count, batch_size, seq_len);
        let expected = count / (batch_size + seq_len - 1);
        assert_eq!(manager.num_batches(), expected);

        let mut batches = manager.batches();
        assert_eq!(batches.remaining(), expected);
        let mut produced = 0;
        while let Some(batch) = batches.next_batch() {
            assert_eq!(batch.images.items(), batch_size);
            assert_eq!(batch.pose_deltas.items(), batch_size);
            produced += 1;
        }
        assert_eq!(produced, expected, "N={count} B={batch_size} S={seq_len}");
    }
}

#[test]
fn test_every_block_and_delta_for_longer_windows() {
    let (count, batch_size, seq_len) = (23, 3, 4);
    let mut manager = manager(count, batch_size, seq_len);
    let input = manager.frames().clone();
    let pose = manager.poses().clone();

    for batch in manager.owned_batches() {
        assert_eq!(batch.images.shape, vec![batch_size, H, W, C * seq_len]);
        for e in 0..batch_size {
            let global = batch.first_frame + e;
            let example = batch.images.item(e);
            for k in 0..seq_len {
                assert_eq!(block(example, seq_len, k), input.item(global + k));
            }
            let delta = batch.pose_deltas.item(e);
            for j in 0..6 {
                assert_eq!(delta[j], pose.item(global + seq_len - 1)[j] - pose.item(global)[j]);
            }
        }
    }
}

#[test]
fn test_exact_window_yields_one_batch() {
    let mut manager = manager(5, 3, 3);
    let mut batches = manager.batches();
    assert!(batches.next_batch().is_some());
    assert!(batches.next_batch().is_none());
}

#[test]
fn test_too_few_frames_yields_nothing() {
    let mut manager = manager(4, 3, 3);
    assert_eq!(manager.num_batches(), 0);
    assert!(manager.batches().next_batch().is_none());
}

#[test]
fn test_single_frame_windows_have_zero_deltas() {
    let mut manager = manager(4, 2, 1);
    let input = manager.frames().clone();
    let batches: Vec<_> = manager.owned_batches().collect();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1].images.item(1), input.item(3));
    assert!(batches[1].pose_deltas.data.iter().all(|&d| d == 0.0));
}

#[test]
fn test_buffer_is_reused_and_owned_copies_persist() {
    let mut manager = manager(9, 2, 2);
    let owned: Vec<_> = manager.owned_batches().collect();
    assert_eq!(owned.len(), 3);
    assert_eq!(owned[0].first_frame, 0);
    assert_ne!(owned[0].images, owned[2].images);

    let mut batches = manager.batches();
    let first_ptr = batches.next_batch().unwrap().images.data.as_ptr();
    let second = batches.next_batch().unwrap();
    assert_eq!(second.images.data.as_ptr(), first_ptr);
    assert_eq!(second.into_owned(), owned[1]);
}

#[test]
fn test_batches_restart_from_the_beginning() {
    let mut manager = manager(10, 2, 3);
    let first: Vec<_> = manager.owned_batches().collect();
    let second: Vec<_> = manager.owned_batches().collect();
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn test_owned_batches_exact_size() {
    let mut manager = manager(12, 3, 2);
    let mut owned = manager.owned_batches();
    assert_eq!(owned.len(), 3);
    owned.next();
    assert_eq!(owned.len(), 2);
}

#[test]
fn test_frame_pose_count_mismatch() {
    let result = BatchManager::from_tensors(frames(6), poses(5, 6), 2, 2);
    match result {
        Err(DataError::ShapeMismatch { frames, poses }) => assert_eq!((frames, poses), (6, 5)),
        other => panic!("expected shape mismatch, got {other:?}"),
    }
}

#[test]
fn test_rejects_bad_shapes_and_sizes() {
    assert!(matches!(
        BatchManager::from_tensors(frames(6), poses(6, 5), 2, 2),
        Err(DataError::InvalidShape(_))
    ));
    let flat = Tensor::new(vec![6, 12], vec![0.0f32; 72]).unwrap();
    assert!(matches!(
        BatchManager::from_tensors(flat, poses(6, 6), 2, 2),
        Err(DataError::InvalidShape(_))
    ));
    assert!(matches!(
        BatchManager::from_tensors(frames(6), poses(6, 6), 0, 2),
        Err(DataError::InvalidArgument(_))
    ));
    assert!(matches!(
        BatchManager::from_tensors(frames(6), poses(6, 6), 2, 0),
        Err(DataError::InvalidArgument(_))
    ));
}

#[test]
fn test_queries() {
    let manager = BatchManager::from_tensors(frames(8), poses(8, 7), 4, 2).unwrap();
    assert_eq!(manager.image_shape(), (H, W, C));
    assert!(manager.pose_has_quaternion());
    assert_eq!(manager.len(), 8);
    assert!(!manager.is_empty());
    assert_eq!(manager.batch_size(), 4);
    assert_eq!(manager.seq_len(), 2);
}

#[test]
fn test_convert_poses_to_euler_in_place() {
    let angles = [Vec3::new(0.1, 0.2, 0.3), Vec3::new(-0.4, 0.5, -1.2), Vec3::new(1.0, -0.3, 2.0)];
    let mut data = Vec::new();
    for (n, angle) in angles.iter().enumerate() {
        let q = Quat::from_euler(*angle);
        data.extend([q.w, q.x, q.y, q.z, n as f64, 2.0 * n as f64, -(n as f64)]);
    }
    let quaternion_poses = Tensor::new(vec![3, 7], data).unwrap();

    let mut manager = BatchManager::from_tensors(frames(3), quaternion_poses, 1, 2).unwrap();
    manager.convert_poses_to_euler().unwrap();
    assert!(!manager.pose_has_quaternion());
    assert_eq!(manager.poses().shape, vec![3, 6]);
    for (n, angle) in angles.iter().enumerate() {
        let row = manager.poses().item(n);
        for (got, want) in row[..3].iter().zip(angle.to_array()) {
            assert!((got - want).abs() < 1e-10);
        }
        assert_eq!(&row[3..], &[n as f64, 2.0 * n as f64, -(n as f64)]);
    }

    let batch = manager.batches().next_batch().unwrap().into_owned();
    assert_eq!(batch.pose_deltas.shape, vec![1, 6]);

    // second call is a no-op
    let before = manager.poses().clone();
    manager.convert_poses_to_euler().unwrap();
    assert_eq!(manager.poses(), &before);
}

#[test]
fn test_load_from_npy_files() {
    let dir = scratch_dir("files");
    let (frame_path, pose_path) = (dir.join("images.npy"), dir.join("poses.npy"));
    let images = Tensor::new(vec![6, H, W, C], (0..6 * H * W * C).map(|v| (v % 256) as u8).collect()).unwrap();
    NpyCodec.save(&frame_path, &images).unwrap();
    NpyCodec.save(&pose_path, &poses(6, 6)).unwrap();

    let mut manager = BatchManager::new(&frame_path, &pose_path, 2, 2).unwrap();
    assert_eq!(manager.image_shape(), (H, W, C));
    assert_eq!(manager.frames().data[5], 5.0);
    assert_eq!(manager.owned_batches().count(), 2);

    let config = BatchConfig::default()
        .with_frame_path(&frame_path)
        .with_pose_path(&pose_path)
        .with_batch_size(1)
        .with_seq_len(3);
    let manager = BatchManager::from_config(&config).unwrap();
    assert_eq!(manager.num_batches(), 2);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = scratch_dir("missing");
    let result = BatchManager::new(dir.join("nope.npy"), dir.join("nope-poses.npy"), 2, 2);
    assert!(matches!(result, Err(DataError::Array(ArrayError::Io { .. }))));
    fs::remove_dir_all(&dir).ok();
}
