use {
    odo_array::{ArrayCodec, NpyCodec},
    odo_base::{Tensor, init_stdout_logger},
    odo_data::{BatchConfig, BatchManager, subtract_channel_mean},
};

fn load_manager(config: &BatchConfig) -> Result<BatchManager, Box<dyn std::error::Error>> {
    if !config.subtract_mean() {
        return Ok(BatchManager::from_config(config)?);
    }
    let mut frames: Tensor<f32> = NpyCodec.load(config.frame_path())?;
    let means = subtract_channel_mean(&mut frames)?;
    log::info!("subtracted channel means {means:?}");
    let poses: Tensor<f64> = NpyCodec.load(config.pose_path())?;
    Ok(BatchManager::from_tensors(
        frames,
        poses,
        config.batch_size(),
        config.seq_len(),
    )?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_stdout_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => BatchConfig::from_json_file(path)?,
        None => BatchConfig::default(),
    };

    let mut manager = load_manager(&config)?;
    if config.convert_quaternions() {
        manager.convert_poses_to_euler()?;
    }

    let (h, w, c) = manager.image_shape();
    log::info!(
        "{} frames of {h}x{w}x{c}, batch_size {}, seq_len {}: {} batches",
        manager.len(),
        manager.batch_size(),
        manager.seq_len(),
        manager.num_batches()
    );

    let mut batches = manager.batches();
    let mut count = 0;
    while let Some(batch) = batches.next_batch() {
        log::info!(
            "batch {count}: frames from {}, images {:?}, pose deltas {:?}",
            batch.first_frame,
            batch.images.shape,
            batch.pose_deltas.shape
        );
        count += 1;
    }
    log::info!("{count} batches");
    Ok(())
}
