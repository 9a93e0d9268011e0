use {
    crate::DataError,
    odo_base::{Quat, Tensor},
};

/// `[roll, pitch, yaw, tx, ty, tz]`
pub const EULER_POSE_WIDTH: usize = 6;

/// `[qw, qx, qy, qz, tx, ty, tz]`
pub const QUATERNION_POSE_WIDTH: usize = 7;

/// Width P of an (N, P) pose table, checked to be one of the two layouts.
pub fn pose_width(poses: &Tensor<f64>) -> Result<usize, DataError> {
    match poses.shape[..] {
        [_, width @ (EULER_POSE_WIDTH | QUATERNION_POSE_WIDTH)] => Ok(width),
        _ => Err(DataError::InvalidShape(format!(
            "expected poses [N, 6] or [N, 7], got {:?}",
            poses.shape
        ))),
    }
}

/// Convert (N, 7) quaternion poses to (N, 6) Euler poses.
///
/// Rotations become ZYX roll/pitch/yaw via [`Quat::to_euler`]; translations
/// are copied unchanged.
pub fn quaternion_poses_to_euler(poses: &Tensor<f64>) -> Result<Tensor<f64>, DataError> {
    if pose_width(poses)? != QUATERNION_POSE_WIDTH {
        return Err(DataError::InvalidShape(format!(
            "expected quaternion poses [N, 7], got {:?}",
            poses.shape
        )));
    }

    let count = poses.items();
    let mut data = Vec::with_capacity(count * EULER_POSE_WIDTH);
    for row in poses.data.chunks_exact(QUATERNION_POSE_WIDTH) {
        let rotation = Quat::new(row[0], row[1], row[2], row[3]);
        data.extend(rotation.to_euler().to_array());
        data.extend_from_slice(&row[4..]);
    }
    Ok(Tensor::new(vec![count, EULER_POSE_WIDTH], data)?)
}
