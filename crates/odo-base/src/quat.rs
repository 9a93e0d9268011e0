use {
    crate::Vec3,
    std::{f64::consts::FRAC_PI_2, fmt},
};

/// Rotation quaternion, scalar part first.
#[derive(Clone, Copy, PartialEq)]
pub struct Quat {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl fmt::Debug for Quat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quat")
            .field("w", &self.w)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("z", &self.z)
            .finish()
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quat {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Quaternion for intrinsic ZYX angles: yaw about z, then pitch about y,
    /// then roll about x. Angles are packed as `(roll, pitch, yaw)`.
    pub fn from_euler(angles: Vec3<f64>) -> Self {
        let (sr, cr) = (angles.x / 2.0).sin_cos();
        let (sp, cp) = (angles.y / 2.0).sin_cos();
        let (sy, cy) = (angles.z / 2.0).sin_cos();
        Self {
            w: cr * cp * cy + sr * sp * sy,
            x: sr * cp * cy - cr * sp * sy,
            y: cr * sp * cy + sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
        }
    }

    pub fn length(self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit quaternion in the same direction. A zero quaternion maps to the identity.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Self::identity();
        }
        Self::new(self.w / len, self.x / len, self.y / len, self.z / len)
    }

    /// ZYX Euler angles packed as `(roll, pitch, yaw)` in radians.
    ///
    /// Pitch is clamped to `[-pi/2, pi/2]`.
    pub fn to_euler(self) -> Vec3<f64> {
        let q = self.normalized();
        let roll = (2.0 * (q.w * q.x + q.y * q.z)).atan2(1.0 - 2.0 * (q.x * q.x + q.y * q.y));
        let sin_pitch = 2.0 * (q.w * q.y - q.z * q.x);
        let pitch = if sin_pitch.abs() >= 1.0 {
            FRAC_PI_2.copysign(sin_pitch)
        } else {
            sin_pitch.asin()
        };
        let yaw = (2.0 * (q.w * q.z + q.x * q.y)).atan2(1.0 - 2.0 * (q.y * q.y + q.z * q.z));
        Vec3::new(roll, pitch, yaw)
    }
}
