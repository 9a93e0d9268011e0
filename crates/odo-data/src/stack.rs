use {crate::DataError, odo_base::Tensor};

/// Height, width and channel count of one frame in an (N, H, W, C) sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl FrameShape {
    /// Frame count and frame shape of an (N, H, W, C) tensor.
    ///
    /// N may be zero; H, W and C may not.
    pub fn of<T>(frames: &Tensor<T>) -> Result<(usize, FrameShape), DataError> {
        let [count, height, width, channels] = frames.shape[..] else {
            return Err(DataError::InvalidShape(format!(
                "expected frames [N, H, W, C], got {:?}",
                frames.shape
            )));
        };
        if height == 0 || width == 0 || channels == 0 {
            return Err(DataError::InvalidShape(format!(
                "frames must have non-empty height, width and channels, got {:?}",
                frames.shape
            )));
        }
        Ok((
            count,
            FrameShape {
                height,
                width,
                channels,
            },
        ))
    }

    pub fn pixels(&self) -> usize {
        self.height * self.width
    }

    pub fn frame_len(&self) -> usize {
        self.pixels() * self.channels
    }

    /// Elements in one example made of `depth` stacked frames.
    pub fn stacked_len(&self, depth: usize) -> usize {
        self.frame_len() * depth
    }

    /// Shape of `count` examples made of `depth` stacked frames.
    pub fn stacked_shape(&self, count: usize, depth: usize) -> Vec<usize> {
        vec![count, self.height, self.width, self.channels * depth]
    }
}

/// Stack consecutive frames into channel blocks.
///
/// `frames` is a row-major (N, H, W, C) buffer and `out` holds examples of
/// shape (H, W, C * depth) back to back. For the e-th start `s`, channel
/// block `k` of example `e` receives frame `s + k`, so the oldest frame of
/// every window lands in channels `[0, C)`. Examples past the end of
/// `starts` are left untouched, and starts past the capacity of `out` are
/// ignored.
///
/// # Panics
///
/// Panics if a window reaches past the last frame.
pub fn stack_into<T: Copy>(
    frames: &[T],
    shape: FrameShape,
    starts: impl IntoIterator<Item = usize>,
    depth: usize,
    out: &mut [T],
) {
    let channels = shape.channels;
    let frame_len = shape.frame_len();
    let pixel_stride = channels * depth;

    let examples = out.chunks_exact_mut(shape.stacked_len(depth));
    for (start, example) in starts.into_iter().zip(examples) {
        for block in 0..depth {
            let first = (start + block) * frame_len;
            let frame = &frames[first..first + frame_len];
            let offset = block * channels;
            for (pixel, stacked) in frame
                .chunks_exact(channels)
                .zip(example.chunks_exact_mut(pixel_stride))
            {
                stacked[offset..offset + channels].copy_from_slice(pixel);
            }
        }
    }
}
