use {
    crate::{DataError, stack::FrameShape},
    odo_base::Tensor,
};

/// Divisors that resized image height and width must be multiples of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrideMultiple {
    pub height: usize,
    pub width: usize,
}

/// One stride for both dimensions.
impl From<usize> for StrideMultiple {
    fn from(stride: usize) -> Self {
        Self {
            height: stride,
            width: stride,
        }
    }
}

impl From<(usize, usize)> for StrideMultiple {
    fn from((height, width): (usize, usize)) -> Self {
        Self { height, width }
    }
}

impl StrideMultiple {
    /// Smallest (height, width) at least as large as the input that both
    /// strides divide.
    pub fn target(&self, height: usize, width: usize) -> (usize, usize) {
        (
            height.div_ceil(self.height) * self.height,
            width.div_ceil(self.width) * self.width,
        )
    }
}

/// Resize every image of an (N, H, W, C) batch so height and width become
/// the next multiples of the stride, using nearest-neighbour sampling.
pub fn resize_to_multiple<T: Copy>(
    images: &Tensor<T>,
    multiples: impl Into<StrideMultiple>,
) -> Result<Tensor<T>, DataError> {
    let multiples = multiples.into();
    if multiples.height == 0 || multiples.width == 0 {
        return Err(DataError::InvalidArgument(format!(
            "stride multiples must be non-zero, got {multiples:?}"
        )));
    }
    let (count, shape) = FrameShape::of(images)?;
    let (h, w, c) = (shape.height, shape.width, shape.channels);
    let (new_h, new_w) = multiples.target(h, w);
    if (new_h, new_w) == (h, w) {
        return Ok(images.clone());
    }
    log::debug!("resizing {count} images from {h}x{w} to {new_h}x{new_w}");

    let mut data = Vec::with_capacity(count * new_h * new_w * c);
    for n in 0..count {
        let image = images.item(n);
        for out_y in 0..new_h {
            let src_y = out_y * h / new_h;
            for out_x in 0..new_w {
                let src_x = out_x * w / new_w;
                let src = (src_y * w + src_x) * c;
                data.extend_from_slice(&image[src..src + c]);
            }
        }
    }
    Ok(Tensor::new(vec![count, new_h, new_w, c], data)?)
}

/// Subtract the per-channel mean over all images and pixels, in place.
///
/// Returns the subtracted means, one per channel.
pub fn subtract_channel_mean(images: &mut Tensor<f32>) -> Result<Vec<f32>, DataError> {
    let (count, shape) = FrameShape::of(images)?;
    if count == 0 {
        return Err(DataError::InvalidShape(
            "cannot compute channel means of an empty sequence".to_string(),
        ));
    }
    let channels = shape.channels;

    let mut sums = vec![0.0f64; channels];
    for pixel in images.data.chunks_exact(channels) {
        for (sum, &value) in sums.iter_mut().zip(pixel) {
            *sum += value as f64;
        }
    }
    let samples = (images.len() / channels) as f64;
    let means: Vec<f32> = sums.iter().map(|sum| (sum / samples) as f32).collect();

    for pixel in images.data.chunks_exact_mut(channels) {
        for (value, mean) in pixel.iter_mut().zip(&means) {
            *value -= mean;
        }
    }
    Ok(means)
}
