use {
    crate::{
        DataError,
        stack::{FrameShape, stack_into},
    },
    odo_base::Tensor,
};

/// Split a frame sequence into chunks of adjacent-frame pairs.
///
/// Chunk `i` starts at frame `idx = i * sequence_length` and holds
/// `sequence_length` pairs of shape (H, W, 2C): pair `k` is frame `idx + k`
/// in the first C channels followed by frame `idx + k + 1`. A trailing
/// chunk with fewer than `sequence_length` frames is not produced, so the
/// sequence has exactly `N / sequence_length` chunks.
///
/// The last pair of a chunk borrows the first frame of the next chunk. When
/// that frame does not exist (the chunk ends on the final frame), the pair
/// is left zeroed.
///
/// The input is never modified; clone the returned iterator or call this
/// again to start over.
pub fn generate_pairs<T: Copy + Default>(
    frames: &Tensor<T>,
    sequence_length: usize,
) -> Result<FramePairs<'_, T>, DataError> {
    if sequence_length == 0 {
        return Err(DataError::InvalidArgument(
            "sequence_length must be at least 1".to_string(),
        ));
    }
    let (count, shape) = FrameShape::of(frames)?;
    Ok(FramePairs {
        frames,
        shape,
        count,
        sequence_length,
        next: 0,
    })
}

/// Lazy chunks of stacked frame pairs, see [`generate_pairs`].
#[derive(Debug, Clone)]
pub struct FramePairs<'a, T> {
    frames: &'a Tensor<T>,
    shape: FrameShape,
    count: usize,
    sequence_length: usize,
    next: usize,
}

impl<T> FramePairs<'_, T> {
    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// Shape of every chunk: (sequence_length, H, W, 2C).
    pub fn chunk_shape(&self) -> Vec<usize> {
        self.shape.stacked_shape(self.sequence_length, 2)
    }

    fn remaining(&self) -> usize {
        self.count.saturating_sub(self.next) / self.sequence_length
    }
}

impl<T: Copy + Default> Iterator for FramePairs<'_, T> {
    type Item = Tensor<T>;

    fn next(&mut self) -> Option<Tensor<T>> {
        let idx = self.next;
        let end = idx + self.sequence_length;
        if end > self.count {
            return None;
        }
        self.next = end;

        // a pair needs its successor; only the very last frame has none
        let starts = idx..end.min(self.count - 1);
        let mut data = vec![T::default(); self.sequence_length * self.shape.stacked_len(2)];
        stack_into(&self.frames.data, self.shape, starts, 2, &mut data);

        Some(Tensor {
            shape: self.chunk_shape(),
            data,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T: Copy + Default> ExactSizeIterator for FramePairs<'_, T> {}
