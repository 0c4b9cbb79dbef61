use alloc::vec::Vec;

/// Output shape of a convolution with `D` spatial dimensions.
///
/// Laid out as `[batch_size, channels, spatial_0, ..., spatial_{D-1}]`, stored inline so that
/// computing a shape never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConvOutputShape<const D: usize> {
    /// Batch size, copied from the input.
    pub batch_size: usize,
    /// Output channels.
    pub channels: usize,
    /// Spatial extents, each > 0.
    pub spatial: [usize; D],
}

impl<const D: usize> ConvOutputShape<D> {
    pub(crate) fn new(batch_size: usize, channels: usize, spatial: [usize; D]) -> Self {
        Self {
            batch_size,
            channels,
            spatial,
        }
    }

    /// Number of dimensions of the output tensor, `D + 2`.
    pub const fn num_dims(&self) -> usize {
        D + 2
    }

    /// Returns the dimensions as an array.
    ///
    /// # Panics
    ///
    /// If `R` is not `D + 2`.
    pub fn dims<const R: usize>(&self) -> [usize; R] {
        assert_eq!(
            R,
            D + 2,
            "Output shape has {} dimensions, {} were requested",
            D + 2,
            R
        );

        let mut dims = [0; R];
        for (out, dim) in dims.iter_mut().zip(self.iter()) {
            *out = dim;
        }
        dims
    }

    /// The size of dimension `index`, batch and channels included.
    pub fn get(&self, index: usize) -> Option<usize> {
        match index {
            0 => Some(self.batch_size),
            1 => Some(self.channels),
            _ => self.spatial.get(index - 2).copied(),
        }
    }

    /// Iterate over every dimension, batch and channels first.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        [self.batch_size, self.channels]
            .into_iter()
            .chain(self.spatial.iter().copied())
    }

    /// Collect the dimensions into a vector.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    /// Number of elements a buffer of this shape holds, `None` if it does not fit in `usize`.
    pub fn num_elements(&self) -> Option<usize> {
        self.iter().try_fold(1usize, |acc, dim| acc.checked_mul(dim))
    }
}

impl<const D: usize> From<ConvOutputShape<D>> for Vec<usize> {
    fn from(shape: ConvOutputShape<D>) -> Self {
        shape.to_vec()
    }
}

impl<const D: usize> core::fmt::Display for ConvOutputShape<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{format, vec};

    #[test]
    fn dims_are_batch_channels_then_spatial() {
        let shape = ConvOutputShape::new(2, 8, [5, 6, 7]);

        assert_eq!(shape.num_dims(), 5);
        assert_eq!(shape.dims::<5>(), [2, 8, 5, 6, 7]);
        assert_eq!(shape.to_vec(), vec![2, 8, 5, 6, 7]);
        assert_eq!(shape.get(1), Some(8));
        assert_eq!(shape.get(4), Some(7));
        assert_eq!(shape.get(5), None);
    }

    #[test]
    #[should_panic = "Output shape has 4 dimensions, 3 were requested"]
    fn dims_with_wrong_rank_panics() {
        let shape = ConvOutputShape::new(1, 1, [2, 2]);
        let _ = shape.dims::<3>();
    }

    #[test]
    fn num_elements() {
        assert_eq!(ConvOutputShape::new(2, 3, [4, 5]).num_elements(), Some(120));
        assert_eq!(ConvOutputShape::new(0, 3, [4]).num_elements(), Some(0));
        assert_eq!(
            ConvOutputShape::new(usize::MAX, 2, [1]).num_elements(),
            None
        );
    }

    #[test]
    fn display() {
        let shape = ConvOutputShape::new(1, 8, [2, 2]);

        assert_eq!(format!("{shape}"), "[1, 8, 2, 2]");
    }
}
