use crate::{ConvOutputShape, ConvParam, ConvShapeError};

/// Rejects, at compile time, spatial ranks other than 1, 2 and 3.
pub(crate) fn check_rank<const D: usize>() {
    const {
        assert!(
            D >= 1 && D <= 3,
            "convolution spatial rank must be 1, 2 or 3"
        )
    }
}

/// Converts a per-dimension parameter slice into a fixed rank array.
pub(crate) fn expect_rank<const D: usize>(
    param: ConvParam,
    values: &[usize],
) -> Result<[usize; D], ConvShapeError> {
    <[usize; D]>::try_from(values).map_err(|_| ConvShapeError::ShapeMismatch {
        param,
        expected: D,
        actual: values.len(),
    })
}

/// The convolution parameters of a single spatial dimension.
///
/// Every dimension of a convolution is computed independently from the others, this is the
/// unit of that computation.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimGeometry {
    /// The input extent, must be > 0.
    pub input_size: usize,
    /// The kernel size, must be > 0.
    pub kernel_size: usize,
    /// The stride, must be > 0.
    pub stride: usize,
    /// The padding, added evenly to both sides of the input.
    pub padding: usize,
    /// The dilation, must be > 0.
    pub dilation: usize,
}

impl core::fmt::Display for DimGeometry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            " input_size:{}\n kernel_size:{}\n stride:{}\n padding:{}\n dilation:{}",
            self.input_size, self.kernel_size, self.stride, self.padding, self.dilation
        )
    }
}

impl DimGeometry {
    /// The kernel footprint once dilated: `dilation * (kernel_size - 1) + 1`.
    ///
    /// Returns `None` for a zero kernel or on overflow.
    pub fn effective_kernel_size(&self) -> Option<usize> {
        self.kernel_size
            .checked_sub(1)?
            .checked_mul(self.dilation)?
            .checked_add(1)
    }

    /// The input extent once padded on both sides: `input_size + 2 * padding`.
    pub fn padded_input_size(&self) -> Option<usize> {
        self.padding.checked_mul(2)?.checked_add(self.input_size)
    }

    fn check_nonzero(&self, dim: usize) -> Result<(), ConvShapeError> {
        let values = [
            (ConvParam::InputShape, self.input_size),
            (ConvParam::KernelSize, self.kernel_size),
            (ConvParam::Stride, self.stride),
            (ConvParam::Dilation, self.dilation),
        ];

        match values.into_iter().find(|(_, value)| *value == 0) {
            Some((param, _)) => Err(ConvShapeError::ZeroParameter { param, dim }),
            None => Ok(()),
        }
    }

    /// Output size of a convolution along this dimension.
    ///
    /// ```text
    /// out_size = floor( (in_size + 2*padding - dilation*(kernel_size-1) - 1) / stride ) + 1
    /// ```
    ///
    /// `dim` is only used to report errors.
    pub fn output_size(&self, dim: usize) -> Result<usize, ConvShapeError> {
        self.check_nonzero(dim)?;

        let kernel = self
            .effective_kernel_size()
            .ok_or(ConvShapeError::Overflow { dim })?;
        let padded = self
            .padded_input_size()
            .ok_or(ConvShapeError::Overflow { dim })?;

        // A partial window at the far edge is dropped, so an empty window range is an error
        // rather than a size of zero.
        if padded < kernel {
            return Err(ConvShapeError::DegenerateOutput {
                dim,
                geometry: *self,
            });
        }

        Ok((padded - kernel) / self.stride + 1)
    }

    /// Output size of a transposed convolution along this dimension.
    ///
    /// ```text
    /// out_size = (in_size - 1)*stride - 2*padding + dilation*(kernel_size-1) + output_padding + 1
    /// ```
    pub fn transposed_output_size(
        &self,
        dim: usize,
        output_padding: usize,
    ) -> Result<usize, ConvShapeError> {
        self.check_nonzero(dim)?;

        if output_padding >= self.stride && output_padding >= self.dilation {
            return Err(ConvShapeError::InvalidOutputPadding {
                dim,
                output_padding,
                stride: self.stride,
                dilation: self.dilation,
            });
        }

        let overflow = ConvShapeError::Overflow { dim };
        let kernel = self.effective_kernel_size().ok_or(overflow.clone())?;
        let span = (self.input_size - 1)
            .checked_mul(self.stride)
            .and_then(|size| size.checked_add(kernel))
            .and_then(|size| size.checked_add(output_padding))
            .ok_or(overflow.clone())?;
        let trimmed = self.padding.checked_mul(2).ok_or(overflow)?;

        if span <= trimmed {
            return Err(ConvShapeError::DegenerateTransposedOutput {
                dim,
                geometry: *self,
                output_padding,
            });
        }

        Ok(span - trimmed)
    }
}

/// Kernel size, stride, padding and dilation of a `D` dimensional convolution.
///
/// `D` must be 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelGeometry<const D: usize> {
    /// The size of the kernel.
    pub kernel_size: [usize; D],
    /// The stride (non-zero).
    pub stride: [usize; D],
    /// The padding, added evenly to both sides of the input.
    pub padding: [usize; D],
    /// The dilation (non-zero).
    pub dilation: [usize; D],
}

impl<const D: usize> KernelGeometry<D> {
    /// Create a geometry with unit stride, no padding and no dilation.
    pub fn new(kernel_size: [usize; D]) -> Self {
        check_rank::<D>();

        Self {
            kernel_size,
            stride: [1; D],
            padding: [0; D],
            dilation: [1; D],
        }
    }

    /// Set the stride.
    pub fn with_stride(mut self, stride: [usize; D]) -> Self {
        self.stride = stride;
        self
    }

    /// Set the padding.
    pub fn with_padding(mut self, padding: [usize; D]) -> Self {
        self.padding = padding;
        self
    }

    /// Set the dilation.
    pub fn with_dilation(mut self, dilation: [usize; D]) -> Self {
        self.dilation = dilation;
        self
    }

    /// Create a geometry from runtime sized parameters.
    ///
    /// # Errors
    ///
    /// [`ConvShapeError::ShapeMismatch`] if any slice does not have exactly `D` values.
    pub fn from_slices(
        kernel_size: &[usize],
        stride: &[usize],
        padding: &[usize],
        dilation: &[usize],
    ) -> Result<Self, ConvShapeError> {
        check_rank::<D>();

        Ok(Self {
            kernel_size: expect_rank(ConvParam::KernelSize, kernel_size)?,
            stride: expect_rank(ConvParam::Stride, stride)?,
            padding: expect_rank(ConvParam::Padding, padding)?,
            dilation: expect_rank(ConvParam::Dilation, dilation)?,
        })
    }

    /// The number of spatial dimensions.
    pub const fn rank(&self) -> usize {
        D
    }

    /// The parameters of spatial dimension `dim` applied to an input of `input_size`.
    ///
    /// # Panics
    ///
    /// If `dim >= D`.
    pub fn dim(&self, dim: usize, input_size: usize) -> DimGeometry {
        DimGeometry::new(
            input_size,
            self.kernel_size[dim],
            self.stride[dim],
            self.padding[dim],
            self.dilation[dim],
        )
    }

    /// Check that kernel size, stride and dilation are non-zero in every dimension.
    pub fn validate(&self) -> Result<(), ConvShapeError> {
        for dim in 0..D {
            let values = [
                (ConvParam::KernelSize, self.kernel_size[dim]),
                (ConvParam::Stride, self.stride[dim]),
                (ConvParam::Dilation, self.dilation[dim]),
            ];
            if let Some((param, _)) = values.into_iter().find(|(_, value)| *value == 0) {
                return Err(ConvShapeError::ZeroParameter { param, dim });
            }
        }

        Ok(())
    }

    /// The dilated kernel footprint of every dimension.
    pub fn effective_kernel_size(&self) -> Result<[usize; D], ConvShapeError> {
        self.validate()?;

        let mut sizes = [0; D];
        for (dim, size) in sizes.iter_mut().enumerate() {
            *size = self
                .dim(dim, 1)
                .effective_kernel_size()
                .ok_or(ConvShapeError::Overflow { dim })?;
        }
        Ok(sizes)
    }

    /// The spatial extents produced by convolving an input of `input_shape`.
    pub fn output_spatial_shape(
        &self,
        input_shape: [usize; D],
    ) -> Result<[usize; D], ConvShapeError> {
        let mut output = [0; D];
        for (dim, size) in output.iter_mut().enumerate() {
            *size = self.dim(dim, input_shape[dim]).output_size(dim)?;
        }
        Ok(output)
    }

    /// The full `[batch_size, channels, spatial...]` output shape of the convolution.
    pub fn output_shape(
        &self,
        batch_size: usize,
        channels: usize,
        input_shape: [usize; D],
    ) -> Result<ConvOutputShape<D>, ConvShapeError> {
        let spatial = self.output_spatial_shape(input_shape)?;
        Ok(ConvOutputShape::new(batch_size, channels, spatial))
    }

    /// The spatial extents produced by a transposed convolution of an input of `input_shape`.
    pub fn transposed_output_spatial_shape(
        &self,
        input_shape: [usize; D],
        output_padding: [usize; D],
    ) -> Result<[usize; D], ConvShapeError> {
        let mut output = [0; D];
        for (dim, size) in output.iter_mut().enumerate() {
            *size = self
                .dim(dim, input_shape[dim])
                .transposed_output_size(dim, output_padding[dim])?;
        }
        Ok(output)
    }

    /// The full `[batch_size, channels, spatial...]` output shape of the transposed convolution.
    pub fn transposed_output_shape(
        &self,
        batch_size: usize,
        channels: usize,
        input_shape: [usize; D],
        output_padding: [usize; D],
    ) -> Result<ConvOutputShape<D>, ConvShapeError> {
        let spatial = self.transposed_output_spatial_shape(input_shape, output_padding)?;
        Ok(ConvOutputShape::new(batch_size, channels, spatial))
    }
}
