use crate::geometry::DimGeometry;
use thiserror::Error;

/// A convolution parameter, used to point at the offending argument in [`ConvShapeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvParam {
    /// Spatial extent of the input.
    InputShape,
    /// Kernel size.
    KernelSize,
    /// Stride.
    Stride,
    /// Padding, added evenly to both sides of the input.
    Padding,
    /// Dilation.
    Dilation,
    /// Output padding of a transposed convolution.
    OutputPadding,
}

impl core::fmt::Display for ConvParam {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::InputShape => "input_shape",
            Self::KernelSize => "kernel_size",
            Self::Stride => "stride",
            Self::Padding => "padding",
            Self::Dilation => "dilation",
            Self::OutputPadding => "output_padding",
        };
        f.write_str(name)
    }
}

/// The things that can go wrong when computing a convolution output shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvShapeError {
    /// A per-dimension parameter does not have one value per spatial dimension.
    #[error("Expected {param} to have {expected} values (one per spatial dimension), got {actual}")]
    ShapeMismatch {
        /// The parameter with the wrong length.
        param: ConvParam,
        /// The spatial rank.
        expected: usize,
        /// The length that was provided.
        actual: usize,
    },

    /// A parameter that must be strictly positive is zero.
    #[error("{param} must be non-zero, got 0 for spatial dimension {dim}")]
    ZeroParameter {
        /// The zero parameter.
        param: ConvParam,
        /// The spatial dimension index.
        dim: usize,
    },

    /// No sliding-window position fits in the padded input.
    #[error("No legal output size for conv along spatial dimension {dim} with:\n{geometry}")]
    DegenerateOutput {
        /// The spatial dimension index.
        dim: usize,
        /// The parameters of that dimension.
        geometry: DimGeometry,
    },

    /// The transposed convolution would produce an empty output.
    #[error(
        "No legal output size for conv_transpose along spatial dimension {dim} with:\n{geometry}\n output_padding:{output_padding}"
    )]
    DegenerateTransposedOutput {
        /// The spatial dimension index.
        dim: usize,
        /// The parameters of that dimension.
        geometry: DimGeometry,
        /// The output padding of that dimension.
        output_padding: usize,
    },

    /// The output padding of a transposed convolution is neither smaller than the stride nor
    /// smaller than the dilation.
    #[error(
        "output_padding ({output_padding}) must be smaller than either stride ({stride}) or dilation ({dilation}) for spatial dimension {dim}"
    )]
    InvalidOutputPadding {
        /// The spatial dimension index.
        dim: usize,
        /// The output padding.
        output_padding: usize,
        /// The stride.
        stride: usize,
        /// The dilation.
        dilation: usize,
    },

    /// Only 1, 2 and 3 spatial dimensions are supported.
    #[error("Unsupported convolution spatial rank {rank}, expected 1, 2 or 3")]
    UnsupportedRank {
        /// The requested rank.
        rank: usize,
    },

    /// An intermediate value does not fit in `usize`.
    #[error("Arithmetic overflow while computing the output size of spatial dimension {dim}")]
    Overflow {
        /// The spatial dimension index.
        dim: usize,
    },
}
