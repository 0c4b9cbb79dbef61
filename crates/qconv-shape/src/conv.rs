//! # Convolution Output Shapes
//!
//! Output shapes of strided, padded and dilated convolutions, computed before any kernel runs so
//! that the caller can allocate the output buffer and reject unrealizable configurations.
//!
//! # Reference
//!
//! - [conv_arithmetic diagram](https://github.com/vdumoulin/conv_arithmetic/blob/master/README.md)
//!   visual explanations of these convolution parameters.
//! - [pytorch conv2d](https://docs.pytorch.org/docs/stable/generated/torch.nn.Conv2d.html)

use crate::geometry::{check_rank, expect_rank};
use crate::{ConvOutputShape, ConvParam, ConvShapeError, DimGeometry, KernelGeometry};
use alloc::vec::Vec;

/// Predict the output size of a convolution along a single dimension.
///
/// ```text
/// out_size = floor( (in_size + 2*padding - dilation*(kernel_size-1) - 1) / stride ) + 1
/// ```
///
/// # Arguments
///
/// - `input_size`: The input dimension size, must be > 0.
/// - `kernel_size`: The kernel size, must be > 0.
/// - `stride`: The stride of the convolution, must be > 0.
/// - `padding`: The padding of the convolution, added evenly to both sides of the input.
/// - `dilation`: The dilation of the convolution, must be > 0.
///
/// # Errors
///
/// - [`ConvShapeError::ZeroParameter`] if a parameter that must be positive is 0.
/// - [`ConvShapeError::DegenerateOutput`] if the dilated kernel does not fit in the padded input.
pub fn conv_output_size(
    input_size: usize,
    kernel_size: usize,
    stride: usize,
    padding: usize,
    dilation: usize,
) -> Result<usize, ConvShapeError> {
    DimGeometry::new(input_size, kernel_size, stride, padding, dilation).output_size(0)
}

/// Predict the output shape of a `D` dimensional convolution.
///
/// Every spatial dimension is computed independently with [`conv_output_size`]. The result is
/// `[batch_size, channels_out, out_0, ..., out_{D-1}]`.
///
/// # Arguments
///
/// - `batch_size`: The mini-batch size, copied through.
/// - `channels_out`: The number of output channels, copied through.
/// - `input_shape`: The spatial extent of the input, `D` values each > 0.
/// - `kernel_size`: `D` values, each > 0.
/// - `stride`: `D` values, each > 0.
/// - `padding`: `D` values, added evenly to both sides of the input.
/// - `dilation`: `D` values, each > 0.
///
/// # Errors
///
/// - [`ConvShapeError::ShapeMismatch`] if a parameter does not have `D` values; checked for all
///   parameters before any arithmetic.
/// - [`ConvShapeError::ZeroParameter`], [`ConvShapeError::DegenerateOutput`] and
///   [`ConvShapeError::Overflow`] for the first dimension that cannot be computed.
pub fn conv_output_shape<const D: usize>(
    batch_size: usize,
    channels_out: usize,
    input_shape: &[usize],
    kernel_size: &[usize],
    stride: &[usize],
    padding: &[usize],
    dilation: &[usize],
) -> Result<ConvOutputShape<D>, ConvShapeError> {
    check_rank::<D>();

    let input_shape = expect_rank::<D>(ConvParam::InputShape, input_shape)?;
    let geometry = KernelGeometry::<D>::from_slices(kernel_size, stride, padding, dilation)?;

    geometry.output_shape(batch_size, channels_out, input_shape)
}

/// Output shape `[batch_size, channels_out, length_out]` of a 1D convolution.
///
/// See [`conv_output_shape`].
pub fn conv1d_output_shape(
    batch_size: usize,
    channels_out: usize,
    input_shape: &[usize],
    kernel_size: &[usize],
    stride: &[usize],
    padding: &[usize],
    dilation: &[usize],
) -> Result<[usize; 3], ConvShapeError> {
    conv_output_shape::<1>(
        batch_size,
        channels_out,
        input_shape,
        kernel_size,
        stride,
        padding,
        dilation,
    )
    .map(|shape| shape.dims())
}

/// Output shape `[batch_size, channels_out, height_out, width_out]` of a 2D convolution.
///
/// See [`conv_output_shape`].
pub fn conv2d_output_shape(
    batch_size: usize,
    channels_out: usize,
    input_shape: &[usize],
    kernel_size: &[usize],
    stride: &[usize],
    padding: &[usize],
    dilation: &[usize],
) -> Result<[usize; 4], ConvShapeError> {
    conv_output_shape::<2>(
        batch_size,
        channels_out,
        input_shape,
        kernel_size,
        stride,
        padding,
        dilation,
    )
    .map(|shape| shape.dims())
}

/// Output shape `[batch_size, channels_out, depth_out, height_out, width_out]` of a 3D
/// convolution.
///
/// See [`conv_output_shape`].
pub fn conv3d_output_shape(
    batch_size: usize,
    channels_out: usize,
    input_shape: &[usize],
    kernel_size: &[usize],
    stride: &[usize],
    padding: &[usize],
    dilation: &[usize],
) -> Result<[usize; 5], ConvShapeError> {
    conv_output_shape::<3>(
        batch_size,
        channels_out,
        input_shape,
        kernel_size,
        stride,
        padding,
        dilation,
    )
    .map(|shape| shape.dims())
}

/// Predict the output shape of a convolution whose rank is only known at runtime.
///
/// The rank is taken from `input_shape` and dispatched to [`conv_output_shape`].
///
/// # Errors
///
/// [`ConvShapeError::UnsupportedRank`] if `input_shape` does not have 1, 2 or 3 values, otherwise
/// the errors of [`conv_output_shape`].
pub fn conv_output_shape_dyn(
    batch_size: usize,
    channels_out: usize,
    input_shape: &[usize],
    kernel_size: &[usize],
    stride: &[usize],
    padding: &[usize],
    dilation: &[usize],
) -> Result<Vec<usize>, ConvShapeError> {
    match input_shape.len() {
        1 => conv_output_shape::<1>(
            batch_size,
            channels_out,
            input_shape,
            kernel_size,
            stride,
            padding,
            dilation,
        )
        .map(Vec::from),
        2 => conv_output_shape::<2>(
            batch_size,
            channels_out,
            input_shape,
            kernel_size,
            stride,
            padding,
            dilation,
        )
        .map(Vec::from),
        3 => conv_output_shape::<3>(
            batch_size,
            channels_out,
            input_shape,
            kernel_size,
            stride,
            padding,
            dilation,
        )
        .map(Vec::from),
        rank => Err(ConvShapeError::UnsupportedRank { rank }),
    }
}

/// Predict the output shape of a `D` dimensional transposed convolution.
///
/// ```text
/// out_size = (in_size - 1)*stride - 2*padding + dilation*(kernel_size-1) + output_padding + 1
/// ```
///
/// # Errors
///
/// - [`ConvShapeError::ShapeMismatch`] if a parameter does not have `D` values.
/// - [`ConvShapeError::InvalidOutputPadding`] if `output_padding` is neither smaller than the
///   stride nor smaller than the dilation.
/// - [`ConvShapeError::DegenerateTransposedOutput`] if the padding trims the whole output.
#[allow(clippy::too_many_arguments)]
pub fn conv_transpose_output_shape<const D: usize>(
    batch_size: usize,
    channels_out: usize,
    input_shape: &[usize],
    kernel_size: &[usize],
    stride: &[usize],
    padding: &[usize],
    output_padding: &[usize],
    dilation: &[usize],
) -> Result<ConvOutputShape<D>, ConvShapeError> {
    check_rank::<D>();

    let input_shape = expect_rank::<D>(ConvParam::InputShape, input_shape)?;
    let geometry = KernelGeometry::<D>::from_slices(kernel_size, stride, padding, dilation)?;
    let output_padding = expect_rank::<D>(ConvParam::OutputPadding, output_padding)?;

    geometry.transposed_output_shape(batch_size, channels_out, input_shape, output_padding)
}
