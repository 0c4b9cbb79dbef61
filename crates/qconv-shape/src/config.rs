use crate::{ConvOutputShape, ConvParam, ConvShapeError, KernelGeometry, geometry::expect_rank};
use alloc::{format, string::String, string::ToString, vec::Vec};
use core::fmt::Debug;
use serde::{Deserialize, Serialize};

/// Configuration IO error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid format.
    #[error("Config error => Invalid format: {0}")]
    InvalidFormat(String),

    /// File not found.
    #[error("Config error => File not found: {0}")]
    FileNotFound(String),
}

/// A configuration stored as JSON.
pub trait Config: Debug + Serialize + serde::de::DeserializeOwned {
    /// Writes the configuration as pretty printed JSON to `file`.
    #[cfg(feature = "std")]
    fn save<P: AsRef<std::path::Path>>(&self, file: P) -> std::io::Result<()> {
        let content = config_to_json(self).map_err(std::io::Error::other)?;
        std::fs::write(file, content)
    }

    /// Reads a configuration from the JSON `file`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::FileNotFound`] if the file can't be read, [`ConfigError::InvalidFormat`] if
    /// its content is not a valid configuration.
    #[cfg(feature = "std")]
    fn load<P: AsRef<std::path::Path>>(file: P) -> Result<Self, ConfigError> {
        let path = file.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.to_string_lossy().to_string()))?;
        log::debug!("Loaded config from {}", path.display());
        config_from_str(&content)
    }

    /// Reads a configuration from a UTF-8 JSON buffer.
    fn load_binary(data: &[u8]) -> Result<Self, ConfigError> {
        let content = core::str::from_utf8(data).map_err(|_| {
            ConfigError::InvalidFormat("Could not parse data as utf-8.".to_string())
        })?;
        config_from_str(content)
    }
}

/// Converts a configuration to a pretty printed JSON string.
pub fn config_to_json<C: Config>(config: &C) -> Result<String, ConfigError> {
    serde_json::to_string_pretty(config).map_err(|err| ConfigError::InvalidFormat(format!("{err}")))
}

fn config_from_str<C: Config>(content: &str) -> Result<C, ConfigError> {
    serde_json::from_str(content).map_err(|err| ConfigError::InvalidFormat(format!("{err}")))
}

/// Configuration of a (possibly transposed) quantized convolution, as far as its output shape is
/// concerned.
///
/// The spatial rank is the length of `kernel_size`. Optional parameters default to a stride of 1,
/// no padding, a dilation of 1 and no output padding in every dimension.
#[derive(new, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvShapeConfig {
    /// The number of output channels.
    pub channels_out: usize,
    /// The size of the kernel.
    pub kernel_size: Vec<usize>,
    /// The stride.
    #[new(default)]
    #[serde(default)]
    pub stride: Option<Vec<usize>>,
    /// The padding, added evenly to both sides of the input.
    #[new(default)]
    #[serde(default)]
    pub padding: Option<Vec<usize>>,
    /// The dilation.
    #[new(default)]
    #[serde(default)]
    pub dilation: Option<Vec<usize>>,
    /// The output padding, only used when `transposed` is set.
    #[new(default)]
    #[serde(default)]
    pub output_padding: Option<Vec<usize>>,
    /// Whether the convolution is transposed.
    #[new(default)]
    #[serde(default)]
    pub transposed: bool,
}

impl Config for ConvShapeConfig {}

impl ConvShapeConfig {
    /// Set the stride.
    pub fn with_stride(mut self, stride: Vec<usize>) -> Self {
        self.stride = Some(stride);
        self
    }

    /// Set the padding.
    pub fn with_padding(mut self, padding: Vec<usize>) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Set the dilation.
    pub fn with_dilation(mut self, dilation: Vec<usize>) -> Self {
        self.dilation = Some(dilation);
        self
    }

    /// Set the output padding.
    pub fn with_output_padding(mut self, output_padding: Vec<usize>) -> Self {
        self.output_padding = Some(output_padding);
        self
    }

    /// Set whether the convolution is transposed.
    pub fn with_transposed(mut self, transposed: bool) -> Self {
        self.transposed = transposed;
        self
    }

    /// The number of spatial dimensions.
    pub fn rank(&self) -> usize {
        self.kernel_size.len()
    }

    /// Initialize the [kernel geometry](KernelGeometry) of a `D` dimensional convolution.
    ///
    /// # Errors
    ///
    /// [`ConvShapeError::ShapeMismatch`] when a parameter does not have `D` values and
    /// [`ConvShapeError::ZeroParameter`] when a kernel size, stride or dilation is 0.
    pub fn init<const D: usize>(&self) -> Result<KernelGeometry<D>, ConvShapeError> {
        let kernel_size = expect_rank::<D>(ConvParam::KernelSize, &self.kernel_size)?;
        let stride = per_dim::<D>(ConvParam::Stride, self.stride.as_deref(), 1)?;
        let padding = per_dim::<D>(ConvParam::Padding, self.padding.as_deref(), 0)?;
        let dilation = per_dim::<D>(ConvParam::Dilation, self.dilation.as_deref(), 1)?;

        let geometry = KernelGeometry::new(kernel_size)
            .with_stride(stride)
            .with_padding(padding)
            .with_dilation(dilation);
        geometry.validate()?;

        Ok(geometry)
    }

    /// Compute the output shape for an input of `[batch_size, _, input_shape...]`.
    ///
    /// Dispatches to the regular or transposed rule depending on `transposed`.
    pub fn output_shape<const D: usize>(
        &self,
        batch_size: usize,
        input_shape: [usize; D],
    ) -> Result<ConvOutputShape<D>, ConvShapeError> {
        let result = self.init::<D>().and_then(|geometry| {
            if self.transposed {
                let output_padding = per_dim::<D>(
                    ConvParam::OutputPadding,
                    self.output_padding.as_deref(),
                    0,
                )?;
                geometry.transposed_output_shape(
                    batch_size,
                    self.channels_out,
                    input_shape,
                    output_padding,
                )
            } else {
                geometry.output_shape(batch_size, self.channels_out, input_shape)
            }
        });

        match &result {
            Ok(shape) => log::debug!("Conv output shape for input {input_shape:?}: {shape}"),
            Err(err) => log::warn!("Rejected conv configuration for input {input_shape:?}: {err}"),
        }

        result
    }
}

fn per_dim<const D: usize>(
    param: ConvParam,
    values: Option<&[usize]>,
    default: usize,
) -> Result<[usize; D], ConvShapeError> {
    match values {
        Some(values) => expect_rank(param, values),
        None => Ok([default; D]),
    }
}
