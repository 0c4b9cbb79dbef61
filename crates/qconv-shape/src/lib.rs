#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Quantized Convolution Shapes
//!
//! Output shape arithmetic for 1D, 2D and 3D convolutions. Quantized convolution operators use it
//! to size their output buffer and to reject geometrically unrealizable configurations before any
//! kernel runs.
//!
//! ```rust
//! use qconv_shape::conv_output_shape;
//!
//! let shape = conv_output_shape::<2>(1, 8, &[4, 4], &[3, 3], &[1, 1], &[0, 0], &[1, 1]).unwrap();
//! assert_eq!(shape.dims::<4>(), [1, 8, 2, 2]);
//! ```

#[macro_use]
extern crate derive_new;

extern crate alloc;

/// Convolution output shape computation.
pub mod conv;

/// Serializable convolution configuration.
pub mod config;

mod error;
mod geometry;
mod shape;

pub use config::{Config, ConfigError, ConvShapeConfig};
pub use conv::*;
pub use error::*;
pub use geometry::{DimGeometry, KernelGeometry};
pub use shape::ConvOutputShape;
