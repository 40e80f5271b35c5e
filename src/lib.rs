// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # Scanner Bridge Library
//!
//! Glue between a camera's planar YUV frames, a barcode detector and the
//! plugin channel that reports detections to the application.
//!
//! ## Features
//!
//! - **NV21 Conversion**: Repack planar or semi-planar YUV 4:2:0 camera
//!   planes (arbitrary row and pixel strides, optional crop) into a single
//!   contiguous NV21 buffer.
//! - **JPEG Encoding**: Compress NV21 frames with turbojpeg at a fixed
//!   quality.
//! - **Result Flattening**: Turn typed detection results into the
//!   string-keyed mapping sent across the plugin boundary.
//!
//! ## Example
//!
//! ```
//! use scanner_bridge::{
//!     barcode::{Barcode, Flatten},
//!     image::{yuv420_to_jpeg, yuv420_to_nv21, YuvImage},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // A 640x480 frame laid out the way camera preview buffers usually are
//! let frame = vec![0u8; 640 * 480 * 3 / 2];
//! let img = YuvImage::from_nv12(&frame, 640, 480)?;
//!
//! let nv21 = yuv420_to_nv21(&img)?;
//! assert_eq!(nv21.len(), 460800);
//! let jpeg = yuv420_to_jpeg(&img)?;
//! assert!(!jpeg.is_empty());
//!
//! let data = Barcode::default().flatten();
//! assert!(data["contactInfo"].is_null());
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! Every operation reads borrowed input and allocates its own output, so
//! independent frames and results can be processed from any number of
//! threads.

pub mod barcode;
pub mod image;

use barcode::{Barcode, Flatten};
use serde_json::Value;

/// Flattens every detection of a frame into a single list.
pub fn flatten_barcodes(barcodes: &[Barcode]) -> Value {
    barcodes.flatten()
}
