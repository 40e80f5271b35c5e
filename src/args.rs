// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::{Parser, Subcommand};
use scanner_bridge::image::Rect;
use std::{io, path::PathBuf};

/// Memory layout of a raw frame dump.
///
/// Every layout is presented to the converter as a three-plane 4:2:0 image,
/// the same way a camera exposes it.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum Layout {
    /// Fully planar: Y, then U, then V (pixel stride 1)
    I420,
    /// Semi-planar with U/V interleaved chroma (pixel stride 2)
    Nv12,
    /// Semi-planar with V/U interleaved chroma (pixel stride 2)
    Nv21,
}

/// Command-line arguments for the scanner bridge tool.
///
/// # Example
///
/// ```bash
/// # Convert a camera preview dump to JPEG
/// scanner-bridge convert --input frame.yuv --size "1280 720" --jpeg frame.jpeg
///
/// # Flatten detections for the plugin channel
/// scanner-bridge flatten --input detections.json --pretty
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose debug logging
    #[arg(short, long, global = true, env = "VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert a raw YUV 4:2:0 frame to NV21 and/or JPEG
    Convert(ConvertArgs),
    /// Flatten detection results (JSON) into the plugin key/value layout
    Flatten(FlattenArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Raw frame file
    #[arg(short, long, env = "FRAME")]
    pub input: PathBuf,

    /// Frame resolution in pixels (width height)
    #[arg(
        long,
        env = "FRAME_SIZE",
        value_delimiter = ' ',
        num_args = 2,
        required = true
    )]
    pub size: Vec<u32>,

    /// Memory layout of the raw frame
    #[arg(long, env = "FRAME_LAYOUT", default_value = "nv12", value_enum)]
    pub layout: Layout,

    /// Crop rectangle (x y width height), defaults to the whole frame
    #[arg(long, env = "CROP", value_delimiter = ' ', num_args = 4)]
    pub crop: Option<Vec<u32>>,

    /// Write the converted NV21 buffer to this path
    #[arg(long, env = "NV21_OUTPUT")]
    pub nv21: Option<PathBuf>,

    /// Write the JPEG compressed frame to this path
    #[arg(long, env = "JPEG_OUTPUT")]
    pub jpeg: Option<PathBuf>,
}

fn value_count(option: &str, expected: usize, found: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{} expects {} values but {} were given", option, expected, found),
    )
}

impl ConvertArgs {
    /// Frame width and height. Values taken from the environment bypass
    /// clap's `num_args` check, so the count is verified here.
    pub fn frame_size(&self) -> io::Result<(u32, u32)> {
        match self.size.as_slice() {
            [width, height] => Ok((*width, *height)),
            other => Err(value_count("--size", 2, other.len())),
        }
    }

    pub fn crop_rect(&self) -> io::Result<Option<Rect>> {
        match self.crop.as_deref() {
            None => Ok(None),
            Some([x, y, width, height]) => Ok(Some(Rect::new(*x, *y, *width, *height))),
            Some(other) => Err(value_count("--crop", 4, other.len())),
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct FlattenArgs {
    /// JSON file holding one detection result or an array of them
    #[arg(short, long, env = "RESULTS")]
    pub input: PathBuf,

    /// Pretty-print the flattened output
    #[arg(long)]
    pub pretty: bool,
}
