// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use args::{Args, Command, ConvertArgs, FlattenArgs, Layout};
use clap::Parser;
use scanner_bridge::{
    barcode::{Barcode, Flatten},
    flatten_barcodes,
    image::{encode_jpeg, yuv420_to_nv21, PlanarImage, YuvImage},
};
use serde::Deserialize;
use std::{
    error::Error,
    fs,
    io::{self, Write},
    time::Instant,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod args;

/// Detection results as found in an input file.
#[derive(Deserialize)]
#[serde(untagged)]
enum Detections {
    Many(Vec<Barcode>),
    One(Box<Barcode>),
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match &args.command {
        Command::Convert(convert_args) => convert(convert_args),
        Command::Flatten(flatten_args) => flatten(flatten_args),
    }
}

fn convert(args: &ConvertArgs) -> Result<(), Box<dyn Error>> {
    if args.nv21.is_none() && args.jpeg.is_none() {
        warn!("neither --nv21 nor --jpeg requested, converting without output");
    }

    let frame = fs::read(&args.input)?;
    let (width, height) = args.frame_size()?;
    let mut img = match args.layout {
        Layout::I420 => YuvImage::from_i420(&frame, width, height)?,
        Layout::Nv12 => YuvImage::from_nv12(&frame, width, height)?,
        Layout::Nv21 => YuvImage::from_nv21(&frame, width, height)?,
    };
    if let Some(crop) = args.crop_rect()? {
        img = img.with_crop(crop);
    }
    debug!("loaded {} from {}", img, args.input.display());

    let now = Instant::now();
    let nv21 = yuv420_to_nv21(&img)?;
    let convert_time = now.elapsed();

    if let Some(path) = &args.nv21 {
        fs::write(path, &nv21)?;
        info!("saved {} ({} bytes)", path.display(), nv21.len());
    }

    if let Some(path) = &args.jpeg {
        let crop = img.crop_rect();
        let now = Instant::now();
        let jpeg = encode_jpeg(&nv21, crop.width, crop.height)?;
        let encode_time = now.elapsed();
        fs::write(path, &jpeg)?;
        info!(
            "saved {} resolution: {}x{} size: {}KB convert: {:?} encode: {:?}",
            path.display(),
            crop.width,
            crop.height,
            jpeg.len() / 1024,
            convert_time,
            encode_time,
        );
    }

    Ok(())
}

fn flatten(args: &FlattenArgs) -> Result<(), Box<dyn Error>> {
    let file = fs::File::open(&args.input)?;
    let data = match serde_json::from_reader(io::BufReader::new(file))? {
        Detections::Many(barcodes) => {
            debug!("flattening {} detections", barcodes.len());
            flatten_barcodes(&barcodes)
        }
        Detections::One(barcode) => barcode.flatten(),
    };

    let mut stdout = io::stdout().lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut stdout, &data)?;
    } else {
        serde_json::to_writer(&mut stdout, &data)?;
    }
    writeln!(stdout)?;
    Ok(())
}
