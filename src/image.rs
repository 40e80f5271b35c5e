// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use core::fmt;
use std::{error::Error, io};
use tracing::{debug, trace};

/// JPEG quality factor used when compressing converted frames.
pub const JPEG_QUALITY: i32 = 50;

/// Pixel formats reported by the camera subsystem.
///
/// Only the YUV family matters to the converter; the remaining variants exist
/// so that the output size formula can be evaluated for whatever format the
/// camera declares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Flexible 4:2:0 YUV, three planes (the usual camera preview format)
    Yuv420_888,
    /// Flexible 4:2:2 YUV, three planes
    Yuv422_888,
    /// Flexible 4:4:4 YUV, three planes
    Yuv444_888,
    /// 4:2:0 semi-planar, interleaved V/U chroma
    Nv21,
    /// 4:2:2 semi-planar
    Nv16,
    /// 4:2:0 planar, V plane before U plane
    Yv12,
    /// 4:2:2 packed
    Yuy2,
    /// Luma only
    Y8,
}

impl ImageFormat {
    /// Numeric format code as used by the camera subsystem.
    pub const fn code(self) -> i32 {
        match self {
            ImageFormat::Yuv420_888 => 0x23,
            ImageFormat::Yuv422_888 => 0x27,
            ImageFormat::Yuv444_888 => 0x28,
            ImageFormat::Nv21 => 0x11,
            ImageFormat::Nv16 => 0x10,
            ImageFormat::Yv12 => 0x3231_5659,
            ImageFormat::Yuy2 => 0x14,
            ImageFormat::Y8 => 0x2020_3859,
        }
    }

    /// Average number of bits per pixel across all planes of the format.
    pub const fn bits_per_pixel(self) -> usize {
        match self {
            ImageFormat::Yuv420_888 | ImageFormat::Nv21 | ImageFormat::Yv12 => 12,
            ImageFormat::Yuv422_888 | ImageFormat::Nv16 | ImageFormat::Yuy2 => 16,
            ImageFormat::Yuv444_888 => 24,
            ImageFormat::Y8 => 8,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ImageFormat::Yuv420_888 => "YUV_420_888",
            ImageFormat::Yuv422_888 => "YUV_422_888",
            ImageFormat::Yuv444_888 => "YUV_444_888",
            ImageFormat::Nv21 => "NV21",
            ImageFormat::Nv16 => "NV16",
            ImageFormat::Yv12 => "YV12",
            ImageFormat::Yuy2 => "YUY2",
            ImageFormat::Y8 => "Y8",
        };
        f.write_str(name)
    }
}

/// Rectangle specification for crop operations.
///
/// Defines the region of the frame the conversion operates over.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: u32,
    /// Y coordinate of top-left corner
    pub y: u32,
    /// Width of the rectangle in pixels
    pub width: u32,
    /// Height of the rectangle in pixels
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// A single plane of image data.
///
/// Samples are `pixel_stride` bytes apart within a row and rows start
/// `row_stride` bytes apart, so a plane may share its backing memory with
/// another plane (semi-planar layouts).
#[derive(Copy, Clone, Debug)]
pub struct Plane<'a> {
    pub data: &'a [u8],
    pub row_stride: usize,
    pub pixel_stride: usize,
}

impl<'a> Plane<'a> {
    pub const fn new(data: &'a [u8], row_stride: usize, pixel_stride: usize) -> Self {
        Plane {
            data,
            row_stride,
            pixel_stride,
        }
    }
}

/// A planar camera image, borrowed for the duration of a conversion.
///
/// Plane 0 is full resolution luma, plane 1 is U (Cb) and plane 2 is V (Cr),
/// both chroma planes subsampled 2:1 in each direction.
pub trait PlanarImage {
    fn format(&self) -> ImageFormat;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn planes(&self) -> &[Plane<'_>];

    /// Region of the frame holding valid pixels; the whole frame by default.
    fn crop_rect(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }
}

/// Borrowed three-plane YUV image.
///
/// # Example
///
/// ```
/// use scanner_bridge::image::{ImageFormat, PlanarImage, Rect, YuvImage};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let frame = vec![0u8; 640 * 480 * 3 / 2];
/// let img = YuvImage::from_nv12(&frame, 640, 480)?.with_crop(Rect::new(0, 0, 320, 240));
///
/// assert_eq!(img.format(), ImageFormat::Yuv420_888);
/// assert_eq!(img.planes()[1].pixel_stride, 2);
/// assert_eq!(img.crop_rect().width, 320);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct YuvImage<'a> {
    width: u32,
    height: u32,
    format: ImageFormat,
    crop: Rect,
    planes: Vec<Plane<'a>>,
}

impl<'a> YuvImage<'a> {
    pub fn new(width: u32, height: u32, format: ImageFormat, planes: Vec<Plane<'a>>) -> Self {
        Self {
            width,
            height,
            format,
            crop: Rect::new(0, 0, width, height),
            planes,
        }
    }

    pub fn with_crop(mut self, crop: Rect) -> Self {
        self.crop = crop;
        self
    }

    /// Describes a contiguous I420 dump (Y, then U, then V planes) as a
    /// three-plane image with pixel stride 1.
    pub fn from_i420(data: &'a [u8], width: u32, height: u32) -> Result<Self, Box<dyn Error>> {
        let (luma, chroma_width, chroma_height) = plane_sizes(width, height);
        let chroma = chroma_width * chroma_height;
        let data = frame_slice(data, luma + 2 * chroma, width, height)?;
        let (y, rest) = data.split_at(luma);
        let (u, v) = rest.split_at(chroma);

        Ok(Self::new(
            width,
            height,
            ImageFormat::Yuv420_888,
            vec![
                Plane::new(y, width as usize, 1),
                Plane::new(u, chroma_width, 1),
                Plane::new(v, chroma_width, 1),
            ],
        ))
    }

    /// Describes a contiguous NV12 dump (Y plane, then interleaved U/V) the
    /// way a camera exposes semi-planar memory: the U and V planes overlap
    /// and both have a pixel stride of 2.
    pub fn from_nv12(data: &'a [u8], width: u32, height: u32) -> Result<Self, Box<dyn Error>> {
        let (y, first, second) = semi_planar(data, width, height)?;
        Ok(Self::semi_planar_image(width, height, y, first, second))
    }

    /// Same as [`YuvImage::from_nv12`] for a dump with V/U chroma ordering.
    pub fn from_nv21(data: &'a [u8], width: u32, height: u32) -> Result<Self, Box<dyn Error>> {
        let (y, first, second) = semi_planar(data, width, height)?;
        Ok(Self::semi_planar_image(width, height, y, second, first))
    }

    fn semi_planar_image(width: u32, height: u32, y: &'a [u8], u: &'a [u8], v: &'a [u8]) -> Self {
        let chroma_row = 2 * width.div_ceil(2) as usize;
        Self::new(
            width,
            height,
            ImageFormat::Yuv420_888,
            vec![
                Plane::new(y, width as usize, 1),
                Plane::new(u, chroma_row, 2),
                Plane::new(v, chroma_row, 2),
            ],
        )
    }
}

impl PlanarImage for YuvImage<'_> {
    fn format(&self) -> ImageFormat {
        self.format
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn planes(&self) -> &[Plane<'_>] {
        &self.planes
    }

    fn crop_rect(&self) -> Rect {
        self.crop
    }
}

impl fmt::Display for YuvImage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{} {} crop:{} planes:{}",
            self.width,
            self.height,
            self.format,
            self.crop,
            self.planes.len()
        )
    }
}

/// Luma size and chroma plane dimensions of a 4:2:0 frame.
fn plane_sizes(width: u32, height: u32) -> (usize, usize, usize) {
    (
        width as usize * height as usize,
        width.div_ceil(2) as usize,
        height.div_ceil(2) as usize,
    )
}

fn frame_slice(data: &[u8], len: usize, width: u32, height: u32) -> io::Result<&[u8]> {
    data.get(..len).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "{}x{} frame needs {} bytes but only {} provided",
                width,
                height,
                len,
                data.len()
            ),
        )
    })
}

/// Splits a semi-planar dump into the luma plane and the two overlapping
/// chroma views, the first starting at the chroma region and the second one
/// byte later.
fn semi_planar(data: &[u8], width: u32, height: u32) -> io::Result<(&[u8], &[u8], &[u8])> {
    let (luma, chroma_width, chroma_height) = plane_sizes(width, height);
    let chroma = 2 * chroma_width * chroma_height;
    let data = frame_slice(data, luma + chroma, width, height)?;
    let (y, vu) = data.split_at(luma);
    if vu.is_empty() {
        return Ok((y, vu, vu));
    }
    Ok((y, &vu[..chroma - 1], &vu[1..]))
}

/// Plane roles within the NV21 output.
///
/// Plane 1 (U) lands on the odd chroma bytes and plane 2 (V) on the even
/// ones, giving the V,U ordering of NV21.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    Luma,
    ChromaU,
    ChromaV,
}

impl Channel {
    /// Channels in camera plane order.
    pub const ALL: [Channel; 3] = [Channel::Luma, Channel::ChromaU, Channel::ChromaV];

    /// First destination byte for a `width` x `height` output frame.
    pub const fn offset(self, width: usize, height: usize) -> usize {
        match self {
            Channel::Luma => 0,
            Channel::ChromaU => width * height + 1,
            Channel::ChromaV => width * height,
        }
    }

    /// Distance between consecutive destination bytes.
    pub const fn output_stride(self) -> usize {
        match self {
            Channel::Luma => 1,
            Channel::ChromaU | Channel::ChromaV => 2,
        }
    }

    /// Subsampling shift applied to dimensions and crop offsets.
    pub const fn shift(self) -> u32 {
        match self {
            Channel::Luma => 0,
            Channel::ChromaU | Channel::ChromaV => 1,
        }
    }
}

/// Converts a planar YUV 4:2:0 image into an NV21 byte buffer.
///
/// The output covers the image's crop rectangle and is sized from the
/// declared format (`width * height * bits_per_pixel / 8`). Planes past the
/// third are ignored; missing planes leave their bytes zeroed.
///
/// # Errors
///
/// Returns an error if a plane is too short for the rows the crop rectangle
/// addresses, or if the declared format leaves no room in the output buffer
/// for the chroma samples.
///
/// # Example
///
/// ```
/// use scanner_bridge::image::{yuv420_to_nv21, YuvImage};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let frame = vec![128u8; 4 * 4 * 3 / 2];
/// let img = YuvImage::from_i420(&frame, 4, 4)?;
/// let nv21 = yuv420_to_nv21(&img)?;
/// assert_eq!(nv21.len(), 24);
/// # Ok(())
/// # }
/// ```
pub fn yuv420_to_nv21(image: &impl PlanarImage) -> Result<Vec<u8>, Box<dyn Error>> {
    let crop = image.crop_rect();
    let format = image.format();
    let len = crop.width as usize * crop.height as usize * format.bits_per_pixel() / 8;
    let mut data = vec![0u8; len];

    for (plane, channel) in image.planes().iter().zip(Channel::ALL) {
        copy_plane(plane, channel, &crop, &mut data)?;
    }

    debug!(
        "converted {}x{} {} frame crop:{} to {} NV21 bytes",
        image.width(),
        image.height(),
        format,
        crop,
        data.len()
    );
    Ok(data)
}

fn copy_plane(plane: &Plane, channel: Channel, crop: &Rect, data: &mut [u8]) -> io::Result<()> {
    let shift = channel.shift();
    let width = (crop.width >> shift) as usize;
    let height = (crop.height >> shift) as usize;
    let output_stride = channel.output_stride();
    let mut offset = channel.offset(crop.width as usize, crop.height as usize);
    let start = plane.row_stride * (crop.y >> shift) as usize
        + plane.pixel_stride * (crop.x >> shift) as usize;

    trace!(
        ?channel,
        width,
        height,
        start,
        row_stride = plane.row_stride,
        pixel_stride = plane.pixel_stride,
        "copying plane"
    );

    if width == 0 {
        return Ok(());
    }

    for row in 0..height {
        let row_start = start + row * plane.row_stride;
        offset = if plane.pixel_stride == 1 && output_stride == 1 {
            let src = read_row(plane, channel, row_start, width)?;
            copy_row(src, data, offset)?
        } else {
            let length = (width - 1) * plane.pixel_stride + 1;
            let src = read_row(plane, channel, row_start, length)?;
            scatter_row(src, plane.pixel_stride, data, offset, output_stride, width)?
        };
    }

    Ok(())
}

fn read_row<'a>(
    plane: &Plane<'a>,
    channel: Channel,
    start: usize,
    length: usize,
) -> io::Result<&'a [u8]> {
    plane.data.get(start..start + length).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "{:?} plane holds {} bytes, row read needs {}..{}",
                channel,
                plane.data.len(),
                start,
                start + length
            ),
        )
    })
}

fn short_destination(len: usize, end: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("output buffer of {} bytes cannot hold byte {}", len, end),
    )
}

/// Copies a contiguous row, returning the next destination offset.
fn copy_row(row: &[u8], dst: &mut [u8], offset: usize) -> io::Result<usize> {
    let end = offset + row.len();
    let len = dst.len();
    dst.get_mut(offset..end)
        .ok_or_else(|| short_destination(len, end))?
        .copy_from_slice(row);
    Ok(end)
}

/// Writes every `pixel_stride`-th byte of `row` to `dst` at `output_stride`
/// spacing, returning the next destination offset.
fn scatter_row(
    row: &[u8],
    pixel_stride: usize,
    dst: &mut [u8],
    mut offset: usize,
    output_stride: usize,
    count: usize,
) -> io::Result<usize> {
    if count == 0 {
        return Ok(offset);
    }
    let last = offset + (count - 1) * output_stride;
    if last >= dst.len() {
        return Err(short_destination(dst.len(), last));
    }

    for col in 0..count {
        dst[offset] = row[col * pixel_stride];
        offset += output_stride;
    }
    Ok(offset)
}

/// Re-planes an NV21 buffer into the I420 layout libjpeg-turbo compresses.
///
/// libjpeg-turbo expects 4:2:0 luma planes padded to even dimensions and
/// chroma planes of half that size, so odd frames repeat their last column
/// and row.
fn nv21_to_i420(nv21: &[u8], width: usize, height: usize) -> Vec<u8> {
    let luma = width * height;
    let (plane_width, plane_height) = (width.div_ceil(2), height.div_ceil(2));
    let (luma_width, luma_height) = (2 * plane_width, 2 * plane_height);
    let (chroma_width, chroma_height) = (width / 2, height / 2);
    let vu = &nv21[luma..luma + 2 * chroma_width * chroma_height];

    let mut planes = Vec::with_capacity(luma_width * luma_height + 2 * plane_width * plane_height);
    if width > 0 {
        for row in 0..luma_height {
            let src = &nv21[row.min(height - 1) * width..][..width];
            planes.extend_from_slice(src);
            planes.extend(std::iter::repeat_n(src[width - 1], luma_width - width));
        }
    }

    let mut u = vec![128u8; plane_width * plane_height];
    let mut v = vec![128u8; plane_width * plane_height];
    if chroma_width > 0 && chroma_height > 0 {
        for row in 0..plane_height {
            let src_row = row.min(chroma_height - 1) * chroma_width;
            for col in 0..plane_width {
                let idx = 2 * (src_row + col.min(chroma_width - 1));
                v[row * plane_width + col] = vu[idx];
                u[row * plane_width + col] = vu[idx + 1];
            }
        }
    }

    planes.extend_from_slice(&u);
    planes.extend_from_slice(&v);
    planes
}

/// Encodes an NV21 frame to JPEG using turbojpeg.
///
/// The whole `width` x `height` frame is compressed with 4:2:0 subsampling
/// at [`JPEG_QUALITY`].
///
/// # Errors
///
/// Returns an error if:
/// - The buffer is shorter than the NV21 layout of the given dimensions
/// - JPEG compression fails
///
/// # Example
///
/// ```
/// use scanner_bridge::image::encode_jpeg;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let nv21 = vec![128u8; 64 * 48 * 3 / 2];
/// let jpeg = encode_jpeg(&nv21, 64, 48)?;
/// assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
/// # Ok(())
/// # }
/// ```
pub fn encode_jpeg(nv21: &[u8], width: u32, height: u32) -> Result<Vec<u8>, Box<dyn Error>> {
    if width == 0 || height == 0 {
        return Err(Box::new(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot encode an empty {}x{} frame", width, height),
        )));
    }

    let (w, h) = (width as usize, height as usize);
    let needed = w * h + 2 * (w / 2) * (h / 2);
    if nv21.len() < needed {
        return Err(Box::new(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "NV21 buffer holds {} bytes, {}x{} needs {}",
                nv21.len(),
                width,
                height,
                needed
            ),
        )));
    }

    let planes = nv21_to_i420(nv21, w, h);
    let img = turbojpeg::YuvImage {
        pixels: planes.as_slice(),
        width: w,
        align: 1,
        height: h,
        subsamp: turbojpeg::Subsamp::Sub2x2,
    };

    let jpeg = turbojpeg::compress_yuv(img, JPEG_QUALITY)?;
    debug!("encoded {}x{} jpeg {} bytes", width, height, jpeg.len());
    Ok(jpeg.to_vec())
}

/// Converts a planar YUV 4:2:0 image to NV21 and compresses it to JPEG.
pub fn yuv420_to_jpeg(image: &impl PlanarImage) -> Result<Vec<u8>, Box<dyn Error>> {
    let nv21 = yuv420_to_nv21(image)?;
    let crop = image.crop_rect();
    encode_jpeg(&nv21, crop.width, crop.height)
}
