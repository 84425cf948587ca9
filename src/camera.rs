//! Camera capture feeding the image sensor.
//!
//! padbridge does not talk to a camera stack itself. Hosts register a
//! [`CameraBackend`] (a platform capture API, a video file reader, ...) with
//! the controller; the backend pushes decoded frames into a [`FrameSink`],
//! which updates the shared [`CameraImage`](crate::sensor::CameraImage) the
//! core samples from.
//!
//! The camera only runs while the core has an image request open and the
//! configured camera driver is [`CameraDriver::Native`](crate::config::CameraDriver::Native).
//!
//! # Format negotiation
//! [`choose_camera_format`] keeps the smallest format at or below 1280×720
//! that still covers the requested size and whose pixel format
//! [`FrameSink`] can convert.

use crate::error::Result;
use crate::sensor::CameraImage;
use image::RgbaImage;
use std::sync::Arc;

/// Upper bound of the negotiated capture size.
pub const MAX_CAPTURE_SIZE: (u32, u32) = (1280, 720);

/// Pixel formats [`FrameSink::present_raw`] can convert.
pub const SUPPORTED_PIXEL_FORMATS: [PixelFormat; 3] =
    [PixelFormat::Rgba32, PixelFormat::Bgra32, PixelFormat::Rgb24];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraDevice {
    /// Backend-specific identifier, persisted as the `camera` option.
    pub id: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgba32,
    Bgra32,
    Rgb24,
    Yuyv,
    Nv12,
    Mjpeg,
    /// Backend code padbridge has no name for.
    Other(u32),
}

impl PixelFormat {
    /// Bytes per pixel for packed formats.
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            PixelFormat::Rgba32 | PixelFormat::Bgra32 => Some(4),
            PixelFormat::Rgb24 => Some(3),
            PixelFormat::Yuyv => Some(2),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
}

/// Where a backend delivers captured frames.
#[derive(Clone, Debug)]
pub struct FrameSink {
    image: Arc<CameraImage>,
}

impl FrameSink {
    pub fn new(image: Arc<CameraImage>) -> Self {
        Self { image }
    }

    /// Replace the sensor image with `frame`.
    pub fn present(&self, frame: RgbaImage) {
        self.image.set_image(frame);
    }

    /// Convert a packed buffer and present it. Returns `false` (and drops the
    /// frame) when the format is unsupported or `data` is too short.
    pub fn present_raw(&self, width: u32, height: u32, format: PixelFormat, data: &[u8]) -> bool {
        match decode_packed(width, height, format, data) {
            Some(frame) => {
                self.present(frame);
                true
            }
            None => {
                log::debug!("dropping {width}x{height} {format:?} frame ({} bytes)", data.len());
                false
            }
        }
    }
}

fn decode_packed(width: u32, height: u32, format: PixelFormat, data: &[u8]) -> Option<RgbaImage> {
    let bpp = format.bytes_per_pixel()?;
    let needed = (width as usize).checked_mul(height as usize)?.checked_mul(bpp)?;
    let data = data.get(..needed)?;
    let rgba: Vec<u8> = match format {
        PixelFormat::Rgba32 => data.to_vec(),
        PixelFormat::Bgra32 => data
            .chunks_exact(4)
            .flat_map(|p| [p[2], p[1], p[0], p[3]])
            .collect(),
        PixelFormat::Rgb24 => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 0xFF])
            .collect(),
        _ => return None,
    };
    RgbaImage::from_raw(width, height, rgba)
}

/// Platform camera stack.
pub trait CameraBackend {
    fn list_cameras(&self) -> Vec<CameraDevice>;

    /// Capture formats `id` supports.
    fn formats(&self, id: &str) -> Vec<CameraFormat>;

    /// Open `id` and start delivering frames to `sink`. `None` means the
    /// backend's default format.
    fn start(&mut self, id: &str, format: Option<CameraFormat>, sink: FrameSink) -> Result<()>;

    fn stop(&mut self);
}

/// Pick a capture format for a `min_w` × `min_h` request.
///
/// Formats whose pixel format is not in `supported`, or that are smaller
/// than the request, are skipped. Of the rest, the last one that fits inside
/// the best size so far (starting at [`MAX_CAPTURE_SIZE`]) wins.
pub fn choose_camera_format(
    formats: &[CameraFormat],
    supported: &[PixelFormat],
    min_w: u32,
    min_h: u32,
) -> Option<CameraFormat> {
    let (mut w, mut h) = MAX_CAPTURE_SIZE;
    let mut best = None;
    for format in formats {
        if !supported.contains(&format.pixel_format) {
            continue;
        }
        if format.width < min_w || format.height < min_h {
            continue;
        }
        if format.width <= w && format.height <= h {
            (w, h) = (format.width, format.height);
            best = Some(*format);
        }
    }
    if best.is_none() {
        log::warn!("Could not find a valid camera format!");
        for format in formats {
            log::warn!("Camera supported format: {format:?}");
        }
    }
    best
}
