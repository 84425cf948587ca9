//! Luminance and image sensors exposed to the emulation core.
//!
//! The core pulls sensor data synchronously, from its own thread, whenever the
//! emulated cartridge asks for it. Both sensors therefore keep their state
//! behind a lock shared with the UI side and never block for longer than a
//! copy or a resize.
//!
//! # Luminance
//! The UI works in *levels* `0..=10`; the cartridge reads a raw 8-bit value.
//! Levels map onto values through [`LUX_BASE`] plus the monotonic
//! [`LUX_LEVELS`] table. Setting either side recomputes the other, so the
//! pair is always consistent. The core reads the value inverted
//! (`0xFF - value`).
//!
//! # Image
//! The latest captured (or loaded) bitmap is kept as-is. The first request
//! after a change scales it to cover the requested size (aspect preserved,
//! nearest-neighbour), converts it to RGB565 and caches the result until the
//! next capture. Frames hand out a centered crop of that cache.

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use std::sync::Arc;

/// Value of luminance level 0.
pub const LUX_BASE: u8 = 0x16;

/// Offsets above [`LUX_BASE`] for levels 1..=10.
pub const LUX_LEVELS: [u8; 10] = [5, 11, 18, 27, 42, 62, 84, 109, 139, 183];

/// Highest luminance level.
pub const MAX_LUX_LEVEL: i32 = 10;

/// Core-facing luminance contract.
pub trait LuminanceSource {
    /// Latch a fresh reading.
    fn sample(&mut self);
    /// Last latched reading.
    fn read_luminance(&self) -> u8;
}

/// Pixel format of frames handed to the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorFormat {
    #[default]
    Rgb565,
}

/// Core-facing image contract.
pub trait ImageSource {
    /// The core starts sampling at `width` × `height`.
    fn start_request_image(&mut self, width: u32, height: u32, format: ColorFormat);
    fn stop_request_image(&mut self);
    /// Current frame, or `None` before the first start request.
    fn request_image(&mut self) -> Option<ImageFrame>;
}

/// Luminance level/value pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Luminance {
    level: i32,
    value: u8,
}

impl Default for Luminance {
    fn default() -> Self {
        let mut lux = Luminance { level: 0, value: 0 };
        lux.set_level(0);
        lux
    }
}

impl Luminance {
    #[inline]
    pub fn level(&self) -> i32 {
        self.level
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Store `value` and derive the level: the first table entry above
    /// `value - LUX_BASE`, or [`MAX_LUX_LEVEL`] when none is.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
        let offset = value.saturating_sub(LUX_BASE);
        self.level = LUX_LEVELS
            .iter()
            .position(|&step| offset < step)
            .map_or(MAX_LUX_LEVEL, |i| i as i32);
    }

    /// Clamp `level` to `0..=10` and store the matching value.
    pub fn set_level(&mut self, level: i32) {
        let level = level.clamp(0, MAX_LUX_LEVEL);
        let mut value = LUX_BASE;
        if level > 0 {
            value += LUX_LEVELS[level as usize - 1];
        }
        self.set_value(value);
    }

    /// What the cartridge reads for the current value.
    #[inline]
    pub fn reading(&self) -> u8 {
        0xFF - self.value
    }
}

/// [`LuminanceSource`] over a luminance shared with the UI.
#[derive(Clone, Debug)]
pub struct LuminanceSensor {
    shared: Arc<Mutex<Luminance>>,
    latched: u8,
}

impl LuminanceSensor {
    pub fn new(shared: Arc<Mutex<Luminance>>) -> Self {
        let latched = shared.lock().reading();
        Self { shared, latched }
    }
}

impl LuminanceSource for LuminanceSensor {
    fn sample(&mut self) {
        self.latched = self.shared.lock().reading();
    }

    fn read_luminance(&self) -> u8 {
        self.latched
    }
}

/// A frame handed to the core: an RGB565 buffer plus the crop into it.
#[derive(Clone, Debug)]
pub struct ImageFrame {
    pixels: Arc<[u16]>,
    /// Index of the first visible pixel.
    pub offset: usize,
    /// Pixels per buffer row.
    pub stride: usize,
    pub width: u32,
    pub height: u32,
    pub format: ColorFormat,
}

impl ImageFrame {
    /// The whole backing buffer (use `offset` and `stride` to walk it).
    pub fn buffer(&self) -> &[u16] {
        &self.pixels
    }

    /// Visible row `y` (`width` pixels).
    pub fn row(&self, y: u32) -> &[u16] {
        let start = self.offset + y as usize * self.stride;
        &self.pixels[start..start + self.width as usize]
    }

    pub fn pixel(&self, x: u32, y: u32) -> u16 {
        self.row(y)[x as usize]
    }
}

#[derive(Debug, Default)]
struct ImageState {
    image: Option<RgbaImage>,
    resized: Option<(Arc<[u16]>, u32, u32)>,
    width: u32,
    height: u32,
    out_of_date: bool,
}

/// Lock-guarded camera image cache.
///
/// Shared (via `Arc`) between the capture callback, the UI and the core.
#[derive(Debug, Default)]
pub struct CameraImage {
    state: Mutex<ImageState>,
}

impl CameraImage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Replace the source image and invalidate the cache. Empty images are ignored.
    pub fn set_image(&self, image: RgbaImage) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let mut state = self.state.lock();
        state.image = Some(image);
        state.resized = None;
        state.out_of_date = true;
    }

    pub fn has_image(&self) -> bool {
        self.state.lock().image.is_some()
    }

    /// Record the size the core samples at; installs a placeholder if no
    /// image has been captured yet.
    pub fn set_request_size(&self, width: u32, height: u32) {
        let mut state = self.state.lock();
        if (state.width, state.height) != (width, height) {
            state.out_of_date = true;
        }
        state.width = width;
        state.height = height;
        if state.image.is_none() {
            state.image = Some(placeholder_image());
            state.out_of_date = true;
        }
    }

    pub fn request_size(&self) -> (u32, u32) {
        let state = self.state.lock();
        (state.width, state.height)
    }

    /// Current frame, rescaling first if the cache is stale.
    pub fn frame(&self) -> Option<ImageFrame> {
        let mut state = self.state.lock();
        let (w, h) = (state.width, state.height);
        if w == 0 || h == 0 {
            return None;
        }
        if state.out_of_date || state.resized.is_none() {
            let source = state.image.as_ref()?;
            let (sw, sh) = expanded_size(source.width(), source.height(), w, h);
            let scaled = image::imageops::resize(source, sw, sh, FilterType::Nearest);
            let pixels: Arc<[u16]> = scaled.pixels().map(|p| to_rgb565(*p)).collect();
            state.resized = Some((pixels, sw, sh));
            state.out_of_date = false;
        }
        let (pixels, sw, sh) = state.resized.clone()?;
        drop(state);

        let mut offset = 0usize;
        if sw > w {
            offset += ((sw - w) / 2) as usize;
        }
        if sh > h {
            offset += ((sh - h) / 2) as usize * sw as usize;
        }
        Some(ImageFrame {
            pixels,
            offset,
            stride: sw as usize,
            width: w.min(sw),
            height: h.min(sh),
            format: ColorFormat::Rgb565,
        })
    }
}

/// [`ImageSource`] handed to the core.
///
/// Start/stop requests are forwarded to the controller's camera command queue
/// so the camera is opened and closed on the UI thread.
pub struct CameraImageSource {
    image: Arc<CameraImage>,
    commands: crossbeam_channel::Sender<CameraCommand>,
}

/// Camera lifecycle requests raised by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraCommand {
    Start { width: u32, height: u32 },
    Stop,
}

impl CameraImageSource {
    pub fn new(image: Arc<CameraImage>, commands: crossbeam_channel::Sender<CameraCommand>) -> Self {
        Self { image, commands }
    }
}

impl ImageSource for CameraImageSource {
    fn start_request_image(&mut self, width: u32, height: u32, _format: ColorFormat) {
        self.image.set_request_size(width, height);
        let _ = self.commands.send(CameraCommand::Start { width, height });
    }

    fn stop_request_image(&mut self) {
        let _ = self.commands.send(CameraCommand::Stop);
    }

    fn request_image(&mut self) -> Option<ImageFrame> {
        self.image.frame()
    }
}

/// Smallest aspect-preserving size covering `target_w` × `target_h`.
pub fn expanded_size(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    let (sw, sh) = (u64::from(src_w.max(1)), u64::from(src_h.max(1)));
    let (tw, th) = (u64::from(target_w), u64::from(target_h));
    let rw = th * sw / sh;
    if rw >= tw {
        (rw as u32, target_h)
    } else {
        (target_w, (tw * sh / sw) as u32)
    }
}

#[inline]
pub fn to_rgb565(p: Rgba<u8>) -> u16 {
    let [r, g, b, _] = p.0;
    (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3)
}

/// Grey checkerboard served until a real image arrives.
fn placeholder_image() -> RgbaImage {
    RgbaImage::from_fn(64, 64, |x, y| {
        if ((x / 8) + (y / 8)) % 2 == 0 {
            Rgba([0x60, 0x60, 0x60, 0xFF])
        } else {
            Rgba([0xA0, 0xA0, 0xA0, 0xFF])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn level_endpoints() {
        let mut lux = Luminance::default();
        assert_eq!((lux.level(), lux.value()), (0, 0x16));
        lux.set_level(10);
        assert_eq!(lux.value(), 0x16 + 183);
        lux.set_level(42);
        assert_eq!(lux.level(), 10);
        lux.set_level(-3);
        assert_eq!(lux.level(), 0);
    }

    #[test]
    fn values_below_base_read_as_level_zero() {
        let mut lux = Luminance::default();
        lux.set_value(0);
        assert_eq!(lux.level(), 0);
        lux.set_value(0xFF);
        assert_eq!(lux.level(), 10);
    }

    proptest! {
        #[test]
        fn level_round_trips(level in 0i32..=10) {
            let mut lux = Luminance::default();
            lux.set_level(level);
            let value = lux.value();
            let mut again = Luminance::default();
            again.set_value(value);
            prop_assert_eq!(again.level(), level);
        }

        #[test]
        fn reading_is_inverted_value(value in any::<u8>()) {
            let shared = Arc::new(Mutex::new(Luminance::default()));
            shared.lock().set_value(value);
            let mut sensor = LuminanceSensor::new(shared);
            sensor.sample();
            prop_assert_eq!(sensor.read_luminance(), 0xFF - value);
        }
    }

    #[test]
    fn sensor_latches_until_sampled() {
        let shared = Arc::new(Mutex::new(Luminance::default()));
        let mut sensor = LuminanceSensor::new(Arc::clone(&shared));
        assert_eq!(sensor.read_luminance(), 0xFF - 0x16);
        shared.lock().set_level(10);
        assert_eq!(sensor.read_luminance(), 0xFF - 0x16);
        sensor.sample();
        assert_eq!(sensor.read_luminance(), 0xFF - (0x16 + 183));
    }

    #[test]
    fn expanding_covers_target() {
        assert_eq!(expanded_size(1280, 720, 240, 160), (284, 160));
        assert_eq!(expanded_size(100, 400, 240, 160), (240, 960));
        assert_eq!(expanded_size(240, 160, 240, 160), (240, 160));
    }

    #[test]
    fn rgb565_packing() {
        assert_eq!(to_rgb565(Rgba([0xFF, 0, 0, 0xFF])), 0xF800);
        assert_eq!(to_rgb565(Rgba([0, 0xFF, 0, 0xFF])), 0x07E0);
        assert_eq!(to_rgb565(Rgba([0, 0, 0xFF, 0xFF])), 0x001F);
    }

    #[test]
    fn frame_is_centered_crop() {
        let cam = CameraImage::new();
        // Left half red, right half blue, 4:1 aspect.
        cam.set_image(RgbaImage::from_fn(8, 2, |x, _| {
            if x < 4 {
                Rgba([0xFF, 0, 0, 0xFF])
            } else {
                Rgba([0, 0, 0xFF, 0xFF])
            }
        }));
        cam.set_request_size(2, 2);
        let frame = cam.frame().unwrap();
        assert_eq!(frame.stride, 8);
        assert_eq!(frame.offset, 3);
        assert_eq!((frame.width, frame.height), (2, 2));
        assert_eq!(frame.pixel(0, 0), 0xF800);
        assert_eq!(frame.pixel(1, 1), 0x001F);
    }

    #[test]
    fn new_capture_invalidates_cache() {
        let cam = CameraImage::new();
        cam.set_request_size(4, 4);
        let placeholder = cam.frame().unwrap();
        assert_eq!(placeholder.stride, 4);

        cam.set_image(RgbaImage::from_pixel(2, 2, Rgba([0xFF, 0xFF, 0xFF, 0xFF])));
        let frame = cam.frame().unwrap();
        assert!(frame.buffer().iter().all(|&p| p == 0xFFFF));

        cam.set_image(RgbaImage::new(0, 0));
        assert!(cam.frame().unwrap().buffer().iter().all(|&p| p == 0xFFFF));
    }

    #[test]
    fn no_frame_before_start() {
        let cam = CameraImage::new();
        cam.set_image(RgbaImage::new(4, 4));
        assert!(cam.frame().is_none());
    }

    #[test]
    fn source_forwards_lifecycle() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut source = CameraImageSource::new(CameraImage::new(), tx);
        source.start_request_image(240, 160, ColorFormat::Rgb565);
        assert!(source.request_image().is_some());
        source.stop_request_image();
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                CameraCommand::Start {
                    width: 240,
                    height: 160
                },
                CameraCommand::Stop
            ]
        );
    }
}
