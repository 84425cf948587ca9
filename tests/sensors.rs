//! Luminance and image sensors as the emulation core sees them.

use image::{Rgba, RgbaImage};
use padbridge::sensor::{ColorFormat, LUX_BASE};
use padbridge::{ImageSource, InputController, InputError, LuminanceSource, SlotAllocator};

#[test]
fn luminance_value_and_level_stay_consistent() {
    let slots = SlotAllocator::new();
    let mut c = InputController::new(&slots, None);
    let mut sensor = c.luminance_source();

    c.set_luminance_value(LUX_BASE + 42);
    assert_eq!(c.luminance_level(), 5);
    assert_eq!(c.luminance_value(), LUX_BASE + 42);
    c.set_luminance_level(6);
    assert_eq!(c.luminance_value(), LUX_BASE + 62);

    for _ in 0..20 {
        c.increase_luminance_level();
    }
    assert_eq!(c.luminance_level(), 10);
    sensor.sample();
    assert_eq!(sensor.read_luminance(), 0xFF - c.luminance_value());

    c.set_luminance_value(0);
    assert_eq!(c.luminance_level(), 0);
    assert_eq!(c.luminance_value(), 0);
}

#[test]
fn still_image_is_served_as_centered_rgb565() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("still.png");
    RgbaImage::from_fn(6, 2, |x, _| {
        if x < 3 {
            Rgba([0, 0, 0xFF, 0xFF])
        } else {
            Rgba([0xFF, 0, 0, 0xFF])
        }
    })
    .save(&path)
    .unwrap();

    let slots = SlotAllocator::new();
    let mut c = InputController::new(&slots, None);
    c.load_cam_image(&path).unwrap();

    let mut source = c.image_source();
    source.start_request_image(2, 2, ColorFormat::Rgb565);
    c.pump_camera_commands();

    let frame = source.request_image().unwrap();
    assert_eq!((frame.width, frame.height), (2, 2));
    assert_eq!(frame.format, ColorFormat::Rgb565);
    assert_eq!(frame.pixel(0, 0), 0x001F);
    assert_eq!(frame.pixel(1, 1), 0xF800);
}

#[test]
fn unreadable_images_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let slots = SlotAllocator::new();
    let c = InputController::new(&slots, None);

    let missing = dir.path().join("missing.png");
    assert!(matches!(c.load_cam_image(&missing), Err(InputError::Image(_))));

    let garbage = dir.path().join("garbage.png");
    std::fs::write(&garbage, b"not an image").unwrap();
    assert!(c.load_cam_image(&garbage).is_err());
    assert!(!c.camera_image().has_image());
}

#[cfg(feature = "camera")]
mod camera {
    use super::*;
    use padbridge::camera::{CameraBackend, CameraDevice, CameraFormat, FrameSink, PixelFormat};
    use padbridge::config::CameraDriver;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Start(String, Option<CameraFormat>),
        Stop,
    }

    struct FakeCamera {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl CameraBackend for FakeCamera {
        fn list_cameras(&self) -> Vec<CameraDevice> {
            ["front", "back"]
                .into_iter()
                .map(|id| CameraDevice {
                    id: id.to_string(),
                    description: format!("{id} camera"),
                })
                .collect()
        }

        fn formats(&self, _id: &str) -> Vec<CameraFormat> {
            [
                (640, 480, PixelFormat::Rgb24),
                (320, 240, PixelFormat::Yuyv),
                (1920, 1080, PixelFormat::Rgba32),
                (320, 240, PixelFormat::Rgba32),
                (160, 120, PixelFormat::Rgba32),
            ]
            .into_iter()
            .map(|(width, height, pixel_format)| CameraFormat {
                width,
                height,
                pixel_format,
            })
            .collect()
        }

        fn start(
            &mut self,
            id: &str,
            format: Option<CameraFormat>,
            sink: FrameSink,
        ) -> padbridge::Result<()> {
            self.calls.lock().push(Call::Start(id.to_string(), format));
            sink.present(RgbaImage::from_pixel(320, 240, Rgba([0xFF, 0, 0, 0xFF])));
            Ok(())
        }

        fn stop(&mut self) {
            self.calls.lock().push(Call::Stop);
        }
    }

    fn rgba(width: u32, height: u32) -> Option<CameraFormat> {
        Some(CameraFormat {
            width,
            height,
            pixel_format: PixelFormat::Rgba32,
        })
    }

    #[test]
    fn camera_follows_image_requests() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let slots = SlotAllocator::new();
        let mut c = InputController::new(&slots, None);
        c.set_camera_backend(Box::new(FakeCamera {
            calls: Arc::clone(&calls),
        }));
        assert_eq!(c.list_cameras().len(), 2);
        c.config_mut().options_mut().camera = Some("back".into());

        let mut source = c.image_source();
        source.start_request_image(240, 160, ColorFormat::Rgb565);
        assert!(!c.camera_running());
        c.pump_camera_commands();
        assert!(c.camera_running());
        assert_eq!(c.camera(), Some("back"));
        assert_eq!(source.request_image().unwrap().pixel(0, 0), 0xF800);

        // Same camera: nothing restarts.
        c.set_camera("back");
        // Another camera while sampling: restart on it.
        c.set_camera("front");

        source.stop_request_image();
        c.pump_camera_commands();
        assert!(!c.camera_running());

        // Not sampling: the selection changes without opening anything.
        c.set_camera("back");
        assert!(!c.camera_running());

        assert_eq!(
            *calls.lock(),
            vec![
                Call::Start("back".into(), rgba(320, 240)),
                Call::Stop,
                Call::Start("front".into(), rgba(320, 240)),
                Call::Stop,
            ]
        );
    }

    #[test]
    fn disabled_camera_driver_keeps_the_still_image() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let slots = SlotAllocator::new();
        let mut c = InputController::new(&slots, None);
        c.set_camera_backend(Box::new(FakeCamera {
            calls: Arc::clone(&calls),
        }));
        c.config_mut().options_mut().camera_driver = CameraDriver::None;

        let mut source = c.image_source();
        source.start_request_image(8, 8, ColorFormat::Rgb565);
        c.pump_camera_commands();
        assert!(!c.camera_running());
        assert!(calls.lock().is_empty());
        assert!(source.request_image().is_some());
    }
}
