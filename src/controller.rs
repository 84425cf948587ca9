//! Per-player input controller.
//!
//! [`InputController`] is the facade a frontend session talks to. It owns the
//! player's [`InputMap`], the [`DriverRegistry`], the gamepad [`Poller`] and
//! the sensor state, and it borrows the host [`Toolkit`] only for the
//! duration of a call.
//!
//! # Threads
//! Everything here runs on the UI thread except three handles that are meant
//! to cross threads:
//! - [`InputController::pending_events`] returns the `Arc<PendingEvents>`
//!   the core thread filters its own button reads through.
//! - [`InputController::luminance_source`] and
//!   [`InputController::image_source`] hand the core its sensors.
//! - [`InputController::key_sender`] posts key events from any thread (the
//!   native hook uses it).
//!
//! # Event loop
//! Call [`InputController::tick`] from the host loop at least every
//! [`POLL_INTERVAL`](crate::poller::POLL_INTERVAL). A tick delivers queued
//! hook keys, services camera requests from the core, polls every
//! polling gamepad driver, and (player 0 only) refreshes the drivers.

use crate::backends::keyboard::bind_default_keys;
use crate::binding::{InputMap, InputMapper};
use crate::button::{Button, ButtonSet};
use crate::config::ConfigStore;
use crate::device::{DeviceType, InputDriver, RotationSource, Rumble};
use crate::error::Result;
use crate::event::{EventPriority, InputEvent, Key, KeyEvent};
use crate::eventbus::{FocusRouter, Toolkit, WidgetId};
use crate::hook::{KeyEventQueue, KeySender};
use crate::pending::PendingEvents;
use crate::poller::{Dispatcher, Poller};
use crate::profile::find_profile;
use crate::registry::DriverRegistry;
use crate::sensor::{
    CameraCommand, CameraImage, CameraImageSource, Luminance, LuminanceSensor,
};
use crate::slots::{PlayerSlot, SlotAllocator};
use crossbeam_channel::{Receiver, Sender};
use image::RgbaImage;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "camera")]
use crate::camera::{choose_camera_format, CameraBackend, CameraDevice, FrameSink, SUPPORTED_PIXEL_FORMATS};
#[cfg(feature = "camera")]
use crate::config::CameraDriver;

#[cfg(target_os = "windows")]
use crate::backends::windows::RawKeyboardHook;

type LuminanceCallback = Box<dyn FnMut(u8) + Send>;
type ProfileCallback = Box<dyn FnMut(DeviceType, &str) + Send>;

#[cfg(feature = "camera")]
#[derive(Default)]
struct CameraState {
    backend: Option<Box<dyn CameraBackend>>,
    /// Selected device id; `None` = backend's first camera.
    device: Option<String>,
    /// The core has an image request open.
    requested: bool,
    running: bool,
}

pub struct InputController {
    slot: PlayerSlot,
    input_map: InputMap,
    registry: DriverRegistry,
    poller: Poller,
    pending: Arc<PendingEvents>,
    focus: FocusRouter,
    config: ConfigStore,

    gamepad_driver: Option<DeviceType>,
    sensor_driver: Option<DeviceType>,

    keys: KeyEventQueue,
    keyboard_buttons: ButtonSet,

    luminance: Arc<Mutex<Luminance>>,
    on_luminance_changed: Option<LuminanceCallback>,
    on_profile_loaded: Option<ProfileCallback>,

    camera_image: Arc<CameraImage>,
    camera_tx: Sender<CameraCommand>,
    camera_rx: Receiver<CameraCommand>,
    #[cfg(feature = "camera")]
    camera: CameraState,

    #[cfg(target_os = "windows")]
    hook: Option<RawKeyboardHook>,
}

impl InputController {
    /// Claim the next player slot with an empty driver registry.
    ///
    /// # Panics
    /// When `slots` has no free slot left.
    pub fn new(slots: &Arc<SlotAllocator>, top_level: Option<WidgetId>) -> Self {
        Self::with_registry(slots, top_level, DriverRegistry::new())
    }

    /// Claim the next player slot and adopt every driver in `registry`.
    ///
    /// # Panics
    /// When `slots` has no free slot left.
    pub fn with_registry(
        slots: &Arc<SlotAllocator>,
        top_level: Option<WidgetId>,
        registry: DriverRegistry,
    ) -> Self {
        let slot = slots.claim();
        let (camera_tx, camera_rx) = crossbeam_channel::unbounded();
        let mut input_map = InputMap::new();
        bind_default_keys(&mut input_map);

        let mut controller = Self {
            slot,
            input_map,
            registry: DriverRegistry::new(),
            poller: Poller::new(),
            pending: Arc::new(PendingEvents::new()),
            focus: FocusRouter::new(top_level),
            config: ConfigStore::in_memory(),
            gamepad_driver: None,
            sensor_driver: None,
            keys: KeyEventQueue::new(),
            keyboard_buttons: ButtonSet::EMPTY,
            luminance: Arc::new(Mutex::new(Luminance::default())),
            on_luminance_changed: None,
            on_profile_loaded: None,
            camera_image: CameraImage::new(),
            camera_tx,
            camera_rx,
            #[cfg(feature = "camera")]
            camera: CameraState::default(),
            #[cfg(target_os = "windows")]
            hook: None,
        };
        for driver in registry.into_drivers() {
            controller.add_boxed_driver(driver);
        }
        log::debug!("input controller for player {} ready", controller.player_id());
        controller
    }

    /// Controller over every driver available on this platform.
    pub fn discover(slots: &Arc<SlotAllocator>, top_level: Option<WidgetId>) -> Self {
        Self::with_registry(slots, top_level, DriverRegistry::discover())
    }

    pub fn player_id(&self) -> usize {
        self.slot.id()
    }

    // ----- drivers -------------------------------------------------------

    pub fn add_input_driver<D: InputDriver + 'static>(&mut self, driver: D) {
        self.add_boxed_driver(Box::new(driver));
    }

    /// Register a driver and bind its defaults if `ty` has no bindings yet.
    ///
    /// The first sensor-capable driver becomes the sensor driver, the first
    /// gamepad-capable one the gamepad driver.
    pub fn add_boxed_driver(&mut self, driver: Box<dyn InputDriver>) {
        let ty = driver.device_type();
        let caps = driver.capabilities();
        if self.input_map.device(ty).is_none() {
            driver.bind_defaults(&mut self.input_map);
        }
        self.registry.insert(driver);
        if self.sensor_driver.is_none() && caps.sensors {
            self.sensor_driver = Some(ty);
        }
        if self.gamepad_driver.is_none() && caps.gamepads {
            self.gamepad_driver = Some(ty);
        }
    }

    pub fn registry(&self) -> &DriverRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DriverRegistry {
        &mut self.registry
    }

    pub fn input_map(&self) -> &InputMap {
        &self.input_map
    }

    pub fn input_map_mut(&mut self) -> &mut InputMap {
        &mut self.input_map
    }

    pub fn mapper(&self, ty: DeviceType) -> InputMapper<'_> {
        self.input_map.mapper(ty)
    }

    // ----- configuration -------------------------------------------------

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigStore {
        &mut self.config
    }

    /// Adopt `config`: load saved bindings for the keyboard and every
    /// driver, let drivers read their settings, and select each driver's
    /// preferred gamepad for this player.
    pub fn set_configuration(&mut self, config: ConfigStore) {
        self.config = config;
        self.load_configuration(DeviceType::KEYBOARD);
        for ty in self.registry.types() {
            if ty != DeviceType::KEYBOARD {
                self.load_configuration(ty);
            }
        }
        self.select_preferred_gamepads();
    }

    fn select_preferred_gamepads(&mut self) {
        let player = self.slot.id();
        for driver in self.registry.iter_mut() {
            let ty = driver.device_type();
            let Some(name) = self.config.preferred_device(ty, player) else {
                continue;
            };
            let index = driver
                .connected_gamepads()
                .iter()
                .position(|pad| pad.name() == name);
            if let Some(index) = index {
                log::debug!("player {player}: preferred {ty} gamepad {name:?} at {index}");
                driver.set_active_gamepad(index);
            }
        }
    }

    /// Load saved bindings for `ty`, falling back to the driver's defaults.
    ///
    /// Returns `false` when nothing was saved (or it was malformed), and when
    /// no driver of that type is registered.
    pub fn load_configuration(&mut self, ty: DeviceType) -> bool {
        let loaded = match self.config.load_bindings(ty) {
            Some(bindings) => {
                self.input_map.set_device(ty, bindings);
                true
            }
            None => false,
        };
        let Some(driver) = self.registry.get_mut(ty) else {
            return false;
        };
        if !loaded {
            log::debug!("no saved {ty} bindings, using driver defaults");
            driver.bind_defaults(&mut self.input_map);
        }
        driver.load_configuration(&self.config);
        loaded
    }

    fn store_bindings(&mut self, ty: DeviceType) -> Result<()> {
        let bindings = self.input_map.device(ty).cloned().unwrap_or_default();
        self.config.save_bindings(ty, &bindings)?;
        if let Some(driver) = self.registry.get(ty) {
            driver.save_configuration(&mut self.config);
        }
        Ok(())
    }

    /// Save keyboard and every driver's bindings and settings, then flush.
    pub fn save_configuration(&mut self) -> Result<()> {
        self.store_bindings(DeviceType::KEYBOARD)?;
        for ty in self.registry.types() {
            self.store_bindings(ty)?;
        }
        self.config.write()
    }

    /// Save the bindings of `ty` and flush.
    pub fn save_configuration_for(&mut self, ty: DeviceType) -> Result<()> {
        self.store_bindings(ty)?;
        self.config.write()
    }

    /// Load profile `name` for `ty`: the saved profile first, then the
    /// built-in table. An empty name loads nothing.
    pub fn load_profile(&mut self, ty: DeviceType, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let loaded = match self.config.load_profile(ty, name) {
            Some(bindings) => {
                self.input_map.set_device(ty, bindings);
                true
            }
            None => match find_profile(name) {
                Some(profile) => {
                    profile.apply(&mut self.input_map);
                    true
                }
                None => false,
            },
        };
        log::info!("profile {name:?} for {ty}: {}", if loaded { "loaded" } else { "not found" });
        if let Some(callback) = self.on_profile_loaded.as_mut() {
            callback(ty, name);
        }
        loaded
    }

    /// Save the bindings of `ty` as profile `name` and flush. Empty names are
    /// ignored.
    pub fn save_profile(&mut self, ty: DeviceType, name: &str) -> Result<()> {
        if name.is_empty() {
            return Ok(());
        }
        let bindings = self.input_map.device(ty).cloned().unwrap_or_default();
        self.config.save_profile(ty, name, &bindings)?;
        self.config.write()
    }

    /// Profile the driver of `ty` suggests for its active gamepad.
    pub fn profile_for_type(&self, ty: DeviceType) -> Option<String> {
        self.registry.get(ty)?.current_profile()
    }

    pub fn on_profile_loaded(&mut self, callback: impl FnMut(DeviceType, &str) + Send + 'static) {
        self.on_profile_loaded = Some(Box::new(callback));
    }

    // ----- gamepads ------------------------------------------------------

    fn resolve(&self, ty: Option<DeviceType>) -> Option<DeviceType> {
        ty.or(self.gamepad_driver)
    }

    pub fn gamepad_driver(&self) -> Option<DeviceType> {
        self.gamepad_driver
    }

    /// Make `ty` the default for gamepad queries. Ignored unless that driver
    /// exists and supports gamepads.
    pub fn set_gamepad_driver(&mut self, ty: DeviceType) {
        if self.registry.get(ty).is_some_and(|d| d.capabilities().gamepads) {
            self.gamepad_driver = Some(ty);
        }
    }

    /// Visible names of the pads connected to `ty` (`None` = gamepad driver).
    pub fn connected_gamepads(&self, ty: Option<DeviceType>) -> Vec<String> {
        let Some(driver) = self.resolve(ty).and_then(|ty| self.registry.get(ty)) else {
            return Vec::new();
        };
        driver
            .connected_gamepads()
            .iter()
            .map(|pad| pad.visible_name().to_string())
            .collect()
    }

    pub fn gamepad_index(&self, ty: Option<DeviceType>) -> Option<usize> {
        self.registry.get(self.resolve(ty)?)?.active_gamepad_index()
    }

    /// Switch the active pad of `ty`. The previous snapshot is kept, so
    /// elements held only on the old pad are released on the next poll.
    pub fn set_gamepad(&mut self, ty: Option<DeviceType>, index: usize) {
        let Some(ty) = self.resolve(ty) else {
            return;
        };
        if let Some(driver) = self.registry.get_mut(ty) {
            driver.set_active_gamepad(index);
        }
    }

    /// Remember pad `index` of `ty` as this player's preferred gamepad.
    pub fn set_preferred_gamepad(&mut self, ty: Option<DeviceType>, index: usize) {
        let Some(ty) = self.resolve(ty) else {
            return;
        };
        let Some(driver) = self.registry.get(ty) else {
            return;
        };
        let pads = driver.connected_gamepads();
        let Some(pad) = pads.get(index) else {
            return;
        };
        let name = pad.name();
        if name.is_empty() {
            return;
        }
        self.config.set_preferred_device(ty, self.slot.id(), name);
    }

    // ----- sensors passthrough --------------------------------------------

    pub fn sensor_driver(&self) -> Option<DeviceType> {
        self.sensor_driver
    }

    /// Ignored unless the driver exists and supports sensors.
    pub fn set_sensor_driver(&mut self, ty: DeviceType) {
        if self.registry.get(ty).is_some_and(|d| d.capabilities().sensors) {
            self.sensor_driver = Some(ty);
        }
    }

    pub fn rumble(&mut self) -> Option<&mut dyn Rumble> {
        self.registry.get_mut(self.sensor_driver?)?.rumble()
    }

    pub fn rotation_source(&mut self) -> Option<&mut dyn RotationSource> {
        self.registry.get_mut(self.sensor_driver?)?.rotation_source()
    }

    // ----- polling -------------------------------------------------------

    /// Run one poll cycle if [`POLL_INTERVAL`](crate::poller::POLL_INTERVAL)
    /// has elapsed since the last one. Returns whether it ran.
    pub fn tick<T: Toolkit + ?Sized>(&mut self, toolkit: &mut T, now: Instant) -> bool {
        if !self.poller.due(now) {
            return false;
        }
        self.pump_key_events(toolkit);
        self.pump_camera_commands();
        for ty in self.registry.polled_gamepad_types() {
            self.test_gamepad(ty, toolkit);
        }
        if self.slot.id() == 0 {
            self.update();
        }
        true
    }

    /// Diff the active pad of `ty` against the last poll and deliver the
    /// edges to the focus target. Returns the number of events generated,
    /// accepted or not.
    pub fn test_gamepad<T: Toolkit + ?Sized>(&mut self, ty: DeviceType, toolkit: &mut T) -> usize {
        let pad = self.registry.gamepad(ty);
        let mapper = self.input_map.mapper(ty);
        let mut dispatch = Dispatcher {
            toolkit,
            router: &self.focus,
            ignore_window_focus: self.config.options().ignore_window_focus,
        };
        self.poller.test_gamepad(pad, &mapper, &self.pending, &mut dispatch)
    }

    /// Refresh every driver; reload bindings when a driver's suggested
    /// profile changes (e.g. a different pad was plugged in).
    pub fn update(&mut self) {
        for ty in self.registry.types() {
            let Some(driver) = self.registry.get_mut(ty) else {
                continue;
            };
            let before = driver.current_profile();
            driver.update();
            let after = driver.current_profile();
            if before != after {
                if let Some(profile) = after {
                    self.load_profile(ty, &profile);
                }
            }
        }
    }

    /// Buttons currently held on every gamepad, minus those with a press
    /// event still pending.
    ///
    /// UI thread only. Another thread reads the pending set through
    /// [`InputController::pending_events`] and [`PendingEvents::filter`].
    pub fn poll_events(&self) -> ButtonSet {
        let mut active = ButtonSet::EMPTY;
        for (ty, pad) in self.registry.gamepads() {
            let mapper = self.input_map.mapper(ty);
            active |= mapper.map_keys(&pad.current_buttons());
            active |= mapper.map_axes(&pad.current_axes());
            active |= mapper.map_hats(&pad.current_hats());
        }
        self.pending.filter(active)
    }

    pub fn pending_events(&self) -> Arc<PendingEvents> {
        Arc::clone(&self.pending)
    }

    // ----- focus ---------------------------------------------------------

    pub fn set_top_level(&mut self, top_level: Option<WidgetId>) {
        self.focus.set_top_level(top_level);
    }

    pub fn focus_parent(&self) -> Option<WidgetId> {
        self.focus.focus_parent()
    }

    pub fn steal_focus(&mut self, widget: WidgetId) {
        self.focus.steal(widget);
    }

    pub fn release_focus(&mut self, widget: WidgetId) {
        self.focus.release(widget);
    }

    // ----- keyboard ------------------------------------------------------

    pub fn map_keyboard(&self, key: Key) -> Option<Button> {
        self.input_map.map_key(DeviceType::KEYBOARD, key.code())
    }

    /// Apply a key event the toolkit delivered; returns the button it drives.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Option<Button> {
        let button = self.map_keyboard(event.key)?;
        if event.pressed {
            self.keyboard_buttons.insert(button);
        } else {
            self.keyboard_buttons.remove(button);
        }
        Some(button)
    }

    /// Buttons held on the keyboard.
    pub fn keyboard_buttons(&self) -> ButtonSet {
        self.keyboard_buttons
    }

    /// Handle for posting key events from other threads.
    pub fn key_sender(&self) -> KeySender {
        self.keys.sender()
    }

    /// Deliver queued key events to the top-level widget (or the application
    /// focus widget when there is none). Returns how many were delivered.
    pub fn pump_key_events<T: Toolkit + ?Sized>(&mut self, toolkit: &mut T) -> usize {
        let mut delivered = 0;
        for event in self.keys.drain() {
            let Some(target) = self.focus.key_target(&*toolkit) else {
                log::debug!("dropping {} key event: no target", event.key);
                continue;
            };
            toolkit.send_event(target, InputEvent::Key(event), EventPriority::Normal);
            delivered += 1;
        }
        delivered
    }

    // ----- native hook ---------------------------------------------------

    /// Start capturing the keyboard in the background through the native
    /// window `hwnd` (`0` defers until [`InputController::set_native_window`]).
    /// Calling it again while registered does nothing.
    pub fn register_native_event_filter(&mut self, hwnd: isize) {
        #[cfg(target_os = "windows")]
        {
            if self.hook.is_some() {
                return;
            }
            let mut hook = RawKeyboardHook::new(hwnd, self.keys.sender());
            if let Err(e) = hook.register() {
                log::warn!("{e}; background keyboard input disabled");
            }
            self.hook = Some(hook);
        }
        #[cfg(not(target_os = "windows"))]
        {
            let _ = hwnd;
            log::debug!("no native keyboard hook on this platform");
        }
    }

    pub fn unregister_native_event_filter(&mut self) {
        #[cfg(target_os = "windows")]
        if let Some(mut hook) = self.hook.take() {
            hook.unregister();
        }
    }

    /// Whether a native keyboard hook is installed.
    pub fn has_native_event_filter(&self) -> bool {
        #[cfg(target_os = "windows")]
        let installed = self.hook.is_some();
        #[cfg(not(target_os = "windows"))]
        let installed = false;
        installed
    }

    /// The native window now has a handle; complete a deferred registration.
    pub fn set_native_window(&mut self, hwnd: isize) {
        #[cfg(target_os = "windows")]
        if let Some(hook) = self.hook.as_mut() {
            hook.set_target(hwnd);
        }
        #[cfg(not(target_os = "windows"))]
        let _ = hwnd;
    }

    /// Native message filter. Never consumes the message.
    pub fn native_event_filter(&mut self, message: u32, lparam: isize) -> bool {
        #[cfg(target_os = "windows")]
        if let Some(hook) = self.hook.as_mut() {
            return hook.filter(message, lparam);
        }
        let _ = (message, lparam);
        false
    }

    // ----- luminance -----------------------------------------------------

    pub fn luminance_level(&self) -> i32 {
        self.luminance.lock().level()
    }

    pub fn luminance_value(&self) -> u8 {
        self.luminance.lock().value()
    }

    pub fn set_luminance_value(&mut self, value: u8) {
        self.luminance.lock().set_value(value);
        self.notify_luminance();
    }

    pub fn set_luminance_level(&mut self, level: i32) {
        self.luminance.lock().set_level(level);
        self.notify_luminance();
    }

    pub fn increase_luminance_level(&mut self) {
        let level = self.luminance_level();
        self.set_luminance_level(level + 1);
    }

    pub fn decrease_luminance_level(&mut self) {
        let level = self.luminance_level();
        self.set_luminance_level(level - 1);
    }

    pub fn on_luminance_changed(&mut self, callback: impl FnMut(u8) + Send + 'static) {
        self.on_luminance_changed = Some(Box::new(callback));
    }

    fn notify_luminance(&mut self) {
        let value = self.luminance.lock().value();
        if let Some(callback) = self.on_luminance_changed.as_mut() {
            callback(value);
        }
    }

    /// Luminance sensor for the core.
    pub fn luminance_source(&self) -> LuminanceSensor {
        LuminanceSensor::new(Arc::clone(&self.luminance))
    }

    // ----- image sensor --------------------------------------------------

    /// Image sensor for the core.
    pub fn image_source(&self) -> CameraImageSource {
        CameraImageSource::new(Arc::clone(&self.camera_image), self.camera_tx.clone())
    }

    pub fn camera_image(&self) -> Arc<CameraImage> {
        Arc::clone(&self.camera_image)
    }

    /// Replace the sensor image. Empty images are ignored.
    pub fn set_cam_image(&self, image: RgbaImage) {
        self.camera_image.set_image(image);
    }

    /// Decode `path` and use it as the sensor image.
    pub fn load_cam_image(&self, path: impl AsRef<Path>) -> Result<()> {
        let image = image::open(path.as_ref())?.to_rgba8();
        self.set_cam_image(image);
        Ok(())
    }

    /// Service start/stop requests the core raised through the image source.
    pub fn pump_camera_commands(&mut self) {
        while let Ok(command) = self.camera_rx.try_recv() {
            #[cfg(feature = "camera")]
            match command {
                CameraCommand::Start { width, height } => {
                    log::debug!("camera requested at {width}x{height}");
                    self.camera.requested = true;
                    if let Some(id) = self.config.options().camera.clone() {
                        if self.list_cameras().iter().any(|c| c.id == id) {
                            self.camera.device = Some(id);
                        }
                    }
                    self.setup_cam();
                }
                CameraCommand::Stop => {
                    self.camera.requested = false;
                    self.teardown_cam();
                }
            }
            #[cfg(not(feature = "camera"))]
            log::trace!("ignoring {command:?}: built without camera support");
        }
    }
}

// ----- camera ------------------------------------------------------------

#[cfg(feature = "camera")]
impl InputController {
    pub fn set_camera_backend(&mut self, backend: Box<dyn CameraBackend>) {
        self.teardown_cam();
        self.camera.backend = Some(backend);
        if self.camera.requested {
            self.setup_cam();
        }
    }

    pub fn list_cameras(&self) -> Vec<CameraDevice> {
        self.camera
            .backend
            .as_ref()
            .map(|b| b.list_cameras())
            .unwrap_or_default()
    }

    pub fn camera(&self) -> Option<&str> {
        self.camera.device.as_deref()
    }

    /// Whether a camera is currently capturing.
    pub fn camera_running(&self) -> bool {
        self.camera.running
    }

    /// Switch to camera `id`, restarting capture if the core is sampling.
    pub fn set_camera(&mut self, id: &str) {
        if self.camera.device.as_deref() == Some(id) {
            return;
        }
        self.camera.device = Some(id.to_string());
        if self.camera.running {
            self.teardown_cam();
        }
        if self.camera.requested {
            self.setup_cam();
        }
    }

    /// Open the selected camera with the best matching format.
    pub fn setup_cam(&mut self) {
        if self.config.options().camera_driver != CameraDriver::Native || self.camera.running {
            return;
        }
        let device = self
            .camera
            .device
            .clone()
            .or_else(|| self.list_cameras().into_iter().next().map(|c| c.id));
        let (Some(backend), Some(id)) = (self.camera.backend.as_mut(), device) else {
            log::debug!("no camera available");
            return;
        };

        let (w, h) = self.camera_image.request_size();
        let format = choose_camera_format(&backend.formats(&id), &SUPPORTED_PIXEL_FORMATS, w, h);
        match backend.start(&id, format, FrameSink::new(Arc::clone(&self.camera_image))) {
            Ok(()) => {
                log::info!("camera {id:?} started ({format:?})");
                self.camera.running = true;
            }
            Err(e) => log::warn!("failed to start camera {id:?}: {e}"),
        }
    }

    pub fn teardown_cam(&mut self) {
        if !self.camera.running {
            return;
        }
        if let Some(backend) = self.camera.backend.as_mut() {
            backend.stop();
        }
        self.camera.running = false;
    }
}
