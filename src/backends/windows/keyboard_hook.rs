//! Background keyboard capture through Raw Input.
//!
//! [`RawKeyboardHook`] registers the keyboard (usage page `0x01`, usage
//! `0x06`) with `RIDEV_INPUTSINK` against a window handle, so `WM_INPUT`
//! keeps arriving while another application has focus. The host's native
//! event filter hands every message to [`RawKeyboardHook::filter`], which
//! translates the virtual key and posts it to the [`KeyEventQueue`]
//! (see [`crate::hook`]). Messages are never consumed.
//!
//! Registration is deferred until the window has a real handle and happens
//! at most once. Failure is logged and leaves keyboard input on the normal
//! toolkit path.
//!
//! [`KeyEventQueue`]: crate::hook::KeyEventQueue

#![cfg(target_os = "windows")]

use super::raw_input::read_wm_input;
use crate::error::{InputError, Result};
use crate::hook::KeySender;
use windows_sys::Win32::Foundation::GetLastError;
use windows_sys::Win32::UI::Input::{
    RegisterRawInputDevices, RAWINPUTDEVICE, RIDEV_INPUTSINK, RIDEV_REMOVE,
};
use windows_sys::Win32::UI::WindowsAndMessaging::WM_INPUT;

const USAGE_PAGE_GENERIC_DESKTOP: u16 = 0x01;
const USAGE_KEYBOARD: u16 = 0x06;

pub struct RawKeyboardHook {
    /// Target window handle (`0` until the window is realized).
    hwnd: isize,
    registered: bool,
    announced: bool,
    sender: KeySender,
}

impl RawKeyboardHook {
    pub fn new(hwnd: isize, sender: KeySender) -> Self {
        Self {
            hwnd,
            registered: false,
            announced: false,
            sender,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Point the hook at a (now valid) window handle and register.
    pub fn set_target(&mut self, hwnd: isize) {
        if self.registered {
            return;
        }
        self.hwnd = hwnd;
        if let Err(e) = self.register() {
            log::warn!("{e}; background keyboard input disabled");
        }
    }

    /// Register the keyboard for `WM_INPUT`. No-op if already registered or
    /// if the window has no handle yet.
    pub fn register(&mut self) -> Result<()> {
        if self.registered || self.hwnd == 0 {
            return Ok(());
        }

        let rid = RAWINPUTDEVICE {
            usUsagePage: USAGE_PAGE_GENERIC_DESKTOP,
            usUsage: USAGE_KEYBOARD,
            dwFlags: RIDEV_INPUTSINK,
            hwndTarget: self.hwnd as _,
        };

        let ok = unsafe {
            RegisterRawInputDevices(&rid, 1, core::mem::size_of::<RAWINPUTDEVICE>() as u32)
        };
        if ok == 0 {
            let code = unsafe { GetLastError() };
            return Err(InputError::RawInputRegistration(code));
        }

        log::info!("raw keyboard input registered for hwnd 0x{:x}", self.hwnd);
        self.registered = true;
        Ok(())
    }

    /// Remove the registration. Safe to call when not registered.
    pub fn unregister(&mut self) {
        if !self.registered {
            return;
        }
        let rid = RAWINPUTDEVICE {
            usUsagePage: USAGE_PAGE_GENERIC_DESKTOP,
            usUsage: USAGE_KEYBOARD,
            dwFlags: RIDEV_REMOVE,
            hwndTarget: core::ptr::null_mut(),
        };
        let ok = unsafe {
            RegisterRawInputDevices(&rid, 1, core::mem::size_of::<RAWINPUTDEVICE>() as u32)
        };
        if ok == 0 {
            let code = unsafe { GetLastError() };
            log::warn!("{}", InputError::RawInputRegistration(code));
        }
        self.registered = false;
    }

    /// Native event filter entry point. Always returns `false` (not consumed).
    pub fn filter(&mut self, message: u32, lparam: isize) -> bool {
        if !self.announced {
            log::debug!("WM_INPUT filter active, raw background keyboard enabled");
            self.announced = true;
        }
        if message != WM_INPUT {
            return false;
        }
        if let Some(packet) = read_wm_input(lparam) {
            #[cfg(feature = "debug-log")]
            log::trace!(
                "[RAWKBD] dev={:?} vk=0x{:02x} sc=0x{:02x} ext={} break={}",
                packet.hdevice,
                packet.vkey,
                packet.scancode,
                packet.is_extended,
                packet.is_break
            );
            self.sender.enqueue_virtual_key(packet.vkey, !packet.is_break);
        }
        false
    }
}

impl Drop for RawKeyboardHook {
    fn drop(&mut self) {
        self.unregister();
    }
}
