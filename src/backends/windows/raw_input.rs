//! Windows Raw Input parsing helpers (keyboard).
//!
//! This module is intentionally "dumb": it only parses `WM_INPUT` payloads into
//! small structs. Registration and event enqueueing live in
//! [`keyboard_hook`](super::keyboard_hook).
//!
//! ## What you get
//! - Keyboard packets: virtual key + scancode + extended flag + break/make state
//!
//! ## What you **don't** get
//! - Mouse or HID packets (filtered out)
//! - No text/character translation (this is *not* a WM_CHAR layer)

#![cfg(target_os = "windows")]

use core::ffi::c_void;
use windows_sys::Win32::Foundation::HANDLE;
use windows_sys::Win32::UI::Input::*;

#[derive(Clone, Copy, Debug)]
pub(crate) struct RawKeyboardPacket {
    /// Raw Input device handle that produced the event.
    pub hdevice: HANDLE,
    /// Win32 virtual-key code (layout-dependent).
    pub vkey: u16,
    /// Hardware scancode (layout-independent).
    pub scancode: u16,
    /// Extended key flag (E0/E1 prefix).
    pub is_extended: bool,
    /// `true` for key-up (break), `false` for key-down (make).
    pub is_break: bool,
}

// Local constants (avoid relying on module exports that vary by windows-sys version)
const RI_KEY_BREAK: u16 = 0x0001;
const RI_KEY_E0: u16 = 0x0002;
const RI_KEY_E1: u16 = 0x0004;

/// Parse a `WM_INPUT` lparam into a keyboard packet (if it is one).
pub(crate) fn read_wm_input(lparam: isize) -> Option<RawKeyboardPacket> {
    unsafe {
        // Query size
        let mut size: u32 = 0;
        let r0 = GetRawInputData(
            lparam as _,
            RID_INPUT,
            core::ptr::null_mut(),
            &mut size,
            core::mem::size_of::<RAWINPUTHEADER>() as u32,
        );
        if r0 == u32::MAX || size == 0 {
            return None;
        }

        // Read buffer; a short read means the packet is unusable.
        let mut buf = vec![0u8; size as usize];
        let r1 = GetRawInputData(
            lparam as _,
            RID_INPUT,
            buf.as_mut_ptr() as *mut c_void,
            &mut size,
            core::mem::size_of::<RAWINPUTHEADER>() as u32,
        );
        if r1 == u32::MAX || r1 != size {
            return None;
        }

        read_raw_input_bytes(&buf)
    }
}

/// Parse a raw `RID_INPUT` payload (bytes returned by `GetRawInputData`).
///
/// Non-keyboard packets return `None`.
pub(crate) fn read_raw_input_bytes(buf: &[u8]) -> Option<RawKeyboardPacket> {
    let hdr_sz = core::mem::size_of::<RAWINPUTHEADER>();
    if buf.len() < hdr_sz {
        return None;
    }

    unsafe {
        let hdr: RAWINPUTHEADER = core::ptr::read_unaligned(buf.as_ptr() as *const RAWINPUTHEADER);
        if hdr.dwType != RIM_TYPEKEYBOARD {
            return None;
        }

        let need = hdr_sz + core::mem::size_of::<RAWKEYBOARD>();
        if buf.len() < need {
            return None;
        }

        let data_ptr = buf.as_ptr().add(hdr_sz);
        let kbd: RAWKEYBOARD = core::ptr::read_unaligned(data_ptr as *const RAWKEYBOARD);
        let flags: u16 = kbd.Flags as u16;

        Some(RawKeyboardPacket {
            hdevice: hdr.hDevice,
            vkey: kbd.VKey as u16,
            scancode: kbd.MakeCode as u16,
            is_extended: (flags & (RI_KEY_E0 | RI_KEY_E1)) != 0,
            is_break: (flags & RI_KEY_BREAK) != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(dw_type: u32, vkey: u16, flags: u16) -> Vec<u8> {
        let hdr = RAWINPUTHEADER {
            dwType: dw_type,
            dwSize: 0,
            hDevice: core::ptr::null_mut(),
            wParam: 0,
        };
        let kbd = RAWKEYBOARD {
            MakeCode: 0x48,
            Flags: flags,
            Reserved: 0,
            VKey: vkey,
            Message: 0,
            ExtraInformation: 0,
        };
        let mut buf = Vec::new();
        unsafe {
            buf.extend_from_slice(core::slice::from_raw_parts(
                &hdr as *const _ as *const u8,
                core::mem::size_of::<RAWINPUTHEADER>(),
            ));
            buf.extend_from_slice(core::slice::from_raw_parts(
                &kbd as *const _ as *const u8,
                core::mem::size_of::<RAWKEYBOARD>(),
            ));
        }
        buf
    }

    #[test]
    fn parses_keyboard_make_and_break() {
        let down = read_raw_input_bytes(&packet(RIM_TYPEKEYBOARD, 0x26, RI_KEY_E0)).unwrap();
        assert_eq!(down.vkey, 0x26);
        assert!(!down.is_break);
        assert!(down.is_extended);

        let up = read_raw_input_bytes(&packet(RIM_TYPEKEYBOARD, 0x26, RI_KEY_BREAK)).unwrap();
        assert!(up.is_break);
    }

    #[test]
    fn ignores_mouse_and_short_buffers() {
        assert!(read_raw_input_bytes(&packet(RIM_TYPEMOUSE, 0x26, 0)).is_none());
        assert!(read_raw_input_bytes(&[0u8; 4]).is_none());
    }
}
