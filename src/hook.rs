//! Background keyboard capture plumbing.
//!
//! A native hook (see `backends::windows::keyboard_hook`) receives raw key
//! messages regardless of which window has focus, translates the virtual-key
//! code through [`key_from_virtual_key`] and posts the result into a
//! [`KeyEventQueue`]. The UI thread drains the queue and forwards each event to
//! the top-level window (or the focused widget).
//!
//! The translation table is deliberately small: it covers the keys the
//! default keyboard bindings use, not a full keyboard map.

use crate::event::{Key, KeyEvent};
use crossbeam_channel::{Receiver, Sender, TryIter};

// Win32 virtual-key codes (kept local so the table is testable off Windows).
pub const VK_BACK: u16 = 0x08;
pub const VK_RETURN: u16 = 0x0D;
pub const VK_LEFT: u16 = 0x25;
pub const VK_UP: u16 = 0x26;
pub const VK_RIGHT: u16 = 0x27;
pub const VK_DOWN: u16 = 0x28;

/// Toolkit key for a virtual-key code, or `None` for anything untranslated.
pub fn key_from_virtual_key(vk: u16) -> Option<Key> {
    match vk {
        VK_UP => Some(Key::UP),
        VK_DOWN => Some(Key::DOWN),
        VK_LEFT => Some(Key::LEFT),
        VK_RIGHT => Some(Key::RIGHT),
        0x5A => Some(Key::Z),
        0x58 => Some(Key::X),
        0x41 => Some(Key::A),
        0x53 => Some(Key::S),
        VK_RETURN => Some(Key::RETURN),
        VK_BACK => Some(Key::BACKSPACE),
        _ => None,
    }
}

/// Thread-safe handle the hook posts through.
#[derive(Clone, Debug)]
pub struct KeySender {
    tx: Sender<KeyEvent>,
}

impl KeySender {
    /// Post a press/release. Never blocks; a closed queue drops the event.
    pub fn enqueue_key(&self, key: Key, pressed: bool) {
        let _ = self.tx.send(KeyEvent { key, pressed });
    }

    /// Translate and post a raw virtual-key transition. Returns whether the
    /// key was translated.
    pub fn enqueue_virtual_key(&self, vk: u16, pressed: bool) -> bool {
        match key_from_virtual_key(vk) {
            Some(key) => {
                self.enqueue_key(key, pressed);
                true
            }
            None => false,
        }
    }
}

/// Unbounded MPSC queue of synthetic key events.
#[derive(Debug)]
pub struct KeyEventQueue {
    tx: Sender<KeyEvent>,
    rx: Receiver<KeyEvent>,
}

impl Default for KeyEventQueue {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }
}

impl KeyEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> KeySender {
        KeySender {
            tx: self.tx.clone(),
        }
    }

    /// Drain everything queued so far.
    pub fn drain(&self) -> TryIter<'_, KeyEvent> {
        self.rx.try_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
