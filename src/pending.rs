//! Logical buttons with a press event in flight.
//!
//! When the poller posts a "down" event for a gamepad source it marks the
//! source's logical button(s) pending; the matching "up" event clears them.
//! While a button is pending, [`InputController::poll_events`] leaves it out
//! of the active set so the emulation core does not see the press twice
//! (once through the toolkit event, once through direct polling).
//!
//! The set is shared with whatever thread the core polls from, hence the lock.
//!
//! [`InputController::poll_events`]: crate::controller::InputController::poll_events

use crate::button::{Button, ButtonSet};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct PendingEvents {
    inner: RwLock<ButtonSet>,
}

impl PendingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ButtonSet> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ButtonSet> {
        self.inner.write()
    }

    pub fn post(&self, buttons: ButtonSet) {
        *self.inner.write() |= buttons;
    }

    pub fn clear(&self, buttons: ButtonSet) {
        let mut guard = self.inner.write();
        for b in buttons.iter() {
            guard.remove(b);
        }
    }

    pub fn contains(&self, button: Button) -> bool {
        self.inner.read().contains(button)
    }

    pub fn snapshot(&self) -> ButtonSet {
        *self.inner.read()
    }

    /// `active` with every pending button removed.
    pub fn filter(&self, active: ButtonSet) -> ButtonSet {
        let pending = self.inner.read();
        active.iter().filter(|b| !pending.contains(*b)).collect()
    }
}
