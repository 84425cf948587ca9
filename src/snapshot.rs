//! Per-tick snapshot of which gamepad elements are active.
//!
//! [`GamepadSnapshot`] is an **owned**, read-only view of the active buttons,
//! axis directions and hat directions of one gamepad at a point in time
//! (typically "this poll tick"). The poller keeps the previous snapshot per
//! device type and [`GamepadSnapshot::diff`]s the new one against it to find
//! press and release edges.
//!
//! # Semantics
//! - A **button** is active while its reading is `true`.
//! - An **axis** is active in one direction once its reading crosses the
//!   binding's center ± threshold (see [`crate::binding`]). Unbound axes use
//!   the defaults, so they still produce edges a binding UI can capture.
//! - A **hat** is active in its current direction unless centered.
//! - Snapshots never poll; they reflect the gamepad's last update.

use crate::binding::InputMapper;
use crate::device::Gamepad;
use crate::event::{AxisDirection, HatDirection};
use std::collections::BTreeSet;

/// Active elements of one gamepad.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GamepadSnapshot {
    pub buttons: BTreeSet<usize>,
    pub axes: BTreeSet<(usize, AxisDirection)>,
    pub hats: BTreeSet<(usize, HatDirection)>,
}

/// Elements that became active / inactive between two snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edges<T> {
    pub pressed: Vec<T>,
    pub released: Vec<T>,
}

impl<T> Default for Edges<T> {
    fn default() -> Self {
        Self {
            pressed: Vec::new(),
            released: Vec::new(),
        }
    }
}

/// Edges for every element kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub buttons: Edges<usize>,
    pub axes: Edges<(usize, AxisDirection)>,
    pub hats: Edges<(usize, HatDirection)>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.buttons.pressed.is_empty()
            && self.buttons.released.is_empty()
            && self.axes.pressed.is_empty()
            && self.axes.released.is_empty()
            && self.hats.pressed.is_empty()
            && self.hats.released.is_empty()
    }
}

impl GamepadSnapshot {
    /// Read `pad` once, judging axes with `mapper`'s center/threshold.
    pub fn capture(pad: &dyn Gamepad, mapper: &InputMapper<'_>) -> Self {
        let buttons = pad
            .current_buttons()
            .into_iter()
            .enumerate()
            .filter_map(|(i, down)| down.then_some(i))
            .collect();
        let axes = pad
            .current_axes()
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| mapper.axis_direction(i, v).map(|d| (i, d)))
            .collect();
        let hats = pad
            .current_hats()
            .into_iter()
            .enumerate()
            .filter(|(_, d)| !d.is_centered())
            .collect();
        Self {
            buttons,
            axes,
            hats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty() && self.axes.is_empty() && self.hats.is_empty()
    }

    /// Edges going from `previous` to `self`.
    pub fn diff(&self, previous: &GamepadSnapshot) -> SnapshotDiff {
        SnapshotDiff {
            buttons: edges(&previous.buttons, &self.buttons),
            axes: edges(&previous.axes, &self.axes),
            hats: edges(&previous.hats, &self.hats),
        }
    }
}

fn edges<T: Ord + Copy>(old: &BTreeSet<T>, new: &BTreeSet<T>) -> Edges<T> {
    Edges {
        pressed: new.difference(old).copied().collect(),
        released: old.difference(new).copied().collect(),
    }
}
