//! Logical (emulated-console) buttons.
//!
//! A [`Button`] identifies one of the ten console inputs independently of the
//! physical source that drives it. Bit positions are fixed and match the
//! order the emulation core expects in its key register:
//!
//! | bit | button |
//! |-----|--------|
//! | 0   | A      |
//! | 1   | B      |
//! | 2   | Select |
//! | 3   | Start  |
//! | 4   | Right  |
//! | 5   | Left   |
//! | 6   | Up     |
//! | 7   | Down   |
//! | 8   | R      |
//! | 9   | L      |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of logical buttons.
pub const BUTTON_COUNT: usize = 10;

/// One emulated-console button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Button {
    A,
    B,
    Select,
    Start,
    Right,
    Left,
    Up,
    Down,
    R,
    L,
}

impl Button {
    /// All buttons in bit order.
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Right,
        Button::Left,
        Button::Up,
        Button::Down,
        Button::R,
        Button::L,
    ];

    /// Bit position of this button.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Button::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Configuration key name (`"A"`, `"Select"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::Select => "Select",
            Button::Start => "Start",
            Button::Right => "Right",
            Button::Left => "Left",
            Button::Up => "Up",
            Button::Down => "Down",
            Button::R => "R",
            Button::L => "L",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bitmask of logical buttons (bit `n` = [`Button::from_index`]`(n)`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ButtonSet(u16);

impl ButtonSet {
    pub const EMPTY: ButtonSet = ButtonSet(0);

    #[inline]
    pub fn from_bits(bits: u16) -> Self {
        Self(bits & ((1 << BUTTON_COUNT) - 1))
    }

    #[inline]
    pub fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(self, button: Button) -> bool {
        self.0 & (1 << button.index()) != 0
    }

    #[inline]
    pub fn insert(&mut self, button: Button) {
        self.0 |= 1 << button.index();
    }

    #[inline]
    pub fn remove(&mut self, button: Button) {
        self.0 &= !(1 << button.index());
    }

    /// Iterate the buttons present, in bit order.
    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl From<Button> for ButtonSet {
    fn from(button: Button) -> Self {
        let mut set = ButtonSet::EMPTY;
        set.insert(button);
        set
    }
}

impl std::ops::BitOr for ButtonSet {
    type Output = ButtonSet;
    fn bitor(self, rhs: Self) -> Self {
        ButtonSet(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ButtonSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<Button> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        let mut set = ButtonSet::EMPTY;
        for b in iter {
            set.insert(b);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_order_matches_core_register() {
        assert_eq!(Button::A.index(), 0);
        assert_eq!(Button::Start.index(), 3);
        assert_eq!(Button::L.index(), 9);
        assert_eq!(Button::from_index(6), Some(Button::Up));
        assert_eq!(Button::from_index(10), None);
    }

    #[test]
    fn set_ops() {
        let mut set: ButtonSet = [Button::A, Button::L].into_iter().collect();
        assert_eq!(set.bits(), 0b10_0000_0001);
        set.remove(Button::A);
        assert!(!set.contains(Button::A));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Button::L]);
        assert_eq!(ButtonSet::from_bits(0xFFFF).bits(), 0x3FF);
    }

    #[test]
    fn names_round_trip() {
        for b in Button::ALL {
            assert_eq!(Button::from_name(b.name()), Some(b));
        }
    }
}
