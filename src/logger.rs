//! A listener that logs every event it receives.
use crate::event::InputEvent;
use crate::eventbus::InputListener;

/// Logs all input events at `debug` level and never accepts them.
#[derive(Debug, Default)]
pub struct Logger {
    label: String,
}

impl Logger {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl InputListener for Logger {
    fn on_input(&mut self, event: &InputEvent) -> bool {
        log::debug!("[{}] {:?}", self.label, event);
        false
    }
}
