//! Event delivery to the GUI toolkit.
//!
//! padbridge never owns widgets. It talks to the host toolkit through the
//! [`Toolkit`] trait: ask who has focus, and deliver an [`InputEvent`] to a
//! widget, learning whether the recipient accepted it.
//!
//! [`InputEventBus`] is a small in-process toolkit: widgets are listeners
//! registered with an id, an optional parent and an [`EventFilter`]. Headless
//! hosts (and the tests) use it directly; GUI hosts implement [`Toolkit`]
//! over their own event loop instead.

use crate::event::{EventPriority, InputEvent};
use std::collections::HashMap;

/// Opaque widget handle.
pub type WidgetId = u64;

/// What the input layer needs from the GUI toolkit.
pub trait Toolkit {
    /// Application-wide focused widget, `None` when the app is in the background.
    fn focus_widget(&self) -> Option<WidgetId>;

    /// Focused widget inside `parent`'s subtree, if any.
    fn focus_child(&self, parent: WidgetId) -> Option<WidgetId>;

    /// Deliver `event` to `target`. Returns `true` if the recipient accepted it.
    fn send_event(&mut self, target: WidgetId, event: InputEvent, priority: EventPriority) -> bool;
}

/// Receives events delivered to one widget.
pub trait InputListener: Send {
    /// Handle `event`; return `true` to accept it.
    fn on_input(&mut self, event: &InputEvent) -> bool;
}

/// Determines which kinds of events a listener wants to receive.
#[derive(Debug, Clone, Copy)]
pub enum EventFilter {
    All,
    KeysOnly,
    GamepadOnly,
    Custom(fn(&InputEvent) -> bool),
}

impl EventFilter {
    fn passes(&self, event: &InputEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::KeysOnly => matches!(event, InputEvent::Key(_)),
            EventFilter::GamepadOnly => event.is_gamepad(),
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Metadata-wrapped listener with filters and control flags.
struct ListenerEntry {
    listener: Box<dyn InputListener>,
    enabled: bool,
    filter: EventFilter,
    parent: Option<WidgetId>,
}

/// Input focus target, distinct from toolkit keyboard focus.
///
/// Gamepad events go to the focus parent's focused child, else the focus
/// parent itself; with no focus parent they go to the application focus
/// widget. Dialogs that capture bindings [`steal`](FocusRouter::steal) the
/// focus parent and [`release`](FocusRouter::release) it when they close.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusRouter {
    top_level: Option<WidgetId>,
    parent: Option<WidgetId>,
}

impl FocusRouter {
    pub fn new(top_level: Option<WidgetId>) -> Self {
        Self {
            top_level,
            parent: top_level,
        }
    }

    pub fn top_level(&self) -> Option<WidgetId> {
        self.top_level
    }

    /// Change the top-level window; a focus parent that was the old top
    /// level follows it.
    pub fn set_top_level(&mut self, top_level: Option<WidgetId>) {
        if self.parent == self.top_level {
            self.parent = top_level;
        }
        self.top_level = top_level;
    }

    pub fn focus_parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn steal(&mut self, widget: WidgetId) {
        self.parent = Some(widget);
    }

    /// Hand focus back to the top level, but only if `widget` holds it.
    pub fn release(&mut self, widget: WidgetId) {
        if self.parent == Some(widget) {
            self.parent = self.top_level;
        }
    }

    /// Recipient of synthesized gamepad events.
    pub fn gamepad_target<T: Toolkit + ?Sized>(&self, toolkit: &T) -> Option<WidgetId> {
        match self.parent {
            Some(parent) => toolkit.focus_child(parent).or(Some(parent)),
            None => toolkit.focus_widget(),
        }
    }

    /// Recipient of key events re-injected by the native hook.
    pub fn key_target<T: Toolkit + ?Sized>(&self, toolkit: &T) -> Option<WidgetId> {
        self.top_level.or_else(|| toolkit.focus_widget())
    }
}

/// A trail of what was delivered, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub target: WidgetId,
    pub event: InputEvent,
    pub priority: EventPriority,
    pub accepted: bool,
}

/// In-process [`Toolkit`].
#[derive(Default)]
pub struct InputEventBus {
    next_id: WidgetId,
    listeners: HashMap<WidgetId, ListenerEntry>,
    focus: Option<WidgetId>,
    history: Vec<Delivery>,
}

impl InputEventBus {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Registers a widget and returns its id.
    pub fn add_listener(
        &mut self,
        listener: impl InputListener + 'static,
        filter: EventFilter,
        parent: Option<WidgetId>,
    ) -> WidgetId {
        self.next_id = self.next_id.max(1);
        let id = self.next_id;
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
                parent,
            },
        );
        self.next_id += 1;
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&mut self, id: WidgetId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&mut self, id: WidgetId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener entirely.
    pub fn remove_listener(&mut self, id: WidgetId) {
        self.listeners.remove(&id);
        if self.focus == Some(id) {
            self.focus = None;
        }
    }

    /// Give application focus to `id` (`None` = app in background).
    pub fn set_focus(&mut self, id: Option<WidgetId>) {
        self.focus = id.filter(|id| self.listeners.contains_key(id));
    }

    /// Everything delivered so far, oldest first.
    pub fn history(&self) -> &[Delivery] {
        &self.history
    }

    pub fn take_history(&mut self) -> Vec<Delivery> {
        std::mem::take(&mut self.history)
    }

    fn is_descendant(&self, mut id: WidgetId, ancestor: WidgetId) -> bool {
        // Bounded walk in case a host wires up a parent cycle.
        for _ in 0..=self.listeners.len() {
            if id == ancestor {
                return true;
            }
            match self.listeners.get(&id).and_then(|e| e.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
        false
    }
}

impl Toolkit for InputEventBus {
    fn focus_widget(&self) -> Option<WidgetId> {
        self.focus
    }

    fn focus_child(&self, parent: WidgetId) -> Option<WidgetId> {
        let focus = self.focus?;
        (focus != parent && self.is_descendant(focus, parent)).then_some(focus)
    }

    fn send_event(&mut self, target: WidgetId, event: InputEvent, priority: EventPriority) -> bool {
        let accepted = match self.listeners.get_mut(&target) {
            Some(entry) if entry.enabled && entry.filter.passes(&event) => {
                entry.listener.on_input(&event)
            }
            _ => false,
        };
        self.history.push(Delivery {
            target,
            event,
            priority,
            accepted,
        });
        accepted
    }
}
