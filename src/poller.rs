//! Gamepad polling and event synthesis.
//!
//! The host drives polling from its event loop: [`Poller::due`] says whether
//! [`POLL_INTERVAL`] has elapsed, and the controller then runs
//! [`Poller::test_gamepad`] once per polled device type.
//!
//! # One tick, one device type
//! 1. Capture a [`GamepadSnapshot`] of the active pad (empty if none) and
//!    store it as the new previous snapshot, before anything else.
//! 2. Unless window focus is ignored, stop if the application has no focus
//!    widget. This check runs before axes and again before buttons. Hats
//!    are not guarded by a check of their own.
//! 3. For every element that became active: build a "down" event, mark its
//!    logical button(s) pending, deliver it, and clear the mark again if the
//!    recipient did not accept it.
//! 4. For every element that became inactive: clear the mark, deliver "up".
//!
//! Previous snapshots are kept per device type, so two polled drivers never
//! see each other's elements as released. Switching the active pad of a type
//! keeps its snapshot: whatever the old pad held and the new one does not is
//! released on the next tick.
//!
//! The pending set is locked around each mark/clear and never while a
//! recipient runs, so a listener may call
//! [`InputController::poll_events`](crate::controller::InputController::poll_events).

use crate::binding::InputMapper;
use crate::device::{DeviceType, Gamepad};
use crate::event::{
    EventPriority, GamepadAxisEvent, GamepadButtonEvent, GamepadHatEvent, InputEvent,
};
use crate::eventbus::{FocusRouter, Toolkit};
use crate::pending::PendingEvents;
use crate::snapshot::GamepadSnapshot;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Gamepad poll cadence.
pub const POLL_INTERVAL: Duration = Duration::from_millis(15);

/// Delivers synthesized events to the current focus target.
pub struct Dispatcher<'a, T: Toolkit + ?Sized> {
    pub toolkit: &'a mut T,
    pub router: &'a FocusRouter,
    pub ignore_window_focus: bool,
}

impl<T: Toolkit + ?Sized> Dispatcher<'_, T> {
    /// Whether events may be delivered right now.
    fn may_deliver(&self) -> bool {
        self.ignore_window_focus || self.toolkit.focus_widget().is_some()
    }

    /// Send `event` at high priority; `false` when nobody accepted it.
    fn send(&mut self, event: InputEvent) -> bool {
        match self.router.gamepad_target(&*self.toolkit) {
            Some(target) => self.toolkit.send_event(target, event, EventPriority::High),
            None => {
                #[cfg(feature = "debug-log")]
                log::trace!("[POLL] no focus target for {:?}", event);
                false
            }
        }
    }
}

#[derive(Debug)]
pub struct Poller {
    interval: Duration,
    next_tick: Option<Instant>,
    previous: HashMap<DeviceType, GamepadSnapshot>,
}

impl Default for Poller {
    fn default() -> Self {
        Self::with_interval(POLL_INTERVAL)
    }
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            next_tick: None,
            previous: HashMap::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `true` when a tick is due at `now`; schedules the next one.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(next) if now < next => false,
            _ => {
                self.next_tick = Some(now + self.interval);
                true
            }
        }
    }

    /// Snapshot stored by the last [`Poller::test_gamepad`] for `ty`.
    pub fn previous(&self, ty: DeviceType) -> Option<&GamepadSnapshot> {
        self.previous.get(&ty)
    }

    /// Diff `pad` against the previous snapshot and deliver the edges.
    ///
    /// Returns the number of events generated. Events nobody accepted, or
    /// that found no target, still count.
    pub fn test_gamepad<T: Toolkit + ?Sized>(
        &mut self,
        pad: Option<&dyn Gamepad>,
        mapper: &InputMapper<'_>,
        pending: &PendingEvents,
        dispatch: &mut Dispatcher<'_, T>,
    ) -> usize {
        let ty = mapper.device_type();
        let current = match pad {
            Some(pad) => GamepadSnapshot::capture(pad, mapper),
            None => GamepadSnapshot::default(),
        };
        let old = self.previous.insert(ty, current.clone()).unwrap_or_default();

        if !dispatch.may_deliver() {
            return 0;
        }

        let diff = current.diff(&old);
        let mut sent = 0;

        for &(axis, direction) in &diff.axes.pressed {
            let event = InputEvent::GamepadAxis(GamepadAxisEvent {
                axis,
                direction,
                above_threshold: true,
                device: ty,
                mapped: mapper.map_axis_direction(axis, direction),
            });
            press(pending, dispatch, event);
            sent += 1;
        }
        for &(axis, direction) in &diff.axes.released {
            let event = InputEvent::GamepadAxis(GamepadAxisEvent {
                axis,
                direction,
                above_threshold: false,
                device: ty,
                mapped: mapper.map_axis_direction(axis, direction),
            });
            release(pending, dispatch, event);
            sent += 1;
        }

        if !dispatch.may_deliver() {
            return sent;
        }

        for &button in &diff.buttons.pressed {
            let event = InputEvent::GamepadButton(GamepadButtonEvent {
                pressed: true,
                button,
                device: ty,
                mapped: mapper.map_key(button as u32),
            });
            press(pending, dispatch, event);
            sent += 1;
        }
        for &button in &diff.buttons.released {
            let event = InputEvent::GamepadButton(GamepadButtonEvent {
                pressed: false,
                button,
                device: ty,
                mapped: mapper.map_key(button as u32),
            });
            release(pending, dispatch, event);
            sent += 1;
        }

        for &(hat, direction) in &diff.hats.pressed {
            let event = InputEvent::GamepadHat(GamepadHatEvent {
                pressed: true,
                hat,
                direction,
                device: ty,
                mapped: mapper.map_hat(hat, direction),
            });
            press(pending, dispatch, event);
            sent += 1;
        }
        for &(hat, direction) in &diff.hats.released {
            let event = InputEvent::GamepadHat(GamepadHatEvent {
                pressed: false,
                hat,
                direction,
                device: ty,
                mapped: mapper.map_hat(hat, direction),
            });
            release(pending, dispatch, event);
            sent += 1;
        }

        #[cfg(feature = "debug-log")]
        if sent > 0 {
            log::trace!("[POLL] {ty}: {sent} event(s), pending {:?}", pending.snapshot());
        }
        sent
    }
}

fn press<T: Toolkit + ?Sized>(
    pending: &PendingEvents,
    dispatch: &mut Dispatcher<'_, T>,
    event: InputEvent,
) {
    let keys = event.platform_keys();
    pending.post(keys);
    if !dispatch.send(event) {
        pending.clear(keys);
    }
}

fn release<T: Toolkit + ?Sized>(
    pending: &PendingEvents,
    dispatch: &mut Dispatcher<'_, T>,
    event: InputEvent,
) {
    pending.clear(event.platform_keys());
    dispatch.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::{VirtualDriver, VirtualGamepad};
    use crate::binding::InputMap;
    use crate::button::Button;
    use crate::device::InputDriver;
    use crate::event::{AxisDirection, HatDirection};
    use crate::eventbus::{EventFilter, InputEventBus, InputListener, WidgetId};

    struct Accept;
    impl InputListener for Accept {
        fn on_input(&mut self, _: &InputEvent) -> bool {
            true
        }
    }

    struct Reject;
    impl InputListener for Reject {
        fn on_input(&mut self, _: &InputEvent) -> bool {
            false
        }
    }

    fn setup() -> (VirtualGamepad, InputMap) {
        let pad = VirtualGamepad::new("pad", 10, 2, 1);
        let mut map = InputMap::new();
        VirtualDriver::new(Vec::new()).bind_defaults(&mut map);
        (pad, map)
    }

    fn tick<T: Toolkit>(
        poller: &mut Poller,
        pad: &VirtualGamepad,
        map: &InputMap,
        pending: &PendingEvents,
        toolkit: &mut T,
        window: WidgetId,
        ignore_window_focus: bool,
    ) -> usize {
        let router = FocusRouter::new(Some(window));
        let mut dispatch = Dispatcher {
            toolkit,
            router: &router,
            ignore_window_focus,
        };
        poller.test_gamepad(
            Some(pad),
            &map.mapper(DeviceType::VIRTUAL),
            pending,
            &mut dispatch,
        )
    }

    #[test]
    fn due_follows_interval() {
        let mut poller = Poller::new();
        let t0 = Instant::now();
        assert!(poller.due(t0));
        assert!(!poller.due(t0 + Duration::from_millis(5)));
        assert!(poller.due(t0 + POLL_INTERVAL));
    }

    #[test]
    fn accepted_press_stays_pending_until_release() {
        let (pad, map) = setup();
        let pending = PendingEvents::new();
        let mut bus = InputEventBus::new();
        let window = bus.add_listener(Accept, EventFilter::All, None);
        bus.set_focus(Some(window));
        let mut poller = Poller::new();

        pad.press_button(Button::Start.index());
        assert_eq!(tick(&mut poller, &pad, &map, &pending, &mut bus, window, false), 1);
        assert!(pending.contains(Button::Start));

        assert_eq!(tick(&mut poller, &pad, &map, &pending, &mut bus, window, false), 0);
        assert!(pending.contains(Button::Start));

        pad.release_button(Button::Start.index());
        assert_eq!(tick(&mut poller, &pad, &map, &pending, &mut bus, window, false), 1);
        assert!(pending.snapshot().is_empty());

        let history = bus.take_history();
        assert!(history.iter().all(|d| d.priority == EventPriority::High));
        assert_eq!(
            history[1].event,
            InputEvent::GamepadButton(GamepadButtonEvent {
                pressed: false,
                button: Button::Start.index(),
                device: DeviceType::VIRTUAL,
                mapped: Some(Button::Start),
            })
        );
    }

    #[test]
    fn rejected_press_is_not_pending() {
        let (pad, map) = setup();
        let pending = PendingEvents::new();
        let mut bus = InputEventBus::new();
        let window = bus.add_listener(Reject, EventFilter::All, None);
        bus.set_focus(Some(window));
        let mut poller = Poller::new();

        pad.set_axis(0, i16::MAX);
        pad.set_hat(0, HatDirection::UP_LEFT);
        assert_eq!(tick(&mut poller, &pad, &map, &pending, &mut bus, window, false), 2);
        assert!(pending.snapshot().is_empty());
        assert_eq!(
            poller.previous(DeviceType::VIRTUAL).unwrap().axes.iter().next(),
            Some(&(0, AxisDirection::Positive))
        );
    }

    #[test]
    fn unfocused_application_suppresses_events_but_tracks_state() {
        let (pad, map) = setup();
        let pending = PendingEvents::new();
        let mut bus = InputEventBus::new();
        let window = bus.add_listener(Accept, EventFilter::All, None);
        let mut poller = Poller::new();

        pad.press_button(0);
        assert_eq!(tick(&mut poller, &pad, &map, &pending, &mut bus, window, false), 0);
        assert!(bus.history().is_empty());
        assert!(poller.previous(DeviceType::VIRTUAL).unwrap().buttons.contains(&0));

        // The press happened while unfocused, so regaining focus has no edge.
        bus.set_focus(Some(window));
        assert_eq!(tick(&mut poller, &pad, &map, &pending, &mut bus, window, false), 0);

        pad.press_button(1);
        assert_eq!(tick(&mut poller, &pad, &map, &pending, &mut bus, window, true), 1);
    }

    #[test]
    fn ignore_window_focus_delivers_to_focus_parent() {
        let (pad, map) = setup();
        let pending = PendingEvents::new();
        let mut bus = InputEventBus::new();
        let window = bus.add_listener(Accept, EventFilter::All, None);
        let mut poller = Poller::new();

        pad.press_button(Button::A.index());
        assert_eq!(tick(&mut poller, &pad, &map, &pending, &mut bus, window, true), 1);
        assert_eq!(bus.history()[0].target, window);
        assert!(pending.contains(Button::A));
    }

    #[test]
    fn untargeted_events_are_counted_but_not_pending() {
        let (pad, map) = setup();
        let pending = PendingEvents::new();
        let mut bus = InputEventBus::new();
        let router = FocusRouter::new(None);
        let mut dispatch = Dispatcher {
            toolkit: &mut bus,
            router: &router,
            ignore_window_focus: true,
        };
        let mut poller = Poller::new();

        pad.press_button(Button::B.index());
        pad.set_hat(0, HatDirection::DOWN);
        let mapper = map.mapper(DeviceType::VIRTUAL);
        let sent = poller.test_gamepad(Some(&pad), &mapper, &pending, &mut dispatch);
        assert_eq!(sent, 2);
        assert!(pending.snapshot().is_empty());
        assert!(bus.history().is_empty());
    }
}
