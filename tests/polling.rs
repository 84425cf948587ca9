//! Gamepad polling through the public controller surface: pending-event
//! bookkeeping, window-focus gating and focus steal/release routing.

use padbridge::backends::keyboard::KeyboardDriver;
use padbridge::backends::virtual_input::{VirtualDriver, VirtualGamepad};
use padbridge::{
    Button, ButtonSet, ConfigStore, DeviceType, EventFilter, EventPriority, HatDirection,
    InputController, InputEvent, InputEventBus, InputListener, SlotAllocator, WidgetId,
};
use std::sync::Arc;

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

fn setup(
    slots: &Arc<SlotAllocator>,
    bus: &mut InputEventBus,
) -> (InputController, VirtualGamepad, WidgetId) {
    let window = bus.add_listener(Accept, EventFilter::All, None);
    bus.set_focus(Some(window));

    let pad = VirtualGamepad::new("Test Pad", 10, 2, 1);
    let mut controller = InputController::new(slots, Some(window));
    controller.add_input_driver(KeyboardDriver::new());
    controller.add_input_driver(VirtualDriver::new(vec![pad.clone()]));
    (controller, pad, window)
}

fn targets(bus: &InputEventBus) -> Vec<WidgetId> {
    bus.history().iter().map(|d| d.target).collect()
}

#[test]
fn press_is_hidden_from_polling_until_released() {
    let slots = SlotAllocator::new();
    let mut bus = InputEventBus::new();
    let (mut c, pad, window) = setup(&slots, &mut bus);

    pad.press_button(Button::A.index());
    pad.press_button(Button::Start.index());
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 2);

    let pending = c.pending_events();
    assert!(pending.contains(Button::A));
    assert!(pending.contains(Button::Start));
    assert!(c.poll_events().is_empty());

    pad.release_button(Button::A.index());
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 1);
    assert!(!pending.contains(Button::A));
    assert!(pending.contains(Button::Start));

    let history = bus.take_history();
    assert!(history.iter().all(|d| d.target == window));
    assert!(history.iter().all(|d| d.priority == EventPriority::High));
    assert!(matches!(
        history.last().map(|d| d.event),
        Some(InputEvent::GamepadButton(e)) if !e.pressed && e.mapped == Some(Button::A)
    ));

    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 0);
}

#[test]
fn axes_and_hats_produce_mapped_events() {
    let slots = SlotAllocator::new();
    let mut bus = InputEventBus::new();
    let (mut c, pad, _) = setup(&slots, &mut bus);

    pad.set_axis(0, 0x5000);
    pad.set_hat(0, HatDirection::UP_LEFT);
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 2);

    let events: Vec<InputEvent> = bus.take_history().into_iter().map(|d| d.event).collect();
    match events[0] {
        InputEvent::GamepadAxis(e) => {
            assert_eq!(e.axis, 0);
            assert!(e.above_threshold);
            assert_eq!(e.mapped, Some(Button::Right));
        }
        other => panic!("expected an axis event first, got {other:?}"),
    }
    match events[1] {
        InputEvent::GamepadHat(e) => {
            assert!(e.pressed);
            assert_eq!(e.mapped, [Button::Up, Button::Left].into_iter().collect::<ButtonSet>());
        }
        other => panic!("expected a hat event, got {other:?}"),
    }

    let pending = c.pending_events().snapshot();
    assert_eq!(
        pending,
        [Button::Right, Button::Up, Button::Left].into_iter().collect::<ButtonSet>()
    );

    pad.set_axis(0, 100);
    pad.set_hat(0, HatDirection::CENTERED);
    c.test_gamepad(DeviceType::VIRTUAL, &mut bus);
    assert!(c.pending_events().snapshot().is_empty());
}

#[test]
fn rejected_press_is_visible_to_polling() {
    let slots = SlotAllocator::new();
    let mut bus = InputEventBus::new();
    let deaf = bus.add_listener(Reject, EventFilter::All, None);
    bus.set_focus(Some(deaf));

    let pad = VirtualGamepad::new("Test Pad", 10, 0, 0);
    let mut c = InputController::new(&slots, Some(deaf));
    c.add_input_driver(VirtualDriver::new(vec![pad.clone()]));

    pad.press_button(Button::B.index());
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 1);
    assert!(c.pending_events().snapshot().is_empty());
    assert_eq!(c.poll_events(), ButtonSet::from(Button::B));
}

#[test]
fn background_application_gets_no_events() {
    let slots = SlotAllocator::new();
    let mut bus = InputEventBus::new();
    let (mut c, pad, window) = setup(&slots, &mut bus);
    bus.set_focus(None);

    pad.press_button(Button::L.index());
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 0);
    assert!(bus.history().is_empty());
    assert_eq!(c.poll_events(), ButtonSet::from(Button::L));

    // The press was recorded while unfocused, so regaining focus is not a new edge.
    bus.set_focus(Some(window));
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 0);
}

#[test]
fn ignore_window_focus_option_delivers_in_background() {
    let slots = SlotAllocator::new();
    let mut bus = InputEventBus::new();
    let (mut c, pad, window) = setup(&slots, &mut bus);
    bus.set_focus(None);

    let mut config = ConfigStore::in_memory();
    config.options_mut().ignore_window_focus = true;
    c.set_configuration(config);

    pad.press_button(Button::R.index());
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 1);
    assert_eq!(targets(&bus), vec![window]);
}

#[test]
fn stolen_focus_routes_to_the_dialog() {
    let slots = SlotAllocator::new();
    let mut bus = InputEventBus::new();
    let (mut c, pad, window) = setup(&slots, &mut bus);
    let dialog = bus.add_listener(Accept, EventFilter::GamepadOnly, None);
    let field = bus.add_listener(Accept, EventFilter::All, Some(dialog));

    c.steal_focus(dialog);
    assert_eq!(c.focus_parent(), Some(dialog));
    pad.press_button(0);
    c.test_gamepad(DeviceType::VIRTUAL, &mut bus);

    // A focused widget inside the dialog takes precedence over the dialog.
    bus.set_focus(Some(field));
    pad.press_button(1);
    c.test_gamepad(DeviceType::VIRTUAL, &mut bus);

    // Releasing on behalf of some other widget changes nothing.
    c.release_focus(window);
    assert_eq!(c.focus_parent(), Some(dialog));

    c.release_focus(dialog);
    assert_eq!(c.focus_parent(), Some(window));
    bus.set_focus(Some(window));
    pad.press_button(2);
    c.test_gamepad(DeviceType::VIRTUAL, &mut bus);

    assert_eq!(targets(&bus), vec![dialog, field, window]);
}

fn two_pads(
    slots: &Arc<SlotAllocator>,
    bus: &mut InputEventBus,
) -> (InputController, VirtualGamepad, VirtualGamepad) {
    let window = bus.add_listener(Accept, EventFilter::All, None);
    bus.set_focus(Some(window));

    let first = VirtualGamepad::new("first", 10, 0, 1);
    let second = VirtualGamepad::new("second", 10, 0, 1);
    let mut c = InputController::new(slots, Some(window));
    c.add_input_driver(VirtualDriver::new(vec![first.clone(), second.clone()]));
    (c, first, second)
}

fn releases(bus: &mut InputEventBus) -> usize {
    bus.take_history()
        .into_iter()
        .filter(|d| match d.event {
            InputEvent::GamepadButton(e) => !e.pressed,
            InputEvent::GamepadHat(e) => !e.pressed,
            InputEvent::GamepadAxis(e) => !e.above_threshold,
            _ => false,
        })
        .count()
}

#[test]
fn switching_pads_releases_what_the_old_pad_held() {
    let slots = SlotAllocator::new();
    let mut bus = InputEventBus::new();
    let (mut c, first, second) = two_pads(&slots, &mut bus);

    first.press_button(Button::A.index());
    first.set_hat(0, HatDirection::UP);
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 2);
    let pending = c.pending_events();
    assert_eq!(
        pending.snapshot(),
        [Button::A, Button::Up].into_iter().collect::<ButtonSet>()
    );
    bus.take_history();

    c.set_gamepad(None, 1);
    assert_eq!(c.gamepad_index(None), Some(1));
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 2);
    assert_eq!(releases(&mut bus), 2);
    assert!(pending.snapshot().is_empty());
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 0);

    // The new pad's press is visible to polling until it is delivered.
    second.press_button(Button::A.index());
    assert_eq!(c.poll_events(), ButtonSet::from(Button::A));
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 1);
    assert!(pending.contains(Button::A));
}

#[test]
fn hat_held_on_both_pads_carries_across_a_preferred_switch() {
    let slots = SlotAllocator::new();
    let mut bus = InputEventBus::new();
    let (mut c, first, second) = two_pads(&slots, &mut bus);

    first.set_hat(0, HatDirection::LEFT);
    second.set_hat(0, HatDirection::LEFT);
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 1);
    let pending = c.pending_events();
    assert!(pending.contains(Button::Left));

    let mut config = ConfigStore::in_memory();
    config.set_preferred_device(DeviceType::VIRTUAL, c.player_id(), "second");
    c.set_configuration(config);
    assert_eq!(c.gamepad_index(None), Some(1));

    // Same direction on the new pad: no edge, still pending.
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 0);
    assert!(pending.contains(Button::Left));

    // Releasing it on the new pad produces the one up event.
    second.set_hat(0, HatDirection::CENTERED);
    bus.take_history();
    assert_eq!(c.test_gamepad(DeviceType::VIRTUAL, &mut bus), 1);
    assert_eq!(releases(&mut bus), 1);
    assert!(pending.snapshot().is_empty());
}

#[test]
fn pending_set_is_readable_from_the_core_thread() {
    let slots = SlotAllocator::new();
    let mut bus = InputEventBus::new();
    let (mut c, pad, _) = setup(&slots, &mut bus);

    pad.press_button(Button::B.index());
    c.test_gamepad(DeviceType::VIRTUAL, &mut bus);

    let pending = c.pending_events();
    let held = [Button::A, Button::B].into_iter().collect::<ButtonSet>();
    let filtered = std::thread::spawn(move || pending.filter(held))
        .join()
        .unwrap();
    assert_eq!(filtered, ButtonSet::from(Button::A));
}
