//! Keys captured by a background hook travel through the key queue to the
//! toolkit and end up driving emulated buttons.

use padbridge::backends::keyboard::KeyboardDriver;
use padbridge::hook::{VK_RETURN, VK_UP};
use padbridge::{
    Button, ButtonSet, EventFilter, EventPriority, InputController, InputEvent, InputEventBus,
    InputListener, Key, KeyEvent, SlotAllocator,
};

struct Accept;
impl InputListener for Accept {
    fn on_input(&mut self, _: &InputEvent) -> bool {
        true
    }
}

fn delivered_keys(bus: &mut InputEventBus) -> Vec<KeyEvent> {
    bus.take_history()
        .into_iter()
        .filter_map(|d| match d.event {
            InputEvent::Key(k) => Some(k),
            _ => None,
        })
        .collect()
}

#[test]
fn hooked_keys_reach_the_top_level_and_drive_buttons() {
    let slots = SlotAllocator::new();
    let mut bus = InputEventBus::new();
    let window = bus.add_listener(Accept, EventFilter::KeysOnly, None);
    let other = bus.add_listener(Accept, EventFilter::All, None);
    bus.set_focus(Some(other));

    let mut c = InputController::new(&slots, Some(window));
    c.add_input_driver(KeyboardDriver::new());

    let sender = c.key_sender();
    std::thread::spawn(move || {
        assert!(sender.enqueue_virtual_key(VK_UP, true));
        assert!(sender.enqueue_virtual_key(VK_RETURN, true));
        assert!(!sender.enqueue_virtual_key(0x70, true));
        assert!(sender.enqueue_virtual_key(VK_UP, false));
    })
    .join()
    .unwrap();

    assert_eq!(c.pump_key_events(&mut bus), 3);
    assert!(bus
        .history()
        .iter()
        .all(|d| d.target == window && d.priority == EventPriority::Normal));

    for event in delivered_keys(&mut bus) {
        c.handle_key_event(&event);
    }
    assert_eq!(c.keyboard_buttons(), ButtonSet::from(Button::Start));
    assert_eq!(c.pump_key_events(&mut bus), 0);
}

#[test]
fn without_a_top_level_keys_go_to_the_focus_widget() {
    let slots = SlotAllocator::new();
    let mut bus = InputEventBus::new();
    let focused = bus.add_listener(Accept, EventFilter::All, None);

    let mut c = InputController::new(&slots, None);
    c.key_sender().enqueue_key(Key::Z, true);

    // Nobody to deliver to: the event is dropped, not kept for later.
    assert_eq!(c.pump_key_events(&mut bus), 0);

    bus.set_focus(Some(focused));
    c.key_sender().enqueue_key(Key::Z, false);
    assert_eq!(c.pump_key_events(&mut bus), 1);
    assert_eq!(
        delivered_keys(&mut bus),
        vec![KeyEvent {
            key: Key::Z,
            pressed: false
        }]
    );

    c.set_top_level(Some(focused));
    assert_eq!(c.focus_parent(), Some(focused));
}

#[test]
fn native_filter_registration_is_idempotent() {
    let slots = SlotAllocator::new();
    let mut c = InputController::new(&slots, None);

    // A null window handle defers the OS registration.
    c.register_native_event_filter(0);
    c.register_native_event_filter(0);
    assert!(!c.native_event_filter(0, 0));

    c.unregister_native_event_filter();
    assert!(!c.has_native_event_filter());
    c.unregister_native_event_filter();
}
