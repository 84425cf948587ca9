use padbridge::{InputController, SlotAllocator, MAX_PLAYERS};

#[test]
fn controllers_share_the_slot_pool() {
    let slots = SlotAllocator::new();
    let players: Vec<_> = (0..MAX_PLAYERS)
        .map(|_| InputController::new(&slots, None))
        .collect();
    let ids: Vec<_> = players.iter().map(InputController::player_id).collect();
    assert_eq!(ids, (0..MAX_PLAYERS).collect::<Vec<_>>());
    assert!(slots.try_claim().is_none());

    drop(players);
    assert_eq!(slots.claimed_count(), 0);
}

#[test]
#[should_panic(expected = "all slots in use")]
fn one_controller_too_many_is_fatal() {
    let slots = SlotAllocator::new();
    let _players: Vec<_> = (0..=MAX_PLAYERS)
        .map(|_| InputController::new(&slots, None))
        .collect();
}
