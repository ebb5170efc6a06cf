use super::*;

fn new_room() -> Room {
    Room::new("room-1".to_string(), 8, Some(1))
}

fn join(room: &mut Room, id: &str, name: &str) {
    room.join(id.to_string(), name.to_string());
}

#[test]
fn first_joiner_becomes_host() {
    let mut room = new_room();
    let (outcome, _) = room.join("u1".to_string(), "alice".to_string());
    assert_eq!(outcome, JoinOutcome::Seated { is_host: true });
    assert_eq!(room.host_user_id.as_deref(), Some("u1"));

    let (outcome, _) = room.join("u2".to_string(), "bob".to_string());
    assert_eq!(outcome, JoinOutcome::Seated { is_host: false });
}

#[test]
fn join_during_playing_is_queued() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    room.start_game("u1").unwrap();

    let (outcome, events) = room.join("u3".to_string(), "carol".to_string());
    assert_eq!(outcome, JoinOutcome::Queued);
    assert_eq!(room.waiting_list.len(), 1);
    assert!(events.iter().any(|e| matches!(
        e,
        RoomEvent::Private { frame, .. } if frame.msg_type == "waiting_for_game"
    )));
}

#[test]
fn room_is_full_past_max_players() {
    let mut room = Room::new("room".to_string(), 2, Some(1));
    join(&mut room, "u1", "a");
    join(&mut room, "u2", "b");
    let (outcome, _) = room.join("u3".to_string(), "c".to_string());
    assert_eq!(outcome, JoinOutcome::Queued);
}

#[test]
fn start_game_requires_host() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    assert_eq!(
        room.start_game("u2"),
        Err(RoomError::AuthorizationOrTurn(
            "only the host can start the game".to_string()
        ))
    );
}

#[test]
fn start_game_requires_two_players() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    assert_eq!(
        room.start_game("u1"),
        Err(RoomError::Validation(
            "need at least 2 players to start".to_string()
        ))
    );
}

#[test]
fn call_hand_out_of_turn_is_rejected() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    room.start_game("u1").unwrap();
    let not_on_turn = if room.current_turn.as_deref() == Some("u1") {
        "u2"
    } else {
        "u1"
    };
    assert!(matches!(
        room.call_hand(not_on_turn, "pair of kings"),
        Err(RoomError::AuthorizationOrTurn(_))
    ));
}

#[test]
fn call_hand_must_strictly_exceed_current_call() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    room.start_game("u1").unwrap();
    room.round_starting_user = Some("u1".to_string());
    room.current_turn = Some("u1".to_string());

    room.call_hand("u1", "pair of kings").unwrap();
    room.current_turn = Some("u2".to_string());
    // S3: an equal call is rejected, a strictly greater one is accepted.
    assert_eq!(
        room.call_hand("u2", "pair of kings"),
        Err(RoomError::Ordering(
            "call must strictly exceed the current call".to_string()
        ))
    );
    assert!(room.call_hand("u2", "pair of aces").is_ok());
}

#[test]
fn royal_flush_can_only_be_bluffed() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    room.start_game("u1").unwrap();
    room.round_starting_user = Some("u1".to_string());
    room.current_turn = Some("u1".to_string());

    room.call_hand("u1", "royal flush hearts").unwrap();
    room.current_turn = Some("u2".to_string());
    assert_eq!(
        room.call_hand("u2", "four of a kind aces"),
        Err(RoomError::Ordering(
            "a royal flush can only be bluffed, never raised".to_string()
        ))
    );
    assert_eq!(
        room.call_hand("u2", "royal flush spades"),
        Err(RoomError::Ordering(
            "call must strictly exceed the current call".to_string()
        ))
    );
}

#[test]
fn call_bluff_without_a_prior_call_is_rejected() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    room.start_game("u1").unwrap();
    room.current_turn = Some("u1".to_string());
    assert_eq!(
        room.call_bluff("u1"),
        Err(RoomError::Ordering("no call to bluff".to_string()))
    );
}

#[test]
fn host_leaving_during_waiting_reassigns_host_at_random() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    join(&mut room, "u3", "carol");
    let events = room.leave("u1");
    assert_ne!(room.host_user_id.as_deref(), Some("u1"));
    assert!(room.host_user_id.is_some());
    assert!(events
        .iter()
        .any(|e| matches!(e, RoomEvent::Broadcast(f) if f.msg_type == "host_changed")));
}

#[test]
fn kick_requires_host() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    assert_eq!(
        room.kick("u2", "alice"),
        Err(RoomError::AuthorizationOrTurn(
            "only the host can kick".to_string()
        ))
    );
}

#[test]
fn kick_unknown_user_is_a_validation_error() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    assert_eq!(
        room.kick("u1", "ghost"),
        Err(RoomError::Validation("no such user: ghost".to_string()))
    );
}

#[test]
fn kick_notifies_target_and_removes_them() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    let events = room.kick("u1", "bob").unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        RoomEvent::Private { user_id, frame } if user_id == "u2" && frame.msg_type == "user_kicked"
    )));
    assert!(!room.seated.iter().any(|p| p.user_id == "u2"));
}

#[test]
fn departure_down_to_one_player_ends_the_game() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    room.start_game("u1").unwrap();
    let events = room.leave("u1");
    assert!(events
        .iter()
        .any(|e| matches!(e, RoomEvent::GameEnded { winner_id, .. } if winner_id == "u2")));
    assert_eq!(room.phase, Phase::Waiting);
}

#[test]
fn elimination_at_five_losses_removes_from_active_seating() {
    use bluffhouse_types::{Card, Suit};

    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    join(&mut room, "u3", "carol");
    room.start_game("u1").unwrap();

    for _ in 0..5 {
        room.round_starting_user = Some("u1".to_string());
        room.current_turn = Some("u1".to_string());
        for player in room.seated.iter_mut() {
            player.private_hand = if player.user_id == "u1" {
                vec![Card::new(Suit::Hearts, 13)]
            } else {
                vec![Card::new(Suit::Clubs, 4)]
            };
        }
        // Only one king in the union: "pair of kings" does not hold, so the
        // caller (u1, not the accuser) takes the loss.
        room.call_hand("u1", "pair of kings").unwrap();
        let accuser = room.current_turn.clone().unwrap();
        room.call_bluff(&accuser).unwrap();
    }

    let alice = room.eliminated.iter().find(|p| p.user_id == "u1");
    assert!(alice.is_some());
    assert!(alice.unwrap().is_eliminated);
    assert!(!room.seated.iter().any(|p| p.user_id == "u1"));
}

#[test]
fn call_bluff_does_not_panic_when_the_loser_already_left() {
    use bluffhouse_types::{Card, Suit};

    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    join(&mut room, "u3", "carol");
    room.start_game("u1").unwrap();

    room.round_starting_user = Some("u1".to_string());
    room.current_turn = Some("u1".to_string());
    for player in room.seated.iter_mut() {
        player.private_hand = vec![Card::new(Suit::Clubs, 4)];
    }
    // No kings in anyone's hand, so "pair of kings" is a bluff once called.
    room.call_hand("u1", "pair of kings").unwrap();
    let accuser = room.current_turn.clone().unwrap();
    assert_ne!(accuser, "u1");

    // u1 (the caller) leaves before the bluff is called on them.
    room.leave("u1");
    assert!(!room.seated.iter().any(|p| p.user_id == "u1"));

    // Resolves the departed caller as the nominal loser without panicking
    // or poisoning any lock, and the room keeps playing.
    let events = room.call_bluff(&accuser).unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, RoomEvent::Broadcast(f) if f.msg_type == "call_bluff")));
    assert_eq!(room.phase, Phase::Playing);
    assert_eq!(room.seated.len(), 2);
}

#[test]
fn private_hand_never_leaves_in_a_broadcast_event() {
    let mut room = new_room();
    join(&mut room, "u1", "alice");
    join(&mut room, "u2", "bob");
    let events = room.start_game("u1").unwrap();
    for event in &events {
        if let RoomEvent::Broadcast(frame) = event {
            let text = serde_json::to_string(&frame.data).unwrap();
            assert!(!text.contains("your_cards"));
        }
    }
}
