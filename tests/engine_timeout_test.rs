//! Тесты планировщика: просроченные ходы и под-действия.

mod common;

use bang_engine::api::Outbox;
use bang_engine::domain::{CardKey, CharacterId, Pending, Room};
use bang_engine::engine::actions::handle_play_card;
use bang_engine::engine::respond::handle_end_turn;
use bang_engine::engine::scheduler::tick;
use bang_engine::engine::turn::start_turn;
use bang_engine::engine::{RoomRegistry, RESPONSE_MS, TURN_MS};
use common::{give, hand_len, hp_of, make_room, set_character, NoShuffleRng, NOW};

/// Реестр с одной комнатой под кодом "T".
fn registry_with(room: Room) -> RoomRegistry {
    let mut registry = RoomRegistry::new();
    registry.create("T".to_string()).expect("код свободен");
    *registry.get_mut("T").expect("комната только что создана") = room;
    registry
}

#[test]
fn tick_before_any_deadline_changes_nothing() {
    let mut registry = registry_with(make_room(4));
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();

    tick(&mut registry, NOW + 1, &mut rng, &mut out);
    assert!(out.is_empty());
    assert_eq!(registry.get("T").unwrap().current_player_id(), Some(1));
}

#[test]
fn silent_bang_target_takes_the_hit() {
    let mut room = make_room(4);
    give(&mut room, 1, 500, CardKey::Bang);
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();
    handle_play_card(&mut room, 1, 500, Some(2), NOW, &mut rng, &mut out).unwrap();
    let deadline = room.pending_ends_at;
    let mut registry = registry_with(room);

    tick(&mut registry, deadline, &mut rng, &mut out);

    let room = registry.get("T").unwrap();
    assert!(room.pending.is_none());
    assert_eq!(hp_of(room, 2), 3);
    assert!(!out.is_empty());
}

#[test]
fn silent_duel_responder_loses() {
    let mut room = make_room(4);
    give(&mut room, 1, 500, CardKey::Duel);
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();
    handle_play_card(&mut room, 1, 500, Some(3), NOW, &mut rng, &mut out).unwrap();
    let mut registry = registry_with(room);

    tick(&mut registry, NOW + RESPONSE_MS, &mut rng, &mut out);

    let room = registry.get("T").unwrap();
    assert!(room.pending.is_none());
    assert_eq!(hp_of(room, 3), 3);
    assert_eq!(hp_of(room, 1), 4);
}

#[test]
fn silent_indians_queue_keeps_moving() {
    let mut room = make_room(4);
    give(&mut room, 1, 500, CardKey::Indians);
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();
    handle_play_card(&mut room, 1, 500, None, NOW, &mut rng, &mut out).unwrap();
    let mut registry = registry_with(room);

    // Каждый тик снимает одного молчуна.
    tick(&mut registry, NOW + RESPONSE_MS, &mut rng, &mut out);
    {
        let room = registry.get("T").unwrap();
        assert_eq!(hp_of(room, 2), 3);
        assert!(matches!(room.pending, Some(Pending::Indians { idx: 1, .. })));
    }

    tick(&mut registry, NOW + 2 * RESPONSE_MS, &mut rng, &mut out);
    tick(&mut registry, NOW + 3 * RESPONSE_MS, &mut rng, &mut out);
    let room = registry.get("T").unwrap();
    assert_eq!(hp_of(room, 3), 3);
    assert_eq!(hp_of(room, 4), 3);
    assert!(room.pending.is_none());
}

#[test]
fn silent_draw_choice_is_made_automatically() {
    let mut room = make_room(4);
    set_character(&mut room, 1, CharacterId::KitCarlson);
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();
    start_turn(&mut room, NOW, &mut rng, &mut out).unwrap();
    let first_two: Vec<u64> = match &room.pending {
        Some(Pending::DrawChoice { offered, .. }) => {
            offered.iter().take(2).map(|c| c.id).collect()
        }
        other => panic!("ожидали DrawChoice, получили {other:?}"),
    };
    let mut registry = registry_with(room);

    tick(&mut registry, NOW + RESPONSE_MS, &mut rng, &mut out);

    let room = registry.get("T").unwrap();
    assert!(room.pending.is_none());
    assert_eq!(hand_len(room, 1), 2);
    for id in first_two {
        assert!(room.player(1).unwrap().hand.iter().any(|c| c.id == id));
    }
}

#[test]
fn silent_steal_choice_falls_back_to_the_deck() {
    let mut room = make_room(4);
    set_character(&mut room, 1, CharacterId::JesseJones);
    give(&mut room, 2, 500, CardKey::Beer);
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();
    start_turn(&mut room, NOW, &mut rng, &mut out).unwrap();
    assert!(matches!(room.pending, Some(Pending::StealChoice { .. })));
    let mut registry = registry_with(room);

    tick(&mut registry, NOW + RESPONSE_MS, &mut rng, &mut out);

    let room = registry.get("T").unwrap();
    assert!(room.pending.is_none());
    assert_eq!(hand_len(room, 1), 2);
    // Чужая рука не тронута.
    assert_eq!(hand_len(room, 2), 1);
}

#[test]
fn expired_turn_discards_excess_and_moves_on() {
    let mut room = make_room(4);
    room.player_mut(1).unwrap().hp = 2;
    for id in 500..504 {
        give(&mut room, 1, id, CardKey::Beer);
    }
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();
    let mut registry = registry_with(room);

    tick(&mut registry, NOW + TURN_MS, &mut rng, &mut out);

    let room = registry.get("T").unwrap();
    // Лишние карты сброшены принудительно, ход ушёл дальше.
    assert_eq!(hand_len(room, 1), 2);
    assert_eq!(room.current_player_id(), Some(2));
}

#[test]
fn expired_discard_limit_is_resolved_randomly() {
    let mut room = make_room(4);
    room.player_mut(1).unwrap().hp = 2;
    for id in 500..505 {
        give(&mut room, 1, id, CardKey::Beer);
    }
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();
    handle_end_turn(&mut room, 1, NOW, &mut rng, &mut out).unwrap();
    assert!(matches!(room.pending, Some(Pending::DiscardLimit { .. })));
    let deadline = room.pending_ends_at;
    let mut registry = registry_with(room);

    tick(&mut registry, deadline, &mut rng, &mut out);

    let room = registry.get("T").unwrap();
    assert_eq!(hand_len(room, 1), 2);
    assert_eq!(room.current_player_id(), Some(2));
}

#[test]
fn finished_rooms_are_left_alone() {
    let mut room = make_room(4);
    room.ended = true;
    room.turn_ends_at = 0;
    let mut registry = registry_with(room);
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();

    tick(&mut registry, NOW + TURN_MS, &mut rng, &mut out);
    assert!(out.is_empty());
}
