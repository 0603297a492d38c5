//! Тесты ядра движка: добор и перетасовка, «Draw!»-проверки,
//! дистанции, старт игры и условия победы.

mod common;

use bang_engine::api::Outbox;
use bang_engine::domain::{Card, CardKey, CharacterId, Rank, Role, Suit, Winner};
use bang_engine::engine::dealing::{draw_card, draw_check, DrawCheckKind};
use bang_engine::engine::distance::{effective_distance, seat_distance, weapon_range};
use bang_engine::engine::turn::{check_game_over, start_game};
use bang_engine::engine::{EngineError, TURN_MS};
use common::{equip, make_room, set_character, suited, NoShuffleRng, NOW};

#[test]
fn empty_deck_recycles_the_discard() {
    let mut room = make_room(4);
    let mut rng = NoShuffleRng;

    room.deck.clear();
    room.discard = vec![
        suited(900, CardKey::Beer, Suit::Clubs, Rank::Two),
        suited(901, CardKey::Bang, Suit::Hearts, Rank::Three),
    ];

    let card = draw_card(&mut room, &mut rng).unwrap();
    // Верх сброса становится верхом новой колоды.
    assert_eq!(card.id, 901);
    assert!(room.discard.is_empty());
    assert_eq!(room.deck.len(), 1);
}

#[test]
fn draw_fails_only_when_everything_is_empty() {
    let mut room = make_room(4);
    let mut rng = NoShuffleRng;
    room.deck.clear();
    room.discard.clear();
    assert_eq!(draw_card(&mut room, &mut rng), Err(EngineError::OutOfCards));
}

#[test]
fn drawn_cards_get_suit_and_rank() {
    let mut room = make_room(4);
    let mut rng = NoShuffleRng;
    let card = draw_card(&mut room, &mut rng).unwrap();
    assert!(card.suit.is_some());
    assert!(card.rank.is_some());
}

#[test]
fn draw_check_discards_what_it_draws() {
    let mut room = make_room(4);
    let mut rng = NoShuffleRng;
    room.deck
        .push(suited(900, CardKey::Beer, Suit::Hearts, Rank::Five));

    let outcome = draw_check(&mut room, 2, DrawCheckKind::Barrel, &mut rng).unwrap();
    assert!(outcome.success(DrawCheckKind::Barrel));
    assert_eq!(outcome.drawn.len(), 1);
    assert_eq!(room.discard.last().unwrap().id, 900);
}

#[test]
fn lucky_duke_takes_the_better_of_two() {
    let mut room = make_room(4);
    set_character(&mut room, 2, CharacterId::LuckyDuke);
    let mut rng = NoShuffleRng;

    // Первая вытянутая — пики, вторая — червы: Lucky Duke берёт червы.
    room.deck
        .push(suited(901, CardKey::Beer, Suit::Hearts, Rank::Five));
    room.deck
        .push(suited(900, CardKey::Beer, Suit::Spades, Rank::Five));

    let outcome = draw_check(&mut room, 2, DrawCheckKind::Barrel, &mut rng).unwrap();
    assert_eq!(outcome.drawn.len(), 2);
    assert_eq!(outcome.chosen.id, 901);
    assert!(outcome.success(DrawCheckKind::Barrel));
}

#[test]
fn lucky_duke_dodges_dynamite_when_possible() {
    let mut room = make_room(4);
    set_character(&mut room, 2, CharacterId::LuckyDuke);
    let mut rng = NoShuffleRng;

    room.deck
        .push(suited(901, CardKey::Beer, Suit::Spades, Rank::Ten));
    room.deck
        .push(suited(900, CardKey::Beer, Suit::Spades, Rank::Five));

    let outcome = draw_check(&mut room, 2, DrawCheckKind::Dynamite, &mut rng).unwrap();
    assert_eq!(outcome.chosen.id, 901);
    assert!(outcome.success(DrawCheckKind::Dynamite));
}

#[test]
fn seat_distance_is_circular_and_skips_dead() {
    let mut room = make_room(5);
    // 1 и 3 сидят через одного: 2 по часовой, 3 против.
    assert_eq!(seat_distance(&room, 1, 3), Some(2));
    assert_eq!(seat_distance(&room, 1, 4), Some(2));
    assert_eq!(seat_distance(&room, 1, 2), Some(1));
    assert_eq!(seat_distance(&room, 1, 1), Some(0));

    // Мёртвый сосед выпадает из круга.
    room.player_mut(2).unwrap().is_alive = false;
    assert_eq!(seat_distance(&room, 1, 3), Some(1));
    // До мёртвого дистанции нет.
    assert_eq!(seat_distance(&room, 1, 2), None);
}

#[test]
fn distance_modifiers_stack_with_floor_of_one() {
    let mut room = make_room(4);
    assert_eq!(effective_distance(&room, 1, 2), Some(1));

    // Мустанг цели отодвигает её.
    equip(&mut room, 2, 900, CardKey::Mustang);
    assert_eq!(effective_distance(&room, 1, 2), Some(2));

    // Прицел атакующего компенсирует.
    equip(&mut room, 1, 901, CardKey::Scope);
    assert_eq!(effective_distance(&room, 1, 2), Some(1));

    // Ниже единицы не бывает.
    room.player_mut(2).unwrap().take_equipment(CardKey::Mustang);
    assert_eq!(effective_distance(&room, 1, 2), Some(1));
}

#[test]
fn character_distance_bonuses_apply() {
    let mut room = make_room(4);
    set_character(&mut room, 2, CharacterId::PaulRegret);
    assert_eq!(effective_distance(&room, 1, 2), Some(2));

    set_character(&mut room, 1, CharacterId::RoseDoolan);
    assert_eq!(effective_distance(&room, 1, 2), Some(1));
}

#[test]
fn weapon_extends_bang_reach() {
    let mut room = make_room(5);
    // Без оружия дальность 1: через одного не достать.
    let distance = effective_distance(&room, 1, 3).unwrap();
    assert_eq!(weapon_range(room.player(1).unwrap()), 1);
    assert!(distance > weapon_range(room.player(1).unwrap()));

    let mut schofield = Card::weapon(900, bang_engine::domain::WeaponKind::Schofield);
    schofield.suit = Some(Suit::Clubs);
    room.player_mut(1).unwrap().equipment.push(schofield);
    assert_eq!(weapon_range(room.player(1).unwrap()), 2);
    assert!(distance <= weapon_range(room.player(1).unwrap()));
}

#[test]
fn start_game_deals_roles_characters_and_hands() {
    let mut room = make_room(4);
    room.started = false;
    room.deck.clear();
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();
    let mut next_id = 1000u64;

    start_game(
        &mut room,
        NOW,
        || {
            let id = next_id;
            next_id += 1;
            id
        },
        &mut rng,
        &mut out,
    )
    .unwrap();

    assert!(room.started);
    // Шериф ходит первым.
    let sheriff = room.current_player().unwrap();
    assert_eq!(sheriff.role, Role::Sheriff);
    assert_eq!(room.turn_ends_at, NOW + TURN_MS);

    // Стартовая рука равна здоровью; ходящий уже добрал две.
    // Шериф живучее базы своего персонажа на единицу.
    for p in &room.players {
        assert_eq!(p.hp, p.max_hp);
        let bonus = u8::from(p.role == Role::Sheriff);
        assert_eq!(p.max_hp, p.spec().max_hp + bonus);
        let expected = if p.role == Role::Sheriff {
            p.max_hp as usize + 2
        } else {
            p.max_hp as usize
        };
        assert_eq!(p.hand.len(), expected, "{}", p.name);
    }

    // Персонажи не повторяются.
    let mut chars: Vec<_> = room.players.iter().map(|p| p.character).collect();
    chars.sort_by_key(|c| format!("{c}"));
    chars.dedup();
    assert_eq!(chars.len(), 4);

    // Все 80 карт на месте.
    assert_eq!(room.total_card_count(), 80);
}

#[test]
fn start_game_rejects_wrong_player_count() {
    let mut room = make_room(4);
    room.started = false;
    room.players.truncate(3);
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();

    let err = start_game(&mut room, NOW, || 0, &mut rng, &mut out).unwrap_err();
    assert_eq!(err, EngineError::UnsupportedPlayerCount(3));
    assert!(!room.started);
}

#[test]
fn sheriff_side_wins_when_threats_are_gone() {
    let mut room = make_room(5);
    let mut out = Outbox::new();
    for p in room.players.iter_mut() {
        if matches!(p.role, Role::Outlaw | Role::Renegade) {
            p.is_alive = false;
        }
    }
    assert!(check_game_over(&mut room, &mut out));
    assert!(room.ended);
    assert!(out
        .events()
        .iter()
        .any(|e| matches!(e.event, bang_engine::api::Event::GameOver { winner: Winner::Sheriff })));
}

#[test]
fn renegade_wins_only_as_sole_survivor() {
    let mut room = make_room(4);
    let mut out = Outbox::new();
    // Живы только шериф и ренегат, шериф умирает последним.
    for p in room.players.iter_mut() {
        p.is_alive = matches!(p.role, Role::Renegade);
    }
    assert!(check_game_over(&mut room, &mut out));
    assert!(out
        .events()
        .iter()
        .any(|e| matches!(e.event, bang_engine::api::Event::GameOver { winner: Winner::Renegade })));
}

#[test]
fn outlaws_win_if_sheriff_dies_with_others_alive() {
    let mut room = make_room(4);
    let mut out = Outbox::new();
    room.players
        .iter_mut()
        .find(|p| p.role == Role::Sheriff)
        .unwrap()
        .is_alive = false;
    assert!(check_game_over(&mut room, &mut out));
    assert!(out
        .events()
        .iter()
        .any(|e| matches!(e.event, bang_engine::api::Event::GameOver { winner: Winner::Outlaws })));
}

#[test]
fn game_continues_while_both_sides_stand() {
    let mut room = make_room(4);
    let mut out = Outbox::new();
    assert!(!check_game_over(&mut room, &mut out));
    assert!(!room.ended);
    assert!(out.is_empty());
}
