//! Тесты разыгрывания карт: ограничения, цели, снаряжение, экономика.

mod common;

use bang_engine::api::Outbox;
use bang_engine::domain::{Card, CardKey, CharacterId, Pending, Phase, Rank, Suit, WeaponKind};
use bang_engine::engine::actions::handle_play_card;
use bang_engine::engine::{EngineError, RESPONSE_MS};
use common::{
    assert_main_phase, equip, give, hand_len, hp_of, make_room, set_character, suited,
    NoShuffleRng, NOW,
};

fn play(
    room: &mut bang_engine::domain::Room,
    pid: u64,
    card: u64,
    target: Option<u64>,
) -> Result<(), EngineError> {
    let mut rng = NoShuffleRng;
    let mut out = Outbox::new();
    handle_play_card(room, pid, card, target, NOW, &mut rng, &mut out)
}

#[test]
fn bang_opens_pending_and_counts_toward_limit() {
    let mut room = make_room(4);
    give(&mut room, 1, 500, CardKey::Bang);

    play(&mut room, 1, 500, Some(2)).unwrap();

    assert_eq!(room.phase, Phase::Waiting);
    assert_eq!(room.bangs_used_this_turn, 1);
    assert_eq!(room.pending_ends_at, NOW + RESPONSE_MS);
    match &room.pending {
        Some(Pending::Bang {
            attacker_id,
            target_id,
            required_missed,
            missed_so_far,
        }) => {
            assert_eq!((*attacker_id, *target_id), (1, 2));
            assert_eq!((*required_missed, *missed_so_far), (1, 0));
        }
        other => panic!("ожидали Bang, получили {other:?}"),
    }
    // Сама карта уже в сбросе.
    assert_eq!(room.discard.last().unwrap().id, 500);
    assert_eq!(hand_len(&room, 1), 0);
}

#[test]
fn second_bang_per_turn_is_rejected() {
    let mut room = make_room(4);
    room.bangs_used_this_turn = 1;
    give(&mut room, 1, 500, CardKey::Bang);

    let err = play(&mut room, 1, 500, Some(2)).unwrap_err();
    assert_eq!(err, EngineError::BangLimitReached(1));
    // Карта вернулась в руку.
    assert_eq!(hand_len(&room, 1), 1);
}

#[test]
fn volcanic_and_willy_ignore_the_bang_limit() {
    let mut room = make_room(4);
    room.bangs_used_this_turn = 1;
    let mut volcanic = Card::weapon(900, WeaponKind::Volcanic);
    volcanic.suit = Some(Suit::Clubs);
    room.player_mut(1).unwrap().equipment.push(volcanic);
    give(&mut room, 1, 500, CardKey::Bang);
    play(&mut room, 1, 500, Some(2)).unwrap();

    let mut room = make_room(4);
    room.bangs_used_this_turn = 3;
    set_character(&mut room, 1, CharacterId::WillyTheKid);
    give(&mut room, 1, 501, CardKey::Bang);
    play(&mut room, 1, 501, Some(2)).unwrap();
}

#[test]
fn bang_respects_range() {
    let mut room = make_room(5);
    give(&mut room, 1, 500, CardKey::Bang);

    // Через одного без оружия не достать.
    let err = play(&mut room, 1, 500, Some(3)).unwrap_err();
    assert_eq!(err, EngineError::TargetOutOfRange { distance: 2, range: 1 });
    assert_eq!(hand_len(&room, 1), 1);
    assert_main_phase(&room);
}

#[test]
fn bang_needs_a_live_other_target() {
    let mut room = make_room(4);
    give(&mut room, 1, 500, CardKey::Bang);
    assert_eq!(play(&mut room, 1, 500, None).unwrap_err(), EngineError::MissingTarget);
    assert_eq!(
        play(&mut room, 1, 500, Some(1)).unwrap_err(),
        EngineError::SelfTargetForbidden
    );

    room.player_mut(2).unwrap().is_alive = false;
    assert_eq!(
        play(&mut room, 1, 500, Some(2)).unwrap_err(),
        EngineError::InvalidTarget
    );
    assert_eq!(hand_len(&room, 1), 1);
}

#[test]
fn barrel_can_dodge_a_single_bang() {
    let mut room = make_room(4);
    equip(&mut room, 2, 900, CardKey::Barrel);
    give(&mut room, 1, 500, CardKey::Bang);
    // Проверка бочки вытянет червы.
    room.deck
        .push(suited(901, CardKey::Beer, Suit::Hearts, Rank::Five));

    play(&mut room, 1, 500, Some(2)).unwrap();

    // Увернулся без карты: никакого pending, урона нет.
    assert_main_phase(&room);
    assert_eq!(hp_of(&room, 2), 4);
    assert_eq!(room.bangs_used_this_turn, 1);
}

#[test]
fn failed_barrel_check_still_requires_missed() {
    let mut room = make_room(4);
    equip(&mut room, 2, 900, CardKey::Barrel);
    give(&mut room, 1, 500, CardKey::Bang);
    room.deck
        .push(suited(901, CardKey::Beer, Suit::Clubs, Rank::Five));

    play(&mut room, 1, 500, Some(2)).unwrap();
    assert!(matches!(room.pending, Some(Pending::Bang { .. })));
}

#[test]
fn missed_cannot_be_played_proactively() {
    let mut room = make_room(4);
    give(&mut room, 1, 500, CardKey::Missed);
    let err = play(&mut room, 1, 500, None).unwrap_err();
    assert_eq!(err, EngineError::ResponseCardOnly);
    assert_eq!(hand_len(&room, 1), 1);
}

#[test]
fn calamity_plays_missed_as_bang() {
    let mut room = make_room(4);
    set_character(&mut room, 1, CharacterId::CalamityJanet);
    give(&mut room, 1, 500, CardKey::Missed);
    play(&mut room, 1, 500, Some(2)).unwrap();
    assert!(matches!(room.pending, Some(Pending::Bang { .. })));
}

#[test]
fn beer_heals_one_up_to_max() {
    let mut room = make_room(4);
    room.player_mut(1).unwrap().hp = 2;
    give(&mut room, 1, 500, CardKey::Beer);
    play(&mut room, 1, 500, None).unwrap();
    assert_eq!(hp_of(&room, 1), 3);

    give(&mut room, 1, 501, CardKey::Beer);
    room.player_mut(1).unwrap().hp = 4;
    assert_eq!(play(&mut room, 1, 501, None).unwrap_err(), EngineError::AlreadyFullHp);
}

#[test]
fn beer_is_dead_water_for_the_last_two() {
    let mut room = make_room(4);
    room.player_mut(3).unwrap().is_alive = false;
    room.player_mut(4).unwrap().is_alive = false;
    room.player_mut(1).unwrap().hp = 1;
    give(&mut room, 1, 500, CardKey::Beer);

    let err = play(&mut room, 1, 500, None).unwrap_err();
    assert_eq!(err, EngineError::BeerWithTwoPlayers);
    assert_eq!(hp_of(&room, 1), 1);
}

#[test]
fn saloon_heals_every_living_player() {
    let mut room = make_room(4);
    for p in room.players.iter_mut() {
        p.hp = 2;
    }
    room.player_mut(4).unwrap().is_alive = false;
    give(&mut room, 1, 500, CardKey::Saloon);

    play(&mut room, 1, 500, None).unwrap();
    assert_eq!(hp_of(&room, 1), 3);
    assert_eq!(hp_of(&room, 2), 3);
    assert_eq!(hp_of(&room, 3), 3);
    // Мёртвых салун не поднимает.
    assert_eq!(hp_of(&room, 4), 2);
}

#[test]
fn stagecoach_and_wells_fargo_draw_cards() {
    let mut room = make_room(4);
    give(&mut room, 1, 500, CardKey::Stagecoach);
    play(&mut room, 1, 500, None).unwrap();
    assert_eq!(hand_len(&room, 1), 2);

    give(&mut room, 1, 501, CardKey::WellsFargo);
    play(&mut room, 1, 501, None).unwrap();
    assert_eq!(hand_len(&room, 1), 5);
}

#[test]
fn panic_steals_only_at_distance_one() {
    let mut room = make_room(5);
    give(&mut room, 1, 500, CardKey::Panic);
    give(&mut room, 3, 501, CardKey::Beer);

    let err = play(&mut room, 1, 500, Some(3)).unwrap_err();
    assert_eq!(err, EngineError::TargetOutOfRange { distance: 2, range: 1 });

    give(&mut room, 2, 502, CardKey::Beer);
    play(&mut room, 1, 500, Some(2)).unwrap();
    assert_eq!(hand_len(&room, 2), 0);
    // Украденная карта в руке, сам «Паника!» в сбросе.
    assert_eq!(hand_len(&room, 1), 1);
    assert_eq!(room.player(1).unwrap().hand[0].id, 502);
}

#[test]
fn cat_balou_discards_from_any_distance() {
    let mut room = make_room(5);
    give(&mut room, 1, 500, CardKey::CatBalou);
    give(&mut room, 3, 501, CardKey::Beer);

    play(&mut room, 1, 500, Some(3)).unwrap();
    assert_eq!(hand_len(&room, 3), 0);
    assert!(room.discard.iter().any(|c| c.id == 501));
}

#[test]
fn cat_balou_needs_a_target_with_cards() {
    let mut room = make_room(4);
    give(&mut room, 1, 500, CardKey::CatBalou);
    let err = play(&mut room, 1, 500, Some(2)).unwrap_err();
    assert_eq!(err, EngineError::InvalidTarget);
    assert_eq!(hand_len(&room, 1), 1);
}

#[test]
fn repeated_status_replaces_the_old_copy() {
    let mut room = make_room(4);
    equip(&mut room, 1, 900, CardKey::Barrel);
    give(&mut room, 1, 500, CardKey::Barrel);

    play(&mut room, 1, 500, None).unwrap();
    // Старая бочка ушла в сброс, новая заняла её место.
    let barrels: Vec<_> = room
        .player(1)
        .unwrap()
        .equipment
        .iter()
        .filter(|c| c.key == CardKey::Barrel)
        .collect();
    assert_eq!(barrels.len(), 1);
    assert_eq!(barrels[0].id, 500);
    assert!(room.discard.iter().any(|c| c.id == 900));
}

#[test]
fn second_dynamite_is_rejected() {
    let mut room = make_room(4);
    equip(&mut room, 1, 900, CardKey::Dynamite);
    give(&mut room, 1, 500, CardKey::Dynamite);

    let err = play(&mut room, 1, 500, None).unwrap_err();
    assert_eq!(err, EngineError::DuplicateEquipment(CardKey::Dynamite));
    assert_eq!(hand_len(&room, 1), 1);
}

#[test]
fn new_weapon_replaces_the_old_one() {
    let mut room = make_room(4);
    let mut old = Card::weapon(900, WeaponKind::Schofield);
    old.suit = Some(Suit::Clubs);
    room.player_mut(1).unwrap().equipment.push(old);

    room.player_mut(1)
        .unwrap()
        .hand
        .push(Card::weapon(500, WeaponKind::Winchester));
    play(&mut room, 1, 500, None).unwrap();

    let weapon = room.player(1).unwrap().weapon().unwrap();
    assert_eq!(weapon.weapon, Some(WeaponKind::Winchester));
    assert!(room.discard.iter().any(|c| c.id == 900));
}

#[test]
fn jail_goes_on_others_but_never_the_sheriff() {
    let mut room = make_room(4);
    // Ходит игрок 2 (бандит), пытается посадить шерифа.
    room.turn_index = 1;
    give(&mut room, 2, 500, CardKey::Jail);
    let err = play(&mut room, 2, 500, Some(1)).unwrap_err();
    assert_eq!(err, EngineError::CannotJailSheriff);

    play(&mut room, 2, 500, Some(3)).unwrap();
    assert!(room.player(3).unwrap().has_equipment(CardKey::Jail));

    // Повторная тюрьма вытесняет первую в сброс.
    give(&mut room, 2, 501, CardKey::Jail);
    play(&mut room, 2, 501, Some(3)).unwrap();
    let jails: Vec<_> = room
        .player(3)
        .unwrap()
        .equipment
        .iter()
        .filter(|c| c.key == CardKey::Jail)
        .collect();
    assert_eq!(jails.len(), 1);
    assert_eq!(jails[0].id, 501);
    assert!(room.discard.iter().any(|c| c.id == 500));
}

#[test]
fn dynamite_sits_on_the_player_who_lit_it() {
    let mut room = make_room(4);
    give(&mut room, 1, 500, CardKey::Dynamite);
    play(&mut room, 1, 500, None).unwrap();
    assert!(room.player(1).unwrap().has_equipment(CardKey::Dynamite));
}

#[test]
fn playing_out_of_turn_or_during_pending_fails() {
    let mut room = make_room(4);
    give(&mut room, 2, 500, CardKey::Beer);
    assert_eq!(play(&mut room, 2, 500, None).unwrap_err(), EngineError::NotYourTurn);

    give(&mut room, 1, 501, CardKey::Bang);
    play(&mut room, 1, 501, Some(2)).unwrap();
    give(&mut room, 1, 502, CardKey::Beer);
    assert_eq!(
        play(&mut room, 1, 502, None).unwrap_err(),
        EngineError::PendingInProgress
    );
}

#[test]
fn unknown_card_is_reported() {
    let mut room = make_room(4);
    assert_eq!(play(&mut room, 1, 999, None).unwrap_err(), EngineError::CardNotInHand);
}

#[test]
fn suzy_refills_an_emptied_hand() {
    let mut room = make_room(4);
    set_character(&mut room, 1, CharacterId::SuzyLafayette);
    give(&mut room, 1, 500, CardKey::Beer);
    room.player_mut(1).unwrap().hp = 2;

    play(&mut room, 1, 500, None).unwrap();
    // Последняя карта ушла — Suzy сразу добрала новую.
    assert_eq!(hand_len(&room, 1), 1);
    assert_ne!(room.player(1).unwrap().hand[0].id, 500);
}

#[test]
fn card_total_is_preserved_by_plays() {
    let mut room = make_room(4);
    give(&mut room, 1, 500, CardKey::Stagecoach);
    give(&mut room, 1, 501, CardKey::Beer);
    give(&mut room, 2, 502, CardKey::Beer);
    let total = room.total_card_count();

    play(&mut room, 1, 500, None).unwrap();
    room.player_mut(1).unwrap().hp = 2;
    play(&mut room, 1, 501, None).unwrap();

    assert_eq!(room.total_card_count(), total);
}
