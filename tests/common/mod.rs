//! Общие помощники интеграционных тестов: комнаты с фиксированной
//! рассадкой и RNG без случайности.

#![allow(dead_code)]

use bang_engine::domain::{
    build_standard_deck, Card, CardId, CardKey, CharacterId, Phase, Player, PlayerId, Rank, Role,
    Room, Suit,
};
use bang_engine::engine::{RandomSource, TURN_MS};

/// Базовое «сейчас» всех тестов.
pub const NOW: u64 = 1_000_000;

/// RNG без случайности: перетасовки ничего не делают, индекс всегда 0.
/// Позволяет управлять исходами, подкладывая карты на верх колоды.
pub struct NoShuffleRng;

impl RandomSource for NoShuffleRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}

    fn pick_index(&mut self, _len: usize) -> usize {
        0
    }
}

/// Комната с `n` игроками (id 1..=n), игра уже идёт, ходит игрок 1
/// (шериф). Персонаж у всех Sid Ketchum: его способность срабатывает
/// только по явной команде и не мешает остальным проверкам.
pub fn make_room(n: usize) -> Room {
    let roles = bang_engine::domain::roles_for(n).expect("поддерживаемое число игроков");
    let mut room = Room::new("T".to_string());
    for i in 0..n {
        room.players.push(Player::new(
            (i + 1) as PlayerId,
            format!("p{}", i + 1),
            roles[i],
            CharacterId::SidKetchum,
        ));
    }
    let mut next_id = 0u64;
    room.deck = build_standard_deck(|| {
        let id = next_id;
        next_id += 1;
        id
    });
    room.started = true;
    room.turn_index = 0;
    room.turn_ends_at = NOW + TURN_MS;
    room
}

/// Положить игроку карту в руку.
pub fn give(room: &mut Room, pid: PlayerId, id: CardId, key: CardKey) -> CardId {
    room.player_mut(pid)
        .expect("игрок есть в комнате")
        .hand
        .push(Card::new(id, key));
    id
}

/// Положить игроку карту в снаряжение.
pub fn equip(room: &mut Room, pid: PlayerId, id: CardId, key: CardKey) {
    room.player_mut(pid)
        .expect("игрок есть в комнате")
        .equipment
        .push(Card::new(id, key));
}

/// Карта с заданной мастью и рангом — для управления «Draw!»-проверками.
pub fn suited(id: CardId, key: CardKey, suit: Suit, rank: Rank) -> Card {
    let mut card = Card::new(id, key);
    card.suit = Some(suit);
    card.rank = Some(rank);
    card
}

/// Сменить персонажа игрока, сохранив полные HP нового персонажа.
pub fn set_character(room: &mut Room, pid: PlayerId, character: CharacterId) {
    let p = room.player_mut(pid).expect("игрок есть в комнате");
    p.character = character;
    p.max_hp = character.spec().max_hp;
    p.hp = p.max_hp;
}

pub fn hp_of(room: &Room, pid: PlayerId) -> u8 {
    room.player(pid).expect("игрок есть в комнате").hp
}

pub fn hand_len(room: &Room, pid: PlayerId) -> usize {
    room.player(pid).expect("игрок есть в комнате").hand.len()
}

pub fn assert_main_phase(room: &Room) {
    assert_eq!(room.phase, Phase::Main);
    assert!(room.pending.is_none());
}

pub fn role_of(room: &Room, pid: PlayerId) -> Role {
    room.player(pid).expect("игрок есть в комнате").role
}
