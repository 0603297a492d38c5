//! Deck Manager: добор, сброс, перетасовка и механика «Draw!».
//!
//! Колода и сброс принадлежат комнате; мутируем их только отсюда.

use serde::{Deserialize, Serialize};

use crate::domain::{Card, PlayerId, Room, ALL_RANKS, ALL_SUITS};
use crate::engine::errors::EngineError;
use crate::engine::RandomSource;

/// Долепить карте suit/rank, если их ещё нет. Нужны только «Draw!»-проверкам,
/// поэтому назначаются лениво, при первом прохождении через добор.
pub fn ensure_card_meta<R: RandomSource>(card: &mut Card, rng: &mut R) {
    if card.suit.is_none() {
        card.suit = Some(ALL_SUITS[rng.pick_index(ALL_SUITS.len())]);
    }
    if card.rank.is_none() {
        card.rank = Some(ALL_RANKS[rng.pick_index(ALL_RANKS.len())]);
    }
}

/// Снять верхнюю карту колоды. Пустая колода — перетасовать сброс
/// (Фишер–Йетс через RandomSource) и продолжить; пусто и там — ошибка.
pub fn draw_card<R: RandomSource>(room: &mut Room, rng: &mut R) -> Result<Card, EngineError> {
    if room.deck.is_empty() {
        if room.discard.is_empty() {
            return Err(EngineError::OutOfCards);
        }
        room.deck = std::mem::take(&mut room.discard);
        rng.shuffle(&mut room.deck);
    }

    let mut card = room
        .deck
        .pop()
        .ok_or(EngineError::Internal("колода пуста после перетасовки"))?;
    ensure_card_meta(&mut card, rng);
    Ok(card)
}

/// Необязательный добор: пассивки и бонусы не считают пустые стопки
/// ошибкой — карты просто нет.
pub fn draw_card_optional<R: RandomSource>(
    room: &mut Room,
    rng: &mut R,
) -> Result<Option<Card>, EngineError> {
    match draw_card(room, rng) {
        Ok(card) => Ok(Some(card)),
        Err(EngineError::OutOfCards) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Положить карту в сброс.
pub fn discard_card(room: &mut Room, card: Card) {
    room.discard.push(card);
}

/// Взять верхнюю карту сброса (способность Pedro Ramirez).
pub fn take_from_discard<R: RandomSource>(
    room: &mut Room,
    rng: &mut R,
) -> Result<Card, EngineError> {
    let mut card = room.discard.pop().ok_or(EngineError::DiscardEmpty)?;
    ensure_card_meta(&mut card, rng);
    Ok(card)
}

/// Какую «Draw!»-проверку делаем.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DrawCheckKind {
    /// Бочка: червы — увернулся.
    Barrel,
    /// Тюрьма: червы — освободился.
    Jail,
    /// Динамит: пики 2..9 — взрыв.
    Dynamite,
}

/// Результат «Draw!»-проверки: все вытянутые карты (для трансляции)
/// и та, по которой принято решение.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawCheckOutcome {
    pub drawn: Vec<Card>,
    pub chosen: Card,
}

impl DrawCheckOutcome {
    /// Благоприятен ли исход для владельца проверки.
    pub fn success(&self, kind: DrawCheckKind) -> bool {
        match kind {
            DrawCheckKind::Dynamite => !self.chosen.is_dynamite_explosion(),
            DrawCheckKind::Jail | DrawCheckKind::Barrel => self.chosen.is_hearts(),
        }
    }
}

/// «Draw!»: вытянуть карту и проверить предикат. Если персонаж игрока
/// тянет две (Lucky Duke), берём ту, что даёт благоприятный исход;
/// фиксированный тай-брейк — первая карта для динамита, вторая для
/// остальных. Все вытянутые карты сразу уходят в сброс.
pub fn draw_check<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    kind: DrawCheckKind,
    rng: &mut R,
) -> Result<DrawCheckOutcome, EngineError> {
    let double = room
        .player(player_id)
        .ok_or(EngineError::PlayerNotFound(player_id))?
        .spec()
        .double_draw_check;

    if !double {
        let card = draw_card(room, rng)?;
        discard_card(room, card.clone());
        return Ok(DrawCheckOutcome {
            drawn: vec![card.clone()],
            chosen: card,
        });
    }

    let c1 = draw_card(room, rng)?;
    let c2 = draw_card(room, rng)?;
    discard_card(room, c1.clone());
    discard_card(room, c2.clone());

    let pair = [c1, c2];
    let chosen = match kind {
        DrawCheckKind::Dynamite => pair
            .iter()
            .find(|c| !c.is_dynamite_explosion())
            .unwrap_or(&pair[0])
            .clone(),
        DrawCheckKind::Jail | DrawCheckKind::Barrel => pair
            .iter()
            .find(|c| c.is_hearts())
            .unwrap_or(&pair[1])
            .clone(),
    };

    Ok(DrawCheckOutcome {
        drawn: pair.to_vec(),
        chosen,
    })
}
