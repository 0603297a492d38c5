//! Разыгрывание карт из руки в основной фазе хода.
//!
//! Карта вынимается из руки заранее. Отказ до «точки фиксации» (сброса
//! или экипировки карты) возвращает её на то же место, так что неудачная
//! команда не меняет состояние комнаты; после фиксации ошибка может быть
//! только внутренней и карта уже не возвращается.

use crate::api::events::{ActionRequired, ActionResolved, Event, Outbox};
use crate::domain::{
    Card, CardId, CardKey, CharacterSpec, Pending, Phase, PlayerId, Role, Room, TimestampMs,
    WeaponKind,
};
use crate::engine::damage::{discard_random_card, maybe_empty_hand_draw, steal_random_card};
use crate::engine::dealing::{discard_card, draw_card, draw_check, DrawCheckKind};
use crate::engine::distance::{effective_distance, weapon_range};
use crate::engine::errors::EngineError;
use crate::engine::respond::{continue_gatling, continue_indians, prompt_duel};
use crate::engine::{RandomSource, RESPONSE_MS};

/// BANG-лимит базовых правил: одна карта за ход.
const BANG_LIMIT: u32 = 1;

/// Ошибка розыгрыша; `Some(card)` — карту нужно вернуть в руку.
type PlayFailure = (Option<Card>, EngineError);

/// Играется ли карта как BANG (с учётом обмена Calamity Janet).
pub fn is_bang_card(card: &Card, spec: &CharacterSpec) -> bool {
    card.key == CardKey::Bang || (card.key == CardKey::Missed && spec.bang_missed_swap)
}

/// Играется ли карта как MISSED (с учётом обмена Calamity Janet).
pub fn is_missed_card(card: &Card, spec: &CharacterSpec) -> bool {
    card.key == CardKey::Missed || (card.key == CardKey::Bang && spec.bang_missed_swap)
}

/// Сыграть карту `card_id` (с целью `target_id`, если карта её требует).
pub fn handle_play_card<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card_id: CardId,
    target_id: Option<PlayerId>,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    if !room.started {
        return Err(EngineError::GameNotStarted);
    }
    if room.ended {
        return Err(EngineError::GameEnded);
    }

    let player = room
        .player(player_id)
        .ok_or(EngineError::PlayerNotFound(player_id))?;
    if !player.is_alive {
        return Err(EngineError::PlayerDead);
    }
    if room.phase != Phase::Main {
        return Err(EngineError::PendingInProgress);
    }
    if room.current_player_id() != Some(player_id) {
        return Err(EngineError::NotYourTurn);
    }

    let hand_idx = player
        .hand
        .iter()
        .position(|c| c.id == card_id)
        .ok_or(EngineError::CardNotInHand)?;
    let card = room
        .player_mut(player_id)
        .ok_or(EngineError::PlayerNotFound(player_id))?
        .hand
        .remove(hand_idx);

    match play_card_inner(room, player_id, card, target_id, now, rng, out) {
        Ok(()) => {
            maybe_empty_hand_draw(room, player_id, rng, out)?;
            Ok(())
        }
        Err((restore, err)) => {
            // Вернуть карту на прежнее место, если до фиксации не дошло.
            if let Some(card) = restore {
                if let Some(p) = room.player_mut(player_id) {
                    let idx = hand_idx.min(p.hand.len());
                    p.hand.insert(idx, card);
                }
            }
            Err(err)
        }
    }
}

fn play_card_inner<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    target_id: Option<PlayerId>,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    let spec = match room.player(player_id) {
        Some(p) => p.spec(),
        None => return Err((Some(card), EngineError::PlayerNotFound(player_id))),
    };

    if is_bang_card(&card, &spec) {
        return play_bang(room, player_id, card, target_id, now, rng, out);
    }

    match card.key {
        CardKey::Missed => Err((Some(card), EngineError::ResponseCardOnly)),

        CardKey::Weapon => equip_weapon(room, player_id, card, target_id, out),
        CardKey::Barrel | CardKey::Mustang | CardKey::Scope | CardKey::Dynamite => {
            equip_status(room, player_id, card, target_id, out)
        }
        CardKey::Jail => play_jail(room, player_id, card, target_id, out),

        CardKey::Beer => play_beer(room, player_id, card, out),
        CardKey::Saloon => play_saloon(room, player_id, card, out),
        CardKey::Stagecoach => play_card_draw(room, player_id, card, 2, rng, out),
        CardKey::WellsFargo => play_card_draw(room, player_id, card, 3, rng, out),

        CardKey::Panic => play_panic(room, player_id, card, target_id, rng, out),
        CardKey::CatBalou => play_cat_balou(room, player_id, card, target_id, rng, out),

        CardKey::Indians => play_crowd(room, player_id, card, CrowdKind::Indians, now, out),
        CardKey::Gatling => play_crowd(room, player_id, card, CrowdKind::Gatling, now, out),
        CardKey::Duel => play_duel(room, player_id, card, target_id, now, out),

        // Bang покрыт веткой is_bang_card выше.
        CardKey::Bang => Err((
            Some(card),
            EngineError::Internal("BANG прошёл мимо своей ветки"),
        )),
    }
}

fn played(out: &mut Outbox, player_id: PlayerId, card: &Card, target_id: Option<PlayerId>) {
    out.broadcast(Event::CardPlayed {
        player_id,
        card: card.clone(),
        target_id,
    });
}

/// Цель обязана быть указана, живой и не самим игроком.
fn require_other_target(
    room: &Room,
    player_id: PlayerId,
    target_id: Option<PlayerId>,
) -> Result<PlayerId, EngineError> {
    let target_id = target_id.ok_or(EngineError::MissingTarget)?;
    if target_id == player_id {
        return Err(EngineError::SelfTargetForbidden);
    }
    let target = room
        .player(target_id)
        .ok_or(EngineError::PlayerNotFound(target_id))?;
    if !target.is_alive {
        return Err(EngineError::InvalidTarget);
    }
    Ok(target_id)
}

fn play_bang<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    target_id: Option<PlayerId>,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    let target_id = match require_other_target(room, player_id, target_id) {
        Ok(t) => t,
        Err(e) => return Err((Some(card), e)),
    };

    let attacker = match room.player(player_id) {
        Some(p) => p,
        None => return Err((Some(card), EngineError::PlayerNotFound(player_id))),
    };
    let spec = attacker.spec();

    let volcanic = attacker.weapon().and_then(|c| c.weapon) == Some(WeaponKind::Volcanic);
    if room.bangs_used_this_turn >= BANG_LIMIT && !spec.unlimited_bangs && !volcanic {
        return Err((Some(card), EngineError::BangLimitReached(BANG_LIMIT)));
    }

    let range = weapon_range(attacker);
    let distance = match effective_distance(room, player_id, target_id) {
        Some(d) => d,
        None => return Err((Some(card), EngineError::InvalidTarget)),
    };
    if distance > range {
        return Err((Some(card), EngineError::TargetOutOfRange { distance, range }));
    }

    played(out, player_id, &card, Some(target_id));
    discard_card(room, card);
    room.bangs_used_this_turn += 1;

    // Бочка (или врождённая у Jourdonnais) может увернуть без карты.
    // Работает только против одиночного BANG, не против Gatling.
    let has_barrel = room
        .player(target_id)
        .is_some_and(|t| t.has_equipment(CardKey::Barrel) || t.spec().innate_barrel);
    if has_barrel {
        let outcome = draw_check(room, target_id, DrawCheckKind::Barrel, rng)
            .map_err(|e| (None, e))?;
        let success = outcome.success(DrawCheckKind::Barrel);
        out.broadcast(Event::DrawCheck {
            kind: DrawCheckKind::Barrel,
            player_id: target_id,
            drawn: outcome.drawn,
            chosen: outcome.chosen,
            success,
        });
        if success {
            out.broadcast(Event::ActionResolved(ActionResolved::BarrelDodge {
                target_id,
            }));
            return Ok(());
        }
    }

    let required_missed = spec.required_missed;
    room.set_pending(
        Pending::Bang {
            attacker_id: player_id,
            target_id,
            required_missed,
            missed_so_far: 0,
        },
        now + RESPONSE_MS,
    );
    out.broadcast(Event::ActionRequired(ActionRequired::BangResponse {
        attacker_id: player_id,
        target_id,
        need: required_missed,
    }));
    Ok(())
}

/// Новое оружие вытесняет старое в сброс.
fn equip_weapon(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    target_id: Option<PlayerId>,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    if target_id.is_some_and(|t| t != player_id) {
        return Err((Some(card), EngineError::SelfTargetRequired));
    }
    played(out, player_id, &card, None);
    let old = room
        .player_mut(player_id)
        .and_then(|p| p.take_equipment(CardKey::Weapon));
    if let Some(old) = old {
        room.discard.push(old);
    }
    if let Some(p) = room.player_mut(player_id) {
        p.equipment.push(card);
    }
    Ok(())
}

/// Бочка/мустанг/прицел/динамит: только на себя. Новая копия статуса
/// вытесняет старую в сброс, как и оружие; исключение — динамит,
/// вторая копия которого отклоняется.
fn equip_status(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    target_id: Option<PlayerId>,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    if target_id.is_some_and(|t| t != player_id) {
        return Err((Some(card), EngineError::SelfTargetRequired));
    }
    if card.key == CardKey::Dynamite {
        let already = room
            .player(player_id)
            .is_some_and(|p| p.has_equipment(CardKey::Dynamite));
        if already {
            return Err((
                Some(card),
                EngineError::DuplicateEquipment(CardKey::Dynamite),
            ));
        }
    }
    played(out, player_id, &card, None);
    let old = room
        .player_mut(player_id)
        .and_then(|p| p.take_equipment(card.key));
    if let Some(old) = old {
        room.discard.push(old);
    }
    if let Some(p) = room.player_mut(player_id) {
        p.equipment.push(card);
    }
    Ok(())
}

fn play_jail(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    target_id: Option<PlayerId>,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    let target_id = match require_other_target(room, player_id, target_id) {
        Ok(t) => t,
        Err(e) => return Err((Some(card), e)),
    };
    let target = match room.player(target_id) {
        Some(t) => t,
        None => return Err((Some(card), EngineError::PlayerNotFound(target_id))),
    };
    if target.role == Role::Sheriff {
        return Err((Some(card), EngineError::CannotJailSheriff));
    }
    played(out, player_id, &card, Some(target_id));
    // Повторная тюрьма вытесняет прежнюю в сброс.
    let old = room
        .player_mut(target_id)
        .and_then(|t| t.take_equipment(CardKey::Jail));
    if let Some(old) = old {
        room.discard.push(old);
    }
    if let Some(t) = room.player_mut(target_id) {
        t.equipment.push(card);
    }
    Ok(())
}

fn play_beer(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    // На последних двоих пиво выдыхается.
    if room.alive_count() <= 2 {
        return Err((Some(card), EngineError::BeerWithTwoPlayers));
    }
    let full = room.player(player_id).is_some_and(|p| p.hp >= p.max_hp);
    if full {
        return Err((Some(card), EngineError::AlreadyFullHp));
    }
    played(out, player_id, &card, None);
    discard_card(room, card);
    if let Some(p) = room.player_mut(player_id) {
        p.hp += 1;
        let hp = p.hp;
        out.broadcast(Event::PlayerHealed {
            player_id,
            amount: 1,
            hp,
        });
    }
    Ok(())
}

fn play_saloon(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    played(out, player_id, &card, None);
    discard_card(room, card);
    for p in room.players.iter_mut().filter(|p| p.is_alive) {
        if p.hp < p.max_hp {
            p.hp += 1;
            out.broadcast(Event::PlayerHealed {
                player_id: p.id,
                amount: 1,
                hp: p.hp,
            });
        }
    }
    Ok(())
}

/// Дилижанс и Wells Fargo: просто добор.
fn play_card_draw<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    count: usize,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    played(out, player_id, &card, None);
    discard_card(room, card);
    for _ in 0..count {
        let c = draw_card(room, rng).map_err(|e| (None, e))?;
        if let Some(p) = room.player_mut(player_id) {
            p.hand.push(c);
        }
    }
    Ok(())
}

fn play_panic<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    target_id: Option<PlayerId>,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    let target_id = match require_other_target(room, player_id, target_id) {
        Ok(t) => t,
        Err(e) => return Err((Some(card), e)),
    };
    let distance = match effective_distance(room, player_id, target_id) {
        Some(d) => d,
        None => return Err((Some(card), EngineError::InvalidTarget)),
    };
    if distance > 1 {
        return Err((
            Some(card),
            EngineError::TargetOutOfRange { distance, range: 1 },
        ));
    }
    let has_cards = room.player(target_id).is_some_and(|t| t.total_cards() > 0);
    if !has_cards {
        return Err((Some(card), EngineError::InvalidTarget));
    }
    played(out, player_id, &card, Some(target_id));
    discard_card(room, card);
    steal_random_card(room, player_id, target_id, rng);
    maybe_empty_hand_draw(room, target_id, rng, out).map_err(|e| (None, e))
}

fn play_cat_balou<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    target_id: Option<PlayerId>,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    let target_id = match require_other_target(room, player_id, target_id) {
        Ok(t) => t,
        Err(e) => return Err((Some(card), e)),
    };
    let has_cards = room.player(target_id).is_some_and(|t| t.total_cards() > 0);
    if !has_cards {
        return Err((Some(card), EngineError::InvalidTarget));
    }
    played(out, player_id, &card, Some(target_id));
    discard_card(room, card);
    discard_random_card(room, target_id, rng);
    maybe_empty_hand_draw(room, target_id, rng, out).map_err(|e| (None, e))
}

enum CrowdKind {
    Indians,
    Gatling,
}

/// Карты «на всех»: Indians и Gatling опрашивают остальных по кругу.
fn play_crowd(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    kind: CrowdKind,
    now: TimestampMs,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    let targets = room.others_in_seat_order(player_id);
    played(out, player_id, &card, None);
    discard_card(room, card);
    if targets.is_empty() {
        return Ok(());
    }

    let pending = match kind {
        CrowdKind::Indians => Pending::Indians {
            attacker_id: player_id,
            targets,
            idx: 0,
        },
        CrowdKind::Gatling => Pending::Gatling {
            attacker_id: player_id,
            targets,
            idx: 0,
        },
    };
    room.set_pending(pending, now + RESPONSE_MS);
    match kind {
        CrowdKind::Indians => continue_indians(room, now, out),
        CrowdKind::Gatling => continue_gatling(room, now, out),
    }
    Ok(())
}

fn play_duel(
    room: &mut Room,
    player_id: PlayerId,
    card: Card,
    target_id: Option<PlayerId>,
    now: TimestampMs,
    out: &mut Outbox,
) -> Result<(), PlayFailure> {
    let target_id = match require_other_target(room, player_id, target_id) {
        Ok(t) => t,
        Err(e) => return Err((Some(card), e)),
    };
    played(out, player_id, &card, Some(target_id));
    discard_card(room, card);
    room.set_pending(
        Pending::Duel {
            initiator_id: player_id,
            target_id,
            responder_id: target_id,
        },
        now + RESPONSE_MS,
    );
    prompt_duel(room, out);
    Ok(())
}
