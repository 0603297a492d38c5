//! Разрешение под-действий: ответы на атаки, выборы добора,
//! сброс до лимита, лечение Sid Ketchum и завершение хода.

use crate::api::commands::DrawSource;
use crate::api::events::{ActionRequired, ActionResolved, Event, Outbox, PassiveTriggered};
use crate::domain::{
    duel_opponent, Card, CardId, Pending, Phase, PlayerId, Room, TimestampMs,
};
use crate::engine::actions::{is_bang_card, is_missed_card};
use crate::engine::damage::{apply_damage, maybe_empty_hand_draw};
use crate::engine::dealing::discard_card;
use crate::engine::errors::EngineError;
use crate::engine::turn::{
    advance_turn, finish_draw_from_discard, finish_standard_draw, open_discard_limit,
    TurnEndReason,
};
use crate::engine::{RandomSource, RESPONSE_MS};

fn guard_room(room: &Room) -> Result<(), EngineError> {
    if !room.started {
        return Err(EngineError::GameNotStarted);
    }
    if room.ended {
        return Err(EngineError::GameEnded);
    }
    Ok(())
}

/// Ответ на атакующее под-действие. `card_id == None` — игрок пасует
/// и принимает последствия.
pub fn handle_respond<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card_id: Option<CardId>,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    guard_room(room)?;
    let pending = room.pending.clone().ok_or(EngineError::NoPendingAction)?;

    match pending {
        Pending::Bang {
            attacker_id,
            target_id,
            required_missed,
            missed_so_far,
        } => respond_bang(
            room,
            player_id,
            card_id,
            attacker_id,
            target_id,
            required_missed,
            missed_so_far,
            now,
            rng,
            out,
        ),
        Pending::Indians {
            attacker_id,
            targets,
            idx,
        } => respond_indians(room, player_id, card_id, attacker_id, targets, idx, now, rng, out),
        Pending::Gatling {
            attacker_id,
            targets,
            idx,
        } => respond_gatling(room, player_id, card_id, attacker_id, targets, idx, now, rng, out),
        Pending::Duel {
            initiator_id,
            target_id,
            responder_id,
        } => respond_duel(
            room,
            player_id,
            card_id,
            initiator_id,
            target_id,
            responder_id,
            now,
            rng,
            out,
        ),
        Pending::DrawChoice { .. }
        | Pending::StealChoice { .. }
        | Pending::SourceChoice { .. }
        | Pending::DiscardLimit { .. } => Err(EngineError::WrongPendingKind),
    }
}

/// Вынуть из руки ответную карту, проверив её предикатом.
/// Карта уходит в сброс, пустая рука добирается (Suzy).
fn spend_response_card<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card_id: CardId,
    check: impl Fn(&Card, &crate::domain::CharacterSpec) -> bool,
    bad_card: EngineError,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    let spec = room
        .player(player_id)
        .ok_or(EngineError::PlayerNotFound(player_id))?
        .spec();
    let valid = room
        .player(player_id)
        .and_then(|p| p.hand.iter().find(|c| c.id == card_id))
        .map(|c| check(c, &spec));
    match valid {
        None => return Err(EngineError::CardNotInHand),
        Some(false) => return Err(bad_card),
        Some(true) => {}
    }
    let card = room
        .player_mut(player_id)
        .and_then(|p| p.pop_card_from_hand(card_id))
        .ok_or(EngineError::CardNotInHand)?;
    discard_card(room, card);
    maybe_empty_hand_draw(room, player_id, rng, out)
}

#[allow(clippy::too_many_arguments)]
fn respond_bang<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card_id: Option<CardId>,
    attacker_id: PlayerId,
    target_id: PlayerId,
    required_missed: u8,
    missed_so_far: u8,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    if player_id != target_id {
        return Err(EngineError::NotYourResponse);
    }

    let card_id = match card_id {
        Some(id) => id,
        None => {
            room.clear_pending();
            out.broadcast(Event::ActionResolved(ActionResolved::BangHit { target_id }));
            return apply_damage(room, target_id, 1, Some(attacker_id), rng, out);
        }
    };

    spend_response_card(
        room,
        player_id,
        card_id,
        is_missed_card,
        EngineError::NeedMissed,
        rng,
        out,
    )?;

    let missed_so_far = missed_so_far + 1;
    if missed_so_far >= required_missed {
        room.clear_pending();
        out.broadcast(Event::ActionResolved(ActionResolved::BangMissed {
            target_id,
        }));
        return Ok(());
    }

    // Slab the Killer: нужен второй MISSED.
    room.set_pending(
        Pending::Bang {
            attacker_id,
            target_id,
            required_missed,
            missed_so_far,
        },
        now + RESPONSE_MS,
    );
    out.broadcast(Event::ActionRequired(ActionRequired::BangResponse {
        attacker_id,
        target_id,
        need: required_missed - missed_so_far,
    }));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn respond_indians<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card_id: Option<CardId>,
    attacker_id: PlayerId,
    targets: Vec<PlayerId>,
    idx: usize,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    if targets.get(idx).copied() != Some(player_id) {
        return Err(EngineError::NotYourResponse);
    }

    match card_id {
        Some(card_id) => {
            spend_response_card(
                room,
                player_id,
                card_id,
                is_bang_card,
                EngineError::NeedBang,
                rng,
                out,
            )?;
            out.broadcast(Event::ActionResolved(ActionResolved::IndiansDefended {
                target_id: player_id,
            }));
            room.pending = Some(Pending::Indians {
                attacker_id,
                targets,
                idx: idx + 1,
            });
        }
        None => {
            out.broadcast(Event::ActionResolved(ActionResolved::IndiansHit {
                target_id: player_id,
            }));
            room.pending = Some(Pending::Indians {
                attacker_id,
                targets,
                idx: idx + 1,
            });
            apply_damage(room, player_id, 1, Some(attacker_id), rng, out)?;
        }
    }

    continue_indians(room, now, out);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn respond_gatling<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card_id: Option<CardId>,
    attacker_id: PlayerId,
    targets: Vec<PlayerId>,
    idx: usize,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    if targets.get(idx).copied() != Some(player_id) {
        return Err(EngineError::NotYourResponse);
    }

    match card_id {
        Some(card_id) => {
            spend_response_card(
                room,
                player_id,
                card_id,
                is_missed_card,
                EngineError::NeedMissed,
                rng,
                out,
            )?;
            out.broadcast(Event::ActionResolved(ActionResolved::GatlingDodged {
                target_id: player_id,
            }));
            room.pending = Some(Pending::Gatling {
                attacker_id,
                targets,
                idx: idx + 1,
            });
        }
        None => {
            out.broadcast(Event::ActionResolved(ActionResolved::GatlingHit {
                target_id: player_id,
            }));
            room.pending = Some(Pending::Gatling {
                attacker_id,
                targets,
                idx: idx + 1,
            });
            apply_damage(room, player_id, 1, Some(attacker_id), rng, out)?;
        }
    }

    continue_gatling(room, now, out);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn respond_duel<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card_id: Option<CardId>,
    initiator_id: PlayerId,
    target_id: PlayerId,
    responder_id: PlayerId,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    if player_id != responder_id {
        return Err(EngineError::NotYourResponse);
    }
    let opponent_id = duel_opponent(initiator_id, target_id, responder_id);

    match card_id {
        Some(card_id) => {
            spend_response_card(
                room,
                player_id,
                card_id,
                is_bang_card,
                EngineError::NeedBang,
                rng,
                out,
            )?;
            // Ход дуэли переходит к противнику.
            room.set_pending(
                Pending::Duel {
                    initiator_id,
                    target_id,
                    responder_id: opponent_id,
                },
                now + RESPONSE_MS,
            );
            prompt_duel(room, out);
            Ok(())
        }
        None => {
            room.clear_pending();
            out.broadcast(Event::ActionResolved(ActionResolved::DuelLost {
                loser_id: responder_id,
            }));
            apply_damage(room, responder_id, 1, Some(opponent_id), rng, out)
        }
    }
}

/// Показать запрос текущему ответчику дуэли.
pub fn prompt_duel(room: &Room, out: &mut Outbox) {
    if let Some(Pending::Duel {
        initiator_id,
        target_id,
        responder_id,
    }) = &room.pending
    {
        out.broadcast(Event::ActionRequired(ActionRequired::DuelResponse {
            responder_id: *responder_id,
            opponent_id: duel_opponent(*initiator_id, *target_id, *responder_id),
        }));
    }
}

/// Продвинуть очередь Indians: пропустить мёртвых, запросить живого,
/// закрыть под-действие, когда очередь кончилась.
pub fn continue_indians(room: &mut Room, now: TimestampMs, out: &mut Outbox) {
    loop {
        let (attacker_id, targets, idx) = match &room.pending {
            Some(Pending::Indians {
                attacker_id,
                targets,
                idx,
            }) => (*attacker_id, targets.clone(), *idx),
            _ => return,
        };
        let target_id = match targets.get(idx) {
            Some(&t) => t,
            None => {
                room.clear_pending();
                return;
            }
        };
        if !room.player(target_id).is_some_and(|p| p.is_alive) {
            room.pending = Some(Pending::Indians {
                attacker_id,
                targets,
                idx: idx + 1,
            });
            continue;
        }
        room.pending_ends_at = now + RESPONSE_MS;
        out.broadcast(Event::ActionRequired(ActionRequired::IndiansResponse {
            attacker_id,
            target_id,
        }));
        return;
    }
}

/// То же для Gatling.
pub fn continue_gatling(room: &mut Room, now: TimestampMs, out: &mut Outbox) {
    loop {
        let (attacker_id, targets, idx) = match &room.pending {
            Some(Pending::Gatling {
                attacker_id,
                targets,
                idx,
            }) => (*attacker_id, targets.clone(), *idx),
            _ => return,
        };
        let target_id = match targets.get(idx) {
            Some(&t) => t,
            None => {
                room.clear_pending();
                return;
            }
        };
        if !room.player(target_id).is_some_and(|p| p.is_alive) {
            room.pending = Some(Pending::Gatling {
                attacker_id,
                targets,
                idx: idx + 1,
            });
            continue;
        }
        room.pending_ends_at = now + RESPONSE_MS;
        out.broadcast(Event::ActionRequired(ActionRequired::GatlingResponse {
            attacker_id,
            target_id,
        }));
        return;
    }
}

/// Выбор Kit Carlson: оставить `pick_count` из предложенных карт,
/// остальные вернуть наверх колоды в исходном порядке.
pub fn handle_choose_draw<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card_ids: &[CardId],
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    guard_room(room)?;
    let (chooser, offered, pick_count) = match &room.pending {
        Some(Pending::DrawChoice {
            player_id,
            offered,
            pick_count,
        }) => (*player_id, offered.clone(), *pick_count),
        Some(_) => return Err(EngineError::WrongPendingKind),
        None => return Err(EngineError::NoPendingAction),
    };
    if chooser != player_id {
        return Err(EngineError::NotYourChoice);
    }
    if card_ids.len() != pick_count {
        return Err(EngineError::WrongPickCount { need: pick_count });
    }
    let distinct = card_ids
        .iter()
        .all(|id| card_ids.iter().filter(|x| *x == id).count() == 1);
    if !distinct || !card_ids.iter().all(|id| offered.iter().any(|c| c.id == *id)) {
        return Err(EngineError::UnknownOfferedCard);
    }

    let (picked, rest): (Vec<Card>, Vec<Card>) = offered
        .into_iter()
        .partition(|c| card_ids.contains(&c.id));
    if let Some(p) = room.player_mut(player_id) {
        p.hand.extend(picked);
    }
    // Невыбранные — обратно наверх колоды, первой уйдёт более ранняя.
    for card in rest.into_iter().rev() {
        room.deck.push(card);
    }

    room.clear_pending();
    maybe_empty_hand_draw(room, player_id, rng, out)
}

/// Выбор Jesse Jones: украсть первую карту добора из чужой руки.
/// Невалидная или отсутствующая цель — обычный добор из колоды.
pub fn handle_choose_target_or_skip<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    target_id: Option<PlayerId>,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    guard_room(room)?;
    let (chooser, eligible) = match &room.pending {
        Some(Pending::StealChoice {
            player_id,
            eligible_targets,
        }) => (*player_id, eligible_targets.clone()),
        Some(_) => return Err(EngineError::WrongPendingKind),
        None => return Err(EngineError::NoPendingAction),
    };
    if chooser != player_id {
        return Err(EngineError::NotYourChoice);
    }
    room.clear_pending();

    let victim = target_id.filter(|t| eligible.contains(t));
    let first = match victim {
        Some(victim_id) => {
            let stolen = room.player_mut(victim_id).and_then(|v| {
                if v.hand.is_empty() {
                    None
                } else {
                    let idx = rng.pick_index(v.hand.len());
                    Some(v.hand.remove(idx))
                }
            });
            if stolen.is_some() {
                maybe_empty_hand_draw(room, victim_id, rng, out)?;
            }
            stolen
        }
        None => None,
    };

    finish_standard_draw(room, first, rng, out)
}

/// Выбор Pedro Ramirez: откуда первая карта добора.
pub fn handle_choose_draw_source<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    source: DrawSource,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    guard_room(room)?;
    let (chooser, can_use_discard) = match &room.pending {
        Some(Pending::SourceChoice {
            player_id,
            can_use_discard,
        }) => (*player_id, *can_use_discard),
        Some(_) => return Err(EngineError::WrongPendingKind),
        None => return Err(EngineError::NoPendingAction),
    };
    if chooser != player_id {
        return Err(EngineError::NotYourChoice);
    }
    room.clear_pending();

    if source == DrawSource::Discard && can_use_discard && !room.discard.is_empty() {
        finish_draw_from_discard(room, rng, out)
    } else {
        finish_standard_draw(room, None, rng, out)
    }
}

/// Sid Ketchum: сбросить две карты ради единицы здоровья.
/// Ход не обязан быть его, но комната должна быть в основной фазе.
pub fn handle_heal_via_discard<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card_ids: &[CardId],
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    guard_room(room)?;
    let player = room
        .player(player_id)
        .ok_or(EngineError::PlayerNotFound(player_id))?;
    if !player.is_alive {
        return Err(EngineError::PlayerDead);
    }
    if !player.spec().discard_two_to_heal {
        return Err(EngineError::NotYourAbility);
    }
    if room.phase != Phase::Main {
        return Err(EngineError::PendingInProgress);
    }
    if player.hp >= player.max_hp {
        return Err(EngineError::AlreadyFullHp);
    }
    let [id1, id2] = match card_ids {
        [a, b] if a != b => [*a, *b],
        _ => return Err(EngineError::WrongPickCount { need: 2 }),
    };

    let c1 = room
        .player_mut(player_id)
        .and_then(|p| p.pop_card_from_hand(id1))
        .ok_or(EngineError::CardNotInHand)?;
    let c2 = match room
        .player_mut(player_id)
        .and_then(|p| p.pop_card_from_hand(id2))
    {
        Some(c) => c,
        None => {
            // Второй карты нет — первую обратно.
            if let Some(p) = room.player_mut(player_id) {
                p.hand.push(c1);
            }
            return Err(EngineError::CardNotInHand);
        }
    };
    discard_card(room, c1);
    discard_card(room, c2);

    if let Some(p) = room.player_mut(player_id) {
        p.hp += 1;
        let hp = p.hp;
        out.broadcast(Event::PlayerHealed {
            player_id,
            amount: 1,
            hp,
        });
    }
    out.broadcast(Event::PassiveTriggered(PassiveTriggered::DiscardHeal {
        player_id,
    }));
    maybe_empty_hand_draw(room, player_id, rng, out)
}

/// Сброс до лимита руки; после него ход переходит дальше.
pub fn handle_discard_to_limit<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    card_ids: &[CardId],
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    guard_room(room)?;
    let (chooser, need) = match &room.pending {
        Some(Pending::DiscardLimit { player_id, need }) => (*player_id, *need),
        Some(_) => return Err(EngineError::WrongPendingKind),
        None => return Err(EngineError::NoPendingAction),
    };
    if chooser != player_id {
        return Err(EngineError::NotYourChoice);
    }
    if card_ids.len() != need {
        return Err(EngineError::WrongPickCount { need });
    }
    let distinct = card_ids
        .iter()
        .all(|id| card_ids.iter().filter(|x| *x == id).count() == 1);
    let all_present = distinct
        && room.player(player_id).is_some_and(|p| {
            card_ids
                .iter()
                .all(|id| p.hand.iter().any(|c| c.id == *id))
        });
    if !all_present {
        return Err(EngineError::CardNotInHand);
    }

    for &id in card_ids {
        let card = room
            .player_mut(player_id)
            .and_then(|p| p.pop_card_from_hand(id))
            .ok_or(EngineError::Internal("карта сброса исчезла из руки"))?;
        discard_card(room, card);
    }
    room.clear_pending();
    maybe_empty_hand_draw(room, player_id, rng, out)?;
    advance_turn(room, now, TurnEndReason::Manual, rng, out)
}

/// Завершить собственный ход. Если рука больше здоровья — сначала
/// открывается сброс до лимита.
pub fn handle_end_turn<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    guard_room(room)?;
    let player = room
        .player(player_id)
        .ok_or(EngineError::PlayerNotFound(player_id))?;
    if !player.is_alive {
        return Err(EngineError::PlayerDead);
    }
    if room.current_player_id() != Some(player_id) {
        return Err(EngineError::NotYourTurn);
    }
    if room.phase != Phase::Main {
        return Err(EngineError::CannotEndTurn);
    }

    if open_discard_limit(room, player_id, now, out) {
        return Ok(());
    }
    advance_turn(room, now, TurnEndReason::Manual, rng, out)
}
