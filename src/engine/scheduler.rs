//! Развёртка дедлайнов. Вызывается транспортом раз в `TICK_INTERVAL_MS`;
//! сам движок часов не читает.

use std::panic::{catch_unwind, AssertUnwindSafe};

use log::error;

use crate::api::dto::push_state_sync;
use crate::api::events::{ActionResolved, Event, Outbox};
use crate::domain::{Pending, Phase, Room, TimestampMs};
use crate::engine::damage::apply_damage;
use crate::engine::errors::EngineError;
use crate::engine::registry::RoomRegistry;
use crate::engine::respond::{continue_gatling, continue_indians};
use crate::engine::turn::{
    advance_turn, finish_standard_draw, force_discard_to_limit, TurnEndReason,
};
use crate::engine::RandomSource;

/// Один проход по всем комнатам. Паника или ошибка в одной комнате
/// не трогает остальные.
pub fn tick<R: RandomSource>(
    registry: &mut RoomRegistry,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) {
    for room in registry.iter_mut() {
        let code = room.code.clone();
        let result = catch_unwind(AssertUnwindSafe(|| sweep_room(room, now, rng, out)));
        match result {
            Ok(Ok(changed)) => {
                if changed {
                    push_state_sync(room, out);
                }
            }
            Ok(Err(e)) => error!("комната {code}: ошибка развёртки таймаута: {e}"),
            Err(_) => error!("комната {code}: паника при развёртке таймаута"),
        }
    }
}

/// true — комната изменилась и её состояние нужно разослать.
fn sweep_room<R: RandomSource>(
    room: &mut Room,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<bool, EngineError> {
    if !room.started || room.ended {
        return Ok(false);
    }

    if room.pending.is_some() && now >= room.pending_ends_at {
        resolve_pending_timeout(room, now, rng, out)?;
        return Ok(true);
    }

    if room.phase == Phase::Main && now >= room.turn_ends_at {
        if let Some(pid) = room.current_player_id() {
            force_discard_to_limit(room, pid, rng);
        }
        advance_turn(room, now, TurnEndReason::Timeout, rng, out)?;
        return Ok(true);
    }

    Ok(false)
}

/// Истёкшее под-действие разрешается наихудшим для молчуна образом:
/// атака попадает, выборы делаются за игрока.
fn resolve_pending_timeout<R: RandomSource>(
    room: &mut Room,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    let pending = match room.pending.clone() {
        Some(p) => p,
        None => return Ok(()),
    };

    match pending {
        Pending::Bang {
            attacker_id,
            target_id,
            ..
        } => {
            room.clear_pending();
            out.broadcast(Event::ActionResolved(ActionResolved::Timeout { target_id }));
            apply_damage(room, target_id, 1, Some(attacker_id), rng, out)
        }

        Pending::Indians {
            attacker_id,
            targets,
            idx,
        } => {
            let target_id = match targets.get(idx).copied() {
                Some(t) => t,
                None => {
                    room.clear_pending();
                    return Ok(());
                }
            };
            out.broadcast(Event::ActionResolved(ActionResolved::Timeout { target_id }));
            room.pending = Some(Pending::Indians {
                attacker_id,
                targets,
                idx: idx + 1,
            });
            apply_damage(room, target_id, 1, Some(attacker_id), rng, out)?;
            continue_indians(room, now, out);
            Ok(())
        }

        Pending::Gatling {
            attacker_id,
            targets,
            idx,
        } => {
            let target_id = match targets.get(idx).copied() {
                Some(t) => t,
                None => {
                    room.clear_pending();
                    return Ok(());
                }
            };
            out.broadcast(Event::ActionResolved(ActionResolved::Timeout { target_id }));
            room.pending = Some(Pending::Gatling {
                attacker_id,
                targets,
                idx: idx + 1,
            });
            apply_damage(room, target_id, 1, Some(attacker_id), rng, out)?;
            continue_gatling(room, now, out);
            Ok(())
        }

        Pending::Duel {
            initiator_id,
            target_id,
            responder_id,
        } => {
            room.clear_pending();
            out.broadcast(Event::ActionResolved(ActionResolved::Timeout {
                target_id: responder_id,
            }));
            out.broadcast(Event::ActionResolved(ActionResolved::DuelLost {
                loser_id: responder_id,
            }));
            let opponent_id =
                crate::domain::duel_opponent(initiator_id, target_id, responder_id);
            apply_damage(room, responder_id, 1, Some(opponent_id), rng, out)
        }

        Pending::DrawChoice {
            player_id,
            offered,
            pick_count,
        } => {
            room.clear_pending();
            let alive = room.player(player_id).is_some_and(|p| p.is_alive);
            if alive {
                // Автовыбор: первые pick_count карт в руку, остальные наверх колоды.
                let picked: Vec<_> = offered.iter().take(pick_count).cloned().collect();
                let rest: Vec<_> = offered.iter().skip(pick_count).cloned().collect();
                if let Some(p) = room.player_mut(player_id) {
                    p.hand.extend(picked);
                }
                for card in rest.into_iter().rev() {
                    room.deck.push(card);
                }
            } else {
                room.discard.extend(offered);
            }
            Ok(())
        }

        Pending::StealChoice { .. } | Pending::SourceChoice { .. } => {
            room.clear_pending();
            finish_standard_draw(room, None, rng, out)
        }

        Pending::DiscardLimit { player_id, .. } => {
            room.clear_pending();
            force_discard_to_limit(room, player_id, rng);
            advance_turn(room, now, TurnEndReason::Timeout, rng, out)
        }
    }
}
