//! Машина хода: старт игры, начало хода (динамит → тюрьма → добор),
//! передача хода и условия победы.

use log::info;
use serde::{Deserialize, Serialize};

use crate::api::events::{ActionRequired, Event, Outbox, PassiveTriggered};
use crate::domain::{
    build_standard_deck, CardId, CardKey, DrawStyle, Pending, PlayerId, Role, Room, TimestampMs,
    Winner, ALL_CHARACTERS,
};
use crate::engine::damage::apply_damage;
use crate::engine::dealing::{
    draw_card, draw_card_optional, draw_check, take_from_discard, DrawCheckKind,
};
use crate::engine::errors::EngineError;
use crate::engine::{RandomSource, RESPONSE_MS, TURN_MS};

/// Почему закончился ход.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnEndReason {
    /// Игрок завершил ход сам.
    Manual,
    /// Дедлайн хода истёк.
    Timeout,
    /// Ход пропущен из-за тюрьмы.
    Jailed,
    /// Игрок погиб в начале собственного хода (динамит).
    Eliminated,
}

/// Запустить партию: роли, персонажи, колода, стартовые руки.
/// Первым ходит шериф.
pub fn start_game<R: RandomSource>(
    room: &mut Room,
    now: TimestampMs,
    mut next_card_id: impl FnMut() -> CardId,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    if room.started {
        return Err(EngineError::GameAlreadyStarted);
    }

    let n = room.players.len();
    let mut roles =
        crate::domain::roles_for(n).ok_or(EngineError::UnsupportedPlayerCount(n))?;
    rng.shuffle(&mut roles);

    let mut characters = ALL_CHARACTERS.to_vec();
    rng.shuffle(&mut characters);

    for (i, player) in room.players.iter_mut().enumerate() {
        player.role = roles[i];
        player.character = characters[i];
        // Шериф получает единицу здоровья сверх базы персонажа.
        player.max_hp = player.spec().max_hp + u8::from(player.role == Role::Sheriff);
        player.hp = player.max_hp;
        player.is_alive = true;
        player.hand.clear();
        player.equipment.clear();
    }

    room.deck = build_standard_deck(&mut next_card_id);
    rng.shuffle(&mut room.deck);
    room.discard.clear();

    // Стартовая рука — по числу единиц здоровья.
    for i in 0..room.players.len() {
        let hand_size = room.players[i].max_hp as usize;
        for _ in 0..hand_size {
            let card = draw_card(room, rng)?;
            room.players[i].hand.push(card);
        }
    }

    room.turn_index = room
        .players
        .iter()
        .position(|p| p.role == Role::Sheriff)
        .ok_or(EngineError::Internal("среди ролей нет шерифа"))?;
    room.started = true;
    room.ended = false;
    room.clear_pending();

    info!(
        "комната {}: игра началась, {} игроков, шериф — {}",
        room.code,
        n,
        room.players[room.turn_index].id
    );
    out.broadcast(Event::GameStarted);

    start_turn(room, now, rng, out)
}

/// Начало хода текущего игрока: динамит, тюрьма, затем фаза добора.
/// Смерть от динамита или пропуск из-за тюрьмы передают ход дальше,
/// поэтому внутри — цикл по местам.
pub fn start_turn<R: RandomSource>(
    room: &mut Room,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    loop {
        if room.ended {
            return Ok(());
        }

        let pid = room
            .current_player_id()
            .ok_or(EngineError::Internal("нет текущего игрока"))?;

        room.bangs_used_this_turn = 0;
        room.turn_ends_at = now + TURN_MS;
        room.clear_pending();
        out.broadcast(Event::TurnStarted {
            player_id: pid,
            ends_at: room.turn_ends_at,
        });

        // Динамит: пики 2–9 — взрыв на 3 урона, иначе уходит соседу.
        let has_dynamite = room
            .player(pid)
            .is_some_and(|p| p.has_equipment(CardKey::Dynamite));
        if has_dynamite {
            let outcome = draw_check(room, pid, DrawCheckKind::Dynamite, rng)?;
            let success = outcome.success(DrawCheckKind::Dynamite);
            out.broadcast(Event::DrawCheck {
                kind: DrawCheckKind::Dynamite,
                player_id: pid,
                drawn: outcome.drawn,
                chosen: outcome.chosen,
                success,
            });

            let dynamite = room
                .player_mut(pid)
                .and_then(|p| p.take_equipment(CardKey::Dynamite))
                .ok_or(EngineError::Internal("динамит исчез из снаряжения"))?;

            if success {
                // Передаётся следующему живому; единственный выживший
                // оставляет его себе.
                let next = room
                    .next_alive_index(room.turn_index)
                    .ok_or(EngineError::Internal("нет живых для передачи динамита"))?;
                room.players[next].equipment.push(dynamite);
            } else {
                room.discard.push(dynamite);
                apply_damage(room, pid, 3, None, rng, out)?;
                if room.ended {
                    return Ok(());
                }
                if !room.player(pid).is_some_and(|p| p.is_alive) {
                    out.broadcast(Event::TurnEnded {
                        player_id: pid,
                        reason: TurnEndReason::Eliminated,
                    });
                    if let Some(next) = room.next_alive_index(room.turn_index) {
                        room.turn_index = next;
                    }
                    continue;
                }
            }
        }

        // Тюрьма: карта сбрасывается всегда, червы освобождают.
        let has_jail = room
            .player(pid)
            .is_some_and(|p| p.has_equipment(CardKey::Jail));
        if has_jail {
            let jail = room
                .player_mut(pid)
                .and_then(|p| p.take_equipment(CardKey::Jail))
                .ok_or(EngineError::Internal("тюрьма исчезла из снаряжения"))?;
            room.discard.push(jail);

            let outcome = draw_check(room, pid, DrawCheckKind::Jail, rng)?;
            let success = outcome.success(DrawCheckKind::Jail);
            out.broadcast(Event::DrawCheck {
                kind: DrawCheckKind::Jail,
                player_id: pid,
                drawn: outcome.drawn,
                chosen: outcome.chosen,
                success,
            });

            if !success {
                out.broadcast(Event::TurnEnded {
                    player_id: pid,
                    reason: TurnEndReason::Jailed,
                });
                if let Some(next) = room.next_alive_index(room.turn_index) {
                    room.turn_index = next;
                }
                continue;
            }
        }

        return begin_draw_phase(room, now, rng, out);
    }
}

/// Фаза добора. Стиль зависит от персонажа: выбор из трёх, кража,
/// добор из сброса или стандартные две карты.
fn begin_draw_phase<R: RandomSource>(
    room: &mut Room,
    now: TimestampMs,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    let pid = room
        .current_player_id()
        .ok_or(EngineError::Internal("нет текущего игрока"))?;
    let style = room
        .player(pid)
        .map(|p| p.spec().draw_style)
        .unwrap_or(DrawStyle::Standard);

    match style {
        DrawStyle::PreviewPick => {
            let mut offered = Vec::with_capacity(3);
            for _ in 0..3 {
                offered.push(draw_card(room, rng)?);
            }
            room.set_pending(
                Pending::DrawChoice {
                    player_id: pid,
                    offered,
                    pick_count: 2,
                },
                now + RESPONSE_MS,
            );
            out.broadcast(Event::ActionRequired(ActionRequired::DrawChoice {
                player_id: pid,
                pick_count: 2,
            }));
            Ok(())
        }
        DrawStyle::StealFirst => {
            let eligible: Vec<PlayerId> = room
                .others_in_seat_order(pid)
                .into_iter()
                .filter(|&id| room.player(id).is_some_and(|p| !p.hand.is_empty()))
                .collect();
            if eligible.is_empty() {
                return finish_standard_draw(room, None, rng, out);
            }
            room.set_pending(
                Pending::StealChoice {
                    player_id: pid,
                    eligible_targets: eligible.clone(),
                },
                now + RESPONSE_MS,
            );
            out.broadcast(Event::ActionRequired(ActionRequired::StealChoice {
                player_id: pid,
                eligible_targets: eligible,
            }));
            Ok(())
        }
        DrawStyle::DiscardFirst => {
            if room.discard.is_empty() {
                return finish_standard_draw(room, None, rng, out);
            }
            room.set_pending(
                Pending::SourceChoice {
                    player_id: pid,
                    can_use_discard: true,
                },
                now + RESPONSE_MS,
            );
            out.broadcast(Event::ActionRequired(ActionRequired::SourceChoice {
                player_id: pid,
                can_use_discard: true,
            }));
            Ok(())
        }
        DrawStyle::Standard => finish_standard_draw(room, None, rng, out),
    }
}

/// Добор двух карт. `first` — уже добытая первая карта (кража Jesse
/// Jones или сброс Pedro Ramirez); None — взять из колоды. Black Jack
/// вскрывает вторую карту и на красной масти берёт третью.
pub fn finish_standard_draw<R: RandomSource>(
    room: &mut Room,
    first: Option<crate::domain::Card>,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    let pid = room
        .current_player_id()
        .ok_or(EngineError::Internal("нет текущего игрока"))?;
    let reveal_second = room
        .player(pid)
        .is_some_and(|p| p.spec().reveal_second_draw);

    let c1 = match first {
        Some(card) => card,
        None => draw_card(room, rng)?,
    };
    if let Some(p) = room.player_mut(pid) {
        p.hand.push(c1);
    }

    let c2 = draw_card(room, rng)?;
    let extra = reveal_second && c2.is_red();
    if reveal_second {
        out.broadcast(Event::PassiveTriggered(PassiveTriggered::SecondDrawReveal {
            player_id: pid,
            card: c2.clone(),
            extra_draw: extra,
        }));
    }
    if let Some(p) = room.player_mut(pid) {
        p.hand.push(c2);
    }

    if extra {
        // Бонус Black Jack — по возможности; пустые стопки его не срывают.
        if let Some(c3) = draw_card_optional(room, rng)? {
            if let Some(p) = room.player_mut(pid) {
                p.hand.push(c3);
            }
        }
    }

    Ok(())
}

/// Взять первую карту добора из сброса (выбор Pedro Ramirez)
/// и закончить стандартный добор.
pub fn finish_draw_from_discard<R: RandomSource>(
    room: &mut Room,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    let card = take_from_discard(room, rng)?;
    finish_standard_draw(room, Some(card), rng, out)
}

/// Если рука больше текущего здоровья — открыть сброс до лимита.
/// true, когда сброс действительно потребовался.
pub fn open_discard_limit(
    room: &mut Room,
    player_id: PlayerId,
    now: TimestampMs,
    out: &mut Outbox,
) -> bool {
    let need = match room.player(player_id) {
        Some(p) => p.hand.len().saturating_sub(p.hp as usize),
        None => 0,
    };
    if need == 0 {
        return false;
    }
    room.set_pending(Pending::DiscardLimit { player_id, need }, now + RESPONSE_MS);
    out.broadcast(Event::ActionRequired(ActionRequired::DiscardLimit {
        player_id,
        need,
    }));
    true
}

/// Передать ход следующему живому игроку.
pub fn advance_turn<R: RandomSource>(
    room: &mut Room,
    now: TimestampMs,
    reason: TurnEndReason,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    if room.ended {
        return Ok(());
    }
    if let Some(pid) = room.current_player_id() {
        out.broadcast(Event::TurnEnded {
            player_id: pid,
            reason,
        });
    }
    room.clear_pending();
    if let Some(next) = room.next_alive_index(room.turn_index) {
        room.turn_index = next;
    }
    start_turn(room, now, rng, out)
}

/// Проверка условий победы. При наступлении — фиксирует конец игры
/// и объявляет победителя. true, если игра закончена.
pub fn check_game_over(room: &mut Room, out: &mut Outbox) -> bool {
    if room.ended {
        return true;
    }

    let sheriff_alive = room
        .players
        .iter()
        .any(|p| p.role == Role::Sheriff && p.is_alive);

    let winner = if !sheriff_alive {
        // Ренегат побеждает только оставшись один на один с шерифом,
        // то есть единственным выжившим; иначе победа бандитов.
        let renegade_alone = room.alive_count() == 1
            && room
                .alive_players()
                .all(|p| p.role == Role::Renegade);
        if renegade_alone {
            Some(Winner::Renegade)
        } else {
            Some(Winner::Outlaws)
        }
    } else {
        let threats_alive = room
            .alive_players()
            .any(|p| matches!(p.role, Role::Outlaw | Role::Renegade));
        if threats_alive {
            None
        } else {
            Some(Winner::Sheriff)
        }
    };

    match winner {
        Some(winner) => {
            room.ended = true;
            room.clear_pending();
            info!("комната {}: игра окончена, победитель {winner:?}", room.code);
            out.broadcast(Event::GameOver { winner });
            true
        }
        None => false,
    }
}

/// Принудительно сбросить лишние карты руки (таймаут хода или сброса).
pub fn force_discard_to_limit<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    rng: &mut R,
) {
    loop {
        let over = match room.player(player_id) {
            Some(p) => p.hand.len() > p.hp as usize,
            None => false,
        };
        if !over {
            return;
        }
        let card = match room.player_mut(player_id) {
            Some(p) => {
                let idx = rng.pick_index(p.hand.len());
                p.hand.remove(idx)
            }
            None => return,
        };
        room.discard.push(card);
    }
}
