//! Урон, смерть и всё, что они тянут за собой: пассивки на рану,
//! награды и штрафы за убийство, раздача карт убитого, проверка победы.

use crate::api::events::{Event, Outbox, PassiveTriggered};
use crate::domain::{Card, PlayerId, Role, Room};
use crate::engine::dealing::draw_card_optional;
use crate::engine::errors::EngineError;
use crate::engine::turn::check_game_over;
use crate::engine::RandomSource;

/// Нанести `amount` урона. Урон применяется по одной единице:
/// пассивки El Gringo и Bart Cassidy срабатывают на каждую рану,
/// которую игрок пережил; смерть обрывает остаток урона.
pub fn apply_damage<R: RandomSource>(
    room: &mut Room,
    target_id: PlayerId,
    amount: u8,
    cause_id: Option<PlayerId>,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    for _ in 0..amount {
        if room.ended {
            break;
        }

        let target = room
            .player_mut(target_id)
            .ok_or(EngineError::PlayerNotFound(target_id))?;
        if !target.is_alive {
            break;
        }

        target.hp = target.hp.saturating_sub(1);
        let hp = target.hp;
        out.broadcast(Event::PlayerDamaged {
            player_id: target_id,
            amount: 1,
            hp,
        });

        if hp == 0 {
            handle_death(room, target_id, cause_id, rng, out)?;
            break;
        }

        on_wound_survived(room, target_id, cause_id, rng, out)?;
    }
    Ok(())
}

/// Пассивки на пережитую рану.
fn on_wound_survived<R: RandomSource>(
    room: &mut Room,
    target_id: PlayerId,
    cause_id: Option<PlayerId>,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    let spec = match room.player(target_id) {
        Some(p) => p.spec(),
        None => return Ok(()),
    };

    if spec.steals_on_wound {
        if let Some(cause) = cause_id.filter(|&c| c != target_id) {
            if steal_random_from_hand(room, target_id, cause, rng) {
                out.broadcast(Event::PassiveTriggered(PassiveTriggered::WoundSteal {
                    player_id: target_id,
                    from_id: cause,
                }));
                maybe_empty_hand_draw(room, cause, rng, out)?;
            }
        }
    }

    if spec.draws_on_wound {
        if let Some(card) = draw_card_optional(room, rng)? {
            if let Some(p) = room.player_mut(target_id) {
                p.hand.push(card);
            }
            out.broadcast(Event::PassiveTriggered(PassiveTriggered::WoundDraw {
                player_id: target_id,
            }));
        }
    }

    Ok(())
}

/// Смерть игрока: вскрытие роли, награда/штраф убийце, карты убитого,
/// проверка условий победы.
fn handle_death<R: RandomSource>(
    room: &mut Room,
    dead_id: PlayerId,
    cause_id: Option<PlayerId>,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    let dead_role = {
        let dead = room
            .player_mut(dead_id)
            .ok_or(EngineError::PlayerNotFound(dead_id))?;
        dead.hp = 0;
        dead.is_alive = false;
        dead.role
    };

    out.broadcast(Event::PlayerEliminated {
        player_id: dead_id,
        role: dead_role,
    });

    if let Some(killer_id) = cause_id.filter(|&k| k != dead_id) {
        let killer_role = room.player(killer_id).map(|p| p.role);

        // Убил бандита — три карты, невзирая на собственную роль.
        if dead_role == Role::Outlaw && room.player(killer_id).is_some_and(|p| p.is_alive) {
            for _ in 0..3 {
                let card = match draw_card_optional(room, rng)? {
                    Some(card) => card,
                    None => break,
                };
                if let Some(k) = room.player_mut(killer_id) {
                    k.hand.push(card);
                }
            }
            out.broadcast(Event::PassiveTriggered(PassiveTriggered::OutlawBounty {
                player_id: killer_id,
            }));
        }

        // Шериф застрелил собственного помощника — лишается всех карт.
        if killer_role == Some(Role::Sheriff) && dead_role == Role::Deputy {
            discard_all_of(room, killer_id);
            out.broadcast(Event::PassiveTriggered(PassiveTriggered::DeputyPenalty {
                sheriff_id: killer_id,
            }));
            maybe_empty_hand_draw(room, killer_id, rng, out)?;
        }
    }

    // Карты убитого: либо живому стервятнику, либо в сброс.
    let looter_id = room
        .alive_players()
        .find(|p| p.spec().loots_the_dead)
        .map(|p| p.id);
    match looter_id {
        Some(looter_id) => {
            let loot = take_all_cards(room, dead_id);
            if !loot.is_empty() {
                if let Some(l) = room.player_mut(looter_id) {
                    l.hand.extend(loot);
                }
                out.broadcast(Event::PassiveTriggered(PassiveTriggered::LootTheDead {
                    player_id: looter_id,
                    from_id: dead_id,
                }));
            }
        }
        None => discard_all_of(room, dead_id),
    }

    check_game_over(room, out);
    Ok(())
}

/// Забрать у игрока все карты (рука + снаряжение).
fn take_all_cards(room: &mut Room, player_id: PlayerId) -> Vec<Card> {
    match room.player_mut(player_id) {
        Some(p) => {
            let mut cards: Vec<Card> = p.hand.drain(..).collect();
            cards.extend(p.equipment.drain(..));
            cards
        }
        None => Vec::new(),
    }
}

/// Все карты игрока — в сброс.
pub fn discard_all_of(room: &mut Room, player_id: PlayerId) {
    let cards = take_all_cards(room, player_id);
    room.discard.extend(cards);
}

/// Украсть случайную карту из руки (пассивка El Gringo).
/// true, если было что красть.
pub fn steal_random_from_hand<R: RandomSource>(
    room: &mut Room,
    thief_id: PlayerId,
    victim_id: PlayerId,
    rng: &mut R,
) -> bool {
    let card = match room.player_mut(victim_id) {
        Some(v) if v.is_alive && !v.hand.is_empty() => {
            let idx = rng.pick_index(v.hand.len());
            v.hand.remove(idx)
        }
        _ => return false,
    };
    if let Some(t) = room.player_mut(thief_id) {
        t.hand.push(card);
        true
    } else {
        room.discard.push(card);
        false
    }
}

/// Украсть случайную карту из руки или снаряжения (Panic).
pub fn steal_random_card<R: RandomSource>(
    room: &mut Room,
    thief_id: PlayerId,
    victim_id: PlayerId,
    rng: &mut R,
) -> bool {
    let card = match remove_random_card(room, victim_id, rng) {
        Some(card) => card,
        None => return false,
    };
    if let Some(t) = room.player_mut(thief_id) {
        t.hand.push(card);
        true
    } else {
        room.discard.push(card);
        false
    }
}

/// Сбросить случайную карту из руки или снаряжения (Cat Balou).
pub fn discard_random_card<R: RandomSource>(
    room: &mut Room,
    victim_id: PlayerId,
    rng: &mut R,
) -> bool {
    match remove_random_card(room, victim_id, rng) {
        Some(card) => {
            room.discard.push(card);
            true
        }
        None => false,
    }
}

/// Случайная карта из объединённого пула «рука + снаряжение».
fn remove_random_card<R: RandomSource>(
    room: &mut Room,
    victim_id: PlayerId,
    rng: &mut R,
) -> Option<Card> {
    let v = room.player_mut(victim_id)?;
    let total = v.hand.len() + v.equipment.len();
    if total == 0 {
        return None;
    }
    let idx = rng.pick_index(total);
    Some(if idx < v.hand.len() {
        v.hand.remove(idx)
    } else {
        let eq_idx = idx - v.hand.len();
        v.equipment.remove(eq_idx)
    })
}

/// Suzy Lafayette: как только рука опустела — добрать карту.
/// Вызывается после любой операции, способной опустошить руку.
pub fn maybe_empty_hand_draw<R: RandomSource>(
    room: &mut Room,
    player_id: PlayerId,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), EngineError> {
    let wants = match room.player(player_id) {
        Some(p) => p.is_alive && p.spec().draws_on_empty_hand && p.hand.is_empty(),
        None => false,
    };
    if !wants || room.ended {
        return Ok(());
    }
    let card = match draw_card_optional(room, rng)? {
        Some(card) => card,
        None => return Ok(()),
    };
    if let Some(p) = room.player_mut(player_id) {
        p.hand.push(card);
    }
    out.broadcast(Event::PassiveTriggered(PassiveTriggered::EmptyHandDraw {
        player_id,
    }));
    Ok(())
}
