use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::PlayerId;

/// Активное под-действие, требующее ответа игрока.
///
/// Закрытое сумм-типом: каждый потребитель обязан обработать все варианты
/// (match без `_`), чтобы новый вариант нельзя было молча проигнорировать.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pending {
    /// Одиночный BANG: цель должна сыграть `required_missed` MISSED.
    Bang {
        attacker_id: PlayerId,
        target_id: PlayerId,
        required_missed: u8,
        missed_so_far: u8,
    },
    /// Indians: все остальные по очереди отвечают BANG'ом.
    Indians {
        attacker_id: PlayerId,
        targets: Vec<PlayerId>,
        idx: usize,
    },
    /// Gatling: все остальные по очереди отвечают MISSED.
    /// Бочка против Gatling НЕ работает (асимметрия оригинальных правил).
    Gatling {
        attacker_id: PlayerId,
        targets: Vec<PlayerId>,
        idx: usize,
    },
    /// Дуэль: `responder_id` обязан сыграть BANG или получить урон.
    /// Участники фиксированы на всё время дуэли.
    Duel {
        initiator_id: PlayerId,
        target_id: PlayerId,
        responder_id: PlayerId,
    },
    /// Kit Carlson: из 3 предложенных карт выбрать 2.
    DrawChoice {
        player_id: PlayerId,
        offered: Vec<Card>,
        pick_count: usize,
    },
    /// Jesse Jones: выбрать, у кого украсть первую карту добора (или пропустить).
    StealChoice {
        player_id: PlayerId,
        eligible_targets: Vec<PlayerId>,
    },
    /// Pedro Ramirez: источник первой карты добора — колода или сброс.
    SourceChoice {
        player_id: PlayerId,
        can_use_discard: bool,
    },
    /// Сброс до лимита руки в конце хода.
    DiscardLimit { player_id: PlayerId, need: usize },
}

impl Pending {
    /// Единственный игрок, который вправе разрешить это под-действие
    /// прямо сейчас.
    pub fn responder(&self) -> Option<PlayerId> {
        match self {
            Pending::Bang { target_id, .. } => Some(*target_id),
            Pending::Indians { targets, idx, .. } | Pending::Gatling { targets, idx, .. } => {
                targets.get(*idx).copied()
            }
            Pending::Duel { responder_id, .. } => Some(*responder_id),
            Pending::DrawChoice { player_id, .. }
            | Pending::StealChoice { player_id, .. }
            | Pending::SourceChoice { player_id, .. }
            | Pending::DiscardLimit { player_id, .. } => Some(*player_id),
        }
    }
}

/// Противник текущего ответчика в дуэли. Участники дуэли фиксированы:
/// кто не отвечает, тот противник.
pub fn duel_opponent(initiator_id: PlayerId, target_id: PlayerId, responder_id: PlayerId) -> PlayerId {
    if responder_id == target_id {
        initiator_id
    } else {
        target_id
    }
}
