//! Входящие команды игроков. Транспорт десериализует их из JSON
//! (поле `type` — дискриминант) и передаёт диспетчеру вместе с
//! идентификатором отправителя.

use serde::{Deserialize, Serialize};

use crate::domain::{CardId, PlayerId};

/// Источник первой карты добора (выбор Pedro Ramirez).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DrawSource {
    Deck,
    Discard,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Запустить партию (4–7 игроков в комнате).
    StartGame,
    /// Сыграть карту из руки в свой ход.
    PlayCard {
        card_id: CardId,
        target_id: Option<PlayerId>,
    },
    /// Ответить на атаку; None — пас.
    Respond { card_id: Option<CardId> },
    /// Kit Carlson: выбрать карты из предложенных.
    ChooseDraw { card_ids: Vec<CardId> },
    /// Jesse Jones: у кого украсть первую карту добора; None — из колоды.
    ChooseTargetOrSkip { target_id: Option<PlayerId> },
    /// Pedro Ramirez: источник первой карты добора.
    ChooseDrawSource { source: DrawSource },
    /// Sid Ketchum: сбросить две карты ради единицы здоровья.
    HealViaDiscard { card_ids: Vec<CardId> },
    /// Сбросить лишние карты в конце хода.
    DiscardToLimit { card_ids: Vec<CardId> },
    EndTurn,
}
