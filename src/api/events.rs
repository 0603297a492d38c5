//! Исходящие события движка.
//!
//! Движок не знает про транспорт: он складывает события в `Outbox`,
//! а внешний слой дренирует его и рассылает по соединениям.

use serde::{Deserialize, Serialize};

use crate::domain::{Card, PlayerId, Role, TimestampMs, Winner};
use crate::engine::dealing::DrawCheckKind;
use crate::engine::TurnEndReason;

/// Кому адресовано событие.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    /// Всем игрокам комнаты.
    Broadcast,
    /// Только одному (приватные данные: рука, предложенные карты).
    Player(PlayerId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutboundEvent {
    pub recipient: Recipient,
    pub event: Event,
}

/// Накопитель исходящих событий на время обработки одной команды
/// или одного тика планировщика.
#[derive(Debug, Default)]
pub struct Outbox {
    events: Vec<OutboundEvent>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broadcast(&mut self, event: Event) {
        self.events.push(OutboundEvent {
            recipient: Recipient::Broadcast,
            event,
        });
    }

    pub fn send_to(&mut self, player_id: PlayerId, event: Event) {
        self.events.push(OutboundEvent {
            recipient: Recipient::Player(player_id),
            event,
        });
    }

    /// Забрать все накопленные события (в порядке возникновения).
    pub fn drain(&mut self) -> Vec<OutboundEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[OutboundEvent] {
        &self.events
    }
}

/// Событие для клиентов. Сериализуется в JSON с тегом `type`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    GameStarted,

    /// Публичный снимок комнаты (всем).
    GameState(crate::api::dto::GameStateDto),
    /// Приватный снимок (каждому — свой).
    MeState(crate::api::dto::MeStateDto),

    TurnStarted {
        player_id: PlayerId,
        ends_at: TimestampMs,
    },
    TurnEnded {
        player_id: PlayerId,
        reason: TurnEndReason,
    },

    CardPlayed {
        player_id: PlayerId,
        card: Card,
        target_id: Option<PlayerId>,
    },

    /// Кто-то обязан ответить на под-действие.
    ActionRequired(ActionRequired),
    /// Чем кончилось под-действие для очередного ответчика.
    ActionResolved(ActionResolved),

    /// «Draw!»-проверка: все вытянутые карты и решающая.
    DrawCheck {
        kind: DrawCheckKind,
        player_id: PlayerId,
        drawn: Vec<Card>,
        chosen: Card,
        success: bool,
    },

    PassiveTriggered(PassiveTriggered),

    PlayerDamaged {
        player_id: PlayerId,
        amount: u8,
        hp: u8,
    },
    PlayerHealed {
        player_id: PlayerId,
        amount: u8,
        hp: u8,
    },
    /// При смерти роль вскрывается всем.
    PlayerEliminated {
        player_id: PlayerId,
        role: Role,
    },

    GameOver {
        winner: Winner,
    },

    /// Команда отклонена (только отправителю).
    Rejected {
        reason: String,
    },
}

/// Запрос ответа у конкретного игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionRequired {
    BangResponse {
        attacker_id: PlayerId,
        target_id: PlayerId,
        /// Сколько MISSED ещё нужно сыграть.
        need: u8,
    },
    IndiansResponse {
        attacker_id: PlayerId,
        target_id: PlayerId,
    },
    GatlingResponse {
        attacker_id: PlayerId,
        target_id: PlayerId,
    },
    DuelResponse {
        responder_id: PlayerId,
        opponent_id: PlayerId,
    },
    /// Kit Carlson: карты отправляются приватно, здесь только факт выбора.
    DrawChoice {
        player_id: PlayerId,
        pick_count: usize,
    },
    StealChoice {
        player_id: PlayerId,
        eligible_targets: Vec<PlayerId>,
    },
    SourceChoice {
        player_id: PlayerId,
        can_use_discard: bool,
    },
    DiscardLimit {
        player_id: PlayerId,
        need: usize,
    },
}

/// Исход под-действия для одного ответчика.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionResolved {
    BangMissed { target_id: PlayerId },
    BarrelDodge { target_id: PlayerId },
    BangHit { target_id: PlayerId },
    IndiansDefended { target_id: PlayerId },
    IndiansHit { target_id: PlayerId },
    GatlingDodged { target_id: PlayerId },
    GatlingHit { target_id: PlayerId },
    DuelLost { loser_id: PlayerId },
    /// Ответ не пришёл вовремя.
    Timeout { target_id: PlayerId },
}

/// Сработавшая пассивная способность или награда/штраф за убийство.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassiveTriggered {
    /// El Gringo: украл карту у источника урона.
    WoundSteal { player_id: PlayerId, from_id: PlayerId },
    /// Bart Cassidy: добор за рану.
    WoundDraw { player_id: PlayerId },
    /// Suzy Lafayette: добор при пустой руке.
    EmptyHandDraw { player_id: PlayerId },
    /// Vulture Sam: забрал карты убитого.
    LootTheDead { player_id: PlayerId, from_id: PlayerId },
    /// Sid Ketchum: сбросил две карты ради единицы здоровья.
    DiscardHeal { player_id: PlayerId },
    /// Black Jack: вторая карта добора вскрыта; красная масть даёт добор.
    SecondDrawReveal {
        player_id: PlayerId,
        card: Card,
        extra_draw: bool,
    },
    /// Награда за убийство бандита: три карты.
    OutlawBounty { player_id: PlayerId },
    /// Шериф убил помощника: сбрасывает все карты.
    DeputyPenalty { sheriff_id: PlayerId },
}
