//! DTO для трансляции состояния клиентам.
//!
//! Публичный снимок не раскрывает чужие руки и роли живых (кроме шерифа);
//! приватный снимок каждый игрок получает отдельным событием.

use serde::{Deserialize, Serialize};

use crate::api::events::{Event, Outbox};
use crate::domain::{Card, CharacterId, Pending, Phase, PlayerId, Role, Room, TimestampMs};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicPlayerDto {
    pub id: PlayerId,
    pub name: String,
    pub connected: bool,
    pub character: CharacterId,
    pub hp: u8,
    pub max_hp: u8,
    pub is_alive: bool,
    pub hand_count: usize,
    pub equipment: Vec<Card>,
    /// Роль видна всем только у шерифа, у мёртвых и после конца игры.
    pub role: Option<Role>,
}

/// Краткая сводка активного под-действия. Предложенные карты
/// Kit Carlson'а здесь НЕ раскрываются — они уходят только владельцу.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingSummaryDto {
    pub kind: String,
    pub responder_id: Option<PlayerId>,
    pub ends_at: TimestampMs,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameStateDto {
    pub room_code: String,
    pub players: Vec<PublicPlayerDto>,
    pub turn_player_id: Option<PlayerId>,
    pub phase: Phase,
    pub pending: Option<PendingSummaryDto>,
    pub deck_count: usize,
    pub discard_top: Option<Card>,
    pub turn_ends_at: TimestampMs,
    pub started: bool,
    pub ended: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeStateDto {
    pub player_id: PlayerId,
    pub role: Role,
    pub hand: Vec<Card>,
    /// Карты на выбор (Kit Carlson), если выбор ждёт именно этого игрока.
    pub offered: Option<Vec<Card>>,
}

fn pending_kind_name(pending: &Pending) -> &'static str {
    match pending {
        Pending::Bang { .. } => "bang",
        Pending::Indians { .. } => "indians",
        Pending::Gatling { .. } => "gatling",
        Pending::Duel { .. } => "duel",
        Pending::DrawChoice { .. } => "draw_choice",
        Pending::StealChoice { .. } => "steal_choice",
        Pending::SourceChoice { .. } => "source_choice",
        Pending::DiscardLimit { .. } => "discard_limit",
    }
}

pub fn build_game_state(room: &Room) -> GameStateDto {
    let players = room
        .players
        .iter()
        .map(|p| PublicPlayerDto {
            id: p.id,
            name: p.name.clone(),
            connected: p.connected,
            character: p.character,
            hp: p.hp,
            max_hp: p.max_hp,
            is_alive: p.is_alive,
            hand_count: p.hand.len(),
            equipment: p.equipment.clone(),
            role: if p.role == Role::Sheriff || !p.is_alive || room.ended {
                Some(p.role)
            } else {
                None
            },
        })
        .collect();

    GameStateDto {
        room_code: room.code.clone(),
        players,
        turn_player_id: room.current_player_id(),
        phase: room.phase,
        pending: room.pending.as_ref().map(|p| PendingSummaryDto {
            kind: pending_kind_name(p).to_string(),
            responder_id: p.responder(),
            ends_at: room.pending_ends_at,
        }),
        deck_count: room.deck.len(),
        discard_top: room.discard.last().cloned(),
        turn_ends_at: room.turn_ends_at,
        started: room.started,
        ended: room.ended,
    }
}

pub fn build_me_state(room: &Room, player_id: PlayerId) -> Option<MeStateDto> {
    let player = room.player(player_id)?;
    let offered = match &room.pending {
        Some(Pending::DrawChoice {
            player_id: chooser,
            offered,
            ..
        }) if *chooser == player_id => Some(offered.clone()),
        _ => None,
    };
    Some(MeStateDto {
        player_id,
        role: player.role,
        hand: player.hand.clone(),
        offered,
    })
}

/// Разослать полный снимок: публичный — всем, приватный — каждому
/// подключённому игроку. Вызывается после каждой успешной команды
/// и каждого тика, изменившего комнату.
pub fn push_state_sync(room: &Room, out: &mut Outbox) {
    out.broadcast(Event::GameState(build_game_state(room)));
    for p in room.players.iter().filter(|p| p.connected) {
        if let Some(me) = build_me_state(room, p.id) {
            out.send_to(p.id, Event::MeState(me));
        }
    }
}
