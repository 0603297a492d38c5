//! Диспетчер команд: находит комнату, вызывает движок, рассылает
//! результат. Отказ уходит только отправителю событием `Rejected`
//! и не меняет состояние комнаты.

use log::debug;

use crate::api::commands::Command;
use crate::api::dto::push_state_sync;
use crate::api::errors::ApiError;
use crate::api::events::{Event, Outbox};
use crate::domain::{CardId, PlayerId, TimestampMs};
use crate::engine::registry::RoomRegistry;
use crate::engine::{actions, respond, turn, RandomSource};

/// Обработать команду игрока `player_id` в комнате `room_code`.
/// После успеха всем рассылается свежий снимок состояния.
#[allow(clippy::too_many_arguments)]
pub fn handle_command<R: RandomSource>(
    registry: &mut RoomRegistry,
    room_code: &str,
    player_id: PlayerId,
    command: Command,
    now: TimestampMs,
    next_card_id: &mut dyn FnMut() -> CardId,
    rng: &mut R,
    out: &mut Outbox,
) -> Result<(), ApiError> {
    let room = match registry.get_mut(room_code) {
        Some(room) => room,
        None => {
            out.send_to(
                player_id,
                Event::Rejected {
                    reason: ApiError::RoomNotFound.to_string(),
                },
            );
            return Err(ApiError::RoomNotFound);
        }
    };

    debug!("комната {room_code}: игрок {player_id}, команда {command:?}");

    let result = match command {
        Command::StartGame => turn::start_game(room, now, next_card_id, rng, out),
        Command::PlayCard { card_id, target_id } => {
            actions::handle_play_card(room, player_id, card_id, target_id, now, rng, out)
        }
        Command::Respond { card_id } => {
            respond::handle_respond(room, player_id, card_id, now, rng, out)
        }
        Command::ChooseDraw { card_ids } => {
            respond::handle_choose_draw(room, player_id, &card_ids, rng, out)
        }
        Command::ChooseTargetOrSkip { target_id } => {
            respond::handle_choose_target_or_skip(room, player_id, target_id, rng, out)
        }
        Command::ChooseDrawSource { source } => {
            respond::handle_choose_draw_source(room, player_id, source, rng, out)
        }
        Command::HealViaDiscard { card_ids } => {
            respond::handle_heal_via_discard(room, player_id, &card_ids, rng, out)
        }
        Command::DiscardToLimit { card_ids } => {
            respond::handle_discard_to_limit(room, player_id, &card_ids, now, rng, out)
        }
        Command::EndTurn => respond::handle_end_turn(room, player_id, now, rng, out),
    };

    match result {
        Ok(()) => {
            push_state_sync(room, out);
            Ok(())
        }
        Err(e) => {
            out.send_to(
                player_id,
                Event::Rejected {
                    reason: e.to_string(),
                },
            );
            Err(e.into())
        }
    }
}
