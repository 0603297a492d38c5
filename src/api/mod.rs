//! Внешняя поверхность: команды игроков, исходящие события и DTO
//! для трансляции состояния. Транспорт (websocket и т.п.) живёт вне
//! этого крейта и лишь маршрутизирует `Command` внутрь и `OutboundEvent`
//! наружу.

pub mod commands;
pub mod dispatch;
pub mod dto;
pub mod errors;
pub mod events;

pub use commands::{Command, DrawSource};
pub use dispatch::handle_command;
pub use dto::{build_game_state, build_me_state, push_state_sync, GameStateDto, MeStateDto};
pub use errors::ApiError;
pub use events::{Event, Outbox, OutboundEvent, Recipient};
