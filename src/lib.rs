//! Серверный движок карточной игры про Дикий Запад: комнаты, роли,
//! персонажи, дистанции, разыгрывание карт и таймауты.
//!
//! Крейт не содержит транспорта: внешний слой передаёт команды в
//! `api::handle_command`, дренирует `api::Outbox` и раз в
//! `engine::TICK_INTERVAL_MS` вызывает `engine::scheduler::tick`
//! с текущим временем.

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;

pub use api::{handle_command, ApiError, Command, Event, Outbox};
pub use engine::{EngineError, RandomSource, RoomRegistry};
