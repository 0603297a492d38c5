//! Доменная модель игры: карты, персонажи, роли, игроки, комнаты, колода.

pub mod card;
pub mod character;
pub mod deck;
pub mod pending;
pub mod player;
pub mod role;
pub mod room;

// Базовые идентификаторы (потом можно вынести в отдельный модуль ids/infra)
pub type PlayerId = u64;
pub type CardId = u64;
pub type RoomCode = String;

/// Абсолютное время в миллисекундах (Unix epoch).
/// Движок сам часы не читает — время всегда приходит снаружи от диспетчера.
pub type TimestampMs = u64;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use card::*;
pub use character::*;
pub use deck::*;
pub use pending::*;
pub use player::*;
pub use role::*;
pub use room::*;
