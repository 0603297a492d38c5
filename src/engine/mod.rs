//! Игровой движок: машина хода, разрешение карт, урон, таймауты.
//!
//! Основные операции:
//!   - `turn::start_game` – раздать роли/персонажей/карты и запустить первый ход
//!   - `actions::handle_play_card` – сыграть карту из руки
//!   - `respond::handle_respond` – ответить на активное под-действие
//!   - `scheduler::tick` – периодическая развёртка дедлайнов по всем комнатам
//!
//! Всё состояние мутируется синхронно: «ожидание» ответа — это запись
//! в `Room::pending` и возврат управления, а не заблокированный вызов.

pub mod actions;
pub mod damage;
pub mod dealing;
pub mod distance;
pub mod errors;
pub mod registry;
pub mod respond;
pub mod scheduler;
pub mod turn;

pub use dealing::{draw_check, DrawCheckKind, DrawCheckOutcome};
pub use errors::EngineError;
pub use registry::RoomRegistry;
pub use turn::TurnEndReason;

/// Сколько длится ход активного игрока.
pub const TURN_MS: u64 = 30_000;
/// Сколько даётся на ответ в любом под-действии.
pub const RESPONSE_MS: u64 = 12_000;
/// Интервал развёртки планировщика.
pub const TICK_INTERVAL_MS: u64 = 500;

/// RNG интерфейс для engine.
/// Реализации — в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);

    /// Равномерный индекс в `0..len`. `len` должен быть > 0.
    fn pick_index(&mut self, len: usize) -> usize;
}
