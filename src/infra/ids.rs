//! Выдача уникальных идентификаторов карт и игроков.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{CardId, PlayerId};

/// Счётчики процесса; идентификаторы уникальны в пределах его жизни.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next_card: AtomicU64,
    next_player: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_card_id(&self) -> CardId {
        self.next_card.fetch_add(1, Ordering::Relaxed)
    }

    pub fn next_player_id(&self) -> PlayerId {
        self.next_player.fetch_add(1, Ordering::Relaxed)
    }
}
