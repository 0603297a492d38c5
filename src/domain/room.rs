use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::pending::Pending;
use crate::domain::player::Player;
use crate::domain::{PlayerId, RoomCode, TimestampMs};

/// Фаза хода: `Main` — активный игрок распоряжается ходом,
/// `Waiting` — идёт под-действие и ждём ответа конкретного игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Main,
    Waiting,
}

/// Комната — агрегат всего состояния одной партии.
///
/// Инвариант: `phase == Waiting` тогда и только тогда, когда
/// `pending.is_some()`. Меняем их только парой (`set_pending` /
/// `clear_pending`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
    pub code: RoomCode,
    /// Порядок рассадки значим: он задаёт соседство для дистанций
    /// и очерёдность ходов.
    pub players: Vec<Player>,

    /// Колода (верх — конец вектора).
    pub deck: Vec<Card>,
    /// Сброс (верх — конец вектора).
    pub discard: Vec<Card>,

    /// Чей сейчас ход (индекс в `players`).
    pub turn_index: usize,
    pub phase: Phase,
    pub pending: Option<Pending>,

    /// Сколько BANG сыграно в этом ходу (сбрасывается на старте хода).
    pub bangs_used_this_turn: u32,

    /// Абсолютные дедлайны для планировщика.
    pub turn_ends_at: TimestampMs,
    pub pending_ends_at: TimestampMs,

    pub started: bool,
    pub ended: bool,
}

impl Room {
    pub fn new(code: RoomCode) -> Self {
        Self {
            code,
            players: Vec::new(),
            deck: Vec::new(),
            discard: Vec::new(),
            turn_index: 0,
            phase: Phase::Main,
            pending: None,
            bangs_used_this_turn: 0,
            turn_ends_at: 0,
            pending_ends_at: 0,
            started: false,
            ended: false,
        }
    }

    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.turn_index)
    }

    pub fn current_player_id(&self) -> Option<PlayerId> {
        self.current_player().map(|p| p.id)
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }

    /// Следующее живое место по кругу после `from` (не включая его само).
    /// None, если живых мест больше нет.
    pub fn next_alive_index(&self, from: usize) -> Option<usize> {
        let n = self.players.len();
        if n == 0 {
            return None;
        }
        for step in 1..=n {
            let i = (from + step) % n;
            if self.players[i].is_alive {
                return Some(i);
            }
        }
        None
    }

    /// Все остальные живые игроки в порядке рассадки, начиная сразу
    /// после `origin` (порядок целей для Indians/Gatling).
    pub fn others_in_seat_order(&self, origin: PlayerId) -> Vec<PlayerId> {
        let n = self.players.len();
        let start = match self.player_index(origin) {
            Some(i) => i,
            None => return Vec::new(),
        };
        let mut order = Vec::new();
        for step in 1..=n {
            let p = &self.players[(start + step) % n];
            if p.is_alive && p.id != origin {
                order.push(p.id);
            }
        }
        order
    }

    /// Перевести комнату в ожидание ответа.
    pub fn set_pending(&mut self, pending: Pending, deadline: TimestampMs) {
        self.pending = Some(pending);
        self.phase = Phase::Waiting;
        self.pending_ends_at = deadline;
    }

    /// Снять ожидание и вернуться в основную фазу.
    pub fn clear_pending(&mut self) {
        self.pending = None;
        self.phase = Phase::Main;
        self.pending_ends_at = 0;
    }

    /// Общее число карт в комнате — для инварианта сохранности колоды.
    pub fn total_card_count(&self) -> usize {
        self.deck.len()
            + self.discard.len()
            + self
                .players
                .iter()
                .map(|p| p.total_cards())
                .sum::<usize>()
    }
}
