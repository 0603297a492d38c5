use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, CardKey};
use crate::domain::character::{CharacterId, CharacterSpec};
use crate::domain::role::Role;
use crate::domain::{CardId, PlayerId};

/// Игрок за столом. Создаётся при входе в комнату; роль, персонаж и HP
/// назначаются только при старте игры. После старта игрок никогда не
/// удаляется из массива рассадки — дисконнект лишь снимает `connected`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Есть ли живое соединение (транспорт снаружи, тут только флаг).
    pub connected: bool,

    pub role: Role,
    pub character: CharacterId,

    pub hp: u8,
    pub max_hp: u8,
    pub is_alive: bool,

    /// Рука (приватная, порядок значим).
    pub hand: Vec<Card>,
    /// Снаряжение в игре (публичное): максимум одно оружие,
    /// максимум одна копия каждого уникального статуса.
    pub equipment: Vec<Card>,
}

impl Player {
    pub fn new(id: PlayerId, name: String, role: Role, character: CharacterId) -> Self {
        let max_hp = character.spec().max_hp;
        Self {
            id,
            name,
            connected: true,
            role,
            character,
            hp: max_hp,
            max_hp,
            is_alive: true,
            hand: Vec::new(),
            equipment: Vec::new(),
        }
    }

    #[inline]
    pub fn spec(&self) -> CharacterSpec {
        self.character.spec()
    }

    /// Вынуть карту из руки по id. Позицию ищем каждый раз заново —
    /// индексы между операциями не стабильны.
    pub fn pop_card_from_hand(&mut self, card_id: CardId) -> Option<Card> {
        let idx = self.hand.iter().position(|c| c.id == card_id)?;
        Some(self.hand.remove(idx))
    }

    pub fn has_equipment(&self, key: CardKey) -> bool {
        self.equipment.iter().any(|c| c.key == key)
    }

    /// Снять единицу снаряжения данного типа (если есть).
    pub fn take_equipment(&mut self, key: CardKey) -> Option<Card> {
        let idx = self.equipment.iter().position(|c| c.key == key)?;
        Some(self.equipment.remove(idx))
    }

    /// Экипированное оружие.
    pub fn weapon(&self) -> Option<&Card> {
        self.equipment.iter().find(|c| c.key == CardKey::Weapon)
    }

    /// Сколько карт всего держит игрок (рука + снаряжение).
    pub fn total_cards(&self) -> usize {
        self.hand.len() + self.equipment.len()
    }
}
