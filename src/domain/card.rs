use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::CardId;

/// Масть карты.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Spades,   // ♠
    Hearts,   // ♥
    Diamonds, // ♦
    Clubs,    // ♣
}

/// Ранг карты.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Ace,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
];

/// Тип карты (что она делает).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CardKey {
    // Действия.
    Bang,
    Missed,
    Beer,
    Panic,
    CatBalou,
    Duel,
    Gatling,
    Indians,
    Stagecoach,
    WellsFargo,
    Saloon,
    // Снаряжение.
    Jail,
    Dynamite,
    Weapon,
    Barrel,
    Mustang,
    Scope,
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardKey::Bang => "bang",
            CardKey::Missed => "missed",
            CardKey::Beer => "beer",
            CardKey::Panic => "panic",
            CardKey::CatBalou => "catbalou",
            CardKey::Duel => "duel",
            CardKey::Gatling => "gatling",
            CardKey::Indians => "indians",
            CardKey::Stagecoach => "stagecoach",
            CardKey::WellsFargo => "wellsfargo",
            CardKey::Saloon => "saloon",
            CardKey::Jail => "jail",
            CardKey::Dynamite => "dynamite",
            CardKey::Weapon => "weapon",
            CardKey::Barrel => "barrel",
            CardKey::Mustang => "mustang",
            CardKey::Scope => "scope",
        };
        write!(f, "{s}")
    }
}

/// Именованные уровни оружия; дальность жёстко привязана к названию.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Volcanic,
    Schofield,
    Remington,
    Carabine,
    Winchester,
}

impl WeaponKind {
    pub const fn range(self) -> u8 {
        match self {
            WeaponKind::Volcanic => 1,
            WeaponKind::Schofield => 2,
            WeaponKind::Remington => 3,
            WeaponKind::Carabine => 4,
            WeaponKind::Winchester => 5,
        }
    }
}

/// Экземпляр карты. После создания — неизменяемый, кроме ленивой
/// достройки suit/rank (их назначает Deck Manager при первом вытягивании,
/// они нужны только механике "Draw!").
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub key: CardKey,
    pub suit: Option<Suit>,
    pub rank: Option<Rank>,
    /// Тип оружия — только для карт с `key == Weapon`.
    pub weapon: Option<WeaponKind>,
}

impl Card {
    pub fn new(id: CardId, key: CardKey) -> Self {
        Self {
            id,
            key,
            suit: None,
            rank: None,
            weapon: None,
        }
    }

    pub fn weapon(id: CardId, kind: WeaponKind) -> Self {
        Self {
            id,
            key: CardKey::Weapon,
            suit: None,
            rank: None,
            weapon: Some(kind),
        }
    }

    /// Числовое значение ранга для проверок динамита (A=1 … K=13).
    pub fn rank_value(&self) -> Option<u8> {
        self.rank.map(|r| r as u8)
    }

    /// Карта взрыва динамита: пики со значением 2..=9.
    pub fn is_dynamite_explosion(&self) -> bool {
        self.suit == Some(Suit::Spades)
            && matches!(self.rank_value(), Some(v) if (2..=9).contains(&v))
    }

    pub fn is_hearts(&self) -> bool {
        self.suit == Some(Suit::Hearts)
    }

    /// Красная масть (червы/бубны) — для бонуса Black Jack.
    pub fn is_red(&self) -> bool {
        matches!(self.suit, Some(Suit::Hearts) | Some(Suit::Diamonds))
    }
}
