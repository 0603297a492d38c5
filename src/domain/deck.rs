//! Состав колоды базовой игры. Статическая таблица конфигурации:
//! движок её только потребляет. Перемешивание делает engine
//! (через RNG из infra), НЕ здесь.

use crate::domain::card::{Card, CardKey, WeaponKind};
use crate::domain::CardId;

/// Сколько копий каждой карты действий/снаряжения кладём в колоду.
const ACTION_COUNTS: &[(CardKey, usize)] = &[
    (CardKey::Bang, 25),
    (CardKey::Missed, 12),
    (CardKey::Beer, 6),
    (CardKey::Stagecoach, 2),
    (CardKey::WellsFargo, 1),
    (CardKey::Saloon, 1),
    (CardKey::Panic, 4),
    (CardKey::CatBalou, 4),
    (CardKey::Indians, 2),
    (CardKey::Gatling, 1),
    (CardKey::Duel, 3),
    (CardKey::Barrel, 2),
    (CardKey::Mustang, 2),
    (CardKey::Scope, 1),
    (CardKey::Jail, 3),
    (CardKey::Dynamite, 1),
];

/// Оружие: (тип, количество копий).
const WEAPON_COUNTS: &[(WeaponKind, usize)] = &[
    (WeaponKind::Volcanic, 2),
    (WeaponKind::Schofield, 3),
    (WeaponKind::Remington, 2),
    (WeaponKind::Carabine, 2),
    (WeaponKind::Winchester, 1),
];

/// Собрать стандартную колоду. Идентификаторы карт выдаёт вызывающая
/// сторона (обычно `infra::IdGenerator`).
pub fn build_standard_deck(mut next_id: impl FnMut() -> CardId) -> Vec<Card> {
    let mut deck = Vec::new();

    for &(key, count) in ACTION_COUNTS {
        for _ in 0..count {
            deck.push(Card::new(next_id(), key));
        }
    }

    for &(kind, count) in WEAPON_COUNTS {
        for _ in 0..count {
            deck.push(Card::weapon(next_id(), kind));
        }
    }

    deck
}

/// Полный размер стандартной колоды.
pub fn standard_deck_size() -> usize {
    ACTION_COUNTS.iter().map(|&(_, n)| n).sum::<usize>()
        + WEAPON_COUNTS.iter().map(|&(_, n)| n).sum::<usize>()
}
