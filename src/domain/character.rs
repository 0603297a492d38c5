//! Персонажи и их пассивные способности.
//!
//! Движок НЕ сравнивает id персонажа напрямую: все способности собраны
//! в таблицу `CharacterSpec`, и компоненты (урон, ход, дистанция) читают
//! только её поля. Новый персонаж = новая строка таблицы, без ветвлений
//! в ядре.

use core::fmt;

use serde::{Deserialize, Serialize};

/// 16 базовых персонажей.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CharacterId {
    BartCassidy,
    BlackJack,
    CalamityJanet,
    ElGringo,
    JesseJones,
    Jourdonnais,
    KitCarlson,
    LuckyDuke,
    PaulRegret,
    PedroRamirez,
    RoseDoolan,
    SidKetchum,
    SlabTheKiller,
    SuzyLafayette,
    VultureSam,
    WillyTheKid,
}

pub const ALL_CHARACTERS: [CharacterId; 16] = [
    CharacterId::BartCassidy,
    CharacterId::BlackJack,
    CharacterId::CalamityJanet,
    CharacterId::ElGringo,
    CharacterId::JesseJones,
    CharacterId::Jourdonnais,
    CharacterId::KitCarlson,
    CharacterId::LuckyDuke,
    CharacterId::PaulRegret,
    CharacterId::PedroRamirez,
    CharacterId::RoseDoolan,
    CharacterId::SidKetchum,
    CharacterId::SlabTheKiller,
    CharacterId::SuzyLafayette,
    CharacterId::VultureSam,
    CharacterId::WillyTheKid,
];

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CharacterId::BartCassidy => "bart_cassidy",
            CharacterId::BlackJack => "black_jack",
            CharacterId::CalamityJanet => "calamity_janet",
            CharacterId::ElGringo => "el_gringo",
            CharacterId::JesseJones => "jesse_jones",
            CharacterId::Jourdonnais => "jourdonnais",
            CharacterId::KitCarlson => "kit_carlson",
            CharacterId::LuckyDuke => "lucky_duke",
            CharacterId::PaulRegret => "paul_regret",
            CharacterId::PedroRamirez => "pedro_ramirez",
            CharacterId::RoseDoolan => "rose_doolan",
            CharacterId::SidKetchum => "sid_ketchum",
            CharacterId::SlabTheKiller => "slab_the_killer",
            CharacterId::SuzyLafayette => "suzy_lafayette",
            CharacterId::VultureSam => "vulture_sam",
            CharacterId::WillyTheKid => "willy_the_kid",
        };
        write!(f, "{s}")
    }
}

/// Вариант фазы добора в начале хода.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DrawStyle {
    /// Обычные 2 карты из колоды.
    Standard,
    /// Посмотреть 3 карты, оставить 2 (Kit Carlson).
    PreviewPick,
    /// Первую карту можно украсть из чужой руки (Jesse Jones).
    StealFirst,
    /// Первую карту можно взять из сброса (Pedro Ramirez).
    DiscardFirst,
}

/// Таблица способностей персонажа.
///
/// Все поля — «опциональные хуки»: значение по умолчанию ничего не меняет
/// в базовых правилах.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterSpec {
    pub max_hp: u8,
    pub draw_style: DrawStyle,
    /// Draw!-проверки тянут 2 карты и берут лучшую (Lucky Duke).
    pub double_draw_check: bool,
    /// Встроенная «бочка» против BANG (Jourdonnais).
    pub innate_barrel: bool,
    /// Добирает 1 карту за каждое выжитое ранение (Bart Cassidy).
    pub draws_on_wound: bool,
    /// Крадёт карту у причинившего урон игрока за каждое ранение (El Gringo).
    pub steals_on_wound: bool,
    /// Забирает все карты умершего (Vulture Sam).
    pub loots_the_dead: bool,
    /// Добирает карту, когда рука опустела (Suzy Lafayette).
    pub draws_on_empty_hand: bool,
    /// MISSED играется как BANG и наоборот (Calamity Janet).
    pub bang_missed_swap: bool,
    /// Без лимита BANG за ход (Willy the Kid).
    pub unlimited_bangs: bool,
    /// Сколько MISSED нужно, чтобы увернуться от его BANG (Slab the Killer = 2).
    pub required_missed: u8,
    /// Остальные видят его дальше на N (Paul Regret).
    pub defender_distance_bonus: u8,
    /// Видит остальных ближе на N (Rose Doolan).
    pub attacker_distance_bonus: u8,
    /// Может сбросить 2 карты ради 1 HP (Sid Ketchum).
    pub discard_two_to_heal: bool,
    /// Вскрывает вторую добранную карту; красная масть = +1 карта (Black Jack).
    pub reveal_second_draw: bool,
}

impl CharacterSpec {
    /// База: 4 HP, никаких способностей.
    const fn base(max_hp: u8) -> Self {
        Self {
            max_hp,
            draw_style: DrawStyle::Standard,
            double_draw_check: false,
            innate_barrel: false,
            draws_on_wound: false,
            steals_on_wound: false,
            loots_the_dead: false,
            draws_on_empty_hand: false,
            bang_missed_swap: false,
            unlimited_bangs: false,
            required_missed: 1,
            defender_distance_bonus: 0,
            attacker_distance_bonus: 0,
            discard_two_to_heal: false,
            reveal_second_draw: false,
        }
    }
}

impl CharacterId {
    /// Таблица способностей. Значения HP — из базовой игры
    /// (El Gringo и Paul Regret живут с 3).
    pub const fn spec(self) -> CharacterSpec {
        match self {
            CharacterId::BartCassidy => CharacterSpec {
                draws_on_wound: true,
                ..CharacterSpec::base(4)
            },
            CharacterId::BlackJack => CharacterSpec {
                reveal_second_draw: true,
                ..CharacterSpec::base(4)
            },
            CharacterId::CalamityJanet => CharacterSpec {
                bang_missed_swap: true,
                ..CharacterSpec::base(4)
            },
            CharacterId::ElGringo => CharacterSpec {
                steals_on_wound: true,
                ..CharacterSpec::base(3)
            },
            CharacterId::JesseJones => CharacterSpec {
                draw_style: DrawStyle::StealFirst,
                ..CharacterSpec::base(4)
            },
            CharacterId::Jourdonnais => CharacterSpec {
                innate_barrel: true,
                ..CharacterSpec::base(4)
            },
            CharacterId::KitCarlson => CharacterSpec {
                draw_style: DrawStyle::PreviewPick,
                ..CharacterSpec::base(4)
            },
            CharacterId::LuckyDuke => CharacterSpec {
                double_draw_check: true,
                ..CharacterSpec::base(4)
            },
            CharacterId::PaulRegret => CharacterSpec {
                defender_distance_bonus: 1,
                ..CharacterSpec::base(3)
            },
            CharacterId::PedroRamirez => CharacterSpec {
                draw_style: DrawStyle::DiscardFirst,
                ..CharacterSpec::base(4)
            },
            CharacterId::RoseDoolan => CharacterSpec {
                attacker_distance_bonus: 1,
                ..CharacterSpec::base(4)
            },
            CharacterId::SidKetchum => CharacterSpec {
                discard_two_to_heal: true,
                ..CharacterSpec::base(4)
            },
            CharacterId::SlabTheKiller => CharacterSpec {
                required_missed: 2,
                ..CharacterSpec::base(4)
            },
            CharacterId::SuzyLafayette => CharacterSpec {
                draws_on_empty_hand: true,
                ..CharacterSpec::base(4)
            },
            CharacterId::VultureSam => CharacterSpec {
                loots_the_dead: true,
                ..CharacterSpec::base(4)
            },
            CharacterId::WillyTheKid => CharacterSpec {
                unlimited_bangs: true,
                ..CharacterSpec::base(4)
            },
        }
    }
}
