use crate::domain::{CardKey, PlayerId};

use thiserror::Error;

/// Ошибки движка. Каждая — локальный отказ конкретной команды;
/// состояние комнаты при отказе не меняется.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Игра ещё не началась")]
    GameNotStarted,

    #[error("Игра уже идёт")]
    GameAlreadyStarted,

    #[error("Игра уже закончилась")]
    GameEnded,

    #[error("Поддерживается 4–7 игроков, а не {0}")]
    UnsupportedPlayerCount(usize),

    #[error("Игрок {0} не найден в комнате")]
    PlayerNotFound(PlayerId),

    #[error("Сейчас не ваш ход")]
    NotYourTurn,

    #[error("Вы мертвы")]
    PlayerDead,

    #[error("Сначала завершите текущее под-действие")]
    PendingInProgress,

    #[error("Нет активного под-действия")]
    NoPendingAction,

    #[error("Это под-действие разрешается другой командой")]
    WrongPendingKind,

    #[error("Сейчас отвечает не этот игрок")]
    NotYourResponse,

    #[error("Этот выбор принадлежит другому игроку")]
    NotYourChoice,

    #[error("Сейчас нельзя завершить ход")]
    CannotEndTurn,

    #[error("Карты нет в руке")]
    CardNotInHand,

    #[error("Нужно указать цель")]
    MissingTarget,

    #[error("Недопустимая цель")]
    InvalidTarget,

    #[error("Нельзя выбрать целью самого себя")]
    SelfTargetForbidden,

    #[error("Эту карту можно сыграть только на себя")]
    SelfTargetRequired,

    #[error("Цель вне досягаемости (дистанция {distance}, дальность {range})")]
    TargetOutOfRange { distance: u8, range: u8 },

    #[error("Шерифа нельзя посадить в тюрьму")]
    CannotJailSheriff,

    #[error("У вас уже есть «{0}»")]
    DuplicateEquipment(CardKey),

    #[error("Эта карта играется только в ответ")]
    ResponseCardOnly,

    #[error("Нужен MISSED (или BANG у Каламити)")]
    NeedMissed,

    #[error("Нужен BANG (или MISSED у Каламити)")]
    NeedBang,

    #[error("Пиво нельзя пить, когда в живых осталось двое")]
    BeerWithTwoPlayers,

    #[error("Здоровье уже максимальное")]
    AlreadyFullHp,

    #[error("Лимит BANG за ход: {0}")]
    BangLimitReached(u32),

    #[error("Нужно выбрать ровно {need} карт")]
    WrongPickCount { need: usize },

    #[error("Такой карты не предлагали")]
    UnknownOfferedCard,

    #[error("Сброс пуст")]
    DiscardEmpty,

    #[error("Карты закончились (колода и сброс пусты)")]
    OutOfCards,

    #[error("Эта способность не вашего персонажа")]
    NotYourAbility,

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
