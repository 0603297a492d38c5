use thiserror::Error;

use crate::engine::EngineError;

/// Ошибки внешнего слоя: либо не нашли комнату, либо отказ движка.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Комната не найдена")]
    RoomNotFound,

    #[error(transparent)]
    Engine(#[from] EngineError),
}
