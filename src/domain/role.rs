use core::fmt;

use serde::{Deserialize, Serialize};

/// Роль игрока. Шериф всегда открыт, остальные скрыты до смерти.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Sheriff,
    Deputy,
    Outlaw,
    Renegade,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Sheriff => "sheriff",
            Role::Deputy => "deputy",
            Role::Outlaw => "outlaw",
            Role::Renegade => "renegade",
        };
        write!(f, "{s}")
    }
}

/// Победившая фракция.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    /// Шериф и помощники.
    Sheriff,
    Outlaws,
    Renegade,
}

/// Раскладка ролей для n игроков (4–7, как в базовой игре).
pub fn roles_for(n: usize) -> Option<Vec<Role>> {
    use Role::*;
    let roles = match n {
        4 => vec![Sheriff, Outlaw, Outlaw, Renegade],
        5 => vec![Sheriff, Outlaw, Outlaw, Renegade, Deputy],
        6 => vec![Sheriff, Outlaw, Outlaw, Outlaw, Renegade, Deputy],
        7 => vec![Sheriff, Outlaw, Outlaw, Outlaw, Renegade, Deputy, Deputy],
        _ => return None,
    };
    Some(roles)
}
