//! Дистанции и досягаемость целей.
//!
//! Дистанция считается по кругу рассадки, причём только по живым местам:
//! мёртвые стулья «выпадают» из круга.

use crate::domain::{CardKey, Player, PlayerId, Room, WeaponKind};

/// Кратчайшая круговая дистанция между двумя живыми местами
/// (минимум из обхода по и против часовой стрелки). До самого себя — 0.
pub fn seat_distance(room: &Room, from_id: PlayerId, to_id: PlayerId) -> Option<u8> {
    if from_id == to_id {
        return Some(0);
    }

    let from = room.player_index(from_id)?;
    let to = room.player_index(to_id)?;
    if !room.players[to].is_alive {
        return None;
    }

    let cw = walk_distance(room, from, to, true)?;
    let ccw = walk_distance(room, from, to, false)?;
    Some(cw.min(ccw))
}

/// Количество живых шагов от `from` до `to` в одном направлении.
fn walk_distance(room: &Room, from: usize, to: usize, clockwise: bool) -> Option<u8> {
    let n = room.players.len();
    let mut cur = from;
    let mut steps: u8 = 0;

    for _ in 0..n {
        cur = if clockwise {
            (cur + 1) % n
        } else {
            (cur + n - 1) % n
        };
        if cur == to {
            return Some(steps + 1);
        }
        if room.players[cur].is_alive {
            steps += 1;
        }
        if cur == from {
            break;
        }
    }
    None
}

/// Эффективная дистанция с учётом модификаторов: мустанг/Paul Regret
/// у защитника (+1 каждый), прицел/Rose Doolan у атакующего (−1 каждый).
/// Никогда не меньше 1.
pub fn effective_distance(room: &Room, attacker_id: PlayerId, defender_id: PlayerId) -> Option<u8> {
    let attacker = room.player(attacker_id)?;
    let defender = room.player(defender_id)?;

    let mut d = seat_distance(room, attacker_id, defender_id)? as i16;

    if defender.has_equipment(CardKey::Mustang) {
        d += 1;
    }
    d += defender.spec().defender_distance_bonus as i16;

    if attacker.has_equipment(CardKey::Scope) {
        d -= 1;
    }
    d -= attacker.spec().attacker_distance_bonus as i16;

    Some(d.max(1) as u8)
}

/// Дальность стрельбы: 1 без оружия, иначе по типу оружия.
pub fn weapon_range(player: &Player) -> u8 {
    player
        .weapon()
        .and_then(|c| c.weapon)
        .map(WeaponKind::range)
        .unwrap_or(1)
}
