//! Отладочный прогон партии без транспорта: четыре простых бота,
//! детерминированный RNG, события печатаются в stdout как JSON.
//!
//! Запуск: `RUST_LOG=debug cargo run --bin bang_dev_cli [seed]`

use bang_engine::api::commands::DrawSource;
use bang_engine::api::{handle_command, Command, Event, Outbox};
use bang_engine::domain::{CardKey, Pending, Phase, Player, PlayerId, Role, Room};
use bang_engine::engine::{scheduler, RoomRegistry, TICK_INTERVAL_MS};
use bang_engine::infra::{DeterministicRng, IdGenerator};

const ROOM: &str = "DEV1";
const MAX_TICKS: u64 = 100_000;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let mut rng = DeterministicRng::new(seed);
    let ids = IdGenerator::new();
    let mut registry = RoomRegistry::new();

    {
        let room = registry.create(ROOM.to_string()).expect("код свободен");
        for name in ["Алиса", "Боб", "Чарли", "Дана"] {
            let id = ids.next_player_id();
            room.players.push(Player::new(
                id,
                name.to_string(),
                Role::Outlaw,
                bang_engine::domain::CharacterId::BartCassidy,
            ));
        }
    }

    let mut now = 1_000_000u64;
    let mut out = Outbox::new();
    let mut next_card_id = || ids.next_card_id();

    let starter = registry.get(ROOM).and_then(|r| r.players.first().map(|p| p.id));
    let starter = starter.expect("в комнате есть игроки");
    handle_command(
        &mut registry,
        ROOM,
        starter,
        Command::StartGame,
        now,
        &mut next_card_id,
        &mut rng,
        &mut out,
    )
    .expect("старт четырёх игроков проходит");
    print_events(&mut out);

    for _ in 0..MAX_TICKS {
        now += TICK_INTERVAL_MS;

        let action = registry.get(ROOM).and_then(pick_bot_action);
        if let Some((player_id, command)) = action {
            // Боты ошибаются только из-за гонок с таймаутами; это не фатально.
            let _ = handle_command(
                &mut registry,
                ROOM,
                player_id,
                command,
                now,
                &mut next_card_id,
                &mut rng,
                &mut out,
            );
        }

        scheduler::tick(&mut registry, now, &mut rng, &mut out);
        if print_events(&mut out) {
            break;
        }
    }
}

/// Простейшая стратегия: отвечаем первой подходящей картой, играем
/// первый BANG по ближней цели, иначе завершаем ход.
fn pick_bot_action(room: &Room) -> Option<(PlayerId, Command)> {
    if room.ended || !room.started {
        return None;
    }

    if let Some(pending) = &room.pending {
        let responder = pending.responder()?;
        let player = room.player(responder)?;
        let command = match pending {
            Pending::Bang { .. } | Pending::Gatling { .. } => Command::Respond {
                card_id: first_card(player, CardKey::Missed),
            },
            Pending::Indians { .. } | Pending::Duel { .. } => Command::Respond {
                card_id: first_card(player, CardKey::Bang),
            },
            Pending::DrawChoice {
                offered,
                pick_count,
                ..
            } => Command::ChooseDraw {
                card_ids: offered.iter().take(*pick_count).map(|c| c.id).collect(),
            },
            Pending::StealChoice { .. } => Command::ChooseTargetOrSkip { target_id: None },
            Pending::SourceChoice { .. } => Command::ChooseDrawSource {
                source: DrawSource::Deck,
            },
            Pending::DiscardLimit { need, .. } => Command::DiscardToLimit {
                card_ids: player.hand.iter().take(*need).map(|c| c.id).collect(),
            },
        };
        return Some((responder, command));
    }

    if room.phase != Phase::Main {
        return None;
    }
    let player = room.current_player()?;
    if !player.is_alive {
        return None;
    }

    if room.bangs_used_this_turn == 0 {
        if let Some(card_id) = first_card(player, CardKey::Bang) {
            // Ближайшая живая цель; если она вне дальности, движок
            // откажет и бот просто закончит ход на следующем тике.
            let target = room
                .others_in_seat_order(player.id)
                .first()
                .copied();
            if let Some(target_id) = target {
                return Some((
                    player.id,
                    Command::PlayCard {
                        card_id,
                        target_id: Some(target_id),
                    },
                ));
            }
        }
    }

    Some((player.id, Command::EndTurn))
}

fn first_card(player: &Player, key: CardKey) -> Option<u64> {
    player.hand.iter().find(|c| c.key == key).map(|c| c.id)
}

/// Печатает накопленные события; true, если игра закончилась.
fn print_events(out: &mut Outbox) -> bool {
    let mut game_over = false;
    for outbound in out.drain() {
        if matches!(outbound.event, Event::GameOver { .. }) {
            game_over = true;
        }
        match serde_json::to_string(&outbound.event) {
            Ok(json) => println!("{:?} <- {json}", outbound.recipient),
            Err(e) => eprintln!("сериализация события: {e}"),
        }
    }
    game_over
}
