//! Tsuro Referee
//!
//! Runs one demo match between reference players and prints the result
//! as JSON.
//!
//! Usage: `tsuro-referee [players] [seed]`. The per-call agent timeout can
//! be set in milliseconds with `TSURO_AGENT_TIMEOUT_MS`.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tsuro::{
    game::RuleChecker,
    player::{ClockwiseStrategy, CounterClockwiseStrategy, Player, SafeStrategy},
    referee::{shared, RefereeConfig, SharedAgent, ShuffledTiles, TracingObserver},
    Referee, MAX_AGENTS, MIN_AGENTS, VERSION,
};

const DEFAULT_PLAYERS: usize = 3;
const DEFAULT_SEED: u64 = 12345;
const TIMEOUT_VAR: &str = "TSURO_AGENT_TIMEOUT_MS";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Tsuro Referee v{}", VERSION);

    let mut args = std::env::args().skip(1);
    let players = match args.next() {
        Some(arg) => arg.parse::<usize>().with_context(|| format!("invalid player count {arg:?}"))?,
        None => DEFAULT_PLAYERS,
    };
    if !(MIN_AGENTS..=MAX_AGENTS).contains(&players) {
        bail!("player count must be between {MIN_AGENTS} and {MAX_AGENTS}, not {players}");
    }
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>().with_context(|| format!("invalid seed {arg:?}"))?,
        None => DEFAULT_SEED,
    };

    let mut config = RefereeConfig::default();
    if let Ok(value) = std::env::var(TIMEOUT_VAR) {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("{TIMEOUT_VAR} must be a number of milliseconds"))?;
        config.agent_timeout = Duration::from_millis(millis);
    }

    info!(players, seed, timeout = ?config.agent_timeout, "=== Starting Demo Match ===");

    let roster: Vec<SharedAgent> = (0..players).map(demo_player).collect();
    let mut referee = Referee::new(config);
    let colors = referee.set_roster(roster)?;
    referee.set_rule_checker(RuleChecker::new())?;
    referee.set_tile_source(ShuffledTiles::new(seed))?;
    referee.add_observer(TracingObserver);

    info!(match_id = %referee.id(), ?colors, "roster seated");
    let result = referee.run_match().await?;

    info!("=== Match Results ===");
    for (place, tier) in result.ranking.iter().enumerate() {
        info!("#{}: {:?}", place + 1, tier);
    }
    if !result.cheaters.is_empty() {
        info!("Cheaters: {:?}", result.cheaters);
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Reference players rotate through the three strategies by seat.
fn demo_player(seat: usize) -> SharedAgent {
    match seat % 3 {
        0 => shared(Player::new(SafeStrategy)),
        1 => shared(Player::new(CounterClockwiseStrategy)),
        _ => shared(Player::new(ClockwiseStrategy)),
    }
}
