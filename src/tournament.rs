// Batch play between the two configured bots
//
// Games run on a rayon pool. Sides alternate so neither configured player
// always gets the same starting corner, and every game is seeded from the
// base seed plus its index so a series replays exactly.

use log::{debug, error};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::Config;
use crate::engine::Game;
use crate::error::{ConfigError, TournamentError};
use crate::player::{build_player, PlayerKind};
use crate::simple_profiler;
use crate::types::{GameOutcome, PlayerId};

/// Result of one tournament game, from the configured players' view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub index: usize,
    pub outcome: GameOutcome,
    pub moves: usize,
    /// Configured player 1 played as player 2 in this game
    pub swapped: bool,
}

impl GameRecord {
    /// Winner in terms of the configuration's player1/player2
    pub fn configured_winner(&self) -> Option<PlayerId> {
        let winner = self.outcome.winner()?;
        Some(if self.swapped { winner.opponent() } else { winner })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TournamentStats {
    pub games: usize,
    pub player1_wins: usize,
    pub player2_wins: usize,
    pub draws: usize,
    pub errors: usize,
    pub total_moves: usize,
}

impl TournamentStats {
    pub fn record(&mut self, record: &GameRecord) {
        self.games += 1;
        self.total_moves += record.moves;
        match record.configured_winner() {
            Some(PlayerId::One) => self.player1_wins += 1,
            Some(PlayerId::Two) => self.player2_wins += 1,
            None => self.draws += 1,
        }
    }

    pub fn average_moves(&self) -> f64 {
        if self.games > 0 {
            self.total_moves as f64 / self.games as f64
        } else {
            0.0
        }
    }

    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        let wins = match player {
            PlayerId::One => self.player1_wins,
            PlayerId::Two => self.player2_wins,
        };
        100.0 * wins as f64 / self.games as f64
    }
}

/// Plays game number `index` of a series to completion
pub fn play_one(
    config: &Config,
    index: usize,
    base_seed: u64,
) -> Result<GameRecord, TournamentError> {
    let seed = base_seed.wrapping_add(2 * index as u64);
    let swapped = index % 2 == 1;

    let first = build_player(&config.player1, seed)?;
    let second = build_player(&config.player2, seed.wrapping_add(1))?;
    let (player1, player2) = if swapped { (second, first) } else { (first, second) };

    let mut game =
        Game::new(config.arena.size, player1, player2)?.with_parallel(config.game.parallel_bots);

    let outcome = game.run().map_err(|source| TournamentError::Game {
        index,
        seed,
        source,
    })?;
    if !outcome.is_terminal() {
        return Err(TournamentError::Unfinished(index));
    }

    debug!("Game {}: {} after {} moves", index, outcome, game.moves_made());
    Ok(GameRecord {
        index,
        outcome,
        moves: game.moves_made(),
        swapped,
    })
}

/// Plays `config.tournament.games` games and aggregates the results
pub fn run_tournament(config: &Config, base_seed: u64) -> Result<TournamentStats, ConfigError> {
    config.validate()?;
    for player in [&config.player1, &config.player2] {
        let kind = player.kind()?;
        if kind.is_human() {
            return Err(ConfigError::UnsupportedPlayer(kind.to_string()));
        }
        if kind == PlayerKind::Rl {
            return Err(ConfigError::MissingPolicy);
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.tournament.threads)
        .build()?;

    let stats = Mutex::new(TournamentStats::default());
    pool.install(|| {
        (0..config.tournament.games).into_par_iter().for_each(|index| {
            match play_one(config, index, base_seed) {
                Ok(record) => stats.lock().record(&record),
                Err(e) => {
                    error!("{}", e);
                    stats.lock().errors += 1;
                }
            }
            simple_profiler::merge_thread_local();
        });
    });

    Ok(stats.into_inner())
}
