use log::{error, info};
use std::env;
use std::process;
use std::time::Instant;

use blockade::config::Config;
use blockade::engine::Game;
use blockade::simple_profiler;
use blockade::types::PlayerId;

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    // Optional path to an alternative config file
    let config = match env::args().nth(1) {
        Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
            error!("Invalid config {}: {}", path, e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };

    for player in [&config.player1, &config.player2] {
        if matches!(player.kind(), Ok(kind) if kind.is_human()) {
            error!("Human players need a front end; the headless runner only plays bots");
            process::exit(1);
        }
    }

    let mut game = Game::from_config(&config).unwrap_or_else(|e| {
        error!("Could not set up the game: {}", e);
        process::exit(1);
    });

    info!(
        "Starting Blockade on a {}x{} arena: {} vs {}",
        config.arena.size,
        config.arena.size,
        game.player(PlayerId::One).name(),
        game.player(PlayerId::Two).name()
    );

    let start_time = Instant::now();
    let outcome = game.run().unwrap_or_else(|e| {
        error!("Engine invariant violated: {}", e);
        process::exit(2);
    });

    println!("{}", game.grid());
    println!("{} after {} moves", outcome, game.moves_made());

    simple_profiler::merge_thread_local();
    simple_profiler::print_report(start_time.elapsed().as_millis() as u64);
}
