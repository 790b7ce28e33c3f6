// Tournament tool for comparing two bot setups over many seeded games
//
// Usage:
//   cargo run --release --bin tournament -- [options]
//
// Options:
//   --games <n>        Number of games (default: [tournament] games)
//   --threads <n>      Worker threads, 0 = all cores
//   --seed <n>         Base seed (default: [game] seed, random if unset)
//   --config <path>    Path to Blockade.toml (default: Blockade.toml)
//   --json             Print the statistics as JSON

use std::env;
use std::process;
use std::time::Instant;

use blockade::config::Config;
use blockade::simple_profiler;
use blockade::tournament::{run_tournament, TournamentStats};
use blockade::types::PlayerId;

fn print_usage() {
    eprintln!("Blockade Tournament Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  tournament [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --games <n>             Number of games to play");
    eprintln!("  --threads <n>           Worker threads (0 = all cores)");
    eprintln!("  --seed <n>              Base seed for the series");
    eprintln!("  --config <path>         Path to Blockade.toml (default: Blockade.toml)");
    eprintln!("  --json                  Print statistics as JSON");
    eprintln!("  --help                  Show this help message");
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    let value = value.unwrap_or_else(|| {
        eprintln!("Error: {} requires an argument", flag);
        process::exit(1);
    });
    value.parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid value '{}' for {}", value, flag);
        process::exit(1);
    })
}

fn print_report(config: &Config, stats: &TournamentStats, elapsed_ms: u128) {
    let name = |kind: &str, weights: &Option<Vec<f64>>| match weights {
        Some(w) if kind == "optimized" => format!("{} {:?}", kind, w),
        _ => kind.to_string(),
    };

    println!("\n═══════════════════════════════════════════════════════════");
    println!("                  TOURNAMENT REPORT");
    println!("═══════════════════════════════════════════════════════════");
    println!("Arena:          {}x{}", config.arena.size, config.arena.size);
    println!("Player 1:       {}", name(&config.player1.kind, &config.player1.weights));
    println!("Player 2:       {}", name(&config.player2.kind, &config.player2.weights));
    println!("Games:          {}", stats.games);
    println!(
        "Player 1 wins:  {} ({:.1}%)",
        stats.player1_wins,
        stats.win_rate(PlayerId::One)
    );
    println!(
        "Player 2 wins:  {} ({:.1}%)",
        stats.player2_wins,
        stats.win_rate(PlayerId::Two)
    );
    println!("Draws:          {}", stats.draws);
    println!("Errors:         {}", stats.errors);
    println!("Average length: {:.1} moves", stats.average_moves());
    println!("Time:           {}ms", elapsed_ms);
    println!("═══════════════════════════════════════════════════════════\n");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }

    let mut config_path = "Blockade.toml".to_string();
    let mut games = None;
    let mut threads = None;
    let mut seed = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                games = Some(parse_number("--games", args.get(i + 1)));
                i += 1;
            }
            "--threads" => {
                threads = Some(parse_number("--threads", args.get(i + 1)));
                i += 1;
            }
            "--seed" => {
                seed = Some(parse_number("--seed", args.get(i + 1)));
                i += 1;
            }
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                }
                config_path = args[i + 1].clone();
                i += 1;
            }
            "--json" => {
                json = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    if let Some(games) = games {
        config.tournament.games = games;
    }
    if let Some(threads) = threads {
        config.tournament.threads = threads;
    }
    let base_seed = seed.unwrap_or_else(|| config.game.resolved_seed());

    let start_time = Instant::now();
    let stats = run_tournament(&config, base_seed).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    let elapsed = start_time.elapsed().as_millis();

    if json {
        match serde_json::to_string_pretty(&stats) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: failed to serialize statistics: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_report(&config, &stats, elapsed);
    }

    simple_profiler::print_report(elapsed as u64);

    if stats.errors > 0 {
        process::exit(2);
    }
}
