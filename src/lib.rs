// Library exports for the Blockade engine and bots
// The match runner and tournament binaries are built on top of these

pub mod area;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod player;
pub mod rl;
pub mod scorer;
pub mod simple_profiler;
pub mod tournament;
pub mod types;
