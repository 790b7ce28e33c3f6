//! Simple profiling using thread-local storage
//!
//! Lightweight timing without changing function signatures.
//! Enable with environment variable: BLOCKADE_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

thread_local! {
    static LEGAL_MOVES_TIME: RefCell<u64> = RefCell::new(0);
    static LEGAL_MOVES_COUNT: RefCell<usize> = RefCell::new(0);

    static FLOOD_FILL_TIME: RefCell<u64> = RefCell::new(0);
    static FLOOD_FILL_COUNT: RefCell<usize> = RefCell::new(0);

    static SCORE_TIME: RefCell<u64> = RefCell::new(0);
    static SCORE_COUNT: RefCell<usize> = RefCell::new(0);

    static TURN_TIME: RefCell<u64> = RefCell::new(0);
    static TURN_COUNT: RefCell<usize> = RefCell::new(0);
}

// Global aggregators
static GLOBAL_LEGAL_MOVES_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_LEGAL_MOVES_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_FLOOD_FILL_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_FLOOD_FILL_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_SCORE_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_SCORE_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_TURN_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_TURN_COUNT: AtomicUsize = AtomicUsize::new(0);

static PROFILING_ENABLED: OnceLock<bool> = OnceLock::new();

#[inline]
pub fn is_profiling_enabled() -> bool {
    *PROFILING_ENABLED.get_or_init(|| std::env::var("BLOCKADE_PROFILE").is_ok())
}

pub struct ProfileGuard {
    start: Instant,
    category: &'static str,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                category,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;

        let (time, count) = match self.category {
            "legal_moves" => (&LEGAL_MOVES_TIME, &LEGAL_MOVES_COUNT),
            "flood_fill" => (&FLOOD_FILL_TIME, &FLOOD_FILL_COUNT),
            "score" => (&SCORE_TIME, &SCORE_COUNT),
            "turn" => (&TURN_TIME, &TURN_COUNT),
            _ => return,
        };
        time.with(|t| *t.borrow_mut() += elapsed_ns);
        count.with(|c| *c.borrow_mut() += 1);
    }
}

/// Moves this thread's counters into the global totals
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    let pairs = [
        (
            &LEGAL_MOVES_TIME,
            &LEGAL_MOVES_COUNT,
            &GLOBAL_LEGAL_MOVES_TIME,
            &GLOBAL_LEGAL_MOVES_COUNT,
        ),
        (
            &FLOOD_FILL_TIME,
            &FLOOD_FILL_COUNT,
            &GLOBAL_FLOOD_FILL_TIME,
            &GLOBAL_FLOOD_FILL_COUNT,
        ),
        (&SCORE_TIME, &SCORE_COUNT, &GLOBAL_SCORE_TIME, &GLOBAL_SCORE_COUNT),
        (&TURN_TIME, &TURN_COUNT, &GLOBAL_TURN_TIME, &GLOBAL_TURN_COUNT),
    ];

    for (time, count, global_time, global_count) in pairs {
        time.with(|t| {
            global_time.fetch_add(*t.borrow(), Ordering::Relaxed);
            *t.borrow_mut() = 0;
        });
        count.with(|c| {
            global_count.fetch_add(*c.borrow(), Ordering::Relaxed);
            *c.borrow_mut() = 0;
        });
    }
}

fn print_category(label: &str, time_ns: u64, count: usize, total_ns: u64) {
    let ms = time_ns as f64 / 1_000_000.0;
    let pct = if total_ns > 0 {
        100.0 * time_ns as f64 / total_ns as f64
    } else {
        0.0
    };
    let avg_us = if count > 0 {
        time_ns as f64 / (count * 1000) as f64
    } else {
        0.0
    };

    eprintln!("{}:", label);
    eprintln!("  Time:     {:.2}ms ({:.1}%)", ms, pct);
    eprintln!("  Calls:    {}", count);
    eprintln!("  Avg:      {:.2}µs/call\n", avg_us);
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    print_category(
        "Turns",
        GLOBAL_TURN_TIME.load(Ordering::Relaxed),
        GLOBAL_TURN_COUNT.load(Ordering::Relaxed),
        total_ns,
    );
    print_category(
        "Legal Move Generation",
        GLOBAL_LEGAL_MOVES_TIME.load(Ordering::Relaxed),
        GLOBAL_LEGAL_MOVES_COUNT.load(Ordering::Relaxed),
        total_ns,
    );
    print_category(
        "Move Scoring",
        GLOBAL_SCORE_TIME.load(Ordering::Relaxed),
        GLOBAL_SCORE_COUNT.load(Ordering::Relaxed),
        total_ns,
    );
    print_category(
        "Flood Fill",
        GLOBAL_FLOOD_FILL_TIME.load(Ordering::Relaxed),
        GLOBAL_FLOOD_FILL_COUNT.load(Ordering::Relaxed),
        total_ns,
    );

    eprintln!("═══════════════════════════════════════════════════════════\n");
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
