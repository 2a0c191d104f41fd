//! Range analysis of a counting loop.
//!
//! ```text
//! i = 0;
//! while i < bound { i = i + step; }
//! ```
//!
//! The loop head is computed by Kleene iteration over an
//! [`EnvironmentDomain`] of intervals: plain joins for the first few rounds,
//! widening afterwards (optionally stopping at user-supplied thresholds), then
//! a few narrowing passes to recover the bound lost by widening.

use clap::Parser;
use log::debug;

use abstract_domains::{AbstractDomain, AccessPath, EnvironmentDomain, IntInterval, WideningThresholds};

#[derive(Debug, Parser)]
#[command(author, version, about = "Interval analysis of `i = 0; while i < bound { i += step }`")]
struct Cli {
    /// Loop bound.
    #[arg(long, value_name = "INT", default_value = "100")]
    bound: i64,

    /// Increment per iteration.
    #[arg(long, value_name = "INT", default_value = "1")]
    step: i64,

    /// Widening thresholds, comma-separated.
    #[arg(long, value_name = "INT,...", value_delimiter = ',')]
    thresholds: Vec<i64>,

    /// Number of plain joins before widening kicks in.
    #[arg(long, value_name = "INT", default_value = "2")]
    delay: usize,

    /// Number of narrowing passes after stabilization.
    #[arg(long, value_name = "INT", default_value = "2")]
    narrowing: usize,

    /// Upper limit on the number of ascending iterations.
    #[arg(long, value_name = "INT", default_value = "100")]
    max_iterations: usize,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: simplelog::LevelFilter,
}

type State = EnvironmentDomain<IntInterval>;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    let i = AccessPath::variable("i");
    let guard = IntInterval::at_most(args.bound.saturating_sub(1));
    let step = IntInterval::constant(args.step);
    let thresholds = WideningThresholds::new(args.thresholds.iter().copied());

    let mut entry = State::new();
    entry.put(&i, IntInterval::constant(0));

    // One trip through the loop body, guard included.
    let body = |head: &State| {
        let mut next = head.copy_of();
        next.update(&i, |v| {
            v.meet_with(&guard);
            *v = v.add(&step);
        });
        next
    };

    let mut head = entry.copy_of();
    let mut iterations = 0;
    loop {
        if iterations >= args.max_iterations {
            color_eyre::eyre::bail!("no fixpoint after {} iterations", iterations);
        }
        iterations += 1;

        let next = entry.join(&body(&head));
        let mut candidate = head.copy_of();
        if iterations <= args.delay {
            candidate.join_with(&next);
        } else if thresholds.values().is_empty() {
            candidate.widen_with(&next);
        } else {
            let mut value = head.get(&i);
            value.widen_with_thresholds(&next.get(&i), &thresholds);
            candidate.put(&i, value);
        }
        debug!("iteration {}: head = {}, next = {}, candidate = {}", iterations, head, next, candidate);

        if candidate.leq(&head) {
            break;
        }
        head = candidate;
    }
    println!("Stabilized after {} iterations: {}", iterations, head);

    for pass in 1..=args.narrowing {
        let next = entry.join(&body(&head));
        let narrowed = head.narrow(&next);
        debug!("narrowing pass {}: {}", pass, narrowed);
        if narrowed == head {
            break;
        }
        head = narrowed;
    }
    println!("Loop head invariant: i ∈ {}", head.get(&i));

    let mut exit = head.copy_of();
    exit.update(&i, |v| v.meet_with(&IntInterval::at_least(args.bound)));
    println!("Loop exit: i ∈ {}", exit.get(&i));

    Ok(())
}
