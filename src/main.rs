//! Herd Watch - Entry Point
//!
//! Generates a herd, drives the simulation in a batch loop or on a live
//! timer, prints alert notifications and a summary, and optionally persists
//! the final snapshot.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::runtime::Runtime;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use herd_watch::alerts::AlertEvent;
use herd_watch::core::config::TelemetryConfig;
use herd_watch::core::error::{HerdError, Result};
use herd_watch::core::types::Category;
use herd_watch::herd::HerdCounts;
use herd_watch::persistence::{JsonFileStore, SnapshotStore};
use herd_watch::simulation::Simulation;

/// Livestock telemetry simulator with geo-fence and health alerting
#[derive(Parser, Debug)]
#[command(name = "herd-watch")]
#[command(about = "Simulate collared livestock and report alert episodes")]
struct Args {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Ticks to simulate (0 with --live runs until Ctrl-C)
    #[arg(long, default_value_t = 12)]
    ticks: u64,

    #[arg(long, allow_hyphen_values = true)]
    cattle: Option<i64>,

    #[arg(long, allow_hyphen_values = true)]
    mithun: Option<i64>,

    #[arg(long, allow_hyphen_values = true)]
    goats: Option<i64>,

    #[arg(long, allow_hyphen_values = true)]
    pigs: Option<i64>,

    #[arg(long, allow_hyphen_values = true)]
    poultry: Option<i64>,

    /// Tick on a wall-clock timer instead of as fast as possible
    #[arg(long)]
    live: bool,

    /// Wall-clock speedup for --live (2.0 runs a 5 s tick every 2.5 s)
    #[arg(long, default_value_t = 1.0)]
    speedup: f64,

    /// Save the final snapshot to this JSON file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Resume from the snapshot at --output instead of generating a herd
    #[arg(long)]
    resume: bool,

    /// Print the final snapshot as JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

impl Args {
    fn counts(&self) -> HerdCounts {
        let overrides = [
            (Category::Cattle, self.cattle),
            (Category::Mithun, self.mithun),
            (Category::Goats, self.goats),
            (Category::Pigs, self.pigs),
            (Category::Poultry, self.poultry),
        ];
        if overrides.iter().all(|(_, n)| n.is_none()) {
            return HerdCounts::dashboard();
        }
        let mut counts = HerdCounts::default();
        for (category, n) in overrides {
            counts.set(category, n.unwrap_or(0));
        }
        counts
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("herd_watch=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TelemetryConfig::load(path)?,
        None => TelemetryConfig::default(),
    };
    let mut sim = Simulation::new(config, args.seed)?;
    let mut store = args.output.as_ref().map(JsonFileStore::new);

    let resumed = match (&store, args.resume) {
        (Some(store), true) => match store.load()? {
            Some(snapshot) => {
                sim.restore(snapshot)?;
                true
            }
            None => {
                tracing::warn!(path = %store.path().display(), "no snapshot to resume from, generating a new herd");
                false
            }
        },
        (None, true) => return Err(HerdError::invalid("--resume needs --output")),
        _ => false,
    };
    if !resumed {
        print_events(&sim.reset(&args.counts())?);
    }

    if args.live {
        run_live(&mut sim, &args)?;
    } else {
        for _ in 0..args.ticks {
            print_events(&sim.tick()?);
        }
    }

    let snapshot = sim.snapshot();
    if args.json {
        println!("{}", snapshot.to_json()?);
    } else {
        print!("{}", snapshot.report());
    }

    if let Some(store) = store.as_mut() {
        store.save(&snapshot)?;
        tracing::info!(path = %store.path().display(), "snapshot written");
    }
    Ok(())
}

/// Shortest wall-clock period the live timer accepts
const MIN_LIVE_PERIOD: Duration = Duration::from_millis(1);

/// Wall-clock period between live ticks for a given speedup
fn live_period(tick_interval_seconds: f64, speedup: f64) -> Result<Duration> {
    if !speedup.is_finite() || speedup <= 0.0 {
        return Err(HerdError::invalid(format!("speedup must be positive, got {}", speedup)));
    }
    let period = Duration::try_from_secs_f64(tick_interval_seconds / speedup).map_err(|_| {
        HerdError::invalid(format!("speedup {} gives an unrepresentable tick period", speedup))
    })?;
    if period < MIN_LIVE_PERIOD {
        return Err(HerdError::invalid(format!(
            "speedup {} gives a tick period under {:?}",
            speedup, MIN_LIVE_PERIOD
        )));
    }
    Ok(period)
}

/// Tick on a tokio interval until the tick budget runs out or Ctrl-C
fn run_live(sim: &mut Simulation, args: &Args) -> Result<()> {
    let period = live_period(sim.config().tick_interval_seconds, args.speedup)?;

    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately
        interval.tick().await;

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        let mut done = 0u64;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match sim.tick() {
                        Ok(events) => print_events(&events),
                        // Keep serving the last good state
                        Err(e) => tracing::error!(error = %e, "tick failed"),
                    }
                    done += 1;
                    if args.ticks > 0 && done >= args.ticks {
                        break;
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!(ticks = done, "interrupted");
                    break;
                }
            }
        }
    });
    Ok(())
}

fn print_events(events: &[AlertEvent]) {
    for event in events {
        println!("{}", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_period_scales_with_speedup() {
        assert_eq!(live_period(5.0, 2.0).unwrap(), Duration::from_millis(2500));
        assert_eq!(live_period(5.0, 1.0).unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_live_period_rejects_extreme_speedups() {
        for speedup in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-300, 1e30, 1e4] {
            let err = live_period(5.0, speedup).unwrap_err();
            assert!(matches!(err, HerdError::InvalidArgument(_)), "{}", speedup);
        }
    }
}
