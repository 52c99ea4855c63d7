//! Tick-driven simulation
//!
//! [`step`] is the pure transition `(state, elapsed, rng) -> (state, events)`.
//! [`Simulation`] drives it from a clock, a test harness or a batch loop.

pub mod runner;
pub mod step;

pub use runner::Simulation;
pub use step::{step, HerdState, StepOutcome};
