//! Alert de-duplication: one notification per episode, not per tick

pub mod episode;
pub mod ledger;

pub use episode::{AlertEpisode, AlertEvent, AlertKind};
pub use ledger::{AlertLedger, Observation};
