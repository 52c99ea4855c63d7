//! Per-(subject, kind) Clear/Open state machine
//!
//! The ledger owns every episode ever opened. An index of open episodes keyed
//! by (subject, kind) enforces that a pair never has two open at once.

use ahash::AHashMap;
use rand::Rng;
use uuid::Builder;

use crate::alerts::episode::{AlertEpisode, AlertEvent, AlertKind};
use crate::core::error::{HerdError, Result};
use crate::core::types::{AnimalId, SimTime};

/// Previous and current violation state for one (subject, kind) pair
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub subject: AnimalId,
    pub kind: AlertKind,
    pub was_violating: bool,
    pub is_violating: bool,
    /// Recorded on the episode if this observation opens one
    pub detail: String,
}

#[derive(Debug, Clone, Default)]
pub struct AlertLedger {
    episodes: Vec<AlertEpisode>,
    open: AHashMap<(AnimalId, AlertKind), usize>,
}

impl AlertLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from stored history
    ///
    /// Fails if two open episodes share a (subject, kind) pair.
    pub fn from_episodes(episodes: Vec<AlertEpisode>) -> Result<Self> {
        let mut open = AHashMap::new();
        for (index, episode) in episodes.iter().enumerate() {
            if !episode.is_open() {
                continue;
            }
            let key = (episode.subject_id.clone(), episode.kind);
            if open.insert(key, index).is_some() {
                return Err(HerdError::inconsistent(format!(
                    "two open {} episodes for {}",
                    episode.kind, episode.subject_id
                )));
            }
        }
        Ok(Self { episodes, open })
    }

    /// Apply one observation, emitting at most one event
    ///
    /// Clear→Open opens an episode, Open→Clear closes it, anything else is
    /// a no-op. The caller's view of the previous status must agree with the
    /// ledger; a mismatch means state has diverged and is reported rather
    /// than repaired.
    pub fn observe<R: Rng + ?Sized>(
        &mut self,
        observation: Observation,
        now: SimTime,
        rng: &mut R,
    ) -> Result<Option<AlertEvent>> {
        let key = (observation.subject, observation.kind);
        let is_open = self.open.contains_key(&key);

        if is_open != observation.was_violating {
            return Err(HerdError::inconsistent(format!(
                "{} {} was {} but ledger has {} episode",
                key.0,
                key.1,
                if observation.was_violating { "violating" } else { "clear" },
                if is_open { "an open" } else { "no open" },
            )));
        }

        match (observation.was_violating, observation.is_violating) {
            (false, true) => {
                let id = Builder::from_random_bytes(rng.gen()).into_uuid();
                tracing::warn!(subject = %key.0, kind = %key.1, detail = %observation.detail, "alert opened");
                let event = AlertEvent::Opened {
                    episode_id: id,
                    subject_id: key.0.clone(),
                    kind: key.1,
                    at: now,
                    detail: observation.detail.clone(),
                };
                self.episodes.push(AlertEpisode {
                    id,
                    subject_id: key.0.clone(),
                    kind: key.1,
                    opened_at: now,
                    closed_at: None,
                    acknowledged: false,
                    detail: observation.detail,
                });
                self.open.insert(key, self.episodes.len() - 1);
                Ok(Some(event))
            }
            (true, false) => {
                let index = self.open.remove(&key).ok_or_else(|| {
                    HerdError::inconsistent(format!("open index lost for {} {}", key.0, key.1))
                })?;
                let episode = self.episodes.get_mut(index).ok_or_else(|| {
                    HerdError::inconsistent(format!("episode index {} out of range", index))
                })?;
                episode.closed_at = Some(now);
                tracing::info!(subject = %key.0, kind = %key.1, "alert resolved");
                Ok(Some(AlertEvent::Resolved {
                    episode_id: episode.id,
                    subject_id: key.0,
                    kind: key.1,
                    at: now,
                }))
            }
            _ => Ok(None),
        }
    }

    /// Mark the open episode for a pair as seen
    ///
    /// Acknowledging does not close the episode.
    pub fn acknowledge(&mut self, subject: &AnimalId, kind: AlertKind) -> Result<&AlertEpisode> {
        let index = *self.open.get(&(subject.clone(), kind)).ok_or_else(|| {
            HerdError::invalid(format!("no open {} alert for {}", kind, subject))
        })?;
        let episode = self.episodes.get_mut(index).ok_or_else(|| {
            HerdError::inconsistent(format!("episode index {} out of range", index))
        })?;
        episode.acknowledged = true;
        Ok(episode)
    }

    /// Close every open episode without emitting notifications
    pub fn close_all(&mut self, now: SimTime) -> usize {
        let closed = self.open.len();
        for (_, index) in self.open.drain() {
            if let Some(episode) = self.episodes.get_mut(index) {
                episode.closed_at = Some(now);
            }
        }
        closed
    }

    pub fn is_open(&self, subject: &AnimalId, kind: AlertKind) -> bool {
        self.open.contains_key(&(subject.clone(), kind))
    }

    pub fn open_episode(&self, subject: &AnimalId, kind: AlertKind) -> Option<&AlertEpisode> {
        self.open
            .get(&(subject.clone(), kind))
            .and_then(|&index| self.episodes.get(index))
    }

    /// Every episode in the order it was opened
    pub fn episodes(&self) -> &[AlertEpisode] {
        &self.episodes
    }

    pub fn open_episodes(&self) -> impl Iterator<Item = &AlertEpisode> {
        self.episodes.iter().filter(|e| e.is_open())
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Verify the open index agrees with episode history
    pub fn check_invariants(&self) -> Result<()> {
        for ((subject, kind), &index) in &self.open {
            match self.episodes.get(index) {
                Some(e) if e.is_open() && &e.subject_id == subject && e.kind == *kind => {}
                _ => {
                    return Err(HerdError::inconsistent(format!(
                        "open index for {} {} does not point at its episode",
                        subject, kind
                    )))
                }
            }
        }
        let open_total = self.episodes.iter().filter(|e| e.is_open()).count();
        if open_total != self.open.len() {
            return Err(HerdError::inconsistent(format!(
                "{} open episodes but {} indexed",
                open_total,
                self.open.len()
            )));
        }
        Ok(())
    }
}
