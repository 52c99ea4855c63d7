//! Alert episodes and the notifications they emit

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::{AnimalId, SimTime};

/// What an episode is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    GeoFence,
    Health,
}

impl AlertKind {
    pub const ALL: [AlertKind; 2] = [AlertKind::GeoFence, AlertKind::Health];

    pub fn name(&self) -> &'static str {
        match self {
            AlertKind::GeoFence => "geo_fence",
            AlertKind::Health => "health",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One continuous period during which a subject violated a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEpisode {
    pub id: Uuid,
    pub subject_id: AnimalId,
    pub kind: AlertKind,
    pub opened_at: SimTime,
    /// `None` while the condition is still violated
    pub closed_at: Option<SimTime>,
    pub acknowledged: bool,
    /// Human-readable reason captured when the episode opened
    pub detail: String,
}

impl AlertEpisode {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

/// Notification emitted on an episode transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AlertEvent {
    Opened {
        episode_id: Uuid,
        subject_id: AnimalId,
        kind: AlertKind,
        at: SimTime,
        detail: String,
    },
    Resolved {
        episode_id: Uuid,
        subject_id: AnimalId,
        kind: AlertKind,
        at: SimTime,
    },
}

impl AlertEvent {
    pub fn episode_id(&self) -> Uuid {
        match self {
            AlertEvent::Opened { episode_id, .. } | AlertEvent::Resolved { episode_id, .. } => *episode_id,
        }
    }

    pub fn subject_id(&self) -> &AnimalId {
        match self {
            AlertEvent::Opened { subject_id, .. } | AlertEvent::Resolved { subject_id, .. } => subject_id,
        }
    }

    pub fn kind(&self) -> AlertKind {
        match self {
            AlertEvent::Opened { kind, .. } | AlertEvent::Resolved { kind, .. } => *kind,
        }
    }

    pub fn is_opened(&self) -> bool {
        matches!(self, AlertEvent::Opened { .. })
    }
}

impl std::fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertEvent::Opened { subject_id, kind, at, detail, .. } => {
                write!(f, "[t={}] NEW {} alert for {}: {}", at.tick, kind, subject_id, detail)
            }
            AlertEvent::Resolved { subject_id, kind, at, .. } => {
                write!(f, "[t={}] RESOLVED {} alert for {}", at.tick, kind, subject_id)
            }
        }
    }
}
