use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Terminal outcome of one local-avoidance session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AvoidanceOutcome {
    /// The full target distance was covered.
    Done,
    /// An obstacle persisted through every turn attempt; the session gave
    /// up early and `distance_m` in the report holds the partial progress.
    Stuck {
        /// Turn attempts spent on the encounter that could not be cleared.
        attempts: u32,
    },
}

/// Result of a local-avoidance session, handed back to the planner as an
/// observation so it can decide whether to replan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AvoidanceReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: AvoidanceOutcome,
    /// Distance the caller asked for, in metres.
    pub target_m: f64,
    /// Distance actually advanced, in metres (reroute legs included).
    pub distance_m: f64,
    /// Number of regular forward steps issued.
    pub steps: u32,
    /// Total heading changes issued across all obstacle encounters.
    pub turn_attempts: u32,
    /// Number of encounters cleared by a turn followed by a reroute leg.
    pub reroutes: u32,
    /// Heading at the end of the session, degrees in `[-180, 180)`.
    pub final_heading_deg: f64,
}

impl AvoidanceReport {
    pub fn is_done(&self) -> bool {
        matches!(self.outcome, AvoidanceOutcome::Done)
    }
}

/// Vehicle pose flattened into aviation-friendly units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseReport {
    pub north_m: f64,
    pub east_m: f64,
    /// Height above the NED origin (the negated down coordinate).
    pub altitude_m: f64,
    pub roll_deg: f64,
    pub pitch_deg: f64,
    pub yaw_deg: f64,
    /// Orientation quaternion in (w, x, y, z) order.
    pub orientation_wxyz: [f64; 4],
}

/// Error type shared by the vehicle interfaces, the controller and the
/// pose reporting path.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkyError {
    #[error("Hardware Fault on {component}: {details}")]
    HardwareFault { component: String, details: String },

    #[error("Sensor '{sensor}' unavailable: {details}")]
    SensorUnavailable { sensor: String, details: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
