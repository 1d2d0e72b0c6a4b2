//! [`LocalAvoidance`] – reactive obstacle avoidance for a straight-line leg.
//!
//! Flies the vehicle forward by a target distance along its current heading,
//! checking the forward sector before every step.  When an obstacle is
//! closer than the safety distance the controller turns by a fixed
//! increment and re-checks, up to a bounded number of attempts.  A clear
//! reading after a turn is followed by a fixed reroute leg, flown without
//! checking, before normal stepping resumes.
//!
//! # State machine
//!
//! ```text
//! Advancing ──clear──▶ Advancing (one step)
//! Advancing ──blocked──▶ ObstacleDetected ──▶ Turning(1)
//! Turning(n) ──clear──▶ Rerouted ──▶ Advancing
//! Turning(n) ──blocked, n < max──▶ Turning(n + 1)
//! Turning(max) ──blocked──▶ Stuck(max)
//! Advancing ──distance reached──▶ Done
//! ```
//!
//! Each obstacle encounter gets a fresh attempt budget; the controller keeps
//! no memory of headings that failed earlier in the session.
//!
//! # Sensor failures
//!
//! A failed point-cloud read is treated as **no obstacle** (the sector's
//! maximum range).  The controller fails open: a dead lidar does not stop
//! the vehicle.  Motion and heading failures are not retried and end the
//! session with an error.
//!
//! # Example
//!
//! ```rust
//! use skysearch_hal::SimVehicle;
//! use skysearch_runtime::avoidance::{AvoidanceConfig, LocalAvoidance};
//!
//! let mut drone = SimVehicle::new("Drone1");
//! let controller = LocalAvoidance::new(AvoidanceConfig::default());
//!
//! let report = controller.run(&mut drone, 10.0).expect("sim flight must succeed");
//! assert!(report.is_done());
//! assert_eq!(report.steps, 5);
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use skysearch_hal::{Motion, Ranging};
use skysearch_perception::frames::wrap_degrees;
use skysearch_perception::ranging::{ForwardSector, nearest_obstacle_distance};
use skysearch_types::{AvoidanceOutcome, AvoidanceReport, SkyError};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Relative slack (scaled by `max(target, 1 m)`) under which the remaining
/// distance counts as covered.  Absorbs rounding from summing fractional
/// steps.
const ARRIVAL_TOLERANCE: f64 = 1e-9;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Tuning for [`LocalAvoidance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvoidanceConfig {
    /// Obstacles closer than this (metres) block the current heading.
    #[serde(default = "default_safety_distance")]
    pub safety_distance_m: f64,

    /// Length of one regular forward step (metres).
    #[serde(default = "default_move_step")]
    pub move_step_m: f64,

    /// Heading change per turn attempt (degrees, positive = clockwise
    /// seen from above).
    #[serde(default = "default_turn_increment")]
    pub turn_increment_deg: f64,

    /// Turn attempts per obstacle encounter before giving up.
    #[serde(default = "default_max_turn_attempts")]
    pub max_turn_attempts: u32,

    /// Leg flown without checking after a successful turn (metres).
    #[serde(default = "default_reroute_step")]
    pub reroute_step_m: f64,

    /// Ranging sensor to poll.
    #[serde(default = "default_sensor_id")]
    pub sensor_id: String,

    #[serde(default)]
    pub sector: ForwardSector,
}

fn default_safety_distance() -> f64 {
    3.0
}
fn default_move_step() -> f64 {
    2.0
}
fn default_turn_increment() -> f64 {
    30.0
}
fn default_max_turn_attempts() -> u32 {
    5
}
fn default_reroute_step() -> f64 {
    3.0
}
fn default_sensor_id() -> String {
    "LidarSensor1".to_string()
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            safety_distance_m: default_safety_distance(),
            move_step_m: default_move_step(),
            turn_increment_deg: default_turn_increment(),
            max_turn_attempts: default_max_turn_attempts(),
            reroute_step_m: default_reroute_step(),
            sensor_id: default_sensor_id(),
            sector: ForwardSector::default(),
        }
    }
}

impl AvoidanceConfig {
    /// Reject settings that would stall or never terminate the loop.
    pub fn validate(&self) -> Result<(), SkyError> {
        let positive = [
            ("safety_distance_m", self.safety_distance_m),
            ("move_step_m", self.move_step_m),
            ("reroute_step_m", self.reroute_step_m),
            ("sector.max_range_m", self.sector.max_range_m),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SkyError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.safety_distance_m >= self.sector.max_range_m {
            return Err(SkyError::InvalidConfig(format!(
                "safety_distance_m ({}) must be below sector.max_range_m ({})",
                self.safety_distance_m, self.sector.max_range_m
            )));
        }
        if !self.turn_increment_deg.is_finite() || self.turn_increment_deg == 0.0 {
            return Err(SkyError::InvalidConfig(format!(
                "turn_increment_deg must be finite and non-zero, got {}",
                self.turn_increment_deg
            )));
        }
        if self.max_turn_attempts == 0 {
            return Err(SkyError::InvalidConfig(
                "max_turn_attempts must be at least 1".to_string(),
            ));
        }
        if self.sensor_id.is_empty() {
            return Err(SkyError::InvalidConfig("sensor_id is empty".to_string()));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// State machine
// ─────────────────────────────────────────────────────────────────────────────

/// Controller state within one [`LocalAvoidance::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvoidanceState {
    Advancing,
    ObstacleDetected,
    /// Attempt number within the current encounter, starting at 1.
    Turning(u32),
    Rerouted,
    /// Attempts spent on the encounter that could not be cleared.
    Stuck(u32),
    Done,
}

impl AvoidanceState {
    pub fn is_terminal(self) -> bool {
        matches!(self, AvoidanceState::Stuck(_) | AvoidanceState::Done)
    }
}

/// Counters that live for exactly one session.
#[derive(Debug, Default)]
struct Session {
    advanced_m: f64,
    steps: u32,
    turn_attempts: u32,
    reroutes: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// LocalAvoidance
// ─────────────────────────────────────────────────────────────────────────────

/// Reactive local planner.  Holds only configuration; every
/// [`run`][Self::run] starts from scratch.
#[derive(Debug, Clone)]
pub struct LocalAvoidance {
    config: AvoidanceConfig,
}

impl LocalAvoidance {
    pub fn new(config: AvoidanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AvoidanceConfig {
        &self.config
    }

    /// Fly `target_distance_m` metres forward, avoiding obstacles.
    ///
    /// Returns a report whose outcome is [`AvoidanceOutcome::Done`] when the
    /// full distance was covered or [`AvoidanceOutcome::Stuck`] when an
    /// obstacle could not be cleared; `distance_m` holds the progress made.
    ///
    /// # Errors
    ///
    /// - [`SkyError::InvalidConfig`] / [`SkyError::InvalidInput`] before any
    ///   command is issued.
    /// - Any error from a motion or heading command, unchanged.
    #[instrument(skip(self, vehicle), fields(session_id = tracing::field::Empty))]
    pub fn run<V>(&self, vehicle: &mut V, target_distance_m: f64) -> Result<AvoidanceReport, SkyError>
    where
        V: Motion + Ranging + ?Sized,
    {
        self.config.validate()?;
        if !(target_distance_m.is_finite() && target_distance_m >= 0.0) {
            return Err(SkyError::InvalidInput(format!(
                "target distance must be finite and non-negative, got {target_distance_m}"
            )));
        }

        let session_id = Uuid::new_v4();
        tracing::Span::current().record("session_id", tracing::field::display(session_id));
        let started_at = Utc::now();
        info!(target_distance_m, "avoidance session started");

        let cfg = &self.config;
        let mut session = Session::default();
        let mut state = AvoidanceState::Advancing;

        while !state.is_terminal() {
            let next = match state {
                AvoidanceState::Advancing => {
                    let remaining = target_distance_m - session.advanced_m;
                    if remaining <= ARRIVAL_TOLERANCE * target_distance_m.max(1.0) {
                        AvoidanceState::Done
                    } else if self.obstacle_distance(vehicle) < cfg.safety_distance_m {
                        AvoidanceState::ObstacleDetected
                    } else {
                        let step = cfg.move_step_m.min(remaining);
                        vehicle.advance(step)?;
                        session.advanced_m += step;
                        session.steps += 1;
                        AvoidanceState::Advancing
                    }
                }
                AvoidanceState::ObstacleDetected => AvoidanceState::Turning(1),
                AvoidanceState::Turning(attempt) => {
                    let heading = wrap_degrees(vehicle.heading()? + cfg.turn_increment_deg);
                    vehicle.set_heading(heading)?;
                    session.turn_attempts += 1;

                    if self.obstacle_distance(vehicle) >= cfg.safety_distance_m {
                        AvoidanceState::Rerouted
                    } else if attempt < cfg.max_turn_attempts {
                        AvoidanceState::Turning(attempt + 1)
                    } else {
                        AvoidanceState::Stuck(attempt)
                    }
                }
                AvoidanceState::Rerouted => {
                    vehicle.advance(cfg.reroute_step_m)?;
                    session.advanced_m += cfg.reroute_step_m;
                    session.reroutes += 1;
                    AvoidanceState::Advancing
                }
                AvoidanceState::Stuck(_) | AvoidanceState::Done => state,
            };

            if next != state {
                debug!(from = ?state, to = ?next, advanced_m = session.advanced_m, "avoidance transition");
            }
            state = next;
        }

        let outcome = match state {
            AvoidanceState::Stuck(attempts) => {
                warn!(
                    advanced_m = session.advanced_m,
                    attempts,
                    "obstacle not cleared; avoidance session stuck"
                );
                AvoidanceOutcome::Stuck { attempts }
            }
            _ => {
                info!(advanced_m = session.advanced_m, "avoidance session done");
                AvoidanceOutcome::Done
            }
        };

        Ok(AvoidanceReport {
            session_id,
            started_at,
            finished_at: Utc::now(),
            outcome,
            target_m: target_distance_m,
            distance_m: session.advanced_m,
            steps: session.steps,
            turn_attempts: session.turn_attempts,
            reroutes: session.reroutes,
            final_heading_deg: vehicle.heading()?,
        })
    }

    /// Nearest obstacle in the forward sector; the sector's maximum range
    /// when the sensor cannot be read.
    fn obstacle_distance<V>(&self, vehicle: &mut V) -> f64
    where
        V: Ranging + ?Sized,
    {
        let sector = &self.config.sector;
        match vehicle.point_cloud(&self.config.sensor_id) {
            Ok(points) => {
                let d = nearest_obstacle_distance(&points, sector);
                debug!(distance_m = d, points = points.len(), "forward sector polled");
                d
            }
            Err(e) => {
                warn!(error = %e, "ranging read failed; assuming a clear path");
                sector.max_range_m
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
