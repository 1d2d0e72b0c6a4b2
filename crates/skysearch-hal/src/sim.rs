//! In-process simulated vehicle for tests and dry runs without a simulator.
//!
//! [`SimVehicle`] implements [`Motion`], [`Ranging`] and [`PoseSource`] with
//! ideal kinematics: advances are exact straight lines along the current
//! heading in the horizontal NED plane and heading changes are instant.
//! Every accepted command is appended to a log that tests can assert on.
//!
//! # Example
//!
//! ```rust
//! use skysearch_hal::sim::{SimCommand, SimVehicle};
//! use skysearch_hal::{Motion, Ranging};
//! use skysearch_perception::Vec3;
//!
//! // A post 6 m north of the start.
//! let mut drone = SimVehicle::new("Drone1")
//!     .with_obstacles(vec![Vec3::new(6.0, 0.0, 0.0)]);
//!
//! drone.advance(2.0).expect("sim advance must succeed");
//! let cloud = drone.point_cloud("LidarSensor1").unwrap();
//! assert!((cloud[0].x - 4.0).abs() < 1e-9);
//! assert_eq!(drone.commands(), &[SimCommand::Advance(2.0)]);
//! ```

use skysearch_perception::frames::wrap_degrees;
use skysearch_perception::{Pose, Quaternion, Vec3};
use skysearch_types::SkyError;
use tracing::debug;

use crate::motion::Motion;
use crate::sensor::{PoseSource, Ranging};

/// Script that produces a body-frame cloud from `(heading_deg, position)`.
pub type ScriptedCloud = Box<dyn FnMut(f64, Vec3) -> Vec<Vec3> + Send>;

/// Where [`SimVehicle`] gets its point clouds from.
pub enum RangeSource {
    /// Fixed obstacle points in the world frame, transformed into the body
    /// frame on every read.
    World(Vec<Vec3>),
    /// A closure returning the body-frame cloud directly.
    Scripted(ScriptedCloud),
    /// Every read fails with [`SkyError::SensorUnavailable`].
    Unavailable,
}

/// A command accepted by the simulated vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimCommand {
    Advance(f64),
    SetHeading(f64),
}

// ────────────────────────────────────────────────────────────────────────────
// SimVehicle
// ────────────────────────────────────────────────────────────────────────────

/// A simulated multirotor.
pub struct SimVehicle {
    name: String,
    position: Vec3,
    heading_deg: f64,
    ranging: RangeSource,
    /// Remaining motion commands before faults start; `None` = never fail.
    motion_budget: Option<usize>,
    commands: Vec<SimCommand>,
}

impl SimVehicle {
    /// A vehicle at the NED origin facing north, with an empty world.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::zero(),
            heading_deg: 0.0,
            ranging: RangeSource::World(Vec::new()),
            motion_budget: None,
            commands: Vec::new(),
        }
    }

    /// Start at `position` (NED metres).
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Start facing `heading_deg`.
    pub fn facing(mut self, heading_deg: f64) -> Self {
        self.heading_deg = wrap_degrees(heading_deg);
        self
    }

    /// Populate the world with fixed obstacle points.
    pub fn with_obstacles(mut self, points: Vec<Vec3>) -> Self {
        self.ranging = RangeSource::World(points);
        self
    }

    /// Replace ranging with a script of `(heading_deg, position)`.
    pub fn with_scripted_ranging<F>(mut self, script: F) -> Self
    where
        F: FnMut(f64, Vec3) -> Vec<Vec3> + Send + 'static,
    {
        self.ranging = RangeSource::Scripted(Box::new(script));
        self
    }

    /// Make every ranging read fail.
    pub fn without_ranging(mut self) -> Self {
        self.ranging = RangeSource::Unavailable;
        self
    }

    /// Accept `n` motion commands, then fail every subsequent one.
    pub fn fail_motion_after(mut self, n: usize) -> Self {
        self.motion_budget = Some(n);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every accepted motion command, in order.
    pub fn commands(&self) -> &[SimCommand] {
        &self.commands
    }

    fn orientation(&self) -> Quaternion {
        Quaternion::from_yaw_degrees(self.heading_deg)
    }

    fn accept(&mut self, command: SimCommand) -> Result<(), SkyError> {
        if let Some(budget) = self.motion_budget.as_mut() {
            if *budget == 0 {
                return Err(SkyError::HardwareFault {
                    component: self.name.clone(),
                    details: format!("injected fault rejecting {command:?}"),
                });
            }
            *budget -= 1;
        }
        self.commands.push(command);
        Ok(())
    }
}

impl Motion for SimVehicle {
    fn advance(&mut self, distance_m: f64) -> Result<(), SkyError> {
        self.accept(SimCommand::Advance(distance_m))?;
        let delta = self.orientation().rotate(Vec3::new(distance_m, 0.0, 0.0));
        self.position = self.position.add(delta);
        debug!(vehicle = %self.name, distance_m, x = self.position.x, y = self.position.y, "sim advance");
        Ok(())
    }

    fn set_heading(&mut self, heading_deg: f64) -> Result<(), SkyError> {
        self.accept(SimCommand::SetHeading(heading_deg))?;
        self.heading_deg = wrap_degrees(heading_deg);
        debug!(vehicle = %self.name, heading_deg = self.heading_deg, "sim set heading");
        Ok(())
    }

    fn heading(&self) -> Result<f64, SkyError> {
        Ok(self.heading_deg)
    }

    fn position(&self) -> Result<Vec3, SkyError> {
        Ok(self.position)
    }
}

impl Ranging for SimVehicle {
    fn point_cloud(&mut self, sensor_id: &str) -> Result<Vec<Vec3>, SkyError> {
        let pose = Pose::new(self.position, self.orientation());
        match &mut self.ranging {
            RangeSource::World(points) => {
                Ok(points.iter().map(|p| pose.world_to_body(*p)).collect())
            }
            RangeSource::Scripted(script) => Ok(script(self.heading_deg, self.position)),
            RangeSource::Unavailable => Err(SkyError::SensorUnavailable {
                sensor: sensor_id.to_string(),
                details: format!("{} has no ranging sensor", self.name),
            }),
        }
    }
}

impl PoseSource for SimVehicle {
    fn pose(&self) -> Result<Pose, SkyError> {
        Ok(Pose::new(self.position, self.orientation()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
