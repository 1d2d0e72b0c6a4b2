//! `skysearch-hal` – vehicle interfaces.
//!
//! The flight logic never talks to a simulator or autopilot directly; it is
//! handed something implementing these traits.
//!
//! # Modules
//!
//! - [`motion`] – [`Motion`][motion::Motion]: blocking advance / heading
//!   commands and position readback.
//! - [`sensor`] – [`Ranging`][sensor::Ranging] point-cloud source and
//!   [`PoseSource`][sensor::PoseSource] telemetry.
//! - [`sim`] – [`SimVehicle`][sim::SimVehicle]: an in-process vehicle that
//!   implements every trait, for tests and dry runs without a simulator.

pub mod motion;
pub mod sensor;
pub mod sim;

pub use motion::Motion;
pub use sensor::{PoseSource, Ranging};
pub use sim::{RangeSource, SimCommand, SimVehicle};
