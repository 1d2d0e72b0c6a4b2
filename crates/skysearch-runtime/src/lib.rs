//! `skysearch-runtime` – flight behaviours that run against a vehicle.
//!
//! # Modules
//!
//! - [`avoidance`] – [`LocalAvoidance`][avoidance::LocalAvoidance]: flies a
//!   straight leg while polling the forward sector, turning and rerouting
//!   around obstacles with a bounded attempt budget.
//! - [`pose_report`] – [`report_pose`][pose_report::report_pose]: flattens the
//!   vehicle pose into a [`PoseReport`][skysearch_types::PoseReport].
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: installs the
//!   global `tracing` subscriber with optional OTLP span export.
//!
//! The vehicle is always passed in explicitly; nothing in this crate keeps
//! a process-wide connection handle.

pub mod avoidance;
pub mod pose_report;
pub mod telemetry;

pub use avoidance::{AvoidanceConfig, AvoidanceState, LocalAvoidance};
pub use pose_report::report_pose;
pub use telemetry::{LogFormat, TracerProviderGuard, init_tracing};
