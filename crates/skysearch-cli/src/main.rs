//! `skysearch` – simulated sortie runner.
//!
//! This binary wires the workspace together end to end.  It:
//!
//! 1. Loads `~/.skysearch/config.toml`, writing the defaults on first run.
//! 2. Spawns a [`SimVehicle`] hovering over a small obstacle field.
//! 3. Reports the starting pose, flies one avoidance leg, and prints the
//!    resulting [`AvoidanceReport`][skysearch_types::AvoidanceReport] as JSON.
//! 4. Places a simulated camera sighting in the world from the final pose.
//!
//! The process exits non-zero when the leg ends `Stuck` or fails outright.

mod config;

use colored::Colorize;
use std::process::ExitCode;
use tracing::{error, info, warn};

use skysearch_hal::{PoseSource, SimVehicle};
use skysearch_perception::Vec3;
use skysearch_perception::projection::{CameraIntrinsics, DepthWindow, pixel_to_world};
use skysearch_runtime::{LocalAvoidance, init_tracing, report_pose};
use skysearch_types::AvoidanceOutcome;

/// Cruise altitude of the simulated vehicle (metres above origin).
const SIM_ALTITUDE_M: f64 = 20.0;

/// Simulated detection: pixel and planar depth on a 640×480, 90° camera.
const SIGHTING_PIXEL: (f64, f64) = (400.0, 300.0);
const SIGHTING_DEPTH_M: f64 = 15.0;

fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG, SKYSEARCH_LOG_FORMAT and OTEL_EXPORTER_OTLP_ENDPOINT are
    // honoured here.  User-facing output still goes through println!.
    let otel_guard = init_tracing("skysearch");
    info!(exporting = otel_guard.is_exporting(), "tracing initialised");

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => cfg,
        Ok(None) => {
            let mut cfg = config::Config::default();
            if let Err(e) = config::save(&cfg) {
                warn!(error = %e, "could not write default config");
            } else {
                println!(
                    "  {} wrote defaults to {}",
                    "✓".green(),
                    config::config_path().display()
                );
            }
            config::apply_env_overrides(&mut cfg);
            cfg
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let controller = LocalAvoidance::new(cfg.avoidance.clone());
    if let Err(e) = controller.config().validate() {
        eprintln!("{} {}", "✗".red().bold(), e);
        return ExitCode::FAILURE;
    }

    // ── Vehicle ───────────────────────────────────────────────────────────
    let mut vehicle = SimVehicle::new(cfg.vehicle_name.clone())
        .at(Vec3::new(0.0, 0.0, -SIM_ALTITUDE_M))
        .facing(0.0)
        .with_obstacles(demo_obstacles());

    match report_pose(&vehicle) {
        Ok(pose) => {
            println!(
                "  {} N {:.1} m  E {:.1} m  alt {:.1} m  heading {:.1}°",
                "Pose".bold(),
                pose.north_m,
                pose.east_m,
                pose.altitude_m,
                pose.yaw_deg
            );
        }
        Err(e) => warn!(error = %e, "initial pose unavailable"),
    }

    // ── Sortie ────────────────────────────────────────────────────────────
    info!(
        vehicle = %cfg.vehicle_name,
        distance_m = cfg.sortie_distance_m,
        "starting sortie"
    );

    let report = match controller.run(&mut vehicle, cfg.sortie_distance_m) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "sortie aborted");
            eprintln!("{} {}", "✗".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!(error = %e, "could not serialise report"),
    }

    match locate_sighting(&vehicle) {
        Some(p) => println!(
            "  {} N {:.1} m  E {:.1} m  alt {:.1} m",
            "Sighting".bold(),
            p.x,
            p.y,
            -p.z
        ),
        None => warn!("sighting could not be placed"),
    }

    match report.outcome {
        AvoidanceOutcome::Done => {
            println!(
                "  {} covered {:.1} m with {} reroute(s)",
                "DONE".green().bold(),
                report.distance_m,
                report.reroutes
            );
            ExitCode::SUCCESS
        }
        AvoidanceOutcome::Stuck { attempts } => {
            println!(
                "  {} no clear heading after {} turn(s)",
                "STUCK".red().bold(),
                attempts
            );
            ExitCode::FAILURE
        }
    }
}

/// A short wall straddling the flight line, 8 m north of the start point,
/// at cruise altitude.
fn demo_obstacles() -> Vec<Vec3> {
    (-2..=2)
        .map(|i| Vec3::new(8.0, f64::from(i) * 0.5, -SIM_ALTITUDE_M))
        .collect()
}

/// World position of the simulated detection seen from the vehicle's
/// current pose.  The camera is boresighted with the body x axis.
fn locate_sighting<S: PoseSource + ?Sized>(vehicle: &S) -> Option<Vec3> {
    let pose = vehicle
        .pose()
        .map_err(|e| warn!(error = %e, "pose unavailable for sighting"))
        .ok()?;
    let intrinsics = CameraIntrinsics::from_fov(640, 480, 90.0);
    let (u, v) = SIGHTING_PIXEL;
    pixel_to_world(u, v, SIGHTING_DEPTH_M, &intrinsics, &DepthWindow::default(), &pose)
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("  {} {}",
        "SkySearch".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Search-and-rescue flight stack (simulated)");
    println!();
}
