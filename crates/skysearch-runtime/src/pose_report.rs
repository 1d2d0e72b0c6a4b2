//! Pose reporting: turns raw telemetry into a [`PoseReport`] observation.

use skysearch_hal::PoseSource;
use skysearch_perception::Pose;
use skysearch_types::{PoseReport, SkyError};
use tracing::debug;

/// Read the current pose from `source` and flatten it.
pub fn report_pose<S>(source: &S) -> Result<PoseReport, SkyError>
where
    S: PoseSource + ?Sized,
{
    let pose = source.pose()?;
    let report = flatten(&pose);
    debug!(
        altitude_m = report.altitude_m,
        yaw_deg = report.yaw_deg,
        "pose reported"
    );
    Ok(report)
}

fn flatten(pose: &Pose) -> PoseReport {
    let euler = pose.euler();
    PoseReport {
        north_m: pose.position.x,
        east_m: pose.position.y,
        altitude_m: pose.altitude(),
        roll_deg: euler.roll,
        pitch_deg: euler.pitch,
        yaw_deg: euler.yaw,
        orientation_wxyz: pose.orientation.to_wxyz(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skysearch_hal::SimVehicle;
    use skysearch_perception::{EulerAngles, Quaternion, Vec3};

    struct Unreachable;

    impl PoseSource for Unreachable {
        fn pose(&self) -> Result<Pose, SkyError> {
            Err(SkyError::HardwareFault {
                component: "Drone1".to_string(),
                details: "telemetry link down".to_string(),
            })
        }
    }

    #[test]
    fn sim_pose_is_flattened() {
        let sim = SimVehicle::new("Drone1")
            .at(Vec3::new(12.0, -3.0, -27.0))
            .facing(135.0);
        let report = report_pose(&sim).unwrap();

        assert_eq!(report.north_m, 12.0);
        assert_eq!(report.east_m, -3.0);
        assert!((report.altitude_m - 27.0).abs() < 1e-12);
        assert!((report.yaw_deg - 135.0).abs() < 1e-9);
        assert!(report.roll_deg.abs() < 1e-9);
        assert!(report.pitch_deg.abs() < 1e-9);
    }

    #[test]
    fn orientation_is_reported_scalar_first() {
        let q = EulerAngles::new(10.0, 20.0, 30.0).to_quaternion();
        let report = flatten(&Pose::new(Vec3::zero(), q));
        assert_eq!(report.orientation_wxyz, [q.w, q.x, q.y, q.z]);
        assert!((report.roll_deg - 10.0).abs() < 1e-9);
        assert!((report.pitch_deg - 20.0).abs() < 1e-9);
        assert!((report.yaw_deg - 30.0).abs() < 1e-9);
        assert!(Quaternion::from_xyzw(q.to_xyzw()).same_rotation(q, 1e-15));
    }

    #[test]
    fn source_errors_propagate() {
        assert!(matches!(
            report_pose(&Unreachable),
            Err(SkyError::HardwareFault { .. })
        ));
    }
}
