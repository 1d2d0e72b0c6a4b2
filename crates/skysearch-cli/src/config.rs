//! Configuration vault – reads/writes `~/.skysearch/config.toml`.

use serde::{Deserialize, Serialize};
use skysearch_runtime::AvoidanceConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted configuration stored in `~/.skysearch/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Vehicle name used in logs and fault reports.
    #[serde(default = "default_vehicle_name")]
    pub vehicle_name: String,

    /// Length of the demonstration leg flown at start-up (metres).
    #[serde(default = "default_sortie_distance")]
    pub sortie_distance_m: f64,

    #[serde(default)]
    pub avoidance: AvoidanceConfig,
}

fn default_vehicle_name() -> String {
    "Drone1".to_string()
}
fn default_sortie_distance() -> f64 {
    20.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vehicle_name: default_vehicle_name(),
            sortie_distance_m: default_sortie_distance(),
            avoidance: AvoidanceConfig::default(),
        }
    }
}

/// Return the path to `~/.skysearch/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".skysearch").join("config.toml")
}

/// Load the config from disk, with environment overrides applied.
/// Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    let mut cfg = load_from(&config_path())?;
    if let Some(c) = cfg.as_mut() {
        apply_env_overrides(c);
    }
    Ok(cfg)
}

/// Load the config from a specific path without environment overrides.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config = toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Apply `SKYSEARCH_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `SKYSEARCH_VEHICLE` | `vehicle_name` |
/// | `SKYSEARCH_SAFETY_DISTANCE` | `avoidance.safety_distance_m` |
/// | `SKYSEARCH_MOVE_STEP` | `avoidance.move_step_m` |
/// | `SKYSEARCH_SORTIE_DISTANCE` | `sortie_distance_m` |
///
/// Values that do not parse as numbers are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    apply_overrides_from(cfg, |key| std::env::var(key).ok());
}

fn apply_overrides_from(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());

    if let Some(v) = lookup("SKYSEARCH_VEHICLE") {
        cfg.vehicle_name = v;
    }
    if let Some(v) = number("SKYSEARCH_SAFETY_DISTANCE") {
        cfg.avoidance.safety_distance_m = v;
    }
    if let Some(v) = number("SKYSEARCH_MOVE_STEP") {
        cfg.avoidance.move_step_m = v;
    }
    if let Some(v) = number("SKYSEARCH_SORTIE_DISTANCE") {
        cfg.sortie_distance_m = v;
    }
}

/// Save the config to disk, creating `~/.skysearch/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| f.write_all(raw.as_bytes()))
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");
        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded, Config::default());
        assert_eq!(loaded.avoidance.max_turn_attempts, 5);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "vehicle_name = \"Scout\"\n[avoidance]\nreroute_step_m = 4.5\n[avoidance.sector]\nmax_range_m = 40.0\n",
        )
        .unwrap();

        let cfg = load_from(&path).unwrap().unwrap();
        assert_eq!(cfg.vehicle_name, "Scout");
        assert_eq!(cfg.sortie_distance_m, 20.0);
        assert_eq!(cfg.avoidance.reroute_step_m, 4.5);
        assert_eq!(cfg.avoidance.safety_distance_m, 3.0);
        assert_eq!(cfg.avoidance.sector.max_range_m, 40.0);
        assert_eq!(cfg.avoidance.sector.half_width_m, 1.5);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "sortie_distance_m = \"far\"").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(err.contains("Failed to parse config"));
    }

    #[cfg(unix)]
    #[test]
    fn config_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let file_mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        let dir_mode = fs::metadata(path.parent().unwrap()).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn config_path_points_to_skysearch_dir() {
        let p = config_path_for_home("/home/pilot");
        assert!(p.to_string_lossy().contains(".skysearch"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn overrides_replace_fields() {
        let mut cfg = Config::default();
        apply_overrides_from(
            &mut cfg,
            env(&[
                ("SKYSEARCH_VEHICLE", "Drone7"),
                ("SKYSEARCH_SAFETY_DISTANCE", "4.5"),
                ("SKYSEARCH_MOVE_STEP", " 1.0 "),
                ("SKYSEARCH_SORTIE_DISTANCE", "50"),
            ]),
        );
        assert_eq!(cfg.vehicle_name, "Drone7");
        assert_eq!(cfg.avoidance.safety_distance_m, 4.5);
        assert_eq!(cfg.avoidance.move_step_m, 1.0);
        assert_eq!(cfg.sortie_distance_m, 50.0);
    }

    #[test]
    fn unparsable_numeric_override_is_ignored() {
        let mut cfg = Config::default();
        apply_overrides_from(&mut cfg, env(&[("SKYSEARCH_SAFETY_DISTANCE", "close")]));
        assert_eq!(cfg.avoidance.safety_distance_m, 3.0);
    }
}
