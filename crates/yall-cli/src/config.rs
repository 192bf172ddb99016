//! Configuration – reads/writes `~/.yall/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use yall_types::{Alliance, YallError};

/// How estimates are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = YallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(YallError::Config(format!("unknown output format '{other}'"))),
        }
    }
}

/// Persisted configuration stored in `~/.yall/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Camera table name on the bus.
    #[serde(default = "default_camera")]
    pub camera: String,

    /// Use MegaTag2 entries instead of MegaTag1.
    #[serde(default = "default_megatag2")]
    pub megatag2: bool,

    /// Fixed alliance; when absent it is read from `FMSInfo` on the bus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alliance: Option<Alliance>,

    /// Delay between replayed samples, in milliseconds. `0` replays as fast
    /// as possible.
    #[serde(default = "default_poll_period_ms")]
    pub poll_period_ms: u64,

    #[serde(default)]
    pub output: OutputFormat,
}

fn default_camera() -> String {
    "limelight".to_string()
}
fn default_megatag2() -> bool {
    true
}
fn default_poll_period_ms() -> u64 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera: default_camera(),
            megatag2: default_megatag2(),
            alliance: None,
            poll_period_ms: default_poll_period_ms(),
            output: OutputFormat::default(),
        }
    }
}

impl Config {
    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_period_ms)
    }
}

/// Return the path to `~/.yall/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".yall").join("config.toml")
}

/// Load from `path`, or from [`config_path`] when `None`. A missing file
/// yields the defaults; env overrides apply either way.
pub fn load(path: Option<&Path>) -> Result<Config, YallError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let mut cfg = load_from(&path)?.unwrap_or_default();
    apply_env_overrides(&mut cfg)?;
    Ok(cfg)
}

/// Parse the file at `path`. Returns `None` if it does not exist.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, YallError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| YallError::Config(format!("failed to read {}: {e}", path.display())))?;
    let cfg = toml::from_str(&raw)
        .map_err(|e| YallError::Config(format!("failed to parse {}: {e}", path.display())))?;
    Ok(Some(cfg))
}

/// Apply `YALL_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `YALL_CAMERA` | `camera` |
/// | `YALL_MEGATAG2` | `megatag2` |
/// | `YALL_ALLIANCE` | `alliance` |
/// | `YALL_POLL_PERIOD_MS` | `poll_period_ms` |
/// | `YALL_OUTPUT` | `output` |
///
/// Unparseable numbers and booleans are ignored; an unknown alliance or
/// output format is an error.
pub fn apply_env_overrides(cfg: &mut Config) -> Result<(), YallError> {
    if let Ok(v) = std::env::var("YALL_CAMERA") {
        cfg.camera = v;
    }
    if let Ok(v) = std::env::var("YALL_MEGATAG2")
        && let Ok(flag) = v.parse::<bool>()
    {
        cfg.megatag2 = flag;
    }
    if let Ok(v) = std::env::var("YALL_ALLIANCE") {
        cfg.alliance = Some(v.parse()?);
    }
    if let Ok(v) = std::env::var("YALL_POLL_PERIOD_MS")
        && let Ok(ms) = v.parse::<u64>()
    {
        cfg.poll_period_ms = ms;
    }
    if let Ok(v) = std::env::var("YALL_OUTPUT") {
        cfg.output = v.parse()?;
    }
    Ok(())
}

/// Save the config to a specific path, creating parent directories.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), YallError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| YallError::Config(format!("failed to create config directory: {e}")))?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| YallError::Config(format!("failed to serialize config: {e}")))?;
    fs::write(path, raw)
        .map_err(|e| YallError::Config(format!("failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded, Config::default());
        assert_eq!(loaded.camera, "limelight");
        assert!(loaded.megatag2);
        assert_eq!(loaded.poll_period(), Duration::from_millis(20));
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("yall.toml");
        fs::write(&path, "camera = \"limelight-front\"\nalliance = \"red\"\n").expect("write");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.camera, "limelight-front");
        assert_eq!(loaded.alliance, Some(Alliance::Red));
        assert_eq!(loaded.output, OutputFormat::Text);
        assert!(loaded.megatag2);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("yall.toml");
        fs::write(&path, "megatag2 = \"maybe\"").expect("write");

        assert!(matches!(load_from(&path), Err(YallError::Config(_))));
    }

    #[test]
    fn config_path_points_to_yall_dir() {
        let p = config_path_for_home("/home/driver");
        assert!(p.to_string_lossy().contains(".yall"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn output_format_parses() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    // Each env test owns a distinct variable so parallel tests never race.

    #[test]
    fn apply_env_overrides_changes_camera() {
        // SAFETY: no other test touches this variable.
        unsafe { std::env::set_var("YALL_CAMERA", "limelight-rear") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg).expect("overrides");
        assert_eq!(cfg.camera, "limelight-rear");
        unsafe { std::env::remove_var("YALL_CAMERA") };
    }

    #[test]
    fn apply_env_overrides_ignores_invalid_period() {
        // SAFETY: no other test touches this variable.
        unsafe { std::env::set_var("YALL_POLL_PERIOD_MS", "soon") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg).expect("overrides");
        assert_eq!(cfg.poll_period_ms, 20);
        unsafe { std::env::remove_var("YALL_POLL_PERIOD_MS") };
    }

    #[test]
    fn apply_env_overrides_changes_megatag2() {
        // SAFETY: no other test touches this variable.
        unsafe { std::env::set_var("YALL_MEGATAG2", "false") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg).expect("overrides");
        assert!(!cfg.megatag2);
        unsafe { std::env::remove_var("YALL_MEGATAG2") };
    }
}
