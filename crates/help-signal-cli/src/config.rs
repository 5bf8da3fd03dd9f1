//! Configuration file support for help-signal.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/help-signal/config.toml` (lowest priority)
//! - Project-local: `.help-signal.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)
//!
//! Gesture timing is fixed and has no configuration knobs. SMS credentials
//! come from the environment, never from these files.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Name of the project-local config file.
pub const PROJECT_CONFIG_NAME: &str = ".help-signal.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Frame feed settings.
    pub feed: FeedConfig,
    /// Alert delivery settings.
    pub alert: AlertConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// Frame feed configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Frames per second used to stamp frames.
    pub frame_rate: Option<f64>,
    /// Flip frames horizontally before rendering.
    pub mirror: Option<bool>,
}

/// Alert delivery configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Log alerts instead of sending SMS.
    pub dry_run: Option<bool>,
    /// Dispatch on the capture loop instead of a background worker.
    pub inline: Option<bool>,
    /// Messaging API host.
    pub api_base: Option<String>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
    /// Directory for annotated frames.
    pub annotate_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/help-signal/config.toml`
    /// 2. Project-local: `.help-signal.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(rate) = self.feed.frame_rate {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(format!("feed.frame_rate must be positive, got {rate}"));
            }
        }

        if let Some(ref base) = self.alert.api_base {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(format!(
                    "alert.api_base must be an http(s) URL, got '{base}'"
                ));
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Feed
        self.feed.frame_rate = other.feed.frame_rate.or(self.feed.frame_rate);
        self.feed.mirror = other.feed.mirror.or(self.feed.mirror);

        // Alert
        self.alert.dry_run = other.alert.dry_run.or(self.alert.dry_run);
        self.alert.inline = other.alert.inline.or(self.alert.inline);
        self.alert.api_base = other.alert.api_base.or_else(|| self.alert.api_base.take());

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
        self.output.annotate_dir = other
            .output
            .annotate_dir
            .or_else(|| self.output.annotate_dir.take());
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("help-signal").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.help-signal.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.feed.frame_rate.is_none());
        assert!(config.alert.dry_run.is_none());
        assert!(config.output.annotate_dir.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: AppConfig = toml::from_str("").expect("parse empty config");
        assert!(config.feed.mirror.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r"
[feed]
frame_rate = 15.0
mirror = false

[alert]
dry_run = true
inline = true
api_base = 'http://localhost:8080'

[output]
format = 'json'
pretty = true
progress = false
annotate_dir = 'out/frames'
";
        let config: AppConfig = toml::from_str(toml).expect("parse full config");

        assert_eq!(config.feed.frame_rate, Some(15.0));
        assert_eq!(config.feed.mirror, Some(false));
        assert_eq!(config.alert.dry_run, Some(true));
        assert_eq!(config.alert.inline, Some(true));
        assert_eq!(
            config.alert.api_base.as_deref(),
            Some("http://localhost:8080")
        );
        assert_eq!(config.output.format, Some("json".to_string()));
        assert_eq!(config.output.pretty, Some(true));
        assert_eq!(
            config.output.annotate_dir,
            Some(PathBuf::from("out/frames"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_preserves_base_when_override_is_none() {
        let mut base: AppConfig = toml::from_str(
            r"
[feed]
frame_rate = 25.0
mirror = false

[alert]
dry_run = true
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[feed]
frame_rate = 60.0

[output]
format = 'json'
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.feed.frame_rate, Some(60.0));
        assert_eq!(base.feed.mirror, Some(false));
        assert_eq!(base.alert.dry_run, Some(true));
        assert_eq!(base.output.format, Some("json".to_string()));
    }

    #[test]
    fn test_merge_all_sections() {
        let mut base: AppConfig = toml::from_str(
            r"
[feed]
mirror = true

[alert]
inline = false
api_base = 'https://api.twilio.com'

[output]
format = 'json'
annotate_dir = 'a'
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[feed]
mirror = false

[alert]
inline = true
api_base = 'http://127.0.0.1:9000'

[output]
format = 'jsonl'
annotate_dir = 'b'
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.feed.mirror, Some(false));
        assert_eq!(base.alert.inline, Some(true));
        assert_eq!(
            base.alert.api_base.as_deref(),
            Some("http://127.0.0.1:9000")
        );
        assert_eq!(base.output.format, Some("jsonl".to_string()));
        assert_eq!(base.output.annotate_dir, Some(PathBuf::from("b")));
    }

    #[test]
    fn test_merge_empty_override_preserves_base() {
        let mut base: AppConfig = toml::from_str(
            r"
[feed]
frame_rate = 10.0
",
        )
        .expect("parse base");

        base.merge(AppConfig::default());

        assert_eq!(base.feed.frame_rate, Some(10.0));
    }

    #[test]
    fn test_invalid_field_type_handled() {
        let toml = r#"
[feed]
frame_rate = "fast"
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "type mismatch should return error");
    }

    #[test]
    fn test_unknown_sections_ignored() {
        let toml = r"
[feed]
frame_rate = 24.0

[gestures]
hold_seconds = 3
";
        let config: AppConfig = toml::from_str(toml).expect("unknown sections are ignored");
        assert_eq!(config.feed.frame_rate, Some(24.0));
    }

    // === Validation Tests ===

    #[test]
    fn test_validate_frame_rate() {
        let mut config = AppConfig::default();
        config.feed.frame_rate = Some(0.0);
        assert!(config.validate().unwrap_err().contains("feed.frame_rate"));

        config.feed.frame_rate = Some(-5.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_api_base() {
        let mut config = AppConfig::default();
        config.alert.api_base = Some("api.twilio.com".to_string());
        assert!(config.validate().unwrap_err().contains("alert.api_base"));
    }

    #[test]
    fn test_validate_output_format_invalid() {
        let mut config = AppConfig::default();
        config.output.format = Some("xml".to_string());
        assert!(config.validate().unwrap_err().contains("output.format"));
    }

    #[test]
    fn test_validate_empty_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_find_config_in_parents() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(PROJECT_CONFIG_NAME), "").unwrap();

        let found = find_config_in_parents(&nested).unwrap();
        assert_eq!(found, root.path().join(PROJECT_CONFIG_NAME));
    }
}
