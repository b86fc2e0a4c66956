use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

/// Values loadable from an optional `Config.toml`; every field has a
/// default so the file can be absent. CLI flags override these.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_device_root")]
    pub device_root: String,

    /// Minimum size for local scans, e.g. "100MB".
    #[serde(default = "default_local_min_size")]
    pub local_min_size: String,

    /// Minimum size for device scans, e.g. "50MB".
    #[serde(default = "default_device_min_size")]
    pub device_min_size: String,

    /// How many of the largest files to show.
    #[serde(default = "default_top")]
    pub top: usize,

    /// Per-command timeout for device shell invocations.
    #[serde(default = "default_shell_timeout_secs")]
    pub shell_timeout_secs: u64,

    /// Depth bound for the per-directory device fallback.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Directory names excluded from local scans.
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
}

fn default_device_root() -> String {
    "/sdcard".to_string()
}

fn default_local_min_size() -> String {
    "100MB".to_string()
}

fn default_device_min_size() -> String {
    "50MB".to_string()
}

fn default_top() -> usize {
    50
}

fn default_shell_timeout_secs() -> u64 {
    120
}

fn default_max_depth() -> usize {
    8
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            device_root: default_device_root(),
            local_min_size: default_local_min_size(),
            device_min_size: default_device_min_size(),
            top: default_top(),
            shell_timeout_secs: default_shell_timeout_secs(),
            max_depth: default_max_depth(),
            exclude_dirs: Vec::new(),
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_field() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.device_root, "/sdcard");
        assert_eq!(config.device_min_size, "50MB");
        assert_eq!(config.top, 50);
        assert_eq!(config.shell_timeout_secs, 120);
        assert_eq!(config.max_depth, 8);
        assert!(config.exclude_dirs.is_empty());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config: AppConfig =
            serde_json::from_str(r#"{"device_root": "/storage/emulated/0", "top": 10}"#).unwrap();
        assert_eq!(config.device_root, "/storage/emulated/0");
        assert_eq!(config.top, 10);
        assert_eq!(config.shell_timeout_secs, 120);
    }
}
