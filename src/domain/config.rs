use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// PbiLink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PbiLinkConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
    /// External tool configuration
    #[serde(default)]
    pub tool: ToolConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Timeout for the status query subprocess in milliseconds
    #[serde(default = "default_status_timeout")]
    pub status_timeout_ms: u64,
    /// Timeout for the release download in milliseconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_ms: u64,
}

/// External tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Tool binary name or full path
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Installation directory; defaults to the platform local-data dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,
    /// Release artifact URL
    #[serde(default = "default_download_url")]
    pub download_url: String,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_status_timeout() -> u64 {
    10_000
}

fn default_download_timeout() -> u64 {
    300_000
}

fn default_binary() -> String {
    "pbi-tools".to_string()
}

fn default_download_url() -> String {
    "https://github.com/pbi-tools/pbi-tools/releases/download/2.0.0/pbi-tools.2.0.0.zip".to_string()
}

impl Default for PbiLinkConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            tool: ToolConfig::default(),
        }
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            status_timeout_ms: default_status_timeout(),
            download_timeout_ms: default_download_timeout(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            install_dir: None,
            download_url: default_download_url(),
        }
    }
}

impl ToolConfig {
    /// Resolve the installation directory, falling back to
    /// `<local data dir>/pbi-tools` when not configured.
    pub fn resolved_install_dir(&self) -> Option<PathBuf> {
        self.install_dir.clone().or_else(|| {
            dirs::data_local_dir()
                .or_else(dirs::home_dir)
                .map(|d| d.join("pbi-tools"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = PbiLinkConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let _deserialized: PbiLinkConfig = toml::from_str(&toml_str).unwrap();
    }

    #[test]
    fn test_defaults_applied_to_empty_document() {
        let config: PbiLinkConfig = toml::from_str("").unwrap();
        assert_eq!(config.global.log_level, "info");
        assert_eq!(config.global.status_timeout_ms, 10_000);
        assert_eq!(config.tool.binary, "pbi-tools");
        assert!(config.tool.download_url.starts_with("https://"));
    }

    #[test]
    fn test_partial_tool_table() {
        let config: PbiLinkConfig = toml::from_str(
            r#"
            [tool]
            binary = "pbi-tools-preview"
            "#,
        )
        .unwrap();
        assert_eq!(config.tool.binary, "pbi-tools-preview");
        // Unset fields keep their defaults
        assert!(config.tool.download_url.contains("pbi-tools"));
        assert_eq!(config.global.status_timeout_ms, 10_000);
    }

    #[test]
    fn test_resolved_install_dir_prefers_override() {
        let config = ToolConfig {
            install_dir: Some(PathBuf::from("/opt/pbi-tools")),
            ..ToolConfig::default()
        };
        assert_eq!(
            config.resolved_install_dir(),
            Some(PathBuf::from("/opt/pbi-tools"))
        );
    }
}
