use crate::domain::{
    config::PbiLinkConfig,
    error::{PbiLinkError, PbiLinkResult},
};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager
pub struct ConfigManager {
    global_config_path: PathBuf,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> PbiLinkResult<Self> {
        let global_config_path = Self::get_global_config_path()?;
        let project_config_path = Self::find_project_config_path();

        Ok(Self {
            global_config_path,
            project_config_path,
        })
    }

    /// Load configuration from files
    pub fn load_config(&self) -> PbiLinkResult<PbiLinkConfig> {
        // Start with default configuration
        let mut config = PbiLinkConfig::default();

        // Load global configuration if exists
        if self.global_config_path.exists() {
            config = self.load_config_from_path(&self.global_config_path)?;
        }

        // Project tool settings override global ones
        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                let project_config = self.load_config_from_path(project_path)?;
                config.tool = project_config.tool;
            }
        }

        Ok(config)
    }

    /// Get global configuration path
    fn get_global_config_path() -> PbiLinkResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| PbiLinkError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("pbilink").join("config.toml"))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(".pbilink").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> PbiLinkResult<PbiLinkConfig> {
        let content = fs::read_to_string(path).map_err(|e| PbiLinkError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| PbiLinkError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Save configuration to specific path
    pub fn save_config_to_path(&self, path: &Path, config: &PbiLinkConfig) -> PbiLinkResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PbiLinkError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| PbiLinkError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| PbiLinkError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Create default project configuration
    pub fn init_project_config(&self, path: &Path) -> PbiLinkResult<()> {
        let config_dir = path.join(".pbilink");
        let config_file = config_dir.join("config.toml");

        if config_file.exists() {
            return Err(PbiLinkError::Config {
                message: "Project configuration already exists".to_string(),
            });
        }

        self.save_config_to_path(&config_file, &PbiLinkConfig::default())
    }

    /// Get the current project config path (if any)
    pub fn get_project_config_path(&self) -> Option<&PathBuf> {
        self.project_config_path.as_ref()
    }

    /// Get the global config path
    pub fn get_global_config_path_ref(&self) -> &PathBuf {
        &self.global_config_path
    }
}
