//! Configuration loading from files and the environment.

use crate::config::{RecoveryPolicy, RoutingConfig};
use crate::error::{ConfigError, ConfigResult};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracking_core::FallbackStrategy;

/// Environment variable naming the config file to load
pub const ENV_CONFIG_PATH: &str = "TRACKING_ROUTER_CONFIG";
/// Environment override for the default strategy
pub const ENV_DEFAULT_STRATEGY: &str = "TRACKING_ROUTER_DEFAULT_STRATEGY";
/// Environment override for the recovery policy
pub const ENV_RECOVERY: &str = "TRACKING_ROUTER_RECOVERY";
/// Environment override for the failure window (humantime, e.g. `30m`)
pub const ENV_FAILURE_WINDOW: &str = "TRACKING_ROUTER_FAILURE_WINDOW";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML
    Toml,
    /// YAML
    Yaml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Detect the format from a file extension.
    ///
    /// # Errors
    /// Returns error for unknown or missing extensions
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse configuration content in this format.
    ///
    /// # Errors
    /// Returns error if the content does not deserialize
    pub fn parse(self, content: &str) -> ConfigResult<RoutingConfig> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| ConfigError::Parse {
                format: "toml",
                message: e.to_string(),
            }),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                format: "yaml",
                message: e.to_string(),
            }),
            Self::Json => serde_json::from_str(content).map_err(|e| ConfigError::Parse {
                format: "json",
                message: e.to_string(),
            }),
        }
    }
}

type EnvSource = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Builder-style configuration loader.
///
/// Layers, lowest precedence first: built-in defaults, the config file,
/// environment overrides. The result is always validated.
pub struct ConfigLoader {
    file: Option<PathBuf>,
    use_env: bool,
    env: EnvSource,
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("file", &self.file)
            .field("use_env", &self.use_env)
            .finish_non_exhaustive()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader reading the process environment
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: None,
            use_env: true,
            env: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Load from this file
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Load from the file named by `TRACKING_ROUTER_CONFIG`, if set
    #[must_use]
    pub fn with_env_file(mut self) -> Self {
        if self.file.is_none() {
            self.file = (self.env)(ENV_CONFIG_PATH).map(PathBuf::from);
        }
        self
    }

    /// Enable or disable environment overrides
    #[must_use]
    pub fn with_env_overrides(mut self, enabled: bool) -> Self {
        self.use_env = enabled;
        self
    }

    /// Replace the environment lookup, mainly for tests
    #[must_use]
    pub fn with_env_source<F>(mut self, source: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Box::new(source);
        self
    }

    /// Load and validate the configuration
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, an override is
    /// malformed, or the result fails validation
    pub fn load(&self) -> ConfigResult<RoutingConfig> {
        let mut config = match &self.file {
            Some(path) => {
                let format = ConfigFormat::from_path(path)?;
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                let config = format.parse(&content)?;
                info!(path = %path.display(), "Loaded routing configuration");
                config
            }
            None => {
                debug!("No config file given, using built-in routing defaults");
                RoutingConfig::default()
            }
        };

        if self.use_env {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate_all()?;
        Ok(config)
    }

    fn apply_env_overrides(&self, config: &mut RoutingConfig) -> ConfigResult<()> {
        if let Some(value) = (self.env)(ENV_DEFAULT_STRATEGY) {
            config.default_strategy = value
                .parse::<FallbackStrategy>()
                .map_err(|e| ConfigError::environment(ENV_DEFAULT_STRATEGY, e.to_string()))?;
            debug!(strategy = %config.default_strategy, "Default strategy overridden from environment");
        }

        if let Some(value) = (self.env)(ENV_RECOVERY) {
            config.reputation.recovery = value
                .parse::<RecoveryPolicy>()
                .map_err(|e| ConfigError::environment(ENV_RECOVERY, e.to_string()))?;
            debug!(recovery = %config.reputation.recovery, "Recovery policy overridden from environment");
        }

        if let Some(value) = (self.env)(ENV_FAILURE_WINDOW) {
            config.reputation.failure_window =
                humantime_serde::re::humantime::parse_duration(value.trim())
                    .map_err(|e| ConfigError::environment(ENV_FAILURE_WINDOW, e.to_string()))?;
        }

        Ok(())
    }
}
