use std::{
    env, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

pub const QUALIFIER: &str = "org";
pub const ORGANIZATION: &str = "partition";
pub const APPLICATION: &str = "partition";

pub const CONFIG_FILE: &str = "config.toml";
pub const MAX_DEPTH_ENV: &str = "PARTITION_MAX_DEPTH";
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub fn config_root() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).map(|p| p.config_dir().to_path_buf())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Deepest node the walkers descend into; anything below is emitted as
    /// its serialized markup.
    pub max_depth: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// Accepts either a `[partition]` table or a bare top-level `max_depth`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    partition: Option<PartitionConfig>,
    max_depth: Option<usize>,
}

impl PartitionConfig {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let base = file.partition.unwrap_or_default();
        Ok(Self::new(file.max_depth.unwrap_or(base.max_depth)))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reads `config.toml` from the platform config directory. A missing or
    /// broken file yields the defaults.
    pub fn load() -> Self {
        let Some(path) = config_root().map(|root| root.join(CONFIG_FILE)) else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_max_depth_override(env::var(MAX_DEPTH_ENV).ok().as_deref())
    }

    pub(crate) fn with_max_depth_override(self, value: Option<&str>) -> Self {
        let Some(value) = value else {
            return self;
        };
        match value.trim().parse::<usize>() {
            Ok(depth) => Self::new(depth),
            Err(_) => {
                log::warn!("{}={:?} is not a depth, keeping {}", MAX_DEPTH_ENV, value, self.max_depth);
                self
            }
        }
    }
}
