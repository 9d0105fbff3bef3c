use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIs};

use crate::{
    magic::ENV_CONFIG_PATH,
    utils::error::{ReflError, ReflResult},
};

/// What to do when a descriptor is added under a name its type already uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIs)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DuplicateMemberPolicy {
    /// Keep the existing descriptor and fail the insertion.
    #[default]
    Reject,
    /// Replace the existing descriptor, logging a warning.
    Overwrite,
}

/// Knobs controlling how strictly a registry validates what it is given.
///
/// ```toml
/// strict_properties = true
/// duplicate_members = "reject"
/// log_lookup_misses = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Check accessor arity and getter/setter agreement when building properties.
    pub strict_properties: bool,

    pub duplicate_members: DuplicateMemberPolicy,

    /// Emit a warning when a lookup by name misses.
    pub log_lookup_misses: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_properties: true,
            duplicate_members: DuplicateMemberPolicy::Reject,
            log_lookup_misses: true,
        }
    }
}

impl RegistryConfig {
    /// Path of the configuration file named by [`ENV_CONFIG_PATH`], if set.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from)
    }

    pub fn from_toml_str(toml_str: &str) -> ReflResult<Self> {
        toml::from_str(toml_str).map_err(|e| ReflError::ConfigParse {
            source: e,
            file: "<inline>".to_string(),
        })
    }

    /// Load a configuration from a TOML file.
    pub fn load_from_toml(path: &Path) -> ReflResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;

        let config = toml::from_str(&toml_str).map_err(|e| ReflError::ConfigParse {
            source: e,
            file: path.display().to_string(),
        })?;

        info!("Loaded reflection configuration from `{}`", path.display());
        Ok(config)
    }

    /// Load the file named by [`ENV_CONFIG_PATH`], or fall back to the defaults
    /// when the variable is not set.
    pub fn from_env() -> ReflResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from_toml(&path),
            None => Ok(Self::default()),
        }
    }
}
