//! Configuration for blockgen.
//!
//! Settings come from an optional `blockgen.toml` next to the crate manifest,
//! then `BLOCKGEN_*` environment variables, then whatever the caller layers
//! on top with [`Config::merge`].

use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// File name looked up in the crate root.
pub const CONFIG_FILE: &str = "blockgen.toml";

pub const ENV_BASE_PACKAGE: &str = "BLOCKGEN_BASE_PACKAGE";
pub const ENV_MODULE_NAME: &str = "BLOCKGEN_MODULE_NAME";
pub const ENV_RUNTIME_CRATE: &str = "BLOCKGEN_RUNTIME_CRATE";
pub const ENV_PLATFORM_SUPPORT: &str = "BLOCKGEN_PLATFORM_SUPPORT";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

///
/// Config
///
/// Every field is optional here; required options are enforced by the
/// pipeline so a partial file can be completed from the environment.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Package (dotted or `::` separated) the artifacts are laid out under.
    pub base_package: Option<String>,

    /// Module name that prefixes the generated providers.
    pub module_name: Option<String>,

    /// Crate path generated adapters call into.
    pub runtime_crate: Option<String>,

    pub platform_support: Option<String>,
}

impl Config {
    /// Parse a TOML document.
    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file, or the empty config when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            tracing::debug!("loading {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load `blockgen.toml` from `dir` and apply the process environment.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        Ok(Self::load_or_default(&dir.join(CONFIG_FILE))?.with_env())
    }

    /// Apply `BLOCKGEN_*` overrides from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply `BLOCKGEN_*` overrides read through `lookup`. Blank values are
    /// ignored.
    #[must_use]
    pub fn apply_env(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        self.merge(Self {
            base_package: read(ENV_BASE_PACKAGE),
            module_name: read(ENV_MODULE_NAME),
            runtime_crate: read(ENV_RUNTIME_CRATE),
            platform_support: read(ENV_PLATFORM_SUPPORT),
        })
    }

    /// Layer `other` on top; its set fields win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            base_package: other.base_package.or(self.base_package),
            module_name: other.module_name.or(self.module_name),
            runtime_crate: other.runtime_crate.or(self.runtime_crate),
            platform_support: other.platform_support.or(self.platform_support),
        }
    }
}

///
/// TESTS
///
