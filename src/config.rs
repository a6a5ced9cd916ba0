//! Project configuration (`tsol.toml`) parsing and types.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tsol_codegen_sol::{CodegenOptions, DEFAULT_INDENT};
use tsol_semantic::DEFAULT_RECEIVER;

/// File looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "tsol.toml";

/// Root configuration structure for tsol.toml.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct TsolConfig {
    /// Build configuration.
    #[serde(default)]
    pub build: BuildConfig,
    /// Intrinsic receiver configuration.
    #[serde(default)]
    pub intrinsics: IntrinsicsConfig,
}

/// Build configuration section.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct BuildConfig {
    /// Indentation unit of generated contracts.
    pub indent: Option<String>,
    /// Default output directory for `tsolc compile`.
    pub out_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct IntrinsicsConfig {
    /// Exported name of the intrinsic receiver.
    pub receiver: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl TsolConfig {
    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Load `explicit` if given, otherwise `tsol.toml` in the current
    /// directory if it exists, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => {
                let path = Path::new(CONFIG_FILE_NAME);
                if path.exists() {
                    Self::load_from_path(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Code generation options described by this configuration.
    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions::default()
            .with_indent(self.build.indent())
            .with_receiver(self.intrinsics.receiver())
    }
}

impl BuildConfig {
    /// Get the indentation unit, defaulting to three spaces.
    pub fn indent(&self) -> &str {
        self.indent.as_deref().unwrap_or(DEFAULT_INDENT)
    }

    pub fn out_dir(&self) -> Option<&str> {
        self.out_dir.as_deref()
    }
}

impl IntrinsicsConfig {
    /// Get the receiver name, defaulting to `ETH`.
    pub fn receiver(&self) -> &str {
        self.receiver.as_deref().unwrap_or(DEFAULT_RECEIVER)
    }
}
