//! Configuration management for `tola-atom.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                          |
//! |---------------|--------------------------------------------------|
//! | `[namespace]` | Default extension namespace URI and XML prefix   |
//! | `[render]`    | XML output settings (minify)                     |
//!
//! A missing config file is not an error: every field has a default.

mod error;
mod util;

pub use error::ConfigError;

use crate::{debug, feed::RenderOptions, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::{find_config_file, is_absolute_uri};

/// Default config file name.
pub const CONFIG_FILE: &str = "tola-atom.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing tola-atom.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtomConfig {
    /// Absolute path to the loaded config file (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Extension namespace settings
    #[serde(default)]
    pub namespace: NamespaceConfig,

    /// XML output settings
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NamespaceConfig {
    /// URI for fields that are not Atom elements.
    pub uri: Option<String>,
    /// XML prefix bound to `uri`.
    pub prefix: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            uri: None,
            prefix: "ext".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Join output lines into a single line.
    pub minify: bool,
}

impl AtomConfig {
    /// Load configuration, searching upward from cwd for `config_name`.
    pub fn load(config_name: &Path) -> Result<Self> {
        let mut config = match find_config_file(config_name) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", config_name.display());
                Self::default()
            }
        };

        config.normalize();
        config
            .validate()
            .with_context(|| format!("invalid config `{}`", config_name.display()))?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Treat an empty namespace URI as unset.
    fn normalize(&mut self) {
        if self.namespace.uri.as_deref().is_some_and(str::is_empty) {
            self.namespace.uri = None;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.namespace.prefix;
        let valid_prefix = prefix
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !prefix.to_ascii_lowercase().starts_with("xml");
        if !valid_prefix {
            return Err(ConfigError::Validation(format!(
                "namespace.prefix `{prefix}` is not a valid XML prefix"
            )));
        }

        if let Some(uri) = &self.namespace.uri
            && !is_absolute_uri(uri)
        {
            return Err(ConfigError::Validation(format!(
                "namespace.uri `{uri}` is not an absolute URI"
            )));
        }

        Ok(())
    }

    /// Default extension namespace, if configured.
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace.uri.as_deref()
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            prefix: self.namespace.prefix.clone(),
            minify: self.render.minify,
        }
    }
}

// ============================================================================
// tests
// ============================================================================
