//! Feature configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QuillError, Result};

/// Configuration for one scripting feature instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Product namespace under the application-data directory.
    #[serde(default = "default_product")]
    pub product: String,

    /// Feature name, the last component of the configuration directory.
    #[serde(default = "default_feature")]
    pub feature: String,

    /// Overrides the platform-derived configuration directory.
    #[serde(default)]
    pub config_dir: Option<PathBuf>,

    /// Import lines placed before the generated capability imports.
    #[serde(default)]
    pub prelude: Vec<String>,

    /// Script libraries loaded when the feature activates.
    #[serde(default)]
    pub libraries: Vec<LibraryConfig>,
}

/// A script library bound as a static module at activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Module name scripts use to reach the library (`name::function()`).
    pub name: String,

    /// Path to the library source, relative to the configuration directory
    /// unless absolute.
    pub path: PathBuf,
}

fn default_product() -> String {
    "quill".to_string()
}

fn default_feature() -> String {
    "scripting".to_string()
}

impl FeatureConfig {
    /// Creates a configuration for the given product and feature.
    pub fn new(product: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            feature: feature.into(),
            config_dir: None,
            prelude: Vec::new(),
            libraries: Vec::new(),
        }
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| QuillError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content)
            .map_err(|e| QuillError::activation(format!("config {}", path.display()), e))
    }

    /// Sets the configuration directory.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Sets the prelude import lines.
    pub fn with_prelude(mut self, prelude: Vec<String>) -> Self {
        self.prelude = prelude;
        self
    }

    /// Adds a script library.
    pub fn with_library(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.libraries.push(LibraryConfig {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    /// Returns the configuration directory: the override if set, otherwise
    /// `<data dir>/<product>/<feature>`.
    pub fn resolve_config_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.config_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir().ok_or_else(|| {
            QuillError::activation("config directory", "no application data directory")
        })?;

        Ok(data_dir.join(&self.product).join(&self.feature))
    }

    /// Resolves a library path against the configuration directory.
    pub fn library_path(&self, library: &LibraryConfig, config_dir: &Path) -> PathBuf {
        if library.path.is_absolute() {
            library.path.clone()
        } else {
            config_dir.join(&library.path)
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::new(default_product(), default_feature())
    }
}
