//! Export configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Export configuration matching the folio.yml schema
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Format converter (Markdown → LaTeX, HTML → DOCX)
    #[serde(default = "default_converter")]
    pub converter: String,

    /// TeX engine for the LaTeX PDF back-end
    #[serde(default = "default_tex_engine")]
    pub tex_engine: String,

    /// Converter template; `--standalone` is used when absent
    #[serde(default)]
    pub latex_template: Option<PathBuf>,

    /// HTML/CSS paged-media engine for the paged PDF back-end
    #[serde(default = "default_paged_media_engine")]
    pub paged_media_engine: String,

    /// Stylesheet replacing the built-in article stylesheet
    #[serde(default)]
    pub stylesheet: Option<PathBuf>,

    /// Parent directory for scratch workspaces (OS temp dir when absent)
    #[serde(default)]
    pub workspace_root: Option<PathBuf>,

    /// Wall-clock limit per compiler subprocess
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_citation_style")]
    pub citation_style: String,

    #[serde(default = "default_paper_size")]
    pub paper_size: String,

    #[serde(default = "default_font_size")]
    pub font_size: String,

    #[serde(default = "default_margin")]
    pub margin: String,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    pub(crate) config_path: Option<PathBuf>,
}

fn default_converter() -> String {
    String::from("pandoc")
}

fn default_tex_engine() -> String {
    String::from("xelatex")
}

fn default_paged_media_engine() -> String {
    String::from("vivliostyle")
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_citation_style() -> String {
    String::from("gost-numeric")
}

fn default_paper_size() -> String {
    String::from("a4paper")
}

fn default_font_size() -> String {
    String::from("12pt")
}

fn default_margin() -> String {
    String::from("2.5cm")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            converter: default_converter(),
            tex_engine: default_tex_engine(),
            latex_template: None,
            paged_media_engine: default_paged_media_engine(),
            stylesheet: None,
            workspace_root: None,
            timeout_secs: default_timeout_secs(),
            citation_style: default_citation_style(),
            paper_size: default_paper_size(),
            font_size: default_font_size(),
            margin: default_margin(),
            config_path: None,
        }
    }
}

impl ExportConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load configuration from a file, or fall back to defaults if it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as null rather than an empty map
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the converter template, resolved relative to config file
    pub fn latex_template_path(&self) -> Option<PathBuf> {
        self.latex_template.as_ref().map(|p| self.resolve_path(p))
    }

    /// Get the stylesheet override, resolved relative to config file
    pub fn stylesheet_path(&self) -> Option<PathBuf> {
        self.stylesheet.as_ref().map(|p| self.resolve_path(p))
    }

    /// Get the workspace root (None means the OS temp dir)
    pub fn workspace_root_dir(&self) -> Option<PathBuf> {
        self.workspace_root.as_ref().map(|p| self.resolve_path(p))
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}
