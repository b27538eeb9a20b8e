//! Configuration loading for the aspect topic tools.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `<config dir>/aspect-topics/config.toml`.

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::AspectError;

const APP_NAME: &str = "aspect-topics";

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Word-embedding table (GloVe or word2vec text format)
    #[serde(default = "default_embeddings_path")]
    pub embeddings_path: String,

    /// Ontology export (JSON synset list)
    #[serde(default = "default_ontology_path")]
    pub ontology_path: String,

    /// Optional VADER-format sentiment lexicon
    #[serde(default)]
    pub sentiment_path: Option<String>,

    /// Directory the topic and aspect tables are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_embeddings_path() -> String {
    data_dir().join("embeddings.txt").to_string_lossy().to_string()
}

fn default_ontology_path() -> String {
    data_dir().join("ontology.json").to_string_lossy().to_string()
}

fn default_output_dir() -> String {
    "./output".to_string()
}

fn data_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            embeddings_path: default_embeddings_path(),
            ontology_path: default_ontology_path(),
            sentiment_path: None,
            output_dir: default_output_dir(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (`<config dir>/aspect-topics/config.toml`)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (`ASPECT_*`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, AspectError> {
        let config = layered(cli_config_path)?;
        config
            .try_deserialize()
            .map_err(|e| AspectError::Config(e.to_string()))
    }
}

/// Deserialize one named section (e.g. `topics`) from the same layers as
/// [`Settings::load`]. A missing section yields `T::default()`.
pub fn load_section<T>(cli_config_path: Option<&str>, section: &str) -> Result<T, AspectError>
where
    T: DeserializeOwned + Default,
{
    let config = layered(cli_config_path)?;
    match config.get::<T>(section) {
        Ok(value) => Ok(value),
        Err(ConfigError::NotFound(_)) => Ok(T::default()),
        Err(e) => Err(AspectError::Config(e.to_string())),
    }
}

fn layered(cli_config_path: Option<&str>) -> Result<Config, AspectError> {
    let config_dir = ProjectDirs::from("", "", APP_NAME)
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let default_config_path = config_dir.join("config");

    let mut builder = Config::builder()
        .set_default("log_level", default_log_level())
        .map_err(|e| AspectError::Config(e.to_string()))?
        .set_default("embeddings_path", default_embeddings_path())
        .map_err(|e| AspectError::Config(e.to_string()))?
        .set_default("ontology_path", default_ontology_path())
        .map_err(|e| AspectError::Config(e.to_string()))?
        .set_default("output_dir", default_output_dir())
        .map_err(|e| AspectError::Config(e.to_string()))?
        .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

    if let Some(path) = cli_config_path {
        builder = builder.add_source(File::with_name(path).required(true));
    }

    // ASPECT_LOG_LEVEL, ASPECT_TOPICS__PROPAGATION__DAMPING, ...
    builder = builder.add_source(
        Environment::with_prefix("ASPECT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|e| AspectError::Config(e.to_string()))
}
