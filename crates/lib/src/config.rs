//! # Pipeline Configuration
//!
//! Settings are layered from built-in defaults, an optional `bookpipe.yml`
//! file and `BOOKPIPE_*` environment variables. The defaults reproduce the
//! stock run: fetch catalogue page 3, pipe it through
//! `python3 stdin_adapter.py`, print the first two books as text.

use crate::errors::PipelineError;
use crate::fetch::DEFAULT_CATALOGUE_URL;
use crate::transform::rest::DEFAULT_ENDPOINT;
use crate::transform::stdin::{DEFAULT_ARGS, DEFAULT_PROGRAM};
use crate::transform::{RestTransform, StdinTransform, Transform};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Looked up in the working directory when no explicit file is given.
pub const DEFAULT_CONFIG_FILE: &str = "bookpipe.yml";
pub const ENV_PREFIX: &str = "BOOKPIPE";
pub const DEFAULT_COUNT: usize = 2;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
    /// The configuration loaded but holds an unusable value.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// Which collaborator turns HTML into JSON.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// Spawn a process and talk to it over stdin/stdout.
    #[default]
    Stdin,
    /// POST the page to an HTTP adapter.
    Rest,
}

impl FromStr for TransformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdin" => Ok(TransformKind::Stdin),
            "rest" => Ok(TransformKind::Rest),
            other => Err(format!("unknown transform '{other}' (expected 'stdin' or 'rest')")),
        }
    }
}

/// How selected books are written to stdout.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{other}' (expected 'text' or 'json')")),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransformConfig {
    pub kind: TransformKind,
    /// Executable for the `stdin` transform.
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// Adapter URL for the `rest` transform.
    pub endpoint: String,
}

impl TransformConfig {
    /// Instantiates the configured transform.
    pub fn build(&self) -> Result<Box<dyn Transform>, PipelineError> {
        match self.kind {
            TransformKind::Stdin => {
                let mut transform = StdinTransform::new(self.program.clone(), self.args.clone());
                if let Some(dir) = &self.working_dir {
                    transform = transform.working_dir(dir);
                }
                Ok(Box::new(transform))
            }
            TransformKind::Rest => Ok(Box::new(RestTransform::new(self.endpoint.clone())?)),
        }
    }
}

/// The root configuration structure, mapping directly to `bookpipe.yml`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Catalogue page to fetch. Loaded from `BOOKPIPE_URL`.
    pub url: String,
    /// How many leading books must exist and get printed. Loaded from `BOOKPIPE_COUNT`.
    pub count: usize,
    pub format: OutputFormat,
    pub transform: TransformConfig,
}

impl AppConfig {
    /// Rejects values no run could succeed with.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::Invalid("count must be at least 1".to_string()));
        }
        if self.url.trim().is_empty() {
            return Err(ConfigError::Invalid("url must not be empty".to_string()));
        }
        if self.transform.kind == TransformKind::Stdin && self.transform.program.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "transform.program must not be empty".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Loads and validates the configuration.
pub fn get_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config(path)?.validate()
}

/// Loads the configuration layers without validating them.
///
/// Callers that layer more overrides on top (command-line flags) validate
/// once those are applied. With `path` set the file must exist; otherwise
/// `bookpipe.yml` is read from the working directory when present.
/// Environment variables override the file, e.g.
/// `BOOKPIPE_TRANSFORM__PROGRAM=python3.12`, and `BOOKPIPE_TRANSFORM__ARGS`
/// takes a comma-separated list.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let default_args: Vec<&str> = DEFAULT_ARGS.to_vec();
    let mut builder = ConfigBuilder::builder()
        .set_default("url", DEFAULT_CATALOGUE_URL)?
        .set_default("count", DEFAULT_COUNT as i64)?
        .set_default("format", "text")?
        .set_default("transform.kind", "stdin")?
        .set_default("transform.program", DEFAULT_PROGRAM)?
        .set_default("transform.args", default_args)?
        .set_default("transform.endpoint", DEFAULT_ENDPOINT)?;

    builder = match path {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::NotFound(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            info!("Loading configuration from {}", path.display());
            builder.add_source(File::from(path).format(FileFormat::Yaml))
        }
        None => builder.add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false)),
    };

    let settings = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("transform.args")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize::<AppConfig>()?)
}
