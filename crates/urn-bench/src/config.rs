use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;
use urn_core::{TrialPlan, UrnError};

const DEFAULT_RUN_ID: &str = "urn_match";
const DEFAULT_LOG_PATH: &str = "out/{run_id}/telemetry.jsonl";
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root experiment configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExperimentConfig {
    #[serde(default = "default_run_id")]
    pub run_id: String,
    #[serde(default)]
    pub urn: UrnConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default = "default_variants")]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            run_id: default_run_id(),
            urn: UrnConfig::default(),
            simulation: SimulationConfig::default(),
            variants: default_variants(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load and validate configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut cfg = Self::load(path)?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(cfg)
    }

    /// Parse a YAML file without validating it, so command-line overrides can be applied first.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        let total = self.urn.validate()?;
        self.simulation.validate(total)?;
        validate_variants(&self.variants)?;
        self.logging.normalize();
        self.logging.validate()?;
        Ok(())
    }

    pub fn plan(&self) -> TrialPlan {
        self.simulation.plan
    }

    /// Structured log destination with `{run_id}` substituted.
    pub fn resolved_log_path(&self) -> PathBuf {
        resolve_template(&self.run_id, &self.logging.path)
    }
}

fn default_run_id() -> String {
    DEFAULT_RUN_ID.to_string()
}

/// Urn composition: one ball count per color, in color order.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UrnConfig {
    #[serde(default)]
    pub counts: Vec<u32>,
}

impl UrnConfig {
    fn validate(&self) -> Result<u64, ValidationError> {
        if self.counts.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "urn.counts".to_string(),
                message: "at least one color count is required".to_string(),
            });
        }

        Ok(self.total())
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&count| u64::from(count)).sum()
    }
}

/// Trial protocol plus the RNG seed shared by every variant.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SimulationConfig {
    #[serde(flatten)]
    pub plan: TrialPlan,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    fn validate(&self, total: u64) -> Result<(), ValidationError> {
        let available = usize::try_from(total).unwrap_or(usize::MAX);
        self.plan.validate(available).map_err(|err| {
            let field = match err {
                UrnError::ZeroCompare => "simulation.compare",
                UrnError::ZeroTrials => "simulation.trials",
                _ => "simulation.discard",
            };
            ValidationError::InvalidField {
                field: field.to_string(),
                message: err.to_string(),
            }
        })
    }
}

/// Urn representation to simulate with.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    List,
    Count,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::List, Variant::Count];

    pub const fn label(self) -> &'static str {
        match self {
            Variant::List => "ListUrn",
            Variant::Count => "CountUrn",
        }
    }
}

fn default_variants() -> Vec<Variant> {
    Variant::ALL.to_vec()
}

fn validate_variants(variants: &[Variant]) -> Result<(), ValidationError> {
    if variants.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "variants".to_string(),
            message: "at least one urn variant must be selected".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for variant in variants {
        if !seen.insert(*variant) {
            return Err(ValidationError::InvalidField {
                field: "variants".to_string(),
                message: format!("variant '{}' listed more than once", variant.label()),
            });
        }
    }

    Ok(())
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            path: default_log_path(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown tracing level '{}'", self.tracing_level),
            });
        }

        if self.enable_structured && self.path.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "logging.path".to_string(),
                message: "path must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_path() -> String {
    DEFAULT_LOG_PATH.to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
