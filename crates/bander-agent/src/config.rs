//! Agent configuration (TOML).
//!
//! The file is parsed into a permissive `*Input` shape where every field is
//! optional, then [`AgentConfigInput::resolve`] fills defaults and validates.
//! Command-line flags are applied on top of the resolved config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bander_core::Region;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_VERSION: u32 = 1;

const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(5);
const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config version {0}")]
    Version(u32),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Input (as written in the file) ──────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentConfigInput {
    pub version: u32,
    pub scan_interval_s: Option<u64>,
    pub retry_backoff_s: Option<u64>,
    pub region: Option<String>,
    pub format: Option<String>,
    pub top_n: Option<usize>,
    pub source: SourceConfigInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfigInput {
    pub kind: Option<String>,
    pub path: Option<PathBuf>,
    pub seed: Option<u64>,
}

// ── Resolved ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Where observations come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    /// Synthetic landscape; a fixed seed makes runs reproducible.
    Simulate { seed: Option<u64> },
    /// JSON array of observations re-read on every scan.
    Snapshot { path: PathBuf },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Simulate { seed: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub version: u32,
    pub scan_interval: Duration,
    pub retry_backoff: Duration,
    pub region: Region,
    pub format: OutputFormat,
    pub top_n: usize,
    pub source: SourceConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            region: Region::default(),
            format: OutputFormat::default(),
            top_n: DEFAULT_TOP_N,
            source: SourceConfig::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive_secs(field: &'static str, value: Option<u64>, default: Duration) -> Result<Duration, ConfigError> {
    match value {
        None => Ok(default),
        Some(0) => Err(invalid(field, "must be at least 1 second")),
        Some(secs) => Ok(Duration::from_secs(secs)),
    }
}

impl SourceConfigInput {
    pub fn resolve(self) -> Result<SourceConfig, ConfigError> {
        let kind = self.kind.as_deref().map(str::trim).unwrap_or("simulate");
        match kind {
            "simulate" => Ok(SourceConfig::Simulate { seed: self.seed }),
            "snapshot" => {
                let path = self
                    .path
                    .filter(|p| !p.as_os_str().is_empty())
                    .ok_or_else(|| invalid("source.path", "snapshot source requires a path"))?;
                Ok(SourceConfig::Snapshot { path })
            }
            other => Err(invalid("source.kind", format!("unknown source kind: {other}"))),
        }
    }
}

impl AgentConfigInput {
    pub fn resolve(self) -> Result<AgentConfig, ConfigError> {
        let version = if self.version == 0 {
            CONFIG_VERSION
        } else {
            self.version
        };
        if version != CONFIG_VERSION {
            return Err(ConfigError::Version(version));
        }

        let region = match self.region {
            Some(r) => r.parse().map_err(|e: String| invalid("region", e))?,
            None => Region::default(),
        };
        let format = match self.format {
            Some(f) => f.parse().map_err(|e: String| invalid("format", e))?,
            None => OutputFormat::default(),
        };
        let top_n = match self.top_n {
            Some(0) => return Err(invalid("top_n", "must be at least 1")),
            Some(n) => n,
            None => DEFAULT_TOP_N,
        };

        Ok(AgentConfig {
            version,
            scan_interval: positive_secs("scan_interval_s", self.scan_interval_s, DEFAULT_SCAN_INTERVAL)?,
            retry_backoff: positive_secs("retry_backoff_s", self.retry_backoff_s, DEFAULT_RETRY_BACKOFF)?,
            region,
            format,
            top_n,
            source: self.source.resolve()?,
        })
    }
}

impl AgentConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Ok(AgentConfig::default());
        }
        let parsed: AgentConfigInput = toml::from_str(input)?;
        parsed.resolve()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
