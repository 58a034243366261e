//! # Server Configuration
//!
//! Settings are layered, lowest to highest precedence:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. `RDFDOC_*` environment variables
//!
//! ```toml
//! data_path = "data"
//! queries_path = "queries"
//! template_path = "templates"
//! use_x_accel_redirect = false
//! debug = false
//! resolver = "memory"
//! cors_origins = "https://example.org"
//! ```

use rdfdoc_core::primitives::MAX_CACHED_DOCUMENTS;
use rdfdoc_core::{EngineConfig, RdfDocError, ResolverKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

pub const ENV_DATA_PATH: &str = "RDFDOC_DATA_PATH";
pub const ENV_QUERIES_PATH: &str = "RDFDOC_QUERIES_PATH";
pub const ENV_TEMPLATE_PATH: &str = "RDFDOC_TEMPLATE_PATH";
pub const ENV_USE_X_ACCEL_REDIRECT: &str = "RDFDOC_USE_X_ACCEL_REDIRECT";
pub const ENV_DEBUG: &str = "RDFDOC_DEBUG";
pub const ENV_RESOLVER: &str = "RDFDOC_RESOLVER";
pub const ENV_CORS_ORIGINS: &str = "RDFDOC_CORS_ORIGINS";

// =============================================================================
// SERVER CONFIG
// =============================================================================

/// Everything the server needs to know before it loads the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Root of the statement files. Must exist.
    pub data_path: PathBuf,
    /// Root of the SPARQL update scripts. May be missing.
    pub queries_path: PathBuf,
    /// Root of the HTML templates. May be missing.
    pub template_path: PathBuf,
    /// Hand native files to nginx instead of streaming them.
    pub use_x_accel_redirect: bool,
    /// Show full error detail on error pages.
    pub debug: bool,
    /// `memory` or `query`.
    pub resolver: String,
    /// Comma-separated origins, or `*`.
    pub cors_origins: Option<String>,
    /// Documents kept per snapshot cache.
    pub cache_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data"),
            queries_path: PathBuf::from("queries"),
            template_path: PathBuf::from("templates"),
            use_x_accel_redirect: false,
            debug: false,
            resolver: ResolverKind::default().to_string(),
            cors_origins: None,
            cache_capacity: MAX_CACHED_DOCUMENTS,
        }
    }
}

impl ServerConfig {
    /// Defaults, then `file` if given, then the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self, RdfDocError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.resolver_kind()?;
        Ok(config)
    }

    /// Parse a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, RdfDocError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RdfDocError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
            .map_err(|e| RdfDocError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Override fields from environment variables looked up with `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_DATA_PATH) {
            self.data_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_QUERIES_PATH) {
            self.queries_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_TEMPLATE_PATH) {
            self.template_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_USE_X_ACCEL_REDIRECT) {
            self.use_x_accel_redirect = parse_flag(&value);
        }
        if let Some(value) = lookup(ENV_DEBUG) {
            self.debug = parse_flag(&value);
        }
        if let Some(value) = lookup(ENV_RESOLVER) {
            self.resolver = value;
        }
        if let Some(value) = lookup(ENV_CORS_ORIGINS) {
            self.cors_origins = Some(value);
        }
    }

    pub fn resolver_kind(&self) -> Result<ResolverKind, RdfDocError> {
        self.resolver.parse()
    }

    /// Engine settings derived from this configuration.
    pub fn engine_config(&self) -> Result<EngineConfig, RdfDocError> {
        let mut engine = EngineConfig::new(&self.data_path);
        engine.queries_path = Some(self.queries_path.clone());
        engine.resolver = self.resolver_kind()?;
        engine.cache_capacity = self.cache_capacity;
        Ok(engine)
    }
}

/// `true`, `True` and `1` switch a flag on; anything else switches it off.
fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "True" | "1")
}
