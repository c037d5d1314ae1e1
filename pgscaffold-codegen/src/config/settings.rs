//! Configuration settings for pgscaffold-codegen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::error::{GeneratorError, Result};

/// Emission flavor for generated sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Flavor {
    #[default]
    Typescript,
    Javascript,
}

impl Flavor {
    /// File extension of emitted sources
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Typescript => "ts",
            Self::Javascript => "js",
        }
    }
}

/// How the emitted CRUD methods obtain a database connection.
///
/// Pooled classes share the emitted `db` helper; per-call classes open and
/// end a fresh client inside every operation. These are distinct output
/// styles with distinct emitted contracts, never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ConnectionStyle {
    #[default]
    Pooled,
    PerCall,
}

/// Main configuration struct for scaffold generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Path to the JSON schema file (mutually exclusive with database_url)
    #[serde(default)]
    pub schema_file: Option<PathBuf>,

    /// PostgreSQL connection string for live introspection
    #[serde(default)]
    pub database_url: Option<String>,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Whether to generate server model files
    #[serde(default = "default_generate_server")]
    pub generate_server: bool,

    /// Whether to generate client scaffold files
    #[serde(default = "default_generate_client")]
    pub generate_client: bool,

    /// Output root; server and client files go into subdirectories
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Emission flavor
    #[serde(default)]
    pub flavor: Flavor,

    /// Connection style of the emitted CRUD methods
    #[serde(default)]
    pub connection_style: ConnectionStyle,

    /// Dry run mode - preview without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_generate_server() -> bool {
    defaults::GENERATE_SERVER
}
fn default_generate_client() -> bool {
    defaults::GENERATE_CLIENT
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_DIR)
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema_file: None,
            database_url: None,
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            generate_server: default_generate_server(),
            generate_client: default_generate_client(),
            output_dir: default_output_dir(),
            flavor: Flavor::default(),
            connection_style: ConnectionStyle::default(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a default config reading the given schema file
    pub fn with_schema_file(schema_file: PathBuf) -> Self {
        Self {
            schema_file: Some(schema_file),
            ..Default::default()
        }
    }

    /// Create a default config introspecting the given database
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: Some(database_url.into()),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GeneratorConfig = toml::from_str(&content).map_err(|e| {
            GeneratorError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from config file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            // Try default locations
            builder = builder.add_source(File::with_name("pgscaffold").required(false));
        }

        // Override with environment variables (PGSCAFFOLD_*)
        builder = builder.add_source(Environment::with_prefix("PGSCAFFOLD").separator("_"));

        let config: GeneratorConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match (&self.schema_file, &self.database_url) {
            (None, None) => {
                return Err(GeneratorError::ValidationError(
                    "either schema_file or database_url is required".into(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(GeneratorError::ValidationError(
                    "schema_file and database_url are mutually exclusive".into(),
                ));
            }
            _ => {}
        }

        if let Some(schema_file) = &self.schema_file {
            if !schema_file.exists() {
                return Err(GeneratorError::ValidationError(format!(
                    "Schema file not found: {}",
                    schema_file.display()
                )));
            }
        }

        if !self.generate_server && !self.generate_client {
            return Err(GeneratorError::ValidationError(
                "nothing to generate: enable generate_server and/or generate_client".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.include_tables, "*");
        assert!(config.generate_server);
        assert!(!config.generate_client);
        assert_eq!(config.output_dir, PathBuf::from("services"));
        assert_eq!(config.flavor, Flavor::Typescript);
        assert_eq!(config.connection_style, ConnectionStyle::Pooled);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_validation_missing_source() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_sources() {
        let mut config = GeneratorConfig::with_database_url("postgres://localhost/app");
        config.schema_file = Some(PathBuf::from("schema.json"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_nothing_to_generate() {
        let mut config = GeneratorConfig::with_database_url("postgres://localhost/app");
        config.generate_server = false;
        config.generate_client = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_content = r#"
            schema_file = "schema.json"
            flavor = "javascript"
            connection_style = "per-call"
            log_level = "debug"
        "#;
        let config: GeneratorConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.schema_file, Some(PathBuf::from("schema.json")));
        assert_eq!(config.flavor, Flavor::Javascript);
        assert_eq!(config.connection_style, ConnectionStyle::PerCall);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_flavor_extension() {
        assert_eq!(Flavor::Typescript.extension(), "ts");
        assert_eq!(Flavor::Javascript.extension(), "js");
    }
}
