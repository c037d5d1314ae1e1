//! pgscaffold-codegen: Generate TypeScript and JavaScript CRUD model classes
//! from a PostgreSQL schema
//!
//! This crate provides both a CLI tool and a library. The schema comes from
//! a JSON description file or from live introspection of a PostgreSQL
//! database, and generation produces:
//!
//! - Server model classes with seven static CRUD operations (`create`,
//!   `read`, `paginate`, `getMany`, `getAll`, `update`, `delete`),
//!   parameterized SQL and Joi input validation, in a pooled or per-call
//!   connection style, plus the shared `db` helper for the pooled style
//! - Client scaffold classes: plain data holders with an `Object.assign`
//!   constructor
//!
//! # Library usage
//!
//! ```rust,ignore
//! pgscaffold_codegen::GeneratorBuilder::from_schema_file("schema.json")
//!     .output_dir("services")
//!     .include_tables(&["users", "tasks"])
//!     .generate()?;
//! ```
//!
//! For live introspection, load the schema first and hand it to
//! [`generate`]:
//!
//! ```rust,ignore
//! let config = GeneratorConfig::with_database_url("postgres://localhost/app");
//! let schema = pgscaffold_codegen::load_schema(&config).await?;
//! pgscaffold_codegen::generate(&config, &schema)?;
//! ```
//!
//! # CLI usage
//!
//! ```bash
//! pgscaffold --schema schema.json --output ./services
//! ```
//!
//! Run with no source arguments to get the interactive prompt flow.

pub mod codegen;
pub mod config;
pub mod error;
#[cfg(feature = "cli")]
pub mod prompt;
pub mod schema;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use config::{ConnectionStyle, Flavor, GeneratorConfig};
pub use error::{GeneratorError, Result};
pub use schema::Schema;

use config::defaults;

/// Load the schema from whichever source the configuration names
pub async fn load_schema(config: &GeneratorConfig) -> Result<Schema> {
    if let Some(path) = &config.schema_file {
        schema::file::load(path)
    } else if let Some(url) = &config.database_url {
        schema::introspect::load(url).await
    } else {
        Err(GeneratorError::ConfigError(
            "no schema source configured".into(),
        ))
    }
}

/// Main entry point for code generation
pub fn generate(config: &GeneratorConfig, schema: &Schema) -> Result<()> {
    let schema = filter_tables(schema, &config.include_tables, &config.exclude_tables);
    debug!(
        "After filtering: {} tables (include={}, exclude={})",
        schema.len(),
        config.include_tables,
        config.exclude_tables
    );

    let output_dir = resolve_output_dir(&config.output_dir)?;

    if config.generate_server {
        let server_dir = ensure_subdir(&output_dir, defaults::SERVER_SUBDIR)?;
        info!("Generating server models in {:?}", server_dir);
        codegen::generate_server(&schema, &server_dir, config.flavor, config.connection_style)?;
    }
    if config.generate_client {
        let client_dir = ensure_subdir(&output_dir, defaults::CLIENT_SUBDIR)?;
        info!("Generating client scaffolds in {:?}", client_dir);
        codegen::generate_client(&schema, &client_dir, config.flavor)?;
    }

    // Compact snapshot of the schema actually used, next to the output
    let snapshot =
        serde_json::to_string(&schema).map_err(|e| GeneratorError::SchemaError(e.to_string()))?;
    fs::write(output_dir.join(defaults::SCHEMA_SNAPSHOT), snapshot)?;

    info!("Code generation complete");
    Ok(())
}

/// Filter tables based on include/exclude patterns
pub fn filter_tables(schema: &Schema, include: &str, exclude: &str) -> Schema {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<String> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(|s| s.trim().to_string()).collect()
    };
    let exclude_set: HashSet<String> = exclude
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    schema
        .iter()
        .filter(|(name, _)| {
            let included = include_all || include_set.contains(*name);
            let excluded = exclude_set.contains(*name);
            included && !excluded
        })
        .map(|(name, columns)| (name.clone(), columns.clone()))
        .collect()
}

/// Resolve the output root with the historical fallback: a missing requested
/// directory is tolerated only while the default `services` directory is
/// also missing, in which case `services` gets created; when `services`
/// already exists, a missing requested directory is an error. Requesting
/// the default path itself therefore self-heals, any other missing path
/// fails here or at subdirectory creation.
fn resolve_output_dir(requested: &Path) -> Result<PathBuf> {
    resolve_output_dir_with_fallback(requested, Path::new(defaults::OUTPUT_DIR))
}

fn resolve_output_dir_with_fallback(requested: &Path, fallback: &Path) -> Result<PathBuf> {
    if !requested.exists() {
        if !fallback.exists() {
            fs::create_dir(fallback)?;
        } else {
            return Err(GeneratorError::ConfigError(
                "Output directory does not exist".into(),
            ));
        }
    }
    Ok(requested.to_path_buf())
}

fn ensure_subdir(root: &Path, name: &str) -> Result<PathBuf> {
    let dir = root.join(name);
    if !dir.exists() {
        fs::create_dir(&dir)?;
    }
    Ok(dir)
}

/// Builder pattern for easy programmatic configuration
pub struct GeneratorBuilder {
    config: GeneratorConfig,
}

impl GeneratorBuilder {
    /// Create a new builder reading the given schema file
    pub fn from_schema_file(schema_file: impl AsRef<Path>) -> Self {
        Self {
            config: GeneratorConfig::with_schema_file(schema_file.as_ref().to_path_buf()),
        }
    }

    /// Create a new builder introspecting the given database
    pub fn from_database_url(database_url: impl Into<String>) -> Self {
        Self {
            config: GeneratorConfig::with_database_url(database_url),
        }
    }

    /// Set the output root directory
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Generate only server models (the default)
    pub fn server_only(mut self) -> Self {
        self.config.generate_server = true;
        self.config.generate_client = false;
        self
    }

    /// Generate only client scaffolds
    pub fn client_only(mut self) -> Self {
        self.config.generate_server = false;
        self.config.generate_client = true;
        self
    }

    /// Generate both server models and client scaffolds
    pub fn server_and_client(mut self) -> Self {
        self.config.generate_server = true;
        self.config.generate_client = true;
        self
    }

    /// Set the emission flavor
    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.config.flavor = flavor;
        self
    }

    /// Set the connection style of the emitted CRUD methods
    pub fn connection_style(mut self, style: ConnectionStyle) -> Self {
        self.config.connection_style = style;
        self
    }

    /// Access the assembled configuration
    pub fn into_config(self) -> GeneratorConfig {
        self.config
    }

    /// Run generation. The schema is loaded from the configured file; use
    /// [`load_schema`] plus [`generate`] directly when introspecting a
    /// live database.
    pub fn generate(self) -> Result<()> {
        self.config.validate()?;
        let schema = match &self.config.schema_file {
            Some(path) => schema::file::load(path)?,
            None => {
                return Err(GeneratorError::ConfigError(
                    "GeneratorBuilder::generate requires a schema file; \
                     use load_schema for live introspection"
                        .into(),
                ));
            }
        };
        generate(&self.config, &schema)
    }
}
