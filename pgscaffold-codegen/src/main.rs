//! CLI entry point for pgscaffold

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pgscaffold_codegen::config::{ConnectionStyle, Flavor, GeneratorConfig};
use pgscaffold_codegen::schema::Schema;

#[derive(Parser)]
#[command(name = "pgscaffold")]
#[command(about = "Generate TypeScript and JavaScript CRUD model classes from a PostgreSQL schema")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to JSON schema file (overrides config)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// PostgreSQL connection string for live introspection (overrides config)
    #[arg(short, long)]
    url: Option<String>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tables to generate (comma-separated, default all)
    #[arg(short, long)]
    tables: Option<String>,

    /// Language of the generated sources
    #[arg(short, long, value_enum)]
    language: Option<Flavor>,

    /// Connection style of the emitted CRUD methods
    #[arg(long, value_enum)]
    pooling: Option<ConnectionStyle>,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate everything the configuration asks for
    Generate,
    /// Generate only server models
    Server,
    /// Generate only client scaffolds
    Client,
    /// Inspect the schema (show resolved tables for debugging)
    Inspect,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = if let Some(config_path) = &cli.config {
        GeneratorConfig::from_file(config_path)?
    } else {
        GeneratorConfig::default()
    };

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(schema) = cli.schema {
        config.schema_file = Some(schema);
    }
    if let Some(url) = cli.url {
        config.database_url = Some(url);
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(tables) = cli.tables {
        config.include_tables = tables;
    }
    if let Some(language) = cli.language {
        config.flavor = language;
    }
    if let Some(pooling) = cli.pooling {
        config.connection_style = pooling;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    // Apply command-specific settings
    match &cli.command {
        Some(Commands::Server) => {
            config.generate_server = true;
            config.generate_client = false;
        }
        Some(Commands::Client) => {
            config.generate_server = false;
            config.generate_client = true;
        }
        _ => {}
    }

    // Without a schema source, fall back to the interactive prompt flow;
    // it loads the schema on the way
    let schema = if config.schema_file.is_none() && config.database_url.is_none() {
        pgscaffold_codegen::prompt::run(&mut config).await?
    } else {
        config.validate()?;
        pgscaffold_codegen::load_schema(&config).await?
    };

    if let Some(Commands::Inspect) = &cli.command {
        return inspect_schema(&schema);
    }

    if config.dry_run {
        println!("Dry run mode - would generate:");
        let filtered = pgscaffold_codegen::filter_tables(
            &schema,
            &config.include_tables,
            &config.exclude_tables,
        );
        for table in filtered.keys() {
            let class_name = pgscaffold_codegen::codegen::derive_class_name(table);
            if config.generate_server {
                println!(
                    "  Server: {}/server/{}.{}",
                    config.output_dir.display(),
                    class_name,
                    config.flavor.extension()
                );
            }
            if config.generate_client {
                println!(
                    "  Client: {}/client/{}.{}",
                    config.output_dir.display(),
                    class_name,
                    config.flavor.extension()
                );
            }
        }
        return Ok(());
    }

    pgscaffold_codegen::generate(&config, &schema)?;

    info!("Code generation completed successfully");
    Ok(())
}

fn inspect_schema(schema: &Schema) -> Result<()> {
    println!("Resolved {} tables:\n", schema.len());
    for (table, columns) in schema {
        println!("Table: {}", table);
        println!("  Columns:");
        for col in columns {
            let nullable = if col.is_nullable.is_yes() {
                "NULL"
            } else {
                "NOT NULL"
            };
            let fk = if col.is_foreign_key {
                match &col.referenced_table_name {
                    Some(referenced) => format!(" FK -> {}", referenced),
                    None => " FK".to_string(),
                }
            } else {
                String::new()
            };
            println!("    - {} {} {}{}", col.column_name, col.data_type, nullable, fk);
        }
        println!();
    }

    Ok(())
}
