//! Default configuration values - single source of truth

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Whether to generate server models by default
pub const GENERATE_SERVER: bool = true;

/// Whether to generate client scaffolds by default
pub const GENERATE_CLIENT: bool = false;

/// Default output root; server and client files go into subdirectories
pub const OUTPUT_DIR: &str = "services";

/// Subdirectory for server models
pub const SERVER_SUBDIR: &str = "server";

/// Subdirectory for client scaffolds
pub const CLIENT_SUBDIR: &str = "client";

/// File name of the schema snapshot written into the output root
pub const SCHEMA_SNAPSHOT: &str = "schema.json";

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;
