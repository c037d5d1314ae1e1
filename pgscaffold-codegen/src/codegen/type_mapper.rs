//! Database type to target-language category mapping

use tracing::warn;

/// The generator's internal type system for a database column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    Number,
    Text,
    Boolean,
    Timestamp,
    Opaque,
}

impl FieldCategory {
    /// Map a raw database type name to a category, case-insensitively.
    /// Unrecognized types degrade to `Opaque` with a diagnostic rather
    /// than failing the run.
    pub fn of(db_type: &str) -> Self {
        match db_type.to_lowercase().as_str() {
            "integer" | "smallint" | "bigint" | "numeric" | "double precision" | "serial" => {
                Self::Number
            }
            "varchar" | "text" | "char" | "character varying" => Self::Text,
            "boolean" => Self::Boolean,
            "timestamp" | "timestamp with time zone" | "date" => Self::Timestamp,
            "json" | "jsonb" => Self::Opaque,
            other => {
                warn!("Unrecognized DB type: {}. Defaulting to 'any'.", other);
                Self::Opaque
            }
        }
    }

    /// TypeScript annotation for a field of this category
    pub fn ts_type(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Text => "string",
            Self::Boolean => "boolean",
            Self::Timestamp => "Date",
            Self::Opaque => "any",
        }
    }

    /// Joi builder name, i.e. the lowercased TypeScript type
    pub fn joi_name(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Text => "string",
            Self::Boolean => "boolean",
            Self::Timestamp => "date",
            Self::Opaque => "any",
        }
    }

    /// Default literal substituted when a caller leaves a field falsy at
    /// write time. This drives what lands in the database for omitted
    /// fields, so the per-category choice (zero vs empty string vs null)
    /// is part of the emitted contract.
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::Number => "0",
            Self::Text => "''",
            Self::Boolean => "false",
            Self::Timestamp => "new Date()",
            Self::Opaque => "null",
        }
    }
}
