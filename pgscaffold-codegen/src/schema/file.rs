//! File-based schema source: parse and shape-check a JSON schema document

use std::path::Path;

use tracing::info;

use super::metadata::{NullableMarker, Schema};
use crate::error::{GeneratorError, Result};

/// Load a schema from a JSON document.
///
/// The document must be a mapping from table name to an array of column
/// records with exactly the five wire-format fields; anything else aborts
/// generation before a single file is emitted.
pub fn load(path: &Path) -> Result<Schema> {
    let content = std::fs::read_to_string(path)?;
    let schema: Schema = serde_json::from_str(&content)
        .map_err(|e| GeneratorError::SchemaError(format!("{}: {}", path.display(), e)))?;
    validate_shape(&schema)?;
    info!("Loaded {} tables from {:?}", schema.len(), path);
    Ok(schema)
}

/// Shape checks beyond what deserialization enforces: column names must be
/// non-empty and the nullability marker must be one of the documented
/// labels (`YES`/`NO`).
pub fn validate_shape(schema: &Schema) -> Result<()> {
    for (table, columns) in schema {
        for column in columns {
            if column.column_name.is_empty() {
                return Err(GeneratorError::ValidationError(format!(
                    "table `{}` has a column with an empty name",
                    table
                )));
            }
            match &column.is_nullable {
                NullableMarker::Label(label) if label == "YES" || label == "NO" => {}
                other => {
                    return Err(GeneratorError::ValidationError(format!(
                        "table `{}`, column `{}`: is_nullable must be \"YES\" or \"NO\", got {:?}",
                        table, column.column_name, other
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GOOD: &str = r#"{
        "users": [
            {
                "column_name": "id",
                "data_type": "serial",
                "is_nullable": "NO",
                "is_foreign_key": false,
                "referenced_table_name": null
            },
            {
                "column_name": "email",
                "data_type": "varchar",
                "is_nullable": "NO",
                "is_foreign_key": false,
                "referenced_table_name": null
            }
        ]
    }"#;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_schema() {
        let file = write_temp(GOOD);
        let schema = load(file.path()).unwrap();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema["users"].len(), 2);
        assert_eq!(schema["users"][0].column_name, "id");
    }

    #[test]
    fn test_load_rejects_wrong_shape() {
        let file = write_temp(r#"{"users": [{"name": "id"}]}"#);
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, GeneratorError::SchemaError(_)));
    }

    #[test]
    fn test_load_rejects_bad_nullable_label() {
        let file = write_temp(
            r#"{
            "users": [
                {
                    "column_name": "id",
                    "data_type": "serial",
                    "is_nullable": "MAYBE",
                    "is_foreign_key": false,
                    "referenced_table_name": null
                }
            ]
        }"#,
        );
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, GeneratorError::ValidationError(_)));
    }

    #[test]
    fn test_load_rejects_boolean_marker() {
        // Booleans deserialize fine but are not part of the file format
        let file = write_temp(
            r#"{
            "users": [
                {
                    "column_name": "id",
                    "data_type": "serial",
                    "is_nullable": false,
                    "is_foreign_key": false,
                    "referenced_table_name": null
                }
            ]
        }"#,
        );
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, GeneratorError::ValidationError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/schema.json")).unwrap_err();
        assert!(matches!(err, GeneratorError::IoError(_)));
    }
}
