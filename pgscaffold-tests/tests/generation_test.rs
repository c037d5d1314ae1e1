//! End-to-end generation runs against fixture schemas

use std::fs;
use std::path::Path;

use pgscaffold_codegen::config::{ConnectionStyle, Flavor};
use pgscaffold_codegen::{filter_tables, GeneratorBuilder, Schema};

const FIXTURE_SCHEMA: &str = r#"{
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
    ],
    "tasks": [
        {
            "column_name": "id",
            "data_type": "serial",
            "is_nullable": "NO",
            "is_foreign_key": false,
            "referenced_table_name": null
        },
        {
            "column_name": "title",
            "data_type": "varchar",
            "is_nullable": "NO",
            "is_foreign_key": false,
            "referenced_table_name": null
        },
        {
            "column_name": "status",
            "data_type": "varchar",
            "is_nullable": "YES",
            "is_foreign_key": false,
            "referenced_table_name": null
        },
        {
            "column_name": "user_id",
            "data_type": "integer",
            "is_nullable": "NO",
            "is_foreign_key": true,
            "referenced_table_name": "users"
        },
        {
            "column_name": "created_at",
            "data_type": "timestamp with time zone",
            "is_nullable": "YES",
            "is_foreign_key": false,
            "referenced_table_name": null
        },
        {
            "column_name": "updated_at",
            "data_type": "timestamp with time zone",
            "is_nullable": "YES",
            "is_foreign_key": false,
            "referenced_table_name": null
        }
    ],
    "focus": [
        {
            "column_name": "id",
            "data_type": "serial",
            "is_nullable": "NO",
            "is_foreign_key": false,
            "referenced_table_name": null
        },
        {
            "column_name": "name",
            "data_type": "varchar",
            "is_nullable": "NO",
            "is_foreign_key": false,
            "referenced_table_name": null
        }
    ]
}"#;

fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("schema.json");
    fs::write(&path, FIXTURE_SCHEMA).unwrap();
    path
}

#[test]
fn test_server_generation_end_to_end() {
    let workdir = tempfile::tempdir().unwrap();
    let outdir = tempfile::tempdir().unwrap();
    let schema_path = write_fixture(workdir.path());

    GeneratorBuilder::from_schema_file(&schema_path)
        .output_dir(outdir.path())
        .generate()
        .unwrap();

    let server = outdir.path().join("server");
    let user = fs::read_to_string(server.join("User.ts")).unwrap();
    assert!(user.contains("class User {"));
    assert!(user.contains("INSERT INTO users(email) VALUES($1) RETURNING *"));
    assert!(user.contains("email: Joi.string().required()"));
    assert!(!user.contains("id: Joi.number().required()"));
    assert!(user.ends_with("export default User;"));

    // The trailing-s singularization rule applies before the oes/ches rules
    assert!(server.join("Task.ts").exists());
    assert!(server.join("Focu.ts").exists());

    // Pooled style brings the shared helper along
    let db = fs::read_to_string(server.join("db.ts")).unwrap();
    assert!(db.contains("async function dbQuery<T>"));
    assert!(db.contains("client.release();"));

    // No client scaffolds were requested
    assert!(!outdir.path().join("client").exists());
}

#[test]
fn test_task_model_validators_and_sql() {
    let workdir = tempfile::tempdir().unwrap();
    let outdir = tempfile::tempdir().unwrap();
    let schema_path = write_fixture(workdir.path());

    GeneratorBuilder::from_schema_file(&schema_path)
        .output_dir(outdir.path())
        .include_tables(&["tasks"])
        .generate()
        .unwrap();

    let task = fs::read_to_string(outdir.path().join("server").join("Task.ts")).unwrap();

    // Create validator: id and the timestamps excluded, lexicographic order,
    // requiredness per the strict YES check
    let create = &task[..task.find("static async read").unwrap()];
    assert!(create.contains("status: Joi.string().allow(null).allow('')"));
    assert!(create.contains("title: Joi.string().required()"));
    assert!(create.contains("user_id: Joi.number().required()"));
    assert!(!create.contains("created_at: Joi"));
    assert!(!create.contains("updated_at: Joi"));

    // The INSERT still writes every non-id column, sorted
    assert!(create.contains(
        "INSERT INTO tasks(created_at, status, title, updated_at, user_id) VALUES($1, $2, $3, $4, $5) RETURNING *"
    ));
    assert!(create.contains(
        "values: [data.created_at || new Date(), data.status || '', data.title || '', data.updated_at || new Date(), data.user_id || 0]"
    ));

    // Update validator: everything, id included, all optional under the
    // loose truthiness check
    let update = &task[task.find("static async update").unwrap()..];
    assert!(update.contains("created_at: Joi.date().allow(null).allow('')"));
    assert!(update.contains("id: Joi.number().allow(null).allow('')"));
    assert!(update.contains("title: Joi.string().allow(null).allow('')"));

    // Six columns in the table, so id binds as $6
    assert!(update.contains(
        "UPDATE tasks SET created_at = $1, status = $2, title = $3, updated_at = $4, user_id = $5 WHERE id = $6 RETURNING *"
    ));
}

#[test]
fn test_both_shapes_with_filtering_and_snapshot() {
    let workdir = tempfile::tempdir().unwrap();
    let outdir = tempfile::tempdir().unwrap();
    let schema_path = write_fixture(workdir.path());

    GeneratorBuilder::from_schema_file(&schema_path)
        .output_dir(outdir.path())
        .include_tables(&["users"])
        .server_and_client()
        .generate()
        .unwrap();

    assert!(outdir.path().join("server").join("User.ts").exists());
    assert!(!outdir.path().join("server").join("Task.ts").exists());

    let client = fs::read_to_string(outdir.path().join("client").join("User.ts")).unwrap();
    assert!(client.starts_with("class User {"));
    assert!(client.contains("declare email: string;"));
    assert!(!client.contains("static"));
    assert!(client.ends_with("};"));

    // The snapshot records the schema actually used, post-filtering
    let snapshot = fs::read_to_string(outdir.path().join("schema.json")).unwrap();
    let written: Schema = serde_json::from_str(&snapshot).unwrap();
    let full: Schema = serde_json::from_str(FIXTURE_SCHEMA).unwrap();
    assert_eq!(written, filter_tables(&full, "users", ""));
    assert_eq!(written.len(), 1);
}

#[test]
fn test_javascript_per_call_generation() {
    let workdir = tempfile::tempdir().unwrap();
    let outdir = tempfile::tempdir().unwrap();
    let schema_path = write_fixture(workdir.path());

    GeneratorBuilder::from_schema_file(&schema_path)
        .output_dir(outdir.path())
        .include_tables(&["users"])
        .flavor(Flavor::Javascript)
        .connection_style(ConnectionStyle::PerCall)
        .generate()
        .unwrap();

    let server = outdir.path().join("server");
    let user = fs::read_to_string(server.join("User.js")).unwrap();
    assert!(user.starts_with("const Joi = require('joi');\nconst { Client } = require('pg');"));
    assert!(user.contains("static connectDB() {"));
    assert!(user.contains("} finally {"));
    assert!(user.contains("await client.end();"));
    assert!(user.ends_with("module.exports = { User };"));

    // Per-call classes own their connections; no shared helper is emitted
    assert!(!server.join("db.js").exists());
    assert!(!server.join("db.ts").exists());
}

#[test]
fn test_client_only_generation() {
    let workdir = tempfile::tempdir().unwrap();
    let outdir = tempfile::tempdir().unwrap();
    let schema_path = write_fixture(workdir.path());

    GeneratorBuilder::from_schema_file(&schema_path)
        .output_dir(outdir.path())
        .client_only()
        .generate()
        .unwrap();

    assert!(!outdir.path().join("server").exists());
    let client = outdir.path().join("client");
    assert!(client.join("User.ts").exists());
    assert!(client.join("Task.ts").exists());
    assert!(client.join("Focu.ts").exists());

    // Scaffolds carry no persistence at all
    let task = fs::read_to_string(client.join("Task.ts")).unwrap();
    assert!(!task.contains("Joi"));
    assert!(!task.contains("SELECT"));
}

#[test]
fn test_malformed_schema_aborts_before_emission() {
    let workdir = tempfile::tempdir().unwrap();
    let outdir = tempfile::tempdir().unwrap();
    let schema_path = workdir.path().join("schema.json");
    fs::write(&schema_path, r#"{"users": [{"column_name": "id"}]}"#).unwrap();

    let result = GeneratorBuilder::from_schema_file(&schema_path)
        .output_dir(outdir.path())
        .generate();

    assert!(result.is_err());
    assert!(!outdir.path().join("server").exists());
    assert!(!outdir.path().join("schema.json").exists());
}
