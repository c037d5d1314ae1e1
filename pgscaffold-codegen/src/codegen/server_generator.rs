//! Server-shape emitter: full CRUD model classes plus the shared db helper
//!
//! Emission is a structured builder: one function per class section, each
//! returning a text fragment, assembled in a fixed order. The fragment text
//! is byte-stable and pinned by the tests at the bottom of this module;
//! generated consumers diff these files, so even whitespace is contract.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::{ConnectionStyle, Flavor};
use crate::error::Result;
use crate::schema::{normalize_columns, ColumnDescriptor, Schema};

use super::naming::derive_class_name;
use super::type_mapper::FieldCategory;
use super::validator::{self, render_validator};

/// Generate server model files for every table in the schema, plus the
/// shared `db` helper when the pooled style is selected.
pub fn generate_server(
    schema: &Schema,
    output_dir: &Path,
    flavor: Flavor,
    style: ConnectionStyle,
) -> Result<()> {
    for (table_name, raw_columns) in schema {
        let columns = normalize_columns(raw_columns);
        let class_name = derive_class_name(table_name);
        let file_name = format!("{}.{}", class_name, flavor.extension());
        debug!("Generating server model {} -> {}", class_name, file_name);
        let code = render_server_class(table_name, &class_name, &columns, flavor, style);
        fs::write(output_dir.join(&file_name), code)?;
    }
    if style == ConnectionStyle::Pooled {
        generate_db_file(output_dir, flavor)?;
    }
    Ok(())
}

/// Emit the shared pooled-query helper (`db.ts` / `db.js`)
pub fn generate_db_file(output_dir: &Path, flavor: Flavor) -> Result<()> {
    let (file_name, content) = match flavor {
        Flavor::Typescript => ("db.ts", DB_FILE_TS),
        Flavor::Javascript => ("db.js", DB_FILE_JS),
    };
    fs::write(output_dir.join(file_name), content)?;
    Ok(())
}

const DB_FILE_TS: &str = r#"import { Pool } from 'pg';

const pool = new Pool({
    connectionString: process.env.DATABASE_URL,
});

async function dbQuery<T>({ text, values }: { text: string; values: any[] }): T | null {
    const client = await pool.connect();
    try {
        const result = await client.query<T>(text, values);
        if (result.rows.length === 0) {
            return null;
        }
        return result.rows;
    } catch (error) {
        console.error(error);
        return null;
    } finally {
        client.release();
    }
}

export { dbQuery, pool };"#;

const DB_FILE_JS: &str = r#"const { Pool } = require('pg');

const pool = new Pool({
    connectionString: process.env.DATABASE_URL,
});

async function dbQuery({ text, values }) {
    const client = await pool.connect();
    try {
        const result = await client.query(text, values);
        if (result.rows.length === 0) {
            return null;
        }
        return result.rows;
    } catch (error) {
        console.error(error);
        return null;
    } finally {
        client.release();
    }
}

module.exports = { dbQuery, pool };"#;

fn render_server_class(
    table: &str,
    class_name: &str,
    columns: &[ColumnDescriptor],
    flavor: Flavor,
    style: ConnectionStyle,
) -> String {
    let mut code = String::new();
    code.push_str(&render_imports(flavor, style));
    code.push_str(&render_class_header(class_name));
    code.push_str(&render_fields(columns, flavor));
    code.push_str(&render_constructor(class_name, flavor));
    if style == ConnectionStyle::PerCall {
        code.push_str(&render_connect_db(flavor));
    }
    code.push_str(&render_create(table, class_name, columns, flavor, style));
    code.push_str(&render_read(table, class_name, flavor, style));
    code.push_str(&render_paginate(table, class_name, flavor, style));
    code.push_str(&render_get_many(table, class_name, flavor, style));
    code.push_str(&render_get_all(table, class_name, flavor, style));
    code.push_str(&render_update(table, class_name, columns, flavor, style));
    code.push_str(&render_delete(table, class_name, flavor, style));
    code.push_str("}\n\n");
    code.push_str(&render_export(class_name, flavor));
    code
}

fn render_imports(flavor: Flavor, style: ConnectionStyle) -> String {
    match (flavor, style) {
        (Flavor::Typescript, ConnectionStyle::Pooled) => {
            "import Joi from 'joi';\nimport { dbQuery } from './db';\n\n".to_string()
        }
        (Flavor::Typescript, ConnectionStyle::PerCall) => {
            "import Joi from 'joi';\nimport { Client } from 'pg';\n\n".to_string()
        }
        (Flavor::Javascript, ConnectionStyle::Pooled) => {
            "const Joi = require('joi');\nconst { dbQuery } = require('./db');\n\n".to_string()
        }
        (Flavor::Javascript, ConnectionStyle::PerCall) => {
            "const Joi = require('joi');\nconst { Client } = require('pg');\n\n".to_string()
        }
    }
}

fn render_class_header(class_name: &str) -> String {
    format!("/**\n * {class_name} Model\n */\nclass {class_name} {{\n")
}

/// One field per column, in declaration order. The lexicographic ordering
/// of the SQL statements below is independent of this one.
fn render_fields(columns: &[ColumnDescriptor], flavor: Flavor) -> String {
    let mut code = String::new();
    for col in columns {
        match flavor {
            Flavor::Typescript => code.push_str(&format!(
                "    declare {}: {};\n",
                col.name,
                FieldCategory::of(&col.db_type).ts_type()
            )),
            Flavor::Javascript => code.push_str(&format!("    {};\n", col.name)),
        }
    }
    code
}

fn render_constructor(class_name: &str, flavor: Flavor) -> String {
    match flavor {
        Flavor::Typescript => format!(
            "\n    /**\n     * Create a new {c}\n     * @param {{Partial<{c}>}} data\n     * @returns {{{c} | {{ message: string }}}}\n     */\n\n    constructor(init?: Partial<{c}>) {{\n        Object.assign(this, init);\n    }}\n\n",
            c = class_name
        ),
        Flavor::Javascript => {
            "\n    constructor(init) {\n        Object.assign(this, init);\n    }\n\n".to_string()
        }
    }
}

fn render_connect_db(flavor: Flavor) -> String {
    let modifier = match flavor {
        Flavor::Typescript => "private static",
        Flavor::Javascript => "static",
    };
    format!(
        "    /**\n     * Connect to the database\n     * @returns {{Client}}\n     */\n    {modifier} connectDB() {{\n        return new Client({{\n            connectionString: process.env.DATABASE_URL,\n        }});\n    }}\n\n"
    )
}

fn method_doc(summary: &str, params: &[&str], returns: &str) -> String {
    let mut doc = String::from("    /**\n");
    doc.push_str(&format!("     * {summary}\n"));
    for param in params {
        doc.push_str(&format!("     * @param {param}\n"));
    }
    doc.push_str(&format!("     * @returns {returns}\n"));
    doc.push_str("     */\n");
    doc
}

fn render_query(sql: &str, values: &str) -> String {
    format!(
        "        const query = {{\n            text: '{sql}',\n            values: [{values}]\n        }};\n"
    )
}

fn render_pooled_tail(class_name: &str, flavor: Flavor, fail_verb: &str, many: bool) -> String {
    let call = match flavor {
        Flavor::Typescript => format!("dbQuery<{class_name}>(query)"),
        Flavor::Javascript => "dbQuery(query)".to_string(),
    };
    let ret = if many { "result" } else { "result[0]" };
    format!(
        "        const result = await {call};\n        if (!result) {{\n            return {{ message: 'Could not {fail_verb} {class_name}' }};\n        }}\n        return {ret};\n    }}\n\n"
    )
}

fn render_per_call_tail(flavor: Flavor, return_line: &str) -> String {
    let catch_line = match flavor {
        Flavor::Typescript => "} catch (error: any) {",
        Flavor::Javascript => "} catch (error) {",
    };
    format!(
        "        try {{\n        await client.connect();\n        const result = await client.query(query);\n        {return_line}\n        {catch_line}\n            return {{ message: error.message }};\n        }} finally {{\n            await client.end();\n        }}\n    }}\n\n"
    )
}

/// Non-id columns in the single ordering every emitted INSERT and UPDATE
/// uses: lexicographic by name, matching the positional placeholders 1:1
fn write_columns(columns: &[ColumnDescriptor]) -> Vec<&ColumnDescriptor> {
    let mut cols: Vec<&ColumnDescriptor> = columns.iter().filter(|c| c.name != "id").collect();
    cols.sort_by(|a, b| a.name.cmp(&b.name));
    cols
}

/// `data.<field> || <sentinel>` expressions in write order. A falsy caller
/// value (`0`, `''`, `false`) collapses to the sentinel; that substitution
/// is part of the emitted contract.
fn defaulted_values(cols: &[&ColumnDescriptor]) -> String {
    cols.iter()
        .map(|c| {
            format!(
                "data.{} || {}",
                c.name,
                FieldCategory::of(&c.db_type).sentinel()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_validation_check(class_name: &str) -> String {
    format!(
        "        const {{ error }} = {class_name}Validator.validate(data);\n        if (error) {{\n            return {{ message: error.message }};\n        }}\n\n"
    )
}

fn render_create(
    table: &str,
    class_name: &str,
    columns: &[ColumnDescriptor],
    flavor: Flavor,
    style: ConnectionStyle,
) -> String {
    let validator_block = render_validator(class_name, &validator::create_rules(columns));
    let cols = write_columns(columns);
    let names = cols
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=cols.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("INSERT INTO {table}({names}) VALUES({placeholders}) RETURNING *");
    let values = defaulted_values(&cols);

    let mut code = method_doc(
        &format!("Create a new {class_name}"),
        &[format!("{{Partial<{class_name}>}} data").as_str()],
        &format!("{{{class_name} | {{ message: string }}}}"),
    );
    code.push_str(&match flavor {
        Flavor::Typescript => format!(
            "    static async create(data: Partial<{c}>): Promise<{c} | {{ message: string }}> {{\n",
            c = class_name
        ),
        Flavor::Javascript => "    static async create(data) {\n".to_string(),
    });
    code.push_str(&format!("    {validator_block}\n\n"));
    code.push_str(&render_validation_check(class_name));
    if style == ConnectionStyle::PerCall {
        code.push_str("        const client = this.connectDB();\n");
    }
    code.push_str(&render_query(&sql, &values));
    code.push_str(&match style {
        ConnectionStyle::Pooled => render_pooled_tail(class_name, flavor, "create", false),
        ConnectionStyle::PerCall => render_per_call_tail(flavor, "return result.rows[0];"),
    });
    code
}

fn render_read(table: &str, class_name: &str, flavor: Flavor, style: ConnectionStyle) -> String {
    let mut code = method_doc(
        &format!("Read a {class_name}"),
        &["{number} id"],
        &format!("{{{class_name} | {{ message: string }}}}"),
    );
    code.push_str(&match flavor {
        Flavor::Typescript => format!(
            "    static async read(id: number): Promise<{c} | {{ message: string }}> {{\n",
            c = class_name
        ),
        Flavor::Javascript => "    static async read(id) {\n".to_string(),
    });
    if style == ConnectionStyle::PerCall {
        code.push_str("        const client = this.connectDB();\n");
    }
    code.push_str(&render_query(
        &format!("SELECT * FROM {table} WHERE id = $1"),
        "id",
    ));
    code.push_str(&match style {
        ConnectionStyle::Pooled => render_pooled_tail(class_name, flavor, "find", false),
        ConnectionStyle::PerCall => render_per_call_tail(flavor, "return result.rows[0]"),
    });
    code
}

fn render_paginate(table: &str, class_name: &str, flavor: Flavor, style: ConnectionStyle) -> String {
    let mut code = method_doc(
        &format!("Paginate {class_name}s"),
        &["{number} page", "{number} limit"],
        &format!("{{{class_name}[] | {{ message: string }}}}"),
    );
    code.push_str(&match flavor {
        Flavor::Typescript => format!(
            "    static async paginate(page: number, limit: number): Promise<{c}[] | {{ message: string }}> {{\n",
            c = class_name
        ),
        Flavor::Javascript => "    static async paginate(page, limit) {\n".to_string(),
    });
    if style == ConnectionStyle::PerCall {
        code.push_str("        const client = this.connectDB();\n");
    }
    code.push_str(&render_query(
        &format!("SELECT * FROM {table} ORDER BY id DESC LIMIT $1 OFFSET $2"),
        "limit, (page - 1) * limit",
    ));
    code.push_str(&match style {
        ConnectionStyle::Pooled => render_pooled_tail(class_name, flavor, "find", true),
        ConnectionStyle::PerCall => render_per_call_tail(flavor, "return result.rows"),
    });
    code
}

fn render_get_many(table: &str, class_name: &str, flavor: Flavor, style: ConnectionStyle) -> String {
    let mut code = method_doc(
        &format!("Get many {class_name}s"),
        &["{number[]} ids"],
        &format!("{{{class_name}[] | {{ message: string }}}}"),
    );
    code.push_str(&match flavor {
        Flavor::Typescript => format!(
            "    static async getMany(ids: number[]): Promise<{c}[] | {{ message: string }}> {{\n",
            c = class_name
        ),
        Flavor::Javascript => "    static async getMany(ids) {\n".to_string(),
    });
    if style == ConnectionStyle::PerCall {
        code.push_str("        const client = this.connectDB();\n");
    }
    code.push_str(&render_query(
        &format!("SELECT * FROM {table} WHERE id = ANY($1)"),
        "ids",
    ));
    code.push_str(&match style {
        ConnectionStyle::Pooled => render_pooled_tail(class_name, flavor, "find", true),
        ConnectionStyle::PerCall => render_per_call_tail(flavor, "return result.rows"),
    });
    code
}

fn render_get_all(table: &str, class_name: &str, flavor: Flavor, style: ConnectionStyle) -> String {
    let mut code = method_doc(
        &format!("Get all {class_name}s"),
        &[],
        &format!("{{{class_name}[] | {{ message: string }}}}"),
    );
    code.push_str(&match flavor {
        Flavor::Typescript => format!(
            "    static async getAll(): Promise<{c}[] | {{ message: string }}> {{\n",
            c = class_name
        ),
        Flavor::Javascript => "    static async getAll() {\n".to_string(),
    });
    if style == ConnectionStyle::PerCall {
        code.push_str("        const client = this.connectDB();\n");
    }
    code.push_str(&render_query(
        &format!("SELECT * FROM {table} ORDER BY id DESC"),
        "",
    ));
    code.push_str(&match style {
        ConnectionStyle::Pooled => render_pooled_tail(class_name, flavor, "find", true),
        ConnectionStyle::PerCall => render_per_call_tail(flavor, "return result.rows"),
    });
    code
}

fn render_update(
    table: &str,
    class_name: &str,
    columns: &[ColumnDescriptor],
    flavor: Flavor,
    style: ConnectionStyle,
) -> String {
    let validator_block = render_validator(class_name, &validator::update_rules(columns));
    let cols = write_columns(columns);
    let assignments = cols
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ${}", c.name, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    // The id placeholder index is the table's total column count, id included
    let sql = format!(
        "UPDATE {table} SET {assignments} WHERE id = ${} RETURNING *",
        columns.len()
    );
    let values = format!("{}, data.id", defaulted_values(&cols));

    let mut code = method_doc(
        &format!("Update a {class_name}"),
        &[format!("{{Partial<{class_name}>}} data").as_str()],
        &format!("{{{class_name} | {{ message: string }}}}"),
    );
    code.push_str(&match flavor {
        Flavor::Typescript => format!(
            "    static async update(data: Partial<{c}>): Promise<{c} | {{ message: string }}> {{\n",
            c = class_name
        ),
        Flavor::Javascript => "    static async update(data) {\n".to_string(),
    });
    code.push_str(&format!("    {validator_block}\n\n"));
    code.push_str(&render_validation_check(class_name));
    if style == ConnectionStyle::PerCall {
        code.push_str("        const client = this.connectDB();\n");
    }
    code.push_str(&render_query(&sql, &values));
    code.push_str(&match style {
        ConnectionStyle::Pooled => render_pooled_tail(class_name, flavor, "update", false),
        ConnectionStyle::PerCall => render_per_call_tail(flavor, "return result.rows[0]"),
    });
    code
}

fn render_delete(table: &str, class_name: &str, flavor: Flavor, style: ConnectionStyle) -> String {
    let mut code = method_doc(
        &format!("Delete a {class_name}"),
        &["{number} id"],
        &format!("{{{class_name} | {{ message: string }}}}"),
    );
    code.push_str(&match flavor {
        Flavor::Typescript => format!(
            "    static async delete(id: number): Promise<{c} | {{ message: string }}> {{\n",
            c = class_name
        ),
        Flavor::Javascript => "    static async delete(id) {\n".to_string(),
    });
    if style == ConnectionStyle::PerCall {
        code.push_str("        const client = this.connectDB();\n");
    }
    code.push_str(&render_query(
        &format!("DELETE FROM {table} WHERE id = $1 RETURNING *"),
        "id",
    ));
    code.push_str(&match style {
        ConnectionStyle::Pooled => render_pooled_tail(class_name, flavor, "delete", false),
        ConnectionStyle::PerCall => render_per_call_tail(flavor, "return result.rows[0]"),
    });
    code
}

fn render_export(class_name: &str, flavor: Flavor) -> String {
    match flavor {
        Flavor::Typescript => format!("export default {class_name};"),
        Flavor::Javascript => format!("module.exports = {{ {class_name} }};"),
    }
}
