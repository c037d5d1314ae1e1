//! Client-shape emitter: plain data-holder scaffold classes
//!
//! No persistence, no validators; one field per column and an
//! `Object.assign` constructor. The file still ends with the original's
//! trailing `};`.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::Flavor;
use crate::error::Result;
use crate::schema::{normalize_columns, ColumnDescriptor, Schema};

use super::naming::derive_class_name;
use super::type_mapper::FieldCategory;

/// Generate client scaffold files for every table in the schema
pub fn generate_client(schema: &Schema, output_dir: &Path, flavor: Flavor) -> Result<()> {
    for (table_name, raw_columns) in schema {
        let columns = normalize_columns(raw_columns);
        let class_name = derive_class_name(table_name);
        let file_name = format!("{}.{}", class_name, flavor.extension());
        debug!("Generating client scaffold {} -> {}", class_name, file_name);
        let code = render_client_class(&class_name, &columns, flavor);
        fs::write(output_dir.join(&file_name), code)?;
    }
    Ok(())
}

fn render_client_class(class_name: &str, columns: &[ColumnDescriptor], flavor: Flavor) -> String {
    let mut code = format!("class {class_name} {{\n");

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

    match flavor {
        Flavor::Typescript => code.push_str(&format!(
            "\n    constructor(init?: Partial<{class_name}>) {{\n        Object.assign(this, init);\n    }}\n\n"
        )),
        Flavor::Javascript => code.push_str(
            "\n    constructor(init) {\n        Object.assign(this, init);\n    }\n\n",
        ),
    }

    code.push_str("};");
    code
}
