//! Live-database schema source: PostgreSQL information-schema introspection

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{debug, info, warn};

use super::metadata::{NullableMarker, RawColumn, Schema};
use crate::error::Result;

/// Tables that never produce generated models
const EXCLUDED_TABLES: &[&str] = &["migrations"];

const LIST_TABLES_SQL: &str = r#"
    SELECT table_name
    FROM information_schema.tables
    WHERE table_schema = 'public' AND table_type = 'BASE TABLE'
"#;

/// Per-table column query. The foreign-key flag is true iff the column
/// participates in a key-column-usage entry for the table; the referenced
/// table is resolved by joining referential-constraint metadata back to
/// key-column-usage for both sides of the constraint.
const TABLE_COLUMNS_SQL: &str = r#"
    SELECT
        c.column_name,
        c.data_type,
        c.is_nullable,
        CASE WHEN kcu.column_name IS NOT NULL THEN true ELSE false END AS is_foreign_key,
        refc.referenced_table_name
    FROM
        information_schema.columns c
    LEFT JOIN
        information_schema.key_column_usage kcu
            ON c.column_name = kcu.column_name AND c.table_name = kcu.table_name
    LEFT JOIN
        (SELECT
            kcu1.table_name,
            kcu1.column_name,
            kcu2.table_name AS referenced_table_name
        FROM
            information_schema.referential_constraints rc
        JOIN
            information_schema.key_column_usage kcu1 ON rc.constraint_name = kcu1.constraint_name
        JOIN
            information_schema.key_column_usage kcu2 ON rc.unique_constraint_name = kcu2.constraint_name
        WHERE
            kcu1.table_schema = 'public' AND kcu2.table_schema = 'public') refc
            ON c.column_name = refc.column_name AND c.table_name = refc.table_name
    WHERE
        c.table_name = $1
"#;

/// Introspect a live database into the wire-format schema shape
pub async fn load(database_url: &str) -> Result<Schema> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await?;
    let schema = read_schema(&pool).await;
    pool.close().await;
    schema
}

/// Enumerate base tables and read each one's columns. A table whose column
/// query fails is skipped; the run continues with the rest.
pub async fn read_schema(pool: &PgPool) -> Result<Schema> {
    let rows = sqlx::query(LIST_TABLES_SQL).fetch_all(pool).await?;

    let mut schema = Schema::new();
    for row in rows {
        let table: String = row.try_get("table_name")?;
        if EXCLUDED_TABLES.contains(&table.as_str()) {
            continue;
        }
        match read_table(pool, &table).await {
            Ok(columns) => {
                debug!("Introspected {} columns for `{}`", columns.len(), table);
                schema.insert(table, columns);
            }
            Err(err) => {
                warn!("Skipping table `{}`: {}", table, err);
            }
        }
    }

    info!("Introspected {} tables", schema.len());
    Ok(schema)
}

async fn read_table(pool: &PgPool, table: &str) -> Result<Vec<RawColumn>> {
    let rows = sqlx::query(TABLE_COLUMNS_SQL)
        .bind(table)
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| {
            Ok(RawColumn {
                column_name: row.try_get("column_name")?,
                data_type: row.try_get("data_type")?,
                is_nullable: NullableMarker::Label(row.try_get("is_nullable")?),
                is_foreign_key: row.try_get("is_foreign_key")?,
                referenced_table_name: row.try_get("referenced_table_name")?,
            })
        })
        .collect()
}
