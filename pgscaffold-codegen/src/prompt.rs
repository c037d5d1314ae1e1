//! Interactive configuration flow
//!
//! Collects the generation options the command line did not provide and
//! loads the schema along the way (the table picker needs the table names).
//! The outcome is a plain resolved [`GeneratorConfig`] plus the loaded
//! schema; the rest of the pipeline has no dependency on how they were
//! collected.

use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};

use crate::config::{defaults, Flavor, GeneratorConfig};
use crate::error::{GeneratorError, Result};
use crate::schema::Schema;

/// Run the prompt sequence, filling in `config` and returning the schema
pub async fn run(config: &mut GeneratorConfig) -> Result<Schema> {
    let theme = ColorfulTheme::default();

    let source = Select::with_theme(&theme)
        .with_prompt("How would you like to provide the schema?")
        .items(&["Schema file", "PostgreSQL connection string"])
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let schema = if source == 0 {
        let path: String = Input::with_theme(&theme)
            .with_prompt("Enter the path to the schema file")
            .interact_text()
            .map_err(prompt_err)?;
        let path = PathBuf::from(path);
        let schema = crate::schema::file::load(&path)?;
        config.schema_file = Some(path);
        schema
    } else {
        let url: String = Input::with_theme(&theme)
            .with_prompt("Enter the PostgreSQL connection string")
            .interact_text()
            .map_err(prompt_err)?;
        let schema = crate::schema::introspect::load(&url).await?;
        config.database_url = Some(url);
        schema
    };

    // Table subset; the first entry selects everything
    let mut choices: Vec<String> = vec!["All".to_string()];
    choices.extend(schema.keys().cloned());
    let mut preselected = vec![false; choices.len()];
    preselected[0] = true;

    let picked = MultiSelect::with_theme(&theme)
        .with_prompt("What tables would you like to generate?")
        .items(&choices)
        .defaults(&preselected)
        .interact()
        .map_err(prompt_err)?;

    if !picked.is_empty() && !picked.contains(&0) {
        let names: Vec<&str> = picked.iter().map(|i| choices[*i].as_str()).collect();
        config.include_tables = names.join(",");
    }

    let output_kind = Select::with_theme(&theme)
        .with_prompt("What would you like to generate?")
        .items(&["Server Code (Full)", "Client Code (Scaffold)", "Both"])
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    config.generate_server = output_kind != 1;
    config.generate_client = output_kind != 0;

    let output_dir: String = Input::with_theme(&theme)
        .with_prompt("Enter the output directory")
        .default(defaults::OUTPUT_DIR.to_string())
        .interact_text()
        .map_err(prompt_err)?;
    config.output_dir = PathBuf::from(output_dir);

    let flavor = Select::with_theme(&theme)
        .with_prompt("What language would you like to generate?")
        .items(&["TypeScript", "JavaScript"])
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    config.flavor = if flavor == 0 {
        Flavor::Typescript
    } else {
        Flavor::Javascript
    };

    Ok(schema)
}

fn prompt_err(err: dialoguer::Error) -> GeneratorError {
    GeneratorError::ConfigError(format!("prompt failed: {err}"))
}
