//! Schema command: print JSON Schemas for inputs and `--json` outputs.

use crate::json_schema;
use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

pub fn run(command: Option<String>, list: bool, output_dir: Option<PathBuf>) -> Result<()> {
    if list {
        for name in json_schema::schema_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    if let Some(dir) = output_dir {
        fs::create_dir_all(&dir)?;
        for (name, schema) in json_schema::all_schemas() {
            let path = dir.join(format!("{}.schema.json", name));
            fs::write(&path, serde_json::to_string_pretty(&schema)?)?;
            eprintln!("Wrote {}", path.display());
        }
        return Ok(());
    }

    match command {
        Some(name) => match json_schema::get_schema(&name) {
            Some(schema) => println!("{}", serde_json::to_string_pretty(&schema)?),
            None => bail!(
                "unknown schema '{}'. Available: {}",
                name,
                json_schema::schema_names().join(", ")
            ),
        },
        None => {
            let all = json_schema::all_schemas();
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
    }

    Ok(())
}
