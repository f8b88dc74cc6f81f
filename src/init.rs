use colored::*;
use icd_lookup::config::CONFIG_FILE;
use std::{fs, path::Path};

const TEMPLATE: &str = r#"# icd-lookup Configuration File

# MongoDB connection string
mongo_uri = "mongodb://localhost:27017"

# Database and collection holding the code documents.
# Documents look like {_id: "<year>_<code>", specific_codes: [...]}
db_name = "code-ez-dev"
collection_name = "icd_codes"

# Only documents from these years are indexed.
# When the same code exists in several years, the latest year wins.
years = [2024]

# Read documents from a JSON export instead of MongoDB
# (a JSON array or one document per line, as written by mongoexport)
# snapshot = "icd_codes.json"
"#;

pub fn init_config(force: bool) -> Result<(), String> {
    write_template(Path::new(CONFIG_FILE), force)?;

    println!("{} Created {}", "✅".green(), CONFIG_FILE);
    println!("\n{}", "Configuration file created with defaults:".cyan());
    println!("  {} mongo_uri = \"mongodb://localhost:27017\"", "•".blue());
    println!("  {} db_name = \"code-ez-dev\"", "•".blue());
    println!("  {} collection_name = \"icd_codes\"", "•".blue());
    println!("  {} years = [2024]", "•".blue());
    println!(
        "\n{}",
        format!("Edit {} to point at your data source.", CONFIG_FILE).cyan()
    );

    Ok(())
}

fn write_template(config_path: &Path, force: bool) -> Result<(), String> {
    if config_path.exists() && !force {
        return Err(format!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        ));
    }

    fs::write(config_path, TEMPLATE)
        .map_err(|e| format!("Failed to create {}: {}", config_path.display(), e))
}
