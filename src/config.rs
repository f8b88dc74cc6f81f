use colored::*;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fs, path::Path, path::PathBuf};

pub const CONFIG_FILE: &str = "icd-lookup.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_mongo_uri")]
    pub mongo_uri: String,
    #[serde(default = "default_db_name")]
    pub db_name: String,
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
    /// Years whose documents are indexed, `years = 2024` or `years = [2023, 2024]`
    #[serde(default = "default_years", deserialize_with = "one_or_many_years")]
    pub years: Vec<i32>,
    /// Read documents from a JSON export instead of MongoDB
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

fn default_mongo_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_db_name() -> String {
    "code-ez-dev".to_string()
}

fn default_collection_name() -> String {
    "icd_codes".to_string()
}

fn default_years() -> Vec<i32> {
    vec![2024]
}

fn one_or_many_years<'de, D>(deserializer: D) -> Result<Vec<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Years {
        One(i32),
        Many(Vec<i32>),
    }

    Ok(match Years::deserialize(deserializer)? {
        Years::One(year) => vec![year],
        Years::Many(years) => years,
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongo_uri: default_mongo_uri(),
            db_name: default_db_name(),
            collection_name: default_collection_name(),
            years: default_years(),
            snapshot: None,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match fs::read_to_string(config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => {
                        return config;
                    }
                    Err(e) => {
                        eprintln!(
                            "{} Failed to parse {}: {}",
                            "⚠️".yellow(),
                            config_path.display(),
                            e
                        );
                        eprintln!("   Using default configuration");
                    }
                },
                Err(e) => {
                    eprintln!(
                        "{} Failed to read {}: {}",
                        "⚠️".yellow(),
                        config_path.display(),
                        e
                    );
                    eprintln!("   Using default configuration");
                }
            }
        }

        Config::default()
    }
}
