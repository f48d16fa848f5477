use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Deserialize;

use crate::error::SeedError;

pub const DEFAULT_CONFIG_FILE: &str = "user-seed.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    /// SQLite database file, created on first run
    pub database: PathBuf,
    /// CSV export with a `name,email,age` header
    pub csv_file: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            database: PathBuf::from("ALX_prodev.sqlite3"),
            csv_file: PathBuf::from("user_data.csv"),
        }
    }
}

/// Get the configuration for the seeder.
/// If a path is given it must exist and parse. Otherwise we look for
/// `user-seed.toml` in the current directory and fall back to the defaults
/// when there is none.
pub fn get_configuration(path: Option<PathBuf>) -> Result<Configuration, SeedError> {
    match path {
        Some(path) => read_configuration(&path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_configuration(Path::new(DEFAULT_CONFIG_FILE))
        }
        None => {
            println!(
                "{}",
                "I don't see a configuration file so I'm going to use the defaults.".yellow()
            );
            Ok(Configuration::default())
        }
    }
}

fn read_configuration(path: &Path) -> Result<Configuration, SeedError> {
    let buf = std::fs::read_to_string(path)?;
    let config: Configuration = toml::from_str(&buf)?;
    println!(
        "{} {}",
        "I have configuration from".green(),
        path.display().to_string().white()
    );
    Ok(config)
}
