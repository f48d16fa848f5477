use colored::Colorize;
use rusqlite::Connection;

use crate::{config::Configuration, error::SeedError};

pub const TABLE_NAME: &str = "user_data";

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS user_data (
        user_id CHAR(36) PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL COLLATE NOCASE,
        age DECIMAL(5,2) NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_user_data_email ON user_data (email);
";

/// Open the database, creating the file and any missing parent folders first
pub fn connect_db(config: &Configuration) -> Result<Connection, SeedError> {
    let path = config.database.as_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path).map_err(|source| SeedError::Connection {
        path: path.to_path_buf(),
        source,
    })?;
    println!(
        "{} {}",
        "Database ready:".green(),
        path.display().to_string().white()
    );
    Ok(conn)
}

/// Create `user_data` and its email index unless they already exist
pub fn create_table(conn: &Connection) -> Result<(), SeedError> {
    conn.execute_batch(CREATE_TABLE)?;
    println!("{} {}", "Table ready:".green(), TABLE_NAME.white());
    Ok(())
}

/// Everything the import needs, safe to run on every start
pub fn provision(config: &Configuration) -> Result<Connection, SeedError> {
    let conn = connect_db(config)?;
    create_table(&conn)?;
    Ok(conn)
}
