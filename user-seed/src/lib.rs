pub mod config;
pub mod error;
pub mod import;
pub mod reader;
pub mod schema;
pub mod stream;

pub use config::Configuration;
pub use error::{RowError, SeedError};
pub use import::{ImportReport, Importer};
pub use reader::CsvRowReader;

/// Provision the database and import the configured CSV file into it
pub fn seed(config: &Configuration) -> Result<ImportReport, SeedError> {
    let mut conn = schema::provision(config)?;
    let reader = CsvRowReader::new(&config.csv_file);
    Importer::new().run(&mut conn, &reader)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_seed_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = Configuration {
            database: dir.path().join("db").join("ALX_prodev.sqlite3"),
            csv_file: dir.path().join("user_data.csv"),
        };
        fs::write(
            &config.csv_file,
            "name,email,age\n\
             Johnnie Mayer,Ross.Reynolds21@hotmail.com,35\n\
             Myrtle Waters,Edmund_Funk@gmail.com,99.1\n\
             Flora Rodriguez I,Willie.Bogisich@gmail.com,eighty\n\
             Johnnie Mayer,ross.reynolds21@hotmail.com,35\n",
        )
        .unwrap();

        let first = seed(&config).unwrap();
        assert_eq!(
            first,
            ImportReport {
                inserted: 2,
                duplicates: 1,
                malformed: 1,
                failed: 0,
            }
        );

        let second = seed(&config).unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.duplicates, 3);

        let conn = schema::connect_db(&config).unwrap();
        assert_eq!(stream::stream_users(&conn).count(), 2);
    }
}
