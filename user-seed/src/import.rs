use std::collections::HashSet;

use colored::Colorize;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::{
    error::SeedError,
    reader::{CsvRowReader, UserRow},
};

const INSERT_USER: &str = "
    INSERT INTO user_data (user_id, name, email, age)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT (email) DO NOTHING
";

/// Emails we have already dealt with during this run, compared without case
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_duplicate(&self, email: &str) -> bool {
        self.seen.contains(&email.to_lowercase())
    }

    pub fn mark(&mut self, email: &str) {
        self.seen.insert(email.to_lowercase());
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written under this id
    Inserted(String),
    /// The table already holds a user with this email, from an earlier run
    AlreadyPresent,
}

pub struct RowInserter;

impl RowInserter {
    pub fn insert(conn: &Connection, row: &UserRow) -> Result<InsertOutcome, SeedError> {
        let user_id = Uuid::new_v4().to_string();
        let changed = conn.execute(
            INSERT_USER,
            params![user_id, row.name, row.email, row.age.to_string()],
        )?;

        if changed == 0 {
            Ok(InsertOutcome::AlreadyPresent)
        } else {
            Ok(InsertOutcome::Inserted(user_id))
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    pub duplicates: usize,
    pub malformed: usize,
    pub failed: usize,
}

/// Copies every unique user of a CSV file into `user_data`
#[derive(Debug, Default)]
pub struct Importer {
    dedup: Deduplicator,
}

impl Importer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import all rows of `reader` in a single transaction.
    ///
    /// Malformed rows, repeated emails and rows the database refuses are
    /// reported and skipped. Only failing to open the file or to commit
    /// aborts the run, in which case nothing is written.
    pub fn run(
        &mut self,
        conn: &mut Connection,
        reader: &CsvRowReader,
    ) -> Result<ImportReport, SeedError> {
        println!(
            "{} {}",
            "I'm going to import users from".yellow(),
            reader.path().display().to_string().white()
        );

        let rows = reader.rows()?;
        let tx = conn.transaction()?;
        let mut report = ImportReport::default();

        for row in rows {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    println!("{}: {}", "Couldn't parse a row".red(), e);
                    report.malformed += 1;
                    continue;
                }
            };

            if self.dedup.is_duplicate(&row.email) {
                report.duplicates += 1;
                continue;
            }

            match RowInserter::insert(&tx, &row) {
                Ok(InsertOutcome::Inserted(_)) => {
                    self.dedup.mark(&row.email);
                    report.inserted += 1;
                }
                Ok(InsertOutcome::AlreadyPresent) => {
                    self.dedup.mark(&row.email);
                    report.duplicates += 1;
                }
                Err(e) => {
                    println!(
                        "{} {}: {}",
                        "Couldn't insert".red(),
                        row.email.white(),
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        tx.commit()?;

        println!(
            "{} {} {} {} {} {} {} {} {}",
            "I'm done! Inserted".green(),
            report.inserted.to_string().white(),
            "users, skipped".green(),
            report.duplicates.to_string().white(),
            "duplicates and".green(),
            report.malformed.to_string().white(),
            "malformed rows, and".green(),
            report.failed.to_string().white(),
            "inserts failed".green(),
        );
        Ok(report)
    }
}
