use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

use crate::error::{RowError, SeedError};

const COLUMNS: [&str; 3] = ["name", "email", "age"];

/// DECIMAL(5,2) tops out at 999.99
const MAX_AGE: Decimal = Decimal::ONE_THOUSAND;

/// One user as it comes out of the CSV export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub name: String,
    /// Trimmed, case kept as written
    pub email: String,
    pub age: Decimal,
}

#[derive(Deserialize)]
struct RawRow {
    name: String,
    email: String,
    age: String,
}

impl RawRow {
    fn into_user(self) -> Result<UserRow, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name is empty".to_string());
        }

        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err("email is empty".to_string());
        }

        let age = Decimal::from_str(self.age.trim())
            .map_err(|e| format!("age {:?} is not a decimal: {e}", self.age))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if age < Decimal::ZERO {
            return Err(format!("age {age} is negative"));
        }
        if age >= MAX_AGE {
            return Err(format!("age {age} doesn't fit in DECIMAL(5,2)"));
        }

        Ok(UserRow {
            name: name.to_string(),
            email,
            age,
        })
    }
}

/// Reads users from a CSV file with a `name,email,age` header
#[derive(Debug, Clone)]
pub struct CsvRowReader {
    path: PathBuf,
}

impl CsvRowReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file and lazily parse it in file order. Every call starts
    /// over from the first row.
    ///
    /// A row that can't be parsed comes out as an error carrying its line
    /// number; the rows after it are still read.
    pub fn rows(&self) -> Result<impl Iterator<Item = Result<UserRow, RowError>>, SeedError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        if let Some(missing) = COLUMNS
            .into_iter()
            .find(|column| !headers.iter().any(|h| h == *column))
        {
            return Err(SeedError::MissingColumn(missing));
        }

        Ok(reader.into_records().map(move |record| {
            let record = record.map_err(|e| RowError {
                line: e.position().map_or(0, |p| p.line()),
                reason: e.to_string(),
            })?;
            let line = record.position().map_or(0, |p| p.line());

            record
                .deserialize::<RawRow>(Some(&headers))
                .map_err(|e| e.to_string())
                .and_then(RawRow::into_user)
                .map_err(|reason| RowError { line, reason })
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn user(name: &str, email: &str, age: Decimal) -> UserRow {
        UserRow {
            name: name.to_string(),
            email: email.to_string(),
            age,
        }
    }

    #[test]
    fn test_reads_rows_in_file_order() {
        let file = csv_file(
            "name,email,age\n\
             Dan Altenwerth Jr.,Molly59@gmail.com,67\n\
             Glenda Wisozk,Miriam21@gmail.com,119.5\n",
        );
        let rows: Vec<_> = CsvRowReader::new(file.path()).rows().unwrap().collect();

        assert_eq!(
            rows,
            vec![
                Ok(user("Dan Altenwerth Jr.", "Molly59@gmail.com", Decimal::new(67, 0))),
                Ok(user("Glenda Wisozk", "Miriam21@gmail.com", Decimal::new(1195, 1))),
            ]
        );
    }

    #[test]
    fn test_rows_can_be_read_again() {
        let file = csv_file("name,email,age\na,a@x.io,1\nb,b@x.io,2\n");
        let reader = CsvRowReader::new(file.path());

        let mut first = reader.rows().unwrap();
        assert_eq!(first.next().unwrap().unwrap().name, "a");

        let second: Vec<_> = reader.rows().unwrap().map(|r| r.unwrap().name).collect();
        assert_eq!(second, vec!["a", "b"]);
    }

    #[test]
    fn test_header_order_does_not_matter() {
        let file = csv_file("age, email ,name\n42,Q@x.io,Quinn\n");
        let rows: Vec<_> = CsvRowReader::new(file.path()).rows().unwrap().collect();
        assert_eq!(rows, vec![Ok(user("Quinn", "Q@x.io", Decimal::new(42, 0)))]);
    }

    #[test]
    fn test_malformed_rows_do_not_stop_the_rest() {
        let file = csv_file(
            "name,email,age\n\
             a,a@x.io,not-a-number\n\
             b,b@x.io\n\
             c,c@x.io,33.333\n",
        );
        let rows: Vec<_> = CsvRowReader::new(file.path()).rows().unwrap().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].as_ref().unwrap_err().line, 2);
        assert!(rows[1].is_err());
        assert_eq!(rows[2], Ok(user("c", "c@x.io", Decimal::new(3333, 2))));
    }

    #[test_case("33.345", Decimal::new(3335, 2) ; "half rounds up")]
    #[test_case("20.125", Decimal::new(2013, 2) ; "half rounds up after an even digit")]
    #[test_case("20.124", Decimal::new(2012, 2) ; "below half rounds down")]
    #[test_case("999.994", Decimal::new(99999, 2) ; "largest age that fits")]
    fn test_age_is_rounded_to_two_places(age: &str, expected: Decimal) {
        let file = csv_file(&format!("name,email,age\na,a@x.io,{age}\n"));
        let rows: Vec<_> = CsvRowReader::new(file.path()).rows().unwrap().collect();
        assert_eq!(rows, vec![Ok(user("a", "a@x.io", expected))]);
    }

    #[test_case("a,a@x.io,-1" ; "negative age")]
    #[test_case("a,a@x.io,999.995" ; "rounds up past the column range")]
    #[test_case("a,a@x.io,1000" ; "age too large")]
    #[test_case("a,a@x.io," ; "empty age")]
    #[test_case(",a@x.io,20" ; "empty name")]
    #[test_case("a,  ,20" ; "empty email")]
    fn test_rejects_row(row: &str) {
        let file = csv_file(&format!("name,email,age\n{row}\n"));
        let rows: Vec<_> = CsvRowReader::new(file.path()).rows().unwrap().collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_err(), "{row} should be rejected");
    }

    #[test]
    fn test_missing_column() {
        let file = csv_file("name,email\na,a@x.io\n");
        assert!(matches!(
            CsvRowReader::new(file.path()).rows(),
            Err(SeedError::MissingColumn("age"))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CsvRowReader::new(dir.path().join("user_data.csv")).rows(),
            Err(SeedError::Csv(_))
        ));
    }
}
