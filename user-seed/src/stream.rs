use rusqlite::{types::Type, Connection, Row};
use rust_decimal::Decimal;

use crate::error::SeedError;

/// Page size used by [`stream_users`] when walking the whole table
pub const DEFAULT_PAGE_SIZE: usize = 100;

const SELECT_PAGE: &str = "
    SELECT user_id, name, email, age FROM user_data
    ORDER BY rowid
    LIMIT ?1 OFFSET ?2
";

/// A user as stored in `user_data`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub age: Decimal,
}

impl StoredUser {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let age: f64 = row.get(3)?;
        let age = Decimal::try_from(age)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Real, Box::new(e)))?
            .round_dp(2);

        Ok(Self {
            user_id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            age,
        })
    }
}

/// Fetch a single page of users, in insertion order
pub fn paginate_users(
    conn: &Connection,
    page_size: usize,
    offset: usize,
) -> Result<Vec<StoredUser>, SeedError> {
    let mut stmt = conn.prepare_cached(SELECT_PAGE)?;
    let users = stmt
        .query_map(
            [clamp_to_sql(page_size), clamp_to_sql(offset)],
            StoredUser::from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

/// SQLite reads a negative LIMIT as "no limit" and a negative OFFSET as 0
fn clamp_to_sql(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Yields whole pages of users, fetching the next one only when asked.
/// The last page may be short; an empty page ends the iteration.
pub struct Pages<'c> {
    conn: &'c Connection,
    page_size: usize,
    offset: usize,
    done: bool,
}

impl Iterator for Pages<'_> {
    type Item = Result<Vec<StoredUser>, SeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.page_size == 0 {
            return None;
        }

        match paginate_users(self.conn, self.page_size, self.offset) {
            Ok(page) if page.is_empty() => {
                self.done = true;
                None
            }
            Ok(page) => {
                self.offset += page.len();
                Some(Ok(page))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Users in batches of `batch_size`
pub fn stream_users_in_batches(conn: &Connection, batch_size: usize) -> Pages<'_> {
    Pages {
        conn,
        page_size: batch_size,
        offset: 0,
        done: false,
    }
}

/// Users one at a time, loading `page_size` of them from the database at once
pub fn lazy_paginate(
    conn: &Connection,
    page_size: usize,
) -> impl Iterator<Item = Result<StoredUser, SeedError>> + '_ {
    stream_users_in_batches(conn, page_size).flat_map(|page| match page {
        Ok(users) => users.into_iter().map(Ok).collect::<Vec<_>>(),
        Err(e) => vec![Err(e)],
    })
}

/// Every user in the table
pub fn stream_users(
    conn: &Connection,
) -> impl Iterator<Item = Result<StoredUser, SeedError>> + '_ {
    lazy_paginate(conn, DEFAULT_PAGE_SIZE)
}

/// Users strictly older than `min_age`, read in batches of `batch_size`
pub fn batch_processing(
    conn: &Connection,
    batch_size: usize,
    min_age: Decimal,
) -> impl Iterator<Item = Result<StoredUser, SeedError>> + '_ {
    lazy_paginate(conn, batch_size)
        .filter(move |user| user.as_ref().map_or(true, |user| user.age > min_age))
}

/// Average age over the whole table, `None` when it is empty
pub fn average_age(conn: &Connection) -> Result<Option<f64>, SeedError> {
    let mut stmt = conn.prepare("SELECT age FROM user_data")?;
    let mut ages = stmt.query_map([], |row| row.get::<_, f64>(0))?;

    let (mut total, mut count) = (0.0, 0usize);
    ages.try_for_each(|age| {
        total += age?;
        count += 1;
        Ok::<_, rusqlite::Error>(())
    })?;

    Ok((count > 0).then(|| total / count as f64))
}
