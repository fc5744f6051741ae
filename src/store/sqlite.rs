//! An [ExpenseStore] backed by a SQLite database.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    expense::Expense,
    store::{
        CHECK_VIOLATION, ExpenseOrder, ExpenseQuery, ExpenseStore, NewExpenseRow, StoreFailure,
        UNIQUE_VIOLATION,
    },
};

/// Stores expenses in the `expense` table of a shared SQLite connection.
#[derive(Debug, Clone)]
pub struct SqliteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteExpenseStore {
    /// Create a store that uses `connection`.
    ///
    /// The `expense` table must already exist, see [create_expense_table].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

/// Create the `expense` table if it does not exist yet.
///
/// # Errors
/// Returns an error if the SQL statement fails.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id TEXT PRIMARY KEY,
            amount REAL NOT NULL CHECK (amount > 0),
            category TEXT NOT NULL,
            description TEXT NOT NULL CHECK (length(description) <= 200),
            date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            idempotency_key TEXT NOT NULL UNIQUE
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);
        CREATE INDEX IF NOT EXISTS idx_expense_created_at ON expense(created_at);",
    )
}

/// Map a database row to an [Expense].
///
/// Expects the columns in the order: id, amount, category, description, date,
/// created_at, idempotency_key.
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        created_at: row.get(5)?,
        idempotency_key: row.get(6)?,
    })
}

impl From<rusqlite::Error> for StoreFailure {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                description,
            ) => StoreFailure::ConstraintViolation {
                code: UNIQUE_VIOLATION.to_owned(),
                constraint: description.unwrap_or_default(),
            },
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_CHECK,
                },
                description,
            ) => StoreFailure::ConstraintViolation {
                code: CHECK_VIOLATION.to_owned(),
                constraint: description.unwrap_or_default(),
            },
            error => StoreFailure::Other(Box::new(error)),
        }
    }
}

impl SqliteExpenseStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreFailure> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            StoreFailure::LockPoisoned
        })
    }
}

impl ExpenseStore for SqliteExpenseStore {
    fn insert(&self, row: NewExpenseRow<'_>) -> Result<Expense, StoreFailure> {
        let connection = self.lock()?;

        let expense = connection
            .prepare(
                "INSERT INTO expense (id, amount, category, description, date, created_at, idempotency_key)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id, amount, category, description, date, created_at, idempotency_key",
            )?
            .query_row(
                (
                    Uuid::new_v4().to_string(),
                    row.amount,
                    row.category,
                    row.description,
                    row.date,
                    OffsetDateTime::now_utc(),
                    row.idempotency_key,
                ),
                map_expense_row,
            )?;

        Ok(expense)
    }

    fn select(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, StoreFailure> {
        let order_by = match query.order {
            ExpenseOrder::Date => "date DESC, rowid DESC",
            ExpenseOrder::CreatedAt => "created_at DESC, rowid DESC",
        };
        let where_clause = match query.category {
            Some(_) => "WHERE category = :category",
            None => "",
        };
        let sql = format!(
            "SELECT id, amount, category, description, date, created_at, idempotency_key
             FROM expense {where_clause} ORDER BY {order_by}"
        );

        let connection = self.lock()?;
        let mut statement = connection.prepare(&sql)?;

        let rows = match query.category {
            Some(category) => statement
                .query_map(&[(":category", &category)], map_expense_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => statement
                .query_map([], map_expense_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(rows)
    }
}
