//! Defines the contract for the relational store that persists expenses.
//!
//! The application never talks to the database directly. It goes through an
//! [ExpenseStore], which the [crate::expense::ExpenseClient] receives at
//! construction time. This keeps the store swappable, e.g. for a fake in tests.

mod sqlite;

pub use sqlite::{SqliteExpenseStore, create_expense_table};

use time::Date;

use crate::{
    category::Category,
    expense::{Expense, IdempotencyToken},
};

/// The SQLSTATE code reported when a UNIQUE constraint is violated.
pub const UNIQUE_VIOLATION: &str = "23505";

/// The SQLSTATE code reported when a CHECK constraint is violated.
pub const CHECK_VIOLATION: &str = "23514";

/// The row to insert for a new expense.
///
/// The store assigns the ID and creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpenseRow<'a> {
    pub amount: f64,
    pub category: Category,
    pub description: &'a str,
    pub date: Date,
    pub idempotency_key: &'a IdempotencyToken,
}

/// The column to sort expenses by. Both orders are newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseOrder {
    /// Sort by the day the expense happened.
    Date,
    /// Sort by when the expense was recorded.
    CreatedAt,
}

/// Defines which expenses to fetch with [ExpenseStore::select] and how to order them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseQuery {
    /// Only include expenses in this category. `None` includes all expenses.
    pub category: Option<Category>,
    pub order: ExpenseOrder,
}

/// A failure reported by an [ExpenseStore].
#[derive(Debug, thiserror::Error)]
pub enum StoreFailure {
    /// The row conflicts with a constraint of the table, e.g. a duplicate
    /// unique value. `code` is a SQLSTATE code such as [UNIQUE_VIOLATION].
    #[error("constraint \"{constraint}\" was violated (code {code})")]
    ConstraintViolation { code: String, constraint: String },

    /// The connection could not be locked because another thread panicked
    /// while holding it.
    #[error("could not acquire the database lock")]
    LockPoisoned,

    /// Any other failure, e.g. a lost connection or a malformed row.
    #[error("the store failed: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreFailure {
    /// Whether this failure is a UNIQUE constraint violation on `column`.
    ///
    /// Column names must match exactly, so a violation on `idempotency_key`
    /// is not a violation on `id`.
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        match self {
            StoreFailure::ConstraintViolation { code, constraint } => {
                code == UNIQUE_VIOLATION
                    && constrained_columns(constraint).any(|name| name == column)
            }
            StoreFailure::LockPoisoned | StoreFailure::Other(_) => false,
        }
    }
}

/// The column names in a constraint description such as
/// "UNIQUE constraint failed: expense.date, expense.description".
fn constrained_columns(constraint: &str) -> impl Iterator<Item = &str> {
    let columns = constraint
        .split_once(": ")
        .map_or(constraint, |(_, columns)| columns);

    columns.split(',').map(|column| {
        let column = column.trim();
        column
            .rsplit_once('.')
            .map_or(column, |(_, name)| name)
    })
}

/// Handles the creation and retrieval of expenses.
pub trait ExpenseStore {
    /// Insert a new expense row and return the stored expense.
    ///
    /// # Errors
    /// Implementers must report a duplicate `idempotency_key` as a
    /// [StoreFailure::ConstraintViolation] with the code [UNIQUE_VIOLATION]
    /// and the constraint described as `"UNIQUE constraint failed: <table>.idempotency_key"`.
    fn insert(&self, row: NewExpenseRow<'_>) -> Result<Expense, StoreFailure>;

    /// Retrieve the expenses selected by `query`.
    ///
    /// Expenses that compare equal under the sort column are returned most
    /// recently inserted first.
    fn select(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, StoreFailure>;
}

impl<T: ExpenseStore + ?Sized> ExpenseStore for &T {
    fn insert(&self, row: NewExpenseRow<'_>) -> Result<Expense, StoreFailure> {
        (**self).insert(row)
    }

    fn select(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, StoreFailure> {
        (**self).select(query)
    }
}
