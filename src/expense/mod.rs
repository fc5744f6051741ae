//! Expense management.
//!
//! This module contains everything related to expenses except for rendering:
//! - The `Expense` model, the `ExpenseDraft` form input and its validation
//! - Idempotency tokens for retry-safe submission
//! - The `ExpenseClient` data access layer

mod client;
mod core;
mod idempotency;

pub use client::ExpenseClient;
pub use core::{
    Expense, ExpenseDraft, MAX_AMOUNT, MAX_DESCRIPTION_LENGTH, MIN_AMOUNT, NewExpense,
    ValidationError,
};
pub use idempotency::{IdempotencyToken, InvalidToken};

#[cfg(test)]
pub(crate) use client::test_utils;
