//! Defines the expense models and the validation rules for creating expenses.

use time::{Date, OffsetDateTime};

use crate::{category::Category, expense::IdempotencyToken};

/// The maximum number of characters allowed in an expense description.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// The smallest amount that can be recorded, one paisa.
pub const MIN_AMOUNT: f64 = 0.01;

/// The largest amount that can be recorded for a single expense.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Money that was spent, as recorded in the expense store.
///
/// Expenses are immutable once created. To create one, validate an
/// [ExpenseDraft] into a [NewExpense] and pass it to
/// [crate::expense::ExpenseClient::create_expense].
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The store-assigned, opaque identifier of the expense.
    pub id: String,
    /// How much was spent. Always greater than zero.
    pub amount: f64,
    /// What the money was spent on.
    pub category: Category,
    /// A short text description of the expense.
    pub description: String,
    /// The day the expense happened.
    pub date: Date,
    /// When the expense was recorded, assigned by the store.
    pub created_at: OffsetDateTime,
    /// The token that the expense was submitted with.
    pub idempotency_key: IdempotencyToken,
}

/// The reasons an expense draft can be rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    #[error("Amount must be at least ₹0.01")]
    AmountTooSmall,

    #[error("Amount must be at most ₹1,000,000,000")]
    AmountTooLarge,

    #[error("Please select a category")]
    MissingCategory,

    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    #[error("Please enter a description")]
    MissingDescription,

    #[error("Description must be at most {MAX_DESCRIPTION_LENGTH} characters")]
    DescriptionTooLong,

    #[error("Please select a date")]
    MissingDate,

    /// Expenses record money that has already been spent, so dates later
    /// than today are rejected.
    #[error("Date cannot be in the future")]
    FutureDate(Date),
}

impl ValidationError {
    /// The name of the form field that the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NonPositiveAmount
            | ValidationError::AmountTooSmall
            | ValidationError::AmountTooLarge => "amount",
            ValidationError::MissingCategory | ValidationError::InvalidCategory(_) => "category",
            ValidationError::MissingDescription | ValidationError::DescriptionTooLong => {
                "description"
            }
            ValidationError::MissingDate | ValidationError::FutureDate(_) => "date",
        }
    }
}

fn check_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount <= 0.0 {
        Err(ValidationError::NonPositiveAmount)
    } else if amount < MIN_AMOUNT {
        Err(ValidationError::AmountTooSmall)
    } else if amount > MAX_AMOUNT {
        Err(ValidationError::AmountTooLarge)
    } else {
        Ok(())
    }
}

/// A validated request to create an expense.
///
/// The fields are private so that a `NewExpense` can only be obtained through
/// [NewExpense::new] or [ExpenseDraft::validate].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    amount: f64,
    category: Category,
    description: String,
    date: Date,
}

impl NewExpense {
    /// Check the expense fields against the creation rules.
    ///
    /// The description is trimmed before it is checked and stored.
    ///
    /// # Errors
    /// Returns a [ValidationError] if `amount` is not a number between
    /// [MIN_AMOUNT] and [MAX_AMOUNT], `description` is blank or longer than [MAX_DESCRIPTION_LENGTH]
    /// characters, or `date` is later than `today`.
    pub fn new(
        amount: f64,
        category: Category,
        description: &str,
        date: Date,
        today: Date,
    ) -> Result<Self, ValidationError> {
        check_amount(amount)?;

        let description = description.trim();

        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::DescriptionTooLong);
        }

        if date > today {
            return Err(ValidationError::FutureDate(date));
        }

        Ok(Self {
            amount,
            category,
            description: description.to_owned(),
            date,
        })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> Date {
        self.date
    }
}

/// The unvalidated input of the expense form.
///
/// A draft can hold values that would be rejected by the store, e.g. the
/// default amount of zero. Call [ExpenseDraft::validate] to turn it into a
/// [NewExpense].
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub amount: f64,
    /// The raw category label picked by the user.
    pub category: String,
    pub description: String,
    pub date: Option<Date>,
}

impl ExpenseDraft {
    /// A blank draft: no amount, the first category, and `today` as the date.
    pub fn new(today: Date) -> Self {
        Self {
            amount: 0.0,
            category: Category::default().as_str().to_owned(),
            description: String::new(),
            date: Some(today),
        }
    }

    /// Validate the draft in the order the form fields are displayed.
    ///
    /// # Errors
    /// Returns the first [ValidationError] found.
    pub fn validate(&self, today: Date) -> Result<NewExpense, ValidationError> {
        check_amount(self.amount)?;

        let category = self.category.trim();

        if category.is_empty() {
            return Err(ValidationError::MissingCategory);
        }

        let category: Category = category
            .parse()
            .map_err(|_| ValidationError::InvalidCategory(category.to_owned()))?;

        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        let date = self.date.ok_or(ValidationError::MissingDate)?;

        NewExpense::new(self.amount, category, &self.description, date, today)
    }
}
