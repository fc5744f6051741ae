//! The data access layer for expenses.

use crate::{
    Error,
    category::CategoryFilter,
    expense::{Expense, IdempotencyToken, NewExpense},
    store::{ExpenseOrder, ExpenseQuery, ExpenseStore, NewExpenseRow, StoreFailure},
};

/// Creates and reads expenses through an [ExpenseStore].
///
/// The client holds no state other than the store it was given.
#[derive(Debug, Clone)]
pub struct ExpenseClient<S> {
    store: S,
}

impl<S: ExpenseStore> ExpenseClient<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a new expense tagged with `idempotency_key`.
    ///
    /// Calling this function twice with the same key stores a single expense.
    /// The second call fails with [Error::DuplicateSubmission].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateSubmission] if an expense was already created with `idempotency_key`,
    /// - [Error::DatabaseLockError] if the database connection is poisoned,
    /// - or [Error::Store] if there is any other store failure.
    pub fn create_expense(
        &self,
        input: &NewExpense,
        idempotency_key: &IdempotencyToken,
    ) -> Result<Expense, Error> {
        let row = NewExpenseRow {
            amount: input.amount(),
            category: input.category(),
            description: input.description(),
            date: input.date(),
            idempotency_key,
        };

        self.store.insert(row).map_err(|failure| {
            if failure.is_unique_violation_on("idempotency_key") {
                tracing::warn!("rejected duplicate submission with key {idempotency_key}");
                Error::DuplicateSubmission
            } else {
                into_error("create expense", failure)
            }
        })
    }

    /// Get the expenses in `category`, newest first.
    ///
    /// If `sort_by_date` is `true` expenses are ordered by the day they
    /// happened, otherwise by when they were recorded.
    ///
    /// # Errors
    /// Returns [Error::Store] or [Error::DatabaseLockError] if the store fails.
    pub fn get_expenses(
        &self,
        category: CategoryFilter,
        sort_by_date: bool,
    ) -> Result<Vec<Expense>, Error> {
        let query = ExpenseQuery {
            category: category.category(),
            order: if sort_by_date {
                ExpenseOrder::Date
            } else {
                ExpenseOrder::CreatedAt
            },
        };

        self.store
            .select(&query)
            .map_err(|failure| into_error("get expenses", failure))
    }
}

fn into_error(operation: &str, failure: StoreFailure) -> Error {
    tracing::error!("could not {operation}: {failure}");

    match failure {
        StoreFailure::LockPoisoned => Error::DatabaseLockError,
        failure => Error::Store(failure),
    }
}


#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        category::{Category, CategoryFilter},
        expense::{ExpenseClient, IdempotencyToken, NewExpense, client::test_utils::FakeStore},
    };

    const TODAY: time::Date = date!(2024 - 01 - 20);

    fn new_expense(amount: f64, category: Category, description: &str, date: time::Date) -> NewExpense {
        NewExpense::new(amount, category, description, date, TODAY).unwrap()
    }

    fn seed(client: &ExpenseClient<&FakeStore>) {
        for (amount, category, description, date) in [
            (100.0, Category::Food, "Lunch", date!(2024 - 01 - 15)),
            (50.0, Category::Transport, "Taxi", date!(2024 - 01 - 16)),
            (75.0, Category::Food, "Dinner", date!(2024 - 01 - 17)),
            (30.0, Category::Entertainment, "Movie", date!(2024 - 01 - 14)),
            (20.0, Category::Transport, "Bus", date!(2024 - 01 - 18)),
        ] {
            client
                .create_expense(
                    &new_expense(amount, category, description, date),
                    &IdempotencyToken::generate(),
                )
                .unwrap();
        }
    }

    fn descriptions(expenses: &[crate::expense::Expense]) -> Vec<&str> {
        expenses.iter().map(|e| e.description.as_str()).collect()
    }

    #[test]
    fn create_expense_returns_created_expense() {
        let store = FakeStore::default();
        let client = ExpenseClient::new(&store);
        let key = IdempotencyToken::generate();

        let expense = client
            .create_expense(
                &new_expense(100.0, Category::Food, "Lunch", date!(2024 - 01 - 15)),
                &key,
            )
            .unwrap();

        assert_eq!(expense.amount, 100.0);
        assert_eq!(expense.category, Category::Food);
        assert_eq!(expense.idempotency_key, key);
        assert_eq!(store.insert_calls.get(), 1);
    }

    #[test]
    fn same_key_twice_stores_one_expense() {
        let store = FakeStore::default();
        let client = ExpenseClient::new(&store);
        let key = IdempotencyToken::generate();
        let input = new_expense(100.0, Category::Food, "Lunch", date!(2024 - 01 - 15));

        client.create_expense(&input, &key).unwrap();
        let second = client.create_expense(&input, &key);

        assert!(
            matches!(second, Err(Error::DuplicateSubmission)),
            "got {second:?}"
        );
        assert_eq!(store.rows.borrow().len(), 1);
    }

    #[test]
    fn duplicate_submission_message_asks_to_refresh() {
        assert_eq!(
            Error::DuplicateSubmission.to_string(),
            "This expense was already submitted. Please refresh to see it."
        );
    }

    #[test]
    fn other_store_failures_become_store_errors() {
        let store = FakeStore::failing("connection refused");
        let client = ExpenseClient::new(&store);

        let result = client.create_expense(
            &new_expense(1.0, Category::Food, "Lunch", date!(2024 - 01 - 15)),
            &IdempotencyToken::generate(),
        );

        match result {
            Err(Error::Store(failure)) => {
                assert!(failure.to_string().contains("connection refused"))
            }
            other => panic!("want store error, got {other:?}"),
        }
    }

    #[test]
    fn unique_violation_on_id_is_a_store_error() {
        let store = FakeStore::violating_unique("id");
        let client = ExpenseClient::new(&store);

        let result = client.create_expense(
            &new_expense(1.0, Category::Food, "Lunch", date!(2024 - 01 - 15)),
            &IdempotencyToken::generate(),
        );

        match result {
            Err(Error::Store(failure)) => assert!(failure.is_unique_violation_on("id")),
            other => panic!("want store error, got {other:?}"),
        }
    }

    #[test]
    fn unique_violation_on_idempotency_key_is_a_duplicate() {
        let store = FakeStore::violating_unique("idempotency_key");
        let client = ExpenseClient::new(&store);

        let result = client.create_expense(
            &new_expense(1.0, Category::Food, "Lunch", date!(2024 - 01 - 15)),
            &IdempotencyToken::generate(),
        );

        assert!(
            matches!(result, Err(Error::DuplicateSubmission)),
            "got {result:?}"
        );
    }

    #[test]
    fn get_expenses_without_filter_returns_all_by_date() {
        let store = FakeStore::default();
        let client = ExpenseClient::new(&store);
        seed(&client);

        let expenses = client.get_expenses(CategoryFilter::All, true).unwrap();

        assert_eq!(
            descriptions(&expenses),
            ["Bus", "Dinner", "Taxi", "Lunch", "Movie"]
        );
    }

    #[test]
    fn get_expenses_filters_by_category() {
        let store = FakeStore::default();
        let client = ExpenseClient::new(&store);
        seed(&client);

        let expenses = client
            .get_expenses(CategoryFilter::Only(Category::Transport), true)
            .unwrap();

        assert!(expenses.iter().all(|e| e.category == Category::Transport));
        assert_eq!(descriptions(&expenses), ["Bus", "Taxi"]);
    }

    #[test]
    fn sort_flag_switches_to_creation_time() {
        let store = FakeStore::default();
        let client = ExpenseClient::new(&store);
        seed(&client);

        let expenses = client.get_expenses(CategoryFilter::All, false).unwrap();

        assert_eq!(
            descriptions(&expenses),
            ["Bus", "Movie", "Dinner", "Taxi", "Lunch"]
        );
    }

    #[test]
    fn get_expenses_returns_empty_list_when_nothing_matches() {
        let store = FakeStore::default();
        let client = ExpenseClient::new(&store);

        let expenses = client
            .get_expenses(CategoryFilter::Only(Category::Education), true)
            .unwrap();

        assert!(expenses.is_empty());
    }

    #[test]
    fn get_expenses_propagates_store_failures() {
        let store = FakeStore::failing("timeout");
        let client = ExpenseClient::new(&store);

        let result = client.get_expenses(CategoryFilter::All, true);

        assert!(matches!(result, Err(Error::Store(_))), "got {result:?}");
    }
}
