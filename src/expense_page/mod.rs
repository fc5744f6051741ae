//! The single page of the app: the expense form, the expense list and the
//! category summary, plus the htmx endpoints that update them.

mod create_endpoint;
mod form;
mod list;
mod list_endpoint;
mod page;
mod summary;

pub use create_endpoint::create_expense_endpoint;
pub use list_endpoint::get_expense_list;
pub use page::get_expense_page;

use axum::extract::FromRef;
use serde::Deserialize;

use crate::{
    AppState,
    category::CategoryFilter,
    controller::ListSelection,
    endpoints,
    expense::ExpenseClient,
    store::SqliteExpenseStore,
};

/// The htmx event sent when an expense was created, which makes the expense
/// list fetch itself again.
pub const EXPENSE_CREATED_EVENT: &str = "expense-created";

/// The state needed by the expense page and its endpoints.
#[derive(Debug, Clone)]
pub struct ExpensePageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
    pub client: ExpenseClient<SqliteExpenseStore>,
}

impl FromRef<AppState> for ExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            client: ExpenseClient::new(state.expense_store.clone()),
        }
    }
}

/// The query string for the expense list, e.g. `?category=Food&sort_by_date=false`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default = "default_sort_by_date")]
    pub sort_by_date: bool,
}

fn default_sort_by_date() -> bool {
    true
}

impl From<ListQuery> for ListSelection {
    fn from(query: ListQuery) -> Self {
        Self {
            category: query.category,
            sort_by_date: query.sort_by_date,
        }
    }
}

/// The URL that fetches the expense list for `selection`.
fn list_url(selection: ListSelection) -> String {
    format!(
        "{}?category={}&sort_by_date={}",
        endpoints::EXPENSES_API,
        selection.category.as_query_value(),
        selection.sort_by_date
    )
}

#[cfg(test)]
mod tests {
    use crate::{
        category::{Category, CategoryFilter},
        controller::ListSelection,
        expense_page::list_url,
    };

    #[test]
    fn list_url_encodes_selection() {
        let url = list_url(ListSelection {
            category: CategoryFilter::Only(Category::Food),
            sort_by_date: false,
        });

        assert_eq!(url, "/api/expenses?category=Food&sort_by_date=false");
    }

    #[test]
    fn list_url_uses_sentinel_for_all() {
        let url = list_url(ListSelection::default());

        assert_eq!(url, "/api/expenses?category=all&sort_by_date=true");
    }
}
