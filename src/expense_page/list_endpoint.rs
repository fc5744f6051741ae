//! The endpoint that renders the expense list for a filter and sort order.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    controller::ListController,
    expense_page::{ExpensePageState, ListQuery, list::list_view, summary::summary_view},
};

/// A route handler for the expense list fragment.
///
/// The response holds the list panel and, out of band, the category summary
/// for the same expenses. A failed fetch is rendered into both panels rather
/// than returned as an error status, so htmx still swaps it in.
pub async fn get_expense_list(
    State(state): State<ExpensePageState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut controller = ListController::new(query.into());
    controller.load(&state.client);

    html! {
        (list_view(&controller))
        (summary_view(controller.summary_feed(), true))
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{FromRef, Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        AppState,
        category::{Category, CategoryFilter},
        expense::{ExpenseDraft, IdempotencyToken},
        expense_page::{ExpensePageState, ListQuery, get_expense_list},
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    fn get_test_state() -> ExpensePageState {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();
        let state = ExpensePageState::from_ref(&state);

        let today = date!(2024 - 01 - 31);
        for (amount, category, description, date) in [
            (100.0, "Food", "Groceries", date!(2024 - 01 - 10)),
            (50.0, "Transport", "Bus pass", date!(2024 - 01 - 20)),
            (75.0, "Food", "Dinner", date!(2024 - 01 - 05)),
        ] {
            let draft = ExpenseDraft {
                amount,
                category: category.to_owned(),
                description: description.to_owned(),
                date: Some(date),
            };
            let new_expense = draft.validate(today).unwrap();
            state
                .client
                .create_expense(&new_expense, &IdempotencyToken::generate())
                .unwrap();
        }

        state
    }

    fn query(category: CategoryFilter, sort_by_date: bool) -> Query<ListQuery> {
        Query(ListQuery {
            category,
            sort_by_date,
        })
    }

    fn descriptions(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("tr[data-expense-row] td:nth-child(3)").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn lists_all_expenses_newest_date_first() {
        let state = get_test_state();

        let response = get_expense_list(State(state), query(CategoryFilter::All, true)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_eq!(descriptions(&html), ["Bus pass", "Groceries", "Dinner"]);
    }

    #[tokio::test]
    async fn lists_most_recently_added_first() {
        let state = get_test_state();

        let response = get_expense_list(State(state), query(CategoryFilter::All, false)).await;

        let html = parse_html_fragment(response).await;
        assert_eq!(descriptions(&html), ["Dinner", "Bus pass", "Groceries"]);
    }

    #[tokio::test]
    async fn filters_by_category() {
        let state = get_test_state();

        let response = get_expense_list(
            State(state),
            query(CategoryFilter::Only(Category::Food), true),
        )
        .await;

        let html = parse_html_fragment(response).await;
        assert_eq!(descriptions(&html), ["Groceries", "Dinner"]);
    }

    #[tokio::test]
    async fn includes_out_of_band_summary() {
        let state = get_test_state();

        let response = get_expense_list(State(state), query(CategoryFilter::All, true)).await;

        let html = parse_html_fragment(response).await;
        let summary = html
            .select(&Selector::parse("#expense-summary[hx-swap-oob=true]").unwrap())
            .next()
            .expect("No out-of-band summary found");
        let categories: Vec<&str> = summary
            .select(&Selector::parse("li[data-summary-entry]").unwrap())
            .filter_map(|entry| entry.value().attr("data-summary-entry"))
            .collect();
        assert_eq!(categories, ["Food", "Transport"]);
    }
}
