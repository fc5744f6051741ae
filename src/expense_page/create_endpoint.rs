//! The endpoint that creates an expense from the posted form.

use std::time::Instant;

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxResponseTrigger;
use maud::html;
use time::Date;

use crate::{
    Error,
    alert::Alert,
    controller::{FormController, FormState, SubmitOutcome},
    expense::{Expense, IdempotencyToken},
    expense_page::{
        EXPENSE_CREATED_EVENT, ExpensePageState,
        form::{ExpenseFormData, expense_form_view},
    },
    html::format_currency,
    timezone::get_local_today,
};

/// A route handler for creating a new expense.
///
/// On success the form is replaced with a blank one that carries a new
/// idempotency key, and the `expense-created` event tells the expense list
/// to fetch itself again. On failure an alert is returned and the form in the
/// browser keeps its values and its key, so submitting it again is safe.
pub async fn create_expense_endpoint(
    State(state): State<ExpensePageState>,
    Form(form_data): Form<ExpenseFormData>,
) -> Response {
    let today = match get_local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let idempotency_key = match form_data.idempotency_key.parse::<IdempotencyToken>() {
        Ok(key) => key,
        Err(error) => {
            tracing::warn!("rejected expense form: {error}");
            return Error::InvalidIdempotencyToken.into_alert_response();
        }
    };

    let mut controller = FormController::resume(form_data.to_draft(), idempotency_key);

    match controller.submit(&state.client, today, Instant::now()) {
        SubmitOutcome::Created(expense) => created_response(&controller, &expense, today),
        outcome => match controller.into_state() {
            FormState::Failed { error, .. } => error.into_alert_response(),
            state => {
                tracing::error!("expense submission ended with {outcome:?} in state {state:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: "The expense could not be submitted. Please try again."
                            .to_owned(),
                    }
                    .into_html(),
                )
                    .into_response()
            }
        },
    }
}

fn created_response(controller: &FormController, expense: &Expense, today: Date) -> Response {
    tracing::info!(
        "created expense {} of {} in {}",
        expense.id,
        format_currency(expense.amount),
        expense.category
    );

    let alert = Alert::Success {
        message: "Expense added successfully!".to_owned(),
        details: format!(
            "{} for {} was added to your expenses.",
            format_currency(expense.amount),
            expense.description
        ),
    };

    (
        HxResponseTrigger::normal([EXPENSE_CREATED_EVENT]),
        html! {
            (expense_form_view(controller.draft(), controller.idempotency_key(), today))
            (alert.into_oob_html())
        },
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        Form,
        extract::{FromRef, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        AppState,
        category::CategoryFilter,
        expense::IdempotencyToken,
        expense_page::{ExpensePageState, create_expense_endpoint, form::ExpenseFormData},
        test_utils::{assert_valid_html, get_header, parse_html_fragment},
    };

    fn get_test_state() -> ExpensePageState {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();

        ExpensePageState::from_ref(&state)
    }

    fn form(amount: &str, key: &IdempotencyToken) -> ExpenseFormData {
        ExpenseFormData {
            amount: amount.to_owned(),
            category: "Transport".to_owned(),
            description: "Train ticket".to_owned(),
            date: "2024-01-15".to_owned(),
            idempotency_key: key.to_string(),
        }
    }

    fn stored_count(state: &ExpensePageState) -> usize {
        state
            .client
            .get_expenses(CategoryFilter::All, true)
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn creates_expense_and_returns_fresh_form() {
        let state = get_test_state();
        let key = IdempotencyToken::generate();

        let response =
            create_expense_endpoint(State(state.clone()), Form(form("42.50", &key))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(get_header(&response, "hx-trigger").contains("expense-created"));
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let new_key = html
            .select(&Selector::parse("input[name=idempotency_key]").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"))
            .expect("No idempotency key in new form");
        assert_ne!(new_key, key.as_str());

        let alert_text = html
            .select(&Selector::parse("#alert-container").unwrap())
            .next()
            .expect("No out-of-band alert")
            .text()
            .collect::<String>();
        assert!(alert_text.contains("Expense added successfully!"), "got {alert_text}");

        assert_eq!(stored_count(&state), 1);
    }

    #[tokio::test]
    async fn same_key_twice_is_a_conflict() {
        let state = get_test_state();
        let key = IdempotencyToken::generate();
        create_expense_endpoint(State(state.clone()), Form(form("42.50", &key))).await;

        let response =
            create_expense_endpoint(State(state.clone()), Form(form("42.50", &key))).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(
            text.contains("This expense was already submitted. Please refresh to see it."),
            "got {text}"
        );
        assert_eq!(stored_count(&state), 1);
    }

    #[tokio::test]
    async fn zero_amount_is_rejected_without_storing() {
        let state = get_test_state();

        let response = create_expense_endpoint(
            State(state.clone()),
            Form(form("0", &IdempotencyToken::generate())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Amount must be greater than 0"), "got {text}");
        assert_eq!(stored_count(&state), 0);
    }

    #[tokio::test]
    async fn future_date_is_rejected() {
        let state = get_test_state();
        let mut data = form("10", &IdempotencyToken::generate());
        data.date = "9999-12-31".to_owned();

        let response = create_expense_endpoint(State(state.clone()), Form(data)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(stored_count(&state), 0);
    }

    #[tokio::test]
    async fn malformed_key_is_a_bad_request() {
        let state = get_test_state();
        let mut data = form("10", &IdempotencyToken::generate());
        data.idempotency_key = "not-a-token".to_owned();

        let response = create_expense_endpoint(State(state.clone()), Form(data)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stored_count(&state), 0);
    }
}
