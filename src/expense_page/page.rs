//! The expense page with the form, the expense list and the category summary.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    controller::{FormController, ListController},
    expense_page::{
        ExpensePageState, ListQuery, form::expense_form_view, list::list_view,
        summary::summary_view,
    },
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base, currency_input_styles},
    timezone::get_local_today,
};

/// Renders the expense page for the filter and sort order in the query string.
pub async fn get_expense_page(
    State(state): State<ExpensePageState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, Error> {
    let today = get_local_today(&state.local_timezone)?;
    let form = FormController::new(today);

    let mut list = ListController::new(query.into());
    list.load(&state.client);

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                header
                {
                    h1 class="text-2xl font-bold" { "Expense Tracker" }
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Record what you spend and see where it goes."
                    }
                }

                div class="grid gap-6 lg:grid-cols-3"
                {
                    section class=(format!("{CARD_STYLE} lg:col-span-1"))
                    {
                        h2 class="mb-4 text-lg font-semibold" { "Add Expense" }
                        (expense_form_view(form.draft(), form.idempotency_key(), today))
                    }

                    section class=(format!("{CARD_STYLE} lg:col-span-2"))
                    {
                        h2 class="mb-4 text-lg font-semibold" { "Expenses" }
                        (list_view(&list))
                    }
                }

                (summary_card(&list))
            }
        }
    };

    Ok(base("Expenses", &[currency_input_styles()], &content).into_response())
}

fn summary_card(list: &ListController) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            (summary_view(list.summary_feed(), false))
        }
    }
}
