//! The form for recording a new expense.

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::{
    category::Category,
    endpoints,
    expense::{ExpenseDraft, IdempotencyToken, MAX_AMOUNT, MAX_DESCRIPTION_LENGTH, MIN_AMOUNT},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
};

pub(super) const FORM_ID: &str = "expense-form";

/// The fields posted by the expense form.
///
/// Every field is read as text so that a blank or malformed field becomes a
/// validation error instead of a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseFormData {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub idempotency_key: String,
}

impl ExpenseFormData {
    /// Convert the posted fields into a draft.
    ///
    /// An amount that is not a number is treated as zero and a date that is
    /// not an ISO 8601 date as missing, so both fail validation with the
    /// usual messages.
    pub fn to_draft(&self) -> ExpenseDraft {
        let date_format = format_description!("[year]-[month]-[day]");

        ExpenseDraft {
            amount: self.amount.trim().parse().unwrap_or(0.0),
            category: self.category.clone(),
            description: self.description.clone(),
            date: Date::parse(self.date.trim(), date_format).ok(),
        }
    }
}

pub(super) fn expense_form_view(
    draft: &ExpenseDraft,
    idempotency_key: &IdempotencyToken,
    today: Date,
) -> Markup {
    let amount = if draft.amount > 0.0 {
        draft.amount.to_string()
    } else {
        String::new()
    };
    let date = draft.date.map(|date| date.to_string()).unwrap_or_default();

    html! {
        form
            id=(FORM_ID)
            hx-post=(endpoints::EXPENSES_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
            class="w-full space-y-4"
        {
            input type="hidden" name="idempotency_key" value=(idempotency_key.as_str());

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper"
                {
                    input
                        id="amount"
                        type="number"
                        name="amount"
                        step="0.01"
                        min=(MIN_AMOUNT)
                        max=(MAX_AMOUNT)
                        placeholder="0.00"
                        value=(amount)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select id="category" name="category" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in Category::ALL {
                        option
                            value=(category.as_str())
                            selected[draft.category == category.as_str()]
                        {
                            (category.as_str())
                        }
                    }
                }
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    id="description"
                    type="text"
                    name="description"
                    placeholder="What did you spend on?"
                    maxlength=(MAX_DESCRIPTION_LENGTH)
                    value=(draft.description)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    id="date"
                    type="date"
                    name="date"
                    max=(today.to_string())
                    value=(date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" { (loading_spinner()) }
                "Add Expense"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        expense::{ExpenseDraft, IdempotencyToken},
        expense_page::form::{ExpenseFormData, expense_form_view},
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_valid_html, must_get_form,
        },
    };

    const TODAY: time::Date = date!(2024 - 01 - 20);

    fn render(draft: &ExpenseDraft, token: &IdempotencyToken) -> Html {
        Html::parse_fragment(&expense_form_view(draft, token, TODAY).into_string())
    }

    #[test]
    fn blank_form_has_defaults() {
        let token = IdempotencyToken::generate();
        let html = render(&ExpenseDraft::new(TODAY), &token);
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/expenses", "hx-post");
        assert_eq!(form.value().attr("hx-target-error"), Some("#alert-container"));
        assert_form_input_with_value(&form, "amount", "number", "");
        assert_form_input_with_value(&form, "description", "text", "");
        assert_form_input_with_value(&form, "date", "date", "2024-01-20");
        assert_form_submit_button_with_text(&form, "Add Expense");

        let selected = form
            .select(&Selector::parse("select[name=category] option[selected]").unwrap())
            .map(|option| option.value().attr("value").unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(selected, ["Food"]);
    }

    #[test]
    fn form_carries_idempotency_key() {
        let token = IdempotencyToken::generate();
        let html = render(&ExpenseDraft::new(TODAY), &token);

        let hidden = html
            .select(&Selector::parse("input[type=hidden][name=idempotency_key]").unwrap())
            .next()
            .expect("No idempotency key input found");
        assert_eq!(hidden.value().attr("value"), Some(token.as_str()));
    }

    #[test]
    fn date_cannot_be_after_today() {
        let html = render(&ExpenseDraft::new(TODAY), &IdempotencyToken::generate());

        let form = must_get_form(&html);
        assert_form_input(&form, "date", "date");
        let date_input = form
            .select(&Selector::parse("input[name=date]").unwrap())
            .next()
            .unwrap();
        assert_eq!(date_input.value().attr("max"), Some("2024-01-20"));
    }

    #[test]
    fn form_keeps_draft_values() {
        let draft = ExpenseDraft {
            amount: 42.5,
            category: "Transport".to_owned(),
            description: "Train".to_owned(),
            date: Some(date!(2024 - 01 - 18)),
        };
        let html = render(&draft, &IdempotencyToken::generate());

        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "amount", "number", "42.5");
        assert_form_input_with_value(&form, "description", "text", "Train");
        assert_form_input_with_value(&form, "date", "date", "2024-01-18");
    }

    #[test]
    fn form_data_with_blank_fields_becomes_invalid_draft() {
        let draft = ExpenseFormData::default().to_draft();

        assert_eq!(draft.amount, 0.0);
        assert_eq!(draft.date, None);
    }

    #[test]
    fn form_data_parses_amount_and_date() {
        let draft = ExpenseFormData {
            amount: " 12.75 ".to_owned(),
            category: "Food".to_owned(),
            description: "Snacks".to_owned(),
            date: "2024-01-15".to_owned(),
            idempotency_key: String::new(),
        }
        .to_draft();

        assert_eq!(draft.amount, 12.75);
        assert_eq!(draft.category, "Food");
        assert_eq!(draft.date, Some(date!(2024 - 01 - 15)));
    }

    #[test]
    fn malformed_amount_is_zero() {
        let draft = ExpenseFormData {
            amount: "twelve".to_owned(),
            ..Default::default()
        }
        .to_draft();

        assert_eq!(draft.amount, 0.0);
    }
}
