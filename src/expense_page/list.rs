//! The expense list panel: the category filter, the sort toggle and the table.

use maud::{Markup, html};

use crate::{
    aggregation::total,
    category::{ALL_CATEGORIES, CategoryFilter},
    controller::{ListController, ListSelection, ListState},
    endpoints,
    expense::Expense,
    expense_page::{EXPENSE_CREATED_EVENT, list_url},
    html::{
        BUTTON_SECONDARY_STYLE, CATEGORY_BADGE_STYLE, FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, format_date, loading_spinner,
    },
};

pub(super) const LIST_ID: &str = "expense-list";

fn sort_label(sort_by_date: bool) -> &'static str {
    if sort_by_date {
        "Sort by: Date"
    } else {
        "Sort by: Recently added"
    }
}

/// Render the list panel for the current state of `controller`.
///
/// The panel fetches itself again whenever an expense is created. Only the
/// latest of overlapping fetches is swapped in.
pub(super) fn list_view(controller: &ListController) -> Markup {
    let selection = controller.selection();

    html! {
        div
            id=(LIST_ID)
            hx-get=(list_url(selection))
            hx-trigger=(format!("{EXPENSE_CREATED_EVENT} from:body"))
            hx-target="this"
            hx-swap="outerHTML"
            hx-sync="this:replace"
            hx-indicator="#expense-list-indicator"
            class="space-y-4"
        {
            (list_controls(controller, selection))

            span id="expense-list-indicator" class="htmx-indicator" { (loading_spinner()) }

            @match controller.state() {
                ListState::Loading => {
                    p class="text-gray-500 dark:text-gray-400" { (loading_spinner()) "Loading expenses..." }
                }
                ListState::Loaded { expenses, .. } => {
                    (expense_table(expenses, selection.category))
                }
                ListState::Error { message } => {
                    (load_error_view(message, selection))
                }
            }
        }
    }
}

fn list_controls(controller: &ListController, selection: ListSelection) -> Markup {
    let toggled = ListSelection {
        sort_by_date: !selection.sort_by_date,
        ..selection
    };

    html! {
        div class="flex flex-wrap gap-4 items-end justify-between"
        {
            form
                hx-get=(endpoints::EXPENSES_API)
                hx-trigger="change"
                hx-target=(format!("#{LIST_ID}"))
                hx-swap="outerHTML"
                class="flex items-center gap-2"
            {
                label for="category-filter" class="text-sm font-medium" { "Category" }

                select id="category-filter" name="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option
                        value=(ALL_CATEGORIES)
                        selected[selection.category == CategoryFilter::All]
                    {
                        "All categories"
                    }

                    @for category in controller.filter_options() {
                        option
                            value=(category.as_str())
                            selected[selection.category == CategoryFilter::Only(category)]
                        {
                            (category.as_str())
                        }
                    }
                }

                input type="hidden" name="sort_by_date" value=(selection.sort_by_date.to_string());
            }

            button
                type="button"
                hx-get=(list_url(toggled))
                hx-target=(format!("#{LIST_ID}"))
                hx-swap="outerHTML"
                class=(BUTTON_SECONDARY_STYLE)
            {
                (sort_label(selection.sort_by_date))
            }
        }
    }
}

fn expense_table(expenses: &[Expense], filter: CategoryFilter) -> Markup {
    if expenses.is_empty() {
        let heading = match filter.category() {
            Some(category) => format!("No {category} expenses"),
            None => "No expenses yet".to_owned(),
        };

        return html! {
            div data-empty-state="true" class="py-8 text-center text-gray-500 dark:text-gray-400"
            {
                p class="font-semibold" { (heading) }
                p class="text-sm" { "Add one to get started!" }
            }
        };
    }

    html! {
        div class="overflow-x-auto"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(format!("{TABLE_CELL_STYLE} text-right")) { "Amount" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        tr class=(TABLE_ROW_STYLE) data-expense-row="true"
                        {
                            td class=(TABLE_CELL_STYLE) { (format_date(expense.date)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(CATEGORY_BADGE_STYLE) { (expense.category.as_str()) }
                            }
                            td class=(TABLE_CELL_STYLE) { (expense.description) }
                            td class=(format!("{TABLE_CELL_STYLE} text-right")) data-amount="true"
                            {
                                (format_currency(expense.amount))
                            }
                        }
                    }
                }

                tfoot
                {
                    tr class="font-semibold text-gray-900 dark:text-white"
                    {
                        th scope="row" colspan="3" class=(TABLE_CELL_STYLE)
                        {
                            "Total (" (expenses.len()) " expenses):"
                        }
                        td class=(format!("{TABLE_CELL_STYLE} text-right")) data-total="true"
                        {
                            (format_currency(total(expenses)))
                        }
                    }
                }
            }
        }
    }
}

fn load_error_view(message: &str, selection: ListSelection) -> Markup {
    html! {
        div role="alert" data-load-error="true" class="py-8 text-center space-y-4"
        {
            p class="text-red-600 dark:text-red-400" { (message) }

            button
                type="button"
                hx-get=(list_url(selection))
                hx-target=(format!("#{LIST_ID}"))
                hx-swap="outerHTML"
                class=(BUTTON_SECONDARY_STYLE)
            {
                "Try Again"
            }
        }
    }
}
