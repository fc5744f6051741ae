//! The summary panel that breaks the listed expenses down by category.

use maud::{Markup, html};

use crate::{
    aggregation::CategorySummary,
    controller::SummaryFeed,
    html::{CATEGORY_BADGE_STYLE, format_currency, loading_spinner},
};

pub(super) const SUMMARY_ID: &str = "expense-summary";

/// Render the summary for `feed`.
///
/// With `oob` set the panel is marked for an out-of-band swap, so it can ride
/// along with the response for the expense list.
pub(super) fn summary_view(feed: SummaryFeed<'_>, oob: bool) -> Markup {
    let summary = CategorySummary::from_expenses(feed.expenses);

    html! {
        div
            id=(SUMMARY_ID)
            hx-swap-oob=[oob.then_some("true")]
            class="space-y-3"
        {
            @if feed.loading {
                p class="text-gray-500 dark:text-gray-400" { (loading_spinner()) "Loading summary..." }
            } @else if let Some(error) = feed.error {
                p role="alert" data-summary-error="true" class="text-red-600 dark:text-red-400"
                {
                    (error)
                }
            } @else if !summary.is_empty() {
                (summary_table(&summary))
            }
        }
    }
}

fn summary_table(summary: &CategorySummary) -> Markup {
    html! {
        h2 class="text-lg font-semibold" { "Spending by Category" }

        ul class="space-y-3"
        {
            @for entry in &summary.entries {
                li data-summary-entry=(entry.category.as_str())
                {
                    div class="flex justify-between text-sm"
                    {
                        span class=(CATEGORY_BADGE_STYLE) { (entry.category.as_str()) }

                        span
                        {
                            span data-summary-total="true" { (format_currency(entry.total)) }
                            " "
                            span data-summary-percentage="true" class="text-gray-500 dark:text-gray-400"
                            {
                                (format!("{:.1}%", entry.percentage))
                            }
                        }
                    }

                    div class="w-full h-2 mt-1 bg-gray-200 rounded-full dark:bg-gray-700"
                    {
                        div
                            data-summary-bar="true"
                            class="h-2 bg-blue-500 rounded-full"
                            style=(format!("width: {:.1}%", entry.bar_width))
                        {}
                    }
                }
            }
        }

        p class="flex justify-between pt-3 border-t font-semibold dark:border-gray-700"
        {
            span { "Total" }
            span data-summary-grand-total="true" { (format_currency(summary.total)) }
        }
    }
}
