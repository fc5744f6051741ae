//! Pure functions that summarise a list of expenses.
//!
//! Totals per category, the percentage of the overall total for each category,
//! and the width of the proportional bars on the summary panel are all
//! derived here. Nothing in this module holds state.

use std::collections::BTreeSet;

use crate::{category::Category, expense::Expense};

/// The narrowest bar drawn for a category, as a percentage of the full width.
pub const MIN_BAR_WIDTH: f64 = 5.0;

/// The sum of all expense amounts, `0.0` for an empty list.
pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Sums expense amounts per category, largest sum first.
///
/// Categories with equal sums keep the order in which they first appear in
/// `expenses`.
pub fn group_by_category(expenses: &[Expense]) -> Vec<(Category, f64)> {
    let mut totals: Vec<(Category, f64)> = Vec::new();

    for expense in expenses {
        match totals
            .iter_mut()
            .find(|(category, _)| *category == expense.category)
        {
            Some((_, sum)) => *sum += expense.amount,
            None => totals.push((expense.category, expense.amount)),
        }
    }

    // `sort_by` is stable, so ties stay in first-appearance order.
    totals.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    totals
}

/// `part` as a percentage of `whole`, or `0.0` when `whole` is zero.
///
/// The result is not clamped, so a `part` larger than `whole` gives more
/// than 100.
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        100.0 * part / whole
    }
}

/// The categories present in `expenses` in ascending lexical order.
pub fn distinct_categories(expenses: &[Expense]) -> BTreeSet<Category> {
    expenses.iter().map(|expense| expense.category).collect()
}

/// The largest category sum in `summary`, `0.0` when `summary` is empty.
pub fn max_category_total(summary: &[(Category, f64)]) -> f64 {
    summary
        .iter()
        .map(|(_, sum)| *sum)
        .fold(0.0, f64::max)
}

/// The width of a category's bar relative to the largest category.
///
/// Never narrower than [MIN_BAR_WIDTH], including when `max` is zero.
pub fn bar_width(part: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return MIN_BAR_WIDTH;
    }

    percentage_of(part, max).max(MIN_BAR_WIDTH)
}

/// One row of the category summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    /// The share of the overall total, in percent.
    pub percentage: f64,
    /// The width of the bar, in percent of the available width.
    pub bar_width: f64,
}

/// Expenses summed per category, ready for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategorySummary {
    /// Categories ordered by [group_by_category].
    pub entries: Vec<CategoryTotal>,
    pub total: f64,
}

impl CategorySummary {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let total = total(expenses);
        let grouped = group_by_category(expenses);
        let max = max_category_total(&grouped);

        let entries = grouped
            .into_iter()
            .map(|(category, sum)| CategoryTotal {
                category,
                total: sum,
                percentage: percentage_of(sum, total),
                bar_width: bar_width(sum, max),
            })
            .collect();

        Self { entries, total }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
