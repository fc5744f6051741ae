//! The fetch lifecycle of the expense list.

use std::collections::BTreeSet;

use crate::{
    Error,
    aggregation::distinct_categories,
    category::{Category, CategoryFilter},
    expense::{Expense, ExpenseClient},
    store::ExpenseStore,
};

/// The message shown in place of the list when expenses could not be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Could not load your expenses. Please try again.";

/// The filter and sort order the user picked for the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSelection {
    pub category: CategoryFilter,
    /// `true` orders by the day the expense happened, `false` by when it was
    /// recorded.
    pub sort_by_date: bool,
}

impl Default for ListSelection {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            sort_by_date: true,
        }
    }
}

/// A request for expenses issued by the [ListController].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Increases by one for each request a controller issues.
    pub seq: u64,
    pub category: CategoryFilter,
    pub sort_by_date: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Loaded {
        expenses: Vec<Expense>,
        /// The distinct categories of `expenses`, used for the filter options.
        categories: BTreeSet<Category>,
    },
    Error {
        message: String,
    },
}

/// What the category summary needs to know about the list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryFeed<'a> {
    /// Empty while loading or after an error.
    pub expenses: &'a [Expense],
    pub loading: bool,
    pub error: Option<&'a str>,
}

/// Owns the fetched expenses and the selection they were fetched with.
///
/// Every change to the selection issues a new [FetchRequest]. Only the result
/// of the most recently issued request is applied, so a slow response to an
/// older request cannot overwrite a newer one.
#[derive(Debug)]
pub struct ListController {
    selection: ListSelection,
    latest_seq: u64,
    state: ListState,
}

impl ListController {
    pub fn new(selection: ListSelection) -> Self {
        Self {
            selection,
            latest_seq: 0,
            state: ListState::Loading,
        }
    }

    pub fn selection(&self) -> ListSelection {
        self.selection
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Show only expenses in `category`.
    pub fn select_category(&mut self, category: CategoryFilter) -> FetchRequest {
        self.selection.category = category;
        self.issue()
    }

    /// Switch between ordering by expense date and by creation time.
    pub fn set_sort_by_date(&mut self, sort_by_date: bool) -> FetchRequest {
        self.selection.sort_by_date = sort_by_date;
        self.issue()
    }

    /// Fetch the current selection again, e.g. after an expense was created
    /// or when the user asks to try again.
    pub fn refresh(&mut self) -> FetchRequest {
        self.issue()
    }

    fn issue(&mut self) -> FetchRequest {
        self.latest_seq += 1;
        self.state = ListState::Loading;

        FetchRequest {
            seq: self.latest_seq,
            category: self.selection.category,
            sort_by_date: self.selection.sort_by_date,
        }
    }

    /// Apply the result of `request`.
    ///
    /// Returns `false` and leaves the state untouched if a newer request has
    /// been issued since `request`.
    pub fn resolve(&mut self, request: &FetchRequest, result: Result<Vec<Expense>, Error>) -> bool {
        if request.seq != self.latest_seq {
            tracing::debug!(
                "discarding stale expense list response {} (latest is {})",
                request.seq,
                self.latest_seq
            );
            return false;
        }

        self.state = match result {
            Ok(expenses) => {
                let categories = distinct_categories(&expenses);
                ListState::Loaded {
                    expenses,
                    categories,
                }
            }
            Err(error) => {
                tracing::error!("could not load expenses: {error}");
                ListState::Error {
                    message: LOAD_FAILED_MESSAGE.to_owned(),
                }
            }
        };

        true
    }

    /// Fetch the current selection with `client` and apply the result.
    pub fn load<S: ExpenseStore>(&mut self, client: &ExpenseClient<S>) -> &ListState {
        let request = self.refresh();
        let result = client.get_expenses(request.category, request.sort_by_date);
        self.resolve(&request, result);

        &self.state
    }

    pub fn summary_feed(&self) -> SummaryFeed<'_> {
        match &self.state {
            ListState::Loading => SummaryFeed {
                expenses: &[],
                loading: true,
                error: None,
            },
            ListState::Loaded { expenses, .. } => SummaryFeed {
                expenses: expenses.as_slice(),
                loading: false,
                error: None,
            },
            ListState::Error { message } => SummaryFeed {
                expenses: &[],
                loading: false,
                error: Some(message.as_str()),
            },
        }
    }

    /// The options for the category filter: the categories in the list plus
    /// the active filter, which may have no expenses.
    pub fn filter_options(&self) -> BTreeSet<Category> {
        let mut options = match &self.state {
            ListState::Loaded { categories, .. } => categories.clone(),
            _ => BTreeSet::new(),
        };
        options.extend(self.selection.category.category());

        options
    }
}
