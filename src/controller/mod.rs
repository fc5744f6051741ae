//! State machines for the expense form and the expense list.
//!
//! The controllers hold no store handles of their own. They are given an
//! [crate::expense::ExpenseClient] when they need to talk to the store.

mod form;
mod list;

pub use form::{
    FAILURE_DISPLAY, FormController, FormState, PendingSubmission, SUCCESS_DISPLAY, SubmitOutcome,
};
pub use list::{
    FetchRequest, LOAD_FAILED_MESSAGE, ListController, ListSelection, ListState, SummaryFeed,
};
