//! The submission lifecycle of the expense form.

use std::time::{Duration, Instant};

use time::Date;

use crate::{
    Error,
    expense::{Expense, ExpenseClient, ExpenseDraft, IdempotencyToken, NewExpense},
    store::ExpenseStore,
};

/// How long the success message is shown before the form returns to idle.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

/// How long an error message is shown before the form returns to idle.
pub const FAILURE_DISPLAY: Duration = Duration::from_secs(5);

/// Where the form is in its submission lifecycle.
///
/// `Success` and `Failed` carry the instant at which they expire and the form
/// returns to `Idle`, see [FormController::poll].
#[derive(Debug)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Success { dismiss_at: Instant },
    Failed { error: Error, dismiss_at: Instant },
}

/// A validated submission waiting for the store's answer.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub input: NewExpense,
    pub idempotency_key: IdempotencyToken,
}

/// What a finished submission means for the rest of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The expense was stored. The expense list should be fetched again.
    Created(Expense),
    /// The submission failed and the draft was kept for another attempt.
    Failed,
    /// A submission was already in flight, nothing happened.
    Ignored,
}

/// Owns the expense draft, the idempotency token and the submission state.
///
/// The token only changes after a successful submission. Retrying a failed
/// submission therefore reuses the token, so a retry of a request that did
/// reach the store is reported as a duplicate instead of being stored twice.
#[derive(Debug)]
pub struct FormController {
    draft: ExpenseDraft,
    idempotency_key: IdempotencyToken,
    state: FormState,
}

impl FormController {
    /// A blank form with a fresh idempotency token.
    pub fn new(today: Date) -> Self {
        Self::resume(ExpenseDraft::new(today), IdempotencyToken::generate())
    }

    /// A form that continues with an existing draft and token, e.g. one that
    /// was posted by the browser.
    pub fn resume(draft: ExpenseDraft, idempotency_key: IdempotencyToken) -> Self {
        Self {
            draft,
            idempotency_key,
            state: FormState::Idle,
        }
    }

    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    /// Edit the draft. Has no effect while a submission is in flight.
    pub fn draft_mut(&mut self) -> Option<&mut ExpenseDraft> {
        match self.state {
            FormState::Submitting => None,
            _ => Some(&mut self.draft),
        }
    }

    pub fn idempotency_key(&self) -> &IdempotencyToken {
        &self.idempotency_key
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Consume the controller, e.g. to take the error out of a failed submission.
    pub fn into_state(self) -> FormState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, FormState::Submitting)
    }

    /// Validate the draft and, if it is valid, move to `Submitting`.
    ///
    /// Returns the submission to send to the store, or `None` if the draft is
    /// invalid or a submission is already in flight. An invalid draft moves
    /// the form to `Failed` with the validation error.
    pub fn begin_submit(&mut self, today: Date, now: Instant) -> Option<PendingSubmission> {
        if self.is_submitting() {
            tracing::debug!("ignoring submit while a submission is in flight");
            return None;
        }

        self.state = FormState::Validating;

        match self.draft.validate(today) {
            Ok(input) => {
                self.state = FormState::Submitting;

                Some(PendingSubmission {
                    input,
                    idempotency_key: self.idempotency_key.clone(),
                })
            }
            Err(error) => {
                tracing::debug!("expense draft failed validation: {error}");
                self.state = FormState::Failed {
                    error: error.into(),
                    dismiss_at: now + FAILURE_DISPLAY,
                };

                None
            }
        }
    }

    /// Apply the store's answer to the submission started by [Self::begin_submit].
    ///
    /// On success the draft is reset, a new token is issued, and the caller
    /// is told to refresh the expense list. On failure the draft and token
    /// are kept.
    pub fn complete_submit(
        &mut self,
        result: Result<Expense, Error>,
        today: Date,
        now: Instant,
    ) -> SubmitOutcome {
        if !self.is_submitting() {
            tracing::warn!("received a submission result while not submitting");
            return SubmitOutcome::Ignored;
        }

        match result {
            Ok(expense) => {
                self.draft = ExpenseDraft::new(today);
                self.idempotency_key = IdempotencyToken::generate();
                self.state = FormState::Success {
                    dismiss_at: now + SUCCESS_DISPLAY,
                };

                SubmitOutcome::Created(expense)
            }
            Err(error) => {
                self.state = FormState::Failed {
                    error,
                    dismiss_at: now + FAILURE_DISPLAY,
                };

                SubmitOutcome::Failed
            }
        }
    }

    /// Validate the draft and create the expense with `client`.
    ///
    /// The store is not called if the draft is invalid.
    pub fn submit<S: ExpenseStore>(
        &mut self,
        client: &ExpenseClient<S>,
        today: Date,
        now: Instant,
    ) -> SubmitOutcome {
        if self.is_submitting() {
            return SubmitOutcome::Ignored;
        }

        let Some(pending) = self.begin_submit(today, now) else {
            return SubmitOutcome::Failed;
        };

        let result = client.create_expense(&pending.input, &pending.idempotency_key);

        self.complete_submit(result, today, now)
    }

    /// Return to `Idle` if the current message has been shown long enough.
    pub fn poll(&mut self, now: Instant) -> &FormState {
        let expired = match &self.state {
            FormState::Success { dismiss_at } | FormState::Failed { dismiss_at, .. } => {
                now >= *dismiss_at
            }
            _ => false,
        };

        if expired {
            self.state = FormState::Idle;
        }

        &self.state
    }
}
