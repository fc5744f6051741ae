//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, expense::ValidationError, internal_server_error::InternalServerError,
    store::StoreFailure,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The expense form contained invalid data.
    ///
    /// These errors are caught before anything is sent to the store.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The idempotency key posted with the expense form was missing or malformed.
    #[error("the idempotency key is missing or malformed")]
    InvalidIdempotencyToken,

    /// An expense was already created with the same idempotency key.
    ///
    /// This happens when a submission reached the store but the response was
    /// lost and the user submitted the same form again.
    #[error("This expense was already submitted. Please refresh to see it.")]
    DuplicateSubmission,

    /// Any other failure reported by the store.
    ///
    /// The cause should only be logged on the server. Clients get a generic message.
    #[error("the expense store failed: {0}")]
    Store(#[source] StoreFailure),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Validation(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Invalid expense".to_owned(),
                    details: error.to_string(),
                },
            ),
            Error::InvalidIdempotencyToken => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Form expired".to_owned(),
                    details: "Refresh the page and enter the expense again.".to_owned(),
                },
            ),
            error @ Error::DuplicateSubmission => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Duplicate submission".to_owned(),
                    details: error.to_string(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Could not save expense".to_owned(),
                    details: "The expense store could not be reached. Your entry has been \
                        kept, try submitting it again."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
