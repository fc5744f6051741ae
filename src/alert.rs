//! Alert system for displaying success and error messages to users.
//!
//! Alerts are swapped into the `#alert-container` element of the page layout,
//! either as the target of a failed htmx request or out-of-band alongside a
//! successful response. `static/app.js` removes each alert once its
//! `data-dismiss-after` time has passed.

use std::time::Duration;

use maud::{Markup, html};

use crate::controller::{FAILURE_DISPLAY, SUCCESS_DISPLAY};

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Success { message: String, details: String },
    Error { message: String, details: String },
}

impl Alert {
    fn dismiss_after(&self) -> Duration {
        match self {
            Alert::Success { .. } => SUCCESS_DISPLAY,
            Alert::Error { .. } => FAILURE_DISPLAY,
        }
    }

    pub fn into_html(self) -> Markup {
        let dismiss_after = self.dismiss_after().as_millis().to_string();

        let (style, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_STYLE, message, details),
            Alert::Error { message, details } => (ERROR_STYLE, message, details),
        };

        html! {
            div
                role="alert"
                data-dismiss-after=(dismiss_after)
                class={ "flex items-start gap-3 p-4 mb-4 rounded-lg shadow " (style) }
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (message) }

                    @if !details.is_empty() {
                        p class="text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    data-dismiss-alert
                    aria-label="Dismiss"
                    class="text-lg leading-none opacity-70 hover:opacity-100"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert so that htmx swaps it into the alert container
    /// regardless of the request's target.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id="alert-container" hx-swap-oob="innerHTML" { (self.into_html()) }
        }
    }
}

const SUCCESS_STYLE: &str = "text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400";
const ERROR_STYLE: &str = "text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400";
