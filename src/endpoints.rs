//! The URIs of the pages and API endpoints.

/// The expense page with the form, list and summary.
pub const ROOT: &str = "/";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create expenses (POST) and fetch the expense list (GET).
pub const EXPENSES_API: &str = "/api/expenses";
