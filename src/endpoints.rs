//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/v1/users/{user_id}', use [format_endpoint].

/// The root route which responds with a welcome message.
pub const ROOT: &str = "/";
/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/v1/coffee";

/// The route to sign up and list users.
pub const USERS: &str = "/api/v1/users";
/// The route to access a single user.
pub const USER: &str = "/api/v1/users/{user_id}";
/// The route for the profile of the user that sent the request.
pub const CURRENT_USER: &str = "/api/v1/users/me";
/// The route for exchanging an email and password for a bearer token.
pub const TOKEN: &str = "/api/v1/users/token";

/// The route to create and list accounts.
pub const ACCOUNTS: &str = "/api/v1/accounts";
/// The route to access a single account.
pub const ACCOUNT: &str = "/api/v1/accounts/{account_id}";

/// The route to create and list cards.
pub const CARDS: &str = "/api/v1/cards";
/// The route to access a single card.
pub const CARD: &str = "/api/v1/cards/{card_id}";

/// The route to create and list categories.
pub const CATEGORIES: &str = "/api/v1/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/v1/categories/{category_id}";

/// The route to create and list expenses.
pub const EXPENSES: &str = "/api/v1/expenses";
/// The route to access a single expense.
pub const EXPENSE: &str = "/api/v1/expenses/{expense_id}";
/// The route for the summary of the user's expenses.
pub const EXPENSE_SUMMARY: &str = "/api/v1/expenses/summary";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
