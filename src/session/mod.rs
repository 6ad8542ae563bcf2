//! The signed-in user's session.
//!
//! The session user is kept JSON-encoded in the private cookie `user` for the
//! lifetime of the browser session. [session_guard] reads it and passes it to
//! route handlers as an `Extension<Session>`, so controllers never read the
//! cookie jar themselves.

mod cookie;
mod log_in;
mod middleware;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use serde::{Deserialize, Serialize};

use crate::AppState;

pub use cookie::{COOKIE_USER, get_session_from_cookies, invalidate_session_cookie, set_session_cookie};
pub use log_in::{get_log_in_page, get_log_out, post_log_in};
pub use middleware::{session_guard, session_guard_hx};

/// The kind of user that is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    /// An employee who submits their own bills.
    Employee,
    /// An administrator who reviews the bills of every employee.
    Admin,
}

/// The user the current request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Whether the user is an employee or an administrator.
    #[serde(rename = "type")]
    pub user_type: UserType,
    /// The user's email, used to scope bill queries and to sign new bills.
    pub email: String,
}

impl Session {
    /// Create a session for the employee with `email`.
    pub fn employee(email: &str) -> Self {
        Self {
            user_type: UserType::Employee,
            email: email.to_owned(),
        }
    }
}

/// The state needed to read and write the session cookie.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
}

impl FromRef<AppState> for SessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SessionState> for Key {
    fn from_ref(state: &SessionState) -> Self {
        state.cookie_key.clone()
    }
}
