//! Defines functions for storing the session user in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::Error;

use super::Session;

pub const COOKIE_USER: &str = "user";

/// Add the session cookie for `session` to the cookie jar.
///
/// The cookie has no expiry, so it lasts as long as the browser session.
///
/// # Errors
///
/// Returns an [Error::JSONSerializationError] if the session cannot be encoded.
pub fn set_session_cookie(
    jar: PrivateCookieJar,
    session: &Session,
) -> Result<PrivateCookieJar, Error> {
    let value = serde_json::to_string(session)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_USER, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Read the session user from the cookie jar.
///
/// # Errors
///
/// Returns an [Error::SessionMissing] if the cookie is missing or does not hold a valid session.
pub fn get_session_from_cookies(jar: &PrivateCookieJar) -> Result<Session, Error> {
    let cookie = jar.get(COOKIE_USER).ok_or(Error::SessionMissing)?;

    serde_json::from_str(cookie.value()).map_err(|error| {
        tracing::warn!("Could not decode session cookie: {error}");
        Error::SessionMissing
    })
}

/// Set the session cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_USER, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}
