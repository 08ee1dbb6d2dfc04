//! Session cookie codec.
//!
//! All session-cookie construction goes through this module so the flag
//! set stays in one place: HTTP-only (inaccessible to scripts),
//! path-scoped to the whole application, same-site-strict, and Secure
//! outside local development. The browser never reads the cookie value;
//! only the server verifies it.

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Builds the session cookie carrying a freshly minted credential.
///
/// The Secure flag is omitted only when `secure` is false, a
/// deliberate, environment-gated relaxation for plain-HTTP local
/// development.
#[must_use]
pub fn issue(credential: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, credential))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(max_age);

    if secure {
        builder = builder.secure(true);
    }

    builder.build()
}

/// Builds the clearing cookie used by logout: same flags, empty value,
/// immediate expiry.
#[must_use]
pub fn clear() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(Duration::ZERO)
        .build()
}

/// Extracts the session credential from a request's cookies.
#[must_use]
pub fn session_value(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}
