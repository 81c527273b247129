//! Session login
//!
//! The service issues its session token as a cookie on the response to a
//! form-encoded login. Later requests send it back as
//! `Cookie: AUTHORIZATION_BEARER=<token>`.

use std::fmt;
use std::time::Instant;

use blackduck_resource_core::metrics as m;
use blackduck_resource_core::types::Source;
use reqwest::header::SET_COOKIE;
use tracing::debug;

use crate::error::HubClientError;

/// Cookie name carrying the session token.
pub const TOKEN_PREFIX: &str = "AUTHORIZATION_BEARER=";

/// Opaque session token. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Value of the `Cookie` header for authenticated requests.
    pub fn cookie(&self) -> String {
        format!("{TOKEN_PREFIX}{}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Logs in with the source's username and password.
///
/// Posts `j_username` / `j_password` to `{url}/j_spring_security_check`.
/// The client must not follow redirects: a 3xx answer is a rejected login.
///
/// # Errors
///
/// - `AuthenticationFailed` for a status of 300 or above
/// - `TokenNotFound` when no `Set-Cookie` carries the token
/// - `Network` on transport failure
/// - `Config` when the source has no username/password or a bad URL
pub async fn authenticate(
    http: &reqwest::Client,
    source: &Source,
) -> Result<SessionToken, HubClientError> {
    let (username, password) = source.session_credentials()?;
    let url = source.login_url()?;

    let started = Instant::now();
    let response = http
        .post(url)
        .form(&[("j_username", username), ("j_password", password)])
        .send()
        .await;
    metrics::histogram!(m::HUB_REQUEST_DURATION_SECONDS, m::LABEL_STAGE => "login")
        .record(started.elapsed().as_secs_f64());

    let response = response.map_err(|e| {
        record("failure");
        HubClientError::Network(e)
    })?;

    let status = response.status().as_u16();
    if status >= 300 {
        record("failure");
        debug!(status, "login rejected");
        return Err(HubClientError::AuthenticationFailed { status });
    }

    let cookies = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok());
    match extract_token(cookies) {
        Some(token) => {
            record("success");
            Ok(SessionToken(token))
        }
        None => {
            record("failure");
            Err(HubClientError::TokenNotFound)
        }
    }
}

/// Finds the token in a set of `Set-Cookie` header values.
///
/// Each value is split on `;` and trimmed; the first segment starting with
/// `AUTHORIZATION_BEARER=` yields everything after the prefix.
pub fn extract_token<'a>(cookies: impl IntoIterator<Item = &'a str>) -> Option<String> {
    cookies
        .into_iter()
        .flat_map(|cookie| cookie.split(';'))
        .map(str::trim)
        .find_map(|segment| segment.strip_prefix(TOKEN_PREFIX))
        .map(str::to_owned)
}

fn record(result: &'static str) {
    metrics::counter!(
        m::HUB_REQUESTS_TOTAL,
        m::LABEL_STAGE => "login",
        m::LABEL_RESULT => result
    )
    .increment(1);
}
