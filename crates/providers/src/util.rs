//! Shared helpers for provider adapters.

use sp_domain::error::{Error, Result};

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Http`].
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

/// Read the API key from the configured environment variable.
pub(crate) fn resolve_api_key(env_var: &str) -> Result<String> {
    std::env::var(env_var).map_err(|_| {
        Error::Auth(format!(
            "environment variable '{env_var}' not set or not valid UTF-8"
        ))
    })
}
