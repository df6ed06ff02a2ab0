//! Session-token parsing at the API boundary.
//!
//! The browser frontend carries the signed-in user as a `user` cookie
//! holding a small JSON object (`{"id": 7, "name": "Dana"}`).  That
//! encoding stops here: handlers get an [`AuthContext`] and everything
//! below the API layer is transport-agnostic.  An absent or unparseable
//! cookie is never a hard failure — the request proceeds as the
//! anonymous default identity.

use axum::http::HeaderMap;
use serde::Deserialize;

use sp_domain::entity::AuthContext;

#[derive(Deserialize)]
struct UserCookie {
    id: i64,
    #[serde(default)]
    name: Option<String>,
}

/// Resolve the request identity from the `Cookie` header.
pub fn auth_from_headers(headers: &HeaderMap) -> AuthContext {
    let Some(raw) = cookie_value(headers, "user") else {
        return AuthContext::default();
    };

    match serde_json::from_str::<UserCookie>(&raw) {
        Ok(user) => AuthContext {
            user_id: user.id,
            user_name: user.name.unwrap_or_else(|| "User".into()),
        },
        Err(e) => {
            tracing::debug!(error = %e, "user cookie unparseable, using anonymous identity");
            AuthContext::default()
        }
    }
}

/// Find a cookie by name across all `Cookie` headers.
///
/// Values may arrive percent-encoded (browsers encode the JSON braces);
/// the common escapes are decoded before JSON parsing.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(axum::http::header::COOKIE) {
        let Ok(text) = header.to_str() else { continue };
        for pair in text.split(';') {
            let pair = pair.trim();
            if let Some(value) = pair.strip_prefix(name) {
                if let Some(value) = value.strip_prefix('=') {
                    return Some(percent_decode(value));
                }
            }
        }
    }
    None
}

fn percent_decode(value: &str) -> String {
    // Cookie header values are ASCII (HeaderValue::to_str guarantees it),
    // so byte-indexed slicing is safe here.
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&value[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
