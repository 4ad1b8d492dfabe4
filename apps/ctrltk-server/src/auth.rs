//! The authentication gate. Every `/api` handler takes [`Authenticated`] as
//! an argument, which routes the request through here exactly once: header
//! parse, scheme check, base64 decode, credential lookup, secret compare,
//! then the method-based tier check. Every failure, whatever the stage,
//! collapses to the same 401 plus challenge header.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, Method};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ctrltk_core::{CredentialStore, Identity, Tier};
use tracing::debug;

use crate::routes::ApiError;
use crate::state::AppState;

/// Challenge returned with every 401 so browsers prompt for credentials.
pub const CHALLENGE: &str = "Basic realm=\"ctrltk\"";

/// Internal reasons an attempt fails. The distinction never reaches the
/// wire; it only feeds logs.
#[derive(Debug, PartialEq, Eq)]
enum AuthFailure {
    Missing,
    Malformed,
    InvalidCredential,
    InsufficientTier,
}

impl AuthFailure {
    fn log_label(&self) -> &'static str {
        match self {
            AuthFailure::Missing => "missing_header",
            AuthFailure::Malformed => "malformed_header",
            AuthFailure::InvalidCredential => "invalid_credential",
            AuthFailure::InsufficientTier => "insufficient_tier",
        }
    }
}

/// Authenticated caller attached to a request by the gate. Lives only for
/// the request that produced it.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state.credentials()) {
            Ok(identity) => Ok(Authenticated(identity)),
            Err(failure) => {
                debug!(reason = failure.log_label(), "rejected request credentials");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

fn authenticate(parts: &Parts, credentials: &CredentialStore) -> Result<Identity, AuthFailure> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthFailure::Missing)?;
    let encoded = header
        .strip_prefix("Basic ")
        .ok_or(AuthFailure::Malformed)?;
    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| AuthFailure::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthFailure::Malformed)?;

    // Only the first ':' separates username from secret; the secret may
    // contain ':' itself, and a payload without one means an empty secret.
    let (username, secret) = match decoded.split_once(':') {
        Some((username, secret)) => (username, secret),
        None => (decoded.as_str(), ""),
    };
    if username.is_empty() {
        return Err(AuthFailure::Malformed);
    }

    let identity = credentials
        .verify(username, secret)
        .ok_or(AuthFailure::InvalidCredential)?;

    if !identity.tier.satisfies(required_tier(&parts.method)) {
        return Err(AuthFailure::InsufficientTier);
    }
    Ok(identity)
}

/// Read-only verbs need the floor tier; anything that mutates host state
/// needs at least write.
fn required_tier(method: &Method) -> Tier {
    if *method == Method::GET || *method == Method::HEAD {
        Tier::Read
    } else {
        Tier::Write
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn store() -> CredentialStore {
        CredentialStore::from_users(vec![
            ("reader".into(), "r".into(), Tier::Read),
            ("writer".into(), "w:w".into(), Tier::Write),
            ("root".into(), "".into(), Tier::Admin),
        ])
        .unwrap()
    }

    fn parts(method: Method, auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().method(method).uri("/api/info");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn basic(payload: &str) -> String {
        format!("Basic {}", STANDARD.encode(payload))
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = authenticate(&parts(Method::GET, None), &store()).unwrap_err();
        assert_eq!(err, AuthFailure::Missing);
    }

    #[test]
    fn non_basic_scheme_is_rejected() {
        let err =
            authenticate(&parts(Method::GET, Some("Bearer abc")), &store()).unwrap_err();
        assert_eq!(err, AuthFailure::Malformed);
    }

    #[test]
    fn garbled_base64_is_rejected() {
        let err =
            authenticate(&parts(Method::GET, Some("Basic %%%")), &store()).unwrap_err();
        assert_eq!(err, AuthFailure::Malformed);
    }

    #[test]
    fn empty_username_is_rejected() {
        let err = authenticate(&parts(Method::GET, Some(&basic(":secret"))), &store())
            .unwrap_err();
        assert_eq!(err, AuthFailure::Malformed);
    }

    #[test]
    fn only_the_first_colon_splits() {
        let identity =
            authenticate(&parts(Method::GET, Some(&basic("writer:w:w"))), &store()).unwrap();
        assert_eq!(identity.username, "writer");
        assert_eq!(identity.tier, Tier::Write);
    }

    #[test]
    fn payload_without_colon_means_empty_secret() {
        let identity =
            authenticate(&parts(Method::GET, Some(&basic("root"))), &store()).unwrap();
        assert_eq!(identity.username, "root");
        assert_eq!(identity.tier, Tier::Admin);
    }

    #[test]
    fn unknown_user_and_wrong_secret_fail_alike() {
        let store = store();
        let unknown = authenticate(&parts(Method::GET, Some(&basic("ghost:r"))), &store);
        let wrong = authenticate(&parts(Method::GET, Some(&basic("reader:x"))), &store);
        assert_eq!(unknown.unwrap_err(), AuthFailure::InvalidCredential);
        assert_eq!(wrong.unwrap_err(), AuthFailure::InvalidCredential);
    }

    #[test]
    fn mutating_methods_need_write() {
        let store = store();
        let read_get = authenticate(&parts(Method::GET, Some(&basic("reader:r"))), &store);
        assert!(read_get.is_ok());

        let read_post = authenticate(&parts(Method::POST, Some(&basic("reader:r"))), &store);
        assert_eq!(read_post.unwrap_err(), AuthFailure::InsufficientTier);

        let write_post =
            authenticate(&parts(Method::POST, Some(&basic("writer:w:w"))), &store);
        assert!(write_post.is_ok());

        let admin_post = authenticate(&parts(Method::POST, Some(&basic("root"))), &store);
        assert!(admin_post.is_ok());
    }
}
