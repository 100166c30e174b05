//! Token extraction and verification middleware
//!
//! Legacy clients send the bearer token in one of three places, checked in
//! this order: body field `access_token`, query parameter `access_token`,
//! `Authorization` header (with or without a `Bearer ` prefix). Extraction
//! runs for every request so the public session endpoints can see the
//! candidate too; verification runs only on protected routes.

use std::convert::Infallible;

use axum::body::{self, Body};
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_LENGTH};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use munch_auth_core::AuthError;
use munch_types::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Body field and query parameter legacy clients put the token in
pub const ACCESS_TOKEN_FIELD: &str = "access_token";

/// Bodies are buffered to probe for `access_token`; a request declaring
/// more than this many bytes is passed through unprobed.
const MAX_PROBED_BODY_BYTES: usize = 64 * 1024;

/// The token candidate found on the request, if any
#[derive(Debug, Clone, Default)]
pub struct TokenCandidate(pub Option<String>);

/// The verified user attached to the request by [`require_auth`]
#[derive(Debug, Clone)]
pub struct Principal(pub User);

/// Find the token candidate and stash it in the request extensions.
///
/// The body is buffered and restored so downstream JSON extractors still
/// see it; requests without a parseable JSON body just skip that source.
pub async fn attach_token(request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    let (candidate, body) = extract_candidate(&parts, body).await;
    parts.extensions.insert(TokenCandidate(candidate));
    next.run(Request::from_parts(parts, body)).await
}

/// Verify the candidate and attach the resolved user, or answer 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let candidate = request
        .extensions()
        .get::<TokenCandidate>()
        .cloned()
        .unwrap_or_default();

    match state.auth.verify(candidate.0.as_deref()).await {
        Ok(user) => {
            request.extensions_mut().insert(Principal(user));
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn extract_candidate(parts: &Parts, body: Body) -> (Option<String>, Body) {
    let (body_token, body) = probe_body(parts, body).await;
    let candidate = body_token
        .or_else(|| query_token(parts))
        .or_else(|| header_token(parts));
    (candidate, body)
}

/// Buffer a small declared body, pull `access_token` out of it if it is a
/// JSON object, and hand the bytes back as a fresh body.
async fn probe_body(parts: &Parts, body: Body) -> (Option<String>, Body) {
    let declared = parts
        .headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if !declared.is_some_and(|length| length > 0 && length <= MAX_PROBED_BODY_BYTES) {
        return (None, body);
    }

    match body::to_bytes(body, MAX_PROBED_BODY_BYTES).await {
        Ok(bytes) => {
            let token = serde_json::from_slice::<serde_json::Value>(&bytes)
                .ok()
                .and_then(|value| {
                    value
                        .get(ACCESS_TOKEN_FIELD)
                        .and_then(|token| token.as_str())
                        .filter(|token| !token.is_empty())
                        .map(str::to_string)
                });
            (token, Body::from(bytes))
        }
        Err(_) => (None, Body::empty()),
    }
}

fn query_token(parts: &Parts) -> Option<String> {
    parts.uri.query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == ACCESS_TOKEN_FIELD && !value.is_empty()).then(|| value.to_string())
    })
}

fn header_token(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw);
    (!token.is_empty()).then(|| token.to_string())
}

impl<S: Send + Sync> FromRequestParts<S> for TokenCandidate {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<TokenCandidate>()
            .cloned()
            .unwrap_or_default())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(ApiError::Auth(AuthError::TokenMissing))
    }
}
