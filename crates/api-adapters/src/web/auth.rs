//! Bearer-token authentication as an extractor. Adding [`Authenticated`] to a
//! handler's arguments is what makes a route protected.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domains::{Capability, Identity};

use crate::web::error::ApiError;
use crate::web::state::AppState;

#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

/// The token from `Authorization: Bearer <token>`, if the header has that shape.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = state
            .auth
            .authenticate(bearer_token(parts))
            .await
            .inspect_err(|e| tracing::warn!(path = %parts.uri.path(), reason = %e, "request not authenticated"))?;
        identity.require(Capability::Authenticated)?;
        Ok(Self(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/applications");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn extracts_bearer_tokens_only() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts(Some("Basic dXNlcjpwYXNz"))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }
}
