//! Upstream identity extractor
//!
//! Authentication is not this service's job: an upstream identity layer
//! resolves the session and forwards the principal as an `X-User-Id`
//! header. Handlers take [`CurrentUser`] to require it; requests without a
//! resolved identity are rejected before any business logic runs.

use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::utils::AppError;

/// Header carrying the resolved principal id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated principal for this request (buyer or seller)
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i64,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or(AppError::Unauthorized)?;
        Ok(CurrentUser { id })
    }
}
