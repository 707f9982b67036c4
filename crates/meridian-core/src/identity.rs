//! Gateway-injected identity header extractor.

use axum::extract::FromRequestParts;
use http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated user id, set by the gateway after it has
/// validated the session.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller identity.
///
/// Rejects with 401 if `x-user-id` is absent or not a UUID.
#[derive(Debug, Clone, Copy)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // Header values are read synchronously so the returned future stays 'static.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        async move {
            let user_id = user_id.ok_or(AppError::Unauthorized)?;
            Ok(Self { user_id })
        }
    }
}
