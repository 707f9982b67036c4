//! Service-role caller check for privileged function routes.

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

use crate::error::AccountServiceError;
use crate::state::AppState;

/// Proof that the caller presented the service-role key.
///
/// The key only has to appear somewhere in `Authorization`, so both a bare
/// key and `Bearer <key>` pass. An unset key rejects everyone.
#[derive(Debug, Clone, Copy)]
pub struct ServiceRole;

fn is_authorized(header: Option<&str>, key: &str) -> bool {
    !key.is_empty() && header.is_some_and(|h| h.contains(key))
}

impl FromRequestParts<AppState> for ServiceRole {
    type Rejection = AccountServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let authorized = is_authorized(header, &state.service_role_key);

        async move {
            if authorized {
                Ok(Self)
            } else {
                Err(AccountServiceError::Unauthorized)
            }
        }
    }
}
