//! Auth header helpers for HTTP tests.
//!
//! End-user routes receive `x-user-id` from the gateway; privileged routes
//! expect the service-role key in `Authorization`. These helpers build both so
//! tests need no real gateway.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header::AUTHORIZATION};
use uuid::Uuid;

use meridian_core::identity::USER_ID_HEADER;

/// Identity injected into test requests as if by the gateway.
pub struct MockAuth {
    pub user_id: Uuid,
}

impl MockAuth {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    pub fn header(&self) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        )
    }

    pub fn headers(&self) -> HeaderMap {
        let (name, value) = self.header();
        let mut map = HeaderMap::new();
        map.insert(name, value);
        map
    }
}

/// `Authorization: Bearer <key>` header for service-role callers.
pub fn service_role_header(key: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {key}")).unwrap(),
    )
}
