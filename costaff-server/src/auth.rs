// costaff-server/src/auth.rs

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use costaff_common::Error;

use crate::error::ApiError;

/// Header set by the fronting identity provider after it has verified the
/// session. Tenant roles (founder, member) are resolved per handler.
pub const USER_ID_HEADER: &str = "x-costaff-user-id";

/// Authenticated principal for a request.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError(Error::Unauthorized(format!("Missing {USER_ID_HEADER} header")))
            })?;

        let user_id = Uuid::parse_str(raw).map_err(|_| {
            ApiError(Error::Unauthorized(format!("Invalid {USER_ID_HEADER} header")))
        })?;

        Ok(AuthUser(user_id))
    }
}
