/**
 * Authentication Middleware
 *
 * Protects the chat HTTP routes. Extracts and verifies the JWT from the
 * Authorization header and hands the user id to handlers through request
 * extensions.
 */

use crate::backend::auth::{bearer_token, AuthError, JwtKeys};
use crate::backend::error::BackendError;
use crate::shared::UserId;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Authenticated user data extracted from JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Authentication middleware
///
/// Returns 401 with the failure envelope if the token is missing or invalid.
pub async fn auth_middleware(
    State(keys): State<JwtKeys>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate_request(&keys, &request) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!("[Server] Rejected {} {}: {}", request.method(), request.uri().path(), e);
            BackendError::from(e).into_response()
        }
    }
}

fn authenticate_request(keys: &JwtKeys, request: &Request) -> Result<AuthenticatedUser, AuthError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AuthError::MissingToken)?;

    let claims = keys.verify(token)?;
    Ok(AuthenticatedUser {
        user_id: claims.user_id()?,
        email: claims.email,
    })
}

/// Axum extractor for the user set by [`auth_middleware`]
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("[Server] AuthenticatedUser not found in request extensions");
                BackendError::from(AuthError::MissingToken)
            })?;

        Ok(AuthUser(user))
    }
}
