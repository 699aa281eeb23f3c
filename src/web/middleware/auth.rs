//! Bearer token authentication.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{AuthenticatedUser, TokenService};
use crate::web::error::ApiError;

/// Extractor for authenticated users.
///
/// Reads `Authorization: Bearer <token>`, falling back to a `token` query
/// parameter so download links can be followed directly. Handlers that take
/// this extractor never run for unauthenticated requests.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| query_token(parts))
            .ok_or_else(|| ApiError::unauthorized("Missing authorization"))?;

        // Set by `jwt_auth`.
        let tokens = parts
            .extensions
            .get::<Arc<TokenService>>()
            .ok_or_else(|| ApiError::internal("Token service not configured"))?;

        let user = tokens.verify(&token).map_err(|e| {
            tracing::debug!("Token validation failed: {}", e);
            ApiError::unauthorized("Invalid or expired token")
        })?;

        Ok(AuthUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn query_token(parts: &Parts) -> Option<String> {
    parts.uri.query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == "token" {
            urlencoding::decode(value).ok().map(|s| s.into_owned())
        } else {
            None
        }
    })
}

/// Middleware function to inject the token service into request extensions.
pub async fn jwt_auth(
    tokens: Arc<TokenService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(tokens);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    const SECRET: &str = "test-secret";

    fn parts_for(uri: &str, auth: Option<&str>, tokens: Option<Arc<TokenService>>) -> Parts {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        if let Some(tokens) = tokens {
            parts.extensions.insert(tokens);
        }
        parts
    }

    #[tokio::test]
    async fn test_valid_bearer_token() {
        let tokens = Arc::new(TokenService::new(SECRET, 1));
        let token = tokens.issue(5).unwrap();
        let mut parts = parts_for("/api/v1/files", Some(&format!("Bearer {token}")), Some(tokens));

        let AuthUser(user) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.user_id, 5);
    }

    #[tokio::test]
    async fn test_query_token_fallback() {
        let tokens = Arc::new(TokenService::new(SECRET, 1));
        let token = tokens.issue(9).unwrap();
        let uri = format!("/api/v1/files/1/download?token={}", urlencoding::encode(&token));
        let mut parts = parts_for(&uri, None, Some(tokens));

        let AuthUser(user) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.user_id, 9);
    }

    #[tokio::test]
    async fn test_missing_token() {
        let tokens = Arc::new(TokenService::new(SECRET, 1));
        let mut parts = parts_for("/api/v1/files", None, Some(tokens));

        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.code(), crate::web::error::ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_wrong_scheme() {
        let tokens = Arc::new(TokenService::new(SECRET, 1));
        let token = tokens.issue(5).unwrap();
        let mut parts = parts_for("/api/v1/files", Some(&format!("Basic {token}")), Some(tokens));

        assert!(AuthUser::from_request_parts(&mut parts, &()).await.is_err());
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret() {
        let token = TokenService::new("other-secret", 1).issue(5).unwrap();
        let tokens = Arc::new(TokenService::new(SECRET, 1));
        let mut parts = parts_for("/api/v1/files", Some(&format!("Bearer {token}")), Some(tokens));

        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.code(), crate::web::error::ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_missing_token_service() {
        let token = TokenService::new(SECRET, 1).issue(5).unwrap();
        let mut parts = parts_for("/api/v1/files", Some(&format!("Bearer {token}")), None);

        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.code(), crate::web::error::ErrorCode::InternalError);
    }
}
