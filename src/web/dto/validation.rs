//! Validation utilities for request DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// Deserializes the body as JSON, then runs the `validator` rules. Malformed
/// JSON and failed rules both become 400 responses, the latter with
/// field-level details.
///
/// # Example
///
/// ```ignore
/// use filehub::web::dto::ValidatedJson;
///
/// async fn register(
///     ValidatedJson(req): ValidatedJson<RegisterRequest>,
/// ) -> Result<StatusCode, ApiError> {
///     // req is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::error::ErrorCode;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "Too short"))]
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let ValidatedJson(sample) =
            ValidatedJson::<Sample>::from_request(json_request(r#"{"name":"abc"}"#), &())
                .await
                .unwrap();
        assert_eq!(sample.name, "abc");
    }

    #[tokio::test]
    async fn test_invalid_body_rule() {
        let err = ValidatedJson::<Sample>::from_request(json_request(r#"{"name":"a"}"#), &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let err = ValidatedJson::<Sample>::from_request(json_request("{not json"), &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }
}
