use crate::errors::{ApiError, ServiceError};
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, axum::Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, axum::Json(data)).into_response()
}

/// JSON body extractor whose rejection follows the API error contract: a
/// missing or malformed body is a 400 with the usual `error` field, not
/// axum's plain-text 422.
pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                debug!(error = %rejection, "Rejected request body");
                ApiError::ValidationError("Invalid request body".to_string())
            })?;
        Ok(Json(value))
    }
}

/// Validate request input, collapsing field errors into one message
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input.validate().map_err(|errors| {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        details.sort();
        ApiError::ValidationError(details.join("; "))
    })
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct NamedInput {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
    }

    #[test]
    fn validation_errors_carry_field_names() {
        let err = validate_input(&NamedInput {
            name: String::new(),
        })
        .unwrap_err();
        match err {
            ApiError::ValidationError(msg) => assert!(msg.contains("name: name is required")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate_input(&NamedInput {
            name: "ok".to_string()
        })
        .is_ok());
    }
}
