//! JSON body extractor and responder

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiErrorType};

/// JSON extractor whose rejections use the API error body
///
/// Deserialization failures name the offending request field in `param`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    let status = rejection.status();

    match &rejection {
        JsonRejection::JsonDataError(err) => {
            let detail = err.body_text();
            let error = ApiError::new(
                status,
                ApiErrorType::InvalidRequestError,
                format!("Invalid request body: {}", data_error_reason(&detail)),
            );

            match offending_field(&detail) {
                Some(field) => error.with_param(field),
                None => error,
            }
        }
        JsonRejection::JsonSyntaxError(_) => ApiError::new(
            status,
            ApiErrorType::InvalidRequestError,
            "Request body is not valid JSON",
        ),
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            status,
            ApiErrorType::InvalidRequestError,
            "Expected 'Content-Type: application/json'",
        ),
        _ => ApiError::new(status, ApiErrorType::InvalidRequestError, rejection.body_text()),
    }
}

/// Strip axum's fixed prefix from a data error
fn data_error_reason(detail: &str) -> &str {
    detail
        .split_once("target type: ")
        .map_or(detail, |(_, reason)| reason)
}

/// Request field a data error refers to, e.g. `password` or `blogname`
fn offending_field(detail: &str) -> Option<String> {
    if let Some((_, rest)) = detail.split_once("missing field `") {
        return rest.split_once('`').map(|(field, _)| field.to_string());
    }

    let (path, _) = data_error_reason(detail).split_once(": ")?;
    let is_path = path.chars().any(|c| c.is_ascii_alphabetic())
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');

    is_path.then(|| path.to_string())
}
