//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and the JSON error envelope shared
//! by every endpoint:
//!
//! ```json
//! { "success": false, "msg": "Pet not found: ..." }
//! ```
//!
//! Store failures answer 500 with a stable `error` code. The underlying
//! report is written to the log and never sent to the caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;
use vetsync_core::{errors::AppointmentError, models::appointment::ErrorResponse};

/// Error code sent in place of store failure details.
pub const STORE_FAILURE_CODE: &str = "store_failure";

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps `AppointmentError` and implements `IntoResponse` so
/// handlers can return `Result<Json<T>, AppError>` and use `?` on service
/// calls.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use uuid::Uuid;
/// use vetsync_api::middleware::error_handling::AppError;
/// use vetsync_core::errors::AppointmentError;
///
/// async fn handler(id: Uuid) -> Result<Json<()>, AppError> {
///     Err(AppError(AppointmentError::AppointmentNotFound(id)))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub AppointmentError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AppointmentError::Validation(_) => StatusCode::BAD_REQUEST,
            AppointmentError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            AppointmentError::DuplicateAppointment => StatusCode::BAD_REQUEST,
            AppointmentError::PetNotFound(_) => StatusCode::NOT_FOUND,
            AppointmentError::AppointmentNotFound(_) => StatusCode::NOT_FOUND,
            AppointmentError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = if self.0.is_store_failure() {
            error!("Unexpected store failure: {:?}", self.0);
            ErrorResponse {
                success: false,
                msg: "Unexpected error while processing the appointment".to_string(),
                error: Some(STORE_FAILURE_CODE.to_string()),
            }
        } else {
            ErrorResponse {
                success: false,
                msg: self.0.to_string(),
                error: None,
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Automatic conversion from AppointmentError to AppError
impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        AppError(err)
    }
}

/// Maps an AppointmentError to an HTTP response
pub fn map_error(err: AppointmentError) -> Response {
    AppError(err).into_response()
}
