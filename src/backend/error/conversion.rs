/**
 * Error Conversion
 *
 * Every failed request is answered with the same envelope as a successful
 * one, with `success: false`:
 *
 * ```json
 * { "success": false, "message": "Chat session not found.", "data": null, "errors": [] }
 * ```
 */

use crate::backend::error::types::BackendError;
use crate::shared::BaseResponse;
use axum::{
    response::{IntoResponse, Response},
    Json,
};

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("[Server] {} {}", status.as_u16(), message);
        } else {
            tracing::debug!("[Server] {} {}", status.as_u16(), message);
        }

        (status, Json(BaseResponse::<()>::failure(message))).into_response()
    }
}
