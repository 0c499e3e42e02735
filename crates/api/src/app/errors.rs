use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use stockline_core::StockError;
use stockline_infra::DispatchError;

use crate::app::dto::ErrorBody;

pub fn stock_error_to_response(err: StockError) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, err.code(), err.to_string())
}

pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let code = err.code().to_string();
    json_error(status, code, err.to_string())
}

/// Malformed or missing JSON bodies.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    let status = match rejection {
        JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        JsonRejection::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    json_error(status, "invalid_body", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: impl Into<String>,
    detail: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(ErrorBody {
            detail: detail.into(),
            error: code.into(),
        }),
    )
        .into_response()
}
