use crate::models::ErrorBody;
use crate::store::StoreError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, detail: impl ToString) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            detail: Some(detail.to_string()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            detail: None,
        }
    }

    /// Maps a store failure, using `invalid` as the message for bad input.
    pub fn from_store(err: StoreError, invalid: &str) -> Self {
        match err {
            StoreError::AttendanceNotFound(_) => Self::not_found("Attendance record not found"),
            StoreError::QuarterSettingsNotFound(_) => Self::not_found("Quarter settings not found"),
            StoreError::AppSettingsNotFound => Self::not_found("App settings not found"),
            other => Self::bad_request(invalid, other),
        }
    }

    pub fn from_rejection(rejection: JsonRejection, invalid: &str) -> Self {
        Self::bad_request(invalid, rejection.body_text())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            message: self.message,
            error: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quarter::LabelError;
    use chrono::NaiveDate;

    #[test]
    fn store_errors_map_to_statuses() {
        let missing = StoreError::AttendanceNotFound(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        let err = AppError::from_store(missing, "Invalid attendance data");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.detail.is_none());

        let invalid = StoreError::Label(LabelError::Quarter("Q7-2025".into()));
        let err = AppError::from_store(invalid, "Invalid quarter settings");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid quarter settings");
        assert!(err.detail.unwrap().contains("Q7-2025"));
    }
}
