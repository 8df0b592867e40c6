use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::LakukelasError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 存储层错误 → HTTP 响应
    ///
    /// `fallback` 是数据库等未分类错误使用的业务码。
    pub fn from_error(err: &LakukelasError, fallback: ErrorCode) -> HttpResponse {
        let (status, code) = error_status(err, fallback);
        HttpResponse::build(status).json(Self::error_empty(code, err.message()))
    }
}

fn error_status(err: &LakukelasError, fallback: ErrorCode) -> (StatusCode, ErrorCode) {
    match err {
        LakukelasError::Validation(_) | LakukelasError::DateParse(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::BadRequest)
        }
        LakukelasError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        LakukelasError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
        LakukelasError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
        LakukelasError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        LakukelasError::Gateway(_) => (StatusCode::BAD_GATEWAY, ErrorCode::PaymentGatewayError),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let (status, code) = error_status(
            &LakukelasError::conflict("dup"),
            ErrorCode::InternalServerError,
        );
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, ErrorCode::Conflict);

        let (status, code) = error_status(
            &LakukelasError::database_operation("boom"),
            ErrorCode::ExportFailed,
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, ErrorCode::ExportFailed);
    }

    #[test]
    fn test_success_envelope() {
        let resp = ApiResponse::success(5i32, "ok");
        assert_eq!(resp.code, 0);
        assert_eq!(resp.data, Some(5));
    }
}
