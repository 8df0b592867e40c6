//! 安全的路径参数提取器
//!
//! 解析失败时直接返回 400 统一响应，而不是 actix 默认的纯文本错误。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ApiResponse, ErrorCode};

static SETTING_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_]+\.[a-z_]+$").expect("Invalid setting key regex"));

static ORDER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("Invalid order id regex"));

fn bad_path(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 正整数 ID 路径参数
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let raw = req.match_info().get($param).unwrap_or_default();
                ready(match raw.parse::<i64>() {
                    Ok(id) if id > 0 => Ok($name(id)),
                    _ => Err(bad_path(format!("Invalid path parameter '{}': {raw}", $param))),
                })
            }
        }
    };
}

/// 正则校验的字符串路径参数
macro_rules! define_safe_str_extractor {
    ($name:ident, $param:literal, $re:ident) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub String);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let raw = req.match_info().get($param).unwrap_or_default();
                ready(if $re.is_match(raw) {
                    Ok($name(raw.to_string()))
                } else {
                    Err(bad_path(format!("Invalid path parameter '{}': {raw}", $param)))
                })
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_str_extractor!(SafeSettingKey, "key", SETTING_KEY_RE);
define_safe_str_extractor!(SafeOrderId, "order_id", ORDER_ID_RE);

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_accepts_positive() {
        let (req, mut pl) = TestRequest::default()
            .param("id", "42")
            .to_http_parts();
        let id = SafeIDI64::from_request(&req, &mut pl).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_safe_id_rejects_garbage() {
        for raw in ["abc", "0", "-3", ""] {
            let (req, mut pl) = TestRequest::default().param("id", raw).to_http_parts();
            assert!(SafeIDI64::from_request(&req, &mut pl).await.is_err());
        }
    }

    #[actix_web::test]
    async fn test_safe_setting_key() {
        let (req, mut pl) = TestRequest::default()
            .param("key", "attendance.radius")
            .to_http_parts();
        assert!(SafeSettingKey::from_request(&req, &mut pl).await.is_ok());

        let (req, mut pl) = TestRequest::default()
            .param("key", "../etc")
            .to_http_parts();
        assert!(SafeSettingKey::from_request(&req, &mut pl).await.is_err());
    }
}
