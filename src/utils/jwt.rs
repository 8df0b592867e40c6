use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户 ID
    pub role: String,
    pub token_type: String, // "access" 或 "refresh"
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    /// 签发令牌，有效期由调用方决定（运行期配置）
    pub fn sign(
        user_id: i64,
        role: &str,
        kind: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: kind.as_str().to_string(),
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret().as_bytes()),
        )
    }

    /// 校验签名、过期时间与令牌类型
    pub fn verify(token: &str, kind: TokenKind) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret().as_bytes()),
            &Validation::default(),
        )?
        .claims;

        if claims.token_type != kind.as_str() {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    fn session_cookie(
        name: &'static str,
        value: &str,
        max_age: actix_web::cookie::time::Duration,
        same_site: SameSite,
    ) -> Cookie<'static> {
        Cookie::build(name, value.to_string())
            .path("/")
            .max_age(max_age)
            .same_site(same_site)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_refresh_token_cookie(refresh_token: &str, days: i64) -> Cookie<'static> {
        Self::session_cookie(
            REFRESH_TOKEN_COOKIE,
            refresh_token,
            actix_web::cookie::time::Duration::days(days),
            SameSite::Strict,
        )
    }

    /// 页面路由守卫从 access_token cookie 读取会话
    pub fn create_access_token_cookie(access_token: &str, minutes: i64) -> Cookie<'static> {
        Self::session_cookie(
            ACCESS_TOKEN_COOKIE,
            access_token,
            actix_web::cookie::time::Duration::minutes(minutes),
            SameSite::Lax,
        )
    }

    /// 注销或会话失效时清空两个 cookie
    pub fn cleared_cookies() -> [Cookie<'static>; 2] {
        let zero = actix_web::cookie::time::Duration::seconds(0);
        [
            Self::session_cookie(REFRESH_TOKEN_COOKIE, "", zero, SameSite::Strict),
            Self::session_cookie(ACCESS_TOKEN_COOKIE, "", zero, SameSite::Lax),
        ]
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|t| !t.is_empty())
    }

    /// 依次从 Authorization 头和 access_token cookie 中提取 Access Token
    pub fn extract_access_token(req: &actix_web::HttpRequest) -> Option<String> {
        let from_header = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        from_header.or_else(|| {
            req.cookie(ACCESS_TOKEN_COOKIE)
                .map(|c| c.value().to_string())
                .filter(|t| !t.is_empty())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_extract_access_token_prefers_header() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer header-token"))
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "cookie-token"))
            .to_http_request();
        assert_eq!(
            JwtUtils::extract_access_token(&req).as_deref(),
            Some("header-token")
        );

        let req = TestRequest::default()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "cookie-token"))
            .to_http_request();
        assert_eq!(
            JwtUtils::extract_access_token(&req).as_deref(),
            Some("cookie-token")
        );

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer   "))
            .to_http_request();
        assert_eq!(JwtUtils::extract_access_token(&req), None);
    }

    #[test]
    fn test_cleared_cookies_expire_immediately() {
        for cookie in JwtUtils::cleared_cookies() {
            assert_eq!(cookie.value(), "");
            assert_eq!(
                cookie.max_age(),
                Some(actix_web::cookie::time::Duration::seconds(0))
            );
        }
    }
}
