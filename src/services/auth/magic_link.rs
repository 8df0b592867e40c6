//! 一次性登录码
//!
//! 登录码存放在对象缓存 `magic:{code}` 中，10 分钟过期，回调时读取并删除。
//! 生产环境只记录签发事件，开发环境会把登录码写进日志和响应。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header::LOCATION};

use crate::cache::CacheResult;
use crate::models::auth::{AuthCallbackQuery, MagicLinkRequest, MagicLinkResponse, PendingLogin};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::random_code::generate_login_code;

use super::AuthService;
use super::login::issue_session;

/// 登录码有效期（秒）
pub const MAGIC_LINK_TTL_SECS: u64 = 600;

/// 回调失败时的落地地址
pub const AUTH_FAILURE_PATH: &str = "/?error=auth";

pub fn magic_link_cache_key(code: &str) -> String {
    format!("magic:{code}")
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location.to_string()))
        .finish()
}

pub async fn handle_request_magic_link(
    service: &AuthService,
    body: MagicLinkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let identifier = body.username.trim();
    if identifier.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "username is required",
        )));
    }

    let user = match storage.get_user_by_username_or_email(identifier).await {
        Ok(user) => user,
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    };

    // 未知账号同样返回成功，不暴露账号是否存在
    let code = match user {
        Some(user) if user.status == UserStatus::Active => {
            let code = generate_login_code();
            let pending = PendingLogin {
                user_id: user.id,
                issued_at: chrono::Utc::now().timestamp(),
            };
            let value = match serde_json::to_string(&pending) {
                Ok(value) => value,
                Err(e) => {
                    tracing::error!("Failed to serialize pending login: {}", e);
                    return Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            "Unable to issue login code",
                        )),
                    );
                }
            };
            service
                .get_cache(request)
                .insert_raw(magic_link_cache_key(&code), value, MAGIC_LINK_TTL_SECS)
                .await;

            if config.is_production() {
                tracing::info!("Magic link issued for user {}", user.id);
            } else {
                tracing::info!(
                    "Magic link issued for user {}: /auth/callback?code={}",
                    user.id,
                    code
                );
            }
            Some(code)
        }
        _ => {
            tracing::info!("Magic link requested for unknown or inactive account");
            None
        }
    };

    let response = MagicLinkResponse {
        expires_in: MAGIC_LINK_TTL_SECS,
        code: if config.is_production() { None } else { code },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "If the account exists, a login link has been issued",
    )))
}

pub async fn handle_auth_callback(
    service: &AuthService,
    query: AuthCallbackQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(code) = query.code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()) else {
        return Ok(redirect(AUTH_FAILURE_PATH));
    };

    let cache = service.get_cache(request);
    let pending = match cache.take_raw(&magic_link_cache_key(&code)).await {
        CacheResult::Found(json) => match serde_json::from_str::<PendingLogin>(&json) {
            Ok(pending) => pending,
            Err(_) => return Ok(redirect(AUTH_FAILURE_PATH)),
        },
        _ => {
            tracing::info!("Auth callback with unknown or expired code");
            return Ok(redirect(AUTH_FAILURE_PATH));
        }
    };

    let storage = service.get_storage(request);
    let user = match storage.get_user_by_id(pending.user_id).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => return Ok(redirect(AUTH_FAILURE_PATH)),
        Err(e) => {
            tracing::error!("Auth callback failed to load user {}: {}", pending.user_id, e);
            return Ok(redirect(AUTH_FAILURE_PATH));
        }
    };

    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    match issue_session(&user, false).await {
        Ok(session) => {
            tracing::info!("User {} signed in via magic link", user.username);
            let [access_cookie, refresh_cookie] = session.cookies();
            Ok(HttpResponse::Found()
                .cookie(access_cookie)
                .cookie(refresh_cookie)
                .insert_header((LOCATION, user.role.home_path()))
                .finish())
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(redirect(AUTH_FAILURE_PATH))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_cache_key() {
        assert_eq!(magic_link_cache_key("abc"), "magic:abc");
    }

    #[test]
    fn test_failure_redirect() {
        let resp = redirect(AUTH_FAILURE_PATH);
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some("/?error=auth")
        );
    }
}
