use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::{RequireJWT, user_cache_key};
use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::system::DynamicConfig;
use crate::utils::jwt::{JwtUtils, TokenKind};

use super::AuthService;

fn unauthorized_with_cleared_cookies(message: &str) -> HttpResponse {
    let [refresh_cookie, access_cookie] = JwtUtils::cleared_cookies();
    HttpResponse::Unauthorized()
        .cookie(refresh_cookie)
        .cookie(access_cookie)
        .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 从 cookie 中提取 refresh token
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify(&refresh_token, TokenKind::Refresh) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::error!("Refresh token failed: {}", e);
            return Ok(unauthorized_with_cleared_cookies(
                "Login expired or invalid, please login again",
            ));
        }
    };

    let Ok(user_id) = claims.sub.parse::<i64>() else {
        return Ok(unauthorized_with_cleared_cookies("Invalid refresh token"));
    };

    // 停用账号不能续期
    let storage = service.get_storage(request);
    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.status == UserStatus::Active => {}
        Ok(_) => {
            return Ok(unauthorized_with_cleared_cookies(
                "Account is no longer available",
            ));
        }
        Err(e) => {
            return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError));
        }
    }

    let access_minutes = DynamicConfig::access_token_expiry().await;
    match JwtUtils::sign(
        user_id,
        &claims.role,
        TokenKind::Access,
        chrono::Duration::minutes(access_minutes),
    ) {
        Ok(access_token) => {
            let access_cookie = JwtUtils::create_access_token_cookie(&access_token, access_minutes);
            let response = RefreshTokenResponse {
                access_token,
                expires_in: access_minutes * 60,
            };
            Ok(HttpResponse::Ok().cookie(access_cookie).json(ApiResponse::success(
                response,
                "Token refreshed successfully",
            )))
        }
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to refresh token",
                )),
            )
        }
    }
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user_claims(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        None => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))),
    }
}

pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(token) = JwtUtils::extract_access_token(request) {
        service.get_cache(request).remove(&user_cache_key(&token)).await;
    }

    let [refresh_cookie, access_cookie] = JwtUtils::cleared_cookies();
    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .cookie(access_cookie)
        .json(ApiResponse::success_empty("Logged out")))
}
