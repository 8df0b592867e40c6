use actix_web::cookie::Cookie;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
    users::entities::{User, UserStatus},
};
use crate::services::system::DynamicConfig;
use crate::utils::jwt::{JwtUtils, TokenKind, TokenPair};
use crate::utils::password::verify_password;

use super::AuthService;

/// 已签发的会话：令牌对及其有效期
pub(crate) struct IssuedSession {
    pub tokens: TokenPair,
    pub access_minutes: i64,
    pub refresh_days: i64,
}

impl IssuedSession {
    pub fn cookies(&self) -> [Cookie<'static>; 2] {
        [
            JwtUtils::create_access_token_cookie(&self.tokens.access_token, self.access_minutes),
            JwtUtils::create_refresh_token_cookie(&self.tokens.refresh_token, self.refresh_days),
        ]
    }
}

/// 签发会话令牌，有效期读取运行期配置，记住我时 refresh token 使用更长的期限
pub(crate) async fn issue_session(user: &User, remember_me: bool) -> Result<IssuedSession, String> {
    let access_minutes = DynamicConfig::access_token_expiry().await;
    let refresh_days = if remember_me {
        DynamicConfig::refresh_token_remember_me_expiry().await
    } else {
        DynamicConfig::refresh_token_expiry().await
    };
    let role = user.role.to_string();

    let access_token = JwtUtils::sign(
        user.id,
        &role,
        TokenKind::Access,
        chrono::Duration::minutes(access_minutes),
    )
    .map_err(|e| format!("生成 access token 失败: {e}"))?;
    let refresh_token = JwtUtils::sign(
        user.id,
        &role,
        TokenKind::Refresh,
        chrono::Duration::days(refresh_days),
    )
    .map_err(|e| format!("生成 refresh token 失败: {e}"))?;

    Ok(IssuedSession {
        tokens: TokenPair {
            access_token,
            refresh_token,
        },
        access_minutes,
        refresh_days,
    })
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 根据用户名或邮箱获取用户信息
    let user = match storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Username or password is incorrect",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login failed: {e}"),
                )),
            );
        }
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Username or password is incorrect",
        )));
    }

    if user.status != UserStatus::Active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Account is suspended",
        )));
    }

    // 3. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 4. 生成令牌对
    match issue_session(&user, login_request.remember_me).await {
        Ok(session) => {
            tracing::info!("User {} logged in successfully", user.username);

            let [access_cookie, refresh_cookie] = session.cookies();
            let response = LoginResponse {
                access_token: session.tokens.access_token,
                expires_in: session.access_minutes * 60,
                user,
                created_at: chrono::Utc::now(),
            };

            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .cookie(access_cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}
