use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::LakukelasError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListParams, UserListQuery},
        responses::UserResponse,
    },
};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_name, validate_password_simple, validate_username,
};

const DISPLAY_NAME_MAX: usize = 100;

/// 账号字段校验失败，附带对应业务码
#[derive(Debug, PartialEq, Eq)]
pub struct AccountFieldError(pub ErrorCode, pub String);

fn bad_request(err: AccountFieldError) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(err.0, err.1))
}

fn hashing_failed(e: LakukelasError) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("Password hashing failed: {e}"),
    ))
}

fn normalize_display_name(name: Option<String>) -> Result<Option<String>, AccountFieldError> {
    match name {
        Some(name) if !name.trim().is_empty() => validate_name(&name, DISPLAY_NAME_MAX)
            .map(Some)
            .map_err(|msg| AccountFieldError(ErrorCode::UserNameInvalid, msg)),
        _ => Ok(None),
    }
}

/// 规整并校验新账号，密码仍为明文
pub fn validate_new_account(
    mut req: CreateUserRequest,
) -> Result<CreateUserRequest, AccountFieldError> {
    req.username = req.username.trim().to_string();
    req.email = req.email.trim().to_lowercase();

    validate_username(&req.username)
        .map_err(|m| AccountFieldError(ErrorCode::UserNameInvalid, m.to_string()))?;
    validate_email(&req.email)
        .map_err(|m| AccountFieldError(ErrorCode::UserEmailInvalid, m.to_string()))?;
    validate_password_simple(&req.password)
        .map_err(|m| AccountFieldError(ErrorCode::UserPasswordInvalid, m))?;
    req.display_name = normalize_display_name(req.display_name)?;

    Ok(req)
}

/// 管理员不能把自己停用或降为教师，否则系统可能失去最后一个管理员
pub fn is_self_lockout(actor_id: Option<i64>, target_id: i64, update: &UpdateUserRequest) -> bool {
    actor_id == Some(target_id)
        && (update.status == Some(UserStatus::Suspended) || update.role == Some(UserRole::Teacher))
}

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (page, size) = query.pagination.normalized();
    let list_query = UserListQuery {
        page: Some(page as i64),
        size: Some(size as i64),
        role: query.role,
        status: query.status,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    match service.get_storage(request).list_users_with_pagination(list_query).await {
        Ok(users) => Ok(HttpResponse::Ok().json(ApiResponse::success(users, "Users retrieved"))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_user(
    service: &UserService,
    body: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut account = match validate_new_account(body) {
        Ok(account) => account,
        Err(err) => return Ok(bad_request(err)),
    };
    account.password = match hash_password(&account.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(hashing_failed(e)),
    };

    match service.get_storage(request).create_user(account).await {
        Ok(user) => {
            info!("Account {} ({}) created", user.username, user.role);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created successfully")))
        }
        Err(LakukelasError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserAlreadyExists, "Username or email already exists"),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::UserCreationFailed)),
    }
}

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(UserResponse { user }, "User retrieved"))),
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found"))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if is_self_lockout(RequireJWT::extract_user_id(request), user_id, &update) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserUpdateFailed,
            "Cannot suspend or demote your own account",
        )));
    }

    if let Some(email) = update.email.take() {
        let email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(&email) {
            return Ok(bad_request(AccountFieldError(
                ErrorCode::UserEmailInvalid,
                msg.to_string(),
            )));
        }
        update.email = Some(email);
    }

    if let Some(password) = update.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(bad_request(AccountFieldError(ErrorCode::UserPasswordInvalid, msg)));
        }
        match hash_password(&password) {
            Ok(hash) => update.password = Some(hash),
            Err(e) => return Ok(hashing_failed(e)),
        }
    }

    if update.display_name.is_some() {
        match normalize_display_name(update.display_name.take()) {
            Ok(name) => update.display_name = name,
            Err(err) => return Ok(bad_request(err)),
        }
    }

    match service.get_storage(request).update_user(user_id, update).await {
        Ok(Some(user)) => {
            info!("Account {} updated (role: {}, status: {})", user.id, user.role, user.status);
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(UserResponse { user }, "User updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found"))),
        Err(LakukelasError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserAlreadyExists, "Email already exists"),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::UserUpdateFailed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: UserRole::Teacher,
            display_name: Some("  Bu Sari  ".to_string()),
        }
    }

    #[test]
    fn test_validate_new_account_normalizes() {
        let req = validate_new_account(account(" guru_sari ", " Sari@Sekolah.ID ", "Rahasia123"))
            .unwrap();
        assert_eq!(req.username, "guru_sari");
        assert_eq!(req.email, "sari@sekolah.id");
        assert_eq!(req.display_name.as_deref(), Some("Bu Sari"));
    }

    #[test]
    fn test_validate_new_account_rejects_fields() {
        let err = validate_new_account(account("ab", "sari@sekolah.id", "Rahasia123")).unwrap_err();
        assert_eq!(err.0, ErrorCode::UserNameInvalid);

        let err = validate_new_account(account("guru_sari", "not-an-email", "Rahasia123"))
            .unwrap_err();
        assert_eq!(err.0, ErrorCode::UserEmailInvalid);

        let err = validate_new_account(account("guru_sari", "sari@sekolah.id", "x")).unwrap_err();
        assert_eq!(err.0, ErrorCode::UserPasswordInvalid);
    }

    #[test]
    fn test_self_lockout() {
        let demote = UpdateUserRequest {
            role: Some(UserRole::Teacher),
            ..Default::default()
        };
        assert!(is_self_lockout(Some(1), 1, &demote));
        assert!(!is_self_lockout(Some(1), 2, &demote));

        let rename = UpdateUserRequest {
            display_name: Some("Admin".into()),
            ..Default::default()
        };
        assert!(!is_self_lockout(Some(1), 1, &rename));
    }
}
