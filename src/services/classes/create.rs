use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ClassService;
use crate::errors::LakukelasError;
use crate::middlewares::RequireJWT;
use crate::models::classes::{requests::CreateClassRequest, responses::ClassResponse};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate::validate_name;

pub const CLASS_NAME_MAX_LEN: usize = 50;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    mut class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    class_data.name = match validate_name(&class_data.name, CLASS_NAME_MAX_LEN) {
        Ok(name) => name,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ClassNameInvalid, msg)));
        }
    };

    // 权限校验
    if let Err(resp) = resolve_homeroom_teacher(&user, &mut class_data, &storage).await {
        return Ok(resp);
    }

    // 创建班级
    match storage.create_class(class_data).await {
        Ok(class) => {
            info!("Class {} created successfully by {}", class.name, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                ClassResponse { class },
                "Class created successfully",
            )))
        }
        Err(LakukelasError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::ClassAlreadyExists, "Class name already exists"),
        )),
        Err(e) => {
            error!("Class creation failed: {}", e);
            Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError))
        }
    }
}

/// 教师只能为自己建班；管理员可指定任意教师或留空
async fn resolve_homeroom_teacher(
    user: &User,
    class_data: &mut CreateClassRequest,
    storage: &Arc<dyn Storage>,
) -> Result<(), HttpResponse> {
    if !user.is_admin() {
        match class_data.teacher_id {
            Some(id) if id != user.id => {
                return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::ClassPermissionDenied,
                    "You do not have permission to create a class for another teacher",
                )));
            }
            _ => class_data.teacher_id = Some(user.id),
        }
        return Ok(());
    }

    if let Some(teacher_id) = class_data.teacher_id {
        ensure_teacher(storage, teacher_id).await?;
    }
    Ok(())
}

/// 班主任必须是教师账号
pub(crate) async fn ensure_teacher(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(teacher_id).await {
        Ok(Some(teacher)) if teacher.role == UserRole::Teacher => Ok(()),
        Ok(Some(_)) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "Homeroom teacher must be a teacher account",
        ))),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Teacher not found",
        ))),
        Err(e) => {
            error!("Failed to get user by id: {}", e);
            Err(ApiResponse::from_error(&e, ErrorCode::InternalServerError))
        }
    }
}
