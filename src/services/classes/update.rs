use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::create::{CLASS_NAME_MAX_LEN, ensure_teacher};
use super::{ClassService, authorize_class};
use crate::errors::LakukelasError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::{requests::UpdateClassRequest, responses::ClassResponse},
};
use crate::utils::validate::validate_name;

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    mut update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let class = match authorize_class(&storage, request, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    if let Some(name) = update_data.name.as_deref() {
        match validate_name(name, CLASS_NAME_MAX_LEN) {
            Ok(name) => update_data.name = Some(name),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::ClassNameInvalid, msg)));
            }
        }
    }

    // 只有管理员可以更换班主任
    if let Some(teacher_id) = update_data.teacher_id
        && class.teacher_id != Some(teacher_id)
    {
        let is_admin = RequireJWT::extract_user_claims(request)
            .map(|u| u.is_admin())
            .unwrap_or(false);
        if !is_admin {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "Only administrators can change the homeroom teacher",
            )));
        }
        if let Err(resp) = ensure_teacher(&storage, teacher_id).await {
            return Ok(resp);
        }
    }

    match storage.update_class(class_id, update_data).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassResponse { class },
            "Class updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(LakukelasError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::ClassAlreadyExists, "Class name already exists"),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}
