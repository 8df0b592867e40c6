use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::errors::LakukelasError;
use crate::middlewares::RequireJWT;
use crate::models::subjects::{
    entities::{NewSubject, SubjectUpdate},
    requests::{CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest},
    responses::{SubjectListResponse, SubjectResponse},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::create::ensure_teacher;
use crate::utils::validate::{validate_kkm, validate_name};

pub const SUBJECT_NAME_MAX_LEN: usize = 100;

/// 校验科目名称与 KKM，返回修剪后的名称和整数 KKM
pub fn validate_subject_input(
    name: &str,
    kkm: &serde_json::Value,
) -> Result<(String, f64), String> {
    let name = validate_name(name, SUBJECT_NAME_MAX_LEN)?;
    let kkm = validate_kkm(kkm).map_err(str::to_string)?;
    Ok((name, kkm))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized: missing user id",
    ))
}

pub async fn list_subjects(
    service: &SubjectService,
    request: &HttpRequest,
    query: SubjectListParams,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    // 教师只看自己的科目
    let teacher_id = if user.is_admin() {
        query.teacher_id
    } else {
        Some(user.id)
    };

    let storage = service.get_storage(request);
    match storage.list_subjects(teacher_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubjectListResponse { items },
            "Subject list retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_subject(
    service: &SubjectService,
    request: &HttpRequest,
    body: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    let (name, kkm) = match validate_subject_input(&body.name, &body.kkm) {
        Ok(valid) => valid,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::SubjectInvalid, msg)));
        }
    };

    let storage = service.get_storage(request);
    let teacher_id = if user.is_admin() {
        let Some(teacher_id) = body.teacher_id else {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::SubjectInvalid,
                "teacher_id is required",
            )));
        };
        if let Err(resp) = ensure_teacher(&storage, teacher_id).await {
            return Ok(resp);
        }
        teacher_id
    } else {
        if body.teacher_id.is_some_and(|id| id != user.id) {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You can only create subjects for yourself",
            )));
        }
        user.id
    };

    match storage
        .create_subject(NewSubject {
            name,
            kkm,
            teacher_id,
        })
        .await
    {
        Ok(subject) => {
            info!("Subject {} created for teacher {}", subject.name, teacher_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SubjectResponse { subject },
                "Subject created successfully",
            )))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn update_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
    body: UpdateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    let mut update = SubjectUpdate::default();
    if let Some(name) = body.name.as_deref() {
        match validate_name(name, SUBJECT_NAME_MAX_LEN) {
            Ok(name) => update.name = Some(name),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::SubjectInvalid, msg)));
            }
        }
    }
    if let Some(kkm) = body.kkm.as_ref() {
        match validate_kkm(kkm) {
            Ok(kkm) => update.kkm = Some(kkm),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::SubjectInvalid, msg)));
            }
        }
    }

    let storage = service.get_storage(request);
    match storage.get_subject_by_id(subject_id).await {
        Ok(Some(subject)) if user.is_admin() || subject.teacher_id == user.id => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You do not own this subject",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubjectNotFound,
                "Subject not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }

    match storage.update_subject(subject_id, update).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubjectResponse { subject },
            "Subject updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubjectNotFound,
            "Subject not found",
        ))),
        Err(LakukelasError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SubjectInvalid, msg))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subject_input_rules() {
        assert_eq!(
            validate_subject_input("  Matematika ", &json!(75)),
            Ok(("Matematika".to_string(), 75.0))
        );
        assert!(validate_subject_input("   ", &json!(75)).is_err());
        assert!(validate_subject_input("IPA", &json!(101)).is_err());
        assert!(validate_subject_input("IPA", &json!(-1)).is_err());
        assert!(validate_subject_input("IPA", &json!("tujuh")).is_err());
    }
}
