//! 批量转班与毕业
//!
//! 两个操作都在存储层的单个事务中完成，任一学生不满足条件时整体回滚。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::errors::LakukelasError;
use crate::models::students::{
    requests::{GraduateStudentsRequest, MoveStudentsRequest},
    responses::BatchUpdateResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::authorize_class;

/// 转班请求的前置校验，返回目标班级
pub fn validate_move_request(body: &MoveStudentsRequest) -> Result<i64, &'static str> {
    if body.student_ids.is_empty() {
        return Err("student_ids must not be empty");
    }
    let Some(target) = body.target_class_id else {
        return Err("target_class_id is required");
    };
    if target == body.source_class_id {
        return Err("Target class must differ from the source class");
    }
    Ok(target)
}

pub async fn move_students(
    service: &StudentService,
    request: &HttpRequest,
    body: MoveStudentsRequest,
) -> ActixResult<HttpResponse> {
    let target_class_id = match validate_move_request(&body) {
        Ok(target) => target,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::StudentMoveInvalid, msg)));
        }
    };

    let storage = service.get_storage(request);
    if let Err(resp) = authorize_class(&storage, request, body.source_class_id).await {
        return Ok(resp);
    }

    match storage
        .move_students(&body.student_ids, body.source_class_id, target_class_id)
        .await
    {
        Ok(updated) => {
            info!(
                "Moved {} students from class {} to class {}",
                updated, body.source_class_id, target_class_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                BatchUpdateResponse { updated },
                "Students moved successfully",
            )))
        }
        Err(LakukelasError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::StudentMoveInvalid, msg))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn graduate_students(
    service: &StudentService,
    request: &HttpRequest,
    body: GraduateStudentsRequest,
) -> ActixResult<HttpResponse> {
    if body.student_ids.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::StudentMoveInvalid,
            "student_ids must not be empty",
        )));
    }

    let storage = service.get_storage(request);
    match storage.graduate_students(&body.student_ids).await {
        Ok(updated) => {
            info!("Graduated {} students", updated);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                BatchUpdateResponse { updated },
                "Students graduated successfully",
            )))
        }
        Err(LakukelasError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::StudentMoveInvalid, msg))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ids: Vec<i64>, target: Option<i64>) -> MoveStudentsRequest {
        MoveStudentsRequest {
            student_ids: ids,
            source_class_id: 1,
            target_class_id: target,
        }
    }

    #[test]
    fn test_move_rejects_empty_or_missing_target() {
        assert!(validate_move_request(&request(vec![], Some(2))).is_err());
        assert!(validate_move_request(&request(vec![5], None)).is_err());
        assert!(validate_move_request(&request(vec![5], Some(1))).is_err());
        assert_eq!(validate_move_request(&request(vec![5, 6], Some(2))), Ok(2));
    }
}
