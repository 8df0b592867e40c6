use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::middlewares::RequireJWT;
use crate::models::students::requests::{StudentListParams, StudentListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::authorize_class;

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let is_admin = RequireJWT::extract_user_claims(request)
        .map(|u| u.is_admin())
        .unwrap_or(false);

    // 教师必须指定自己的班级
    match query.class_id {
        Some(class_id) => {
            if let Err(resp) = authorize_class(&storage, request, class_id).await {
                return Ok(resp);
            }
        }
        None if !is_admin => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "class_id is required",
            )));
        }
        None => {}
    }

    let list_query = StudentListQuery {
        page: query.page,
        size: query.size,
        class_id: query.class_id,
        status: query.status,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    match storage.list_students(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Student list retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}
