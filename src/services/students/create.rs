use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::errors::LakukelasError;
use crate::models::students::{requests::CreateStudentRequest, responses::StudentResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::authorize_class;
use crate::utils::validate::{validate_name, validate_nis};

pub const STUDENT_NAME_MAX_LEN: usize = 100;

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    mut body: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    body.name = match validate_name(&body.name, STUDENT_NAME_MAX_LEN) {
        Ok(name) => name,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::StudentInvalid, msg)));
        }
    };
    body.nis = body.nis.trim().to_string();
    if let Err(msg) = validate_nis(&body.nis) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::StudentInvalid, msg)));
    }

    let storage = service.get_storage(request);
    if let Err(resp) = authorize_class(&storage, request, body.class_id).await {
        return Ok(resp);
    }

    match storage.create_student(body).await {
        Ok(student) => {
            info!("Student {} ({}) created in class {}", student.id, student.nis, student.class_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentResponse { student },
                "Student created successfully",
            )))
        }
        Err(LakukelasError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::StudentAlreadyExists, "NIS already exists"),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}
