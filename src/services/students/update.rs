use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use super::create::STUDENT_NAME_MAX_LEN;
use crate::errors::LakukelasError;
use crate::models::students::{requests::UpdateStudentRequest, responses::StudentResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::authorize_class;
use crate::utils::validate::{validate_name, validate_nis};

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    mut body: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = body.name.as_deref() {
        match validate_name(name, STUDENT_NAME_MAX_LEN) {
            Ok(name) => body.name = Some(name),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::StudentInvalid, msg)));
            }
        }
    }
    if let Some(nis) = body.nis.as_deref() {
        let nis = nis.trim().to_string();
        if let Err(msg) = validate_nis(&nis) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::StudentInvalid, msg)));
        }
        body.nis = Some(nis);
    }

    let storage = service.get_storage(request);
    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    };

    if let Err(resp) = authorize_class(&storage, request, student.class_id).await {
        return Ok(resp);
    }

    match storage.update_student(student_id, body).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentResponse { student },
            "Student updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(LakukelasError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::StudentAlreadyExists, "NIS already exists"),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}
