use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolYearService;
use crate::models::school_years::responses::SchoolYearListResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_school_years(
    service: &SchoolYearService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_school_years().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SchoolYearListResponse { items },
            "School years retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_active_school_year(
    service: &SchoolYearService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_active_school_year().await {
        Ok(Some(year)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            year,
            "Active school year retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NoActiveSchoolYear,
            "No active school year",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}
