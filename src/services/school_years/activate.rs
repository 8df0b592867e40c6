use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SchoolYearService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn activate_school_year(
    service: &SchoolYearService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.activate_school_year(id).await {
        Ok(Some(year)) => {
            info!("School year {} ({}) activated", year.id, year.name);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                year,
                "School year activated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SchoolYearNotFound,
            "School year not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}
