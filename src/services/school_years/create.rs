use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SchoolYearService;
use crate::errors::LakukelasError;
use crate::models::school_years::{
    entities::school_year_names, requests::CreateSchoolYearRequest,
    responses::SchoolYearListResponse,
};
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_school_year(
    service: &SchoolYearService,
    request: &HttpRequest,
    body: CreateSchoolYearRequest,
) -> ActixResult<HttpResponse> {
    // 先校验年份范围，避免无效写入
    if let Err(msg) = school_year_names(body.start_year) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SchoolYearInvalid, msg)));
    }

    let storage = service.get_storage(request);
    match storage.create_school_year_pair(body.start_year).await {
        Ok(items) => {
            info!("School year {} created", body.start_year);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SchoolYearListResponse { items },
                "School year created successfully",
            )))
        }
        Err(LakukelasError::Conflict(msg)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::SchoolYearAlreadyExists, msg),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}
