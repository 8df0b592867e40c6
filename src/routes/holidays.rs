use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::holidays::requests::{HolidayListQuery, SaveHolidayRequest};
use crate::services::HolidayService;
use crate::utils::SafeIDI64;

static HOLIDAY_SERVICE: Lazy<HolidayService> = Lazy::new(HolidayService::new_lazy);

pub async fn list_holidays(
    req: HttpRequest,
    query: web::Query<HolidayListQuery>,
) -> ActixResult<HttpResponse> {
    HOLIDAY_SERVICE.list_holidays(&req, query.into_inner()).await
}

pub async fn save_holiday(
    req: HttpRequest,
    body: web::Json<SaveHolidayRequest>,
) -> ActixResult<HttpResponse> {
    HOLIDAY_SERVICE.save_holiday(&req, body.into_inner()).await
}

pub async fn delete_holiday(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    HOLIDAY_SERVICE.delete_holiday(&req, id.0).await
}

/// 挂在 /api/v1/admin 下
pub fn configure_admin(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/holidays")
            .route(web::get().to(list_holidays))
            .route(web::post().to(save_holiday)),
    )
    .route("/holidays/{id}", web::delete().to(delete_holiday));
}
