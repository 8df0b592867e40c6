use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::AnalyticsService;

static ANALYTICS_SERVICE: Lazy<AnalyticsService> = Lazy::new(AnalyticsService::new_lazy);

pub async fn get_overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.get_overview(&req).await
}

/// 挂在 /api/v1/admin 下
pub fn configure_admin(cfg: &mut web::ServiceConfig) {
    cfg.route("/analytics", web::get().to(get_overview));
}
