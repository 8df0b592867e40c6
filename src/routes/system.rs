use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::system::requests::{
    BatchUpdateSettingsRequest, SettingAuditQuery, UpdateSettingRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::SystemService;
use crate::utils::SafeSettingKey;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn get_settings(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_settings(&request).await
}

pub async fn get_admin_settings(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_admin_settings(&request).await
}

pub async fn update_setting(
    request: HttpRequest,
    key: SafeSettingKey,
    body: web::Json<UpdateSettingRequest>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE
        .update_setting(&request, key.0, body.into_inner())
        .await
}

pub async fn batch_update_settings(
    request: HttpRequest,
    body: web::Json<BatchUpdateSettingsRequest>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE
        .batch_update_settings(&request, body.into_inner())
        .await
}

pub async fn get_setting_audits(
    request: HttpRequest,
    query: web::Query<SettingAuditQuery>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE
        .get_setting_audits(&request, query.into_inner())
        .await
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/system")
            .wrap(middleware::Compress::default())
            // 系统名称等公开信息，登录页也要用
            .route("/settings", web::get().to(get_settings))
            .service(
                web::scope("/admin")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .wrap(middlewares::RequireJWT)
                    .service(
                        web::resource("/settings")
                            .route(web::get().to(get_admin_settings))
                            .route(web::put().to(batch_update_settings)),
                    )
                    .route("/settings/audits", web::get().to(get_setting_audits))
                    .route("/settings/{key}", web::put().to(update_setting)),
            ),
    );
}
