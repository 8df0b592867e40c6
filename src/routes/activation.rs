use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::activation::requests::{CreateCodesRequest, RedeemCodeRequest};
use crate::services::ActivationService;

static ACTIVATION_SERVICE: Lazy<ActivationService> = Lazy::new(ActivationService::new_lazy);

pub async fn create_codes(
    req: HttpRequest,
    body: web::Json<CreateCodesRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVATION_SERVICE.create_codes(&req, body.into_inner()).await
}

pub async fn list_codes(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACTIVATION_SERVICE.list_codes(&req).await
}

pub async fn redeem_code(
    req: HttpRequest,
    body: web::Json<RedeemCodeRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVATION_SERVICE.redeem_code(&req, body.into_inner()).await
}

pub fn configure_activation_routes(cfg: &mut web::ServiceConfig) {
    // RateLimit 在 RequireJWT 之内，按用户计数
    cfg.service(
        web::resource("/api/v1/activation/redeem")
            .wrap(RateLimit::redeem())
            .wrap(middlewares::RequireJWT)
            .route(web::post().to(redeem_code)),
    );
}

/// 挂在 /api/v1/admin 下
pub fn configure_admin(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/codes")
            .route(web::get().to(list_codes))
            .route(web::post().to(create_codes)),
    );
}
