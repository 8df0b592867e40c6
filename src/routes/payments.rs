use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::payments::requests::{CreatePaymentRequest, PaymentCallbackForm};
use crate::services::PaymentService;
use crate::utils::SafeOrderId;

static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

pub async fn create_payment(
    req: HttpRequest,
    body: web::Json<CreatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.create_payment(&req, body.into_inner()).await
}

pub async fn payment_callback(
    req: HttpRequest,
    form: web::Form<PaymentCallbackForm>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.handle_callback(&req, form.into_inner()).await
}

pub async fn get_payment(req: HttpRequest, order_id: SafeOrderId) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.get_payment(&req, &order_id.0).await
}

pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/payments")
            // 网关回调不带登录态，靠签名校验
            .route("/callback", web::post().to(payment_callback))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("", web::post().to(create_payment))
                    .route("/{order_id}", web::get().to(get_payment)),
            ),
    );
}
