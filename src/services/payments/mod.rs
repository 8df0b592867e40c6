//! 订阅支付
//!
//! 创建交易时调用网关 inquiry 获取支付链接，网关以表单回调结算。

pub mod gateway;
pub mod handlers;
pub mod signature;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::payments::requests::{CreatePaymentRequest, PaymentCallbackForm};
use crate::storage::Storage;

pub struct PaymentService {
    storage: Option<Arc<dyn Storage>>,
}

impl PaymentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub async fn create_payment(
        &self,
        request: &HttpRequest,
        body: CreatePaymentRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::create_payment(self, request, body).await
    }

    pub async fn handle_callback(
        &self,
        request: &HttpRequest,
        form: PaymentCallbackForm,
    ) -> ActixResult<HttpResponse> {
        handlers::handle_callback(self, request, form).await
    }

    pub async fn get_payment(
        &self,
        request: &HttpRequest,
        order_id: &str,
    ) -> ActixResult<HttpResponse> {
        handlers::get_payment(self, request, order_id).await
    }
}
