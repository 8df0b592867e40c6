pub mod codes;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::activation::requests::{CreateCodesRequest, RedeemCodeRequest};
use crate::storage::Storage;

pub struct ActivationService {
    storage: Option<Arc<dyn Storage>>,
}

impl ActivationService {
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

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone()
    }

    pub async fn create_codes(
        &self,
        request: &HttpRequest,
        body: CreateCodesRequest,
    ) -> ActixResult<HttpResponse> {
        codes::create_codes(self, request, body).await
    }

    pub async fn list_codes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        codes::list_codes(self, request).await
    }

    pub async fn redeem_code(
        &self,
        request: &HttpRequest,
        body: RedeemCodeRequest,
    ) -> ActixResult<HttpResponse> {
        codes::redeem_code(self, request, body).await
    }
}
