pub mod settings;
pub mod settings_cache;

pub use settings_cache::DynamicConfig;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::system::requests::{
    BatchUpdateSettingsRequest, SettingAuditQuery, UpdateSettingRequest,
};
use crate::storage::Storage;

pub struct SystemService {
    storage: Option<Arc<dyn Storage>>,
}

impl SystemService {
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

    // 公开系统信息
    pub async fn get_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::get_settings(self, request).await
    }

    // 管理员配置列表
    pub async fn get_admin_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::get_admin_settings(self, request).await
    }

    pub async fn update_setting(
        &self,
        request: &HttpRequest,
        key: String,
        body: UpdateSettingRequest,
    ) -> ActixResult<HttpResponse> {
        settings::update_setting(self, request, key, body).await
    }

    pub async fn batch_update_settings(
        &self,
        request: &HttpRequest,
        body: BatchUpdateSettingsRequest,
    ) -> ActixResult<HttpResponse> {
        settings::batch_update_settings(self, request, body).await
    }

    pub async fn get_setting_audits(
        &self,
        request: &HttpRequest,
        query: SettingAuditQuery,
    ) -> ActixResult<HttpResponse> {
        settings::get_setting_audits(self, request, query).await
    }
}
