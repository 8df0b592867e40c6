pub mod activate;
pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::school_years::requests::CreateSchoolYearRequest;
use crate::storage::Storage;

pub struct SchoolYearService {
    storage: Option<Arc<dyn Storage>>,
}

impl SchoolYearService {
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

    // 按起始年份创建两个学期
    pub async fn create_school_year(
        &self,
        request: &HttpRequest,
        body: CreateSchoolYearRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_school_year(self, request, body).await
    }

    pub async fn list_school_years(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_school_years(self, request).await
    }

    pub async fn get_active_school_year(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::get_active_school_year(self, request).await
    }

    // 激活学年，其余学年同时停用
    pub async fn activate_school_year(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        activate::activate_school_year(self, request, id).await
    }
}
