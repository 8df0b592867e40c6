pub mod check_in;
pub mod recap;
pub mod rules;
pub mod settings;

pub use rules::validate_attendance_settings;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::teacher_attendance::{
    entities::AttendanceSettings,
    requests::{CheckInRequest, RecapQuery, TeacherAttendanceRangeQuery},
};
use crate::storage::Storage;

pub struct TeacherAttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherAttendanceService {
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

    pub async fn get_settings(&self) -> ActixResult<HttpResponse> {
        settings::get_attendance_settings().await
    }

    pub async fn update_settings(
        &self,
        request: &HttpRequest,
        body: AttendanceSettings,
    ) -> ActixResult<HttpResponse> {
        settings::update_attendance_settings(self, request, body).await
    }

    pub async fn check_in(
        &self,
        request: &HttpRequest,
        body: CheckInRequest,
    ) -> ActixResult<HttpResponse> {
        check_in::check_in(self, request, body).await
    }

    pub async fn check_out(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        check_in::check_out(self, request).await
    }

    pub async fn list_my_attendance(
        &self,
        request: &HttpRequest,
        query: TeacherAttendanceRangeQuery,
    ) -> ActixResult<HttpResponse> {
        check_in::list_my_attendance(self, request, query).await
    }

    pub async fn recap(&self, request: &HttpRequest, query: RecapQuery) -> ActixResult<HttpResponse> {
        recap::daily_recap(self, request, query).await
    }
}
