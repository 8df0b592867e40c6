pub mod batch;
pub mod create;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::{
    CreateStudentRequest, GraduateStudentsRequest, MoveStudentsRequest, StudentListParams,
    UpdateStudentRequest,
};
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, request, query).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        body: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, body).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
        body: UpdateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, request, student_id, body).await
    }

    // 批量转班
    pub async fn move_students(
        &self,
        request: &HttpRequest,
        body: MoveStudentsRequest,
    ) -> ActixResult<HttpResponse> {
        batch::move_students(self, request, body).await
    }

    // 批量毕业
    pub async fn graduate_students(
        &self,
        request: &HttpRequest,
        body: GraduateStudentsRequest,
    ) -> ActixResult<HttpResponse> {
        batch::graduate_students(self, request, body).await
    }
}
