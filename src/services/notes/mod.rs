pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::notes::requests::{CreateNoteRequest, NoteListQuery};
use crate::storage::Storage;

pub struct NoteService {
    storage: Option<Arc<dyn Storage>>,
}

impl NoteService {
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

    pub async fn create_note(
        &self,
        request: &HttpRequest,
        body: CreateNoteRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_note(self, request, body).await
    }

    pub async fn list_notes(
        &self,
        request: &HttpRequest,
        query: NoteListQuery,
    ) -> ActixResult<HttpResponse> {
        manage::list_notes(self, request, query).await
    }
}
