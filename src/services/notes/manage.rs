use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::NoteService;
use crate::middlewares::RequireJWT;
use crate::models::notes::{
    requests::{CreateNoteRequest, NoteListQuery},
    responses::NoteListResponse,
};
use crate::models::{ApiResponse, ErrorCode};

const NOTE_MAX_LEN: usize = 2000;

pub fn validate_note_content(content: &str) -> Result<String, String> {
    let content = content.trim();
    if content.is_empty() {
        return Err("Note content is required".to_string());
    }
    if content.chars().count() > NOTE_MAX_LEN {
        return Err(format!("Note must be at most {NOTE_MAX_LEN} characters"));
    }
    Ok(content.to_string())
}

pub async fn create_note(
    service: &NoteService,
    request: &HttpRequest,
    body: CreateNoteRequest,
) -> ActixResult<HttpResponse> {
    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    let content = match validate_note_content(&body.content) {
        Ok(content) => content,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::NoteInvalid, msg)));
        }
    };

    let storage = service.get_storage(request);
    match storage.get_student_by_id(body.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }

    match storage
        .create_note(body.student_id, teacher_id, body.date, content)
        .await
    {
        Ok(note) => {
            info!(
                "Teacher {} added a note for student {}",
                teacher_id, note.student_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(note, "Note created successfully")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn list_notes(
    service: &NoteService,
    request: &HttpRequest,
    query: NoteListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_notes_for_student(query.student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            NoteListResponse { items },
            "Notes retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_content() {
        assert_eq!(
            validate_note_content("  Rajin mengerjakan tugas ").unwrap(),
            "Rajin mengerjakan tugas"
        );
        assert!(validate_note_content(" \n ").is_err());
        assert!(validate_note_content(&"a".repeat(NOTE_MAX_LEN + 1)).is_err());
    }
}
