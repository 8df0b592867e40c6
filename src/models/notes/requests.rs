use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/note.ts")]
pub struct CreateNoteRequest {
    pub student_id: i64,
    pub date: chrono::NaiveDate,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteListQuery {
    pub student_id: i64,
}
