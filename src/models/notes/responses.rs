use super::entities::StudentNote;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/note.ts")]
pub struct NoteListResponse {
    pub items: Vec<StudentNote>,
}
