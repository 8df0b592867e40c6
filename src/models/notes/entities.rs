use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 教师对学生的日志记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/note.ts")]
pub struct StudentNote {
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub date: chrono::NaiveDate,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
