use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeEntry {
    pub student_id: i64,
    pub score: f64,
}

/// 一次评估的成绩记录，键为 (date, class_id, subject_id, assessment_type)
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeRecord {
    pub id: i64,
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: i64,
    pub assessment_type: String,
    pub teacher_id: i64,
    pub school_year_id: i64,
    pub scores: Vec<GradeEntry>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct GradeUpsert {
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: i64,
    pub assessment_type: String,
    pub teacher_id: i64,
    pub school_year_id: i64,
    pub scores: Vec<GradeEntry>,
}

/// 学生台账中的成绩行
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct StudentGradeEntry {
    pub date: chrono::NaiveDate,
    pub subject_id: i64,
    pub subject_name: String,
    pub kkm: f64,
    pub assessment_type: String,
    pub score: f64,
}
