use super::entities::GradeEntry;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SaveGradesRequest {
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: i64,
    pub assessment_type: String,
    pub scores: Vec<GradeEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeListQuery {
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
}
