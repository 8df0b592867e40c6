use super::entities::AttendanceEntry;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SaveAttendanceRequest {
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: i64,
    pub meeting_number: i32,
    pub records: Vec<AttendanceEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceListQuery {
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}
