use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学生出勤状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceStatus {
    Hadir,
    Sakit,
    Izin,
    Alpa,
}

/// 单个学生的出勤条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceEntry {
    pub student_id: i64,
    pub status: AttendanceStatus,
}

/// 一次课的出勤记录，键为 (date, class_id, subject_id, meeting_number)
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: i64,
    pub meeting_number: i32,
    pub teacher_id: i64,
    pub school_year_id: i64,
    pub records: Vec<AttendanceEntry>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 写入存储层的出勤记录
#[derive(Debug, Clone)]
pub struct AttendanceUpsert {
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: i64,
    pub meeting_number: i32,
    pub teacher_id: i64,
    pub school_year_id: i64,
    pub records: Vec<AttendanceEntry>,
}

/// 学生台账中的出勤行
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StudentAttendanceEntry {
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub meeting_number: i32,
    pub status: AttendanceStatus,
}
