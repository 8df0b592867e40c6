use super::entities::{AttendanceSettings, TeacherAttendance, TeacherAttendanceStatus};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_attendance.ts")]
pub struct TeacherAttendanceResponse {
    pub attendance: TeacherAttendance,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_attendance.ts")]
pub struct TeacherAttendanceListResponse {
    pub items: Vec<TeacherAttendance>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_attendance.ts")]
pub struct AttendanceSettingsResponse {
    pub settings: AttendanceSettings,
}

/// 某日单个教师的汇总行
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_attendance.ts")]
pub struct TeacherRecapRow {
    pub teacher_id: i64,
    pub teacher_name: String,
    pub status: Option<TeacherAttendanceStatus>,
    pub check_in_at: Option<chrono::DateTime<chrono::Utc>>,
    pub check_out_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_attendance.ts")]
pub struct TeacherRecapResponse {
    pub date: chrono::NaiveDate,
    pub is_holiday: bool,
    /// 当天结束后未签到者才记为缺勤
    pub day_closed: bool,
    pub rows: Vec<TeacherRecapRow>,
}

/// 超出围栏时随错误返回的距离信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_attendance.ts")]
pub struct GeofenceRejection {
    pub distance_meters: f64,
    pub radius_meters: u32,
}
