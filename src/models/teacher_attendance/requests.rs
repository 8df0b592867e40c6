use serde::Deserialize;
use ts_rs::TS;

/// 经纬度缺失表示前端未获得定位权限
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_attendance.ts")]
pub struct CheckInRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeacherAttendanceRangeQuery {
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecapQuery {
    pub date: Option<chrono::NaiveDate>,
}
