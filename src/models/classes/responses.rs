use super::entities::Class;
use crate::models::attendance::entities::AttendanceStatus;
use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassResponse {
    pub class: Class,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub items: Vec<Class>,
}

/// 单个学生的成绩与出勤表现
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct StudentPerformance {
    pub student_id: i64,
    pub name: String,
    pub nis: String,
    pub average_score: Option<f64>,
    pub score_count: usize,
    /// 低于科目 KKM 的分数个数
    pub below_kkm_count: usize,
    pub attendance: BTreeMap<AttendanceStatus, usize>,
    /// Hadir / 全部出勤记录，无记录时为空
    pub attendance_rate: Option<f64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassPerformanceResponse {
    pub class: Class,
    pub students: Vec<StudentPerformance>,
}
