//! 学生台账
//!
//! 台账由成绩、出勤、日志三部分组成，每部分独立查询，单独失败不影响其他部分。

use crate::models::attendance::entities::StudentAttendanceEntry;
use crate::models::grades::entities::StudentGradeEntry;
use crate::models::notes::entities::StudentNote;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 台账分区名
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/ledger.ts")]
pub enum LedgerSection {
    Grades,
    Attendance,
    Notes,
}

/// 台账中失败的分区及其原因
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ledger.ts")]
pub struct LedgerSectionError {
    pub section: LedgerSection,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ledger.ts")]
pub struct StudentLedgerResponse {
    pub grades: Vec<StudentGradeEntry>,
    pub attendance: Vec<StudentAttendanceEntry>,
    pub notes: Vec<StudentNote>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<LedgerSectionError>,
}

/// `GET /api/student-ledger` 的查询参数，保持原样以便自行校验
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentLedgerQuery {
    #[serde(rename = "studentId")]
    pub student_id: Option<String>,
}

/// 全部分区失败时的响应体
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ledger.ts")]
pub struct LedgerErrorResponse {
    pub error: String,
}
