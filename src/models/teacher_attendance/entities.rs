use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 教师签到状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_attendance.ts")]
pub enum TeacherAttendanceStatus {
    #[ts(rename = "Tepat Waktu")]
    OnTime,
    #[ts(rename = "Terlambat")]
    Late,
    #[ts(rename = "Tidak Hadir")]
    Absent,
}

impl TeacherAttendanceStatus {
    pub const ON_TIME: &'static str = "Tepat Waktu";
    pub const LATE: &'static str = "Terlambat";
    pub const ABSENT: &'static str = "Tidak Hadir";

    pub fn as_str(&self) -> &'static str {
        match self {
            TeacherAttendanceStatus::OnTime => Self::ON_TIME,
            TeacherAttendanceStatus::Late => Self::LATE,
            TeacherAttendanceStatus::Absent => Self::ABSENT,
        }
    }
}

impl Serialize for TeacherAttendanceStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TeacherAttendanceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for TeacherAttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TeacherAttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ON_TIME => Ok(TeacherAttendanceStatus::OnTime),
            Self::LATE => Ok(TeacherAttendanceStatus::Late),
            Self::ABSENT => Ok(TeacherAttendanceStatus::Absent),
            _ => Err(format!("Invalid teacher attendance status: {s}")),
        }
    }
}

/// 教师签到记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_attendance.ts")]
pub struct TeacherAttendance {
    pub id: i64,
    pub teacher_id: i64,
    pub date: chrono::NaiveDate,
    pub check_in_at: chrono::DateTime<chrono::Utc>,
    pub check_out_at: Option<chrono::DateTime<chrono::Utc>>,
    pub status: TeacherAttendanceStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
}

/// 签到地理围栏与时间窗口设置，经纬度以字符串保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher_attendance.ts")]
pub struct AttendanceSettings {
    pub latitude: String,
    pub longitude: String,
    pub radius: u32,
    pub check_in_start: String,
    pub check_in_deadline: String,
}

/// 新建签到记录
#[derive(Debug, Clone)]
pub struct NewTeacherCheckIn {
    pub teacher_id: i64,
    pub date: chrono::NaiveDate,
    pub check_in_at: i64,
    pub status: TeacherAttendanceStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
}
