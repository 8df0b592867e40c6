use crate::models::school_years::entities::SchoolYear;
use serde::Serialize;
use ts_rs::TS;

/// 存储层返回的计数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub teachers: u64,
    pub active_students: u64,
    pub classes: u64,
    pub subjects: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct TodayCheckIns {
    pub on_time: u64,
    pub late: u64,
    pub not_checked_in: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct AdminAnalyticsResponse {
    pub teachers: u64,
    pub active_students: u64,
    pub classes: u64,
    pub subjects: u64,
    pub today: chrono::NaiveDate,
    pub is_holiday: bool,
    pub check_ins: TodayCheckIns,
    pub active_school_year: Option<SchoolYear>,
}
