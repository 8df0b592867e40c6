use super::entities::SchoolYear;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school_year.ts")]
pub struct SchoolYearListResponse {
    pub items: Vec<SchoolYear>,
}
