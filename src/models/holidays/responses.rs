use super::entities::Holiday;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/holiday.ts")]
pub struct HolidayListResponse {
    pub items: Vec<Holiday>,
}
