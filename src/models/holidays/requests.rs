use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/holiday.ts")]
pub struct SaveHolidayRequest {
    pub date: chrono::NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidayListQuery {
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}
