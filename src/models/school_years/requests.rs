use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school_year.ts")]
pub struct CreateSchoolYearRequest {
    pub start_year: i32,
}
