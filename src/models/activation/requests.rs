use serde::Deserialize;
use ts_rs::TS;

pub const MAX_CODES_PER_BATCH: u32 = 100;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activation.ts")]
pub struct CreateCodesRequest {
    pub count: u32,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activation.ts")]
pub struct RedeemCodeRequest {
    pub code: String,
}
