use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 激活码
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activation.ts")]
pub struct ActivationCode {
    pub id: i64,
    pub code: String,
    pub is_used: bool,
    pub used_by: Option<i64>,
    pub used_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 兑换结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemOutcome {
    Redeemed,
    AlreadyUsed,
    NotFound,
}
