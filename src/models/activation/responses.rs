use super::entities::ActivationCode;
use crate::models::users::entities::ActivationTier;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activation.ts")]
pub struct ActivationCodeListResponse {
    pub items: Vec<ActivationCode>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activation.ts")]
pub struct RedeemCodeResponse {
    pub activation_tier: ActivationTier,
}
