use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct CreatePaymentRequest {
    pub package_name: String,
    pub description: String,
    pub amount: i64,
}

/// 网关回调表单
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallbackForm {
    pub merchant_code: String,
    pub amount: String,
    pub merchant_order_id: String,
    #[serde(default)]
    pub product_detail: Option<String>,
    #[serde(default)]
    pub payment_code: Option<String>,
    pub result_code: String,
    #[serde(default)]
    pub reference: Option<String>,
    pub signature: String,
}

/// 网关 inquiry 请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayInquiryRequest {
    pub merchant_code: String,
    pub payment_amount: i64,
    pub merchant_order_id: String,
    pub product_details: String,
    pub email: String,
    pub customer_va_name: String,
    pub callback_url: String,
    pub return_url: String,
    pub signature: String,
    pub expiry_period: u32,
}
