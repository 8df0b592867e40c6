//! 支付网关 HTTP 客户端

use std::time::Duration;
use tracing::{debug, error};

use crate::config::PaymentConfig;
use crate::errors::{LakukelasError, Result};
use crate::models::payments::{
    requests::GatewayInquiryRequest, responses::GatewayInquiryResponse,
};

/// 网关成功状态码
pub const GATEWAY_SUCCESS_CODE: &str = "00";

fn inquiry_url(base_url: &str) -> String {
    format!("{}/v2/inquiry", base_url.trim_end_matches('/'))
}

pub async fn request_inquiry(
    config: &PaymentConfig,
    body: &GatewayInquiryRequest,
) -> Result<GatewayInquiryResponse> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(|e| LakukelasError::gateway(format!("Failed to create HTTP client: {e}")))?;

    debug!("Sending payment inquiry for order {}", body.merchant_order_id);
    let response = client
        .post(inquiry_url(&config.base_url))
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        error!("Payment gateway returned {}: {}", status, text);
        return Err(LakukelasError::gateway(format!(
            "Payment gateway returned HTTP {status}"
        )));
    }

    let inquiry: GatewayInquiryResponse = response.json().await?;
    if inquiry.status_code.as_deref() != Some(GATEWAY_SUCCESS_CODE) {
        return Err(LakukelasError::gateway(format!(
            "Payment gateway rejected the inquiry: {}",
            inquiry
                .status_message
                .as_deref()
                .unwrap_or("unknown error")
        )));
    }
    Ok(inquiry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_url() {
        assert_eq!(
            inquiry_url("https://sandbox.duitku.com/webapi/api/merchant/"),
            "https://sandbox.duitku.com/webapi/api/merchant/v2/inquiry"
        );
    }
}
