use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::PaymentService;
use super::gateway::{GATEWAY_SUCCESS_CODE, request_inquiry};
use super::signature::{inquiry_signature, verify_callback_signature};
use crate::middlewares::RequireJWT;
use crate::models::payments::{
    entities::{NewPayment, SettleOutcome},
    requests::{CreatePaymentRequest, GatewayInquiryRequest, PaymentCallbackForm},
    responses::{CreatePaymentResponse, PaymentResponse},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::random_code::generate_order_id;

fn not_configured() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
        ErrorCode::PaymentNotConfigured,
        "Payment gateway is not configured",
    ))
}

pub fn validate_payment_request(body: &CreatePaymentRequest) -> Result<(), &'static str> {
    if body.package_name.trim().is_empty() {
        return Err("Package name is required");
    }
    if body.amount <= 0 {
        return Err("Amount must be greater than 0");
    }
    Ok(())
}

/// 回调金额为字符串，网关可能带 `.00` 小数位
pub fn parse_callback_amount(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        let value: f64 = raw.parse().ok()?;
        (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
    })
}

pub async fn create_payment(
    service: &PaymentService,
    request: &HttpRequest,
    body: CreatePaymentRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    if let Err(msg) = validate_payment_request(&body) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::PaymentInvalid, msg)));
    }

    let config = &service.get_config().payment;
    if !config.is_configured() {
        return Ok(not_configured());
    }

    let order_id = generate_order_id();
    let package_name = body.package_name.trim().to_string();
    let description = body.description.trim().to_string();
    let inquiry = GatewayInquiryRequest {
        merchant_code: config.merchant_code.clone(),
        payment_amount: body.amount,
        merchant_order_id: order_id.clone(),
        product_details: if description.is_empty() {
            package_name.clone()
        } else {
            description.clone()
        },
        email: user.email.clone(),
        customer_va_name: user.display_name_or_username().to_string(),
        callback_url: config.callback_url.clone(),
        return_url: config.return_url.clone(),
        signature: inquiry_signature(&config.merchant_code, &order_id, body.amount, &config.api_key),
        expiry_period: config.expiry_minutes,
    };

    let gateway_response = match request_inquiry(config, &inquiry).await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Payment inquiry for order {} failed: {}", order_id, e);
            return Ok(ApiResponse::from_error(&e, ErrorCode::PaymentGatewayError));
        }
    };

    let Some(payment_url) = gateway_response.payment_url.clone() else {
        error!("Payment gateway returned no payment URL for order {}", order_id);
        return Ok(HttpResponse::BadGateway().json(ApiResponse::error_empty(
            ErrorCode::PaymentGatewayError,
            "Payment gateway returned no payment URL",
        )));
    };

    let storage = service.get_storage(request);
    let new_payment = NewPayment {
        order_id: order_id.clone(),
        user_id: user.id,
        package_name,
        description,
        amount: body.amount,
        reference: gateway_response.reference.clone(),
        payment_url: Some(payment_url.clone()),
    };

    match storage.create_payment(new_payment).await {
        Ok(payment) => {
            info!(
                "Payment {} created for user {} ({} IDR)",
                payment.order_id, user.id, payment.amount
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CreatePaymentResponse {
                    order_id: payment.order_id,
                    payment_url,
                    reference: payment.reference,
                },
                "Payment created successfully",
            )))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn handle_callback(
    service: &PaymentService,
    request: &HttpRequest,
    form: PaymentCallbackForm,
) -> ActixResult<HttpResponse> {
    let config = &service.get_config().payment;
    if !config.is_configured() {
        return Ok(not_configured());
    }

    if form.merchant_code != config.merchant_code
        || !verify_callback_signature(
            &form.merchant_code,
            &form.amount,
            &form.merchant_order_id,
            &config.api_key,
            &form.signature,
        )
    {
        warn!(
            "Rejected payment callback with bad signature for order {}",
            form.merchant_order_id
        );
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PaymentSignatureInvalid,
            "Invalid signature",
        )));
    }

    let Some(amount) = parse_callback_amount(&form.amount) else {
        warn!(
            "Rejected payment callback with malformed amount '{}' for order {}",
            form.amount, form.merchant_order_id
        );
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PaymentInvalid,
            "Invalid amount",
        )));
    };

    let paid = form.result_code == GATEWAY_SUCCESS_CODE;
    let storage = service.get_storage(request);

    match storage
        .settle_payment(&form.merchant_order_id, amount, paid, form.reference.clone())
        .await
    {
        Ok(SettleOutcome::Updated) => {
            info!(
                "Payment {} settled as {}",
                form.merchant_order_id,
                if paid { "paid" } else { "failed" }
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Callback processed")))
        }
        Ok(SettleOutcome::AlreadySettled) => {
            info!("Repeated callback for settled payment {}", form.merchant_order_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Payment already settled")))
        }
        Ok(SettleOutcome::NotFound) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PaymentNotFound,
            "Payment not found",
        ))),
        Ok(SettleOutcome::AmountMismatch { expected }) => {
            error!(
                "Payment callback amount {} does not match order {} amount {}",
                amount, form.merchant_order_id, expected
            );
            Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::PaymentAmountMismatch,
                "Amount does not match the order",
            )))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_payment(
    service: &PaymentService,
    request: &HttpRequest,
    order_id: &str,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    let storage = service.get_storage(request);
    match storage.get_payment_by_order_id(order_id).await {
        // 非本人订单同样返回 404
        Ok(Some(payment)) if payment.user_id == user.id || user.is_admin() => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(
                PaymentResponse { payment },
                "Payment retrieved successfully",
            ))),
        Ok(_) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PaymentNotFound,
            "Payment not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(package_name: &str, amount: i64) -> CreatePaymentRequest {
        CreatePaymentRequest {
            package_name: package_name.to_string(),
            description: String::new(),
            amount,
        }
    }

    #[test]
    fn test_validate_payment_request() {
        assert!(validate_payment_request(&request("Pro 1 Tahun", 99_000)).is_ok());
        assert!(validate_payment_request(&request("  ", 99_000)).is_err());
        assert!(validate_payment_request(&request("Pro", 0)).is_err());
        assert!(validate_payment_request(&request("Pro", -5)).is_err());
    }

    #[test]
    fn test_parse_callback_amount() {
        assert_eq!(parse_callback_amount("150000"), Some(150_000));
        assert_eq!(parse_callback_amount(" 150000.00 "), Some(150_000));
        assert_eq!(parse_callback_amount("150000.50"), None);
        assert_eq!(parse_callback_amount("seratus"), None);
    }
}
