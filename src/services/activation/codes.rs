use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::ActivationService;
use crate::middlewares::RequireJWT;
use crate::middlewares::require_jwt::user_cache_key;
use crate::models::activation::{
    entities::RedeemOutcome,
    requests::{CreateCodesRequest, MAX_CODES_PER_BATCH, RedeemCodeRequest},
    responses::{ActivationCodeListResponse, RedeemCodeResponse},
};
use crate::models::users::entities::ActivationTier;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;
use crate::utils::random_code::generate_activation_code;

/// 规范化用户输入的激活码
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

pub async fn create_codes(
    service: &ActivationService,
    request: &HttpRequest,
    body: CreateCodesRequest,
) -> ActixResult<HttpResponse> {
    let Some(admin_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    if !(1..=MAX_CODES_PER_BATCH).contains(&body.count) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("count must be between 1 and {MAX_CODES_PER_BATCH}"),
        )));
    }

    let codes: Vec<String> = (0..body.count).map(|_| generate_activation_code()).collect();
    let storage = service.get_storage(request);

    match storage.create_activation_codes(codes, admin_id).await {
        Ok(items) => {
            info!("Admin {} generated {} activation codes", admin_id, items.len());
            Ok(HttpResponse::Created().json(ApiResponse::success(
                ActivationCodeListResponse { items },
                "Activation codes generated successfully",
            )))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn list_codes(
    service: &ActivationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.list_activation_codes().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ActivationCodeListResponse { items },
            "Activation codes retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn redeem_code(
    service: &ActivationService,
    request: &HttpRequest,
    body: RedeemCodeRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    if user.is_pro() {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            RedeemCodeResponse {
                activation_tier: ActivationTier::Pro,
            },
            "Account is already on the Pro tier",
        )));
    }

    let code = normalize_code(&body.code);
    if code.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ActivationCodeInvalid,
            "Activation code is required",
        )));
    }

    let storage = service.get_storage(request);
    match storage.redeem_activation_code(&code, user.id).await {
        Ok(RedeemOutcome::Redeemed) => {
            // 缓存里的用户资料仍是 free，需要失效
            if let Some(token) = JwtUtils::extract_access_token(request) {
                service.get_cache(request).remove(&user_cache_key(&token)).await;
            }
            info!("User {} upgraded to Pro with an activation code", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                RedeemCodeResponse {
                    activation_tier: ActivationTier::Pro,
                },
                "Activation code redeemed successfully",
            )))
        }
        Ok(RedeemOutcome::AlreadyUsed) => {
            warn!("User {} tried a used activation code", user.id);
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ActivationCodeUsed,
                "Activation code has already been used",
            )))
        }
        Ok(RedeemOutcome::NotFound) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ActivationCodeInvalid,
            "Activation code is invalid",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  lk-abcd-1234-wxyz "), "LK-ABCD-1234-WXYZ");
        assert_eq!(normalize_code("   "), "");
    }
}
