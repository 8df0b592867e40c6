use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::{DynamicConfig, SystemService};
use crate::middlewares::RequireJWT;
use crate::models::{
    AppStartTime, ApiResponse, ErrorCode,
    system::{
        entities::{KnownSettingKey, SettingValueType},
        requests::{BatchUpdateSettingsRequest, SettingAuditQuery, UpdateSettingRequest},
        responses::{AdminSettingsListResponse, SettingResponse, SystemSettingsResponse},
    },
};
use crate::services::teacher_attendance::validate_attendance_settings;

/// 按配置键的类型校验取值
pub fn validate_setting_value(key: KnownSettingKey, value: &str) -> Result<(), String> {
    match key.value_type() {
        SettingValueType::String => {
            if value.trim().is_empty() {
                return Err(format!("{} 不能为空", key.as_str()));
            }
        }
        SettingValueType::Integer => {
            let n: i64 = value
                .trim()
                .parse()
                .map_err(|_| format!("{} 必须是整数", key.as_str()))?;
            if n <= 0 {
                return Err(format!("{} 必须大于 0", key.as_str()));
            }
        }
        SettingValueType::Float => {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("{} 必须是数字", key.as_str()))?;
        }
        SettingValueType::Boolean => {
            value
                .trim()
                .parse::<bool>()
                .map_err(|_| format!("{} 必须是 true 或 false", key.as_str()))?;
        }
        SettingValueType::JsonArray => {
            serde_json::from_str::<Vec<String>>(value)
                .map_err(|_| format!("{} 必须是字符串数组", key.as_str()))?;
        }
    }
    Ok(())
}

/// 校验一批更新；涉及签到设置时与当前值合并后整体校验
async fn validate_updates(updates: &[(String, String)]) -> Result<(), String> {
    let mut attendance = DynamicConfig::attendance_settings().await;
    let mut touches_attendance = false;

    for (key, value) in updates {
        let known: KnownSettingKey = key.parse()?;
        validate_setting_value(known, value)?;

        if known.is_attendance() {
            touches_attendance = true;
            match known {
                KnownSettingKey::AttendanceLatitude => attendance.latitude = value.clone(),
                KnownSettingKey::AttendanceLongitude => attendance.longitude = value.clone(),
                KnownSettingKey::AttendanceRadius => {
                    attendance.radius = value
                        .trim()
                        .parse()
                        .map_err(|_| "attendance.radius 超出范围".to_string())?
                }
                KnownSettingKey::AttendanceCheckInStart => {
                    attendance.check_in_start = value.clone()
                }
                KnownSettingKey::AttendanceCheckInDeadline => {
                    attendance.check_in_deadline = value.clone()
                }
                _ => {}
            }
        }
    }

    if touches_attendance {
        validate_attendance_settings(&attendance)?;
    }
    Ok(())
}

pub(crate) fn client_ip(req: &HttpRequest) -> Option<String> {
    req.connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string())
}

/// 获取公开系统信息（只读）
pub async fn get_settings(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|t| {
            chrono::Utc::now()
                .signed_duration_since(t.start_datetime)
                .num_seconds()
        })
        .unwrap_or_default();

    let response = SystemSettingsResponse {
        system_name: DynamicConfig::system_name().await,
        environment: config.app.environment.clone(),
        log_level: config.app.log_level.clone(),
        payment_enabled: config.payment.is_configured(),
        uptime_seconds,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Settings retrieved successfully",
    )))
}

/// 获取所有管理员配置
pub async fn get_admin_settings(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_all_settings().await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AdminSettingsListResponse { settings },
            "Admin settings retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

/// 更新单个配置
pub async fn update_setting(
    service: &SystemService,
    request: &HttpRequest,
    key: String,
    body: UpdateSettingRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let updates = vec![(key.clone(), body.value.clone())];
    if let Err(msg) = validate_updates(&updates).await {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request);
    match storage
        .update_setting(&key, &body.value, user_id, client_ip(request))
        .await
    {
        Ok(setting) => {
            DynamicConfig::update(&key, &body.value).await;
            tracing::info!("Setting {} updated by user {}", key, user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SettingResponse { setting },
                "Setting updated successfully",
            )))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

/// 批量更新配置（单个事务）
pub async fn batch_update_settings(
    service: &SystemService,
    request: &HttpRequest,
    body: BatchUpdateSettingsRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let updates: Vec<(String, String)> = body
        .settings
        .into_iter()
        .map(|item| (item.key, item.value))
        .collect();
    if updates.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "settings 不能为空",
        )));
    }
    if let Err(msg) = validate_updates(&updates).await {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request);
    match storage
        .batch_update_settings(updates.clone(), user_id, client_ip(request))
        .await
    {
        Ok(settings) => {
            for (key, value) in &updates {
                DynamicConfig::update(key, value).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AdminSettingsListResponse { settings },
                "Settings updated successfully",
            )))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

/// 获取审计日志
pub async fn get_setting_audits(
    service: &SystemService,
    request: &HttpRequest,
    query: SettingAuditQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_setting_audits(query).await {
        Ok(audits) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            audits,
            "Setting audits retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_setting_rejects_text_and_zero() {
        assert!(validate_setting_value(KnownSettingKey::AttendanceRadius, "abc").is_err());
        assert!(validate_setting_value(KnownSettingKey::AttendanceRadius, "0").is_err());
        assert!(validate_setting_value(KnownSettingKey::AttendanceRadius, "150").is_ok());
    }

    #[test]
    fn test_json_array_setting() {
        assert!(
            validate_setting_value(
                KnownSettingKey::CorsAllowedOrigins,
                r#"["https://lakukelas.id"]"#
            )
            .is_ok()
        );
        assert!(validate_setting_value(KnownSettingKey::CorsAllowedOrigins, "https://x").is_err());
    }

    #[test]
    fn test_float_setting() {
        assert!(validate_setting_value(KnownSettingKey::AttendanceLatitude, "-6.2").is_ok());
        assert!(validate_setting_value(KnownSettingKey::AttendanceLatitude, "utara").is_err());
    }
}
