use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TeacherAttendanceService, validate_attendance_settings};
use crate::middlewares::RequireJWT;
use crate::models::system::entities::KnownSettingKey;
use crate::models::teacher_attendance::{
    entities::AttendanceSettings, responses::AttendanceSettingsResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::system::{DynamicConfig, settings::client_ip};

pub async fn get_attendance_settings() -> ActixResult<HttpResponse> {
    let settings = DynamicConfig::attendance_settings().await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceSettingsResponse { settings },
        "Attendance settings retrieved successfully",
    )))
}

fn settings_to_pairs(settings: &AttendanceSettings) -> Vec<(String, String)> {
    vec![
        (
            KnownSettingKey::AttendanceLatitude.as_str().to_string(),
            settings.latitude.trim().to_string(),
        ),
        (
            KnownSettingKey::AttendanceLongitude.as_str().to_string(),
            settings.longitude.trim().to_string(),
        ),
        (
            KnownSettingKey::AttendanceRadius.as_str().to_string(),
            settings.radius.to_string(),
        ),
        (
            KnownSettingKey::AttendanceCheckInStart.as_str().to_string(),
            settings.check_in_start.trim().to_string(),
        ),
        (
            KnownSettingKey::AttendanceCheckInDeadline.as_str().to_string(),
            settings.check_in_deadline.trim().to_string(),
        ),
    ]
}

pub async fn update_attendance_settings(
    service: &TeacherAttendanceService,
    request: &HttpRequest,
    body: AttendanceSettings,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    if let Err(msg) = validate_attendance_settings(&body) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AttendanceSettingsInvalid, msg)));
    }

    let pairs = settings_to_pairs(&body);
    let storage = service.get_storage(request);
    if let Err(e) = storage
        .batch_update_settings(pairs.clone(), user_id, client_ip(request))
        .await
    {
        return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError));
    }

    for (key, value) in &pairs {
        DynamicConfig::update(key, value).await;
    }
    info!("Attendance settings updated by user {}", user_id);

    let settings = DynamicConfig::attendance_settings().await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceSettingsResponse { settings },
        "Attendance settings updated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_to_pairs_trims() {
        let pairs = settings_to_pairs(&AttendanceSettings {
            latitude: " -6.2 ".to_string(),
            longitude: "106.8".to_string(),
            radius: 150,
            check_in_start: "06:30".to_string(),
            check_in_deadline: "07:00 ".to_string(),
        });

        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs[0], ("attendance.latitude".to_string(), "-6.2".to_string()));
        assert_eq!(pairs[2], ("attendance.radius".to_string(), "150".to_string()));
        assert_eq!(pairs[4].1, "07:00");
    }
}
