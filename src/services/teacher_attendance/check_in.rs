use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::TeacherAttendanceService;
use super::rules::{classify_check_in, validate_attendance_settings};
use crate::config::AppConfig;
use crate::errors::LakukelasError;
use crate::middlewares::RequireJWT;
use crate::models::teacher_attendance::{
    entities::NewTeacherCheckIn,
    requests::{CheckInRequest, TeacherAttendanceRangeQuery},
    responses::{GeofenceRejection, TeacherAttendanceListResponse, TeacherAttendanceResponse},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::system::DynamicConfig;
use crate::utils::geo::validate_coordinates;

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized: missing user id",
    ))
}

pub async fn check_in(
    service: &TeacherAttendanceService,
    request: &HttpRequest,
    body: CheckInRequest,
) -> ActixResult<HttpResponse> {
    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let (Some(latitude), Some(longitude)) = (body.latitude, body.longitude) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::LocationRequired,
            "Location permission required to check in",
        )));
    };
    if let Err(msg) = validate_coordinates(latitude, longitude) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::LocationRequired, msg)));
    }

    let fence = match validate_attendance_settings(&DynamicConfig::attendance_settings().await) {
        Ok(fence) => fence,
        Err(msg) => {
            warn!("Stored attendance settings are invalid: {}", msg);
            return Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                ErrorCode::AttendanceSettingsInvalid,
                "Attendance settings are misconfigured, contact an administrator",
            )));
        }
    };

    let now = AppConfig::get().school_now();
    let today = now.date_naive();
    let storage = service.get_storage(request);

    match storage.is_holiday(today).await {
        Ok(true) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::HolidayToday,
                "Today is a holiday, check-in is closed",
            )));
        }
        Ok(false) => {}
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }

    let Some(status) = classify_check_in(now.time(), fence.check_in_start, fence.check_in_deadline)
    else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CheckInTooEarly,
            format!(
                "Check-in opens at {}",
                fence.check_in_start.format("%H:%M")
            ),
        )));
    };

    let distance = fence.distance_to(latitude, longitude);
    if !fence.contains(distance) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error(
            ErrorCode::OutsideGeofence,
            GeofenceRejection {
                distance_meters: distance.round(),
                radius_meters: fence.radius,
            },
            format!(
                "You are {:.0} m from school, the allowed radius is {} m",
                distance, fence.radius
            ),
        )));
    }

    match storage.get_teacher_attendance(teacher_id, today).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadyCheckedIn,
                "You have already checked in today",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }

    let new_check_in = NewTeacherCheckIn {
        teacher_id,
        date: today,
        check_in_at: now.timestamp(),
        status,
        latitude,
        longitude,
        distance_meters: distance,
    };

    match storage.create_teacher_check_in(new_check_in).await {
        Ok(attendance) => {
            info!(
                "Teacher {} checked in ({}) at {:.0} m",
                teacher_id, attendance.status, distance
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                TeacherAttendanceResponse { attendance },
                "Checked in successfully",
            )))
        }
        // 并发签到由唯一索引拦下
        Err(LakukelasError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::AlreadyCheckedIn, "You have already checked in today"),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn check_out(
    service: &TeacherAttendanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let now = AppConfig::get().school_now();
    let storage = service.get_storage(request);

    match storage
        .set_teacher_check_out(teacher_id, now.date_naive(), now.timestamp())
        .await
    {
        Ok(Some(attendance)) => {
            info!("Teacher {} checked out", teacher_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                TeacherAttendanceResponse { attendance },
                "Checked out successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::NotCheckedIn,
            "You have not checked in today",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn list_my_attendance(
    service: &TeacherAttendanceService,
    request: &HttpRequest,
    query: TeacherAttendanceRangeQuery,
) -> ActixResult<HttpResponse> {
    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "from must not be after to",
        )));
    }

    let storage = service.get_storage(request);
    match storage
        .list_teacher_attendance(teacher_id, query.from, query.to)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TeacherAttendanceListResponse { items },
            "Attendance history retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::system::entities::KnownSettingKey;
    use crate::models::users::entities::{User, UserRole};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_user};
    use actix_web::{App, HttpMessage, test as actix_test, web};
    use once_cell::sync::Lazy;
    use serde_json::{Value, json};
    use std::sync::Arc;

    static SERVICE: Lazy<TeacherAttendanceService> =
        Lazy::new(TeacherAttendanceService::new_lazy);

    async fn check_in_as(
        req: HttpRequest,
        teacher: web::Data<User>,
        body: web::Json<CheckInRequest>,
    ) -> ActixResult<HttpResponse> {
        req.extensions_mut().insert(teacher.get_ref().clone());
        SERVICE.check_in(&req, body.into_inner()).await
    }

    #[actix_web::test]
    async fn test_check_in_handler_rejections() {
        // 全天开放签到窗口，结果不受运行时刻影响
        DynamicConfig::update(KnownSettingKey::AttendanceCheckInStart.as_str(), "00:00").await;
        DynamicConfig::update(KnownSettingKey::AttendanceCheckInDeadline.as_str(), "23:59").await;
        let fence = validate_attendance_settings(&DynamicConfig::attendance_settings().await)
            .unwrap();

        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "bu_sari", UserRole::Teacher).await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(teacher))
                .route("/check-in", web::post().to(check_in_as)),
        )
        .await;

        // 未授权定位
        let req = actix_test::TestRequest::post()
            .uri("/check-in")
            .set_json(json!({}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::LocationRequired as i32);

        let req = actix_test::TestRequest::post()
            .uri("/check-in")
            .set_json(json!({ "latitude": 91.0, "longitude": 106.8 }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        // 远离学校
        let req = actix_test::TestRequest::post()
            .uri("/check-in")
            .set_json(json!({ "latitude": fence.latitude + 1.0, "longitude": fence.longitude }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::OutsideGeofence as i32);
        assert_eq!(body["data"]["radius_meters"], fence.radius);
        assert!(body["data"]["distance_meters"].as_f64().unwrap() > 100_000.0);

        let at_school = json!({ "latitude": fence.latitude, "longitude": fence.longitude });
        let req = actix_test::TestRequest::post()
            .uri("/check-in")
            .set_json(at_school.clone())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let req = actix_test::TestRequest::post()
            .uri("/check-in")
            .set_json(at_school)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::AlreadyCheckedIn as i32);
    }
}
