use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::teacher_attendance::{
    entities::AttendanceSettings,
    requests::{CheckInRequest, RecapQuery, TeacherAttendanceRangeQuery},
};
use crate::models::users::entities::UserRole;
use crate::services::TeacherAttendanceService;

static TEACHER_ATTENDANCE_SERVICE: Lazy<TeacherAttendanceService> =
    Lazy::new(TeacherAttendanceService::new_lazy);

pub async fn check_in(
    req: HttpRequest,
    body: web::Json<CheckInRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_ATTENDANCE_SERVICE
        .check_in(&req, body.into_inner())
        .await
}

pub async fn check_out(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_ATTENDANCE_SERVICE.check_out(&req).await
}

pub async fn list_my_attendance(
    req: HttpRequest,
    query: web::Query<TeacherAttendanceRangeQuery>,
) -> ActixResult<HttpResponse> {
    TEACHER_ATTENDANCE_SERVICE
        .list_my_attendance(&req, query.into_inner())
        .await
}

pub async fn get_settings() -> ActixResult<HttpResponse> {
    TEACHER_ATTENDANCE_SERVICE.get_settings().await
}

pub async fn update_settings(
    req: HttpRequest,
    body: web::Json<AttendanceSettings>,
) -> ActixResult<HttpResponse> {
    TEACHER_ATTENDANCE_SERVICE
        .update_settings(&req, body.into_inner())
        .await
}

pub async fn recap(req: HttpRequest, query: web::Query<RecapQuery>) -> ActixResult<HttpResponse> {
    TEACHER_ATTENDANCE_SERVICE
        .recap(&req, query.into_inner())
        .await
}

pub fn configure_teacher_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teacher-attendance")
            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/check-in", web::post().to(check_in))
            .route("/check-out", web::post().to(check_out))
            .route("/me", web::get().to(list_my_attendance)),
    );
}

/// 挂在 /api/v1/admin 下
pub fn configure_admin(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/attendance-settings")
            .route(web::get().to(get_settings))
            .route(web::put().to(update_settings)),
    )
    .route("/teacher-attendance/recap", web::get().to(recap));
}
