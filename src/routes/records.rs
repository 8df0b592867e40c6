//! 出勤、成绩与学生日志的录入路由

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{AttendanceListQuery, SaveAttendanceRequest};
use crate::models::grades::requests::{GradeListQuery, SaveGradesRequest};
use crate::models::notes::requests::{CreateNoteRequest, NoteListQuery};
use crate::models::users::entities::UserRole;
use crate::services::{AttendanceService, GradeService, NoteService};

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);
static NOTE_SERVICE: Lazy<NoteService> = Lazy::new(NoteService::new_lazy);

pub async fn save_attendance(
    req: HttpRequest,
    body: web::Json<SaveAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .save_attendance(&req, body.into_inner())
        .await
}

pub async fn list_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceListQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_attendance(&req, query.into_inner())
        .await
}

pub async fn save_grades(
    req: HttpRequest,
    body: web::Json<SaveGradesRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.save_grades(&req, body.into_inner()).await
}

pub async fn list_grades(
    req: HttpRequest,
    query: web::Query<GradeListQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_grades(&req, query.into_inner()).await
}

pub async fn create_note(
    req: HttpRequest,
    body: web::Json<CreateNoteRequest>,
) -> ActixResult<HttpResponse> {
    NOTE_SERVICE.create_note(&req, body.into_inner()).await
}

pub async fn list_notes(
    req: HttpRequest,
    query: web::Query<NoteListQuery>,
) -> ActixResult<HttpResponse> {
    NOTE_SERVICE.list_notes(&req, query.into_inner()).await
}

// 三个资源分别注册，避免 /api/v1 前缀的 scope 截获其他路由
pub fn configure_record_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/attendance")
            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
            .wrap(middlewares::RequireJWT)
            .route(web::get().to(list_attendance))
            .route(web::post().to(save_attendance)),
    )
    .service(
        web::resource("/api/v1/grades")
            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
            .wrap(middlewares::RequireJWT)
            .route(web::get().to(list_grades))
            .route(web::post().to(save_grades)),
    )
    .service(
        web::resource("/api/v1/notes")
            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
            .wrap(middlewares::RequireJWT)
            .route(web::get().to(list_notes))
            .route(web::post().to(create_note)),
    );
}
