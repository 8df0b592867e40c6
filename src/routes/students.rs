use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::students::requests::{
    CreateStudentRequest, GraduateStudentsRequest, MoveStudentsRequest, StudentListParams,
    UpdateStudentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::StudentService;
use crate::utils::SafeIDI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn create_student(
    req: HttpRequest,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(&req, body.into_inner()).await
}

pub async fn update_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    body: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&req, student_id.0, body.into_inner())
        .await
}

pub async fn move_students(
    req: HttpRequest,
    body: web::Json<MoveStudentsRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.move_students(&req, body.into_inner()).await
}

pub async fn graduate_students(
    req: HttpRequest,
    body: web::Json<GraduateStudentsRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .graduate_students(&req, body.into_inner())
        .await
}

pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .service(
                        web::resource("")
                            .route(web::get().to(list_students))
                            .route(web::post().to(create_student)),
                    )
                    .route("/move", web::post().to(move_students))
                    .route(
                        "/graduate",
                        web::post()
                            .to(graduate_students)
                            // 毕业处理仅限管理员
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route("/{id}", web::put().to(update_student)),
            ),
    );
}
