use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::school_years::requests::CreateSchoolYearRequest;
use crate::models::users::entities::UserRole;
use crate::services::SchoolYearService;
use crate::utils::SafeIDI64;

static SCHOOL_YEAR_SERVICE: Lazy<SchoolYearService> = Lazy::new(SchoolYearService::new_lazy);

pub async fn create_school_year(
    req: HttpRequest,
    body: web::Json<CreateSchoolYearRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_YEAR_SERVICE
        .create_school_year(&req, body.into_inner())
        .await
}

pub async fn list_school_years(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHOOL_YEAR_SERVICE.list_school_years(&req).await
}

pub async fn get_active_school_year(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHOOL_YEAR_SERVICE.get_active_school_year(&req).await
}

pub async fn activate_school_year(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHOOL_YEAR_SERVICE.activate_school_year(&req, id.0).await
}

pub fn configure_school_year_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/school-years")
            .wrap(middlewares::RequireJWT)
            // 教师录入前需要读取当前学年
            .route("/active", web::get().to(get_active_school_year))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(list_school_years))
                    .route("", web::post().to(create_school_year))
                    .route("/{id}/activate", web::put().to(activate_school_year)),
            ),
    );
}
