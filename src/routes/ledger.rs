use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::ledger::StudentLedgerQuery;
use crate::models::users::entities::UserRole;
use crate::services::LedgerService;

static LEDGER_SERVICE: Lazy<LedgerService> = Lazy::new(LedgerService::new_lazy);

pub async fn get_student_ledger(
    req: HttpRequest,
    query: web::Query<StudentLedgerQuery>,
) -> ActixResult<HttpResponse> {
    LEDGER_SERVICE
        .get_student_ledger(&req, query.into_inner())
        .await
}

pub fn configure_ledger_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/student-ledger")
            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
            .wrap(middlewares::RequireJWT)
            .route(web::get().to(get_student_ledger)),
    );
}
