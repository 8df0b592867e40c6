pub mod activation;
pub mod analytics;
pub mod auth;
pub mod classes;
pub mod frontend;
pub mod holidays;
pub mod ledger;
pub mod payments;
pub mod records;
pub mod school_years;
pub mod students;
pub mod subjects;
pub mod system;
pub mod teacher_attendance;
pub mod users;

pub use activation::configure_activation_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use frontend::configure_frontend_routes;
pub use ledger::configure_ledger_routes;
pub use payments::configure_payment_routes;
pub use records::configure_record_routes;
pub use school_years::configure_school_year_routes;
pub use students::configure_student_routes;
pub use subjects::configure_subject_routes;
pub use system::configure_system_routes;
pub use teacher_attendance::configure_teacher_attendance_routes;
pub use users::configure_user_routes;

use actix_web::web;

use crate::middlewares;
use crate::models::users::entities::UserRole;

/// 管理员接口共用一个 /api/v1/admin scope
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .configure(teacher_attendance::configure_admin)
            .configure(holidays::configure_admin)
            .configure(activation::configure_admin)
            .configure(analytics::configure_admin),
    );
}
