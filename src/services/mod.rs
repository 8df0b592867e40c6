pub mod activation;
pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod grades;
pub mod holidays;
pub mod ledger;
pub mod notes;
pub mod payments;
pub mod school_years;
pub mod students;
pub mod subjects;
pub mod system;
pub mod teacher_attendance;
pub mod users;

pub use activation::ActivationService;
pub use analytics::AnalyticsService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use grades::GradeService;
pub use holidays::HolidayService;
pub use ledger::LedgerService;
pub use notes::NoteService;
pub use payments::PaymentService;
pub use school_years::SchoolYearService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use system::SystemService;
pub use teacher_attendance::TeacherAttendanceService;
pub use users::UserService;
