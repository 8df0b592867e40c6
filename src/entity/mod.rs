//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod activation_codes;
pub mod attendance;
pub mod classes;
pub mod grades;
pub mod holidays;
pub mod payment_transactions;
pub mod school_years;
pub mod student_notes;
pub mod students;
pub mod subjects;
pub mod system_settings;
pub mod system_settings_audit;
pub mod teacher_attendance;
pub mod users;

/// 秒级时间戳转 UTC 时间
pub(crate) fn ts_to_utc(ts: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
