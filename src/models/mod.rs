//! 数据模型定义
//!
//! 按业务模块划分，每个模块通常包含 entities / requests / responses 三部分。

pub mod activation;
pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
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

pub use common::{ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
