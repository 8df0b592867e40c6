//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod activation;
mod analytics;
mod attendance;
mod classes;
mod grades;
mod holidays;
mod notes;
mod payments;
mod school_years;
mod students;
mod subjects;
mod system_settings;
mod teacher_attendance;
mod users;

use crate::config::AppConfig;
use crate::errors::{LakukelasError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 基于已有连接创建存储（同样会执行迁移）
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LakukelasError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LakukelasError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LakukelasError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LakukelasError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 数据库错误归类：唯一约束冲突 → Conflict，外键缺失 → Validation
pub(crate) fn map_db_err(context: &str, e: DbErr) -> LakukelasError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            LakukelasError::conflict(format!("{context}失败: 记录已存在"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            LakukelasError::validation(format!("{context}失败: 关联记录不存在"))
        }
        _ => LakukelasError::database_operation(format!("{context}失败: {e}")),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::classes::{entities::Class, requests::CreateClassRequest};
    use crate::models::students::{
        entities::{Gender, Student},
        requests::CreateStudentRequest,
    };
    use crate::models::subjects::entities::{NewSubject, Subject};
    use crate::models::users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    };
    use sea_orm::{ConnectOptions, Database};

    /// 单连接的内存 SQLite，迁移后返回
    pub async fn memory_storage() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        SeaOrmStorage::from_connection(db).await.unwrap()
    }

    pub async fn seed_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
        storage
            .create_user_impl(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@sekolah.sch.id"),
                password: "hash".to_string(),
                role,
                display_name: None,
            })
            .await
            .unwrap()
    }

    pub async fn seed_class(storage: &SeaOrmStorage, name: &str, teacher_id: i64) -> Class {
        storage
            .create_class_impl(CreateClassRequest {
                name: name.to_string(),
                teacher_id: Some(teacher_id),
            })
            .await
            .unwrap()
    }

    pub async fn seed_student(
        storage: &SeaOrmStorage,
        name: &str,
        nis: &str,
        class_id: i64,
    ) -> Student {
        storage
            .create_student_impl(CreateStudentRequest {
                name: name.to_string(),
                nis: nis.to_string(),
                class_id,
                gender: Gender::P,
            })
            .await
            .unwrap()
    }

    pub async fn seed_subject(
        storage: &SeaOrmStorage,
        name: &str,
        kkm: f64,
        teacher_id: i64,
    ) -> Subject {
        storage
            .create_subject_impl(NewSubject {
                name: name.to_string(),
                kkm,
                teacher_id,
            })
            .await
            .unwrap()
    }
}

// Storage trait 实现
use crate::models::{
    activation::entities::{ActivationCode, RedeemOutcome},
    analytics::DashboardCounts,
    attendance::{
        entities::{AttendanceRecord, AttendanceUpsert, StudentAttendanceEntry},
        requests::AttendanceListQuery,
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
    },
    grades::{
        entities::{GradeRecord, GradeUpsert, StudentGradeEntry},
        requests::GradeListQuery,
    },
    holidays::{entities::Holiday, requests::HolidayListQuery},
    notes::entities::StudentNote,
    payments::entities::{NewPayment, PaymentTransaction, SettleOutcome},
    school_years::entities::SchoolYear,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    subjects::entities::{NewSubject, Subject, SubjectUpdate},
    system::{
        entities::SystemSetting, requests::SettingAuditQuery, responses::SettingAuditListResponse,
    },
    teacher_attendance::entities::{NewTeacherCheckIn, TeacherAttendance},
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn list_teachers(&self) -> Result<Vec<User>> {
        self.list_teachers_impl().await
    }

    // 学年模块
    async fn create_school_year_pair(&self, start_year: i32) -> Result<Vec<SchoolYear>> {
        self.create_school_year_pair_impl(start_year).await
    }

    async fn list_school_years(&self) -> Result<Vec<SchoolYear>> {
        self.list_school_years_impl().await
    }

    async fn get_active_school_year(&self) -> Result<Option<SchoolYear>> {
        self.get_active_school_year_impl().await
    }

    async fn activate_school_year(&self, id: i64) -> Result<Option<SchoolYear>> {
        self.activate_school_year_impl(id).await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes(&self, query: ClassListQuery) -> Result<Vec<Class>> {
        self.list_classes_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    // 学生模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn list_students(&self, query: StudentListQuery) -> Result<StudentListResponse> {
        self.list_students_impl(query).await
    }

    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_class_impl(class_id).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn move_students(
        &self,
        student_ids: &[i64],
        source_class_id: i64,
        target_class_id: i64,
    ) -> Result<u64> {
        self.move_students_impl(student_ids, source_class_id, target_class_id)
            .await
    }

    async fn graduate_students(&self, student_ids: &[i64]) -> Result<u64> {
        self.graduate_students_impl(student_ids).await
    }

    // 科目模块
    async fn create_subject(&self, subject: NewSubject) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn list_subjects(&self, teacher_id: Option<i64>) -> Result<Vec<Subject>> {
        self.list_subjects_impl(teacher_id).await
    }

    async fn update_subject(&self, id: i64, update: SubjectUpdate) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    // 出勤与成绩模块
    async fn upsert_attendance(&self, record: AttendanceUpsert) -> Result<AttendanceRecord> {
        self.upsert_attendance_impl(record).await
    }

    async fn list_attendance(&self, query: AttendanceListQuery) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_impl(query).await
    }

    async fn list_attendance_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAttendanceEntry>> {
        self.list_attendance_for_student_impl(student_id).await
    }

    async fn upsert_grades(&self, record: GradeUpsert) -> Result<GradeRecord> {
        self.upsert_grades_impl(record).await
    }

    async fn list_grades(&self, query: GradeListQuery) -> Result<Vec<GradeRecord>> {
        self.list_grades_impl(query).await
    }

    async fn list_grades_for_student(&self, student_id: i64) -> Result<Vec<StudentGradeEntry>> {
        self.list_grades_for_student_impl(student_id).await
    }

    // 日志模块
    async fn create_note(
        &self,
        student_id: i64,
        teacher_id: i64,
        date: chrono::NaiveDate,
        content: String,
    ) -> Result<StudentNote> {
        self.create_note_impl(student_id, teacher_id, date, content)
            .await
    }

    async fn list_notes_for_student(&self, student_id: i64) -> Result<Vec<StudentNote>> {
        self.list_notes_for_student_impl(student_id).await
    }

    // 教师签到模块
    async fn create_teacher_check_in(
        &self,
        check_in: NewTeacherCheckIn,
    ) -> Result<TeacherAttendance> {
        self.create_teacher_check_in_impl(check_in).await
    }

    async fn get_teacher_attendance(
        &self,
        teacher_id: i64,
        date: chrono::NaiveDate,
    ) -> Result<Option<TeacherAttendance>> {
        self.get_teacher_attendance_impl(teacher_id, date).await
    }

    async fn set_teacher_check_out(
        &self,
        teacher_id: i64,
        date: chrono::NaiveDate,
        check_out_at: i64,
    ) -> Result<Option<TeacherAttendance>> {
        self.set_teacher_check_out_impl(teacher_id, date, check_out_at)
            .await
    }

    async fn list_teacher_attendance(
        &self,
        teacher_id: i64,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<Vec<TeacherAttendance>> {
        self.list_teacher_attendance_impl(teacher_id, from, to).await
    }

    async fn list_teacher_attendance_on(
        &self,
        date: chrono::NaiveDate,
    ) -> Result<Vec<TeacherAttendance>> {
        self.list_teacher_attendance_on_impl(date).await
    }

    // 节假日模块
    async fn upsert_holiday(
        &self,
        date: chrono::NaiveDate,
        description: String,
    ) -> Result<Holiday> {
        self.upsert_holiday_impl(date, description).await
    }

    async fn list_holidays(&self, query: HolidayListQuery) -> Result<Vec<Holiday>> {
        self.list_holidays_impl(query).await
    }

    async fn is_holiday(&self, date: chrono::NaiveDate) -> Result<bool> {
        self.is_holiday_impl(date).await
    }

    async fn delete_holiday(&self, id: i64) -> Result<bool> {
        self.delete_holiday_impl(id).await
    }

    // 激活码模块
    async fn create_activation_codes(
        &self,
        codes: Vec<String>,
        created_by: i64,
    ) -> Result<Vec<ActivationCode>> {
        self.create_activation_codes_impl(codes, created_by).await
    }

    async fn list_activation_codes(&self) -> Result<Vec<ActivationCode>> {
        self.list_activation_codes_impl().await
    }

    async fn redeem_activation_code(&self, code: &str, user_id: i64) -> Result<RedeemOutcome> {
        self.redeem_activation_code_impl(code, user_id).await
    }

    // 支付模块
    async fn create_payment(&self, payment: NewPayment) -> Result<PaymentTransaction> {
        self.create_payment_impl(payment).await
    }

    async fn get_payment_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<PaymentTransaction>> {
        self.get_payment_by_order_id_impl(order_id).await
    }

    async fn settle_payment(
        &self,
        order_id: &str,
        amount: i64,
        paid: bool,
        reference: Option<String>,
    ) -> Result<SettleOutcome> {
        self.settle_payment_impl(order_id, amount, paid, reference).await
    }

    // 系统设置模块
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>> {
        self.list_all_settings_impl().await
    }

    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<SystemSetting> {
        self.update_setting_impl(key, value, user_id, ip_address)
            .await
    }

    async fn batch_update_settings(
        &self,
        updates: Vec<(String, String)>,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<Vec<SystemSetting>> {
        self.batch_update_settings_impl(updates, user_id, ip_address)
            .await
    }

    async fn list_setting_audits(
        &self,
        query: SettingAuditQuery,
    ) -> Result<SettingAuditListResponse> {
        self.list_setting_audits_impl(query).await
    }

    // 统计模块
    async fn get_dashboard_counts(&self) -> Result<DashboardCounts> {
        self.get_dashboard_counts_impl().await
    }
}
