use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段已是哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;
    // 列出所有在职教师
    async fn list_teachers(&self) -> Result<Vec<User>>;

    /// 学年管理方法
    // 按起始年份创建 Ganjil / Genap 两个学期
    async fn create_school_year_pair(&self, start_year: i32) -> Result<Vec<SchoolYear>>;
    async fn list_school_years(&self) -> Result<Vec<SchoolYear>>;
    async fn get_active_school_year(&self) -> Result<Option<SchoolYear>>;
    // 激活指定学年，同时停用其他学年
    async fn activate_school_year(&self, id: i64) -> Result<Option<SchoolYear>>;

    /// 班级管理方法
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn list_classes(&self, query: ClassListQuery) -> Result<Vec<Class>>;
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;

    /// 学生管理方法
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn list_students(&self, query: StudentListQuery) -> Result<StudentListResponse>;
    // 班级内在读学生
    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    // 批量转班，全部成功或全部回滚
    async fn move_students(
        &self,
        student_ids: &[i64],
        source_class_id: i64,
        target_class_id: i64,
    ) -> Result<u64>;
    // 批量毕业，全部成功或全部回滚
    async fn graduate_students(&self, student_ids: &[i64]) -> Result<u64>;

    /// 科目管理方法
    async fn create_subject(&self, subject: NewSubject) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects(&self, teacher_id: Option<i64>) -> Result<Vec<Subject>>;
    async fn update_subject(&self, id: i64, update: SubjectUpdate) -> Result<Option<Subject>>;

    /// 出勤与成绩
    // 同一 (date, class, subject, meeting) 重复提交时覆盖
    async fn upsert_attendance(&self, record: AttendanceUpsert) -> Result<AttendanceRecord>;
    async fn list_attendance(&self, query: AttendanceListQuery) -> Result<Vec<AttendanceRecord>>;
    async fn list_attendance_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAttendanceEntry>>;
    // 同一 (date, class, subject, assessment_type) 重复提交时覆盖
    async fn upsert_grades(&self, record: GradeUpsert) -> Result<GradeRecord>;
    async fn list_grades(&self, query: GradeListQuery) -> Result<Vec<GradeRecord>>;
    async fn list_grades_for_student(&self, student_id: i64) -> Result<Vec<StudentGradeEntry>>;

    /// 学生日志
    async fn create_note(
        &self,
        student_id: i64,
        teacher_id: i64,
        date: chrono::NaiveDate,
        content: String,
    ) -> Result<StudentNote>;
    async fn list_notes_for_student(&self, student_id: i64) -> Result<Vec<StudentNote>>;

    /// 教师签到
    async fn create_teacher_check_in(&self, check_in: NewTeacherCheckIn)
    -> Result<TeacherAttendance>;
    async fn get_teacher_attendance(
        &self,
        teacher_id: i64,
        date: chrono::NaiveDate,
    ) -> Result<Option<TeacherAttendance>>;
    async fn set_teacher_check_out(
        &self,
        teacher_id: i64,
        date: chrono::NaiveDate,
        check_out_at: i64,
    ) -> Result<Option<TeacherAttendance>>;
    async fn list_teacher_attendance(
        &self,
        teacher_id: i64,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<Vec<TeacherAttendance>>;
    async fn list_teacher_attendance_on(
        &self,
        date: chrono::NaiveDate,
    ) -> Result<Vec<TeacherAttendance>>;

    /// 节假日
    // 同一日期已存在时更新描述
    async fn upsert_holiday(&self, date: chrono::NaiveDate, description: String)
    -> Result<Holiday>;
    async fn list_holidays(&self, query: HolidayListQuery) -> Result<Vec<Holiday>>;
    async fn is_holiday(&self, date: chrono::NaiveDate) -> Result<bool>;
    async fn delete_holiday(&self, id: i64) -> Result<bool>;

    /// 激活码
    async fn create_activation_codes(
        &self,
        codes: Vec<String>,
        created_by: i64,
    ) -> Result<Vec<ActivationCode>>;
    async fn list_activation_codes(&self) -> Result<Vec<ActivationCode>>;
    // 条件更新，同一激活码只能成功兑换一次
    async fn redeem_activation_code(&self, code: &str, user_id: i64) -> Result<RedeemOutcome>;

    /// 支付
    async fn create_payment(&self, payment: NewPayment) -> Result<PaymentTransaction>;
    async fn get_payment_by_order_id(&self, order_id: &str)
    -> Result<Option<PaymentTransaction>>;
    // 结算回调；成功时同一事务内把买家升级为 pro
    async fn settle_payment(
        &self,
        order_id: &str,
        amount: i64,
        paid: bool,
        reference: Option<String>,
    ) -> Result<SettleOutcome>;

    /// 系统设置
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>>;
    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<SystemSetting>;
    async fn batch_update_settings(
        &self,
        updates: Vec<(String, String)>,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<Vec<SystemSetting>>;
    async fn list_setting_audits(&self, query: SettingAuditQuery)
    -> Result<SettingAuditListResponse>;

    /// 统计
    async fn get_dashboard_counts(&self) -> Result<DashboardCounts>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
