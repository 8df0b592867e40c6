//! 预导入模块，方便使用

pub use super::activation_codes::{
    ActiveModel as ActivationCodeActiveModel, Entity as ActivationCodes,
    Model as ActivationCodeModel,
};
pub use super::attendance::{
    ActiveModel as AttendanceActiveModel, Entity as Attendance, Model as AttendanceModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::holidays::{
    ActiveModel as HolidayActiveModel, Entity as Holidays, Model as HolidayModel,
};
pub use super::payment_transactions::{
    ActiveModel as PaymentActiveModel, Entity as PaymentTransactions, Model as PaymentModel,
};
pub use super::school_years::{
    ActiveModel as SchoolYearActiveModel, Entity as SchoolYears, Model as SchoolYearModel,
};
pub use super::student_notes::{
    ActiveModel as StudentNoteActiveModel, Entity as StudentNotes, Model as StudentNoteModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::system_settings::{
    ActiveModel as SystemSettingActiveModel, Entity as SystemSettings,
    Model as SystemSettingModel,
};
pub use super::system_settings_audit::{
    ActiveModel as SystemSettingAuditActiveModel, Entity as SystemSettingsAudit,
    Model as SystemSettingAuditModel,
};
pub use super::teacher_attendance::{
    ActiveModel as TeacherAttendanceActiveModel, Entity as TeacherAttendance,
    Model as TeacherAttendanceModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
