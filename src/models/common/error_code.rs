//! 业务错误码
//!
//! 响应体中的 `code` 字段，0 表示成功。按千位分段：
//! 1xxx 通用，2xxx 认证，3xxx 用户，4xxx 学年，5xxx 班级/学生/科目，
//! 6xxx 考勤与成绩录入，7xxx 教师签到与假日，8xxx 激活码与支付，9xxx 导出。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    InternalServerError = 1004,
    RateLimitExceeded = 1005,
    Conflict = 1006,

    // 认证
    AuthFailed = 2000,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserCreationFailed = 3005,
    UserUpdateFailed = 3006,

    // 学年
    SchoolYearInvalid = 4000,
    SchoolYearAlreadyExists = 4001,
    SchoolYearNotFound = 4002,
    NoActiveSchoolYear = 4003,

    // 班级 / 学生 / 科目
    ClassNotFound = 5000,
    ClassNameInvalid = 5001,
    ClassAlreadyExists = 5002,
    ClassPermissionDenied = 5003,
    StudentNotFound = 5100,
    StudentInvalid = 5101,
    StudentAlreadyExists = 5102,
    StudentMoveInvalid = 5103,
    SubjectNotFound = 5200,
    SubjectInvalid = 5201,

    // 考勤与成绩录入
    AttendanceInvalid = 6000,
    GradeInvalid = 6001,
    StudentNotInClass = 6002,
    NoteInvalid = 6003,

    // 教师签到 / 假日
    LocationRequired = 7000,
    OutsideGeofence = 7001,
    CheckInTooEarly = 7002,
    AlreadyCheckedIn = 7003,
    NotCheckedIn = 7004,
    HolidayToday = 7005,
    AttendanceSettingsInvalid = 7006,
    HolidayInvalid = 7100,
    HolidayNotFound = 7101,

    // 激活码 / 支付
    ActivationCodeInvalid = 8000,
    ActivationCodeUsed = 8001,
    ProTierRequired = 8002,
    PaymentNotConfigured = 8100,
    PaymentInvalid = 8101,
    PaymentGatewayError = 8102,
    PaymentSignatureInvalid = 8103,
    PaymentNotFound = 8104,
    PaymentAmountMismatch = 8105,

    // 导出
    ExportFailed = 9000,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::NoActiveSchoolYear as i32, 4003);
        assert_eq!(ErrorCode::OutsideGeofence as i32, 7001);
    }
}
