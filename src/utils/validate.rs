use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static NIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4,20}$").expect("Invalid NIS regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// NIS 只能由 4-20 位数字组成
pub fn validate_nis(nis: &str) -> Result<(), &'static str> {
    if !NIS_RE.is_match(nis) {
        return Err("NIS must be 4 to 20 digits");
    }
    Ok(())
}

/// 名称去除首尾空白后不能为空，返回修剪后的值
pub fn validate_name(name: &str, max_len: usize) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name must not be empty".to_string());
    }
    if trimmed.chars().count() > max_len {
        return Err(format!("Name must be at most {max_len} characters"));
    }
    Ok(trimmed.to_string())
}

/// KKM 必须在 [0,100] 内，接受数字或数字字符串
pub fn validate_kkm(kkm: &serde_json::Value) -> Result<f64, &'static str> {
    let value = match kkm {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return Err("KKM must be a number");
    };
    if !(0.0..=100.0).contains(&value) {
        return Err("KKM must be between 0 and 100");
    }
    Ok(value)
}

/// 分数必须在 [0,100] 内
pub fn validate_score(score: f64) -> Result<(), &'static str> {
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        return Err("Score must be between 0 and 100");
    }
    Ok(())
}

/// 解析 `HH:MM` 格式的时间
pub fn parse_hhmm(value: &str) -> Result<chrono::NaiveTime, String> {
    let value = value.trim();
    if value.len() != 5 {
        return Err(format!("Time must use HH:MM format: '{value}'"));
    }
    chrono::NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| format!("Time must use HH:MM format: '{value}'"))
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 可选：特殊字符（增强安全性）
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查：至少 8 个字符
    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    // 2. 大写字母检查
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    // 3. 小写字母检查
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    // 4. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    // 5. 常见弱密码检查
    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "Password1",
        "Qwerty123",
        "Abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kkm_bounds() {
        use serde_json::json;
        assert_eq!(validate_kkm(&json!(0)), Ok(0.0));
        assert_eq!(validate_kkm(&json!(100)), Ok(100.0));
        assert_eq!(validate_kkm(&json!("75")), Ok(75.0));
        assert_eq!(validate_kkm(&json!(72.5)), Ok(72.5));
        assert!(validate_kkm(&json!(-1)).is_err());
        assert!(validate_kkm(&json!(101)).is_err());
        assert!(validate_kkm(&json!("tujuh")).is_err());
        assert!(validate_kkm(&json!(null)).is_err());
        assert!(validate_kkm(&json!(100.01)).is_err());
    }

    #[test]
    fn test_name_trimmed() {
        assert_eq!(validate_name("  Matematika ", 100).unwrap(), "Matematika");
        assert!(validate_name("   ", 100).is_err());
        assert!(validate_name("abcdef", 5).is_err());
    }

    #[test]
    fn test_nis() {
        assert!(validate_nis("20240001").is_ok());
        assert!(validate_nis("12a4").is_err());
        assert!(validate_nis("123").is_err());
    }

    #[test]
    fn test_score() {
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(100.0).is_ok());
        assert!(validate_score(100.5).is_err());
        assert!(validate_score(f64::NAN).is_err());
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(
            parse_hhmm("07:15").unwrap(),
            chrono::NaiveTime::from_hms_opt(7, 15, 0).unwrap()
        );
        assert!(parse_hhmm("7:15").is_err());
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("07:15:00").is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("MyP@ssw0rd").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_no_uppercase() {
        let result = validate_password("abcd1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_no_lowercase() {
        let result = validate_password("ABCD1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}
