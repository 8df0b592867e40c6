//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_lakukelas_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LakukelasError {
            $($variant(String),)*
        }

        impl LakukelasError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LakukelasError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LakukelasError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LakukelasError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl LakukelasError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LakukelasError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_lakukelas_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E002", "Database Configuration Error"),
    DatabaseConnection("E003", "Database Connection Error"),
    DatabaseOperation("E004", "Database Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Serialization("E007", "Serialization Error"),
    DateParse("E008", "Date Parse Error"),
    Authentication("E009", "Authentication Error"),
    Authorization("E010", "Authorization Error"),
    Conflict("E011", "Resource Conflict"),
    Gateway("E012", "Payment Gateway Error"),
    Export("E013", "Export Error"),
}

impl LakukelasError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LakukelasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LakukelasError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LakukelasError {
    fn from(err: sea_orm::DbErr) -> Self {
        LakukelasError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LakukelasError {
    fn from(err: serde_json::Error) -> Self {
        LakukelasError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for LakukelasError {
    fn from(err: reqwest::Error) -> Self {
        LakukelasError::Gateway(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for LakukelasError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        LakukelasError::Export(err.to_string())
    }
}

impl From<chrono::ParseError> for LakukelasError {
    fn from(err: chrono::ParseError) -> Self {
        LakukelasError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LakukelasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LakukelasError::cache_connection("test").code(), "E001");
        assert_eq!(LakukelasError::database_config("test").code(), "E002");
        assert_eq!(LakukelasError::validation("test").code(), "E005");
        assert_eq!(LakukelasError::authentication("test").code(), "E009");
        assert_eq!(LakukelasError::conflict("test").code(), "E011");
        assert_eq!(LakukelasError::gateway("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LakukelasError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            LakukelasError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = LakukelasError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_from_json_error() {
        let err: LakukelasError = serde_json::from_str::<i32>("x").unwrap_err().into();
        assert_eq!(err.code(), "E007");
    }

    #[test]
    fn test_format_simple() {
        let err = LakukelasError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
