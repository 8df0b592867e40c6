use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 配置值类型
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub enum SettingValueType {
    String,
    Integer,
    Float,
    Boolean,
    JsonArray,
}

impl<'de> Deserialize<'de> for SettingValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "string" => Ok(SettingValueType::String),
            "integer" => Ok(SettingValueType::Integer),
            "float" => Ok(SettingValueType::Float),
            "boolean" => Ok(SettingValueType::Boolean),
            "json_array" => Ok(SettingValueType::JsonArray),
            _ => Err(serde::de::Error::custom(format!(
                "无效的配置值类型: '{s}'. 支持的类型: string, integer, float, boolean, json_array"
            ))),
        }
    }
}

impl std::fmt::Display for SettingValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValueType::String => write!(f, "string"),
            SettingValueType::Integer => write!(f, "integer"),
            SettingValueType::Float => write!(f, "float"),
            SettingValueType::Boolean => write!(f, "boolean"),
            SettingValueType::JsonArray => write!(f, "json_array"),
        }
    }
}

impl std::str::FromStr for SettingValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SettingValueType::String),
            "integer" => Ok(SettingValueType::Integer),
            "float" => Ok(SettingValueType::Float),
            "boolean" => Ok(SettingValueType::Boolean),
            "json_array" => Ok(SettingValueType::JsonArray),
            _ => Err(format!("Invalid setting value type: {s}")),
        }
    }
}

/// 已知配置键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownSettingKey {
    SystemName,
    AccessTokenExpiry,
    RefreshTokenExpiry,
    RefreshTokenRememberMeExpiry,
    CorsAllowedOrigins,
    CorsMaxAge,
    AttendanceLatitude,
    AttendanceLongitude,
    AttendanceRadius,
    AttendanceCheckInStart,
    AttendanceCheckInDeadline,
}

impl KnownSettingKey {
    const ALL: [KnownSettingKey; 11] = [
        KnownSettingKey::SystemName,
        KnownSettingKey::AccessTokenExpiry,
        KnownSettingKey::RefreshTokenExpiry,
        KnownSettingKey::RefreshTokenRememberMeExpiry,
        KnownSettingKey::CorsAllowedOrigins,
        KnownSettingKey::CorsMaxAge,
        KnownSettingKey::AttendanceLatitude,
        KnownSettingKey::AttendanceLongitude,
        KnownSettingKey::AttendanceRadius,
        KnownSettingKey::AttendanceCheckInStart,
        KnownSettingKey::AttendanceCheckInDeadline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnownSettingKey::SystemName => "app.system_name",
            KnownSettingKey::AccessTokenExpiry => "jwt.access_token_expiry",
            KnownSettingKey::RefreshTokenExpiry => "jwt.refresh_token_expiry",
            KnownSettingKey::RefreshTokenRememberMeExpiry => "jwt.refresh_token_remember_me_expiry",
            KnownSettingKey::CorsAllowedOrigins => "cors.allowed_origins",
            KnownSettingKey::CorsMaxAge => "cors.max_age",
            KnownSettingKey::AttendanceLatitude => "attendance.latitude",
            KnownSettingKey::AttendanceLongitude => "attendance.longitude",
            KnownSettingKey::AttendanceRadius => "attendance.radius",
            KnownSettingKey::AttendanceCheckInStart => "attendance.check_in_start",
            KnownSettingKey::AttendanceCheckInDeadline => "attendance.check_in_deadline",
        }
    }

    pub fn value_type(&self) -> SettingValueType {
        match self {
            KnownSettingKey::SystemName
            | KnownSettingKey::AttendanceCheckInStart
            | KnownSettingKey::AttendanceCheckInDeadline => SettingValueType::String,
            KnownSettingKey::AccessTokenExpiry
            | KnownSettingKey::RefreshTokenExpiry
            | KnownSettingKey::RefreshTokenRememberMeExpiry
            | KnownSettingKey::CorsMaxAge
            | KnownSettingKey::AttendanceRadius => SettingValueType::Integer,
            KnownSettingKey::AttendanceLatitude | KnownSettingKey::AttendanceLongitude => {
                SettingValueType::Float
            }
            KnownSettingKey::CorsAllowedOrigins => SettingValueType::JsonArray,
        }
    }

    /// 签到设置相关的键需要整体校验
    pub fn is_attendance(&self) -> bool {
        self.as_str().starts_with("attendance.")
    }

    pub fn all() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

impl std::str::FromStr for KnownSettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown setting key: {s}"))
    }
}

/// 系统设置实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub value_type: SettingValueType,
    pub description: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub updated_by: Option<i64>,
}

/// 设置审计日志实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingAudit {
    pub id: i64,
    pub setting_key: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub changed_by: i64,
    pub changed_at: chrono::DateTime<chrono::Utc>,
    pub ip_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_key_round_trip() {
        for key in KnownSettingKey::all() {
            assert_eq!(key.as_str().parse::<KnownSettingKey>(), Ok(key));
        }
        assert!("upload.max_size".parse::<KnownSettingKey>().is_err());
    }

    #[test]
    fn test_attendance_keys() {
        let keys: Vec<_> = KnownSettingKey::all()
            .into_iter()
            .filter(|k| k.is_attendance())
            .collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(
            KnownSettingKey::AttendanceLatitude.value_type(),
            SettingValueType::Float
        );
    }
}
