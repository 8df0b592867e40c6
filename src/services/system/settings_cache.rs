//! 动态配置缓存
//!
//! 启动时从 system_settings 表加载，写入配置后同步更新。
//! 使用 RwLock 保护，支持热更新。

use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::models::system::entities::KnownSettingKey;
use crate::models::teacher_attendance::entities::AttendanceSettings;

/// 动态配置缓存
static DYNAMIC_CONFIG: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

/// 动态配置访问接口
pub struct DynamicConfig;

impl DynamicConfig {
    /// 初始化动态配置缓存
    /// 在应用启动时调用，从数据库加载配置
    pub async fn init(settings: Vec<(String, String)>) {
        let cache = DYNAMIC_CONFIG.get_or_init(|| RwLock::new(HashMap::new()));

        let mut guard = cache.write().await;
        guard.clear();
        guard.extend(settings);

        tracing::info!("Dynamic config loaded with {} settings", guard.len());
    }

    /// 更新单个配置项
    pub async fn update(key: &str, value: &str) {
        let cache = DYNAMIC_CONFIG.get_or_init(|| RwLock::new(HashMap::new()));
        cache
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        tracing::debug!("Dynamic config updated: {} = {}", key, value);
    }

    /// 获取字符串配置
    async fn get_string(key: KnownSettingKey) -> Option<String> {
        let cache = DYNAMIC_CONFIG.get()?;
        cache.read().await.get(key.as_str()).cloned()
    }

    /// 获取整数配置
    async fn get_i64(key: KnownSettingKey) -> Option<i64> {
        Self::get_string(key).await.and_then(|v| v.parse().ok())
    }

    /// 获取 JSON 数组配置
    async fn get_json_array(key: KnownSettingKey) -> Option<Vec<String>> {
        Self::get_string(key)
            .await
            .and_then(|v| serde_json::from_str(&v).ok())
    }

    // ============================================
    // 具体配置项访问方法
    // ============================================

    /// 获取系统名称
    pub async fn system_name() -> String {
        Self::get_string(KnownSettingKey::SystemName)
            .await
            .unwrap_or_else(|| AppConfig::get().app.system_name.clone())
    }

    /// 获取 Access Token 有效期（分钟）
    pub async fn access_token_expiry() -> i64 {
        Self::get_i64(KnownSettingKey::AccessTokenExpiry)
            .await
            .unwrap_or_else(|| AppConfig::get().jwt.access_token_expiry)
    }

    /// 获取 Refresh Token 有效期（天）
    pub async fn refresh_token_expiry() -> i64 {
        Self::get_i64(KnownSettingKey::RefreshTokenExpiry)
            .await
            .unwrap_or_else(|| AppConfig::get().jwt.refresh_token_expiry)
    }

    /// 获取记住我 Refresh Token 有效期（天）
    pub async fn refresh_token_remember_me_expiry() -> i64 {
        Self::get_i64(KnownSettingKey::RefreshTokenRememberMeExpiry)
            .await
            .unwrap_or_else(|| AppConfig::get().jwt.refresh_token_remember_me_expiry)
    }

    /// 获取允许的跨域来源
    pub async fn cors_allowed_origins() -> Vec<String> {
        Self::get_json_array(KnownSettingKey::CorsAllowedOrigins)
            .await
            .unwrap_or_else(|| AppConfig::get().cors.allowed_origins.clone())
    }

    /// 获取 CORS 预检请求缓存时间（秒）
    pub async fn cors_max_age() -> usize {
        Self::get_i64(KnownSettingKey::CorsMaxAge)
            .await
            .map(|v| v as usize)
            .unwrap_or_else(|| AppConfig::get().cors.max_age)
    }

    /// 签到设置，缺失的键回落到配置文件默认值
    pub async fn attendance_settings() -> AttendanceSettings {
        let defaults = &AppConfig::get().attendance;
        AttendanceSettings {
            latitude: Self::get_string(KnownSettingKey::AttendanceLatitude)
                .await
                .unwrap_or_else(|| defaults.default_latitude.to_string()),
            longitude: Self::get_string(KnownSettingKey::AttendanceLongitude)
                .await
                .unwrap_or_else(|| defaults.default_longitude.to_string()),
            radius: Self::get_i64(KnownSettingKey::AttendanceRadius)
                .await
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(defaults.default_radius),
            check_in_start: Self::get_string(KnownSettingKey::AttendanceCheckInStart)
                .await
                .unwrap_or_else(|| defaults.default_check_in_start.clone()),
            check_in_deadline: Self::get_string(KnownSettingKey::AttendanceCheckInDeadline)
                .await
                .unwrap_or_else(|| defaults.default_check_in_deadline.clone()),
        }
    }
}
