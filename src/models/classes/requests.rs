use serde::Deserialize;
use ts_rs::TS;

// 创建班级请求
//
// 教师创建时 teacher_id 可省略，默认为当前教师；管理员可指定任意教师或留空。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub teacher_id: Option<i64>,
}

// 更新班级请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub teacher_id: Option<i64>,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    /// 仅返回该教师担任班主任的班级
    pub teacher_id: Option<i64>,
}
