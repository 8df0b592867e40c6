use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 科目；kkm 为最低掌握分数（Kriteria Ketuntasan Minimal）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub kkm: f64,
    pub teacher_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 校验后的新建科目
#[derive(Debug, Clone)]
pub struct NewSubject {
    pub name: String,
    pub kkm: f64,
    pub teacher_id: i64,
}

/// 校验后的科目更新
#[derive(Debug, Clone, Default)]
pub struct SubjectUpdate {
    pub name: Option<String>,
    pub kkm: Option<f64>,
}
