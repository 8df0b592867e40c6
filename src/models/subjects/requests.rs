use serde::Deserialize;
use ts_rs::TS;

/// 新建科目；管理员可以指定 teacher_id，教师只能给自己建
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct CreateSubjectRequest {
    pub name: String,
    pub kkm: serde_json::Value,
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub kkm: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct SubjectListParams {
    pub teacher_id: Option<i64>,
}
