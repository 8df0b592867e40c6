//! 学生出勤实体
//!
//! 一次课一行，`records` 以 JSON 数组保存全部学生的出勤状态。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: i64,
    pub meeting_number: i32,
    pub teacher_id: i64,
    pub school_year_id: i64,
    #[sea_orm(column_type = "Text")]
    pub records: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attendance(self) -> crate::models::attendance::entities::AttendanceRecord {
        crate::models::attendance::entities::AttendanceRecord {
            id: self.id,
            date: self.date,
            class_id: self.class_id,
            subject_id: self.subject_id,
            meeting_number: self.meeting_number,
            teacher_id: self.teacher_id,
            school_year_id: self.school_year_id,
            records: serde_json::from_str(&self.records).unwrap_or_default(),
            created_at: super::ts_to_utc(self.created_at),
            updated_at: super::ts_to_utc(self.updated_at),
        }
    }
}
