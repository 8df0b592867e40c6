//! 教师签到实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub date: chrono::NaiveDate,
    pub check_in_at: i64,
    pub check_out_at: Option<i64>,
    pub status: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_teacher_attendance(
        self,
    ) -> crate::models::teacher_attendance::entities::TeacherAttendance {
        use crate::models::teacher_attendance::entities::{
            TeacherAttendance, TeacherAttendanceStatus,
        };

        TeacherAttendance {
            id: self.id,
            teacher_id: self.teacher_id,
            date: self.date,
            check_in_at: super::ts_to_utc(self.check_in_at),
            check_out_at: self.check_out_at.map(super::ts_to_utc),
            status: self
                .status
                .parse()
                .unwrap_or(TeacherAttendanceStatus::OnTime),
            latitude: self.latitude,
            longitude: self.longitude,
            distance_meters: self.distance_meters,
        }
    }
}
