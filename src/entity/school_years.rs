//! 学年实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "school_years")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub start_year: i32,
    pub semester: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_school_year(self) -> crate::models::school_years::entities::SchoolYear {
        use crate::models::school_years::entities::{SchoolYear, Semester};

        SchoolYear {
            id: self.id,
            name: self.name,
            start_year: self.start_year,
            semester: self.semester.parse().unwrap_or(Semester::Ganjil),
            is_active: self.is_active,
            created_at: super::ts_to_utc(self.created_at),
            updated_at: super::ts_to_utc(self.updated_at),
        }
    }
}
