//! 激活码实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activation_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub is_used: bool,
    pub used_by: Option<i64>,
    pub used_at: Option<i64>,
    pub created_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_activation_code(self) -> crate::models::activation::entities::ActivationCode {
        crate::models::activation::entities::ActivationCode {
            id: self.id,
            code: self.code,
            is_used: self.is_used,
            used_by: self.used_by,
            used_at: self.used_at.map(super::ts_to_utc),
            created_by: self.created_by,
            created_at: super::ts_to_utc(self.created_at),
        }
    }
}
