//! 支付交易实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub order_id: String,
    pub user_id: i64,
    pub package_name: String,
    pub description: String,
    pub amount: i64,
    pub status: String,
    pub reference: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub payment_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub paid_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::payments::entities::PaymentTransaction {
        use crate::models::payments::entities::{PaymentStatus, PaymentTransaction};

        PaymentTransaction {
            id: self.id,
            order_id: self.order_id,
            user_id: self.user_id,
            package_name: self.package_name,
            description: self.description,
            amount: self.amount,
            status: self.status.parse().unwrap_or(PaymentStatus::Pending),
            reference: self.reference,
            payment_url: self.payment_url,
            created_at: super::ts_to_utc(self.created_at),
            updated_at: super::ts_to_utc(self.updated_at),
            paid_at: self.paid_at.map(super::ts_to_utc),
        }
    }
}
