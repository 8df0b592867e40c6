//! 支付交易存储实现

use super::SeaOrmStorage;
use crate::entity::payment_transactions::{ActiveModel, Column, Entity as PaymentTransactions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{LakukelasError, Result};
use crate::models::payments::entities::{
    NewPayment, PaymentStatus, PaymentTransaction, SettleOutcome,
};
use crate::models::users::entities::ActivationTier;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_payment_impl(&self, payment: NewPayment) -> Result<PaymentTransaction> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            order_id: Set(payment.order_id),
            user_id: Set(payment.user_id),
            package_name: Set(payment.package_name),
            description: Set(payment.description),
            amount: Set(payment.amount),
            status: Set(PaymentStatus::Pending.to_string()),
            reference: Set(payment.reference),
            payment_url: Set(payment.payment_url),
            created_at: Set(now),
            updated_at: Set(now),
            paid_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| super::map_db_err("创建支付交易", e))?;

        Ok(model.into_payment())
    }

    pub async fn get_payment_by_order_id_impl(
        &self,
        order_id: &str,
    ) -> Result<Option<PaymentTransaction>> {
        let row = PaymentTransactions::find()
            .filter(Column::OrderId.eq(order_id))
            .one(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询支付交易失败: {e}")))?;

        Ok(row.map(|m| m.into_payment()))
    }

    /// 结算：只处理 pending 且金额一致的交易，支付成功时同一事务内升级买家
    pub async fn settle_payment_impl(
        &self,
        order_id: &str,
        amount: i64,
        paid: bool,
        reference: Option<String>,
    ) -> Result<SettleOutcome> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = PaymentTransactions::find()
            .filter(Column::OrderId.eq(order_id))
            .one(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询支付交易失败: {e}")))?
        else {
            return Ok(SettleOutcome::NotFound);
        };

        if existing.amount != amount {
            txn.rollback()
                .await
                .map_err(|e| LakukelasError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(SettleOutcome::AmountMismatch {
                expected: existing.amount,
            });
        }

        let status = if paid {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Failed
        };

        let mut update = PaymentTransactions::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(now));
        if paid {
            update = update.col_expr(Column::PaidAt, Expr::value(now));
        }
        if let Some(reference) = reference {
            update = update.col_expr(Column::Reference, Expr::value(reference));
        }

        let result = update
            .filter(Column::Id.eq(existing.id))
            .filter(Column::Status.eq(PaymentStatus::Pending.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("更新支付交易失败: {e}")))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| LakukelasError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(SettleOutcome::AlreadySettled);
        }

        if paid {
            Users::update_many()
                .col_expr(
                    UserColumn::ActivationTier,
                    Expr::value(ActivationTier::Pro.to_string()),
                )
                .col_expr(UserColumn::UpdatedAt, Expr::value(now))
                .filter(UserColumn::Id.eq(existing.user_id))
                .exec(&txn)
                .await
                .map_err(|e| {
                    LakukelasError::database_operation(format!("升级订阅等级失败: {e}"))
                })?;
        }

        txn.commit()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(SettleOutcome::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use super::*;
    use crate::models::users::entities::UserRole;

    fn new_payment(order_id: &str, user_id: i64) -> NewPayment {
        NewPayment {
            order_id: order_id.to_string(),
            user_id,
            package_name: "Pro Tahunan".to_string(),
            description: "Langganan Pro".to_string(),
            amount: 150_000,
            reference: Some("DS123".to_string()),
            payment_url: Some("https://sandbox.duitku.com/pay/DS123".to_string()),
        }
    }

    #[tokio::test]
    async fn test_paid_settlement_is_idempotent_and_upgrades() {
        let storage = memory_storage().await;
        let buyer = seed_user(&storage, "umar", UserRole::Teacher).await;
        storage
            .create_payment_impl(new_payment("LK20240801120000ABCDEF", buyer.id))
            .await
            .unwrap();

        assert_eq!(
            storage
                .settle_payment_impl("LK20240801120000ABCDEF", 150_000, true, Some("DS999".to_string()))
                .await
                .unwrap(),
            SettleOutcome::Updated
        );
        assert_eq!(
            storage
                .settle_payment_impl("LK20240801120000ABCDEF", 150_000, false, None)
                .await
                .unwrap(),
            SettleOutcome::AlreadySettled
        );

        let payment = storage
            .get_payment_by_order_id_impl("LK20240801120000ABCDEF")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.reference.as_deref(), Some("DS999"));
        assert!(payment.paid_at.is_some());

        let buyer = storage.get_user_by_id_impl(buyer.id).await.unwrap().unwrap();
        assert!(buyer.is_pro());
    }

    #[tokio::test]
    async fn test_failed_settlement_keeps_free_tier() {
        let storage = memory_storage().await;
        let buyer = seed_user(&storage, "vina", UserRole::Teacher).await;
        storage
            .create_payment_impl(new_payment("LK20240801120000XYZXYZ", buyer.id))
            .await
            .unwrap();

        storage
            .settle_payment_impl("LK20240801120000XYZXYZ", 150_000, false, None)
            .await
            .unwrap();
        let buyer = storage.get_user_by_id_impl(buyer.id).await.unwrap().unwrap();
        assert!(!buyer.is_pro());

        assert_eq!(
            storage
                .settle_payment_impl("LK-NOPE", 150_000, true, None)
                .await
                .unwrap(),
            SettleOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_amount_mismatch_leaves_order_pending() {
        let storage = memory_storage().await;
        let buyer = seed_user(&storage, "wulan", UserRole::Teacher).await;
        storage
            .create_payment_impl(new_payment("LK20240801120000MISMAT", buyer.id))
            .await
            .unwrap();

        assert_eq!(
            storage
                .settle_payment_impl("LK20240801120000MISMAT", 1_000, true, None)
                .await
                .unwrap(),
            SettleOutcome::AmountMismatch { expected: 150_000 }
        );

        let payment = storage
            .get_payment_by_order_id_impl("LK20240801120000MISMAT")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        let buyer = storage.get_user_by_id_impl(buyer.id).await.unwrap().unwrap();
        assert!(!buyer.is_pro());
    }
}
