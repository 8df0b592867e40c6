//! 激活码存储实现

use super::SeaOrmStorage;
use crate::entity::activation_codes::{ActiveModel, Column, Entity as ActivationCodes};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{LakukelasError, Result};
use crate::models::activation::entities::{ActivationCode, RedeemOutcome};
use crate::models::users::entities::ActivationTier;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 批量写入激活码，任一失败则整批回滚
    pub async fn create_activation_codes_impl(
        &self,
        codes: Vec<String>,
        created_by: i64,
    ) -> Result<Vec<ActivationCode>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = Vec::with_capacity(codes.len());
        for code in codes {
            let model = ActiveModel {
                code: Set(code),
                is_used: Set(false),
                used_by: Set(None),
                used_at: Set(None),
                created_by: Set(created_by),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| super::map_db_err("创建激活码", e))?;
            created.push(model.into_activation_code());
        }

        txn.commit()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }

    pub async fn list_activation_codes_impl(&self) -> Result<Vec<ActivationCode>> {
        let rows = ActivationCodes::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询激活码失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_activation_code()).collect())
    }

    /// 兑换激活码：条件更新 is_used，成功后同一事务内升级用户
    pub async fn redeem_activation_code_impl(
        &self,
        code: &str,
        user_id: i64,
    ) -> Result<RedeemOutcome> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("开启事务失败: {e}")))?;

        let claimed = ActivationCodes::update_many()
            .col_expr(Column::IsUsed, Expr::value(true))
            .col_expr(Column::UsedBy, Expr::value(user_id))
            .col_expr(Column::UsedAt, Expr::value(now))
            .filter(Column::Code.eq(code))
            .filter(Column::IsUsed.eq(false))
            .exec(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("兑换激活码失败: {e}")))?;

        if claimed.rows_affected == 0 {
            let exists = ActivationCodes::find()
                .filter(Column::Code.eq(code))
                .count(&txn)
                .await
                .map_err(|e| LakukelasError::database_operation(format!("查询激活码失败: {e}")))?;
            txn.rollback()
                .await
                .map_err(|e| LakukelasError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(if exists > 0 {
                RedeemOutcome::AlreadyUsed
            } else {
                RedeemOutcome::NotFound
            });
        }

        Users::update_many()
            .col_expr(
                UserColumn::ActivationTier,
                Expr::value(ActivationTier::Pro.to_string()),
            )
            .col_expr(UserColumn::UpdatedAt, Expr::value(now))
            .filter(UserColumn::Id.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("升级订阅等级失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(RedeemOutcome::Redeemed)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use super::*;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_code_redeems_once() {
        let storage = memory_storage().await;
        let admin = seed_user(&storage, "admin", UserRole::Admin).await;
        let sari = seed_user(&storage, "sari", UserRole::Teacher).await;
        let tono = seed_user(&storage, "tono", UserRole::Teacher).await;

        let codes = storage
            .create_activation_codes_impl(vec!["LK-AAAA-BBBB-CCCC".to_string()], admin.id)
            .await
            .unwrap();
        assert!(!codes[0].is_used);

        assert_eq!(
            storage
                .redeem_activation_code_impl("LK-AAAA-BBBB-CCCC", sari.id)
                .await
                .unwrap(),
            RedeemOutcome::Redeemed
        );
        assert_eq!(
            storage
                .redeem_activation_code_impl("LK-AAAA-BBBB-CCCC", tono.id)
                .await
                .unwrap(),
            RedeemOutcome::AlreadyUsed
        );
        assert_eq!(
            storage
                .redeem_activation_code_impl("LK-ZZZZ-ZZZZ-ZZZZ", tono.id)
                .await
                .unwrap(),
            RedeemOutcome::NotFound
        );

        let sari = storage.get_user_by_id_impl(sari.id).await.unwrap().unwrap();
        let tono = storage.get_user_by_id_impl(tono.id).await.unwrap().unwrap();
        assert!(sari.is_pro());
        assert!(!tono.is_pro());

        let listed = storage.list_activation_codes_impl().await.unwrap();
        assert_eq!(listed[0].used_by, Some(sari.id));
    }

    #[tokio::test]
    async fn test_duplicate_code_in_batch_rolls_back() {
        let storage = memory_storage().await;
        let admin = seed_user(&storage, "admin", UserRole::Admin).await;
        let err = storage
            .create_activation_codes_impl(
                vec!["LK-DUP".to_string(), "LK-DUP".to_string()],
                admin.id,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LakukelasError::Conflict(_)));
        assert!(storage.list_activation_codes_impl().await.unwrap().is_empty());
    }
}
