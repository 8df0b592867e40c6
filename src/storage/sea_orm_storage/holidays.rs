//! 节假日存储实现

use super::SeaOrmStorage;
use crate::entity::holidays::{ActiveModel, Column, Entity as Holidays};
use crate::errors::{LakukelasError, Result};
use crate::models::holidays::{entities::Holiday, requests::HolidayListQuery};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::OnConflict,
};

impl SeaOrmStorage {
    /// 按日期写入节假日，已存在时只更新描述
    pub async fn upsert_holiday_impl(
        &self,
        date: chrono::NaiveDate,
        description: String,
    ) -> Result<Holiday> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("开启事务失败: {e}")))?;

        Holidays::insert(ActiveModel {
            date: Set(date),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(Column::Date)
                .update_columns([Column::Description, Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await
        .map_err(|e| super::map_db_err("保存节假日", e))?;

        let saved = Holidays::find()
            .filter(Column::Date.eq(date))
            .one(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询节假日失败: {e}")))?
            .ok_or_else(|| LakukelasError::database_operation("节假日写入后未找到"))?;

        txn.commit()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_holiday())
    }

    pub async fn list_holidays_impl(&self, query: HolidayListQuery) -> Result<Vec<Holiday>> {
        let mut select = Holidays::find();
        if let Some(from) = query.from {
            select = select.filter(Column::Date.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::Date.lte(to));
        }

        let rows = select
            .order_by_asc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询节假日列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_holiday()).collect())
    }

    pub async fn is_holiday_impl(&self, date: chrono::NaiveDate) -> Result<bool> {
        let count = Holidays::find()
            .filter(Column::Date.eq(date))
            .count(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询节假日失败: {e}")))?;

        Ok(count > 0)
    }

    pub async fn delete_holiday_impl(&self, id: i64) -> Result<bool> {
        let result = Holidays::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("删除节假日失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_upsert_same_date_updates_description() {
        let storage = memory_storage().await;
        let day = NaiveDate::from_ymd_opt(2024, 8, 17).unwrap();

        let first = storage
            .upsert_holiday_impl(day, "HUT RI".to_string())
            .await
            .unwrap();
        let second = storage
            .upsert_holiday_impl(day, "HUT RI ke-79".to_string())
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.description, "HUT RI ke-79");

        assert!(storage.is_holiday_impl(day).await.unwrap());
        assert!(!storage.is_holiday_impl(day.succ_opt().unwrap()).await.unwrap());

        assert!(storage.delete_holiday_impl(first.id).await.unwrap());
        assert!(!storage.delete_holiday_impl(first.id).await.unwrap());
        assert!(
            storage
                .list_holidays_impl(HolidayListQuery::default())
                .await
                .unwrap()
                .is_empty()
        );
    }
}
