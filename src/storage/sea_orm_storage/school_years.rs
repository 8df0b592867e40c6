//! 学年存储实现

use super::SeaOrmStorage;
use crate::entity::school_years::{ActiveModel, Column, Entity as SchoolYears};
use crate::errors::{LakukelasError, Result};
use crate::models::school_years::entities::{SchoolYear, school_year_names};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 按起始年份创建两个学期记录，默认不激活
    pub async fn create_school_year_pair_impl(&self, start_year: i32) -> Result<Vec<SchoolYear>> {
        let names = school_year_names(start_year).map_err(LakukelasError::validation)?;
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = SchoolYears::find()
            .filter(Column::StartYear.eq(start_year))
            .count(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询学年失败: {e}")))?;
        if existing > 0 {
            return Err(LakukelasError::conflict(format!(
                "学年 {start_year}/{} 已存在",
                start_year + 1
            )));
        }

        let mut created = Vec::with_capacity(names.len());
        for (semester, name) in names {
            let model = ActiveModel {
                name: Set(name),
                start_year: Set(start_year),
                semester: Set(semester.to_string()),
                is_active: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| super::map_db_err("创建学年", e))?;
            created.push(model.into_school_year());
        }

        txn.commit()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }

    pub async fn list_school_years_impl(&self) -> Result<Vec<SchoolYear>> {
        let years = SchoolYears::find()
            .order_by_desc(Column::StartYear)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询学年列表失败: {e}")))?;

        Ok(years.into_iter().map(|m| m.into_school_year()).collect())
    }

    pub async fn get_active_school_year_impl(&self) -> Result<Option<SchoolYear>> {
        let year = SchoolYears::find()
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询当前学年失败: {e}")))?;

        Ok(year.map(|m| m.into_school_year()))
    }

    /// 激活学年：同一事务内先全部停用再激活目标
    pub async fn activate_school_year_impl(&self, id: i64) -> Result<Option<SchoolYear>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(target) = SchoolYears::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询学年失败: {e}")))?
        else {
            return Ok(None);
        };

        SchoolYears::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("停用学年失败: {e}")))?;

        let mut model: ActiveModel = target.into();
        model.is_active = Set(true);
        model.updated_at = Set(now);
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("激活学年失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_school_year()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use super::*;

    #[tokio::test]
    async fn test_create_pair_names() {
        let storage = memory_storage().await;
        let years = storage.create_school_year_pair_impl(2024).await.unwrap();
        let names: Vec<_> = years.iter().map(|y| y.name.as_str()).collect();
        assert_eq!(names, vec!["2024/2025 - Ganjil", "2024/2025 - Genap"]);
        assert!(years.iter().all(|y| !y.is_active));

        let err = storage.create_school_year_pair_impl(2024).await.unwrap_err();
        assert!(matches!(err, LakukelasError::Conflict(_)));
        assert_eq!(storage.list_school_years_impl().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_out_of_range_year_writes_nothing() {
        let storage = memory_storage().await;
        let err = storage.create_school_year_pair_impl(1999).await.unwrap_err();
        assert!(matches!(err, LakukelasError::Validation(_)));
        assert!(storage.list_school_years_impl().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_activate_keeps_single_active() {
        let storage = memory_storage().await;
        let first = storage.create_school_year_pair_impl(2023).await.unwrap();
        let second = storage.create_school_year_pair_impl(2024).await.unwrap();

        storage.activate_school_year_impl(first[0].id).await.unwrap();
        storage
            .activate_school_year_impl(second[1].id)
            .await
            .unwrap()
            .unwrap();

        let active: Vec<_> = storage
            .list_school_years_impl()
            .await
            .unwrap()
            .into_iter()
            .filter(|y| y.is_active)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second[1].id);

        let current = storage.get_active_school_year_impl().await.unwrap().unwrap();
        assert_eq!(current.name, "2024/2025 - Genap");

        assert!(storage.activate_school_year_impl(9999).await.unwrap().is_none());
    }
}
