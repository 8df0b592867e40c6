//! 学生存储实现
//!
//! 转班与毕业都是整批成功或整批失败：受影响行数与请求的学生数不一致时回滚。

use super::SeaOrmStorage;
use crate::entity::classes::Entity as Classes;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{LakukelasError, Result};
use crate::models::{
    PaginationInfo,
    students::{
        entities::{Student, StudentStatus},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait, sea_query::Expr,
};

/// 去重并保持原有顺序
fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

impl SeaOrmStorage {
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            nis: Set(req.nis),
            class_id: Set(req.class_id),
            gender: Set(req.gender.to_string()),
            status: Set(StudentStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| super::map_db_err("创建学生", e))?;

        Ok(model.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let student = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(student.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_impl(&self, query: StudentListQuery) -> Result<StudentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = Students::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Nis.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询学生总数失败: {e}")))?;

        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 班级内在读学生，按姓名排序
    pub async fn list_students_by_class_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Status.eq(StudentStatus::Active.to_string()))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let Some(existing) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询学生失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(nis) = update.nis {
            model.nis = Set(nis);
        }
        if let Some(gender) = update.gender {
            model.gender = Set(gender.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| super::map_db_err("更新学生", e))?;

        Ok(Some(updated.into_student()))
    }

    /// 批量转班：所有学生必须当前属于源班级
    pub async fn move_students_impl(
        &self,
        student_ids: &[i64],
        source_class_id: i64,
        target_class_id: i64,
    ) -> Result<u64> {
        let ids = dedup_ids(student_ids);
        if ids.is_empty() {
            return Err(LakukelasError::validation("学生列表不能为空"));
        }
        if source_class_id == target_class_id {
            return Err(LakukelasError::validation("目标班级不能与源班级相同"));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("开启事务失败: {e}")))?;

        let target = Classes::find_by_id(target_class_id)
            .one(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询班级失败: {e}")))?;
        if target.is_none() {
            return Err(LakukelasError::validation("目标班级不存在"));
        }

        let result = Students::update_many()
            .col_expr(Column::ClassId, Expr::value(target_class_id))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.is_in(ids.clone()))
            .filter(Column::ClassId.eq(source_class_id))
            .exec(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("学生转班失败: {e}")))?;

        if result.rows_affected != ids.len() as u64 {
            txn.rollback()
                .await
                .map_err(|e| LakukelasError::database_operation(format!("回滚事务失败: {e}")))?;
            return Err(LakukelasError::validation(format!(
                "只有 {} / {} 名学生属于源班级，未做任何修改",
                result.rows_affected,
                ids.len()
            )));
        }

        txn.commit()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected)
    }

    /// 批量毕业：所有学生必须处于在读状态
    pub async fn graduate_students_impl(&self, student_ids: &[i64]) -> Result<u64> {
        let ids = dedup_ids(student_ids);
        if ids.is_empty() {
            return Err(LakukelasError::validation("学生列表不能为空"));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("开启事务失败: {e}")))?;

        let result = Students::update_many()
            .col_expr(
                Column::Status,
                Expr::value(StudentStatus::Graduated.to_string()),
            )
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.is_in(ids.clone()))
            .filter(Column::Status.eq(StudentStatus::Active.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("学生毕业失败: {e}")))?;

        if result.rows_affected != ids.len() as u64 {
            txn.rollback()
                .await
                .map_err(|e| LakukelasError::database_operation(format!("回滚事务失败: {e}")))?;
            return Err(LakukelasError::validation(format!(
                "只有 {} / {} 名学生处于在读状态，未做任何修改",
                result.rows_affected,
                ids.len()
            )));
        }

        txn.commit()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_class, seed_student, seed_user};
    use super::*;
    use crate::models::users::entities::UserRole;

    #[test]
    fn test_dedup_ids_keeps_order() {
        assert_eq!(dedup_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_move_is_all_or_nothing() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "gita", UserRole::Teacher).await;
        let x_a = seed_class(&storage, "X A", teacher.id).await;
        let x_b = seed_class(&storage, "X B", teacher.id).await;
        let xi_a = seed_class(&storage, "XI A", teacher.id).await;
        let s1 = seed_student(&storage, "Andi", "1001", x_a.id).await;
        let s2 = seed_student(&storage, "Bela", "1002", x_a.id).await;
        let other = seed_student(&storage, "Caca", "1003", x_b.id).await;

        // 混入其他班级的学生，整批拒绝
        let err = storage
            .move_students_impl(&[s1.id, other.id], x_a.id, xi_a.id)
            .await
            .unwrap_err();
        assert!(matches!(err, LakukelasError::Validation(_)));
        let s1_after = storage.get_student_by_id_impl(s1.id).await.unwrap().unwrap();
        assert_eq!(s1_after.class_id, x_a.id);

        let moved = storage
            .move_students_impl(&[s1.id, s2.id, s1.id], x_a.id, xi_a.id)
            .await
            .unwrap();
        assert_eq!(moved, 2);
        assert!(
            storage
                .list_students_by_class_impl(x_a.id)
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            storage
                .list_students_by_class_impl(xi_a.id)
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_move_rejects_unknown_or_same_target() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "hadi", UserRole::Teacher).await;
        let class = seed_class(&storage, "IX A", teacher.id).await;
        let s = seed_student(&storage, "Dina", "2001", class.id).await;

        let err = storage
            .move_students_impl(&[s.id], class.id, 9999)
            .await
            .unwrap_err();
        assert!(matches!(err, LakukelasError::Validation(_)));

        let err = storage
            .move_students_impl(&[s.id], class.id, class.id)
            .await
            .unwrap_err();
        assert!(matches!(err, LakukelasError::Validation(_)));

        let err = storage
            .move_students_impl(&[], class.id, 9999)
            .await
            .unwrap_err();
        assert!(matches!(err, LakukelasError::Validation(_)));
    }

    #[tokio::test]
    async fn test_graduate_leaves_class_roster() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "indah", UserRole::Teacher).await;
        let class = seed_class(&storage, "XII A", teacher.id).await;
        let s1 = seed_student(&storage, "Eka", "3001", class.id).await;
        let s2 = seed_student(&storage, "Fajar", "3002", class.id).await;

        assert_eq!(storage.graduate_students_impl(&[s1.id]).await.unwrap(), 1);
        let roster = storage.list_students_by_class_impl(class.id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, s2.id);

        // 已毕业学生不能再次毕业
        let err = storage
            .graduate_students_impl(&[s1.id, s2.id])
            .await
            .unwrap_err();
        assert!(matches!(err, LakukelasError::Validation(_)));
        let s2_after = storage.get_student_by_id_impl(s2.id).await.unwrap().unwrap();
        assert_eq!(s2_after.status, StudentStatus::Active);

        let graduated = storage
            .list_students_impl(StudentListQuery {
                status: Some(StudentStatus::Graduated),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(graduated.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_search_by_name_or_nis() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "joko", UserRole::Teacher).await;
        let class = seed_class(&storage, "VII B", teacher.id).await;
        seed_student(&storage, "Gilang", "4001", class.id).await;
        seed_student(&storage, "Hana", "4002", class.id).await;

        let by_nis = storage
            .list_students_impl(StudentListQuery {
                search: Some("4002".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_nis.items.len(), 1);
        assert_eq!(by_nis.items[0].name, "Hana");

        let dup = storage
            .create_student_impl(CreateStudentRequest {
                name: "Hana Lain".to_string(),
                nis: "4002".to_string(),
                class_id: class.id,
                gender: crate::models::students::entities::Gender::P,
            })
            .await
            .unwrap_err();
        assert!(matches!(dup, LakukelasError::Conflict(_)));
    }
}
