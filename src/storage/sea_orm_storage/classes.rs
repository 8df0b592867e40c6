//! 班级存储实现

use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{LakukelasError, Result};
use crate::models::classes::{
    entities::Class,
    requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            teacher_id: Set(req.teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| super::map_db_err("创建班级", e))?;

        Ok(model.into_class())
    }

    pub async fn get_class_by_id_impl(&self, id: i64) -> Result<Option<Class>> {
        let class = Classes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(class.map(|m| m.into_class()))
    }

    /// 列出班级，按名称排序
    pub async fn list_classes_impl(&self, query: ClassListQuery) -> Result<Vec<Class>> {
        let mut select = Classes::find();
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        let classes = select
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    pub async fn update_class_impl(
        &self,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        let Some(existing) = Classes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询班级失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(Some(teacher_id));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| super::map_db_err("更新班级", e))?;

        Ok(Some(updated.into_class()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_class, seed_user};
    use super::*;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_list_filters_by_homeroom_teacher() {
        let storage = memory_storage().await;
        let ani = seed_user(&storage, "ani", UserRole::Teacher).await;
        let budi = seed_user(&storage, "budi", UserRole::Teacher).await;
        seed_class(&storage, "X IPA 2", ani.id).await;
        seed_class(&storage, "X IPA 1", ani.id).await;
        seed_class(&storage, "XI IPS 1", budi.id).await;

        let mine = storage
            .list_classes_impl(ClassListQuery {
                teacher_id: Some(ani.id),
            })
            .await
            .unwrap();
        let names: Vec<_> = mine.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["X IPA 1", "X IPA 2"]);

        let all = storage
            .list_classes_impl(ClassListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_class_name_conflicts() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "citra", UserRole::Teacher).await;
        seed_class(&storage, "VII A", teacher.id).await;

        let err = storage
            .create_class_impl(CreateClassRequest {
                name: "VII A".to_string(),
                teacher_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LakukelasError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_class_renames() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "dewi", UserRole::Teacher).await;
        let class = seed_class(&storage, "VIII B", teacher.id).await;

        let updated = storage
            .update_class_impl(
                class.id,
                UpdateClassRequest {
                    name: Some("VIII C".to_string()),
                    teacher_id: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "VIII C");
        assert_eq!(updated.teacher_id, Some(teacher.id));

        assert!(
            storage
                .update_class_impl(9999, UpdateClassRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
