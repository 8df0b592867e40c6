//! 科目存储实现

use super::SeaOrmStorage;
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{LakukelasError, Result};
use crate::models::subjects::entities::{NewSubject, Subject, SubjectUpdate};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_subject_impl(&self, subject: NewSubject) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(subject.name),
            kkm: Set(subject.kkm),
            teacher_id: Set(subject.teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| super::map_db_err("创建科目", e))?;

        Ok(model.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let subject = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(subject.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_impl(&self, teacher_id: Option<i64>) -> Result<Vec<Subject>> {
        let mut select = Subjects::find();
        if let Some(teacher_id) = teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        let subjects = select
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(subjects.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: SubjectUpdate,
    ) -> Result<Option<Subject>> {
        let Some(existing) = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询科目失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(kkm) = update.kkm {
            model.kkm = Set(kkm);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| super::map_db_err("更新科目", e))?;

        Ok(Some(updated.into_subject()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_subject, seed_user};
    use super::*;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_subject_kkm_update() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "eko", UserRole::Teacher).await;
        let subject = seed_subject(&storage, "Matematika", 75.0, teacher.id).await;

        let updated = storage
            .update_subject_impl(
                subject.id,
                SubjectUpdate {
                    kkm: Some(80.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.kkm, 80.5);
        assert_eq!(updated.name, "Matematika");
    }

    #[tokio::test]
    async fn test_list_subjects_by_teacher() {
        let storage = memory_storage().await;
        let eko = seed_user(&storage, "eko", UserRole::Teacher).await;
        let fitri = seed_user(&storage, "fitri", UserRole::Teacher).await;
        seed_subject(&storage, "Fisika", 70.0, eko.id).await;
        seed_subject(&storage, "Biologi", 70.0, eko.id).await;
        seed_subject(&storage, "Sejarah", 65.0, fitri.id).await;

        let mine = storage.list_subjects_impl(Some(eko.id)).await.unwrap();
        let names: Vec<_> = mine.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Biologi", "Fisika"]);
        assert_eq!(storage.list_subjects_impl(None).await.unwrap().len(), 3);
    }
}
