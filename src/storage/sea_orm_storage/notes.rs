//! 学生日志存储实现

use super::SeaOrmStorage;
use crate::entity::student_notes::{ActiveModel, Column, Entity as StudentNotes};
use crate::errors::{LakukelasError, Result};
use crate::models::notes::entities::StudentNote;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_note_impl(
        &self,
        student_id: i64,
        teacher_id: i64,
        date: chrono::NaiveDate,
        content: String,
    ) -> Result<StudentNote> {
        let model = ActiveModel {
            student_id: Set(student_id),
            teacher_id: Set(teacher_id),
            date: Set(date),
            content: Set(content),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| super::map_db_err("创建学生日志", e))?;

        Ok(model.into_note())
    }

    pub async fn list_notes_for_student_impl(&self, student_id: i64) -> Result<Vec<StudentNote>> {
        let notes = StudentNotes::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询学生日志失败: {e}")))?;

        Ok(notes.into_iter().map(|m| m.into_note()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_class, seed_student, seed_user};
    use super::*;
    use crate::models::users::entities::UserRole;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_notes_newest_first() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "nina", UserRole::Teacher).await;
        let class = seed_class(&storage, "VIII A", teacher.id).await;
        let s = seed_student(&storage, "Putra", "8001", class.id).await;

        for (day, content) in [(3, "Terlambat masuk"), (10, "Aktif bertanya")] {
            storage
                .create_note_impl(
                    s.id,
                    teacher.id,
                    NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
                    content.to_string(),
                )
                .await
                .unwrap();
        }

        let notes = storage.list_notes_for_student_impl(s.id).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].content, "Aktif bertanya");
    }

    #[tokio::test]
    async fn test_note_for_unknown_student_rejected() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "oscar", UserRole::Teacher).await;
        let err = storage
            .create_note_impl(
                9999,
                teacher.id,
                NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
                "x".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LakukelasError::Validation(_)));
    }
}
