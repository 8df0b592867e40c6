//! 管理端统计

use super::SeaOrmStorage;
use crate::entity::prelude::{Classes, Students, Subjects, Users};
use crate::entity::{students, users};
use crate::errors::{LakukelasError, Result};
use crate::models::analytics::DashboardCounts;
use crate::models::students::entities::StudentStatus;
use crate::models::users::entities::{UserRole, UserStatus};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

impl SeaOrmStorage {
    pub async fn get_dashboard_counts_impl(&self) -> Result<DashboardCounts> {
        let count_err = |e: sea_orm::DbErr| {
            LakukelasError::database_operation(format!("统计数据查询失败: {e}"))
        };

        let teachers = Users::find()
            .filter(users::Column::Role.eq(UserRole::TEACHER))
            .filter(users::Column::Status.eq(UserStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(count_err)?;

        let active_students = Students::find()
            .filter(students::Column::Status.eq(StudentStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(count_err)?;

        let classes = Classes::find().count(&self.db).await.map_err(count_err)?;
        let subjects = Subjects::find().count(&self.db).await.map_err(count_err)?;

        Ok(DashboardCounts {
            teachers,
            active_students,
            classes,
            subjects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{
        memory_storage, seed_class, seed_student, seed_subject, seed_user,
    };
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_dashboard_counts() {
        let storage = memory_storage().await;
        seed_user(&storage, "admin", UserRole::Admin).await;
        let teacher = seed_user(&storage, "wati", UserRole::Teacher).await;
        let class = seed_class(&storage, "X A", teacher.id).await;
        let s1 = seed_student(&storage, "Yudi", "9001", class.id).await;
        seed_student(&storage, "Zahra", "9002", class.id).await;
        seed_subject(&storage, "Geografi", 70.0, teacher.id).await;
        storage.graduate_students_impl(&[s1.id]).await.unwrap();

        let counts = storage.get_dashboard_counts_impl().await.unwrap();
        assert_eq!(counts.teachers, 1);
        assert_eq!(counts.active_students, 1);
        assert_eq!(counts.classes, 1);
        assert_eq!(counts.subjects, 1);
    }
}
