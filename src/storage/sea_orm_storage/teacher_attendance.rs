//! 教师签到存储实现
//!
//! 每位教师每天一行，唯一索引保证重复签到被拒绝。

use super::SeaOrmStorage;
use crate::entity::teacher_attendance::{ActiveModel, Column, Entity as TeacherAttendances};
use crate::errors::{LakukelasError, Result};
use crate::models::teacher_attendance::entities::{NewTeacherCheckIn, TeacherAttendance};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_teacher_check_in_impl(
        &self,
        check_in: NewTeacherCheckIn,
    ) -> Result<TeacherAttendance> {
        let model = ActiveModel {
            teacher_id: Set(check_in.teacher_id),
            date: Set(check_in.date),
            check_in_at: Set(check_in.check_in_at),
            check_out_at: Set(None),
            status: Set(check_in.status.to_string()),
            latitude: Set(check_in.latitude),
            longitude: Set(check_in.longitude),
            distance_meters: Set(check_in.distance_meters),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| super::map_db_err("教师签到", e))?;

        Ok(model.into_teacher_attendance())
    }

    pub async fn get_teacher_attendance_impl(
        &self,
        teacher_id: i64,
        date: chrono::NaiveDate,
    ) -> Result<Option<TeacherAttendance>> {
        let row = TeacherAttendances::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::Date.eq(date))
            .one(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询签到记录失败: {e}")))?;

        Ok(row.map(|m| m.into_teacher_attendance()))
    }

    /// 签退，覆盖当天已有的签退时间
    pub async fn set_teacher_check_out_impl(
        &self,
        teacher_id: i64,
        date: chrono::NaiveDate,
        check_out_at: i64,
    ) -> Result<Option<TeacherAttendance>> {
        let Some(existing) = TeacherAttendances::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::Date.eq(date))
            .one(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询签到记录失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.check_out_at = Set(Some(check_out_at));
        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("教师签退失败: {e}")))?;

        Ok(Some(updated.into_teacher_attendance()))
    }

    pub async fn list_teacher_attendance_impl(
        &self,
        teacher_id: i64,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<Vec<TeacherAttendance>> {
        let mut select = TeacherAttendances::find().filter(Column::TeacherId.eq(teacher_id));
        if let Some(from) = from {
            select = select.filter(Column::Date.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(Column::Date.lte(to));
        }

        let rows = select
            .order_by_desc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询签到历史失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_teacher_attendance()).collect())
    }

    pub async fn list_teacher_attendance_on_impl(
        &self,
        date: chrono::NaiveDate,
    ) -> Result<Vec<TeacherAttendance>> {
        let rows = TeacherAttendances::find()
            .filter(Column::Date.eq(date))
            .order_by_asc(Column::CheckInAt)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询当日签到失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_teacher_attendance()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use super::*;
    use crate::models::teacher_attendance::entities::TeacherAttendanceStatus;
    use crate::models::users::entities::UserRole;
    use chrono::NaiveDate;

    fn check_in(teacher_id: i64, date: NaiveDate) -> NewTeacherCheckIn {
        NewTeacherCheckIn {
            teacher_id,
            date,
            check_in_at: 1_722_819_600,
            status: TeacherAttendanceStatus::Late,
            latitude: -6.2,
            longitude: 106.8,
            distance_meters: 12.5,
        }
    }

    #[tokio::test]
    async fn test_second_check_in_same_day_conflicts() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "putri", UserRole::Teacher).await;
        let day = NaiveDate::from_ymd_opt(2024, 8, 5).unwrap();

        let saved = storage
            .create_teacher_check_in_impl(check_in(teacher.id, day))
            .await
            .unwrap();
        assert_eq!(saved.status, TeacherAttendanceStatus::Late);
        assert!(saved.check_out_at.is_none());

        let err = storage
            .create_teacher_check_in_impl(check_in(teacher.id, day))
            .await
            .unwrap_err();
        assert!(matches!(err, LakukelasError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_check_out_requires_row() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "rudi", UserRole::Teacher).await;
        let day = NaiveDate::from_ymd_opt(2024, 8, 6).unwrap();

        assert!(
            storage
                .set_teacher_check_out_impl(teacher.id, day, 1_722_850_000)
                .await
                .unwrap()
                .is_none()
        );

        storage
            .create_teacher_check_in_impl(check_in(teacher.id, day))
            .await
            .unwrap();
        let out = storage
            .set_teacher_check_out_impl(teacher.id, day, 1_722_850_000)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(out.check_out_at.map(|t| t.timestamp()), Some(1_722_850_000));

        let history = storage
            .list_teacher_attendance_impl(teacher.id, Some(day), Some(day))
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(storage.list_teacher_attendance_on_impl(day).await.unwrap().len(), 1);
    }
}
