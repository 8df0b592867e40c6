//! 学生出勤存储实现
//!
//! 同一 (date, class_id, subject_id, meeting_number) 只保留一行，重复提交覆盖。

use super::SeaOrmStorage;
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance};
use crate::entity::subjects::Entity as Subjects;
use crate::errors::{LakukelasError, Result};
use crate::models::attendance::{
    entities::{AttendanceEntry, AttendanceRecord, AttendanceUpsert, StudentAttendanceEntry},
    requests::AttendanceListQuery,
};
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::OnConflict,
};

/// JSON 列的学生预筛选模式，结果仍需解码后精确过滤
pub(super) fn student_json_pattern(student_id: i64) -> String {
    format!("%\"student_id\":{student_id}%")
}

impl SeaOrmStorage {
    pub async fn upsert_attendance_impl(&self, input: AttendanceUpsert) -> Result<AttendanceRecord> {
        let now = chrono::Utc::now().timestamp();
        let records = serde_json::to_string(&input.records)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            date: Set(input.date),
            class_id: Set(input.class_id),
            subject_id: Set(input.subject_id),
            meeting_number: Set(input.meeting_number),
            teacher_id: Set(input.teacher_id),
            school_year_id: Set(input.school_year_id),
            records: Set(records),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Attendance::insert(model)
            .on_conflict(
                OnConflict::columns([
                    Column::Date,
                    Column::ClassId,
                    Column::SubjectId,
                    Column::MeetingNumber,
                ])
                .update_columns([
                    Column::TeacherId,
                    Column::SchoolYearId,
                    Column::Records,
                    Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| super::map_db_err("保存出勤", e))?;

        let saved = Attendance::find()
            .filter(Column::Date.eq(input.date))
            .filter(Column::ClassId.eq(input.class_id))
            .filter(Column::SubjectId.eq(input.subject_id))
            .filter(Column::MeetingNumber.eq(input.meeting_number))
            .one(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询出勤失败: {e}")))?
            .ok_or_else(|| LakukelasError::database_operation("出勤记录写入后未找到"))?;

        txn.commit()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_attendance())
    }

    pub async fn list_attendance_impl(
        &self,
        query: AttendanceListQuery,
    ) -> Result<Vec<AttendanceRecord>> {
        let mut select = Attendance::find();
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(from) = query.from {
            select = select.filter(Column::Date.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::Date.lte(to));
        }

        let rows = select
            .order_by_desc(Column::Date)
            .order_by_asc(Column::MeetingNumber)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询出勤列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_attendance()).collect())
    }

    /// 单个学生的出勤历史，最新在前
    pub async fn list_attendance_for_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAttendanceEntry>> {
        let rows = Attendance::find()
            .filter(Column::Records.like(student_json_pattern(student_id)))
            .find_also_related(Subjects)
            .order_by_desc(Column::Date)
            .order_by_asc(Column::MeetingNumber)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询学生出勤失败: {e}")))?;

        let mut entries = Vec::new();
        for (row, subject) in rows {
            let records: Vec<AttendanceEntry> = serde_json::from_str(&row.records)?;
            if let Some(entry) = records.into_iter().find(|r| r.student_id == student_id) {
                entries.push(StudentAttendanceEntry {
                    date: row.date,
                    class_id: row.class_id,
                    subject_id: row.subject_id,
                    subject_name: subject.map(|s| s.name).unwrap_or_default(),
                    meeting_number: row.meeting_number,
                    status: entry.status,
                });
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{
        memory_storage, seed_class, seed_student, seed_subject, seed_user,
    };
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;
    use crate::models::users::entities::UserRole;
    use chrono::NaiveDate;

    fn upsert(
        class_id: i64,
        subject_id: i64,
        teacher_id: i64,
        school_year_id: i64,
        records: Vec<AttendanceEntry>,
    ) -> AttendanceUpsert {
        AttendanceUpsert {
            date: NaiveDate::from_ymd_opt(2024, 8, 5).unwrap(),
            class_id,
            subject_id,
            meeting_number: 1,
            teacher_id,
            school_year_id,
            records,
        }
    }

    #[tokio::test]
    async fn test_resubmit_overwrites_same_session() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "kartika", UserRole::Teacher).await;
        let class = seed_class(&storage, "X A", teacher.id).await;
        let subject = seed_subject(&storage, "Kimia", 70.0, teacher.id).await;
        let year = storage.create_school_year_pair_impl(2024).await.unwrap();
        let s = seed_student(&storage, "Lina", "5001", class.id).await;

        let first = storage
            .upsert_attendance_impl(upsert(
                class.id,
                subject.id,
                teacher.id,
                year[0].id,
                vec![AttendanceEntry {
                    student_id: s.id,
                    status: AttendanceStatus::Alpa,
                }],
            ))
            .await
            .unwrap();

        let second = storage
            .upsert_attendance_impl(upsert(
                class.id,
                subject.id,
                teacher.id,
                year[0].id,
                vec![AttendanceEntry {
                    student_id: s.id,
                    status: AttendanceStatus::Sakit,
                }],
            ))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.records[0].status, AttendanceStatus::Sakit);
        assert_eq!(first.created_at, second.created_at);

        let all = storage
            .list_attendance_impl(AttendanceListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_student_history_filters_prefix_ids() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "lukas", UserRole::Teacher).await;
        let class = seed_class(&storage, "X B", teacher.id).await;
        let subject = seed_subject(&storage, "Ekonomi", 75.0, teacher.id).await;
        let year = storage.create_school_year_pair_impl(2024).await.unwrap();

        // 创建足够多学生，使 id 1 与 id 1x 同时存在
        let mut students = Vec::new();
        for i in 0..12 {
            let nis = format!("60{i:02}");
            students.push(seed_student(&storage, &format!("Murid {i}"), &nis, class.id).await);
        }
        let first = &students[0];
        let later: Vec<_> = students
            .iter()
            .filter(|s| s.id != first.id && s.id.to_string().starts_with(&first.id.to_string()))
            .collect();
        assert!(!later.is_empty());

        storage
            .upsert_attendance_impl(upsert(
                class.id,
                subject.id,
                teacher.id,
                year[0].id,
                vec![AttendanceEntry {
                    student_id: later[0].id,
                    status: AttendanceStatus::Izin,
                }],
            ))
            .await
            .unwrap();

        let history = storage
            .list_attendance_for_student_impl(first.id)
            .await
            .unwrap();
        assert!(history.is_empty());

        let history = storage
            .list_attendance_for_student_impl(later[0].id)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].subject_name, "Ekonomi");
        assert_eq!(history[0].status, AttendanceStatus::Izin);
    }
}
