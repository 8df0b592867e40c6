//! 成绩存储实现

use super::SeaOrmStorage;
use super::attendance::student_json_pattern;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::entity::subjects::Entity as Subjects;
use crate::errors::{LakukelasError, Result};
use crate::models::grades::{
    entities::{GradeEntry, GradeRecord, GradeUpsert, StudentGradeEntry},
    requests::GradeListQuery,
};
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::OnConflict,
};

impl SeaOrmStorage {
    /// 写入一次评估的成绩，同键覆盖
    pub async fn upsert_grades_impl(&self, input: GradeUpsert) -> Result<GradeRecord> {
        let now = chrono::Utc::now().timestamp();
        let scores = serde_json::to_string(&input.scores)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            date: Set(input.date),
            class_id: Set(input.class_id),
            subject_id: Set(input.subject_id),
            assessment_type: Set(input.assessment_type.clone()),
            teacher_id: Set(input.teacher_id),
            school_year_id: Set(input.school_year_id),
            scores: Set(scores),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Grades::insert(model)
            .on_conflict(
                OnConflict::columns([
                    Column::Date,
                    Column::ClassId,
                    Column::SubjectId,
                    Column::AssessmentType,
                ])
                .update_columns([
                    Column::TeacherId,
                    Column::SchoolYearId,
                    Column::Scores,
                    Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| super::map_db_err("保存成绩", e))?;

        let saved = Grades::find()
            .filter(Column::Date.eq(input.date))
            .filter(Column::ClassId.eq(input.class_id))
            .filter(Column::SubjectId.eq(input.subject_id))
            .filter(Column::AssessmentType.eq(input.assessment_type))
            .one(&txn)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询成绩失败: {e}")))?
            .ok_or_else(|| LakukelasError::database_operation("成绩记录写入后未找到"))?;

        txn.commit()
            .await
            .map_err(|e| LakukelasError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_grade())
    }

    pub async fn list_grades_impl(&self, query: GradeListQuery) -> Result<Vec<GradeRecord>> {
        let mut select = Grades::find();
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        let rows = select
            .order_by_desc(Column::Date)
            .order_by_asc(Column::AssessmentType)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 单个学生的全部成绩，附带科目名称与 KKM
    pub async fn list_grades_for_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentGradeEntry>> {
        let rows = Grades::find()
            .filter(Column::Scores.like(student_json_pattern(student_id)))
            .find_also_related(Subjects)
            .order_by_desc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| LakukelasError::database_operation(format!("查询学生成绩失败: {e}")))?;

        let mut entries = Vec::new();
        for (row, subject) in rows {
            let scores: Vec<GradeEntry> = serde_json::from_str(&row.scores)?;
            let Some(entry) = scores.into_iter().find(|s| s.student_id == student_id) else {
                continue;
            };
            let (subject_name, kkm) = subject.map(|s| (s.name, s.kkm)).unwrap_or_default();
            entries.push(StudentGradeEntry {
                date: row.date,
                subject_id: row.subject_id,
                subject_name,
                kkm,
                assessment_type: row.assessment_type,
                score: entry.score,
            });
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
    use crate::models::users::entities::UserRole;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_grades_upsert_and_student_lookup() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "maya", UserRole::Teacher).await;
        let class = seed_class(&storage, "XI A", teacher.id).await;
        let subject = seed_subject(&storage, "Bahasa Indonesia", 78.0, teacher.id).await;
        let year = storage.create_school_year_pair_impl(2024).await.unwrap();
        let a = seed_student(&storage, "Nadia", "7001", class.id).await;
        let b = seed_student(&storage, "Oki", "7002", class.id).await;

        let base = GradeUpsert {
            date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            class_id: class.id,
            subject_id: subject.id,
            assessment_type: "UH1".to_string(),
            teacher_id: teacher.id,
            school_year_id: year[0].id,
            scores: vec![
                GradeEntry {
                    student_id: a.id,
                    score: 60.0,
                },
                GradeEntry {
                    student_id: b.id,
                    score: 90.0,
                },
            ],
        };
        storage.upsert_grades_impl(base.clone()).await.unwrap();

        let mut corrected = base.clone();
        corrected.scores[0].score = 82.5;
        let saved = storage.upsert_grades_impl(corrected).await.unwrap();
        assert_eq!(saved.scores.len(), 2);

        let mut other_type = base;
        other_type.assessment_type = "UTS".to_string();
        storage.upsert_grades_impl(other_type).await.unwrap();

        let list = storage
            .list_grades_impl(GradeListQuery {
                class_id: Some(class.id),
                subject_id: None,
            })
            .await
            .unwrap();
        assert_eq!(list.len(), 2);

        let ledger = storage.list_grades_for_student_impl(a.id).await.unwrap();
        assert_eq!(ledger.len(), 2);
        let uh1 = ledger
            .iter()
            .find(|g| g.assessment_type == "UH1")
            .unwrap();
        assert_eq!(uh1.score, 82.5);
        assert_eq!(uh1.kkm, 78.0);
        assert_eq!(uh1.subject_name, "Bahasa Indonesia");
    }
}
