//! 班级学生表现
//!
//! 平均分取该学生在本班全部成绩记录中的原始分数；出勤率为 Hadir 占全部出勤条目的比例。

use std::collections::{BTreeMap, HashMap};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, authorize_class};
use crate::models::attendance::{
    entities::{AttendanceRecord, AttendanceStatus},
    requests::AttendanceListQuery,
};
use crate::models::classes::responses::{ClassPerformanceResponse, StudentPerformance};
use crate::models::grades::{entities::GradeRecord, requests::GradeListQuery};
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode};

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 按学生汇总成绩与出勤
pub fn compute_performance(
    students: &[Student],
    grades: &[GradeRecord],
    kkm_by_subject: &HashMap<i64, f64>,
    attendance: &[AttendanceRecord],
) -> Vec<StudentPerformance> {
    let mut scores: HashMap<i64, Vec<(i64, f64)>> = HashMap::new();
    for record in grades {
        for entry in &record.scores {
            scores
                .entry(entry.student_id)
                .or_default()
                .push((record.subject_id, entry.score));
        }
    }

    let mut presence: HashMap<i64, BTreeMap<AttendanceStatus, usize>> = HashMap::new();
    for record in attendance {
        for entry in &record.records {
            *presence
                .entry(entry.student_id)
                .or_default()
                .entry(entry.status)
                .or_insert(0) += 1;
        }
    }

    students
        .iter()
        .map(|student| {
            let own_scores = scores.get(&student.id).map(Vec::as_slice).unwrap_or(&[]);
            let average_score = (!own_scores.is_empty()).then(|| {
                round2(own_scores.iter().map(|(_, s)| s).sum::<f64>() / own_scores.len() as f64)
            });
            let below_kkm_count = own_scores
                .iter()
                .filter(|(subject_id, score)| {
                    kkm_by_subject
                        .get(subject_id)
                        .is_some_and(|kkm| *score < *kkm)
                })
                .count();

            let mut counts: BTreeMap<AttendanceStatus, usize> = [
                AttendanceStatus::Hadir,
                AttendanceStatus::Sakit,
                AttendanceStatus::Izin,
                AttendanceStatus::Alpa,
            ]
            .into_iter()
            .map(|s| (s, 0))
            .collect();
            if let Some(own) = presence.get(&student.id) {
                counts.extend(own.iter().map(|(k, v)| (*k, *v)));
            }
            let total: usize = counts.values().sum();
            let attendance_rate = (total > 0).then(|| {
                round2(counts[&AttendanceStatus::Hadir] as f64 / total as f64 * 100.0)
            });

            StudentPerformance {
                student_id: student.id,
                name: student.name.clone(),
                nis: student.nis.clone(),
                average_score,
                score_count: own_scores.len(),
                below_kkm_count,
                attendance: counts,
                attendance_rate,
            }
        })
        .collect()
}

pub async fn get_class_performance(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let class = match authorize_class(&storage, request, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    let (students, grades, subjects, attendance) = tokio::join!(
        storage.list_students_by_class(class_id),
        storage.list_grades(GradeListQuery {
            class_id: Some(class_id),
            subject_id: None,
        }),
        storage.list_subjects(None),
        storage.list_attendance(AttendanceListQuery {
            class_id: Some(class_id),
            ..Default::default()
        }),
    );

    let (students, grades, subjects, attendance) = match (students, grades, subjects, attendance)
    {
        (Ok(a), Ok(b), Ok(c), Ok(d)) => (a, b, c, d),
        (Err(e), ..) | (_, Err(e), ..) | (_, _, Err(e), _) | (.., Err(e)) => {
            return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError));
        }
    };

    let kkm_by_subject: HashMap<i64, f64> = subjects.iter().map(|s| (s.id, s.kkm)).collect();
    let students = compute_performance(&students, &grades, &kkm_by_subject, &attendance);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassPerformanceResponse { class, students },
        "Class performance retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceEntry;
    use crate::models::grades::entities::GradeEntry;
    use crate::models::students::entities::{Gender, StudentStatus};

    fn student(id: i64) -> Student {
        let now = chrono::Utc::now();
        Student {
            id,
            name: format!("Siswa {id}"),
            nis: format!("{:05}", id),
            class_id: 1,
            gender: Gender::L,
            status: StudentStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn grade(subject_id: i64, scores: &[(i64, f64)]) -> GradeRecord {
        let now = chrono::Utc::now();
        GradeRecord {
            id: 1,
            date: chrono::NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            class_id: 1,
            subject_id,
            assessment_type: "Tugas Harian".into(),
            teacher_id: 1,
            school_year_id: 1,
            scores: scores
                .iter()
                .map(|(student_id, score)| GradeEntry {
                    student_id: *student_id,
                    score: *score,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    fn attendance(entries: &[(i64, AttendanceStatus)]) -> AttendanceRecord {
        let now = chrono::Utc::now();
        AttendanceRecord {
            id: 1,
            date: chrono::NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            class_id: 1,
            subject_id: 1,
            meeting_number: 1,
            teacher_id: 1,
            school_year_id: 1,
            records: entries
                .iter()
                .map(|(student_id, status)| AttendanceEntry {
                    student_id: *student_id,
                    status: *status,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_average_and_below_kkm() {
        let kkm = HashMap::from([(10, 75.0), (20, 70.0)]);
        let grades = vec![grade(10, &[(1, 80.0), (2, 60.0)]), grade(20, &[(1, 65.0)])];
        let result = compute_performance(&[student(1), student(2)], &grades, &kkm, &[]);

        assert_eq!(result[0].average_score, Some(72.5));
        assert_eq!(result[0].score_count, 2);
        assert_eq!(result[0].below_kkm_count, 1);
        assert_eq!(result[1].below_kkm_count, 1);
        assert_eq!(result[1].attendance_rate, None);
    }

    #[test]
    fn test_attendance_rate() {
        let records = vec![
            attendance(&[(1, AttendanceStatus::Hadir)]),
            attendance(&[(1, AttendanceStatus::Hadir)]),
            attendance(&[(1, AttendanceStatus::Sakit)]),
            attendance(&[(1, AttendanceStatus::Alpa)]),
        ];
        let result = compute_performance(&[student(1)], &[], &HashMap::new(), &records);

        assert_eq!(result[0].attendance_rate, Some(50.0));
        assert_eq!(result[0].attendance[&AttendanceStatus::Izin], 0);
        assert_eq!(result[0].average_score, None);
    }
}
