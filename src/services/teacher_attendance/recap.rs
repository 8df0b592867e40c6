use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;

use super::TeacherAttendanceService;
use crate::config::AppConfig;
use crate::models::teacher_attendance::{
    entities::{TeacherAttendance, TeacherAttendanceStatus},
    requests::RecapQuery,
    responses::{TeacherRecapResponse, TeacherRecapRow},
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 截止时间后仍可迟到签到，当天结束才算缺勤
pub fn is_day_closed(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

/// 每位教师一行；非节假日、当天已结束且无签到记录的记为 Tidak Hadir
pub fn build_recap(
    teachers: &[User],
    records: Vec<TeacherAttendance>,
    is_holiday: bool,
    day_closed: bool,
) -> Vec<TeacherRecapRow> {
    let mut by_teacher: HashMap<i64, TeacherAttendance> =
        records.into_iter().map(|r| (r.teacher_id, r)).collect();

    teachers
        .iter()
        .map(|teacher| match by_teacher.remove(&teacher.id) {
            Some(record) => TeacherRecapRow {
                teacher_id: teacher.id,
                teacher_name: teacher.display_name_or_username().to_string(),
                status: Some(record.status),
                check_in_at: Some(record.check_in_at),
                check_out_at: record.check_out_at,
            },
            None => TeacherRecapRow {
                teacher_id: teacher.id,
                teacher_name: teacher.display_name_or_username().to_string(),
                status: (!is_holiday && day_closed).then_some(TeacherAttendanceStatus::Absent),
                check_in_at: None,
                check_out_at: None,
            },
        })
        .collect()
}

pub async fn daily_recap(
    service: &TeacherAttendanceService,
    request: &HttpRequest,
    query: RecapQuery,
) -> ActixResult<HttpResponse> {
    let today = AppConfig::get().school_now().date_naive();
    let date = query.date.unwrap_or(today);
    let day_closed = is_day_closed(date, today);
    let storage = service.get_storage(request);

    let (teachers, records, is_holiday) = tokio::join!(
        storage.list_teachers(),
        storage.list_teacher_attendance_on(date),
        storage.is_holiday(date),
    );

    let teachers = match teachers {
        Ok(teachers) => teachers,
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    };
    let records = match records {
        Ok(records) => records,
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    };
    let is_holiday = match is_holiday {
        Ok(flag) => flag,
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    };

    let rows = build_recap(&teachers, records, is_holiday, day_closed);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TeacherRecapResponse {
            date,
            is_holiday,
            day_closed,
            rows,
        },
        "Teacher attendance recap retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{ActivationTier, UserRole, UserStatus};
    use chrono::{TimeZone, Utc};

    fn teacher(id: i64, name: &str) -> User {
        User {
            id,
            username: name.to_lowercase(),
            email: format!("{}@sekolah.sch.id", name.to_lowercase()),
            password_hash: String::new(),
            role: UserRole::Teacher,
            status: UserStatus::Active,
            activation_tier: ActivationTier::Free,
            display_name: Some(name.to_string()),
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn record(teacher_id: i64) -> TeacherAttendance {
        TeacherAttendance {
            id: teacher_id * 10,
            teacher_id,
            date: NaiveDate::from_ymd_opt(2024, 8, 5).unwrap(),
            check_in_at: Utc.with_ymd_and_hms(2024, 8, 5, 0, 5, 0).unwrap(),
            check_out_at: None,
            status: TeacherAttendanceStatus::Late,
            latitude: -6.2,
            longitude: 106.8,
            distance_meters: 12.0,
        }
    }

    #[test]
    fn test_absent_on_school_day() {
        let teachers = vec![teacher(1, "Sari"), teacher(2, "Tono")];
        let rows = build_recap(&teachers, vec![record(1)], false, true);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status, Some(TeacherAttendanceStatus::Late));
        assert_eq!(rows[0].teacher_name, "Sari");
        assert_eq!(rows[1].status, Some(TeacherAttendanceStatus::Absent));
        assert!(rows[1].check_in_at.is_none());
    }

    #[test]
    fn test_no_absence_on_holiday() {
        let rows = build_recap(&[teacher(2, "Tono")], vec![], true, true);
        assert_eq!(rows[0].status, None);
    }

    #[test]
    fn test_no_absence_while_day_is_open() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 5).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 8, 6).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 8, 4).unwrap();

        assert!(!is_day_closed(today, today));
        assert!(!is_day_closed(tomorrow, today));
        assert!(is_day_closed(yesterday, today));

        // 当天未签到的教师尚无状态，已签到的照常显示
        let teachers = vec![teacher(1, "Sari"), teacher(2, "Tono")];
        let rows = build_recap(&teachers, vec![record(1)], false, is_day_closed(today, today));
        assert_eq!(rows[0].status, Some(TeacherAttendanceStatus::Late));
        assert_eq!(rows[1].status, None);

        let rows = build_recap(&teachers, vec![], false, is_day_closed(tomorrow, today));
        assert!(rows.iter().all(|r| r.status.is_none()));
    }
}
