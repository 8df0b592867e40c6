//! 管理员概览

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::analytics::{AdminAnalyticsResponse, TodayCheckIns};
use crate::models::teacher_attendance::entities::{TeacherAttendance, TeacherAttendanceStatus};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AnalyticsService {
    storage: Option<Arc<dyn Storage>>,
}

/// 当天尚未结束，未签到人数不等于缺勤；节假日为 0
pub fn summarize_check_ins(
    records: &[TeacherAttendance],
    teacher_count: u64,
    is_holiday: bool,
) -> TodayCheckIns {
    let on_time = records
        .iter()
        .filter(|r| r.status == TeacherAttendanceStatus::OnTime)
        .count() as u64;
    let late = records
        .iter()
        .filter(|r| r.status == TeacherAttendanceStatus::Late)
        .count() as u64;
    let not_checked_in = if is_holiday {
        0
    } else {
        teacher_count.saturating_sub(records.len() as u64)
    };

    TodayCheckIns {
        on_time,
        late,
        not_checked_in,
    }
}

impl AnalyticsService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn get_overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let today = AppConfig::get().school_now().date_naive();

        let (counts, check_ins, is_holiday, active_year) = tokio::join!(
            storage.get_dashboard_counts(),
            storage.list_teacher_attendance_on(today),
            storage.is_holiday(today),
            storage.get_active_school_year(),
        );

        let counts = match counts {
            Ok(counts) => counts,
            Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
        };
        let check_ins = match check_ins {
            Ok(records) => records,
            Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
        };
        let is_holiday = match is_holiday {
            Ok(flag) => flag,
            Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
        };
        let active_school_year = match active_year {
            Ok(year) => year,
            Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
        };

        let response = AdminAnalyticsResponse {
            teachers: counts.teachers,
            active_students: counts.active_students,
            classes: counts.classes,
            subjects: counts.subjects,
            today,
            is_holiday,
            check_ins: summarize_check_ins(&check_ins, counts.teachers, is_holiday),
            active_school_year,
        };

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Analytics retrieved successfully",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn record(teacher_id: i64, status: TeacherAttendanceStatus) -> TeacherAttendance {
        TeacherAttendance {
            id: teacher_id,
            teacher_id,
            date: NaiveDate::from_ymd_opt(2024, 8, 5).unwrap(),
            check_in_at: Utc::now(),
            check_out_at: None,
            status,
            latitude: 0.0,
            longitude: 0.0,
            distance_meters: 0.0,
        }
    }

    #[test]
    fn test_summarize_check_ins() {
        let records = vec![
            record(1, TeacherAttendanceStatus::OnTime),
            record(2, TeacherAttendanceStatus::Late),
            record(3, TeacherAttendanceStatus::OnTime),
        ];
        let summary = summarize_check_ins(&records, 5, false);
        assert_eq!((summary.on_time, summary.late, summary.not_checked_in), (2, 1, 2));

        let holiday = summarize_check_ins(&[], 5, true);
        assert_eq!(holiday.not_checked_in, 0);
    }
}
