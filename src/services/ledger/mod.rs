//! 学生台账聚合
//!
//! 成绩、出勤、日志三个查询并发执行。某一部分失败时该部分返回空列表并记入
//! `errors`，三部分全部失败才返回 500。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, warn};

use crate::errors::Result;
use crate::models::attendance::entities::StudentAttendanceEntry;
use crate::models::grades::entities::StudentGradeEntry;
use crate::models::ledger::{
    LedgerErrorResponse, LedgerSection, LedgerSectionError, StudentLedgerQuery,
    StudentLedgerResponse,
};
use crate::models::notes::entities::StudentNote;
use crate::storage::Storage;

pub struct LedgerService {
    storage: Option<Arc<dyn Storage>>,
}

impl LedgerService {
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

    /// 响应体直接是台账 JSON，不使用统一信封
    pub async fn get_student_ledger(
        &self,
        request: &HttpRequest,
        query: StudentLedgerQuery,
    ) -> ActixResult<HttpResponse> {
        let Some(student_id) = parse_student_id(query.student_id.as_deref()) else {
            return Ok(HttpResponse::BadRequest().json(LedgerErrorResponse {
                error: "studentId is required and must be an integer".to_string(),
            }));
        };

        let storage = self.get_storage(request);
        let (grades, attendance, notes) = tokio::join!(
            storage.list_grades_for_student(student_id),
            storage.list_attendance_for_student(student_id),
            storage.list_notes_for_student(student_id),
        );

        match merge_sections(grades, attendance, notes) {
            Ok(ledger) => {
                if !ledger.errors.is_empty() {
                    warn!(
                        "Student ledger {} returned partial results: {:?}",
                        student_id, ledger.errors
                    );
                }
                Ok(HttpResponse::Ok().json(ledger))
            }
            Err(message) => {
                error!("Student ledger {} failed: {}", student_id, message);
                Ok(HttpResponse::InternalServerError().json(LedgerErrorResponse { error: message }))
            }
        }
    }
}

pub fn parse_student_id(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
}

fn take_section<T>(
    section: LedgerSection,
    result: Result<Vec<T>>,
    errors: &mut Vec<LedgerSectionError>,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            errors.push(LedgerSectionError {
                section,
                message: e.message().to_string(),
            });
            Vec::new()
        }
    }
}

/// 合并三部分结果；全部失败时返回合并后的错误信息
pub fn merge_sections(
    grades: Result<Vec<StudentGradeEntry>>,
    attendance: Result<Vec<StudentAttendanceEntry>>,
    notes: Result<Vec<StudentNote>>,
) -> std::result::Result<StudentLedgerResponse, String> {
    let mut errors = Vec::new();
    let grades = take_section(LedgerSection::Grades, grades, &mut errors);
    let attendance = take_section(LedgerSection::Attendance, attendance, &mut errors);
    let notes = take_section(LedgerSection::Notes, notes, &mut errors);

    if errors.len() == 3 {
        return Err(errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; "));
    }

    Ok(StudentLedgerResponse {
        grades,
        attendance,
        notes,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LakukelasError;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use actix_web::{App, test as actix_test, web};
    use once_cell::sync::Lazy;

    static LEDGER: Lazy<LedgerService> = Lazy::new(LedgerService::new_lazy);

    async fn ledger_handler(
        req: HttpRequest,
        query: web::Query<StudentLedgerQuery>,
    ) -> ActixResult<HttpResponse> {
        LEDGER.get_student_ledger(&req, query.into_inner()).await
    }

    #[test]
    fn test_parse_student_id() {
        assert_eq!(parse_student_id(Some("42")), Some(42));
        assert_eq!(parse_student_id(Some(" 7 ")), Some(7));
        assert_eq!(parse_student_id(Some("abc")), None);
        assert_eq!(parse_student_id(Some("")), None);
        assert_eq!(parse_student_id(None), None);
    }

    #[test]
    fn test_failed_section_is_tagged() {
        let ledger = merge_sections(
            Ok(vec![]),
            Err(LakukelasError::database_operation("attendance down")),
            Ok(vec![]),
        )
        .unwrap();

        assert_eq!(ledger.errors.len(), 1);
        assert_eq!(ledger.errors[0].section, LedgerSection::Attendance);
        assert_eq!(ledger.errors[0].message, "attendance down");
        assert!(ledger.attendance.is_empty());
    }

    #[test]
    fn test_all_sections_failed() {
        let err = merge_sections(
            Err(LakukelasError::database_operation("a")),
            Err(LakukelasError::database_operation("b")),
            Err(LakukelasError::database_operation("c")),
        )
        .unwrap_err();
        assert_eq!(err, "a; b; c");
    }

    #[actix_web::test]
    async fn test_ledger_endpoint_status() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .route("/api/student-ledger", web::get().to(ledger_handler)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/api/student-ledger").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let req = actix_test::TestRequest::get()
            .uri("/api/student-ledger?studentId=abc")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let req = actix_test::TestRequest::get()
            .uri("/api/student-ledger?studentId=1")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            serde_json::json!({"grades": [], "attendance": [], "notes": []})
        );
    }
}
