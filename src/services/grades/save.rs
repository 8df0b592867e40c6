use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradeService;
use crate::models::grades::{
    entities::{GradeEntry, GradeUpsert},
    requests::{GradeListQuery, SaveGradesRequest},
    responses::{GradeListResponse, GradeResponse},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::attendance::access::{
    authorize_entry, class_member_ids, require_active_school_year, validate_entry_students,
};
use crate::utils::validate::validate_score;

const ASSESSMENT_TYPE_MAX_LEN: usize = 50;

/// 校验评估类型与分数，返回去空白后的评估类型
pub fn validate_grade_input(assessment_type: &str, scores: &[GradeEntry]) -> Result<String, String> {
    let assessment_type = assessment_type.trim();
    if assessment_type.is_empty() {
        return Err("Assessment type is required".to_string());
    }
    if assessment_type.chars().count() > ASSESSMENT_TYPE_MAX_LEN {
        return Err(format!(
            "Assessment type must be at most {ASSESSMENT_TYPE_MAX_LEN} characters"
        ));
    }
    for entry in scores {
        validate_score(entry.score)
            .map_err(|msg| format!("Student {}: {msg}", entry.student_id))?;
    }
    Ok(assessment_type.to_string())
}

pub async fn save_grades(
    service: &GradeService,
    request: &HttpRequest,
    body: SaveGradesRequest,
) -> ActixResult<HttpResponse> {
    let assessment_type = match validate_grade_input(&body.assessment_type, &body.scores) {
        Ok(value) => value,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
        }
    };

    let storage = service.get_storage(request);
    let ctx = match authorize_entry(&storage, request, body.class_id, Some(body.subject_id)).await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    let members = match class_member_ids(&storage, body.class_id).await {
        Ok(members) => members,
        Err(resp) => return Ok(resp),
    };
    let student_ids: Vec<i64> = body.scores.iter().map(|s| s.student_id).collect();
    if let Err(msg) = validate_entry_students(&student_ids, &members) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::StudentNotInClass, msg)));
    }

    let school_year = match require_active_school_year(&storage).await {
        Ok(year) => year,
        Err(resp) => return Ok(resp),
    };

    let upsert = GradeUpsert {
        date: body.date,
        class_id: ctx.class.id,
        subject_id: body.subject_id,
        assessment_type,
        teacher_id: ctx.user.id,
        school_year_id: school_year.id,
        scores: body.scores,
    };

    match storage.upsert_grades(upsert).await {
        Ok(grade) => {
            info!(
                "Grades saved for class {} subject {} ({}) on {}",
                grade.class_id, grade.subject_id, grade.assessment_type, grade.date
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                GradeResponse { grade },
                "Grades saved successfully",
            )))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn list_grades(
    service: &GradeService,
    request: &HttpRequest,
    query: GradeListQuery,
) -> ActixResult<HttpResponse> {
    let Some(class_id) = query.class_id else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "class_id is required",
        )));
    };

    let storage = service.get_storage(request);
    if let Err(resp) = authorize_entry(&storage, request, class_id, query.subject_id).await {
        return Ok(resp);
    }

    match storage.list_grades(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradeListResponse { items },
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(student_id: i64, score: f64) -> GradeEntry {
        GradeEntry { student_id, score }
    }

    #[test]
    fn test_grade_input_trims_type() {
        let result = validate_grade_input("  UH 1 ", &[entry(1, 80.0)]);
        assert_eq!(result.unwrap(), "UH 1");
    }

    #[test]
    fn test_grade_input_rejects_bad_values() {
        assert!(validate_grade_input("   ", &[entry(1, 80.0)]).is_err());
        assert!(validate_grade_input(&"x".repeat(51), &[]).is_err());

        let err = validate_grade_input("UTS", &[entry(1, 90.0), entry(2, 101.0)]).unwrap_err();
        assert!(err.starts_with("Student 2"));
        assert!(validate_grade_input("UTS", &[entry(3, -1.0)]).is_err());
    }

    #[test]
    fn test_grade_input_accepts_bounds() {
        assert!(validate_grade_input("UAS", &[entry(1, 0.0), entry(2, 100.0)]).is_ok());
    }
}
