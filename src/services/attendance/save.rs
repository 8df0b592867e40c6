use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use super::access::{
    authorize_entry, class_member_ids, require_active_school_year, validate_entry_students,
};
use crate::models::attendance::{
    entities::AttendanceUpsert,
    requests::{AttendanceListQuery, SaveAttendanceRequest},
    responses::{AttendanceListResponse, AttendanceResponse},
};
use crate::models::{ApiResponse, ErrorCode};

pub async fn save_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    body: SaveAttendanceRequest,
) -> ActixResult<HttpResponse> {
    if body.meeting_number < 1 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AttendanceInvalid,
            "meeting_number must be at least 1",
        )));
    }

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
    let student_ids: Vec<i64> = body.records.iter().map(|r| r.student_id).collect();
    if let Err(msg) = validate_entry_students(&student_ids, &members) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::StudentNotInClass, msg)));
    }

    let school_year = match require_active_school_year(&storage).await {
        Ok(year) => year,
        Err(resp) => return Ok(resp),
    };

    let upsert = AttendanceUpsert {
        date: body.date,
        class_id: ctx.class.id,
        subject_id: body.subject_id,
        meeting_number: body.meeting_number,
        teacher_id: ctx.user.id,
        school_year_id: school_year.id,
        records: body.records,
    };

    match storage.upsert_attendance(upsert).await {
        Ok(attendance) => {
            info!(
                "Attendance saved for class {} subject {} on {} (meeting {})",
                attendance.class_id, attendance.subject_id, attendance.date, attendance.meeting_number
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AttendanceResponse { attendance },
                "Attendance saved successfully",
            )))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn list_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    query: AttendanceListQuery,
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

    match storage.list_attendance(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttendanceListResponse { items },
            "Attendance retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}
