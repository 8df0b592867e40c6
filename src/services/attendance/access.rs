//! 录入权限与条目校验，出勤和成绩共用

use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};

use crate::middlewares::RequireJWT;
use crate::models::classes::entities::Class;
use crate::models::school_years::entities::SchoolYear;
use crate::models::subjects::entities::Subject;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub(crate) struct EntryContext {
    pub user: User,
    pub class: Class,
    pub subject: Option<Subject>,
}

/// 管理员、班主任或科目任课教师可以访问
pub(crate) async fn authorize_entry(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    class_id: i64,
    subject_id: Option<i64>,
) -> Result<EntryContext, HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Err(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Err(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    };

    let subject = match subject_id {
        Some(id) => match storage.get_subject_by_id(id).await {
            Ok(Some(subject)) => Some(subject),
            Ok(None) => {
                return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::SubjectNotFound,
                    "Subject not found",
                )));
            }
            Err(e) => return Err(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
        },
        None => None,
    };

    let allowed = user.is_admin()
        || class.teacher_id == Some(user.id)
        || subject.as_ref().is_some_and(|s| s.teacher_id == user.id);
    if !allowed {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "You do not teach this class",
        )));
    }

    Ok(EntryContext {
        user,
        class,
        subject,
    })
}

/// 录入需要存在当前学年
pub(crate) async fn require_active_school_year(
    storage: &Arc<dyn Storage>,
) -> Result<SchoolYear, HttpResponse> {
    match storage.get_active_school_year().await {
        Ok(Some(year)) => Ok(year),
        Ok(None) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::NoActiveSchoolYear,
            "No active school year, ask an administrator to activate one",
        ))),
        Err(e) => Err(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
    }
}

/// 条目非空、学生不重复，且都是该班在读学生
pub fn validate_entry_students(
    student_ids: &[i64],
    class_members: &HashSet<i64>,
) -> Result<(), String> {
    if student_ids.is_empty() {
        return Err("At least one student entry is required".to_string());
    }

    let mut seen = HashSet::with_capacity(student_ids.len());
    for id in student_ids {
        if !seen.insert(*id) {
            return Err(format!("Student {id} appears more than once"));
        }
        if !class_members.contains(id) {
            return Err(format!("Student {id} is not an active member of this class"));
        }
    }
    Ok(())
}

/// 班级内在读学生 ID
pub(crate) async fn class_member_ids(
    storage: &Arc<dyn Storage>,
    class_id: i64,
) -> Result<HashSet<i64>, HttpResponse> {
    storage
        .list_students_by_class(class_id)
        .await
        .map(|students| students.into_iter().map(|s| s.id).collect())
        .map_err(|e| ApiResponse::from_error(&e, ErrorCode::InternalServerError))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_students() {
        let members: HashSet<i64> = [1, 2, 3].into_iter().collect();
        assert!(validate_entry_students(&[1, 2], &members).is_ok());
        assert!(validate_entry_students(&[], &members).is_err());
        assert!(validate_entry_students(&[1, 1], &members).is_err());

        let err = validate_entry_students(&[1, 9], &members).unwrap_err();
        assert!(err.contains("Student 9"));
    }
}
