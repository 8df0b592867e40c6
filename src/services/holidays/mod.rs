//! 节假日管理。节假日当天关闭教师签到，汇总中不记缺勤。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::models::holidays::{
    requests::{HolidayListQuery, SaveHolidayRequest},
    responses::HolidayListResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

const HOLIDAY_DESCRIPTION_MAX_LEN: usize = 200;

pub struct HolidayService {
    storage: Option<Arc<dyn Storage>>,
}

pub fn validate_holiday_description(description: &str) -> Result<String, String> {
    let description = description.trim();
    if description.is_empty() {
        return Err("Holiday description is required".to_string());
    }
    if description.chars().count() > HOLIDAY_DESCRIPTION_MAX_LEN {
        return Err(format!(
            "Holiday description must be at most {HOLIDAY_DESCRIPTION_MAX_LEN} characters"
        ));
    }
    Ok(description.to_string())
}

impl HolidayService {
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

    pub async fn list_holidays(
        &self,
        request: &HttpRequest,
        query: HolidayListQuery,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        match storage.list_holidays(query).await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                HolidayListResponse { items },
                "Holidays retrieved successfully",
            ))),
            Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
        }
    }

    // 同一日期再次保存只更新描述
    pub async fn save_holiday(
        &self,
        request: &HttpRequest,
        body: SaveHolidayRequest,
    ) -> ActixResult<HttpResponse> {
        let description = match validate_holiday_description(&body.description) {
            Ok(description) => description,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::HolidayInvalid, msg)));
            }
        };

        let storage = self.get_storage(request);
        match storage.upsert_holiday(body.date, description).await {
            Ok(holiday) => {
                info!("Holiday saved for {}: {}", holiday.date, holiday.description);
                Ok(HttpResponse::Ok().json(ApiResponse::success(holiday, "Holiday saved successfully")))
            }
            Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn delete_holiday(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        match storage.delete_holiday(id).await {
            Ok(true) => {
                info!("Holiday {} deleted", id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Holiday deleted successfully")))
            }
            Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::HolidayNotFound,
                "Holiday not found",
            ))),
            Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::InternalServerError)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holiday_description() {
        assert_eq!(
            validate_holiday_description(" Hari Kemerdekaan ").unwrap(),
            "Hari Kemerdekaan"
        );
        assert!(validate_holiday_description("").is_err());
        assert!(validate_holiday_description(&"x".repeat(201)).is_err());
    }
}
