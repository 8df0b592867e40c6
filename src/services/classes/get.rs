use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, authorize_class};
use crate::models::ApiResponse;
use crate::models::classes::responses::ClassResponse;

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match authorize_class(&storage, request, class_id).await {
        Ok(class) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassResponse { class },
            "Class information retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
