/*!
 * 角色校验中间件
 *
 * 必须位于 RequireJWT 之内（即先 `.wrap(RequireRole)` 再 `.wrap(RequireJWT)`），
 * 依赖 JWT 中间件放入请求扩展的 `User`。
 *
 * ```rust,ignore
 * web::scope("/api/v1/classes")
 *     .wrap(RequireRole::new_any(UserRole::teacher_roles())) // 教师或管理员
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<Vec<UserRole>>,
}

impl RequireRole {
    /// 当前用户角色命中任一即可放行
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: Rc::new(roles.iter().map(|r| (*r).clone()).collect()),
        }
    }
}

/// 判定结果：放行、未登录或角色不足
fn check(user: Option<&User>, allowed: &[UserRole]) -> Result<(), (StatusCode, ErrorCode, &'static str)> {
    match user {
        Some(user) if allowed.contains(&user.role) => Ok(()),
        Some(user) => {
            info!(
                "Access denied for user {} (role: {}), allowed: {:?}",
                user.id, user.role, allowed
            );
            Err((StatusCode::FORBIDDEN, ErrorCode::Forbidden, "Access denied: insufficient role"))
        }
        None => {
            info!("Role check without an authenticated user, is RequireJWT applied?");
            Err((StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, "Authentication required"))
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<Vec<UserRole>>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let verdict = check(req.extensions().get::<User>(), &self.allowed);

        Box::pin(async move {
            match verdict {
                Ok(()) => Ok(srv.call(req).await?.map_into_left_body()),
                Err((status, code, message)) => Ok(req.into_response(
                    create_error_response(status, code, message).map_into_right_body(),
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_rejects_without_user() {
        let app = test::init_service(
            App::new().service(
                web::resource("/admin")
                    .wrap(RequireRole::new_any(UserRole::admin_roles()))
                    .route(web::get().to(ok)),
            ),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/admin").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
