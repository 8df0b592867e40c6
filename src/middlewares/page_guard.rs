/*!
 * 页面路由守卫
 *
 * 保护 `/dashboard/...` 与 `/admin/...` 页面：
 * - 未登录访问任一受保护页面 → 重定向到 `/`
 * - 非管理员访问 `/admin/...` → 重定向到 `/dashboard`
 * - 管理员访问 `/dashboard/...` → 重定向到 `/admin`
 *
 * 令牌从 `Authorization` 头或 `access_token` cookie 读取。
 * 已登录用户会被写入请求扩展。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::LOCATION,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::debug;

use crate::models::users::entities::{User, UserRole};
use crate::utils::jwt::JwtUtils;

use super::require_jwt::load_user_from_token;

#[derive(Clone, Default)]
pub struct PageGuard;

fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// 计算页面请求应重定向到的位置，`None` 表示放行
pub fn resolve_page_redirect(path: &str, role: Option<&UserRole>) -> Option<&'static str> {
    let is_admin_page = is_under(path, "/admin");
    let is_dashboard_page = is_under(path, "/dashboard");

    if !is_admin_page && !is_dashboard_page {
        return None;
    }

    match role {
        None => Some("/"),
        Some(UserRole::Admin) if is_dashboard_page => Some("/admin"),
        Some(UserRole::Teacher) if is_admin_page => Some("/dashboard"),
        Some(_) => None,
    }
}

fn redirect(location: &'static str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}

impl<S, B> Transform<S, ServiceRequest> for PageGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = PageGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PageGuardMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct PageGuardMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for PageGuardMiddleware<S>
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
        Box::pin(async move {
            let user: Option<User> = match JwtUtils::extract_access_token(req.request()) {
                Some(token) => match load_user_from_token(&req, &token).await {
                    Ok(user) => Some(user),
                    Err(err) => {
                        debug!("Page guard rejected token for {}: {}", req.path(), err);
                        None
                    }
                },
                None => None,
            };

            if let Some(location) = resolve_page_redirect(req.path(), user.as_ref().map(|u| &u.role))
            {
                debug!("Page guard redirect {} -> {}", req.path(), location);
                return Ok(req.into_response(redirect(location).map_into_right_body()));
            }

            if let Some(user) = user {
                req.extensions_mut().insert(user);
            }
            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_redirects_home() {
        assert_eq!(resolve_page_redirect("/dashboard", None), Some("/"));
        assert_eq!(resolve_page_redirect("/dashboard/attendance", None), Some("/"));
        assert_eq!(resolve_page_redirect("/admin/codes", None), Some("/"));
    }

    #[test]
    fn test_role_redirects() {
        let teacher = UserRole::Teacher;
        let admin = UserRole::Admin;
        assert_eq!(
            resolve_page_redirect("/admin/holidays", Some(&teacher)),
            Some("/dashboard")
        );
        assert_eq!(
            resolve_page_redirect("/dashboard/grades", Some(&admin)),
            Some("/admin")
        );
        assert_eq!(resolve_page_redirect("/dashboard/grades", Some(&teacher)), None);
        assert_eq!(resolve_page_redirect("/admin", Some(&admin)), None);
    }

    #[test]
    fn test_unprotected_paths_pass() {
        assert_eq!(resolve_page_redirect("/", None), None);
        assert_eq!(resolve_page_redirect("/administrator", None), None);
        assert_eq!(resolve_page_redirect("/dashboards", None), None);
        assert_eq!(resolve_page_redirect("/assets/app.js", None), None);
    }
}
