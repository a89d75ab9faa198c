/*!
 * 基于角色的访问控制中间件
 *
 * 此中间件必须在 RequireJWT 中间件之后使用，用于验证用户是否具有特定角色权限。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::{RequireJWT, RequireRole};
 * use crate::models::auth::entities::UserRole;
 *
 * web::resource("/api/classes").route(
 *     web::post()
 *         .to(create_class)
 *         .wrap(RequireRole::new(&UserRole::Teacher))  // 后执行：校验角色
 *         .wrap(RequireJWT),                          // 先执行：校验令牌
 * )
 * ```
 *
 * 或者验证多个角色：
 *
 * ```rust,ignore
 * .wrap(RequireRole::new_any(UserRole::all_roles()))  // 任一角色即可
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use super::create_error_response;
use crate::errors::AuthError;
use crate::models::auth::entities::{Identity, UserRole};

/// 角色校验：身份缺失或角色不匹配时拒绝
pub fn authorize(identity: Option<&Identity>, required: &UserRole) -> Result<(), AuthError> {
    match identity {
        Some(identity) if &identity.role == required => Ok(()),
        _ => Err(AuthError::Forbidden),
    }
}

/// 任一角色匹配即放行
fn authorize_any(identity: Option<&Identity>, roles: &[UserRole]) -> Result<(), AuthError> {
    if roles.iter().any(|role| authorize(identity, role).is_ok()) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<UserRole>,
    require_all: bool, // true表示需要所有角色，false表示任一角色即可
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: &UserRole) -> Self {
        Self {
            required_roles: vec![role.clone()],
            require_all: true,
        }
    }

    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| (*r).clone()).collect(),
            require_all: false,
        }
    }
}

fn check_roles(
    required_roles: &[UserRole],
    require_all: bool,
    identity: Option<&Identity>,
) -> Result<(), AuthError> {
    if require_all {
        // 需要所有角色（通常用于单一角色验证）
        required_roles
            .iter()
            .try_for_each(|role| authorize(identity, role))
    } else {
        // 需要任一角色
        authorize_any(identity, required_roles)
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
            required_roles: self.required_roles.clone(),
            require_all: self.require_all,
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<UserRole>,
    require_all: bool,
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
        let required_roles = self.required_roles.clone();
        let require_all = self.require_all;

        Box::pin(async move {
            // 从请求扩展中获取 RequireJWT 写入的身份
            let identity = req.extensions().get::<Identity>().cloned();

            match check_roles(&required_roles, require_all, identity.as_ref()) {
                Ok(()) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "Access denied for {:?}. Required roles: {:?}",
                        identity, required_roles
                    );
                    Ok(req.into_response(
                        create_error_response(err.status(), err.error_code(), "Access denied.")
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}
