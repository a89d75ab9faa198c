#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use rust_classroom_next::config::{AppConfig, DatabaseConfig};
use rust_classroom_next::models::auth::entities::UserRole;
use rust_classroom_next::routes;
use rust_classroom_next::runtime::lifetime::startup::StartupContext;
use rust_classroom_next::storage::sea_orm_storage::SeaOrmStorage;
use rust_classroom_next::utils::{json_error_handler, query_error_handler};
use serde_json::Value;

pub const TEACHER_A: i64 = 1;
pub const TEACHER_B: i64 = 2;
pub const STUDENT_U: i64 = 100;
pub const STUDENT_V: i64 = 101;

/// 使用独立内存数据库构建应用上下文
pub async fn test_context() -> StartupContext {
    let storage = SeaOrmStorage::connect(&DatabaseConfig {
        url: ":memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .expect("in-memory storage");

    StartupContext::from_storage(Arc::new(storage), AppConfig::get())
}

/// 与 main 相同的路由与错误处理配置
pub fn build_app(
    ctx: StartupContext,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .configure(move |cfg| ctx.register(cfg))
        .configure(routes::configure_classes_routes)
        .configure(routes::configure_categories_routes)
        .configure(routes::configure_competences_routes)
        .configure(routes::configure_forms_routes)
}

pub fn bearer(ctx: &StartupContext, user_id: i64, role: UserRole) -> (&'static str, String) {
    let token = ctx
        .jwt
        .generate_access_token(user_id, &role)
        .expect("token generation");
    ("Authorization", format!("Bearer {token}"))
}

pub fn teacher(ctx: &StartupContext, user_id: i64) -> (&'static str, String) {
    bearer(ctx, user_id, UserRole::Teacher)
}

pub fn student(ctx: &StartupContext, user_id: i64) -> (&'static str, String) {
    bearer(ctx, user_id, UserRole::Student)
}

/// 测试请求的对端地址
pub fn peer(ip: &str) -> SocketAddr {
    SocketAddr::new(ip.parse().expect("valid ip"), 40000)
}

/// 取出响应信封中的 data 字段
pub fn data(body: &Value) -> &Value {
    body.get("data").expect("response envelope carries data")
}
