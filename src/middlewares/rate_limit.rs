/*!
 * 速率限制中间件
 *
 * 此中间件用于限制匿名接口的请求频率，防止枚举班级加入码。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RateLimit;
 *
 * web::resource("/students-by-code/{class_code}")
 *     .wrap(RateLimit::class_code_lookup(&config.rate_limit))
 *     .route(web::get().to(list_students_by_code))
 * ```
 *
 * ## 限制规则
 *
 * - 已认证请求使用用户 ID 作为限制键，否则使用客户端 IP
 * - 转发头只在对端属于 `rate_limit.trusted_proxies` 时生效
 * - 固定时间窗口计数，窗口编号包含在限制键中
 * - 超过限制返回 429 Too Many Requests
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::config::RateLimitConfig;
use crate::models::auth::entities::Identity;
use crate::models::{ApiResponse, ErrorCode};

/// 全局速率限制缓存
/// 键: 路由前缀:标识:窗口编号，值: 请求计数
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

/// 窗口上限，超过该值的配置会被截断
const MAX_WINDOW_SECS: u64 = 3600;

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
    /// 可信反向代理
    trusted_proxies: Arc<[IpAddr]>,
}

impl RateLimit {
    /// 创建新的速率限制器
    ///
    /// # 参数
    /// - `max_requests`: 时间窗口内允许的最大请求数
    /// - `window_secs`: 时间窗口（秒）
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            key_prefix: String::new(),
            trusted_proxies: Arc::from(Vec::<IpAddr>::new()),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 设置可信反向代理
    pub fn with_trusted_proxies(mut self, proxies: Vec<IpAddr>) -> Self {
        self.trusted_proxies = Arc::from(proxies);
        self
    }

    /// 从配置创建
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window_secs)
            .with_trusted_proxies(parse_trusted_proxies(&config.trusted_proxies))
    }

    /// 按加入码匿名查询：防止暴力枚举
    pub fn class_code_lookup(config: &RateLimitConfig) -> Self {
        Self::from_config(config).with_prefix("class_code")
    }

    /// 按加入码搜索学生
    pub fn student_search(config: &RateLimitConfig) -> Self {
        Self::from_config(config).with_prefix("student_search")
    }
}

/// 从请求中提取客户端 IP
///
/// 默认使用 TCP 对端地址。只有对端属于可信代理时才读取 X-Forwarded-For / X-Real-IP，
/// 否则客户端可以轮换转发头绕过限制。
fn extract_client_ip(req: &ServiceRequest, trusted_proxies: &[IpAddr]) -> String {
    let peer_ip = req.peer_addr().map(|addr| addr.ip());

    let from_trusted_proxy = peer_ip.is_some_and(|ip| trusted_proxies.contains(&ip));
    if from_trusted_proxy {
        // 只取第一个 IP（最接近客户端的）
        if let Some(forwarded) = req.headers().get("X-Forwarded-For")
            && let Ok(value) = forwarded.to_str()
            && let Some(ip) = value.split(',').next()
        {
            let ip = ip.trim();
            if is_valid_ip(ip) {
                return ip.to_string();
            }
        }

        if let Some(real_ip) = req.headers().get("X-Real-IP")
            && let Ok(ip) = real_ip.to_str()
        {
            let ip = ip.trim();
            if is_valid_ip(ip) {
                return ip.to_string();
            }
        }
    }

    peer_ip
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 解析可信代理列表，忽略无效条目
fn parse_trusted_proxies(entries: &[String]) -> Vec<IpAddr> {
    entries
        .iter()
        .filter_map(|entry| match entry.trim().parse::<IpAddr>() {
            Ok(ip) => Some(ip),
            Err(_) => {
                warn!("Ignoring invalid trusted proxy address: {}", entry);
                None
            }
        })
        .collect()
}

/// 验证 IP 地址格式是否有效
fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// 从请求中提取用户 ID（如果已认证）
fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    req.extensions().get::<Identity>().map(|identity| identity.id)
}

/// 当前时间所在的窗口编号
fn current_window(window_secs: u64) -> u64 {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    now / window_secs.max(1)
}

/// 创建速率限制错误响应
fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window_secs: self.window_secs,
            key_prefix: self.key_prefix.clone(),
            trusted_proxies: self.trusted_proxies.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
    trusted_proxies: Arc<[IpAddr]>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let max_requests = self.max_requests;
        let window_secs = self.window_secs;
        let key_prefix = self.key_prefix.clone();
        let trusted_proxies = self.trusted_proxies.clone();

        Box::pin(async move {
            // 构建限制键
            let identifier = extract_user_id(&req)
                .map(|id| format!("user:{}", id))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req, &trusted_proxies)));

            let window = current_window(window_secs);
            let cache_key = if key_prefix.is_empty() {
                format!("{}:{}", identifier, window)
            } else {
                format!("{}:{}:{}", key_prefix, identifier, window)
            };

            // 获取当前计数
            let current_count = RATE_LIMIT_CACHE.get(&cache_key).await.unwrap_or(0);

            // 检查是否超过限制
            if current_count >= max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    cache_key, current_count, max_requests
                );
                return Ok(req
                    .into_response(create_rate_limit_response(window_secs).map_into_right_body()));
            }

            // 增加计数
            RATE_LIMIT_CACHE
                .insert(cache_key.clone(), current_count + 1)
                .await;

            let info = RateLimitInfo {
                remaining: max_requests.saturating_sub(current_count + 1),
                limit: max_requests,
                reset: window_secs,
            };
            req.extensions_mut().insert(info.clone());

            // 继续处理请求，并添加速率限制头
            let mut res = srv.call(req).await?;
            info.apply_headers(res.headers_mut());
            Ok(res.map_into_left_body())
        })
    }
}

/// 速率限制信息
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub limit: u32,
    pub reset: u64,
}

impl RateLimitInfo {
    fn apply_headers(&self, headers: &mut HeaderMap) {
        for (name, value) in [
            ("x-ratelimit-limit", self.limit.to_string()),
            ("x-ratelimit-remaining", self.remaining.to_string()),
            ("x-ratelimit-reset", self.reset.to_string()),
        ] {
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.insert(HeaderName::from_static(name), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let config = RateLimitConfig {
            max_requests: 12,
            window_secs: 30,
            trusted_proxies: vec!["10.0.0.1".to_string(), "bogus".to_string()],
        };

        let lookup = RateLimit::class_code_lookup(&config);
        assert_eq!(lookup.max_requests, 12);
        assert_eq!(lookup.window_secs, 30);
        assert_eq!(lookup.key_prefix, "class_code");

        assert_eq!(&*lookup.trusted_proxies, &[proxy()]);

        let search = RateLimit::student_search(&config);
        assert_eq!(search.key_prefix, "student_search");
    }

    fn proxy() -> IpAddr {
        "10.0.0.1".parse().unwrap()
    }

    #[test]
    fn test_forwarded_headers_ignored_without_trusted_proxy() {
        let req = actix_web::test::TestRequest::default()
            .peer_addr("192.0.2.5:40000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "198.51.100.1"))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_srv_request();

        assert_eq!(extract_client_ip(&req, &[]), "192.0.2.5");
        assert_eq!(extract_client_ip(&req, &[proxy()]), "192.0.2.5");
    }

    #[test]
    fn test_forwarded_headers_read_behind_trusted_proxy() {
        let req = actix_web::test::TestRequest::default()
            .peer_addr("10.0.0.1:40000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "198.51.100.1, 10.0.0.1"))
            .to_srv_request();
        assert_eq!(extract_client_ip(&req, &[proxy()]), "198.51.100.1");

        let req = actix_web::test::TestRequest::default()
            .peer_addr("10.0.0.1:40000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "garbage"))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_srv_request();
        assert_eq!(extract_client_ip(&req, &[proxy()]), "198.51.100.2");
    }

    #[test]
    fn test_missing_peer_address() {
        let req = actix_web::test::TestRequest::default()
            .insert_header(("X-Forwarded-For", "198.51.100.1"))
            .to_srv_request();
        assert_eq!(extract_client_ip(&req, &[proxy()]), "unknown");
    }

    #[test]
    fn test_window_is_clamped() {
        assert_eq!(RateLimit::new(1, 0).window_secs, 1);
        assert_eq!(RateLimit::new(1, 86_400).window_secs, MAX_WINDOW_SECS);
    }

    #[test]
    fn test_is_valid_ip() {
        assert!(is_valid_ip("127.0.0.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("not-an-ip"));
    }
}
