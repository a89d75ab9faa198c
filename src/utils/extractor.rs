//! 路径参数与身份提取器
//!
//! 路径中的 ID 必须是正整数，否则直接返回 400，不进入业务逻辑。

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::errors::{AppError, AuthError};
use crate::middlewares::RequireJWT;
use crate::models::auth::entities::Identity;

/// 定义读取路径参数并校验为正整数的提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = $crate::errors::AppError;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                let result = match req.match_info().get($param) {
                    Some(raw) => match raw.parse::<i64>() {
                        Ok(id) if id > 0 => Ok($name(id)),
                        _ => Err($crate::errors::AppError::validation(format!(
                            "Invalid path parameter '{}': expected a positive integer",
                            $param
                        ))),
                    },
                    None => Err($crate::errors::AppError::validation(format!(
                        "Missing path parameter '{}'",
                        $param
                    ))),
                };
                futures_util::future::ready(result)
            }
        }
    };
}

define_safe_i64_extractor!(SafeClassIdI64, "class_id");
define_safe_i64_extractor!(SafeCategoryIdI64, "category_id");
define_safe_i64_extractor!(SafeCompetenceIdI64, "competence_id");
define_safe_i64_extractor!(SafeFormIdI64, "form_id");

const MAX_CLASS_CODE_LENGTH: usize = 64;

/// 加入码路径参数：非空、只含字母数字
#[derive(Debug, Clone)]
pub struct SafeClassCode(pub String);

impl FromRequest for SafeClassCode {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.match_info().get("class_code") {
            Some(code)
                if !code.is_empty()
                    && code.len() <= MAX_CLASS_CODE_LENGTH
                    && code.chars().all(|c| c.is_ascii_alphanumeric()) =>
            {
                Ok(SafeClassCode(code.to_string()))
            }
            _ => Err(AppError::validation("Invalid class code")),
        };
        ready(result)
    }
}

/// 从请求扩展中读取 RequireJWT 写入的身份
impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            RequireJWT::extract_identity(req).ok_or_else(|| AppError::from(AuthError::Missing)),
        )
    }
}
