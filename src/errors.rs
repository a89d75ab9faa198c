//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称、HTTP 状态码和业务错误码。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::{DbErr, SqlErr};
use tracing::error;

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - status() 方法 - 返回 HTTP 状态码
/// - error_code() 方法 - 返回响应体中的业务错误码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_app_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident, $error_code:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AppError {
            $($variant(String),)*
        }

        impl AppError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AppError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AppError::$variant(_) => $type_name,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn status(&self) -> StatusCode {
                match self {
                    $(AppError::$variant(_) => StatusCode::$status,)*
                }
            }

            /// 获取业务错误码
            pub fn error_code(&self) -> ErrorCode {
                match self {
                    $(AppError::$variant(_) => ErrorCode::$error_code,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AppError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AppError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AppError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_app_errors! {
    DatabaseConfig("E001", "Database Configuration Error", INTERNAL_SERVER_ERROR, InternalServerError),
    DatabaseConnection("E002", "Database Connection Error", INTERNAL_SERVER_ERROR, InternalServerError),
    DatabaseOperation("E003", "Database Operation Error", INTERNAL_SERVER_ERROR, InternalServerError),
    Serialization("E004", "Serialization Error", INTERNAL_SERVER_ERROR, InternalServerError),
    Validation("E005", "Validation Error", BAD_REQUEST, BadRequest),
    NotFound("E006", "Resource Not Found", NOT_FOUND, NotFound),
    Conflict("E007", "Conflict", CONFLICT, Conflict),
    Authentication("E008", "Authentication Error", UNAUTHORIZED, Unauthorized),
    Authorization("E009", "Authorization Error", FORBIDDEN, Forbidden),
    CodeSpaceExhausted("E010", "Code Space Exhausted", INTERNAL_SERVER_ERROR, CodeSpaceExhausted),
}

impl AppError {
    /// 内部错误不向客户端暴露细节
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::DatabaseConfig(_)
                | AppError::DatabaseConnection(_)
                | AppError::DatabaseOperation(_)
                | AppError::Serialization(_)
        )
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 将数据库错误按约束类型归类，`context` 描述失败的操作
    pub fn from_db(context: &str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                AppError::Conflict(format!("{context}: unique constraint violated ({detail})"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => AppError::Conflict(format!(
                "{context}: foreign key constraint violated ({detail})"
            )),
            _ => AppError::DatabaseOperation(format!("{context}: {err}")),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            error!("{}", self.format_simple());
            "Internal server error".to_string()
        } else {
            self.message().to_string()
        };

        HttpResponse::build(self.status()).json(ApiResponse::error_empty(self.error_code(), message))
    }
}

// 为常见的错误类型实现 From trait
impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::from_db("Database operation failed", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Missing | AuthError::Invalid => AppError::Authentication(err.to_string()),
            AuthError::Forbidden => AppError::Authorization(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// 令牌校验与角色校验的失败类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// 请求未携带凭证
    Missing,
    /// 签名、过期时间、令牌类型或声明内容无效
    Invalid,
    /// 身份缺失或角色不满足要求
    Forbidden,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Missing | AuthError::Invalid => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            AuthError::Missing | AuthError::Invalid => ErrorCode::Unauthorized,
            AuthError::Forbidden => ErrorCode::Forbidden,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Missing => write!(f, "Missing or invalid Authorization header"),
            AuthError::Invalid => write!(f, "Invalid or expired token"),
            AuthError::Forbidden => write!(f, "Access denied"),
        }
    }
}

impl std::error::Error for AuthError {}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status())
            .json(ApiResponse::error_empty(self.error_code(), self.to_string()))
    }
}
