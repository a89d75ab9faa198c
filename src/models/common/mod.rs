pub mod error_code;
pub mod response;

pub use error_code::ErrorCode;
pub use response::ApiResponse;

// 程序启动时间，用于记录预处理耗时
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
