pub mod auth;
pub mod categories;
pub mod classes;
pub mod common;
pub mod competences;
pub mod forms;
pub mod students;

pub use common::{ApiResponse, AppStartTime, ErrorCode};
