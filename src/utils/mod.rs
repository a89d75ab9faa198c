pub mod class_code;
pub mod extractor;
pub mod french_words;
pub mod jwt;
pub mod parameter_error_handler;
pub mod validate;

pub use class_code::{CodeGenerator, CodeStrategy};
pub use extractor::{
    SafeCategoryIdI64, SafeClassCode, SafeClassIdI64, SafeCompetenceIdI64, SafeFormIdI64,
};
pub use jwt::JwtUtils;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
