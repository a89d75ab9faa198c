use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{classes::entities::Class, students::entities::Student};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "class.ts")]
pub struct ClassCodeResponse {
    pub code: String,
}

// 批量添加学生后的班级与新建学生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "class.ts")]
pub struct AddStudentsResponse {
    pub class: Class,
    pub students: Vec<Student>,
}
