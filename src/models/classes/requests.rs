use serde::Deserialize;
use ts_rs::TS;

use crate::models::students::requests::StudentEntry;

// 创建班级请求
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub year: String,
}

// 通过加入码认领名册中的学生
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "class.ts")]
pub struct JoinClassRequest {
    pub class_code: String,
    pub first_name: String,
    pub last_name: String,
}

// 批量添加学生
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "class.ts")]
pub struct AddStudentsRequest {
    pub students: Vec<StudentEntry>,
}

// 添加待注册学生
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "class.ts")]
pub struct AddPendingStudentRequest {
    pub name: String,
    pub email: String,
}

// 按姓氏前缀搜索学生的查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "class.ts")]
pub struct SearchStudentsQuery {
    pub class_code: String,
    #[serde(default)]
    pub last_name_prefix: String,
}

// 新建班级（用于存储层）
#[derive(Debug, Clone)]
pub struct NewClass {
    pub teacher_id: i64,
    pub name: String,
    pub year: String,
    pub code: String,
}
