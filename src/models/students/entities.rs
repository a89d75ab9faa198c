use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 名册中的学生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "student.ts")]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub class_id: i64,
    // 认领该学生的账号，未加入前为空
    pub user_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn is_claimed(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn matches_name(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name == first_name && self.last_name == last_name
    }
}

// 仅包含姓名，用于匿名按加入码查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "student.ts")]
pub struct StudentName {
    pub first_name: String,
    pub last_name: String,
}

// 搜索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "student.ts")]
pub struct StudentSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl From<Student> for StudentName {
    fn from(student: Student) -> Self {
        Self {
            first_name: student.first_name,
            last_name: student.last_name,
        }
    }
}

impl From<Student> for StudentSummary {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name,
            last_name: student.last_name,
        }
    }
}

// 待注册学生，与名册相互独立
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "student.ts")]
pub struct PendingStudent {
    pub id: i64,
    pub class_id: i64,
    pub name: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
