use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 班级名称
    pub name: String,
    // 学年
    pub year: String,
    // 教师ID
    pub teacher_id: i64,
    // 加入码
    pub code: String,
    // 名册中的学生ID，按加入名册的顺序排列
    pub students: Vec<i64>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.teacher_id == user_id
    }
}
