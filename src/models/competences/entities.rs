use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::categories::entities::Category;

// 能力项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "competence.ts")]
pub struct Competence {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 附带所属分类的能力项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "competence.ts")]
pub struct CompetenceWithCategory {
    #[serde(flatten)]
    pub competence: Competence,
    pub category: Category,
}
