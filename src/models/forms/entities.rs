use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::competences::entities::Competence;

// 评估表单，competences 为有序的能力项ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "form.ts")]
pub struct Form {
    pub id: i64,
    pub title: String,
    pub created_by: i64,
    pub competences: Vec<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 能力项已展开的评估表单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "form.ts")]
pub struct FormWithCompetences {
    pub id: i64,
    pub title: String,
    pub created_by: i64,
    pub competences: Vec<Competence>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl FormWithCompetences {
    /// 按表单中的顺序展开能力项，缺失的ID会被跳过
    pub fn from_form(form: Form, catalog: &[Competence]) -> Self {
        let competences = form
            .competences
            .iter()
            .filter_map(|id| catalog.iter().find(|c| c.id == *id).cloned())
            .collect();

        Self {
            id: form.id,
            title: form.title,
            created_by: form.created_by,
            competences,
            created_at: form.created_at,
            updated_at: form.updated_at,
        }
    }
}
