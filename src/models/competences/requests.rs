use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "competence.ts")]
pub struct CreateCompetenceRequest {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "competence.ts")]
pub struct UpdateCompetenceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}
