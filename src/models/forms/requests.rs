use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "form.ts")]
pub struct CreateFormRequest {
    pub title: String,
    #[serde(default)]
    pub competences: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "form.ts")]
pub struct UpdateFormRequest {
    pub title: Option<String>,
    pub competences: Option<Vec<i64>>,
}
