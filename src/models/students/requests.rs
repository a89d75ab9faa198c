use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 名册条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "student.ts")]
pub struct StudentEntry {
    pub first_name: String,
    pub last_name: String,
}

impl StudentEntry {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
