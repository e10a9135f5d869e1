use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}
