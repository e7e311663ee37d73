use serde::{Deserialize, Serialize};

/// A summary row as stored in the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub id: i64,
    pub url: String,
    pub summary: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Insert payload for the record store; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSummaryRecord {
    pub url: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl NewSummaryRecord {
    pub fn into_record(self, id: i64) -> SummaryRecord {
        SummaryRecord {
            id,
            url: self.url,
            summary: self.summary,
            user_id: self.user_id,
        }
    }
}
