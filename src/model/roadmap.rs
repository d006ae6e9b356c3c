use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapItem {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub tag: Option<String>,

    /// User ids; upvoting toggles membership.
    #[serde(default)]
    pub upvotes: Vec<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RoadmapItem {
    pub fn upvote_count(&self) -> usize {
        self.upvotes.len()
    }

    pub fn upvoted_by(&self, user_id: &str) -> bool {
        self.upvotes.iter().any(|id| id == user_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub roadmap: Vec<RoadmapItem>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SuggestIdeaPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EditIdeaPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}
