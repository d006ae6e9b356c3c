use reqwest::Method;

use crate::core::cache::{Tag, TagKind};
use crate::core::client::Acadify;
use crate::error::AcadifyError;
use crate::model::contact::ContactPayload;
use crate::model::response::ApiMessage;
use crate::model::roadmap::{EditIdeaPayload, RoadmapItem, RoadmapResponse, SuggestIdeaPayload};

impl Acadify {
    pub async fn roadmap(&self) -> Result<Vec<RoadmapItem>, AcadifyError> {
        let response: RoadmapResponse = self
            .get_cached("roadmap", vec![Tag::list(TagKind::Roadmap)])
            .await?;
        Ok(response.roadmap)
    }

    pub async fn suggest_idea(&self, payload: &SuggestIdeaPayload) -> Result<ApiMessage, AcadifyError> {
        self.mutate(
            Method::POST,
            "roadmap/suggest",
            Some(payload),
            &[Tag::list(TagKind::Roadmap)],
        )
        .await
    }

    pub async fn toggle_upvote(&self, idea_id: &str) -> Result<ApiMessage, AcadifyError> {
        self.mutate(
            Method::PUT,
            &format!("roadmap/upvote/{}", idea_id),
            None::<&serde_json::Value>,
            &[Tag::list(TagKind::Roadmap)],
        )
        .await
    }

    pub async fn edit_idea(
        &self,
        idea_id: &str,
        payload: &EditIdeaPayload,
    ) -> Result<ApiMessage, AcadifyError> {
        self.mutate(
            Method::PUT,
            &format!("roadmap/edit/{}", idea_id),
            Some(payload),
            &[Tag::list(TagKind::Roadmap)],
        )
        .await
    }

    pub async fn delete_idea(&self, idea_id: &str) -> Result<ApiMessage, AcadifyError> {
        self.mutate(
            Method::DELETE,
            &format!("roadmap/delete/{}", idea_id),
            None::<&serde_json::Value>,
            &[Tag::list(TagKind::Roadmap)],
        )
        .await
    }

    pub async fn send_contact_message(
        &self,
        payload: &ContactPayload,
    ) -> Result<ApiMessage, AcadifyError> {
        self.mutate(
            Method::POST,
            "contact",
            Some(payload),
            &[Tag::list(TagKind::Contact)],
        )
        .await
    }
}
