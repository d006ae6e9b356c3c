use reqwest::Method;

use crate::core::cache::{Tag, TagKind};
use crate::core::client::Acadify;
use crate::error::AcadifyError;
use crate::model::progress::{CourseProgress, ProgressResponse};
use crate::model::response::ApiMessage;

impl Acadify {
    pub async fn course_progress(&self, course_id: &str) -> Result<CourseProgress, AcadifyError> {
        let response: ProgressResponse = self
            .get_cached(
                &format!("progress/{}", course_id),
                vec![Tag::entity(TagKind::Progress, course_id)],
            )
            .await?;
        Ok(response.progress)
    }

    pub async fn mark_lecture_completed(
        &self,
        course_id: &str,
        lecture_id: &str,
    ) -> Result<ApiMessage, AcadifyError> {
        self.mutate(
            Method::POST,
            &format!("progress/{}/lecture/{}", course_id, lecture_id),
            None::<&serde_json::Value>,
            &[Tag::entity(TagKind::Progress, course_id)],
        )
        .await
    }

    pub async fn reset_course_progress(&self, course_id: &str) -> Result<ApiMessage, AcadifyError> {
        self.mutate(
            Method::POST,
            &format!("progress/{}/reset", course_id),
            None::<&serde_json::Value>,
            &[Tag::entity(TagKind::Progress, course_id)],
        )
        .await
    }
}
