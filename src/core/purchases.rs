use reqwest::Method;
use serde_json::json;

use crate::core::cache::{Tag, TagKind};
use crate::core::client::Acadify;
use crate::error::AcadifyError;
use crate::model::course::Course;
use crate::model::purchase::{MyLearningResponse, OrderResponse, PurchaseCheckResponse};

impl Acadify {
    /// Creates a payment order. Invalidates every Course view along
    /// with the purchase state so an entitlement change shows up
    /// everywhere without manual refetch wiring.
    pub async fn create_course_order(&self, course_id: &str) -> Result<OrderResponse, AcadifyError> {
        let body = json!({ "courseId": course_id });
        self.mutate(
            Method::POST,
            "course-purchase/create-order",
            Some(&body),
            &[Tag::list(TagKind::Purchase), Tag::list(TagKind::Course)],
        )
        .await
    }

    pub async fn check_course_purchase(
        &self,
        course_id: &str,
    ) -> Result<PurchaseCheckResponse, AcadifyError> {
        self.get_cached(
            &format!("course-purchase/check/{}", course_id),
            vec![Tag::entity(TagKind::Purchase, course_id)],
        )
        .await
    }

    pub async fn my_learning(&self) -> Result<Vec<Course>, AcadifyError> {
        let response: MyLearningResponse = self
            .get_cached(
                "course-purchase/my-learning",
                vec![Tag::list(TagKind::Purchase)],
            )
            .await?;
        Ok(response.courses)
    }

    /// Post-purchase state can be ambiguous when the gateway confirms
    /// out of band. Instead of reconciling the cache by hand, drop
    /// everything the purchase touches and refetch the detail.
    pub async fn reload_after_purchase(&self, course_id: &str) -> Result<Course, AcadifyError> {
        self.cache.invalidate(&[
            Tag::list(TagKind::Purchase),
            Tag::entity(TagKind::Course, course_id),
        ]);
        self.course_detail(course_id).await
    }
}
