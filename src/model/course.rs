use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::lecture::Lecture;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,

    pub course_title: String,

    #[serde(default)]
    pub sub_title: Option<String>,

    /// Rich-text HTML written in the course editor.
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub course_price: Option<u32>,

    #[serde(default)]
    pub course_thumbnail: Option<String>,

    #[serde(default)]
    pub creator: Option<Creator>,

    #[serde(default)]
    pub enrolled_students: Vec<String>,

    #[serde(default)]
    pub lectures: Vec<Lecture>,

    #[serde(default)]
    pub is_published: bool,

    /// Computed by the backend relative to the requesting user.
    #[serde(default)]
    pub purchased: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CourseResponse {
    #[serde(default)]
    pub success: bool,
    pub course: Course,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CourseListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoursePayload {
    pub course_title: String,
    pub category: String,
}

#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_price: Option<u32>,
}

/// Instructor dashboard numbers; tagged with Purchase so a sale
/// refreshes them without manual wiring.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub total_sales: u64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_students: u64,
}
