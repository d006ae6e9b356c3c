use serde::{Deserialize, Serialize};

use crate::model::quiz::Quiz;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    #[serde(rename = "_id")]
    pub id: String,

    pub lecture_title: String,

    /// Provider video identifier, extracted client-side from a pasted
    /// URL before upload.
    #[serde(default)]
    pub video_id: Option<String>,

    #[serde(default)]
    pub is_preview_free: bool,

    #[serde(default)]
    pub quiz: Option<Quiz>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LectureResponse {
    #[serde(default)]
    pub success: bool,
    pub lecture: Lecture,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LectureListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateLecturePayload {
    pub lecture_title: String,
    pub video_id: String,
    pub is_preview_free: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Partial update for the edit-lecture endpoint. The same mutation
/// carries metadata edits, quiz replacement, and quiz removal, so
/// unset fields stay off the wire.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LectureUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lecture_title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_preview_free: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,

    #[serde(skip_serializing_if = "is_false")]
    pub remove_quiz: bool,
}

impl LectureUpdate {
    pub fn remove_quiz() -> Self {
        LectureUpdate {
            remove_quiz: true,
            ..LectureUpdate::default()
        }
    }

    pub fn replace_quiz(quiz: Quiz) -> Self {
        LectureUpdate {
            quiz: Some(quiz),
            ..LectureUpdate::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lecture_update_serializes_only_set_fields() {
        let update = LectureUpdate {
            lecture_title: Some("Ownership".into()),
            ..LectureUpdate::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "lectureTitle": "Ownership" })
        );

        let removal = serde_json::to_value(LectureUpdate::remove_quiz()).unwrap();
        assert_eq!(removal, serde_json::json!({ "removeQuiz": true }));
    }
}
