use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LectureProgress {
    pub lecture_id: String,
    #[serde(default)]
    pub viewed: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    #[serde(default)]
    pub lecture_progress: Vec<LectureProgress>,
    #[serde(default)]
    pub completed: bool,
}

impl CourseProgress {
    pub fn is_viewed(&self, lecture_id: &str) -> bool {
        self.lecture_progress
            .iter()
            .any(|p| p.lecture_id == lecture_id && p.viewed)
    }

    pub fn viewed_count(&self) -> usize {
        self.lecture_progress.iter().filter(|p| p.viewed).count()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub progress: CourseProgress,
}
