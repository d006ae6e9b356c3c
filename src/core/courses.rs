use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;

use crate::core::cache::{Tag, TagKind};
use crate::core::client::Acadify;
use crate::error::AcadifyError;
use crate::model::course::{
    Course, CourseListResponse, CourseResponse, CourseUpdate, CreateCoursePayload, DashboardStats,
};
use crate::model::lecture::{
    CreateLecturePayload, Lecture, LectureListResponse, LectureResponse, LectureUpdate,
};
use crate::model::quiz::{Level, Question};
use crate::model::response::ApiMessage;

/// Reply of the backend's AI quiz generation service.
#[derive(Deserialize, Debug, Clone)]
pub struct GeneratedQuiz {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Acadify {
    /* ---------------- creator endpoints ---------------- */

    pub async fn create_course(&self, payload: &CreateCoursePayload) -> Result<Course, AcadifyError> {
        let response: CourseResponse = self
            .mutate(
                Method::POST,
                "course",
                Some(payload),
                &[Tag::list(TagKind::CreatorCourse)],
            )
            .await?;
        Ok(response.course)
    }

    pub async fn creator_courses(&self) -> Result<Vec<Course>, AcadifyError> {
        let response: CourseListResponse = self
            .get_cached("course/creator", vec![Tag::list(TagKind::CreatorCourse)])
            .await?;
        Ok(response.courses)
    }

    pub async fn creator_course(&self, course_id: &str) -> Result<Course, AcadifyError> {
        let response: CourseResponse = self
            .get_cached(
                &format!("course/creator/{}", course_id),
                vec![Tag::entity(TagKind::Course, course_id)],
            )
            .await?;
        Ok(response.course)
    }

    pub async fn edit_course(
        &self,
        course_id: &str,
        update: &CourseUpdate,
    ) -> Result<Course, AcadifyError> {
        let response: CourseResponse = self
            .mutate(
                Method::PUT,
                &format!("course/{}", course_id),
                Some(update),
                &[
                    Tag::list(TagKind::CreatorCourse),
                    Tag::list(TagKind::PublishedCourse),
                    Tag::entity(TagKind::Course, course_id),
                ],
            )
            .await?;
        Ok(response.course)
    }

    pub async fn upload_course_thumbnail(
        &self,
        course_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ApiMessage, AcadifyError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("image/*")
            .map_err(|err| AcadifyError::with_source("invalid thumbnail upload", err))?;
        let form = Form::new().part("courseThumbnail", part);

        self.put_multipart(
            &format!("course/{}/thumbnail", course_id),
            form,
            &[
                Tag::entity(TagKind::Course, course_id),
                Tag::list(TagKind::CreatorCourse),
            ],
        )
        .await
    }

    pub async fn toggle_publish_course(&self, course_id: &str) -> Result<ApiMessage, AcadifyError> {
        self.mutate(
            Method::PATCH,
            &format!("course/{}/toggle-publish", course_id),
            None::<&serde_json::Value>,
            &[
                Tag::list(TagKind::CreatorCourse),
                Tag::list(TagKind::PublishedCourse),
                Tag::entity(TagKind::Course, course_id),
            ],
        )
        .await
    }

    pub async fn delete_course(&self, course_id: &str) -> Result<ApiMessage, AcadifyError> {
        self.mutate(
            Method::DELETE,
            &format!("course/{}", course_id),
            None::<&serde_json::Value>,
            &[
                Tag::list(TagKind::CreatorCourse),
                Tag::list(TagKind::PublishedCourse),
            ],
        )
        .await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AcadifyError> {
        // tagged Purchase: a sale anywhere refreshes the dashboard
        self.get_cached("course/purchase/stats", vec![Tag::list(TagKind::Purchase)])
            .await
    }

    /* ---------------- public & student endpoints ---------------- */

    pub async fn published_courses(&self) -> Result<Vec<Course>, AcadifyError> {
        let response: CourseListResponse = self
            .get_cached("course/published", vec![Tag::list(TagKind::PublishedCourse)])
            .await?;
        Ok(response.courses)
    }

    pub async fn public_course(&self, course_id: &str) -> Result<Course, AcadifyError> {
        let response: CourseResponse = self
            .get_cached(
                &format!("course/public/{}", course_id),
                vec![Tag::entity(TagKind::Course, course_id)],
            )
            .await?;
        Ok(response.course)
    }

    /// Course detail with its lessons, purchase flag included.
    pub async fn course_detail(&self, course_id: &str) -> Result<Course, AcadifyError> {
        let response: CourseResponse = self
            .get_cached(
                &format!("course/{}", course_id),
                vec![Tag::entity(TagKind::Course, course_id)],
            )
            .await?;
        Ok(response.course)
    }

    /* ---------------- lecture endpoints ---------------- */

    pub async fn create_lecture(
        &self,
        course_id: &str,
        payload: &CreateLecturePayload,
    ) -> Result<Lecture, AcadifyError> {
        let response: LectureResponse = self
            .mutate(
                Method::POST,
                &format!("course/{}/lecture", course_id),
                Some(payload),
                &[Tag::entity(TagKind::Course, course_id)],
            )
            .await?;
        Ok(response.lecture)
    }

    pub async fn course_lectures(&self, course_id: &str) -> Result<Vec<Lecture>, AcadifyError> {
        let response: LectureListResponse = self
            .get_cached(
                &format!("course/{}/lecture", course_id),
                vec![Tag::entity(TagKind::Course, course_id)],
            )
            .await?;
        Ok(response.lectures)
    }

    /// Fetches one lecture; its embedded quiz is sanitized on load so
    /// an orphaned correct answer can never reach the quiz engine.
    pub async fn lecture(&self, course_id: &str, lecture_id: &str) -> Result<Lecture, AcadifyError> {
        let response: LectureResponse = self
            .get_cached(
                &format!("course/{}/lecture/{}", course_id, lecture_id),
                vec![Tag::entity(TagKind::Lecture, lecture_id)],
            )
            .await?;

        let mut lecture = response.lecture;
        if let Some(quiz) = lecture.quiz.as_mut() {
            let repaired = quiz.sanitize();
            if repaired > 0 {
                log::warn!(
                    "repaired {} question(s) with missing correct answers in lecture {}",
                    repaired,
                    lecture_id
                );
            }
        }
        Ok(lecture)
    }

    pub async fn edit_lecture(
        &self,
        course_id: &str,
        lecture_id: &str,
        update: &LectureUpdate,
    ) -> Result<ApiMessage, AcadifyError> {
        self.mutate(
            Method::PUT,
            &format!("course/{}/lecture/{}", course_id, lecture_id),
            Some(update),
            &[
                Tag::entity(TagKind::Lecture, lecture_id),
                Tag::entity(TagKind::Course, course_id),
            ],
        )
        .await
    }

    pub async fn remove_lecture(
        &self,
        course_id: &str,
        lecture_id: &str,
    ) -> Result<ApiMessage, AcadifyError> {
        self.mutate(
            Method::DELETE,
            &format!("course/{}/lecture/{}", course_id, lecture_id),
            None::<&serde_json::Value>,
            &[Tag::entity(TagKind::Course, course_id)],
        )
        .await
    }

    /* ---------------- quiz generation ---------------- */

    /// Delegates question generation to the backend's AI service. The
    /// merge into the existing quiz happens client-side, see
    /// [`crate::core::authoring`].
    pub async fn generate_quiz(
        &self,
        transcript: &str,
        difficulty: Level,
        question_count: u32,
    ) -> Result<GeneratedQuiz, AcadifyError> {
        if transcript.trim().is_empty() {
            return Err(AcadifyError::new("Transcript required!"));
        }
        let body = json!({
            "transcript": transcript,
            "difficulty": difficulty,
            "questionCount": question_count,
        });
        self.mutate(Method::POST, "course/generate-quiz", Some(&body), &[])
            .await
    }
}
