use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::client::Acadify;
use crate::core::courses::GeneratedQuiz;
use crate::error::AcadifyError;
use crate::model::lecture::{Lecture, LectureUpdate};
use crate::model::quiz::{Level, Question, Quiz};
use crate::model::response::ApiMessage;
use crate::utils::video::extract_video_id;

const DEFAULT_QUIZ_TITLE: &str = "Generated Quiz";
const AI_QUIZ_TITLE: &str = "AI Generated Quiz";

/// In-memory working copy of a lecture's quiz for the instructor
/// editor. Edits stay local until an explicit save writes the whole
/// merged question list (plus the last-edited difficulty) back through
/// the edit-lecture mutation.
#[derive(Debug, Clone)]
pub struct QuizDraft {
    title: String,
    difficulty: Level,
    questions: Vec<Question>,
}

impl QuizDraft {
    pub fn from_lecture(lecture: &Lecture) -> Self {
        let mut draft = match &lecture.quiz {
            Some(quiz) => QuizDraft {
                title: if quiz.title.is_empty() {
                    DEFAULT_QUIZ_TITLE.to_string()
                } else {
                    quiz.title.clone()
                },
                difficulty: quiz.difficulty.unwrap_or_default(),
                questions: quiz.questions.clone(),
            },
            None => QuizDraft {
                title: DEFAULT_QUIZ_TITLE.to_string(),
                difficulty: Level::default(),
                questions: Vec::new(),
            },
        };
        draft.sanitize();
        draft
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn difficulty(&self) -> Level {
        self.difficulty
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.questions.iter().filter(|q| q.level == level).count()
    }

    fn sanitize(&mut self) -> usize {
        let repaired = self.questions.iter_mut().map(|q| q.sanitize()).filter(|&r| r).count();
        if repaired > 0 {
            log::warn!("repaired {} question(s) with orphaned correct answers", repaired);
        }
        repaired
    }

    /// Merge-by-level-replacement: a freshly generated batch at level
    /// `level` replaces only the existing questions tagged with that
    /// level; every other pool stays untouched.
    pub fn merge_generated(&mut self, generated: GeneratedQuiz, level: Level) {
        let incoming: Vec<Question> = generated
            .questions
            .into_iter()
            .map(|mut question| {
                question.level = level;
                question
            })
            .collect();

        self.questions.retain(|q| q.level != level);
        self.questions.extend(incoming);
        self.difficulty = level;
        if let Some(title) = generated.title {
            self.title = title;
        } else if self.title == DEFAULT_QUIZ_TITLE {
            self.title = AI_QUIZ_TITLE.to_string();
        }
        self.sanitize();
    }

    /* ---------------- manual edits ---------------- */

    pub fn set_question_text(&mut self, index: usize, text: &str) -> Result<(), AcadifyError> {
        let question = self.question_mut(index)?;
        question.question = text.to_string();
        Ok(())
    }

    pub fn set_option_text(
        &mut self,
        index: usize,
        option_index: usize,
        text: &str,
    ) -> Result<(), AcadifyError> {
        let question = self.question_mut(index)?;
        let option = question
            .options
            .get_mut(option_index)
            .ok_or_else(|| AcadifyError::new("no such option"))?;
        *option = text.to_string();
        Ok(())
    }

    /// The correct answer is always picked from the existing options.
    pub fn set_correct_answer(
        &mut self,
        index: usize,
        option_index: usize,
    ) -> Result<(), AcadifyError> {
        let question = self.question_mut(index)?;
        let option = question
            .options
            .get(option_index)
            .ok_or_else(|| AcadifyError::new("no such option"))?;
        question.correct_answer = option.clone();
        Ok(())
    }

    pub fn shuffle_options<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        rng: &mut R,
    ) -> Result<(), AcadifyError> {
        let question = self.question_mut(index)?;
        question.options.shuffle(rng);
        Ok(())
    }

    pub fn remove_question(&mut self, index: usize) -> Result<Question, AcadifyError> {
        if index >= self.questions.len() {
            return Err(AcadifyError::new("no such question"));
        }
        Ok(self.questions.remove(index))
    }

    /// Removes several questions at once; indices outside the list are
    /// ignored.
    pub fn remove_questions(&mut self, indices: &[usize]) {
        let mut sorted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|i| *i < self.questions.len())
            .collect();
        sorted.sort_unstable();
        sorted.dedup();
        for index in sorted.into_iter().rev() {
            self.questions.remove(index);
        }
    }

    /// Appends an empty four-option question at the draft's current
    /// difficulty for hand authoring.
    pub fn add_blank_question(&mut self) -> usize {
        self.questions.push(Question {
            question: String::new(),
            options: vec![String::new(); 4],
            correct_answer: String::new(),
            level: self.difficulty,
        });
        self.questions.len() - 1
    }

    pub fn to_quiz(&self) -> Quiz {
        Quiz {
            title: self.title.clone(),
            difficulty: Some(self.difficulty),
            questions: self.questions.clone(),
        }
    }

    fn question_mut(&mut self, index: usize) -> Result<&mut Question, AcadifyError> {
        self.questions
            .get_mut(index)
            .ok_or_else(|| AcadifyError::new("no such question"))
    }
}

impl Acadify {
    /// Full regenerate flow: fetch the lecture, ask the backend for a
    /// new batch at `level`, merge it over the same-level pool only,
    /// and save the merged list back as the lecture's quiz.
    pub async fn regenerate_lecture_quiz(
        &self,
        course_id: &str,
        lecture_id: &str,
        transcript: &str,
        level: Level,
        question_count: u32,
    ) -> Result<Quiz, AcadifyError> {
        let lecture = self.lecture(course_id, lecture_id).await?;
        let mut draft = QuizDraft::from_lecture(&lecture);

        let generated = self.generate_quiz(transcript, level, question_count).await?;
        draft.merge_generated(generated, level);

        let quiz = draft.to_quiz();
        self.edit_lecture(
            course_id,
            lecture_id,
            &LectureUpdate::replace_quiz(quiz.clone()),
        )
        .await?;
        Ok(quiz)
    }

    pub async fn save_quiz_draft(
        &self,
        course_id: &str,
        lecture_id: &str,
        draft: &QuizDraft,
    ) -> Result<ApiMessage, AcadifyError> {
        self.edit_lecture(
            course_id,
            lecture_id,
            &LectureUpdate::replace_quiz(draft.to_quiz()),
        )
        .await
    }

    /// Permanent quiz removal; a subsequent lecture fetch comes back
    /// without a quiz.
    pub async fn delete_lecture_quiz(
        &self,
        course_id: &str,
        lecture_id: &str,
    ) -> Result<ApiMessage, AcadifyError> {
        self.edit_lecture(course_id, lecture_id, &LectureUpdate::remove_quiz())
            .await
    }

    /// Metadata save from the lecture editor. The video reference is a
    /// pasted URL; failing to extract a provider id blocks the save
    /// with a specific message instead of accepting a broken link.
    pub async fn update_lecture_details(
        &self,
        course_id: &str,
        lecture_id: &str,
        lecture_title: &str,
        video_url: &str,
        is_preview_free: bool,
        quiz: Option<Quiz>,
    ) -> Result<ApiMessage, AcadifyError> {
        if lecture_title.trim().is_empty() {
            return Err(AcadifyError::new("Title required!"));
        }
        let video_id = extract_video_id(video_url)
            .ok_or_else(|| AcadifyError::new("Valid YouTube URL required!"))?;

        self.edit_lecture(
            course_id,
            lecture_id,
            &LectureUpdate {
                lecture_title: Some(lecture_title.to_string()),
                video_id: Some(video_id),
                is_preview_free: Some(is_preview_free),
                quiz,
                remove_quiz: false,
            },
        )
        .await
    }
}
