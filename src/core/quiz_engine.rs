use std::collections::{HashMap, HashSet};
use std::time::Duration;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::error::AcadifyError;
use crate::model::quiz::{Level, Question, Quiz};

/// Attempt clock budget per question.
pub const SECONDS_PER_QUESTION: u32 = 60;

/// How long the caller should sit on the violation screen before
/// navigating back to the lecture.
pub const MALPRACTICE_REDIRECT_DELAY: Duration = Duration::from_millis(3500);

/// Cosmetic "AI is generating" screen time shown before the start gate.
pub const GENERATING_SCREEN_DELAY: Duration = Duration::from_millis(3500);

/// Outer-minus-inner window gap (px) beyond which an attached devtools
/// panel is assumed.
pub const DEVTOOLS_GAP: u32 = 160;

pub fn viewport_suggests_devtools(outer: (u32, u32), inner: (u32, u32)) -> bool {
    outer.0.saturating_sub(inner.0) > DEVTOOLS_GAP || outer.1.saturating_sub(inner.1) > DEVTOOLS_GAP
}

/// The embedder's proctored surface. Entering fullscreen is a
/// precondition for starting; leaving it mid-attempt is a violation.
pub trait ProctorScreen {
    /// Request fullscreen; `false` when the surface refuses.
    fn enter_fullscreen(&mut self) -> bool;
    fn exit_fullscreen(&mut self);
    fn is_fullscreen(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Submitting,
    Submitted,
    /// Terminal; reachable from InProgress only. No retry or appeal.
    Malpractice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    FullscreenExit,
    ViewportAnomaly,
}

/// One proctored run through a quiz's question bank at a chosen
/// difficulty. Pure state machine: the embedder feeds it user events
/// and one `tick` per elapsed second, and renders from the getters.
pub struct QuizAttempt {
    title: String,
    level: Level,
    questions: Vec<Question>,
    phase: Phase,
    current: usize,
    visited: HashSet<usize>,
    answers: HashMap<usize, String>,
    time_left: u32,
}

impl QuizAttempt {
    pub fn new(quiz: &Quiz, level: Level) -> Result<Self, AcadifyError> {
        Self::with_rng(quiz, level, &mut rand::rng())
    }

    /// Bank selection happens here: filter the flat question list to
    /// the chosen level, shuffle the filtered bank, then shuffle each
    /// question's options independently. Correctness is compared by
    /// option text, never position.
    pub fn with_rng<R: Rng + ?Sized>(
        quiz: &Quiz,
        level: Level,
        rng: &mut R,
    ) -> Result<Self, AcadifyError> {
        let mut questions: Vec<Question> = quiz.questions_at(level).cloned().collect();
        if questions.is_empty() {
            return Err(AcadifyError::new(&format!(
                "No {} questions available for this quiz.",
                level
            )));
        }

        questions.shuffle(rng);
        for question in &mut questions {
            question.options.shuffle(rng);
        }

        let time_left = SECONDS_PER_QUESTION * questions.len() as u32;
        Ok(QuizAttempt {
            title: quiz.title.clone(),
            level,
            questions,
            phase: Phase::NotStarted,
            current: 0,
            visited: HashSet::new(),
            answers: HashMap::new(),
            time_left,
        })
    }

    /* ---------------- lifecycle ---------------- */

    /// Fullscreen is a precondition: on refusal the attempt stays in
    /// `NotStarted` and the caller warns the user.
    pub fn start(&mut self, screen: &mut dyn ProctorScreen) -> Result<(), AcadifyError> {
        if self.phase != Phase::NotStarted {
            return Err(AcadifyError::new("quiz already started"));
        }
        if !screen.enter_fullscreen() {
            return Err(AcadifyError::new(
                "Fullscreen permission is required to take the quiz.",
            ));
        }
        self.phase = Phase::InProgress;
        self.visited.insert(self.current);
        Ok(())
    }

    /// One elapsed second. Hitting zero forces submission, bypassing
    /// the visited gate; later ticks are no-ops, so the forced submit
    /// fires exactly once.
    pub fn tick(&mut self, screen: &mut dyn ProctorScreen) -> Option<AttemptOutcome> {
        if self.phase != Phase::InProgress {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            log::info!("time over, forcing submission");
            return Some(self.finalize(screen));
        }
        None
    }

    /// Manual submission; gated on the learner having viewed every
    /// question at least once, independent of how many were answered.
    pub fn submit(&mut self, screen: &mut dyn ProctorScreen) -> Result<AttemptOutcome, AcadifyError> {
        if self.phase != Phase::InProgress {
            return Err(AcadifyError::new("quiz is not in progress"));
        }
        if !self.visited_all() {
            let remaining = self.questions.len() - self.visited.len();
            return Err(AcadifyError::new(&format!(
                "Visit all questions before submitting ({} left).",
                remaining
            )));
        }
        Ok(self.finalize(screen))
    }

    /// Proctor violation. Terminal when it lands mid-attempt; ignored
    /// before the start and once submission is underway.
    pub fn report_violation(
        &mut self,
        violation: Violation,
        screen: &mut dyn ProctorScreen,
    ) -> bool {
        if self.phase != Phase::InProgress {
            return false;
        }
        log::warn!("malpractice detected: {:?}", violation);
        self.phase = Phase::Malpractice;
        if screen.is_fullscreen() {
            screen.exit_fullscreen();
        }
        true
    }

    fn finalize(&mut self, screen: &mut dyn ProctorScreen) -> AttemptOutcome {
        self.phase = Phase::Submitting;
        if screen.is_fullscreen() {
            screen.exit_fullscreen();
        }
        let score = self
            .questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                self.answers
                    .get(index)
                    .map(|answer| question.is_correct(answer))
                    .unwrap_or(false)
            })
            .count();
        self.phase = Phase::Submitted;
        AttemptOutcome {
            score,
            total: self.questions.len(),
            questions: self.questions.clone(),
            answers: self.answers.clone(),
        }
    }

    /* ---------------- navigation & answers ---------------- */

    pub fn select_answer(&mut self, option: &str) {
        if self.phase != Phase::InProgress {
            return;
        }
        self.answers.insert(self.current, option.to_string());
    }

    pub fn next(&mut self) {
        if self.phase == Phase::InProgress && self.current + 1 < self.questions.len() {
            self.current += 1;
            self.visited.insert(self.current);
        }
    }

    pub fn previous(&mut self) {
        if self.phase == Phase::InProgress && self.current > 0 {
            self.current -= 1;
            self.visited.insert(self.current);
        }
    }

    pub fn jump_to(&mut self, index: usize) {
        if self.phase == Phase::InProgress && index < self.questions.len() {
            self.current = index;
            self.visited.insert(index);
        }
    }

    /* ---------------- getters ---------------- */

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.answers.get(&self.current).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn visited_all(&self) -> bool {
        self.visited.len() == self.questions.len()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// `M:SS`, the header clock format.
    pub fn clock(&self) -> String {
        format!("{}:{:02}", self.time_left / 60, self.time_left % 60)
    }
}

/* ---------------- result & review ---------------- */

/// Carried forward to the result and review screens; never persisted.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub score: usize,
    pub total: usize,
    pub questions: Vec<Question>,
    pub answers: HashMap<usize, String>,
}

impl AttemptOutcome {
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.score as f64 / self.total as f64) * 100.0).round() as u32
    }

    pub fn band(&self) -> PerformanceBand {
        PerformanceBand::from_percentage(self.percentage())
    }

    pub fn review(&self) -> Vec<ReviewEntry<'_>> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = self.answers.get(&index).map(String::as_str);
                ReviewEntry {
                    index,
                    question,
                    selected,
                    is_correct: selected.map(|s| question.is_correct(s)).unwrap_or(false),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ReviewEntry<'a> {
    pub index: usize,
    pub question: &'a Question,
    pub selected: Option<&'a str>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceBand {
    Perfect,
    Excellent,
    Average,
    KeepPushing,
}

impl PerformanceBand {
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage == 100 {
            PerformanceBand::Perfect
        } else if percentage >= 70 {
            PerformanceBand::Excellent
        } else if percentage >= 40 {
            PerformanceBand::Average
        } else {
            PerformanceBand::KeepPushing
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceBand::Perfect => "PERFECT",
            PerformanceBand::Excellent => "EXCELLENT",
            PerformanceBand::Average => "AVERAGE",
            PerformanceBand::KeepPushing => "KEEP PUSHING",
        }
    }

    fn lines(&self) -> &'static [&'static str] {
        match self {
            PerformanceBand::Perfect => &[
                "Outstanding! You mastered this topic like a champion.",
                "Flawless victory! You are a subject matter expert now.",
                "Pure brilliance! You didn't leave a single point behind.",
                "100% focus, 100% effort, 100% success. Phenomenal!",
            ],
            PerformanceBand::Excellent => &[
                "Strong work! You clearly know your stuff inside out.",
                "Incredible! You're just a step away from perfection.",
                "Solid understanding. You're building serious expertise.",
                "Impressive results! Your hard work is clearly paying off.",
            ],
            PerformanceBand::Average => &[
                "Good effort! A little more revision and you'll be elite.",
                "Steady progress. You're halfway to complete mastery.",
                "Not bad at all! You've got the basics down firmly.",
                "Keep learning! Every correct answer is a step forward.",
            ],
            PerformanceBand::KeepPushing => &[
                "Every expert was once a beginner. Don't stop now!",
                "Mistakes are the stairs to success. Keep climbing!",
                "The comeback is always stronger than the setback.",
                "Don't quit! Your breakthrough is right around the corner.",
            ],
        }
    }

    pub fn encouragement<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.lines().choose(rng).copied().unwrap_or("Well done!")
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    struct TestScreen {
        grant: bool,
        fullscreen: bool,
        exits: usize,
    }

    impl TestScreen {
        fn granting() -> Self {
            TestScreen {
                grant: true,
                fullscreen: false,
                exits: 0,
            }
        }

        fn refusing() -> Self {
            TestScreen {
                grant: false,
                fullscreen: false,
                exits: 0,
            }
        }
    }

    impl ProctorScreen for TestScreen {
        fn enter_fullscreen(&mut self) -> bool {
            if self.grant {
                self.fullscreen = true;
            }
            self.grant
        }

        fn exit_fullscreen(&mut self) {
            self.fullscreen = false;
            self.exits += 1;
        }

        fn is_fullscreen(&self) -> bool {
            self.fullscreen
        }
    }

    fn question(prompt: &str, correct: &str, wrong: &str, level: Level) -> Question {
        Question::new(prompt, vec![correct.to_string(), wrong.to_string()], correct, level)
    }

    fn mixed_quiz() -> Quiz {
        Quiz {
            title: "Borrow checker basics".into(),
            difficulty: Some(Level::Hard),
            questions: vec![
                question("e1", "a", "b", Level::Easy),
                question("e2", "c", "d", Level::Easy),
                question("e3", "e", "f", Level::Easy),
                question("h1", "g", "h", Level::Hard),
                question("h2", "i", "j", Level::Hard),
            ],
        }
    }

    fn started(level: Level) -> (QuizAttempt, TestScreen) {
        let quiz = mixed_quiz();
        let mut rng = StdRng::seed_from_u64(7);
        let mut attempt = QuizAttempt::with_rng(&quiz, level, &mut rng).unwrap();
        let mut screen = TestScreen::granting();
        attempt.start(&mut screen).unwrap();
        (attempt, screen)
    }

    #[test]
    fn bank_selection_filters_by_level() {
        let quiz = mixed_quiz();
        let mut rng = StdRng::seed_from_u64(1);
        let attempt = QuizAttempt::with_rng(&quiz, Level::Hard, &mut rng).unwrap();

        assert_eq!(attempt.len(), 2);
        assert!(attempt.questions().iter().all(|q| q.level == Level::Hard));
        assert_eq!(attempt.time_left(), 2 * SECONDS_PER_QUESTION);
    }

    #[test]
    fn shuffle_preserves_the_filtered_multiset() {
        let quiz = mixed_quiz();
        let mut rng = StdRng::seed_from_u64(42);
        let attempt = QuizAttempt::with_rng(&quiz, Level::Easy, &mut rng).unwrap();

        let mut shuffled: Vec<&str> = attempt
            .questions()
            .iter()
            .map(|q| q.question.as_str())
            .collect();
        shuffled.sort_unstable();
        assert_eq!(shuffled, vec!["e1", "e2", "e3"]);

        // option shuffling keeps each question's option multiset
        for q in attempt.questions() {
            let original = quiz
                .questions
                .iter()
                .find(|o| o.question == q.question)
                .unwrap();
            let mut a = q.options.clone();
            let mut b = original.options.clone();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
            assert!(q.options.contains(&q.correct_answer));
        }
    }

    #[test]
    fn empty_bank_blocks_the_attempt() {
        let quiz = mixed_quiz();
        let mut rng = StdRng::seed_from_u64(3);
        let result = QuizAttempt::with_rng(&quiz, Level::Medium, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn start_requires_fullscreen_grant() {
        let quiz = mixed_quiz();
        let mut rng = StdRng::seed_from_u64(5);
        let mut attempt = QuizAttempt::with_rng(&quiz, Level::Easy, &mut rng).unwrap();

        let mut refusing = TestScreen::refusing();
        assert!(attempt.start(&mut refusing).is_err());
        assert_eq!(attempt.phase(), Phase::NotStarted);

        let mut granting = TestScreen::granting();
        attempt.start(&mut granting).unwrap();
        assert_eq!(attempt.phase(), Phase::InProgress);
        assert!(granting.is_fullscreen());
    }

    #[test]
    fn submission_is_gated_on_visiting_not_answering() {
        let (mut attempt, mut screen) = started(Level::Easy);

        // only index 0 visited so far
        assert!(attempt.submit(&mut screen).is_err());

        attempt.next();
        assert!(attempt.submit(&mut screen).is_err());

        attempt.next();
        assert!(attempt.visited_all());
        assert_eq!(attempt.answered_count(), 0);

        // zero answers, all visited -> accepted
        let outcome = attempt.submit(&mut screen).unwrap();
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total, 3);
        assert_eq!(attempt.phase(), Phase::Submitted);
        assert!(!screen.is_fullscreen());
    }

    #[test]
    fn score_counts_text_matches_only() {
        let (mut attempt, mut screen) = started(Level::Easy);

        // answer every question with its own correct option
        for index in 0..attempt.len() {
            attempt.jump_to(index);
            let correct = attempt.current_question().correct_answer.clone();
            attempt.select_answer(&correct);
        }
        let outcome = attempt.submit(&mut screen).unwrap();
        assert_eq!(outcome.score, outcome.total);
        assert_eq!(outcome.percentage(), 100);
        assert_eq!(outcome.band(), PerformanceBand::Perfect);
    }

    #[test]
    fn navigation_moves_the_cursor_without_touching_answers() {
        let (mut attempt, _screen) = started(Level::Easy);

        let first = attempt.current_question().correct_answer.clone();
        attempt.select_answer(&first);
        attempt.next();
        attempt.select_answer("wrong");
        attempt.previous();

        assert_eq!(attempt.current_index(), 0);
        assert_eq!(attempt.selected_answer(), Some(first.as_str()));
        // re-selection overwrites
        attempt.select_answer("changed my mind");
        assert_eq!(attempt.selected_answer(), Some("changed my mind"));
    }

    #[test]
    fn timeout_forces_submission_exactly_once() {
        let (mut attempt, mut screen) = started(Level::Easy);
        assert!(!attempt.visited_all());

        let mut outcomes = 0;
        for _ in 0..attempt.time_left() + 10 {
            if attempt.tick(&mut screen).is_some() {
                outcomes += 1;
            }
        }
        // the visited gate does not apply to a timeout
        assert_eq!(outcomes, 1);
        assert_eq!(attempt.phase(), Phase::Submitted);
    }

    #[test]
    fn violation_is_terminal_and_only_fires_in_progress() {
        let (mut attempt, mut screen) = started(Level::Easy);

        assert!(attempt.report_violation(Violation::FullscreenExit, &mut screen));
        assert_eq!(attempt.phase(), Phase::Malpractice);
        assert!(!screen.is_fullscreen());

        // timer is dead, submission impossible, no double report
        assert!(attempt.tick(&mut screen).is_none());
        assert!(attempt.submit(&mut screen).is_err());
        assert!(!attempt.report_violation(Violation::ViewportAnomaly, &mut screen));
    }

    #[test]
    fn violation_after_submission_is_ignored() {
        let (mut attempt, mut screen) = started(Level::Hard);
        attempt.next();
        attempt.submit(&mut screen).unwrap();
        assert!(!attempt.report_violation(Violation::FullscreenExit, &mut screen));
        assert_eq!(attempt.phase(), Phase::Submitted);
    }

    #[test]
    fn review_marks_skipped_and_wrong_picks() {
        let (mut attempt, mut screen) = started(Level::Hard);

        let wrong = attempt
            .current_question()
            .options
            .iter()
            .find(|o| **o != attempt.current_question().correct_answer)
            .cloned()
            .unwrap();
        attempt.select_answer(&wrong);
        attempt.next();
        // second question left unanswered
        let outcome = attempt.submit(&mut screen).unwrap();

        let review = outcome.review();
        assert_eq!(review.len(), 2);
        assert!(!review[0].is_correct);
        assert_eq!(review[0].selected, Some(wrong.as_str()));
        assert!(review[1].selected.is_none());
        assert!(!review[1].is_correct);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn performance_bands_follow_the_percentage_cuts() {
        assert_eq!(PerformanceBand::from_percentage(100), PerformanceBand::Perfect);
        assert_eq!(PerformanceBand::from_percentage(99), PerformanceBand::Excellent);
        assert_eq!(PerformanceBand::from_percentage(70), PerformanceBand::Excellent);
        assert_eq!(PerformanceBand::from_percentage(69), PerformanceBand::Average);
        assert_eq!(PerformanceBand::from_percentage(40), PerformanceBand::Average);
        assert_eq!(PerformanceBand::from_percentage(39), PerformanceBand::KeepPushing);
        assert_eq!(PerformanceBand::from_percentage(0), PerformanceBand::KeepPushing);
    }

    #[test]
    fn devtools_heuristic_uses_the_gap_threshold() {
        assert!(viewport_suggests_devtools((1920, 1080), (1920, 800)));
        assert!(viewport_suggests_devtools((1920, 1080), (1700, 1080)));
        assert!(!viewport_suggests_devtools((1920, 1080), (1910, 1020)));
    }
}
