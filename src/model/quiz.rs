use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Difficulty classifier carried by every question. A quiz keeps one
/// flat question list; the level tags are the only partition, so pools
/// of several difficulties coexist inside the same quiz.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[serde(alias = "Easy")]
    Easy,
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Hard")]
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Level::Easy),
            "medium" => Ok(Level::Medium),
            "hard" => Ok(Level::Hard),
            _ => Err(()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,

    pub options: Vec<String>,

    pub correct_answer: String,

    #[serde(default)]
    pub level: Level,
}

impl Question {
    pub fn new(question: &str, options: Vec<String>, correct_answer: &str, level: Level) -> Self {
        Question {
            question: question.to_string(),
            options,
            correct_answer: correct_answer.to_string(),
            level,
        }
    }

    /// A stored correct answer must equal one of the option strings.
    /// Violations are repaired by falling back to the first option
    /// instead of rejecting the whole quiz. Returns whether a repair
    /// happened.
    pub fn sanitize(&mut self) -> bool {
        if self.options.contains(&self.correct_answer) {
            return false;
        }
        self.correct_answer = self.options.first().cloned().unwrap_or_default();
        true
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(default)]
    pub title: String,

    /// Level of the last generated or edited batch; display metadata,
    /// not a constraint on the question list.
    #[serde(default)]
    pub difficulty: Option<Level>,

    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Repairs every question whose correct answer drifted away from
    /// its options. Returns how many were repaired.
    pub fn sanitize(&mut self) -> usize {
        self.questions.iter_mut().map(|q| q.sanitize()).filter(|&r| r).count()
    }

    pub fn questions_at(&self, level: Level) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.level == level)
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.questions_at(level).count()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(level: Level) -> Question {
        Question::new(
            "What does a tag invalidate?",
            vec!["queries".into(), "mutations".into()],
            "queries",
            level,
        )
    }

    #[test]
    fn sanitize_repairs_orphaned_correct_answer() {
        let mut q = question(Level::Easy);
        q.correct_answer = "something deleted".into();
        assert!(q.sanitize());
        assert_eq!(q.correct_answer, "queries");
        // already consistent -> untouched
        assert!(!q.sanitize());
    }

    #[test]
    fn quiz_sanitize_counts_repairs() {
        let mut quiz = Quiz {
            title: "Lecture quiz".into(),
            difficulty: Some(Level::Medium),
            questions: vec![question(Level::Easy), question(Level::Hard)],
        };
        quiz.questions[1].correct_answer = "gone".into();
        assert_eq!(quiz.sanitize(), 1);
    }

    #[test]
    fn level_round_trips_through_wire_form() {
        for level in Level::ALL {
            assert_eq!(Level::from_str(level.as_str()), Ok(level));
        }
        // the backend sometimes stores capitalized labels
        assert_eq!(Level::from_str("Hard"), Ok(Level::Hard));
        let parsed: Level = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(parsed, Level::Medium);
    }

    #[test]
    fn questions_at_filters_by_level_only() {
        let quiz = Quiz {
            title: String::new(),
            difficulty: None,
            questions: vec![
                question(Level::Easy),
                question(Level::Hard),
                question(Level::Easy),
            ],
        };
        assert_eq!(quiz.count_at(Level::Easy), 2);
        assert_eq!(quiz.count_at(Level::Hard), 1);
        assert_eq!(quiz.count_at(Level::Medium), 0);
    }
}
