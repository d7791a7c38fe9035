use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
    /// Per-wrong-option explanations, indexed like `options`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrong_explanations: Option<Vec<String>>,
}

/// A named block/section of questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub title: String,
    pub color: BlockColor,
    pub questions: Vec<Question>,
}

/// Available block colors for presentation theming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockColor {
    Indigo,
    Purple,
    Pink,
    Emerald,
}

impl std::fmt::Display for BlockColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BlockColor::Indigo => "indigo",
            BlockColor::Purple => "purple",
            BlockColor::Pink => "pink",
            BlockColor::Emerald => "emerald",
        };
        write!(f, "{}", s)
    }
}

/// How a session's question list is derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum QuizMode {
    SingleBlock { block_id: String },
    AllBlocks,
    ReviewWrong { question_ids: Vec<String> },
}

/// A recorded answer to one question; append-only, never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub selected_index: usize,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

/// Feedback returned immediately after recording an answer
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_index: usize,
    pub selected_index: usize,
    pub correct_text: String,
    /// None when the selected index is out of range for the options
    pub selected_text: Option<String>,
    pub correct_explanation: String,
    pub selected_wrong_explanation: Option<String>,
}

/// Current state of a quiz session
///
/// `questions` is a value snapshot taken at session start, so later
/// edits to the shared dataset never alter an in-flight session.
/// Transitions replace the whole state; nothing mutates in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
    pub mode: QuizMode,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub answers: Vec<Answer>,
    pub is_finished: bool,
    pub started_at: DateTime<Utc>,
}

/// Aggregated results computed from a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResults {
    pub total_questions: usize,
    pub correct_count: usize,
    pub wrong_count: usize,
    pub percentage: u32,
    pub answers: Vec<Answer>,
    pub wrong_questions: Vec<Question>,
    pub duration_ms: i64,
}

/// Durable per-question counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionHistory {
    pub times_answered: u32,
    pub times_correct: u32,
    pub last_answered: DateTime<Utc>,
}

/// Single-slot session snapshot for resuming later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    pub mode: QuizMode,
    pub current_index: usize,
    pub answers: Vec<Answer>,
    pub saved_at: DateTime<Utc>,
}

/// The persisted progress blob, versioned for forward migration
///
/// BTreeMaps keep the serialized form deterministic, so saving an
/// unchanged blob reproduces it byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredProgress {
    pub version: u32,
    pub best_scores: BTreeMap<String, u32>,
    pub question_history: BTreeMap<String, QuestionHistory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_session: Option<SavedSession>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_mode_serializes_with_type_tag() {
        let mode = QuizMode::SingleBlock {
            block_id: "casos-uso".to_string(),
        };
        let json = serde_json::to_string(&mode).unwrap();
        assert_eq!(json, r#"{"type":"single-block","blockId":"casos-uso"}"#);

        let back: QuizMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mode);
    }

    #[test]
    fn test_block_color_round_trip() {
        let json = serde_json::to_string(&BlockColor::Emerald).unwrap();
        assert_eq!(json, r#""emerald""#);
        let back: BlockColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BlockColor::Emerald);
    }

    #[test]
    fn test_stored_progress_defaults() {
        let progress: StoredProgress = serde_json::from_str("{}").unwrap();
        assert_eq!(progress.version, 0);
        assert!(progress.best_scores.is_empty());
        assert!(progress.question_history.is_empty());
        assert!(progress.last_session.is_none());
    }
}
