//! Pure state-transition functions for a quiz session.
//!
//! No I/O, no storage, no presentation. Every transition returns a new
//! `QuizState` value; the input state is never mutated.

use chrono::Utc;

use crate::dataset::QuestionBank;
use crate::model::{
    Answer, AnswerFeedback, Block, Question, QuizMode, QuizResults, QuizState, SavedSession,
};

/// Engine misuse errors; callers treat these as bugs, not user errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    BlockNotFound(String),
    NoCurrentQuestion,
    AlreadyAnswered,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::BlockNotFound(id) => write!(f, "block not found: {}", id),
            EngineError::NoCurrentQuestion => write!(f, "no current question to answer"),
            EngineError::AlreadyAnswered => write!(f, "question already answered"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Creates a new session from a mode.
///
/// The question list is snapshotted out of the bank, so the session is
/// independent of later dataset changes.
pub fn create_session(bank: &QuestionBank, mode: QuizMode) -> Result<QuizState, EngineError> {
    let questions: Vec<Question> = match &mode {
        QuizMode::SingleBlock { block_id } => {
            let block = bank
                .block_by_id(block_id)
                .ok_or_else(|| EngineError::BlockNotFound(block_id.clone()))?;
            block.questions.clone()
        }
        QuizMode::AllBlocks => bank.all_questions(),
        // Unknown ids are silently dropped; order follows the dataset,
        // not the order of the requested ids.
        QuizMode::ReviewWrong { question_ids } => bank
            .all_questions()
            .into_iter()
            .filter(|q| question_ids.iter().any(|id| *id == q.id))
            .collect(),
    };

    Ok(QuizState {
        mode,
        questions,
        current_index: 0,
        answers: Vec::new(),
        is_finished: false,
        started_at: Utc::now(),
    })
}

/// Creates a session for a single block
pub fn start_block_session(bank: &QuestionBank, block_id: &str) -> Result<QuizState, EngineError> {
    create_session(
        bank,
        QuizMode::SingleBlock {
            block_id: block_id.to_string(),
        },
    )
}

/// Creates a session over every block
pub fn start_all_blocks_session(bank: &QuestionBank) -> Result<QuizState, EngineError> {
    create_session(bank, QuizMode::AllBlocks)
}

/// Rebuilds a session from a saved resume snapshot.
///
/// The question list is re-derived from the saved mode; the cursor and
/// the recorded answers are restored as saved. A cursor past the end of
/// the re-derived list is clamped to the last question.
pub fn resume_session(bank: &QuestionBank, saved: SavedSession) -> Result<QuizState, EngineError> {
    let mut state = create_session(bank, saved.mode)?;
    if !state.questions.is_empty() {
        state.current_index = saved.current_index.min(state.questions.len() - 1);
    }
    state.answers = saved.answers;
    Ok(state)
}

/// Creates a session to review a set of previously missed questions
pub fn start_review_session(
    bank: &QuestionBank,
    question_ids: Vec<String>,
) -> Result<QuizState, EngineError> {
    create_session(bank, QuizMode::ReviewWrong { question_ids })
}

/// The question under the cursor, or None when finished/exhausted
pub fn current_question(state: &QuizState) -> Option<&Question> {
    if state.is_finished || state.current_index >= state.questions.len() {
        return None;
    }
    state.questions.get(state.current_index)
}

/// Whether the current question already has a recorded answer
pub fn is_current_answered(state: &QuizState) -> bool {
    match current_question(state) {
        Some(question) => state.answers.iter().any(|a| a.question_id == question.id),
        None => false,
    }
}

/// The recorded answer for the current question, if any
pub fn current_answer<'a>(state: &'a QuizState) -> Option<&'a Answer> {
    let question = current_question(state)?;
    state.answers.iter().find(|a| a.question_id == question.id)
}

/// Records an answer for the current question.
///
/// Answers are write-once per question; re-answering is rejected. An
/// out-of-range `selected_index` is not an error, just incorrect. The
/// cursor is not advanced here; that is a separate transition.
pub fn answer_question(
    state: &QuizState,
    selected_index: usize,
) -> Result<(QuizState, AnswerFeedback), EngineError> {
    let question = current_question(state).ok_or(EngineError::NoCurrentQuestion)?;

    if is_current_answered(state) {
        return Err(EngineError::AlreadyAnswered);
    }

    let is_correct = selected_index == question.correct_index;

    let feedback = AnswerFeedback {
        is_correct,
        correct_index: question.correct_index,
        selected_index,
        correct_text: question.options[question.correct_index].clone(),
        selected_text: question.options.get(selected_index).cloned(),
        correct_explanation: question.explanation.clone(),
        selected_wrong_explanation: question
            .wrong_explanations
            .as_ref()
            .and_then(|ex| ex.get(selected_index).cloned()),
    };

    let answer = Answer {
        question_id: question.id.clone(),
        selected_index,
        is_correct,
        timestamp: Utc::now(),
    };

    let mut next = state.clone();
    next.answers.push(answer);

    Ok((next, feedback))
}

/// Advances the cursor, or finishes the session at the last question.
///
/// The cursor never overruns the question list. Advancing does not
/// require the current question to be answered; gating that is the
/// controller's job via `is_current_answered`.
pub fn next_question(state: &QuizState) -> QuizState {
    let mut next = state.clone();
    if state.current_index + 1 >= state.questions.len() {
        next.is_finished = true;
    } else {
        next.current_index += 1;
    }
    next
}

/// Whether any question remains after the current one
pub fn has_next_question(state: &QuizState) -> bool {
    state.current_index + 1 < state.questions.len()
}

/// Aggregates final results from a session state.
///
/// An empty session reports a percentage of 0 rather than dividing by
/// zero.
pub fn results(state: &QuizState) -> QuizResults {
    let total_questions = state.questions.len();
    let correct_count = state.answers.iter().filter(|a| a.is_correct).count();
    let wrong_count = total_questions - correct_count;

    let percentage = if total_questions == 0 {
        0
    } else {
        (correct_count as f64 / total_questions as f64 * 100.0).round() as u32
    };

    let wrong_questions: Vec<Question> = state
        .questions
        .iter()
        .filter(|q| {
            state
                .answers
                .iter()
                .any(|a| !a.is_correct && a.question_id == q.id)
        })
        .cloned()
        .collect();

    QuizResults {
        total_questions,
        correct_count,
        wrong_count,
        percentage,
        answers: state.answers.clone(),
        wrong_questions,
        duration_ms: (Utc::now() - state.started_at).num_milliseconds(),
    }
}

/// Ids of the questions answered incorrectly, in answering order
pub fn wrong_question_ids(state: &QuizState) -> Vec<String> {
    state
        .answers
        .iter()
        .filter(|a| !a.is_correct)
        .map(|a| a.question_id.clone())
        .collect()
}

/// The block the current question belongs to.
///
/// In single-block mode this is the selected block; otherwise the block
/// is resolved by scanning membership of the current question.
pub fn current_block_info<'a>(state: &QuizState, bank: &'a QuestionBank) -> Option<&'a Block> {
    if let QuizMode::SingleBlock { block_id } = &state.mode {
        return bank.block_by_id(block_id);
    }
    let question = current_question(state)?;
    bank.block_of_question(&question.id)
}

/// Progress through the session as a percentage; 0 for an empty list
pub fn progress_percent(state: &QuizState) -> f64 {
    if state.questions.is_empty() {
        return 0.0;
    }
    (state.current_index + 1) as f64 / state.questions.len() as f64 * 100.0
}
