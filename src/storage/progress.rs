//! Versioned progress persistence over a [`ProgressStore`] port.
//!
//! Every mutator is a full read-modify-write of the blob. Store
//! failures never surface to callers: reads fall back to defaults and
//! writes become no-ops, so the quiz stays usable without durability.

use chrono::Utc;
use tracing::{debug, warn};

use crate::model::{Answer, QuestionHistory, QuizMode, SavedSession, StoredProgress};

use super::store::ProgressStore;

/// Schema version stamped into every saved blob
pub const CURRENT_VERSION: u32 = 1;

/// High-level progress operations bound to one store
pub struct ProgressLog<S: ProgressStore> {
    store: S,
}

impl<S: ProgressStore> ProgressLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn defaults() -> StoredProgress {
        StoredProgress {
            version: CURRENT_VERSION,
            ..StoredProgress::default()
        }
    }

    /// Loads the stored progress, falling back to defaults when the
    /// blob is absent or unparsable, and migrating older versions
    pub fn load(&self) -> StoredProgress {
        let blob = match self.store.read() {
            Ok(Some(blob)) => blob,
            Ok(None) => return Self::defaults(),
            Err(e) => {
                warn!("failed to read progress, continuing without history: {e:#}");
                return Self::defaults();
            }
        };

        match serde_json::from_str::<StoredProgress>(&blob) {
            Ok(mut progress) => {
                if progress.version != CURRENT_VERSION {
                    debug!(
                        from = progress.version,
                        to = CURRENT_VERSION,
                        "migrating stored progress"
                    );
                    progress = migrate(progress);
                }
                progress
            }
            Err(e) => {
                warn!("stored progress is corrupt, starting fresh: {e}");
                Self::defaults()
            }
        }
    }

    /// Serializes and writes the whole blob; failures are logged, not
    /// raised
    pub fn save(&self, progress: &StoredProgress) {
        let blob = match serde_json::to_string(progress) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("failed to serialize progress: {e}");
                return;
            }
        };
        if let Err(e) = self.store.write(&blob) {
            warn!("failed to save progress: {e:#}");
        }
    }

    /// Records a block score if it beats the stored best
    pub fn update_best_score(&self, block_id: &str, percentage: u32) {
        let mut progress = self.load();
        let current = progress.best_scores.get(block_id).copied().unwrap_or(0);

        if percentage > current {
            progress
                .best_scores
                .insert(block_id.to_string(), percentage);
            self.save(&progress);
        }
    }

    pub fn best_score(&self, block_id: &str) -> Option<u32> {
        self.load().best_scores.get(block_id).copied()
    }

    pub fn all_best_scores(&self) -> std::collections::BTreeMap<String, u32> {
        self.load().best_scores
    }

    /// Bumps the per-question counters after one answer
    pub fn update_question_history(&self, question_id: &str, is_correct: bool) {
        let mut progress = self.load();
        bump_history(&mut progress, question_id, is_correct, Utc::now());
        self.save(&progress);
    }

    /// Bumps counters for a whole answer list in one write
    pub fn update_multiple_question_history(&self, answers: &[Answer]) {
        let mut progress = self.load();
        for answer in answers {
            bump_history(
                &mut progress,
                &answer.question_id,
                answer.is_correct,
                answer.timestamp,
            );
        }
        self.save(&progress);
    }

    pub fn question_history(&self, question_id: &str) -> Option<QuestionHistory> {
        self.load().question_history.get(question_id).cloned()
    }

    /// Questions that have ever been answered wrong
    pub fn weak_question_ids(&self) -> Vec<String> {
        self.load()
            .question_history
            .iter()
            .filter(|(_, h)| h.times_correct < h.times_answered)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Questions never answered correctly
    pub fn never_correct_question_ids(&self) -> Vec<String> {
        self.load()
            .question_history
            .iter()
            .filter(|(_, h)| h.times_correct == 0)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Overwrites the single resume slot
    pub fn save_session(&self, mode: QuizMode, current_index: usize, answers: Vec<Answer>) {
        let mut progress = self.load();
        progress.last_session = Some(SavedSession {
            mode,
            current_index,
            answers,
            saved_at: Utc::now(),
        });
        self.save(&progress);
    }

    pub fn last_session(&self) -> Option<SavedSession> {
        self.load().last_session
    }

    pub fn clear_session(&self) {
        let mut progress = self.load();
        if progress.last_session.take().is_some() {
            self.save(&progress);
        }
    }

    /// Deletes the entire blob
    pub fn reset_all(&self) {
        if let Err(e) = self.store.delete() {
            warn!("failed to reset progress: {e:#}");
        }
    }

    /// Whether any scores or history were ever recorded
    pub fn has_progress(&self) -> bool {
        let progress = self.load();
        !progress.best_scores.is_empty() || !progress.question_history.is_empty()
    }
}

/// Overlay stored fields onto defaults and stamp the current version;
/// additive, never destructive
fn migrate(old: StoredProgress) -> StoredProgress {
    StoredProgress {
        version: CURRENT_VERSION,
        ..old
    }
}

fn bump_history(
    progress: &mut StoredProgress,
    question_id: &str,
    is_correct: bool,
    answered_at: chrono::DateTime<Utc>,
) {
    let entry = progress
        .question_history
        .entry(question_id.to_string())
        .or_insert(QuestionHistory {
            times_answered: 0,
            times_correct: 0,
            last_answered: answered_at,
        });
    entry.times_answered += 1;
    if is_correct {
        entry.times_correct += 1;
    }
    entry.last_answered = answered_at;
}
