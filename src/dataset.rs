use once_cell::sync::Lazy;

use crate::model::{Block, Question};

/// The built-in question data, embedded at compile time
const BUILTIN_DATA: &str = include_str!("../data/questions.json");

static BUILTIN: Lazy<QuestionBank> = Lazy::new(|| {
    let blocks: Vec<Block> =
        serde_json::from_str(BUILTIN_DATA).expect("embedded question data is malformed");
    QuestionBank::new(blocks)
});

/// An ordered, read-only collection of question blocks
#[derive(Debug, Clone)]
pub struct QuestionBank {
    blocks: Vec<Block>,
}

impl QuestionBank {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// The bank shipped with the binary, parsed once
    pub fn builtin() -> &'static QuestionBank {
        &BUILTIN
    }

    /// All blocks, in authored order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Look up a block by its id
    pub fn block_by_id(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Every question across all blocks, block order then in-block order
    pub fn all_questions(&self) -> Vec<Question> {
        self.blocks
            .iter()
            .flat_map(|b| b.questions.iter().cloned())
            .collect()
    }

    /// The block that owns the given question, if any
    pub fn block_of_question(&self, question_id: &str) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| b.questions.iter().any(|q| q.id == question_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_bank_loads() {
        let bank = QuestionBank::builtin();
        assert_eq!(bank.blocks().len(), 4);
        assert_eq!(bank.all_questions().len(), 40);
    }

    #[test]
    fn test_block_lookup() {
        let bank = QuestionBank::builtin();
        let block = bank.block_by_id("casos-uso").unwrap();
        assert_eq!(block.questions.len(), 10);
        assert!(bank.block_by_id("no-such-block").is_none());
    }

    #[test]
    fn test_correct_indices_are_in_range() {
        for question in QuestionBank::builtin().all_questions() {
            assert!(
                question.correct_index < question.options.len(),
                "question {} has correct_index out of range",
                question.id
            );
        }
    }

    #[test]
    fn test_question_ids_are_unique() {
        let questions = QuestionBank::builtin().all_questions();
        let mut ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), questions.len());
    }

    #[test]
    fn test_block_of_question() {
        let bank = QuestionBank::builtin();
        assert_eq!(bank.block_of_question("cu-3").unwrap().id, "casos-uso");
        assert_eq!(bank.block_of_question("sd-10").unwrap().id, "sistemas-distribuidos");
        assert!(bank.block_of_question("nope").is_none());
    }
}
