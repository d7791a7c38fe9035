use clap::Parser;

#[derive(Parser)]
#[command(name = "quiz-trainer", about = "Interactive multiple-choice quiz trainer")]
pub struct Args {
    /// Quiz a single block by id
    #[arg(long, value_name = "BLOCK_ID", conflicts_with_all = ["all", "review_weak", "review_never_correct", "resume"])]
    pub block: Option<String>,

    /// Resume the last saved session
    #[arg(long, conflicts_with_all = ["all", "review_weak", "review_never_correct", "shuffle", "shuffle_options"])]
    pub resume: bool,

    /// Quiz every block in order
    #[arg(long)]
    pub all: bool,

    /// Review questions you have ever answered wrong
    #[arg(long)]
    pub review_weak: bool,

    /// Review questions you have never answered correctly
    #[arg(long)]
    pub review_never_correct: bool,

    /// Shuffle question order
    #[arg(long)]
    pub shuffle: bool,

    /// Shuffle the options within each question
    #[arg(long)]
    pub shuffle_options: bool,

    /// Seed for reproducible shuffles
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u32>,

    /// List the available blocks and exit
    #[arg(long)]
    pub list_blocks: bool,

    /// Show best scores and question history stats, then exit
    #[arg(long)]
    pub stats: bool,

    /// Delete all persisted progress and exit
    #[arg(long)]
    pub reset: bool,
}
