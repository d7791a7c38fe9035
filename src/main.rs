use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

use quiz_trainer::{
    args::Args,
    dataset::QuestionBank,
    engine::{
        self, answer_question, current_question, is_current_answered, next_question,
        wrong_question_ids,
    },
    model::{QuizMode, QuizState},
    scoring::{format_duration, grade_for, is_personal_best},
    shuffle::{self, source_for_seed},
    storage::{FileStore, ProgressLog},
};

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging();

    let bank = QuestionBank::builtin();
    let progress = ProgressLog::new(open_store());

    if args.list_blocks {
        print_blocks(bank, &progress);
        return Ok(());
    }

    if args.stats {
        print_stats(bank, &progress);
        return Ok(());
    }

    if args.reset {
        progress.reset_all();
        println!("All progress deleted.");
        return Ok(());
    }

    if args.resume {
        return match progress.last_session() {
            Some(saved) => {
                let state = engine::resume_session(bank, saved)?;
                quiz_loop(state, bank, &progress)
            }
            None => {
                println!("No saved session to resume.");
                Ok(())
            }
        };
    }

    let mode = select_mode(&args, &progress);
    if let QuizMode::ReviewWrong { question_ids } = &mode {
        if question_ids.is_empty() {
            println!("Nothing to review yet. Play a quiz first.");
            return Ok(());
        }
    }

    let mut state = engine::create_session(bank, mode)?;

    let mut rng = source_for_seed(args.seed);
    if args.shuffle_options {
        state.questions = shuffle::shuffle_options(&state.questions, rng.as_mut());
    }
    if args.shuffle {
        state = shuffle::shuffle_questions(&state, rng.as_mut());
    }

    quiz_loop(state, bank, &progress)
}

/// Logs go to a rolling file under the data directory so they never
/// interleave with the quiz prompt
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::EnvFilter;

    let dir = dirs::data_dir()?.join("quiz-trainer").join("logs");
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::daily(dir, "quiz-trainer.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Persistence is best-effort: fall back to a local file when the
/// platform data directory is unavailable
fn open_store() -> FileStore {
    match FileStore::at_default_path() {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("falling back to ./progress.json: {e:#}");
            FileStore::new(PathBuf::from("progress.json"))
        }
    }
}

fn select_mode(args: &Args, progress: &ProgressLog<FileStore>) -> QuizMode {
    if let Some(block_id) = &args.block {
        QuizMode::SingleBlock {
            block_id: block_id.clone(),
        }
    } else if args.review_weak {
        QuizMode::ReviewWrong {
            question_ids: progress.weak_question_ids(),
        }
    } else if args.review_never_correct {
        QuizMode::ReviewWrong {
            question_ids: progress.never_correct_question_ids(),
        }
    } else {
        QuizMode::AllBlocks
    }
}

fn print_blocks(bank: &QuestionBank, progress: &ProgressLog<FileStore>) {
    let best = progress.all_best_scores();
    println!("Available blocks:");
    for block in bank.blocks() {
        let best_str = best
            .get(&block.id)
            .map(|b| format!("best {}%", b))
            .unwrap_or_else(|| "not attempted".to_string());
        println!(
            "  {:<24} {} ({} questions, {})",
            block.id,
            block.title,
            block.questions.len(),
            best_str
        );
    }
}

fn print_stats(bank: &QuestionBank, progress: &ProgressLog<FileStore>) {
    if !progress.has_progress() {
        println!("No progress recorded yet.");
        return;
    }

    print_blocks(bank, progress);

    let weak = progress.weak_question_ids();
    let never = progress.never_correct_question_ids();
    println!("\nQuestions ever missed: {}", weak.len());
    println!("Questions never answered correctly: {}", never.len());
}

fn quiz_loop(
    mut state: QuizState,
    bank: &QuestionBank,
    progress: &ProgressLog<FileStore>,
) -> Result<()> {
    let stdin = io::stdin();
    let total = state.questions.len();

    while let Some(question) = current_question(&state).cloned() {
        let block_title = engine::current_block_info(&state, bank)
            .map(|b| b.title.as_str())
            .unwrap_or("");

        println!(
            "\n[{}/{}] {} - {:.0}%",
            state.current_index + 1,
            total,
            block_title,
            engine::progress_percent(&state)
        );
        println!("{}", question.question);
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }

        // Keep prompting until an answer is recorded
        while !is_current_answered(&state) {
            print!("answer [1-{}]> ", question.options.len());
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.read_line(&mut line)? == 0 {
                // EOF: keep the session resumable and stop
                progress.save_session(
                    state.mode.clone(),
                    state.current_index,
                    state.answers.clone(),
                );
                println!("\nSession saved.");
                return Ok(());
            }

            let selected = match line.trim().parse::<usize>() {
                Ok(n) if n >= 1 && n <= question.options.len() => n - 1,
                _ => {
                    eprintln!("expected a number between 1 and {}", question.options.len());
                    continue;
                }
            };

            let (next, feedback) = answer_question(&state, selected)?;
            state = next;

            if feedback.is_correct {
                println!("✓ Correct.");
            } else {
                println!("✗ Wrong. Correct answer: {}", feedback.correct_text);
                if let Some(why) = &feedback.selected_wrong_explanation {
                    println!("  {}", why);
                }
            }
            println!("  {}", feedback.correct_explanation);

            if let Some(answer) = state.answers.last() {
                progress.update_question_history(&answer.question_id, answer.is_correct);
            }
        }

        progress.save_session(
            state.mode.clone(),
            state.current_index,
            state.answers.clone(),
        );
        state = next_question(&state);
    }

    finish(&state, progress);
    Ok(())
}

fn finish(state: &QuizState, progress: &ProgressLog<FileStore>) {
    let results = engine::results(state);
    let grade = grade_for(results.percentage);

    println!("\n=== Results ===");
    println!(
        "{} {} - {}/{} correct ({}%)",
        grade.emoji, grade.label, results.correct_count, results.total_questions, results.percentage
    );
    println!("{}", grade.message);
    println!("Time: {}", format_duration(results.duration_ms));

    if let QuizMode::SingleBlock { block_id } = &state.mode {
        let previous = progress.best_score(block_id);
        if is_personal_best(results.percentage, previous) {
            println!("New personal best for this block!");
        }
        progress.update_best_score(block_id, results.percentage);
    }

    let wrong = wrong_question_ids(state);
    if !wrong.is_empty() {
        println!(
            "Missed {} question(s); run with --review-weak to practice them.",
            wrong.len()
        );
    }

    progress.clear_session();
}
