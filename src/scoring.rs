//! Grade mapping and result formatting helpers.

use crate::model::QuizResults;

/// A grade band with its presentation strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub label: &'static str,
    pub emoji: &'static str,
    pub message: &'static str,
    pub color_class: &'static str,
    pub min_percentage: u32,
}

/// Ordered highest threshold first; the 0% entry is the catch-all
const GRADES: &[Grade] = &[
    Grade {
        label: "Excelente",
        emoji: "🏆",
        message: "Dominas muy bien este tema.",
        color_class: "emerald",
        min_percentage: 90,
    },
    Grade {
        label: "Muy bien",
        emoji: "😊",
        message: "Buen conocimiento, pero puedes mejorar.",
        color_class: "blue",
        min_percentage: 70,
    },
    Grade {
        label: "Aprobado",
        emoji: "📚",
        message: "Necesitas repasar algunos conceptos.",
        color_class: "yellow",
        min_percentage: 50,
    },
    Grade {
        label: "Sigue practicando",
        emoji: "💪",
        message: "Revisa el material y vuelve a intentarlo.",
        color_class: "red",
        min_percentage: 0,
    },
];

/// The grade band for a percentage score
pub fn grade_for(percentage: u32) -> &'static Grade {
    GRADES
        .iter()
        .find(|g| percentage >= g.min_percentage)
        .unwrap_or(&GRADES[GRADES.len() - 1])
}

/// Formats a millisecond duration as "Ns" or "Mm Ns"
pub fn format_duration(ms: i64) -> String {
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let remaining = seconds % 60;

    if minutes == 0 {
        format!("{}s", remaining)
    } else {
        format!("{}m {}s", minutes, remaining)
    }
}

/// Average time spent per question, in milliseconds
pub fn average_time_per_question(results: &QuizResults) -> i64 {
    if results.total_questions == 0 {
        return 0;
    }
    results.duration_ms / results.total_questions as i64
}

/// One-line summary of a finished run
pub fn performance_summary(results: &QuizResults) -> String {
    let grade = grade_for(results.percentage);
    let avg = format_duration(average_time_per_question(results));
    format!(
        "{} - {}/{} correctas ({}%). Tiempo medio: {}/pregunta.",
        grade.label, results.correct_count, results.total_questions, results.percentage, avg
    )
}

/// Whether a score beats the previous best (or there is none)
pub fn is_personal_best(new_percentage: u32, previous_best: Option<u32>) -> bool {
    match previous_best {
        Some(best) => new_percentage > best,
        None => true,
    }
}

/// Difference against a previous attempt; negative means a regression
pub fn improvement(new_percentage: u32, previous_percentage: u32) -> i64 {
    new_percentage as i64 - previous_percentage as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(grade_for(100).label, "Excelente");
        assert_eq!(grade_for(90).label, "Excelente");
        assert_eq!(grade_for(89).label, "Muy bien");
        assert_eq!(grade_for(70).label, "Muy bien");
        assert_eq!(grade_for(69).label, "Aprobado");
        assert_eq!(grade_for(50).label, "Aprobado");
        assert_eq!(grade_for(49).label, "Sigue practicando");
        assert_eq!(grade_for(0).label, "Sigue practicando");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59_999), "59s");
        assert_eq!(format_duration(60_000), "1m 0s");
        assert_eq!(format_duration(125_000), "2m 5s");
    }

    #[test]
    fn test_is_personal_best() {
        assert!(is_personal_best(10, None));
        assert!(is_personal_best(80, Some(70)));
        assert!(!is_personal_best(70, Some(70)));
        assert!(!is_personal_best(60, Some(70)));
    }

    #[test]
    fn test_improvement_can_be_negative() {
        assert_eq!(improvement(80, 60), 20);
        assert_eq!(improvement(50, 70), -20);
    }

    #[test]
    fn test_performance_summary() {
        let results = QuizResults {
            total_questions: 10,
            correct_count: 7,
            wrong_count: 3,
            percentage: 70,
            answers: vec![],
            wrong_questions: vec![],
            duration_ms: 120_000,
        };
        let summary = performance_summary(&results);
        assert_eq!(
            summary,
            "Muy bien - 7/10 correctas (70%). Tiempo medio: 12s/pregunta."
        );
    }

    #[test]
    fn test_average_time_guards_empty() {
        let results = QuizResults {
            total_questions: 0,
            correct_count: 0,
            wrong_count: 0,
            percentage: 0,
            answers: vec![],
            wrong_questions: vec![],
            duration_ms: 1000,
        };
        assert_eq!(average_time_per_question(&results), 0);
    }
}
