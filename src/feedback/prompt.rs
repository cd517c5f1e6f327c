//! @ai:module:intent Deterministic feedback prompt composition
//! @ai:module:layer application
//! @ai:module:public_api compose_prompt
//! @ai:module:stateless true

use crate::analysis::types::{ChapterAggregate, OverallMetrics, SubjectMetric};
use crate::error::{Error, Result};
use std::fmt::Write as FmtWrite;

/// @ai:intent Compose the instruction document for the text-generation service
///
/// Pure function: identical inputs produce byte-identical text. The output is
/// the literal service input and round-trip fixtures depend on exact
/// reproducibility, so nothing here may read clocks, ids or any other ambient
/// state. Ties (top subject, fastest/slowest chapter) resolve to the first
/// occurrence in the input sequence.
/// @ai:effects pure
pub fn compose_prompt(
    overall: &OverallMetrics,
    subjects: &[SubjectMetric],
    weak_areas: &[ChapterAggregate],
) -> Result<String> {
    let top_subject = subjects
        .iter()
        .max_by(|a, b| {
            a.accuracy_pct
                .partial_cmp(&b.accuracy_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or(Error::EmptyInput("subjects"))?;

    // max_by returns the LAST maximum; re-scan for the first occurrence.
    let top_subject = subjects
        .iter()
        .find(|s| s.accuracy_pct == top_subject.accuracy_pct)
        .unwrap_or(top_subject);

    let weakest = weak_areas.first().ok_or(Error::EmptyInput("weak areas"))?;

    if overall.total_attempted == 0 {
        return Err(Error::DivisionByZero("total attempted questions"));
    }
    let avg_time_min = overall.total_time_min / f64::from(overall.total_attempted);

    let fastest = extreme_by_avg_time(weak_areas, |candidate, best| candidate < best);
    let slowest = extreme_by_avg_time(weak_areas, |candidate, best| candidate > best);

    let mut out = String::new();
    writeln!(out, "**Generate student performance feedback with:**").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "1. **Personalized Introduction**").unwrap();
    writeln!(out, "- Start with: \"Great work on your recent test!\"").unwrap();
    writeln!(
        out,
        "- Highlight: \"Your strongest subject was {} with {:.2}% accuracy\"",
        top_subject.subject, top_subject.accuracy_pct
    )
    .unwrap();
    writeln!(
        out,
        "- Mention: \"Overall accuracy: {:.2}% ({}/{} correct)\"",
        overall.accuracy_pct, overall.total_correct, overall.total_attempted
    )
    .unwrap();
    writeln!(out).unwrap();
    writeln!(out, "2. **Performance Breakdown**").unwrap();
    writeln!(out, "**Subjects:**").unwrap();
    out.push_str(&subject_table(subjects));
    writeln!(out).unwrap();
    writeln!(out, "**Weakest Chapters:**").unwrap();
    out.push_str(&weak_table(weak_areas));
    writeln!(out).unwrap();
    writeln!(out, "3. **Time Management Insights**").unwrap();
    writeln!(out, "- Average time per question: {:.1} mins", avg_time_min).unwrap();
    writeln!(out, "- Fastest chapter: {}", fastest.chapter).unwrap();
    writeln!(out, "- Slowest chapter: {}", slowest.chapter).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "4. **Actionable Recommendations** (3 specific tips)").unwrap();
    writeln!(
        out,
        "- Focus practice on: {} (current accuracy: {:.2}%)",
        weakest.chapter, weakest.accuracy_pct
    )
    .unwrap();
    writeln!(
        out,
        "- Time management strategy for: {}",
        slowest.chapter
    )
    .unwrap();
    writeln!(
        out,
        "- Resource suggestion: Khan Academy {} tutorials",
        top_subject.subject
    )
    .unwrap();
    writeln!(out).unwrap();
    write!(out, "**Tone:** Encouraging, specific, and growth-focused").unwrap();

    Ok(out)
}

/// @ai:intent First chapter winning the given strict comparison on average time
/// @ai:pre weak_areas is non-empty
/// @ai:effects pure
fn extreme_by_avg_time(
    weak_areas: &[ChapterAggregate],
    wins: fn(f64, f64) -> bool,
) -> &ChapterAggregate {
    let mut best = &weak_areas[0];
    for candidate in &weak_areas[1..] {
        if wins(candidate.avg_time_sec, best.avg_time_sec) {
            best = candidate;
        }
    }
    best
}

/// @ai:intent Render the full subject table as markdown
/// @ai:effects pure
fn subject_table(subjects: &[SubjectMetric]) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "| Subject | Marks Scored | Attempted | Correct | Accuracy (%) | Time Taken (min) |"
    )
    .unwrap();
    writeln!(
        out,
        "|---------|--------------|-----------|---------|--------------|------------------|"
    )
    .unwrap();

    for s in subjects {
        writeln!(
            out,
            "| {} | {:.2} | {} | {} | {:.2} | {:.2} |",
            s.subject, s.marks_scored, s.attempted, s.correct, s.accuracy_pct, s.time_taken_min
        )
        .unwrap();
    }

    out
}

/// @ai:intent Render the (chapter, accuracy) projection of the weak-area table
/// @ai:effects pure
fn weak_table(weak_areas: &[ChapterAggregate]) -> String {
    let mut out = String::new();
    writeln!(out, "| Chapter | Accuracy (%) |").unwrap();
    writeln!(out, "|---------|--------------|").unwrap();

    for w in weak_areas {
        writeln!(out, "| {} | {:.2} |", w.chapter, w.accuracy_pct).unwrap();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn overall() -> OverallMetrics {
        OverallMetrics {
            total_time_min: 72.02,
            total_score: 59.0,
            total_attempted: 30,
            total_correct: 21,
            accuracy_pct: 70.0,
        }
    }

    fn subject(name: &str, accuracy: f64) -> SubjectMetric {
        SubjectMetric {
            subject: name.to_string(),
            marks_scored: 12.0,
            attempted: 10,
            correct: 7,
            accuracy_pct: accuracy,
            time_taken_min: 24.0,
        }
    }

    fn chapter(name: &str, accuracy: f64, avg_time: f64) -> ChapterAggregate {
        ChapterAggregate {
            chapter: name.to_string(),
            correct: 1,
            total: 2,
            total_time_sec: avg_time * 2.0,
            accuracy_pct: accuracy,
            avg_time_sec: avg_time,
        }
    }

    #[test]
    fn test_compose_prompt_is_deterministic() {
        let subjects = vec![subject("Physics", 70.0), subject("Chemistry", 85.5)];
        let weak = vec![chapter("Optics", 25.0, 40.0), chapter("Kinematics", 50.0, 12.0)];

        let first = compose_prompt(&overall(), &subjects, &weak).unwrap();
        let second = compose_prompt(&overall(), &subjects, &weak).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compose_prompt_embeds_top_subject_and_recommendations() {
        let subjects = vec![subject("Physics", 70.0), subject("Chemistry", 85.5)];
        let weak = vec![chapter("Optics", 25.0, 40.0), chapter("Kinematics", 50.0, 12.0)];

        let prompt = compose_prompt(&overall(), &subjects, &weak).unwrap();

        assert!(prompt.contains("Your strongest subject was Chemistry with 85.50% accuracy"));
        assert!(prompt.contains("Overall accuracy: 70.00% (21/30 correct)"));
        assert!(prompt.contains("Focus practice on: Optics (current accuracy: 25.00%)"));
        assert!(prompt.contains("- Fastest chapter: Kinematics"));
        assert!(prompt.contains("- Slowest chapter: Optics"));
        assert!(prompt.contains("Time management strategy for: Optics"));
        assert!(prompt.contains("Resource suggestion: Khan Academy Chemistry tutorials"));
        // Average time: 72.02 / 30 = 2.4006... -> one decimal place
        assert!(prompt.contains("Average time per question: 2.4 mins"));
    }

    #[test]
    fn test_top_subject_tie_keeps_first_occurrence() {
        let subjects = vec![subject("Physics", 80.0), subject("Maths", 80.0)];
        let weak = vec![chapter("Optics", 25.0, 40.0)];

        let prompt = compose_prompt(&overall(), &subjects, &weak).unwrap();
        assert!(prompt.contains("Your strongest subject was Physics"));
    }

    #[test]
    fn test_time_extreme_tie_keeps_first_occurrence() {
        let weak = vec![
            chapter("First", 20.0, 30.0),
            chapter("Second", 40.0, 30.0),
        ];
        let subjects = vec![subject("Physics", 70.0)];

        let prompt = compose_prompt(&overall(), &subjects, &weak).unwrap();
        assert!(prompt.contains("- Fastest chapter: First"));
        assert!(prompt.contains("- Slowest chapter: First"));
    }

    #[test]
    fn test_empty_subjects_is_error() {
        let weak = vec![chapter("Optics", 25.0, 40.0)];
        let err = compose_prompt(&overall(), &[], &weak).unwrap_err();
        assert!(matches!(err, Error::EmptyInput("subjects")));
    }

    #[test]
    fn test_empty_weak_areas_is_error() {
        let subjects = vec![subject("Physics", 70.0)];
        let err = compose_prompt(&overall(), &subjects, &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyInput("weak areas")));
    }

    #[test]
    fn test_zero_attempted_is_division_by_zero() {
        let mut o = overall();
        o.total_attempted = 0;
        let subjects = vec![subject("Physics", 70.0)];
        let weak = vec![chapter("Optics", 25.0, 40.0)];

        let err = compose_prompt(&o, &subjects, &weak).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero(_)));
    }

    #[test]
    fn test_tables_render_every_row() {
        let subjects = vec![subject("Physics", 70.0), subject("Chemistry", 60.0)];
        let weak = vec![chapter("Optics", 25.0, 40.0), chapter("Waves", 75.0, 20.0)];

        let prompt = compose_prompt(&overall(), &subjects, &weak).unwrap();
        assert!(prompt.contains("| Physics | 12.00 | 10 | 7 | 70.00 | 24.00 |"));
        assert!(prompt.contains("| Chemistry | 12.00 | 10 | 7 | 60.00 | 24.00 |"));
        assert!(prompt.contains("| Optics | 25.00 |"));
        assert!(prompt.contains("| Waves | 75.00 |"));
    }
}
