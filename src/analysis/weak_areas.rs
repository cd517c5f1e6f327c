//! @ai:module:intent Group question records by chapter and rank weakest first
//! @ai:module:layer application
//! @ai:module:public_api aggregate_weak_areas
//! @ai:module:stateless true

use crate::analysis::round2;
use crate::analysis::types::{ChapterAggregate, QuestionRecord};
use crate::error::{Error, Result};
use std::collections::HashMap;

/// @ai:intent Aggregate question records into chapter stats, weakest chapter first
///
/// Grouping is an exact, case-sensitive match on the chapter string, in
/// first-encounter order. The sort is stable: equal-accuracy chapters keep
/// that order. An empty input signals an upstream data problem, not a valid
/// "no weak areas" state.
/// @ai:effects pure
pub fn aggregate_weak_areas(questions: &[QuestionRecord]) -> Result<Vec<ChapterAggregate>> {
    if questions.is_empty() {
        return Err(Error::EmptyInput("questions"));
    }

    let mut groups: Vec<ChapterAggregate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for q in questions {
        let slot = match index.get(q.chapter.as_str()) {
            Some(&i) => i,
            None => {
                groups.push(ChapterAggregate {
                    chapter: q.chapter.clone(),
                    correct: 0,
                    total: 0,
                    total_time_sec: 0.0,
                    accuracy_pct: 0.0,
                    avg_time_sec: 0.0,
                });
                index.insert(q.chapter.as_str(), groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[slot];
        group.total += 1;
        group.total_time_sec += q.time_taken_sec;
        if q.correct {
            group.correct += 1;
        }
    }

    for group in &mut groups {
        group.accuracy_pct = round2(f64::from(group.correct) / f64::from(group.total) * 100.0);
        group.avg_time_sec = round2(group.total_time_sec / f64::from(group.total));
    }

    groups.sort_by(|a, b| {
        a.accuracy_pct
            .partial_cmp(&b.accuracy_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(chapter: &str, correct: bool, time: f64) -> QuestionRecord {
        QuestionRecord {
            chapter: chapter.to_string(),
            topic: "Unknown".to_string(),
            concept: "Unknown".to_string(),
            difficulty: "unknown".to_string(),
            correct,
            time_taken_sec: time,
            status: "answered".to_string(),
        }
    }

    #[test]
    fn test_ranks_weakest_first() {
        // A: 1/2 = 50%, B: 2/2 = 100%, C: 1/4 = 25%
        let questions = vec![
            record("A", true, 10.0),
            record("A", false, 20.0),
            record("B", true, 5.0),
            record("B", true, 5.0),
            record("C", true, 8.0),
            record("C", false, 8.0),
            record("C", false, 8.0),
            record("C", false, 8.0),
        ];

        let ranked = aggregate_weak_areas(&questions).unwrap();
        let order: Vec<(&str, f64)> = ranked
            .iter()
            .map(|g| (g.chapter.as_str(), g.accuracy_pct))
            .collect();
        assert_eq!(order, vec![("C", 25.0), ("A", 50.0), ("B", 100.0)]);
    }

    #[test]
    fn test_counts_cover_every_question() {
        let questions = vec![
            record("A", true, 1.0),
            record("B", false, 2.0),
            record("A", false, 3.0),
            record("C", true, 4.0),
        ];

        let ranked = aggregate_weak_areas(&questions).unwrap();
        assert_eq!(ranked.len(), 3);
        let total: u32 = ranked.iter().map(|g| g.total).sum();
        assert_eq!(total as usize, questions.len());
        assert!(ranked.iter().all(|g| g.total >= 1));
    }

    #[test]
    fn test_aggregate_times() {
        let questions = vec![
            record("A", true, 30.0),
            record("A", false, 31.0),
            record("A", false, 32.0),
        ];

        let ranked = aggregate_weak_areas(&questions).unwrap();
        assert_eq!(ranked[0].total_time_sec, 93.0);
        assert_eq!(ranked[0].avg_time_sec, 31.0);
        assert_eq!(ranked[0].accuracy_pct, 33.33);
    }

    #[test]
    fn test_stable_order_on_equal_accuracy() {
        // Both chapters at 50%; "First" was encountered first and must stay first.
        let questions = vec![
            record("First", true, 1.0),
            record("First", false, 1.0),
            record("Second", false, 1.0),
            record("Second", true, 1.0),
        ];

        let ranked = aggregate_weak_areas(&questions).unwrap();
        assert_eq!(ranked[0].chapter, "First");
        assert_eq!(ranked[1].chapter, "Second");
    }

    #[test]
    fn test_grouping_is_case_sensitive() {
        let questions = vec![record("Optics", true, 1.0), record("optics", false, 1.0)];
        let ranked = aggregate_weak_areas(&questions).unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = aggregate_weak_areas(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptyInput("questions")));
    }
}
