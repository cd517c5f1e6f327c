//! @ai:module:intent Raw assessment submission model from the test platform export
//! @ai:module:layer domain
//! @ai:module:public_api RawSubmission, RawSubject, RawSection, RawQuestion
//! @ai:module:stateless true

use serde::Deserialize;

/// @ai:intent One decoded student submission, top level of the platform export
///
/// The five overall fields are `Option` so a missing field is detectable
/// downstream; everything nested defaults on absence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    pub total_time_taken: Option<f64>,
    pub total_mark_scored: Option<f64>,
    pub total_attempted: Option<u32>,
    pub total_correct: Option<u32>,
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub subjects: Vec<RawSubject>,
    #[serde(default)]
    pub sections: Vec<RawSection>,
}

/// @ai:intent MongoDB-style object id wrapper (`{"$oid": "..."}`)
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectId {
    #[serde(rename = "$oid")]
    pub oid: String,
}

/// @ai:intent Per-subject rollup as exported by the platform
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubject {
    pub subject_id: Option<ObjectId>,
    #[serde(default)]
    pub total_time_taken: f64,
    #[serde(default)]
    pub total_mark_scored: f64,
    #[serde(default)]
    pub total_attempted: u32,
    #[serde(default)]
    pub total_correct: u32,
    #[serde(default)]
    pub accuracy: f64,
}

/// @ai:intent A test section holding answered questions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSection {
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
}

/// @ai:intent One answered question with its taxonomy and marked options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    #[serde(default)]
    pub question_id: RawQuestionInfo,
    #[serde(default)]
    pub marked_options: Vec<RawOption>,
    #[serde(default)]
    pub time_taken: f64,
    pub status: Option<String>,
}

/// @ai:intent Question taxonomy: chapter/topic/concept titles and difficulty level
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuestionInfo {
    #[serde(default)]
    pub chapters: Vec<Titled>,
    #[serde(default)]
    pub topics: Vec<Titled>,
    #[serde(default)]
    pub concepts: Vec<Titled>,
    pub level: Option<String>,
}

/// @ai:intent A taxonomy entry carrying only its display title
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Titled {
    #[serde(default)]
    pub title: String,
}

/// @ai:intent An option the student marked on a question
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOption {
    #[serde(default)]
    pub is_correct: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_minimal_submission() {
        let json = r#"{
            "totalTimeTaken": 3600,
            "totalMarkScored": 42,
            "totalAttempted": 30,
            "totalCorrect": 21,
            "accuracy": 70.0
        }"#;

        let raw: RawSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(raw.total_attempted, Some(30));
        assert!(raw.subjects.is_empty());
        assert!(raw.sections.is_empty());
    }

    #[test]
    fn test_decode_nested_question() {
        let json = r#"{
            "sections": [{
                "questions": [{
                    "questionId": {
                        "chapters": [{"title": "Electrostatics"}],
                        "topics": [{"title": "Coulomb's Law"}],
                        "concepts": [],
                        "level": "medium"
                    },
                    "markedOptions": [{"isCorrect": true}],
                    "timeTaken": 45,
                    "status": "answered"
                }]
            }]
        }"#;

        let raw: RawSubmission = serde_json::from_str(json).unwrap();
        let q = &raw.sections[0].questions[0];
        assert_eq!(q.question_id.chapters[0].title, "Electrostatics");
        assert!(q.marked_options[0].is_correct);
        assert!(raw.total_time_taken.is_none());
    }

    #[test]
    fn test_decode_subject_with_oid() {
        let json = r#"{
            "subjects": [{
                "subjectId": {"$oid": "607018ee404ae53194e73d92"},
                "totalMarkScored": 12.5
            }]
        }"#;

        let raw: RawSubmission = serde_json::from_str(json).unwrap();
        let sub = &raw.subjects[0];
        assert_eq!(sub.subject_id.as_ref().unwrap().oid, "607018ee404ae53194e73d92");
        assert_eq!(sub.total_attempted, 0);
    }
}
