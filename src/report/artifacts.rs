//! @ai:module:intent Per-student artifact persistence under the output directory
//! @ai:module:layer infrastructure
//! @ai:module:public_api ArtifactStore, RunManifest
//! @ai:module:stateless true

use crate::analysis::types::{ChapterAggregate, OverallMetrics, QuestionRecord, SubjectMetric};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Summary of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub timestamp: String,
    pub processed: Vec<String>,
    pub failed: Vec<String>,
}

/// @ai:intent Reads and writes the per-student artifact files
///
/// File naming mirrors the platform convention: `<kind>_<student_id>.<ext>`.
pub struct ArtifactStore {
    output_dir: PathBuf,
}

impl ArtifactStore {
    /// @ai:intent Create a store rooted at the output directory
    /// @ai:effects pure
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// @ai:intent Create the output directory if needed
    /// @ai:effects fs:write
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    pub fn overall_path(&self, student_id: &str) -> PathBuf {
        self.output_dir.join(format!("overall_{student_id}.json"))
    }

    pub fn subject_path(&self, student_id: &str) -> PathBuf {
        self.output_dir.join(format!("subject_{student_id}.csv"))
    }

    pub fn chapter_path(&self, student_id: &str) -> PathBuf {
        self.output_dir.join(format!("chapter_{student_id}.csv"))
    }

    pub fn weak_path(&self, student_id: &str) -> PathBuf {
        self.output_dir.join(format!("weak_{student_id}.csv"))
    }

    pub fn feedback_path(&self, student_id: &str) -> PathBuf {
        self.output_dir.join(format!("feedback_{student_id}.txt"))
    }

    pub fn chart_path(&self, student_id: &str) -> PathBuf {
        self.output_dir.join(format!("chart_{student_id}.png"))
    }

    pub fn document_path(&self, student_id: &str) -> PathBuf {
        self.output_dir.join(format!("feedback_{student_id}.pdf"))
    }

    /// @ai:intent Save the overall metrics record
    /// @ai:effects fs:write
    pub fn save_overall(&self, student_id: &str, overall: &OverallMetrics) -> Result<()> {
        let json = serde_json::to_string_pretty(overall)?;
        std::fs::write(self.overall_path(student_id), json)?;
        Ok(())
    }

    /// @ai:intent Save the subject table
    /// @ai:effects fs:write
    pub fn save_subjects(&self, student_id: &str, subjects: &[SubjectMetric]) -> Result<()> {
        let mut rows = vec![csv_row(&[
            "Subject",
            "Marks Scored",
            "Attempted",
            "Correct",
            "Accuracy (%)",
            "Time Taken (min)",
        ])];

        for s in subjects {
            rows.push(csv_row(&[
                &s.subject,
                &s.marks_scored.to_string(),
                &s.attempted.to_string(),
                &s.correct.to_string(),
                &s.accuracy_pct.to_string(),
                &s.time_taken_min.to_string(),
            ]));
        }

        std::fs::write(self.subject_path(student_id), rows.join("\n"))?;
        Ok(())
    }

    /// @ai:intent Save the flattened question table
    /// @ai:effects fs:write
    pub fn save_chapters(&self, student_id: &str, questions: &[QuestionRecord]) -> Result<()> {
        let mut rows = vec![csv_row(&[
            "Chapter",
            "Topic",
            "Concept",
            "Difficulty",
            "Correct",
            "Time Taken (sec)",
            "Status",
        ])];

        for q in questions {
            rows.push(csv_row(&[
                &q.chapter,
                &q.topic,
                &q.concept,
                &q.difficulty,
                &q.correct.to_string(),
                &q.time_taken_sec.to_string(),
                &q.status,
            ]));
        }

        std::fs::write(self.chapter_path(student_id), rows.join("\n"))?;
        Ok(())
    }

    /// @ai:intent Save the ranked weak-area table
    /// @ai:effects fs:write
    pub fn save_weak(&self, student_id: &str, weak_areas: &[ChapterAggregate]) -> Result<()> {
        let mut rows = vec![csv_row(&[
            "Chapter",
            "Correct",
            "Total",
            "Total Time (sec)",
            "Accuracy (%)",
            "Avg Time per Question (s)",
        ])];

        for w in weak_areas {
            rows.push(csv_row(&[
                &w.chapter,
                &w.correct.to_string(),
                &w.total.to_string(),
                &w.total_time_sec.to_string(),
                &w.accuracy_pct.to_string(),
                &w.avg_time_sec.to_string(),
            ]));
        }

        std::fs::write(self.weak_path(student_id), rows.join("\n"))?;
        Ok(())
    }

    /// @ai:intent Save the generated narrative text
    /// @ai:effects fs:write
    pub fn save_feedback(&self, student_id: &str, narrative: &str) -> Result<()> {
        std::fs::write(self.feedback_path(student_id), narrative)?;
        Ok(())
    }

    /// @ai:intent Load a previously generated narrative
    /// @ai:effects fs:read
    pub fn load_feedback(&self, student_id: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.feedback_path(student_id))?)
    }

    /// @ai:intent Load the subject table back from its CSV artifact
    /// @ai:effects fs:read
    pub fn load_subjects(&self, student_id: &str) -> Result<Vec<SubjectMetric>> {
        let content = std::fs::read_to_string(self.subject_path(student_id))?;

        data_rows(&content)
            .map(|fields| {
                if fields.len() != 6 {
                    return Err(malformed("subject", fields.len()));
                }
                Ok(SubjectMetric {
                    subject: fields[0].clone(),
                    marks_scored: parse_field("subject", &fields[1])?,
                    attempted: parse_field("subject", &fields[2])?,
                    correct: parse_field("subject", &fields[3])?,
                    accuracy_pct: parse_field("subject", &fields[4])?,
                    time_taken_min: parse_field("subject", &fields[5])?,
                })
            })
            .collect()
    }

    /// @ai:intent Load the ranked weak-area table back from its CSV artifact
    /// @ai:effects fs:read
    pub fn load_weak(&self, student_id: &str) -> Result<Vec<ChapterAggregate>> {
        let content = std::fs::read_to_string(self.weak_path(student_id))?;

        data_rows(&content)
            .map(|fields| {
                if fields.len() != 6 {
                    return Err(malformed("weak", fields.len()));
                }
                Ok(ChapterAggregate {
                    chapter: fields[0].clone(),
                    correct: parse_field("weak", &fields[1])?,
                    total: parse_field("weak", &fields[2])?,
                    total_time_sec: parse_field("weak", &fields[3])?,
                    accuracy_pct: parse_field("weak", &fields[4])?,
                    avg_time_sec: parse_field("weak", &fields[5])?,
                })
            })
            .collect()
    }

    /// @ai:intent Save the run manifest, timestamped like the run itself
    /// @ai:effects fs:write
    pub fn save_manifest(&self, manifest: &RunManifest) -> Result<PathBuf> {
        let stamp = manifest.timestamp.replace(':', "-");
        let path = self.output_dir.join(format!("run_{stamp}.json"));
        std::fs::write(&path, serde_json::to_string_pretty(manifest)?)?;
        Ok(path)
    }
}

/// @ai:intent Iterate the parsed data rows of a CSV artifact, header skipped
/// @ai:effects pure
fn data_rows(content: &str) -> impl Iterator<Item = Vec<String>> + '_ {
    content
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(parse_csv_line)
}

fn malformed(table: &str, fields: usize) -> Error {
    Error::Config(format!("malformed {table} artifact row: {fields} fields"))
}

fn parse_field<T: std::str::FromStr>(table: &str, field: &str) -> Result<T> {
    field
        .parse()
        .map_err(|_| Error::Config(format!("malformed {table} artifact value `{field}`")))
}

/// @ai:intent Join fields into one CSV row, quoting where needed
/// @ai:effects pure
fn csv_row(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| csv_escape(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// @ai:intent Quote a field containing commas, quotes or newlines
/// @ai:effects pure
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// @ai:intent Split one CSV line into unquoted fields
/// @ai:effects pure
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}
