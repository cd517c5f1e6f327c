//! @ai:module:intent Submission file discovery and JSON decoding
//! @ai:module:layer infrastructure
//! @ai:module:public_api SubmissionLoader
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::submission::raw::RawSubmission;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Platform export naming scheme; the capture is the student id.
const FILE_PATTERN: &str = r"^sample_submission_analysis_(.+)\.json$";

/// @ai:intent A discovered submission file with its derived student id
#[derive(Debug, Clone)]
pub struct SubmissionFile {
    pub student_id: String,
    pub path: PathBuf,
}

/// @ai:intent Trait for submission discovery and loading
pub trait SubmissionLoaderTrait: Send + Sync {
    /// @ai:intent Find all submission files under the data directory
    fn discover(&self, data_dir: &Path) -> Vec<SubmissionFile>;

    /// @ai:intent Decode a single submission file
    fn load(&self, path: &Path) -> Result<RawSubmission>;
}

/// @ai:intent Loads platform submission exports from disk
pub struct SubmissionLoader {
    pattern: Regex,
}

impl SubmissionLoader {
    /// @ai:intent Create a new submission loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            // The pattern is a compile-time constant; it always parses.
            pattern: Regex::new(FILE_PATTERN).expect("invalid submission file pattern"),
        }
    }

    /// @ai:intent Extract a student id from a file name, if it matches the scheme
    /// @ai:effects pure
    pub fn student_id_from_name(&self, file_name: &str) -> Option<String> {
        self.pattern
            .captures(file_name)
            .map(|caps| caps[1].to_string())
    }
}

impl Default for SubmissionLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionLoaderTrait for SubmissionLoader {
    /// @ai:intent Find all submission files under the data directory
    /// @ai:effects fs:read
    fn discover(&self, data_dir: &Path) -> Vec<SubmissionFile> {
        let mut files: Vec<SubmissionFile> = WalkDir::new(data_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| {
                let name = e.file_name().to_str()?;
                let student_id = self.student_id_from_name(name)?;
                Some(SubmissionFile {
                    student_id,
                    path: e.path().to_path_buf(),
                })
            })
            .collect();

        files.sort_by(|a, b| a.student_id.cmp(&b.student_id));
        files
    }

    /// @ai:intent Decode a single submission file
    ///
    /// Each export holds a single object wrapped in a one-element list.
    /// @ai:effects fs:read
    fn load(&self, path: &Path) -> Result<RawSubmission> {
        let content = std::fs::read_to_string(path)?;
        let mut records: Vec<RawSubmission> = serde_json::from_str(&content)?;

        if records.is_empty() {
            return Err(Error::EmptyInput("submission records"));
        }

        Ok(records.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_student_id_from_name() {
        let loader = SubmissionLoader::new();
        assert_eq!(
            loader.student_id_from_name("sample_submission_analysis_220.json"),
            Some("220".to_string())
        );
        assert_eq!(loader.student_id_from_name("notes.json"), None);
        assert_eq!(loader.student_id_from_name("sample_submission_analysis_.json"), None);
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "sample_submission_analysis_222.json", "[]");
        write_file(temp.path(), "sample_submission_analysis_220.json", "[]");
        write_file(temp.path(), "unrelated.json", "[]");

        let loader = SubmissionLoader::new();
        let files = loader.discover(temp.path());

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].student_id, "220");
        assert_eq!(files[1].student_id, "222");
    }

    #[test]
    fn test_load_unwraps_single_element_list() {
        let temp = TempDir::new().unwrap();
        write_file(
            temp.path(),
            "sample_submission_analysis_1.json",
            r#"[{"totalAttempted": 10}]"#,
        );

        let loader = SubmissionLoader::new();
        let raw = loader
            .load(&temp.path().join("sample_submission_analysis_1.json"))
            .unwrap();
        assert_eq!(raw.total_attempted, Some(10));
    }

    #[test]
    fn test_load_empty_list_is_error() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "sample_submission_analysis_1.json", "[]");

        let loader = SubmissionLoader::new();
        let err = loader
            .load(&temp.path().join("sample_submission_analysis_1.json"))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
    }
}
