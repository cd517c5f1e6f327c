//! @ai:module:intent Per-student pipeline orchestration
//! @ai:module:layer application
//! @ai:module:public_api ReportPipeline, RunSummary
//! @ai:module:stateless false

use crate::analysis::{aggregate_weak_areas, extract_overall, extract_questions, extract_subjects};
use crate::config::ReportConfig;
use crate::document::DocumentRenderer;
use crate::feedback::client::{TextGenerator, SYSTEM_PERSONA};
use crate::feedback::pacer::RequestPacer;
use crate::feedback::prompt::compose_prompt;
use crate::report::artifacts::{ArtifactStore, RunManifest};
use crate::report::chart::{ChartRendererTrait, ScatterChartRenderer};
use crate::submission::loader::{SubmissionFile, SubmissionLoader, SubmissionLoaderTrait};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// @ai:intent Outcome of one pipeline run across all students
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub processed: Vec<String>,
    pub failed: Vec<String>,
}

/// @ai:intent Runs the full analytics and document pipeline per student
///
/// Students are isolated: a failure at any stage stops that student's
/// pipeline at the failing stage while the rest continue.
pub struct ReportPipeline<G: TextGenerator> {
    loader: SubmissionLoader,
    generator: Arc<G>,
    pacer: RequestPacer,
    chart: ScatterChartRenderer,
    renderer: DocumentRenderer,
    store: ArtifactStore,
    config: ReportConfig,
}

impl<G: TextGenerator> ReportPipeline<G> {
    /// @ai:intent Create a pipeline from configuration and a generator
    /// @ai:effects pure
    pub fn new(config: ReportConfig, generator: Arc<G>) -> Self {
        let renderer = DocumentRenderer::new(&config.render, &config.paths.logo_file);
        let store = ArtifactStore::new(&config.paths.output_dir);
        let pacer = RequestPacer::new(Duration::from_secs(config.api.request_delay_secs));

        Self {
            loader: SubmissionLoader::new(),
            generator,
            pacer,
            chart: ScatterChartRenderer::new(),
            renderer,
            store,
            config,
        }
    }

    /// @ai:intent Process every discovered submission sequentially
    /// @ai:effects network, fs:read, fs:write
    pub async fn process_all(&self) -> Result<RunSummary> {
        let files: Vec<SubmissionFile> = self
            .loader
            .discover(&self.config.paths.data_dir)
            .into_iter()
            .filter(|f| self.config.run.selects(&f.student_id))
            .collect();

        if files.is_empty() {
            tracing::warn!(
                "no submissions found in {}",
                self.config.paths.data_dir.display()
            );
            return Ok(RunSummary::default());
        }

        tracing::info!("found {} submissions to process", files.len());

        let mut summary = RunSummary::default();
        let total = files.len();

        for (index, file) in files.iter().enumerate() {
            tracing::info!(
                "[{}/{}] processing student {}",
                index + 1,
                total,
                file.student_id
            );

            match self.process_one(file).await {
                Ok(document) => {
                    tracing::info!(
                        "student {} report written to {}",
                        file.student_id,
                        document.display()
                    );
                    summary.processed.push(file.student_id.clone());
                }
                Err(e) => {
                    tracing::error!("student {} failed: {:#}", file.student_id, e);
                    summary.failed.push(file.student_id.clone());
                }
            }
        }

        let manifest = RunManifest {
            timestamp: chrono::Utc::now().to_rfc3339(),
            processed: summary.processed.clone(),
            failed: summary.failed.clone(),
        };
        self.store.ensure_dir()?;
        self.store.save_manifest(&manifest)?;

        Ok(summary)
    }

    /// @ai:intent Run one student through extraction, generation and rendering
    ///
    /// The chart is the only degradable stage; everything else aborts this
    /// student. The PDF and feedback text are written only after their
    /// producing stage fully succeeds, so no partial output masquerades as a
    /// complete one.
    /// @ai:effects network, fs:read, fs:write
    async fn process_one(&self, file: &SubmissionFile) -> Result<PathBuf> {
        let student_id = &file.student_id;
        let raw = self.loader.load(&file.path)?;

        let overall = extract_overall(&raw)?;
        let subjects = extract_subjects(&raw);
        let questions = extract_questions(&raw);
        let weak_areas = aggregate_weak_areas(&questions)?;

        self.store.ensure_dir()?;
        self.store.save_overall(student_id, &overall)?;
        self.store.save_subjects(student_id, &subjects)?;
        self.store.save_chapters(student_id, &questions)?;
        self.store.save_weak(student_id, &weak_areas)?;

        let chart_file = self.store.chart_path(student_id);
        let chart_path = match self.chart.render(&subjects, student_id, &chart_file) {
            Ok(()) => Some(chart_file),
            Err(e) => {
                tracing::warn!("chart generation failed for student {}: {}", student_id, e);
                None
            }
        };

        let prompt = compose_prompt(&overall, &subjects, &weak_areas)?;
        tracing::debug!("prompt for student {} ready: {} chars", student_id, prompt.len());

        self.pacer.pause().await;
        let narrative = self.generator.generate(SYSTEM_PERSONA, &prompt).await?;
        self.store.save_feedback(student_id, &narrative)?;

        let document = self.renderer.render(
            student_id,
            &narrative,
            &subjects,
            &weak_areas,
            chart_path.as_deref(),
            &self.store.document_path(student_id),
        )?;

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, PathConfig};
    use crate::feedback::client::MockGenerator;
    use tempfile::TempDir;

    const VALID_SUBMISSION: &str = r#"[{
        "totalTimeTaken": 4321,
        "totalMarkScored": 59,
        "totalAttempted": 30,
        "totalCorrect": 21,
        "accuracy": 70.0,
        "subjects": [{
            "subjectId": {"$oid": "607018ee404ae53194e73d92"},
            "totalTimeTaken": 1440,
            "totalMarkScored": 20,
            "totalAttempted": 10,
            "totalCorrect": 7,
            "accuracy": 70.0
        }],
        "sections": [{
            "questions": [
                {
                    "questionId": {"chapters": [{"title": "Optics"}], "topics": [], "concepts": [], "level": "easy"},
                    "markedOptions": [{"isCorrect": true}],
                    "timeTaken": 40,
                    "status": "answered"
                },
                {
                    "questionId": {"chapters": [{"title": "Waves"}], "topics": [], "concepts": [], "level": "hard"},
                    "markedOptions": [{"isCorrect": false}],
                    "timeTaken": 95,
                    "status": "answered"
                }
            ]
        }]
    }]"#;

    // Missing totalMarkScored: extraction must fail and no document appear.
    const BROKEN_SUBMISSION: &str = r#"[{
        "totalTimeTaken": 4321,
        "totalAttempted": 30,
        "totalCorrect": 21,
        "accuracy": 70.0,
        "sections": [{
            "questions": [{
                "questionId": {"chapters": [{"title": "Optics"}]},
                "markedOptions": [],
                "timeTaken": 10
            }]
        }]
    }]"#;

    fn test_config(temp: &TempDir) -> ReportConfig {
        let data_dir = temp.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();

        ReportConfig {
            api: ApiConfig {
                request_delay_secs: 0,
                ..Default::default()
            },
            paths: PathConfig {
                data_dir,
                output_dir: temp.path().join("output"),
                logo_file: temp.path().join("no_logo.jpeg"),
            },
            ..Default::default()
        }
    }

    fn write_submission(config: &ReportConfig, student_id: &str, content: &str) {
        std::fs::write(
            config
                .paths
                .data_dir
                .join(format!("sample_submission_analysis_{student_id}.json")),
            content,
        )
        .unwrap();
    }

    fn mock_narrative() -> String {
        "Here is the student performance feedback:\n**Summary**\n* Solid attempt overall\n1. Revise Waves\nKeep at it!"
            .to_string()
    }

    #[tokio::test]
    async fn test_pipeline_produces_document_for_valid_student() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp);
        write_submission(&config, "220", VALID_SUBMISSION);

        let pipeline = ReportPipeline::new(config.clone(), Arc::new(MockGenerator::new(mock_narrative())));
        let summary = pipeline.process_all().await.unwrap();

        assert_eq!(summary.processed, vec!["220"]);
        assert!(summary.failed.is_empty());

        let store = ArtifactStore::new(&config.paths.output_dir);
        assert!(store.overall_path("220").exists());
        assert!(store.subject_path("220").exists());
        assert!(store.weak_path("220").exists());
        assert!(store.feedback_path("220").exists());
        assert!(store.document_path("220").exists());
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_other_students() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp);
        write_submission(&config, "220", BROKEN_SUBMISSION);
        write_submission(&config, "221", VALID_SUBMISSION);

        let pipeline = ReportPipeline::new(config.clone(), Arc::new(MockGenerator::new(mock_narrative())));
        let summary = pipeline.process_all().await.unwrap();

        assert_eq!(summary.processed, vec!["221"]);
        assert_eq!(summary.failed, vec!["220"]);

        let store = ArtifactStore::new(&config.paths.output_dir);
        assert!(!store.document_path("220").exists());
        assert!(store.document_path("221").exists());
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_no_feedback_or_document() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp);
        write_submission(&config, "220", VALID_SUBMISSION);

        // Empty mock response maps to a GenerationFailed error
        let pipeline = ReportPipeline::new(config.clone(), Arc::new(MockGenerator::new(String::new())));
        let summary = pipeline.process_all().await.unwrap();

        assert_eq!(summary.failed, vec!["220"]);

        let store = ArtifactStore::new(&config.paths.output_dir);
        assert!(!store.feedback_path("220").exists());
        assert!(!store.document_path("220").exists());
        // Stages before generation still persisted their artifacts
        assert!(store.weak_path("220").exists());
    }

    #[tokio::test]
    async fn test_student_filter_is_applied() {
        let temp = TempDir::new().unwrap();
        let mut config = test_config(&temp);
        config.run.student_ids = Some(vec!["999".to_string()]);
        write_submission(&config, "220", VALID_SUBMISSION);

        let pipeline = ReportPipeline::new(config, Arc::new(MockGenerator::new(mock_narrative())));
        let summary = pipeline.process_all().await.unwrap();

        assert!(summary.processed.is_empty());
        assert!(summary.failed.is_empty());
    }
}
