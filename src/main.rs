//! @ai:module:intent CLI for the MathonGo report pipeline
//! @ai:module:layer presentation

use anyhow::Result;
use clap::{Parser, Subcommand};
use mathongo_report::{
    analysis::{aggregate_weak_areas, extract_overall, extract_questions, extract_subjects},
    config::ReportConfig,
    document::DocumentRenderer,
    feedback::{GroqClient, MockGenerator},
    pipeline::{ReportPipeline, RunSummary},
    report::ArtifactStore,
    submission::{SubmissionLoader, SubmissionLoaderTrait},
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mathongo-report")]
#[command(about = "Student performance analytics and PDF feedback reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over every submission in the data directory
    Run {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding submission exports
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Output directory for artifacts and reports
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Restrict to these student ids (comma-separated)
        #[arg(long)]
        students: Option<String>,

        /// Run without calling the text-generation service
        #[arg(long)]
        dry_run: bool,
    },

    /// Analyze a single submission file and print its metrics
    Analyze {
        /// Path to a submission JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Rebuild the PDF for a student from persisted artifacts
    Render {
        /// Student id whose artifacts to render
        #[arg(short, long)]
        student_id: String,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List discovered submissions
    List {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "report.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mathongo_report=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data_dir,
            output,
            students,
            dry_run,
        } => run_pipeline(config, data_dir, output, students, dry_run).await,
        Commands::Analyze { file, config } => analyze_submission(file, config),
        Commands::Render { student_id, config } => render_document(student_id, config),
        Commands::List { config } => list_submissions(config),
        Commands::Init { output } => init_config(output),
    }
}

/// @ai:intent Run the full pipeline
/// @ai:effects network, fs:read, fs:write
async fn run_pipeline(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    students: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let mut config = load_or_default_config(config_path)?;

    if let Some(dir) = data_dir {
        config.paths.data_dir = dir;
    }
    if let Some(dir) = output {
        config.paths.output_dir = dir;
    }
    config.run.dry_run = dry_run;
    config.run.student_ids =
        students.map(|s| s.split(',').map(|id| id.trim().to_string()).collect());

    tracing::info!(
        "processing submissions from {}",
        config.paths.data_dir.display()
    );

    let summary = if config.run.dry_run {
        tracing::info!("running in dry-run mode, no generation calls will be made");
        let generator = Arc::new(MockGenerator::new(dry_run_narrative()));
        ReportPipeline::new(config, generator).process_all().await?
    } else {
        let generator = Arc::new(GroqClient::new(config.api.clone())?);
        ReportPipeline::new(config, generator).process_all().await?
    };

    print_summary(&summary);
    Ok(())
}

/// @ai:intent Canned narrative for dry runs, exercising every markup form
/// @ai:effects pure
fn dry_run_narrative() -> String {
    [
        "**Dry Run Feedback**",
        "",
        "* No generation call was made for this report",
        "1. Re-run without --dry-run to produce real feedback",
        "This document verifies layout and tables only.",
    ]
    .join("\n")
}

/// @ai:intent Analyze one submission and print its metric tables
/// @ai:effects fs:read, fs:write
fn analyze_submission(file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let loader = SubmissionLoader::new();

    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let student_id = loader
        .student_id_from_name(file_name)
        .unwrap_or_else(|| "unknown".to_string());

    let raw = loader.load(&file)?;
    let overall = extract_overall(&raw)?;
    let subjects = extract_subjects(&raw);
    let questions = extract_questions(&raw);
    let weak_areas = aggregate_weak_areas(&questions)?;

    let store = ArtifactStore::new(&config.paths.output_dir);
    store.ensure_dir()?;
    store.save_overall(&student_id, &overall)?;
    store.save_subjects(&student_id, &subjects)?;
    store.save_chapters(&student_id, &questions)?;
    store.save_weak(&student_id, &weak_areas)?;

    println!();
    println!("Student {student_id} Performance");
    println!("==============================");
    println!();
    println!("{:<28} {:>10.2}", "Total Time (min):", overall.total_time_min);
    println!("{:<28} {:>10.2}", "Total Score:", overall.total_score);
    println!("{:<28} {:>10}", "Questions Attempted:", overall.total_attempted);
    println!("{:<28} {:>10}", "Total Correct:", overall.total_correct);
    println!("{:<28} {:>10.2}", "Accuracy (%):", overall.accuracy_pct);
    println!();

    println!("Subject-Wise Performance");
    println!("{}", "-".repeat(70));
    println!(
        "{:<12} {:>10} {:>10} {:>8} {:>12} {:>12}",
        "Subject", "Marks", "Attempted", "Correct", "Accuracy", "Time (min)"
    );
    for s in &subjects {
        println!(
            "{:<12} {:>10.2} {:>10} {:>8} {:>11.2}% {:>12.2}",
            s.subject, s.marks_scored, s.attempted, s.correct, s.accuracy_pct, s.time_taken_min
        );
    }
    println!();

    println!("Chapter-Wise Performance (Weak Areas)");
    println!("{}", "-".repeat(70));
    println!(
        "{:<30} {:>8} {:>8} {:>11} {:>10}",
        "Chapter", "Correct", "Total", "Accuracy", "Avg Time"
    );
    for w in &weak_areas {
        println!(
            "{:<30} {:>8} {:>8} {:>10.2}% {:>9.2}s",
            w.chapter, w.correct, w.total, w.accuracy_pct, w.avg_time_sec
        );
    }
    println!();
    println!("Artifacts saved to {}", config.paths.output_dir.display());

    Ok(())
}

/// @ai:intent Rebuild a student's PDF from persisted artifacts
/// @ai:effects fs:read, fs:write
fn render_document(student_id: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let store = ArtifactStore::new(&config.paths.output_dir);

    let narrative = store.load_feedback(&student_id)?;
    let subjects = store.load_subjects(&student_id)?;
    let weak_areas = store.load_weak(&student_id)?;

    let chart_file = store.chart_path(&student_id);
    let chart_path = chart_file.exists().then_some(chart_file);

    let renderer = DocumentRenderer::new(&config.render, &config.paths.logo_file);
    let document = renderer.render(
        &student_id,
        &narrative,
        &subjects,
        &weak_areas,
        chart_path.as_deref(),
        &store.document_path(&student_id),
    )?;

    println!("Report written to {}", document.display());
    Ok(())
}

/// @ai:intent List discovered submissions
/// @ai:effects fs:read
fn list_submissions(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let loader = SubmissionLoader::new();
    let files = loader.discover(&config.paths.data_dir);

    println!("Discovered submissions ({}):", files.len());
    println!();
    println!("{:<15} {}", "Student", "File");
    println!("{}", "-".repeat(60));

    for file in &files {
        println!("{:<15} {}", file.student_id, file.path.display());
    }

    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = ReportConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<ReportConfig> {
    match path {
        Some(p) => ReportConfig::load(&p),
        None => {
            let default_path = PathBuf::from("report.toml");

            if default_path.exists() {
                ReportConfig::load(&default_path)
            } else {
                Ok(ReportConfig::default())
            }
        }
    }
}

/// @ai:intent Print run summary to console
/// @ai:effects io
fn print_summary(summary: &RunSummary) {
    println!();
    println!("Report Pipeline Results");
    println!("=======================");
    println!();
    println!("{:<15} {:>5}", "Processed:", summary.processed.len());
    println!("{:<15} {:>5}", "Failed:", summary.failed.len());

    if !summary.failed.is_empty() {
        println!();
        println!("Failed students:");
        for id in &summary.failed {
            println!("  - {id}");
        }
    }

    println!();
}
