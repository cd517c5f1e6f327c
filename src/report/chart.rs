//! @ai:module:intent Time-vs-accuracy chart generation for a student's subjects
//! @ai:module:layer infrastructure
//! @ai:module:public_api ScatterChartRenderer
//! @ai:module:stateless true

use crate::analysis::types::SubjectMetric;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Trait for chart rendering: subject table in, image artifact out
pub trait ChartRendererTrait: Send + Sync {
    /// @ai:intent Render the chart for one student
    fn render(&self, subjects: &[SubjectMetric], student_id: &str, output_path: &Path)
        -> Result<()>;
}

/// @ai:intent Renders a time-vs-accuracy scatter plot, one point per subject
pub struct ScatterChartRenderer;

impl ScatterChartRenderer {
    /// @ai:intent Create a new chart renderer
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScatterChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRendererTrait for ScatterChartRenderer {
    /// @ai:intent Render time-taken vs accuracy per subject
    /// @ai:effects fs:write
    fn render(
        &self,
        subjects: &[SubjectMetric],
        student_id: &str,
        output_path: &Path,
    ) -> Result<()> {
        let root = BitMapBackend::new(output_path, (1000, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let max_time = subjects
            .iter()
            .map(|s| s.time_taken_min)
            .fold(0.0_f64, f64::max)
            .max(1.0)
            * 1.1;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Time vs Accuracy for Student {student_id}"),
                ("sans-serif", 30),
            )
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..max_time, 0f64..100f64)?;

        chart
            .configure_mesh()
            .x_desc("Time Taken (min)")
            .y_desc("Accuracy (%)")
            .draw()?;

        for (i, subject) in subjects.iter().enumerate() {
            let color = Palette99::pick(i).mix(0.9);

            chart
                .draw_series(std::iter::once(Circle::new(
                    (subject.time_taken_min, subject.accuracy_pct),
                    6,
                    color.filled(),
                )))?
                .label(subject.subject.clone())
                .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn subject(name: &str, time: f64, accuracy: f64) -> SubjectMetric {
        SubjectMetric {
            subject: name.to_string(),
            marks_scored: 10.0,
            attempted: 10,
            correct: 7,
            accuracy_pct: accuracy,
            time_taken_min: time,
        }
    }

    #[test]
    fn test_render_chart_writes_png() {
        let renderer = ScatterChartRenderer::new();
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("chart_220.png");

        let subjects = vec![
            subject("Physics", 24.0, 70.0),
            subject("Chemistry", 18.5, 85.0),
            subject("Maths", 29.0, 55.0),
        ];

        renderer.render(&subjects, "220", &out).unwrap();
        assert!(out.exists());
        assert!(std::fs::metadata(&out).unwrap().len() > 0);
    }

    #[test]
    fn test_render_chart_with_zero_time_subjects() {
        let renderer = ScatterChartRenderer::new();
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("chart_empty.png");

        // Degenerate axis range must not panic; range falls back to 0..1.1
        renderer.render(&[subject("Physics", 0.0, 0.0)], "221", &out).unwrap();
        assert!(out.exists());
    }
}
