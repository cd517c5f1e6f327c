//! @ai:module:intent Paginated PDF renderer for student performance reports
//! @ai:module:layer infrastructure
//! @ai:module:public_api DocumentRenderer
//! @ai:module:stateless true

use crate::analysis::types::{ChapterAggregate, SubjectMetric};
use crate::config::RenderConfig;
use crate::document::markup::{classify_narrative, Line};
use crate::error::{Error, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_MM: f64 = 15.0;
const BOTTOM_MARGIN_MM: f64 = 15.0;
const CONTENT_WIDTH_MM: f64 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const LOGO_WIDTH_MM: f64 = 30.0;
const CHART_WIDTH_MM: f64 = 100.0;

// Helvetica metrics approximation for wrapping and centering.
const PT_TO_MM: f64 = 0.352_778;
const AVG_GLYPH_EM: f64 = 0.5;

pub const SUBJECT_COLUMNS: [&str; 6] = [
    "Subject",
    "Marks Scored",
    "Attempted",
    "Correct",
    "Accuracy (%)",
    "Time Taken (min)",
];
pub const SUBJECT_COLUMN_WIDTHS: [f64; 6] = [40.0, 30.0, 30.0, 30.0, 30.0, 40.0];

pub const WEAK_COLUMNS: [&str; 6] = [
    "Chapter",
    "Correct",
    "Total",
    "Total Time (sec)",
    "Accuracy (%)",
    "Avg Time per Question (s)",
];
pub const WEAK_COLUMN_WIDTHS: [f64; 6] = [50.0, 30.0, 30.0, 30.0, 30.0, 40.0];

/// @ai:intent Font selector resolved against the writer's embedded fonts
#[derive(Debug, Clone, Copy)]
enum FontKind {
    Regular,
    Bold,
    Italic,
}

/// @ai:intent Estimated rendered width of a text run, in millimeters
/// @ai:effects pure
fn estimate_width_mm(text: &str, font_size_pt: f64) -> f64 {
    text.chars().count() as f64 * font_size_pt * AVG_GLYPH_EM * PT_TO_MM
}

/// @ai:intent Greedy word wrap to a maximum character count per line
///
/// Words longer than a full line are hard-split. An empty input still yields
/// one (empty) line so the caller consumes the line height.
/// @ai:effects pure
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if word_len <= max_chars {
            if current_len == 0 {
                current.push_str(word);
            } else if current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
            continue;
        }

        // Word longer than a full line: flush and hard-split.
        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(max_chars) {
            if chunk.len() == max_chars {
                lines.push(chunk.iter().collect());
            } else {
                current = chunk.iter().collect();
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// @ai:intent Page-building state: cursor, page number, footer repetition
///
/// The cursor runs downward from the top edge; PDF coordinates run upward
/// from the bottom, so every draw converts.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    cursor: f64,
    page_no: u32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    footer_brand: String,
}

impl PageWriter {
    /// @ai:intent Start a new A4 document with the builtin Helvetica family
    /// @ai:effects pure
    fn new(title: &str, footer_brand: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM as f32),
            Mm(PAGE_HEIGHT_MM as f32),
            "Layer 1",
        );

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| Error::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| Error::Pdf(e.to_string()))?;
        let italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| Error::Pdf(e.to_string()))?;

        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            cursor: MARGIN_MM,
            page_no: 1,
            regular,
            bold,
            italic,
            footer_brand: footer_brand.to_string(),
        })
    }

    fn font(&self, kind: FontKind) -> &IndirectFontRef {
        match kind {
            FontKind::Regular => &self.regular,
            FontKind::Bold => &self.bold,
            FontKind::Italic => &self.italic,
        }
    }

    /// @ai:intent Move the cursor down without drawing
    fn advance(&mut self, mm: f64) {
        self.cursor += mm;
    }

    /// @ai:intent Break the page if the next block would cross the bottom margin
    fn ensure_space(&mut self, needed_mm: f64) {
        if self.cursor + needed_mm > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
            self.break_page();
        }
    }

    /// @ai:intent Finish the current page with its footer and open a fresh one
    fn break_page(&mut self) {
        self.draw_footer();

        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_no += 1;
        self.cursor = MARGIN_MM;
    }

    /// @ai:intent Draw the page-numbered footer, centered
    fn draw_footer(&self) {
        let text = format!("Page {} - {}", self.page_no, self.footer_brand);
        let x = (PAGE_WIDTH_MM - estimate_width_mm(&text, 8.0)) / 2.0;
        self.text(&text, FontKind::Regular, 8.0, x.max(MARGIN_MM), PAGE_HEIGHT_MM - 10.0);
    }

    /// @ai:intent Draw a text run at a baseline measured from the top edge
    fn text(&self, text: &str, kind: FontKind, font_size_pt: f64, x: f64, baseline_from_top: f64) {
        self.layer.use_text(
            text,
            font_size_pt as f32,
            Mm(x as f32),
            Mm((PAGE_HEIGHT_MM - baseline_from_top) as f32),
            self.font(kind),
        );
    }

    /// @ai:intent Write one line within a fixed line height
    fn write_line(&mut self, text: &str, kind: FontKind, font_size_pt: f64, x: f64, height: f64) {
        self.ensure_space(height);
        self.text(text, kind, font_size_pt, x, self.cursor + height * 0.75);
        self.cursor += height;
    }

    /// @ai:intent Wrap-print text at the content width available right of `x`
    fn write_wrapped(&mut self, text: &str, kind: FontKind, font_size_pt: f64, x: f64, height: f64) {
        let available = PAGE_WIDTH_MM - MARGIN_MM - x;
        let max_chars = (available / (font_size_pt * AVG_GLYPH_EM * PT_TO_MM)) as usize;

        for piece in wrap_text(text, max_chars) {
            self.write_line(&piece, kind, font_size_pt, x, height);
        }
    }

    /// @ai:intent Draw a rectangle at top-edge coordinates
    fn rect(&self, x: f64, y_from_top: f64, width: f64, height: f64, mode: PaintMode) {
        let top = PAGE_HEIGHT_MM - y_from_top;
        let bottom = PAGE_HEIGHT_MM - y_from_top - height;

        let ring = vec![
            (Point::new(Mm(x as f32), Mm(top as f32)), false),
            (Point::new(Mm((x + width) as f32), Mm(top as f32)), false),
            (Point::new(Mm((x + width) as f32), Mm(bottom as f32)), false),
            (Point::new(Mm(x as f32), Mm(bottom as f32)), false),
        ];

        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode,
            winding_order: WindingOrder::NonZero,
        });
    }

    /// @ai:intent Draw a titled, bordered table with the given column widths
    /// @ai:effects state:write
    fn draw_table(
        &mut self,
        title: &str,
        columns: &[&str],
        widths: &[f64],
        rows: &[Vec<String>],
    ) -> Result<()> {
        if columns.len() != widths.len() {
            return Err(Error::LayoutMismatch {
                table: title.to_string(),
                columns: columns.len(),
                widths: widths.len(),
            });
        }
        for row in rows {
            if row.len() != widths.len() {
                return Err(Error::LayoutMismatch {
                    table: title.to_string(),
                    columns: row.len(),
                    widths: widths.len(),
                });
            }
        }

        self.layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer.set_outline_thickness(0.3);

        // Title band on a light blue fill
        self.ensure_space(10.0);
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.784, 0.863, 1.0, None)));
        self.rect(MARGIN_MM, self.cursor, CONTENT_WIDTH_MM, 10.0, PaintMode::FillStroke);
        self.layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.text(title, FontKind::Bold, 12.0, MARGIN_MM + 2.0, self.cursor + 7.0);
        self.cursor += 10.0;

        self.draw_row(columns.iter().map(|c| c.to_string()), widths);
        for row in rows {
            self.draw_row(row.iter().cloned(), widths);
        }

        self.advance(5.0);
        Ok(())
    }

    /// @ai:intent Draw one bordered table row of cells
    fn draw_row<I: Iterator<Item = String>>(&mut self, cells: I, widths: &[f64]) {
        self.ensure_space(8.0);

        let mut x = MARGIN_MM;
        for (cell, width) in cells.zip(widths.iter()) {
            self.rect(x, self.cursor, *width, 8.0, PaintMode::Stroke);
            self.text(&cell, FontKind::Regular, 10.0, x + 2.0, self.cursor + 6.0);
            x += width;
        }

        self.cursor += 8.0;
    }

    /// @ai:intent Place a decoded image scaled to a target width
    /// @ai:effects state:write
    fn place_image(&self, image: Image, x: f64, y_from_top: f64, target_width_mm: f64) {
        let px_width = image.image.width.0 as f64;
        let px_height = image.image.height.0 as f64;
        let natural_width_mm = px_width * 25.4 / 300.0;
        let natural_height_mm = px_height * 25.4 / 300.0;
        let scale = target_width_mm / natural_width_mm;
        let drawn_height_mm = natural_height_mm * scale;

        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x as f32)),
                translate_y: Some(Mm((PAGE_HEIGHT_MM - y_from_top - drawn_height_mm) as f32)),
                scale_x: Some(scale as f32),
                scale_y: Some(scale as f32),
                dpi: Some(300.0),
                ..Default::default()
            },
        );
    }

    /// @ai:intent Footer the last page and write the document to disk
    /// @ai:effects fs:write
    fn finish(self, output_path: &Path) -> Result<()> {
        self.draw_footer();

        let file = File::create(output_path)?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| Error::Pdf(e.to_string()))?;
        Ok(())
    }
}

/// @ai:intent Assembles the final paginated report document
pub struct DocumentRenderer {
    footer_brand: String,
    logo_placeholder: String,
    logo_file: PathBuf,
}

impl DocumentRenderer {
    /// @ai:intent Create a renderer from branding config and the logo location
    /// @ai:effects pure
    pub fn new(render: &RenderConfig, logo_file: &Path) -> Self {
        Self {
            footer_brand: render.footer_brand.clone(),
            logo_placeholder: render.logo_placeholder.clone(),
            logo_file: logo_file.to_path_buf(),
        }
    }

    /// @ai:intent Render the full report document for one student
    ///
    /// Logo and chart failures degrade to text placeholders and are logged; a
    /// missing image must never prevent a student from receiving a report.
    /// The file is written only after the whole document is assembled.
    /// @ai:effects fs:read, fs:write
    pub fn render(
        &self,
        student_id: &str,
        narrative: &str,
        subjects: &[SubjectMetric],
        weak_areas: &[ChapterAggregate],
        chart_path: Option<&Path>,
        output_path: &Path,
    ) -> Result<PathBuf> {
        let title = format!("Student {student_id} Performance Report");
        let mut writer = PageWriter::new(&title, &self.footer_brand)?;

        self.draw_logo(&mut writer);
        writer.advance(25.0);

        // Centered report heading
        let heading = format!("Performance Report - Student {student_id}");
        let x = ((PAGE_WIDTH_MM - estimate_width_mm(&heading, 16.0)) / 2.0).max(MARGIN_MM);
        writer.write_line(&heading, FontKind::Bold, 16.0, x, 10.0);
        writer.advance(10.0);

        writer.draw_table(
            "Subject-Wise Performance",
            &SUBJECT_COLUMNS,
            &SUBJECT_COLUMN_WIDTHS,
            &subject_rows(subjects),
        )?;

        writer.draw_table(
            "Chapter-Wise Performance (Weak Areas)",
            &WEAK_COLUMNS,
            &WEAK_COLUMN_WIDTHS,
            &weak_rows(weak_areas),
        )?;

        self.draw_chart(&mut writer, chart_path);
        self.draw_narrative(&mut writer, narrative);

        writer.finish(output_path)?;
        Ok(output_path.to_path_buf())
    }

    /// @ai:intent Logo top-right, or its text placeholder
    fn draw_logo(&self, writer: &mut PageWriter) {
        match load_image(&self.logo_file) {
            Ok(image) => {
                writer.place_image(image, PAGE_WIDTH_MM - LOGO_WIDTH_MM - MARGIN_MM, 10.0, LOGO_WIDTH_MM);
            }
            Err(e) => {
                tracing::warn!("logo unavailable, using placeholder: {}", e);
                let x = PAGE_WIDTH_MM
                    - MARGIN_MM
                    - estimate_width_mm(&self.logo_placeholder, 10.0);
                writer.write_line(&self.logo_placeholder, FontKind::Italic, 10.0, x.max(MARGIN_MM), 10.0);
            }
        }
    }

    /// @ai:intent Labeled chart block, or its text placeholder
    fn draw_chart(&self, writer: &mut PageWriter, chart_path: Option<&Path>) {
        writer.write_line(
            "Time vs. Accuracy by Subject",
            FontKind::Bold,
            12.0,
            MARGIN_MM,
            10.0,
        );

        let loaded = chart_path
            .ok_or_else(|| Error::ImageUnavailable("no chart was produced".to_string()))
            .and_then(load_image);

        match loaded {
            Ok(image) => {
                writer.ensure_space(115.0);
                writer.place_image(image, MARGIN_MM, writer.cursor + 5.0, CHART_WIDTH_MM);
                writer.advance(110.0);
            }
            Err(e) => {
                tracing::warn!("chart unavailable, using placeholder: {}", e);
                writer.write_line("Chart not available", FontKind::Italic, 10.0, MARGIN_MM, 10.0);
            }
        }
    }

    /// @ai:intent Render the classified narrative body
    fn draw_narrative(&self, writer: &mut PageWriter, narrative: &str) {
        for line in classify_narrative(narrative) {
            match line {
                Line::Blank => writer.advance(6.0),
                Line::Heading(text) => {
                    writer.write_wrapped(&text, FontKind::Bold, 13.0, MARGIN_MM, 8.0);
                    writer.advance(3.0);
                }
                Line::Bullet(text) => {
                    writer.write_wrapped(&text, FontKind::Regular, 11.0, MARGIN_MM + 10.0, 6.0);
                    writer.advance(1.0);
                }
                Line::Numbered(text) => {
                    writer.write_wrapped(&text, FontKind::Regular, 11.0, MARGIN_MM + 10.0, 6.0);
                    writer.advance(1.0);
                }
                Line::Paragraph(text) => {
                    writer.write_wrapped(&text, FontKind::Regular, 11.0, MARGIN_MM, 6.0);
                    writer.advance(3.0);
                }
            }
        }
    }
}

/// @ai:intent Stringify subject metrics in table column order
/// @ai:effects pure
fn subject_rows(subjects: &[SubjectMetric]) -> Vec<Vec<String>> {
    subjects
        .iter()
        .map(|s| {
            vec![
                s.subject.clone(),
                format!("{:.2}", s.marks_scored),
                s.attempted.to_string(),
                s.correct.to_string(),
                format!("{:.2}", s.accuracy_pct),
                format!("{:.2}", s.time_taken_min),
            ]
        })
        .collect()
}

/// @ai:intent Stringify the ranked weak areas in table column order
/// @ai:effects pure
fn weak_rows(weak_areas: &[ChapterAggregate]) -> Vec<Vec<String>> {
    weak_areas
        .iter()
        .map(|w| {
            vec![
                w.chapter.clone(),
                w.correct.to_string(),
                w.total.to_string(),
                format!("{:.2}", w.total_time_sec),
                format!("{:.2}", w.accuracy_pct),
                format!("{:.2}", w.avg_time_sec),
            ]
        })
        .collect()
}

/// @ai:intent Decode a PNG or JPEG image for embedding
/// @ai:effects fs:read
fn load_image(path: &Path) -> Result<Image> {
    use printpdf::image_crate::codecs::{jpeg::JpegDecoder, png::PngDecoder};

    let file = File::open(path)
        .map_err(|e| Error::ImageUnavailable(format!("{}: {e}", path.display())))?;
    let reader = std::io::BufReader::new(file);

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "png" => {
            let decoder = PngDecoder::new(reader)
                .map_err(|e| Error::ImageUnavailable(format!("{}: {e}", path.display())))?;
            Image::try_from(decoder)
                .map_err(|e| Error::ImageUnavailable(format!("{}: {e}", path.display())))
        }
        "jpg" | "jpeg" => {
            let decoder = JpegDecoder::new(reader)
                .map_err(|e| Error::ImageUnavailable(format!("{}: {e}", path.display())))?;
            Image::try_from(decoder)
                .map_err(|e| Error::ImageUnavailable(format!("{}: {e}", path.display())))
        }
        other => Err(Error::ImageUnavailable(format!(
            "unsupported image type `{other}`: {}",
            path.display()
        ))),
    }
}
