use std::fs;
use std::path::Path;

use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::style::Style as PdfStyle;
use genpdf::{Alignment as PdfAlignment, Element as _};
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::Table;

use kredi_core::amortization::Schedule;
use kredi_core::report::{self, NumberStyle, ReportTable};

const DOCUMENT_TITLE: &str = "Ticari Kredi Ödeme Planı";

pub const DEFAULT_FONT_DIR: &str = "/usr/share/fonts/truetype/liberation";
pub const DEFAULT_FONT_FAMILY: &str = "LiberationSans";

/// A4 landscape, in millimetres.
const PAGE_WIDTH_MM: f64 = 297.0;
const PAGE_HEIGHT_MM: f64 = 210.0;

/// TrueType family for PDF output. `dir` must hold
/// `<family>-Regular.ttf`, `-Bold`, `-Italic` and `-BoldItalic`.
#[derive(Debug, Clone)]
pub struct FontSource {
    pub dir: String,
    pub family: String,
}

/// Summary block, then the full plan. `.txt` paths get boxed text
/// tables, anything else a PDF.
pub fn write_schedule(
    path: &str,
    schedule: &Schedule,
    fonts: &FontSource,
) -> Result<(), Box<dyn std::error::Error>> {
    if is_text(path) {
        fs::write(path, render_schedule(schedule))?;
        return Ok(());
    }
    write_pdf(path, schedule, fonts)
}

fn is_text(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

fn write_pdf(path: &str, schedule: &Schedule, fonts: &FontSource) -> Result<(), Box<dyn std::error::Error>> {
    let family = genpdf::fonts::from_files(&fonts.dir, &fonts.family, None)
        .map_err(|e| format!("font '{}' not loadable from '{}': {}", fonts.family, fonts.dir, e))?;

    let report = report::schedule_report(schedule, NumberStyle::Document);

    let mut doc = genpdf::Document::new(family);
    doc.set_title(DOCUMENT_TITLE);
    doc.set_paper_size(genpdf::Size::new(PAGE_WIDTH_MM, PAGE_HEIGHT_MM));
    doc.set_font_size(8);
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    doc.push(Paragraph::new(DOCUMENT_TITLE).styled(PdfStyle::new().bold().with_font_size(14)));
    doc.push(Paragraph::new(schedule.scheme.label()).styled(PdfStyle::new().with_font_size(11)));
    doc.push(Break::new(1));
    doc.push(pdf_table(&report.summary, &[3, 2], 1)?);
    doc.push(Break::new(1));
    doc.push(Paragraph::new(report.schedule.title.as_str()).styled(PdfStyle::new().bold().with_font_size(11)));
    doc.push(pdf_table(&report.schedule, &[1, 2, 2, 2, 2, 2, 2, 2], 2)?);

    doc.render_to_file(path)?;
    Ok(())
}

/// Columns from `numeric_from` onwards are right-aligned.
fn pdf_table(
    table: &ReportTable,
    weights: &[usize],
    numeric_from: usize,
) -> Result<TableLayout, genpdf::error::Error> {
    let mut layout = TableLayout::new(weights.to_vec());
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let mut header = layout.row();
    for title in &table.headers {
        header.push_element(Paragraph::new(title.as_str()).styled(PdfStyle::new().bold()));
    }
    header.push()?;

    for cells in &table.rows {
        let mut row = layout.row();
        for (col, cell) in cells.iter().enumerate() {
            let align = if col >= numeric_from {
                PdfAlignment::Right
            } else {
                PdfAlignment::Left
            };
            row.push_element(Paragraph::new(cell.as_str()).aligned(align));
        }
        row.push()?;
    }

    Ok(layout)
}

fn render_schedule(schedule: &Schedule) -> String {
    let report = report::schedule_report(schedule, NumberStyle::Document);

    let mut out = String::new();
    out.push_str(DOCUMENT_TITLE);
    out.push('\n');
    out.push_str(schedule.scheme.label());
    out.push_str("\n\n");
    out.push_str(&render_table(&report.summary, 1));
    out.push_str("\n\n");
    out.push_str(&report.schedule.title);
    out.push('\n');
    out.push_str(&render_table(&report.schedule, 2));
    out.push('\n');
    out
}

/// Columns from `numeric_from` onwards are right-aligned.
fn render_table(table: &ReportTable, numeric_from: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.headers.iter().cloned());
    for row in &table.rows {
        builder.push_record(row.iter().cloned());
    }

    let mut rendered: Table = builder.build();
    rendered
        .with(Style::modern())
        .modify(Columns::new(numeric_from..), Alignment::right());
    rendered.to_string()
}
