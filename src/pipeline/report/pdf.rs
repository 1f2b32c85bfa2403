//! Paginated PDF rendering of a compiled report.
//!
//! Layout happens in two steps: the report is flattened into styled lines
//! (`report_lines`), the lines are split into pages (`paginate`), and only
//! then drawn with `printpdf`. Sections follow the report's fixed order with
//! the FDA label last.

use std::io::BufWriter;

use chrono::NaiveDate;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde_json::Value;

use super::PersistenceError;
use crate::models::{scalar_text, ReportDocument};

// ─── Page geometry (A4, millimetres) ─────────────────────────────────────────

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT_MARGIN: f32 = 20.0;
const TOP_Y: f32 = 280.0;
const BOTTOM_MARGIN: f32 = 22.0;
const FOOTER_Y: f32 = 12.0;
const VALUE_OFFSET: f32 = 52.0;

const BODY_WRAP: usize = 95;
const VALUE_WRAP: usize = 62;

/// Label sections that are identifiers or duplicates of other sections.
const SKIPPED_LABEL_SECTIONS: [&str; 5] = [
    "openfda",
    "spl_product_data_elements",
    "spl_id",
    "id",
    "set_id",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Title,
    Heading,
    Subheading,
    Body,
    /// Bold field name followed by its value on the same baseline.
    Field,
    Spacer,
}

impl Style {
    fn size(self) -> f32 {
        match self {
            Style::Title => 18.0,
            Style::Heading => 13.0,
            Style::Subheading => 11.0,
            Style::Body | Style::Field => 9.5,
            Style::Spacer => 0.0,
        }
    }

    /// Vertical space consumed, in mm.
    fn advance(self) -> f32 {
        match self {
            Style::Title => 11.0,
            Style::Heading => 8.0,
            Style::Subheading => 6.0,
            Style::Body | Style::Field => 4.6,
            Style::Spacer => 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    style: Style,
    indent: f32,
    label: Option<String>,
    text: String,
}

impl Line {
    fn new(style: Style, text: impl Into<String>) -> Self {
        Self {
            style,
            indent: 0.0,
            label: None,
            text: text.into(),
        }
    }

    fn spacer() -> Self {
        Self::new(Style::Spacer, "")
    }

    fn indented(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }
}

/// Display form of a `YYYYMMDD` date (`March 05, 2024`). Anything else is
/// returned unchanged.
pub fn format_date(raw: &str) -> String {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y%m%d") {
        Ok(date) => date.format("%B %d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Word-wrap helper for PDF text rendering. Paragraph breaks are kept, and
/// words longer than a line (URLs, long identifiers) are hard-broken.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word_len = word.chars().count();
            let mut rest = word;
            if word_len > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                while word_len > max_chars {
                    let split = rest
                        .char_indices()
                        .nth(max_chars)
                        .map_or(rest.len(), |(i, _)| i);
                    lines.push(rest[..split].to_string());
                    rest = &rest[split..];
                    word_len -= max_chars;
                }
                current_len = 0;
            }
            if current_len + word_len + 1 > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(rest);
            current_len += word_len;
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// `snake_case` key as a title: `indications_and_usage` → `Indications And Usage`.
fn heading_from_key(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

// ─── Layout ──────────────────────────────────────────────────────────────────

struct Layout {
    lines: Vec<Line>,
}

impl Layout {
    fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    fn heading(&mut self, text: &str) {
        self.push(Line::new(Style::Heading, text));
    }

    fn subheading(&mut self, text: &str) {
        self.push(Line::new(Style::Subheading, text));
    }

    fn paragraph(&mut self, text: &str, indent: f32) {
        for line in wrap_text(text, BODY_WRAP - (indent / 2.0) as usize) {
            self.push(Line::new(Style::Body, line).indented(indent));
        }
    }

    fn field(&mut self, label: &str, value: &str) {
        let mut wrapped = wrap_text(value, VALUE_WRAP).into_iter();
        let first = wrapped.next().unwrap_or_default();
        self.push(Line {
            style: Style::Field,
            indent: 0.0,
            label: Some(format!("{label}:")),
            text: first,
        });
        for rest in wrapped {
            self.push(Line::new(Style::Body, rest).indented(VALUE_OFFSET));
        }
    }

    fn spacer(&mut self) {
        self.push(Line::spacer());
    }
}

fn report_lines(report: &ReportDocument) -> Vec<Line> {
    let mut out = Layout { lines: Vec::new() };
    let drug = &report.drug_information;

    out.push(Line::new(Style::Title, format!("Drug Deck: {}", drug.brand_name)));
    out.field("NDC Code", &report.meta.ndc_code);
    out.field("Report ID", &report.meta.report_id);
    out.field("Report Generated", &report.meta.generated_date);
    out.field("Report Type", &report.meta.report_type);
    out.spacer();

    out.heading("Drug Information");
    out.field("Brand Name", &drug.brand_name);
    out.field("Generic Name", &drug.generic_name);
    out.field("Dosage Form", &drug.dosage_form);
    out.field("Route", &drug.route.join(", "));
    out.field("Marketing Start Date", &format_date(&drug.marketing_start_date));
    out.field("Marketing Category", &drug.marketing_category);
    out.field("Application Number", &drug.application_number);
    if !drug.active_ingredients.is_empty() {
        out.spacer();
        out.subheading("Active Ingredients");
        for ingredient in &drug.active_ingredients {
            out.paragraph(&format!("- {}: {}", ingredient.name, ingredient.strength), 5.0);
        }
    }
    out.spacer();

    let manufacturer = &report.manufacturer_information;
    out.heading("Manufacturer Information");
    out.field("Labeler Name", &manufacturer.labeler_name);
    out.field("Manufacturer Name", &manufacturer.manufacturer_name);
    out.field("Original Packager", yes_no(manufacturer.is_original_packager));
    out.spacer();

    out.heading("Clinical Information");
    for (heading, text) in report.clinical_information.entries() {
        out.subheading(heading);
        out.paragraph(text, 0.0);
        out.spacer();
    }

    let market = &report.market_information;
    out.heading("Market Information");
    out.field("Product Type", &market.product_type);
    out.field("Marketing Status", &market.marketing_status);
    out.field("Listing Expiration Date", &format_date(&market.listing_expiration_date));
    if !market.packaging.is_empty() {
        out.spacer();
        out.subheading("Packaging Information");
        for package in &market.packaging {
            out.paragraph(&format!("- Package NDC: {}", package.package_ndc), 5.0);
            out.paragraph(&format!("Description: {}", package.description), 9.0);
            out.paragraph(
                &format!("Marketing Start Date: {}", format_date(&package.marketing_start_date)),
                9.0,
            );
            out.paragraph(&format!("Sample: {}", yes_no(package.sample)), 9.0);
        }
    }
    out.spacer();

    out.heading("AI-Generated Insights");
    if report.ai_insights.is_empty() {
        out.paragraph("No insights were generated for this drug.", 0.0);
    }
    for (kind, text) in report.ai_insights.iter() {
        out.subheading(kind.title());
        out.paragraph(text, 0.0);
        out.spacer();
    }

    if let Some(label) = &report.label_information {
        out.spacer();
        out.heading("FDA Label Information");
        for name in label.section_names() {
            if SKIPPED_LABEL_SECTIONS.contains(&name) {
                continue;
            }
            let Some(value) = label.non_blank_section(name) else {
                continue;
            };
            out.subheading(&heading_from_key(name));
            match value {
                Value::Array(items) => {
                    for item in items {
                        out.paragraph(&scalar_text(item), 0.0);
                    }
                }
                other => out.paragraph(&scalar_text(other), 0.0),
            }
            out.spacer();
        }
    }

    out.lines
}

/// Split lines into pages. A heading is never left alone at the bottom of a
/// page, and no page starts with a spacer.
fn paginate(lines: Vec<Line>) -> Vec<Vec<Line>> {
    let usable = TOP_Y - BOTTOM_MARGIN;
    let mut pages: Vec<Vec<Line>> = vec![Vec::new()];
    let mut used = 0.0_f32;

    for line in lines {
        let keep_with_next = matches!(line.style, Style::Heading | Style::Subheading);
        let needed = line.style.advance()
            + if keep_with_next {
                Style::Body.advance()
            } else {
                0.0
            };

        let current_is_empty = pages.last().map_or(true, Vec::is_empty);
        if used + needed > usable && !current_is_empty {
            pages.push(Vec::new());
            used = 0.0;
        }
        if line.style == Style::Spacer && pages.last().map_or(true, Vec::is_empty) {
            continue;
        }
        used += line.style.advance();
        if let Some(page) = pages.last_mut() {
            page.push(line);
        }
    }
    pages
}

// ─── Drawing ─────────────────────────────────────────────────────────────────

fn render_error(context: &str, e: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Render(format!("{context}: {e}"))
}

/// Render the report as PDF bytes.
pub fn render_pdf(report: &ReportDocument) -> Result<Vec<u8>, PersistenceError> {
    let title = format!("Drug Deck: {}", report.drug_information.brand_name);
    let pages = paginate(report_lines(report));
    let page_count = pages.len();

    let (doc, first_page, first_layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| render_error("PDF font error", e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| render_error("PDF font error", e))?;

    for (index, lines) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        let mut y = TOP_Y;
        for line in lines {
            let x = LEFT_MARGIN + line.indent;
            let size = line.style.size();
            match line.style {
                Style::Spacer => {}
                Style::Title | Style::Heading | Style::Subheading => {
                    layer.use_text(&line.text, size, Mm(x), Mm(y), &bold);
                }
                Style::Body => {
                    layer.use_text(&line.text, size, Mm(x), Mm(y), &font);
                }
                Style::Field => {
                    if let Some(label) = &line.label {
                        layer.use_text(label, size, Mm(x), Mm(y), &bold);
                    }
                    layer.use_text(&line.text, size, Mm(x + VALUE_OFFSET), Mm(y), &font);
                }
            }
            y -= line.style.advance();
        }

        let footer = format!(
            "Generated on: {} | DrugDeck Report | Page {} of {}",
            report.meta.generated_date,
            index + 1,
            page_count
        );
        layer.use_text(&footer, 8.0, Mm(LEFT_MARGIN), Mm(FOOTER_Y), &font);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| render_error("PDF save error", e))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| render_error("PDF buffer error", e))?;

    tracing::debug!(pages = page_count, bytes = bytes.len(), "PDF rendered");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DrugRecord, InsightKind, InsightSet, LabelRecord, NdcEntry, NdcIngredient,
    };
    use crate::ndc::normalize;
    use crate::pipeline::report::compile;
    use serde_json::json;

    fn report(label: Option<LabelRecord>) -> ReportDocument {
        let record = DrugRecord::from_entry(NdcEntry {
            brand_name: Some("Acme".into()),
            marketing_start_date: Some("20240305".into()),
            active_ingredients: Some(vec![NdcIngredient {
                name: Some("ASPIRIN".into()),
                strength: Some("81 mg/1".into()),
            }]),
            ..NdcEntry::default()
        });
        let mut insights = InsightSet::new();
        insights.insert(InsightKind::DrugSummary, "A summary.");
        compile(&record, label.as_ref(), &insights, &normalize("12345678901"))
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn format_date_handles_yyyymmdd() {
        assert_eq!(format_date("20240305"), "March 05, 2024");
        assert_eq!(format_date("Unknown"), "Unknown");
        assert_eq!(format_date("20241399"), "20241399");
        assert_eq!(format_date("2024-03-05"), "2024-03-05");
    }

    #[test]
    fn wrap_text_splits_long_lines() {
        let lines = wrap_text("one two three four five", 10);
        assert_eq!(lines, vec!["one two", "three four", "five"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
    }

    #[test]
    fn wrap_text_breaks_oversized_words() {
        let url = "https://www.accessdata.fda.gov/scripts/cder/daf/index.cfm";
        let lines = wrap_text(&format!("See {url} now"), 20);
        assert_eq!(lines.concat().replace(' ', ""), format!("See{url}now"));
        assert!(lines.iter().all(|l| l.chars().count() <= 20), "{lines:?}");
        assert_eq!(lines[0], "See");

        // Multi-byte characters are split on character boundaries
        let lines = wrap_text("ééééé", 2);
        assert_eq!(lines, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn heading_from_key_title_cases() {
        assert_eq!(heading_from_key("indications_and_usage"), "Indications And Usage");
        assert_eq!(heading_from_key("BOXED_warning"), "Boxed Warning");
    }

    #[test]
    fn sections_follow_report_order() {
        let label = LabelRecord::from_value(json!({"boxed_warning": ["Boxed."]})).unwrap();
        let lines = report_lines(&report(Some(label)));
        let headings: Vec<&str> = lines
            .iter()
            .filter(|l| l.style == Style::Heading)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(
            headings,
            vec![
                "Drug Information",
                "Manufacturer Information",
                "Clinical Information",
                "Market Information",
                "AI-Generated Insights",
                "FDA Label Information",
            ]
        );
    }

    #[test]
    fn label_section_omitted_without_label() {
        let lines = report_lines(&report(None));
        assert!(!texts(&lines).contains(&"FDA Label Information"));
    }

    #[test]
    fn label_identifiers_are_skipped() {
        let label = LabelRecord::from_value(json!({
            "set_id": "abc",
            "openfda": {"brand_name": ["Acme"]},
            "warnings": ["Careful."],
            "precautions": []
        }))
        .unwrap();
        let lines = report_lines(&report(Some(label)));
        let all = texts(&lines);
        assert!(all.contains(&"Warnings"));
        assert!(all.contains(&"Careful."));
        assert!(!all.contains(&"Set Id"));
        assert!(!all.contains(&"Openfda"));
        assert!(!all.contains(&"Precautions"));
    }

    #[test]
    fn label_sections_render_in_label_order() {
        let label: LabelRecord = serde_json::from_str(
            r#"{"warnings": ["W."], "indications_and_usage": ["I."], "boxed_warning": ["B."]}"#,
        )
        .unwrap();
        let lines = report_lines(&report(Some(label)));
        let start = lines
            .iter()
            .position(|l| l.text == "FDA Label Information")
            .unwrap();
        let subheadings: Vec<&str> = lines[start..]
            .iter()
            .filter(|l| l.style == Style::Subheading)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(subheadings, vec!["Warnings", "Indications And Usage", "Boxed Warning"]);
    }

    #[test]
    fn dates_are_displayed_long_form() {
        let lines = report_lines(&report(None));
        assert!(lines
            .iter()
            .any(|l| l.label.as_deref() == Some("Marketing Start Date:")
                && l.text == "March 05, 2024"));
    }

    #[test]
    fn long_reports_span_pages() {
        let long = "word ".repeat(4000);
        let label = LabelRecord::from_value(json!({ "description": [long] })).unwrap();
        let pages = paginate(report_lines(&report(Some(label))));
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(!page.is_empty());
            assert_ne!(page[0].style, Style::Spacer);
            let height: f32 = page.iter().map(|l| l.style.advance()).sum();
            assert!(height <= TOP_Y - BOTTOM_MARGIN + 0.01);
        }
    }

    #[test]
    fn short_report_fits_one_page_budget() {
        let pages = paginate(vec![Line::new(Style::Body, "only line")]);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn render_produces_pdf_bytes() {
        let bytes = render_pdf(&report(None)).unwrap();
        // PDF magic bytes: %PDF
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn render_handles_multi_page_reports() {
        let long = "word ".repeat(4000);
        let label = LabelRecord::from_value(json!({ "description": [long] })).unwrap();
        let bytes = render_pdf(&report(Some(label))).unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }
}
