use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use rust_xlsxwriter::{Format, Workbook};

use crate::{
    error::{AppError, Result},
    models::{ReportCell, ReportFormat, ReportTable},
};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const LINE_HEIGHT: f32 = 7.0;
const BODY_SIZE: f32 = 10.0;
const HEADER_SIZE: f32 = 11.0;
const TITLE_SIZE: f32 = 16.0;
// Rough DejaVu Sans advance at BODY_SIZE, used to clip cells.
const CHAR_WIDTH_MM: f32 = 2.0;

/// Embedded so receipts and reports print Georgian, Cyrillic and Latin
/// names alike. The builtin PDF fonts only cover WinAnsi.
pub(crate) const FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Top-to-bottom text layout over as many A4 pages as needed.
pub(crate) struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    cursor: f32,
}

impl PdfWriter {
    pub(crate) fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let font = doc.add_external_font(FONT_BYTES).map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            font,
            cursor: PAGE_HEIGHT - MARGIN,
        })
    }

    fn advance(&mut self, height: f32) {
        if self.cursor - height < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.cursor = PAGE_HEIGHT - MARGIN;
        }
        self.cursor -= height;
    }

    fn text_at(&self, text: &str, size: f32, x: f32) {
        self.layer
            .use_text(text, size, Mm(x), Mm(self.cursor), &self.font);
    }

    pub(crate) fn title(&mut self, text: &str) {
        self.advance(LINE_HEIGHT * 1.5);
        self.text_at(text, TITLE_SIZE, MARGIN);
        self.advance(LINE_HEIGHT * 0.5);
    }

    pub(crate) fn line(&mut self, text: &str) {
        self.advance(LINE_HEIGHT);
        self.text_at(text, BODY_SIZE, MARGIN);
    }

    pub(crate) fn field(&mut self, label: &str, value: &str) {
        self.advance(LINE_HEIGHT);
        self.text_at(label, HEADER_SIZE, MARGIN);
        self.text_at(value, BODY_SIZE, MARGIN + 45.0);
    }

    pub(crate) fn row<S: AsRef<str>>(&mut self, cells: &[S], header: bool) {
        if cells.is_empty() {
            return;
        }

        self.advance(LINE_HEIGHT);
        let width = (PAGE_WIDTH - 2.0 * MARGIN) / cells.len() as f32;
        let max_chars = ((width / CHAR_WIDTH_MM) as usize).max(1);
        let size = if header { HEADER_SIZE } else { BODY_SIZE };

        for (idx, cell) in cells.iter().enumerate() {
            let x = MARGIN + width * idx as f32;
            self.text_at(&clip(cell.as_ref(), max_chars), size, x);
        }
    }

    pub(crate) fn finish(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

fn pdf_error(err: printpdf::Error) -> AppError {
    AppError::InternalError(format!("PDF rendering failed: {}", err))
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}~", kept)
}

pub fn table_to_pdf(table: &ReportTable, generated_for: &str) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new(&table.title)?;
    pdf.title(&table.title);
    pdf.line(generated_for);
    pdf.advance(LINE_HEIGHT * 0.5);
    pdf.row(&table.headers, true);

    for row in &table.rows {
        let cells: Vec<&str> = row.iter().map(ReportCell::as_text).collect();
        pdf.row(&cells, false);
    }

    if table.rows.is_empty() {
        pdf.line("No records for the selected filters.");
    }

    pdf.finish()
}

pub fn table_to_xlsx(table: &ReportTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Report").map_err(xlsx_error)?;

    for (col, header) in table.headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, header, &bold)
            .map_err(xlsx_error)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = row_idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                ReportCell::Number { value, .. } => sheet.write_number(row_num, col as u16, *value),
                ReportCell::Text(text) => sheet.write_string(row_num, col as u16, text),
            }
            .map_err(xlsx_error)?;
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

fn xlsx_error(err: rust_xlsxwriter::XlsxError) -> AppError {
    AppError::InternalError(format!("Excel rendering failed: {}", err))
}

/// Rendered file plus the headers needed to send it as a download.
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

pub fn export_table(
    table: &ReportTable,
    format: ReportFormat,
    base_name: &str,
    generated_for: &str,
) -> Result<ExportFile> {
    match format {
        ReportFormat::Pdf => Ok(ExportFile {
            bytes: table_to_pdf(table, generated_for)?,
            content_type: PDF_CONTENT_TYPE,
            file_name: format!("{}.pdf", base_name),
        }),
        ReportFormat::Excel => Ok(ExportFile {
            bytes: table_to_xlsx(table)?,
            content_type: XLSX_CONTENT_TYPE,
            file_name: format!("{}.xlsx", base_name),
        }),
        ReportFormat::Json => Err(AppError::BadRequest(
            "JSON reports are not file exports".to_string(),
        )),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use rust_decimal::Decimal;

    /// Every string drawn with `Tj` across all pages, still glyph encoded.
    pub(crate) fn drawn_strings(pdf: &[u8]) -> Vec<Vec<u8>> {
        let doc = lopdf::Document::load_mem(pdf).unwrap();
        let mut drawn = Vec::new();

        for page_id in doc.get_pages().into_values() {
            let content = doc.get_page_content(page_id).unwrap();
            for op in lopdf::content::Content::decode(&content).unwrap().operations {
                if op.operator == "Tj" {
                    if let Some(lopdf::Object::String(bytes, _)) = op.operands.first() {
                        drawn.push(bytes.clone());
                    }
                }
            }
        }

        drawn
    }

    /// Glyph ids as the writer emits them for the embedded font.
    pub(crate) fn encode(text: &str) -> Vec<u8> {
        let face = ttf_parser::Face::parse(FONT_BYTES, 0).unwrap();
        text.chars()
            .map(|ch| face.glyph_index(ch).expect("glyph in embedded font").0)
            .flat_map(|gid| gid.to_be_bytes())
            .collect()
    }

    pub(crate) fn pdf_shows(pdf: &[u8], text: &str) -> bool {
        let needle = encode(text);
        drawn_strings(pdf)
            .iter()
            .any(|s| s.windows(needle.len()).any(|w| w == needle.as_slice()))
    }

    fn table(rows: usize) -> ReportTable {
        ReportTable {
            title: "Revenue report".to_string(),
            headers: vec!["Period".into(), "Orders".into(), "Revenue".into()],
            rows: (0..rows)
                .map(|i| {
                    vec![
                        ReportCell::text(format!("2024-{:02}", i % 12 + 1)),
                        ReportCell::integer(i as i64),
                        ReportCell::decimal(Decimal::new(1050, 2), 2),
                    ]
                })
                .collect(),
        }
    }

    #[test]
    fn pdf_export_is_a_pdf_document() {
        let bytes = table_to_pdf(&table(3), "Marketplace").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_tables_spill_onto_more_pages() {
        let short = table_to_pdf(&table(2), "Marketplace").unwrap();
        let long = table_to_pdf(&table(200), "Marketplace").unwrap();
        assert!(long.len() > short.len());
    }

    #[test]
    fn xlsx_export_is_a_zip_container() {
        let bytes = table_to_xlsx(&table(3)).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn export_sets_name_and_type() {
        let file = export_table(&table(1), ReportFormat::Excel, "revenue-2024", "x").unwrap();
        assert_eq!(file.file_name, "revenue-2024.xlsx");
        assert_eq!(file.content_type, XLSX_CONTENT_TYPE);

        assert!(export_table(&table(1), ReportFormat::Json, "revenue", "x").is_err());
    }

    #[test]
    fn pdf_rows_keep_non_latin_text() {
        let mut report = table(1);
        report.rows[0][0] = ReportCell::text("ქართული კაბა");

        let bytes = table_to_pdf(&report, "თბილისი - generated 2025-03-09").unwrap();

        assert!(pdf_shows(&bytes, "ქართული"));
        assert!(pdf_shows(&bytes, "თბილისი"));
        assert!(pdf_shows(&bytes, "10.50"));
    }

    #[test]
    fn clipping_marks_truncation() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a long product name", 6), "a lon~");
    }
}
