// src/services/export_service.rs

use std::path::PathBuf;

use chrono::{FixedOffset, Utc};
use genpdf::{elements, style, Element};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::{
    common::error::AppError,
    models::report::{Report, ReportKind},
    services::presentation::{
        format_kg, format_peso, format_table_datetime, strip_for_pdf, NO_DATA_MESSAGE,
    },
};

pub const REPORT_TITLE: &str = "Pili Cracker Production Report";

#[derive(Clone)]
pub struct ExportService {
    fonts_dir: PathBuf,
    utc_offset: FixedOffset,
}

/// Nome do arquivo baixado, ex.: `pili_sales_report.pdf`.
pub fn export_file_name(kind: ReportKind, extension: &str) -> String {
    format!("pili_{}_report.{}", kind.slug(), extension)
}

pub fn period_line(report: &Report) -> String {
    format!(
        "{} report: {} to {}",
        report.kind.title(),
        report.range.start.format("%b %-d, %Y"),
        report.range.end.format("%b %-d, %Y")
    )
}

/// Bloco de resumo (rótulo, valor) com os mesmos textos da tela.
pub fn summary_lines(report: &Report) -> Vec<(&'static str, String)> {
    let s = &report.summary;
    let mut lines = vec![("Batches", s.batch_count.to_string())];
    if report.kind == ReportKind::Batches {
        lines.push(("Total Input Weight", format_kg(s.total_input_weight)));
    }
    lines.push(("Total Shell Weight", format_kg(s.total_shell_weight)));
    lines.push(("Total Nut Weight", format_kg(s.total_nut_weight)));
    lines.push(("Total Weight", format_kg(s.total_weight)));
    if report.kind == ReportKind::Batches {
        lines.push(("Total Weight Lost", format_kg(s.total_weight_lost)));
    }
    lines.push(("Total Sales Value", format_peso(s.total_sales_value)));
    lines.push(("Selling Price per kg", format_peso(report.selling_price)));
    lines
}

fn column_weights(kind: ReportKind) -> Vec<usize> {
    match kind {
        ReportKind::Batches => vec![2, 4, 2, 2, 2, 2, 2, 2, 3, 3],
        ReportKind::Sales => vec![2, 4, 2, 2, 2, 3, 3],
    }
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::DocumentError(e.to_string())
}

impl ExportService {
    pub fn new(fonts_dir: PathBuf, utc_offset: FixedOffset) -> Self {
        Self { fonts_dir, utc_offset }
    }

    pub fn report_pdf(&self, report: &Report) -> Result<Vec<u8>, AppError> {
        // 1. Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|_| {
                AppError::FontNotFound(format!("Roboto em {}", self.fonts_dir.display()))
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(REPORT_TITLE);
        doc.set_font_size(9);
        // Paisagem: a tabela de lotes tem 10 colunas
        doc.set_paper_size(genpdf::Size::new(297, 210));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new(REPORT_TITLE)
            .styled(style::Style::new().bold().with_font_size(16)));
        doc.push(elements::Paragraph::new(period_line(report)));
        doc.push(elements::Paragraph::new(format!(
            "Generated: {}",
            format_table_datetime(Utc::now(), self.utc_offset)
        )).styled(style::Style::new().italic().with_font_size(8)));
        doc.push(elements::Break::new(1.5));

        // --- TABELA ---
        if report.table.rows.is_empty() {
            doc.push(elements::Paragraph::new(NO_DATA_MESSAGE));
        } else {
            let mut table = elements::TableLayout::new(column_weights(report.kind));
            table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

            let style_bold = style::Style::new().bold();
            let mut header = table.row();
            for title in &report.table.headers {
                header.push_element(elements::Paragraph::new(title.as_str()).styled(style_bold));
            }
            header.push().map_err(pdf_error)?;

            let style_negative = style::Style::new().with_color(style::Color::Rgb(220, 38, 38));
            for cells in &report.table.rows {
                let mut row = table.row();
                for cell in cells {
                    let text = strip_for_pdf(&cell.text);
                    if cell.negative {
                        row.push_element(elements::Paragraph::new(text).styled(style_negative));
                    } else {
                        row.push_element(elements::Paragraph::new(text));
                    }
                }
                row.push().map_err(pdf_error)?;
            }

            doc.push(table);
        }

        doc.push(elements::Break::new(2));

        // --- RESUMO ---
        doc.push(elements::Paragraph::new("Summary")
            .styled(style::Style::new().bold().with_font_size(12)));
        for (label, value) in summary_lines(report) {
            doc.push(elements::Paragraph::new(format!("{}: {}", label, strip_for_pdf(&value))));
        }

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;

        Ok(buffer)
    }

    /// Planilha com a aba "Report" (igual à tela) e a aba "Summary".
    pub fn report_xlsx(&self, report: &Report) -> Result<Vec<u8>, AppError> {
        let bold = Format::new().set_bold();
        let negative = Format::new().set_font_color(Color::RGB(0xDC2626));

        let mut sheet = Worksheet::new();
        sheet.set_name("Report")?;

        if report.table.rows.is_empty() {
            sheet.write_string(0, 0, NO_DATA_MESSAGE)?;
        } else {
            for (col, title) in report.table.headers.iter().enumerate() {
                sheet.write_string_with_format(0, col as u16, title.as_str(), &bold)?;
                sheet.set_column_width(col as u16, 16)?;
            }
            for (r, cells) in report.table.rows.iter().enumerate() {
                let row = (r + 1) as u32;
                for (col, cell) in cells.iter().enumerate() {
                    if cell.negative {
                        sheet.write_string_with_format(row, col as u16, cell.text.as_str(), &negative)?;
                    } else {
                        sheet.write_string(row, col as u16, cell.text.as_str())?;
                    }
                }
            }
        }

        let mut summary = Worksheet::new();
        summary.set_name("Summary")?;
        summary.write_string_with_format(0, 0, REPORT_TITLE, &bold)?;
        summary.write_string(1, 0, period_line(report).as_str())?;
        for (i, (label, value)) in summary_lines(report).into_iter().enumerate() {
            let row = (i + 3) as u32;
            summary.write_string_with_format(row, 0, label, &bold)?;
            summary.write_string(row, 1, value.as_str())?;
        }
        summary.set_column_width(0, 24)?;
        summary.set_column_width(1, 18)?;

        let mut workbook = Workbook::new();
        workbook.push_worksheet(sheet);
        workbook.push_worksheet(summary);

        Ok(workbook.save_to_buffer()?)
    }
}
