// src/services/presentation.rs
//
// Transforma números agregados em texto de tela: cards, tabela de relatório
// e a série do gráfico.

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

use crate::models::{
    batch::BatchAggregate,
    dashboard::{ChartSeries, ProductionTotals, SummaryCards},
    report::{ReportKind, ReportTable, TableCell},
};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const CHART_Y_STEP: i64 = 10;
const CHART_Y_FLOOR: i64 = 90;
const CHART_Y_HEADROOM: i64 = 20;

pub const NO_BATCHES_PLACEHOLDER: &str = "No batches yet";
pub const NO_DATA_MESSAGE: &str = "No data available for the selected period.";

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// "14.00"
pub fn format_weight(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

/// "14.00kg"
pub fn format_kg(value: Decimal) -> String {
    format!("{}kg", format_weight(value))
}

fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

/// "₱2,800.00"
pub fn format_peso(value: Decimal) -> String {
    let rounded = round2(value);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}₱{}.{frac_part}", group_thousands(int_part))
}

/// "Oct 18, 2026"
pub fn format_short_date(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%b %-d, %Y").to_string()
}

/// "Oct 18, 2026, 02:30 PM" (células de tabela)
pub fn format_table_datetime(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%b %-d, %Y, %I:%M %p").to_string()
}

/// "October 18, 2026, 02:30 PM" (card do último lote)
pub fn format_long_datetime(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%B %-d, %Y, %I:%M %p").to_string()
}

pub fn summary_cards(totals: &ProductionTotals, selling_price: Decimal, offset: FixedOffset) -> SummaryCards {
    let latest = totals.latest_batch.as_ref();

    SummaryCards {
        total_batches: totals.total_batches.to_string(),
        total_shell_weight: format_kg(totals.total_shell_weight),
        total_nut_weight: format_kg(totals.total_nut_weight),
        last_updated: latest
            .map(|b| format!("Last updated: {}", format_short_date(b.created_at, offset))),
        total_production: format_kg(totals.total_production),
        average_per_batch: format_kg(totals.average_per_batch),
        average_weight_lost: format_kg(totals.average_weight_lost),
        latest_batch_date: latest
            .map(|b| format_long_datetime(b.created_at, offset))
            .unwrap_or_else(|| NO_BATCHES_PLACEHOLDER.to_string()),
        latest_batch_weight: latest
            .map(|b| format_kg(b.total_weight))
            .unwrap_or_else(|| "0kg".to_string()),
        total_sales_value: format_peso(totals.total_sales_value),
        price_per_kg: price_per_kg_label(selling_price),
    }
}

pub fn price_per_kg_label(selling_price: Decimal) -> String {
    format!("Price per kg: {}", format_peso(selling_price))
}

/// max(90, ceil(maior/10) * 10 + 20)
pub fn chart_y_max(values: &[Decimal]) -> i64 {
    let max = values.iter().copied().fold(Decimal::ZERO, Decimal::max);
    let step = Decimal::from(CHART_Y_STEP);
    let bound = (max / step).ceil() * step + Decimal::from(CHART_Y_HEADROOM);
    bound.to_i64().unwrap_or(i64::MAX).max(CHART_Y_FLOOR)
}

/// Soma o peso total por mês de criação (no fuso local) para o ano pedido.
pub fn chart_series(batches: &[BatchAggregate], year: i32, offset: FixedOffset) -> ChartSeries {
    let mut values = vec![Decimal::ZERO; 12];
    for batch in batches {
        let local = batch.created_at.with_timezone(&offset);
        if local.year() == year {
            values[local.month0() as usize] += batch.total_weight;
        }
    }

    ChartSeries {
        year,
        labels: MONTHS.iter().map(|m| format!("{m}\n{year}")).collect(),
        y_max: chart_y_max(&values),
        y_step: CHART_Y_STEP,
        values,
    }
}

fn note_cell(note: &Option<String>) -> TableCell {
    match note.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => TableCell::plain(text),
        _ => TableCell::plain("N/A"),
    }
}

pub fn report_headers(kind: ReportKind) -> Vec<String> {
    let headers: &[&str] = match kind {
        ReportKind::Batches => &[
            "Batch ID",
            "Date",
            "Status",
            "Input Weight (kg)",
            "Shell Weight (kg)",
            "Nut Weight (kg)",
            "Total Weight (kg)",
            "Weight Lost (kg)",
            "Sales Value",
            "Note",
        ],
        ReportKind::Sales => &[
            "Batch ID",
            "Sold Date",
            "Shell Weight (kg)",
            "Nut Weight (kg)",
            "Total Weight (kg)",
            "Sales Value",
            "Note",
        ],
    };
    headers.iter().map(|h| h.to_string()).collect()
}

pub fn report_table(kind: ReportKind, rows: &[BatchAggregate], offset: FixedOffset) -> ReportTable {
    let rows = rows
        .iter()
        .map(|row| match kind {
            ReportKind::Batches => vec![
                TableCell::plain(row.id.to_string()),
                TableCell::plain(format_table_datetime(row.created_at, offset)),
                TableCell::plain(row.status.label()),
                TableCell::plain(format_weight(row.input_weight)),
                TableCell::plain(format_weight(row.shell_weight)),
                TableCell::plain(format_weight(row.nut_weight)),
                TableCell::plain(format_weight(row.total_weight)),
                TableCell::highlighted(format_weight(row.weight_lost), row.has_negative_loss()),
                TableCell::plain(format_peso(row.sales_value)),
                note_cell(&row.note),
            ],
            ReportKind::Sales => vec![
                TableCell::plain(row.id.to_string()),
                // Venda sem data registrada cai para a data de criação
                TableCell::plain(format_table_datetime(
                    row.finished_at.unwrap_or(row.created_at),
                    offset,
                )),
                TableCell::plain(format_weight(row.shell_weight)),
                TableCell::plain(format_weight(row.nut_weight)),
                TableCell::plain(format_weight(row.total_weight)),
                TableCell::plain(format_peso(row.sales_value)),
                note_cell(&row.note),
            ],
        })
        .collect();

    ReportTable { headers: report_headers(kind), rows }
}

/// Texto da célula para o PDF: sem símbolo de moeda.
pub fn strip_for_pdf(text: &str) -> String {
    text.replace('₱', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{batch::BatchStatus, dashboard::LatestBatch};
    use chrono::TimeZone;

    fn d(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    fn manila() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn row(id: i64, created_at: DateTime<Utc>, total: &str) -> BatchAggregate {
        BatchAggregate {
            id,
            created_at,
            finished_at: None,
            status: BatchStatus::Active,
            note: None,
            input_weight: d(total),
            shell_weight: Decimal::ZERO,
            nut_weight: d(total),
            total_weight: d(total),
            weight_lost: d(total),
            sales_value: d(total) * d("350"),
        }
    }

    fn empty_totals() -> ProductionTotals {
        crate::services::aggregation::production_totals(&[])
    }

    #[test]
    fn weights_and_money() {
        assert_eq!(format_kg(d("14")), "14.00kg");
        assert_eq!(format_kg(d("2.005")), "2.01kg");
        assert_eq!(format_weight(d("-5.5")), "-5.50");
        assert_eq!(format_peso(d("2800")), "₱2,800.00");
        assert_eq!(format_peso(d("1234567.891")), "₱1,234,567.89");
        assert_eq!(format_peso(d("350")), "₱350.00");
        assert_eq!(format_peso(Decimal::ZERO), "₱0.00");
        assert_eq!(format_peso(d("-1500")), "-₱1,500.00");
    }

    #[test]
    fn dates_use_local_offset() {
        // 18:30 UTC já é dia seguinte em Manila
        let at = Utc.with_ymd_and_hms(2026, 10, 17, 18, 30, 0).unwrap();
        assert_eq!(format_short_date(at, manila()), "Oct 18, 2026");
        assert_eq!(format_table_datetime(at, manila()), "Oct 18, 2026, 02:30 AM");
        assert_eq!(format_long_datetime(at, manila()), "October 18, 2026, 02:30 AM");
    }

    #[test]
    fn cards_without_batches_show_placeholders() {
        let cards = summary_cards(&empty_totals(), d("350"), manila());
        assert_eq!(cards.total_batches, "0");
        assert_eq!(cards.average_per_batch, "0.00kg");
        assert_eq!(cards.latest_batch_date, NO_BATCHES_PLACEHOLDER);
        assert_eq!(cards.latest_batch_weight, "0kg");
        assert_eq!(cards.last_updated, None);
        assert_eq!(cards.total_sales_value, "₱0.00");
        assert_eq!(cards.price_per_kg, "Price per kg: ₱350.00");
    }

    #[test]
    fn cards_with_latest_batch() {
        let mut totals = empty_totals();
        totals.total_batches = 1;
        totals.total_production = d("14");
        totals.average_per_batch = d("14");
        totals.total_sales_value = d("2800");
        totals.latest_batch = Some(LatestBatch {
            id: 9,
            created_at: Utc.with_ymd_and_hms(2026, 10, 18, 6, 30, 0).unwrap(),
            total_weight: d("14"),
        });

        let cards = summary_cards(&totals, d("350"), manila());
        assert_eq!(cards.latest_batch_date, "October 18, 2026, 02:30 PM");
        assert_eq!(cards.latest_batch_weight, "14.00kg");
        assert_eq!(cards.last_updated.as_deref(), Some("Last updated: Oct 18, 2026"));
        assert_eq!(cards.total_sales_value, "₱2,800.00");
    }

    #[test]
    fn y_axis_bounds() {
        assert_eq!(chart_y_max(&[Decimal::ZERO; 12]), 90);
        assert_eq!(chart_y_max(&[d("69.9")]), 90);
        assert_eq!(chart_y_max(&[d("70.1")]), 100);
        assert_eq!(chart_y_max(&[d("80")]), 100);
        assert_eq!(chart_y_max(&[d("12"), d("250.5")]), 280);
    }

    #[test]
    fn chart_buckets_by_local_month() {
        let rows = vec![
            row(1, Utc.with_ymd_and_hms(2026, 1, 10, 3, 0, 0).unwrap(), "10"),
            row(2, Utc.with_ymd_and_hms(2026, 1, 20, 3, 0, 0).unwrap(), "5.5"),
            // 31/mar 20:00 UTC = 1/abr em Manila
            row(3, Utc.with_ymd_and_hms(2026, 3, 31, 20, 0, 0).unwrap(), "7"),
            // Outro ano: fica de fora
            row(4, Utc.with_ymd_and_hms(2025, 6, 1, 3, 0, 0).unwrap(), "100"),
        ];
        let chart = chart_series(&rows, 2026, manila());

        assert_eq!(chart.labels.len(), 12);
        assert_eq!(chart.labels[0], "Jan\n2026");
        assert_eq!(chart.values[0], d("15.5"));
        assert_eq!(chart.values[2], Decimal::ZERO);
        assert_eq!(chart.values[3], d("7"));
        assert_eq!(chart.values.iter().copied().sum::<Decimal>(), d("22.5"));
        assert_eq!(chart.y_max, 90);
        assert_eq!(chart.y_step, 10);
    }

    #[test]
    fn batches_table_highlights_negative_loss() {
        let mut negative = row(5, Utc.with_ymd_and_hms(2026, 2, 1, 1, 0, 0).unwrap(), "4");
        negative.shell_weight = d("6");
        negative.weight_lost = d("-2");
        negative.note = Some("  ".into());

        let table = report_table(ReportKind::Batches, &[negative], manila());
        assert_eq!(table.headers.len(), 10);
        let cells = &table.rows[0];
        assert_eq!(cells.len(), 10);
        assert_eq!(cells[2].text, "Active");
        assert_eq!(cells[7].text, "-2.00");
        assert!(cells[7].negative);
        assert_eq!(cells[8].text, "₱1,400.00");
        assert_eq!(cells[9].text, "N/A");
    }

    #[test]
    fn sales_table_falls_back_to_created_date() {
        let mut sold = row(6, Utc.with_ymd_and_hms(2026, 2, 1, 1, 0, 0).unwrap(), "2");
        sold.status = BatchStatus::Sold;
        sold.note = Some("Buyer: Ana".into());

        let table = report_table(ReportKind::Sales, &[sold], manila());
        assert_eq!(table.headers[1], "Sold Date");
        assert_eq!(table.rows[0].len(), 7);
        assert_eq!(table.rows[0][1].text, "Feb 1, 2026, 09:00 AM");
        assert_eq!(table.rows[0][6].text, "Buyer: Ana");
    }

    #[test]
    fn pdf_cells_drop_currency_symbol() {
        assert_eq!(strip_for_pdf("₱2,800.00"), "2,800.00");
        assert_eq!(strip_for_pdf("Active"), "Active");
    }
}
