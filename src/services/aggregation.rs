// src/services/aggregation.rs
//
// Cálculos puros sobre lotes e leituras. Nada aqui toca o banco: os serviços
// buscam as linhas e passam para cá.

use rust_decimal::Decimal;

use crate::models::{
    batch::{Batch, BatchAggregate, BatchWeights},
    dashboard::{LatestBatch, ProductionTotals},
    report::ReportSummary,
};

/// Soma de pesos onde ausência (NULL) conta como zero. Vazio = 0.
pub fn sum_weights<I>(weights: I) -> Decimal
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    weights
        .into_iter()
        .map(|w| w.unwrap_or(Decimal::ZERO))
        .fold(Decimal::ZERO, |acc, w| acc + w)
}

/// Agrega um lote a partir das leituras atuais.
///
/// - peso de entrada = peso das amêndoas (o que foi colocado para quebrar)
/// - peso perdido = entrada - casca (pode ser negativo)
/// - valor de venda = amêndoas x preço atual
pub fn aggregate_batch(batch: &Batch, weights: &BatchWeights, selling_price: Decimal) -> BatchAggregate {
    let shell_weight = sum_weights(weights.shell.iter().copied());
    let nut_weight = sum_weights(weights.nut.iter().copied());
    let input_weight = nut_weight;

    BatchAggregate {
        id: batch.id,
        created_at: batch.created_at,
        finished_at: batch.finished_at,
        status: batch.status,
        note: batch.note.clone(),
        input_weight,
        shell_weight,
        nut_weight,
        total_weight: shell_weight + nut_weight,
        weight_lost: input_weight - shell_weight,
        sales_value: nut_weight * selling_price,
    }
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total / Decimal::from(count as u64)
}

/// Totais e médias entre lotes (cards do dashboard).
pub fn production_totals(batches: &[BatchAggregate]) -> ProductionTotals {
    let mut totals = ProductionTotals {
        total_batches: batches.len(),
        total_shell_weight: Decimal::ZERO,
        total_nut_weight: Decimal::ZERO,
        total_production: Decimal::ZERO,
        total_input_weight: Decimal::ZERO,
        total_weight_lost: Decimal::ZERO,
        total_sales_value: Decimal::ZERO,
        average_per_batch: Decimal::ZERO,
        average_weight_lost: Decimal::ZERO,
        latest_batch: None,
    };

    let mut latest: Option<&BatchAggregate> = None;
    for batch in batches {
        totals.total_shell_weight += batch.shell_weight;
        totals.total_nut_weight += batch.nut_weight;
        totals.total_production += batch.total_weight;
        totals.total_input_weight += batch.input_weight;
        totals.total_weight_lost += batch.weight_lost;
        totals.total_sales_value += batch.sales_value;

        // Empate: fica o primeiro que apareceu
        if latest.is_none_or(|l| batch.created_at > l.created_at) {
            latest = Some(batch);
        }
    }

    totals.average_per_batch = average(totals.total_production, totals.total_batches);
    totals.average_weight_lost = average(totals.total_weight_lost, totals.total_batches);
    totals.latest_batch = latest.map(|b| LatestBatch {
        id: b.id,
        created_at: b.created_at,
        total_weight: b.total_weight,
    });

    totals
}

/// Soma de cada coluna numérica das linhas de um relatório.
pub fn report_summary(rows: &[BatchAggregate]) -> ReportSummary {
    rows.iter().fold(
        ReportSummary {
            batch_count: rows.len(),
            total_input_weight: Decimal::ZERO,
            total_shell_weight: Decimal::ZERO,
            total_nut_weight: Decimal::ZERO,
            total_weight: Decimal::ZERO,
            total_weight_lost: Decimal::ZERO,
            total_sales_value: Decimal::ZERO,
        },
        |mut acc, row| {
            acc.total_input_weight += row.input_weight;
            acc.total_shell_weight += row.shell_weight;
            acc.total_nut_weight += row.nut_weight;
            acc.total_weight += row.total_weight;
            acc.total_weight_lost += row.weight_lost;
            acc.total_sales_value += row.sales_value;
            acc
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::batch::BatchStatus;
    use chrono::{TimeZone, Utc};

    fn d(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    fn batch(id: i64, day: u32) -> Batch {
        Batch {
            id,
            created_at: Utc.with_ymd_and_hms(2026, 5, day, 9, 0, 0).unwrap(),
            status: BatchStatus::Active,
            note: None,
            finished_at: None,
        }
    }

    fn weights(shell: &[&str], nut: &[&str]) -> BatchWeights {
        BatchWeights {
            shell: shell.iter().map(|w| Some(d(w))).collect(),
            nut: nut.iter().map(|w| Some(d(w))).collect(),
        }
    }

    #[test]
    fn sum_of_nothing_is_zero() {
        assert_eq!(sum_weights(Vec::new()), Decimal::ZERO);
        assert_eq!(sum_weights(vec![None, None]), Decimal::ZERO);
    }

    #[test]
    fn sum_is_exact_and_ignores_missing() {
        let total = sum_weights(vec![Some(d("0.1")), None, Some(d("0.2"))]);
        assert_eq!(total, d("0.3"));
    }

    #[test]
    fn reference_batch_at_350() {
        let agg = aggregate_batch(&batch(1, 3), &weights(&["6.0"], &["5.0", "3.0"]), d("350"));
        assert_eq!(agg.nut_weight, d("8.0"));
        assert_eq!(agg.shell_weight, d("6.0"));
        assert_eq!(agg.input_weight, d("8.0"));
        assert_eq!(agg.total_weight, d("14.0"));
        assert_eq!(agg.weight_lost, d("2.0"));
        assert_eq!(agg.sales_value, d("2800.00"));
        assert!(!agg.has_negative_loss());
    }

    #[test]
    fn more_shell_than_nut_gives_negative_loss() {
        let agg = aggregate_batch(&batch(2, 3), &weights(&["9.5"], &["4"]), d("350"));
        assert_eq!(agg.weight_lost, d("-5.5"));
        assert_eq!(agg.weight_lost, agg.nut_weight - agg.shell_weight);
        assert!(agg.has_negative_loss());
    }

    #[test]
    fn batch_without_readings_is_all_zero() {
        let agg = aggregate_batch(&batch(3, 3), &BatchWeights::default(), d("350"));
        assert_eq!(agg.total_weight, Decimal::ZERO);
        assert_eq!(agg.weight_lost, Decimal::ZERO);
        assert_eq!(agg.sales_value, Decimal::ZERO);
    }

    #[test]
    fn no_batches_means_zero_average_and_no_latest() {
        let totals = production_totals(&[]);
        assert_eq!(totals.total_batches, 0);
        assert_eq!(totals.average_per_batch, Decimal::ZERO);
        assert_eq!(totals.average_weight_lost, Decimal::ZERO);
        assert!(totals.latest_batch.is_none());
    }

    #[test]
    fn totals_and_latest_batch() {
        let price = d("100");
        let rows = vec![
            aggregate_batch(&batch(1, 2), &weights(&["2"], &["4"]), price),
            aggregate_batch(&batch(2, 9), &weights(&["1"], &["3"]), price),
            aggregate_batch(&batch(3, 5), &weights(&[], &["5"]), price),
        ];
        let totals = production_totals(&rows);

        assert_eq!(totals.total_batches, 3);
        assert_eq!(totals.total_shell_weight, d("3"));
        assert_eq!(totals.total_nut_weight, d("12"));
        assert_eq!(totals.total_production, d("15"));
        assert_eq!(totals.total_input_weight, d("12"));
        assert_eq!(totals.total_weight_lost, d("9"));
        assert_eq!(totals.total_sales_value, d("1200"));
        assert_eq!(totals.average_per_batch, d("5"));
        assert_eq!(totals.average_weight_lost, d("3"));

        let latest = totals.latest_batch.unwrap();
        assert_eq!(latest.id, 2);
        assert_eq!(latest.total_weight, d("4"));
    }

    #[test]
    fn summary_sums_every_column() {
        let price = d("350");
        let rows = vec![
            aggregate_batch(&batch(1, 1), &weights(&["6.0"], &["5.0", "3.0"]), price),
            aggregate_batch(&batch(2, 2), &weights(&["1.25"], &["1.0"]), price),
        ];
        let summary = report_summary(&rows);

        assert_eq!(summary.batch_count, 2);
        assert_eq!(summary.total_nut_weight, d("9.0"));
        assert_eq!(summary.total_input_weight, d("9.0"));
        assert_eq!(summary.total_shell_weight, d("7.25"));
        assert_eq!(summary.total_weight, d("16.25"));
        assert_eq!(summary.total_weight_lost, d("1.75"));
        assert_eq!(summary.total_sales_value, d("3150"));
    }
}
