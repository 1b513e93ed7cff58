// src/services/dashboard_service.rs

use std::collections::HashMap;

use chrono::{Datelike, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::BatchRepository,
    models::{
        batch::{Batch, BatchAggregate, BatchWeights, ReadingKind},
        dashboard::{ChartSeries, DashboardOverview},
    },
    services::{
        aggregation::{aggregate_batch, production_totals},
        presentation::{chart_series, summary_cards},
        report_service::local_day_bounds,
        settings_service::SettingsService,
    },
};

/// Separa as linhas (lote, peso) por lote.
fn group_weights(
    shell: Vec<(i64, Option<Decimal>)>,
    nut: Vec<(i64, Option<Decimal>)>,
) -> HashMap<i64, BatchWeights> {
    let mut grouped: HashMap<i64, BatchWeights> = HashMap::new();
    for (batch_id, weight) in shell {
        grouped.entry(batch_id).or_default().shell.push(weight);
    }
    for (batch_id, weight) in nut {
        grouped.entry(batch_id).or_default().nut.push(weight);
    }
    grouped
}

// Mantém a ordem da listagem; lote sem leitura agrega como zero
fn aggregate_grouped(
    batches: &[Batch],
    weights: HashMap<i64, BatchWeights>,
    selling_price: Decimal,
) -> Vec<BatchAggregate> {
    let empty = BatchWeights::default();
    batches
        .iter()
        .map(|batch| {
            let batch_weights = weights.get(&batch.id).unwrap_or(&empty);
            aggregate_batch(batch, batch_weights, selling_price)
        })
        .collect()
}

#[derive(Clone)]
pub struct DashboardService {
    repo: BatchRepository,
    settings: SettingsService,
    utc_offset: FixedOffset,
}

impl DashboardService {
    pub fn new(repo: BatchRepository, settings: SettingsService, utc_offset: FixedOffset) -> Self {
        Self { repo, settings, utc_offset }
    }

    /// Pesos de todos os lotes: uma consulta por tabela de leitura (casca e
    /// amêndoa em paralelo), agrupadas em memória. Qualquer falha é devolvida.
    pub async fn try_aggregate_all(
        &self,
        batches: &[Batch],
        selling_price: Decimal,
    ) -> Result<Vec<BatchAggregate>, AppError> {
        let ids: Vec<i64> = batches.iter().map(|b| b.id).collect();
        let (shell, nut) = tokio::try_join!(
            self.repo.reading_weights_for(ReadingKind::Shell, &ids),
            self.repo.reading_weights_for(ReadingKind::Nut, &ids),
        )?;

        Ok(aggregate_grouped(batches, group_weights(shell, nut), selling_price))
    }

    /// Versão das leituras em segundo plano: se a busca falhar, os lotes saem
    /// com peso zero e o erro vai só para o log.
    pub async fn aggregate_all(&self, batches: Vec<Batch>, selling_price: Decimal) -> Vec<BatchAggregate> {
        match self.try_aggregate_all(&batches, selling_price).await {
            Ok(aggregates) => aggregates,
            Err(e) => {
                tracing::error!("Erro ao buscar leituras de {} lote(s): {:?}", batches.len(), e);
                aggregate_grouped(&batches, HashMap::new(), selling_price)
            }
        }
    }

    // Falha ao listar = dashboard vazio (atualização silenciosa, só log)
    async fn active_batches(&self) -> Vec<Batch> {
        self.repo.list_active().await.unwrap_or_else(|e| {
            tracing::error!("Erro ao buscar lotes ativos: {:?}", e);
            Vec::new()
        })
    }

    async fn sold_batches(&self) -> Vec<Batch> {
        self.repo.list_sold().await.unwrap_or_else(|e| {
            tracing::error!("Erro ao buscar lotes vendidos: {:?}", e);
            Vec::new()
        })
    }

    pub async fn list_active(&self) -> Vec<BatchAggregate> {
        let price = self.settings.selling_price().await;
        self.aggregate_all(self.active_batches().await, price).await
    }

    pub async fn list_sold(&self) -> Vec<BatchAggregate> {
        let price = self.settings.selling_price().await;
        self.aggregate_all(self.sold_batches().await, price).await
    }

    pub async fn overview(&self) -> DashboardOverview {
        let (selling_price, active, sold) = tokio::join!(
            self.settings.selling_price(),
            self.active_batches(),
            self.sold_batches(),
        );

        let active_batches = self.aggregate_all(active, selling_price).await;
        let sold_batches = self.aggregate_all(sold, selling_price).await;

        let totals = production_totals(&active_batches);
        let cards = summary_cards(&totals, selling_price, self.utc_offset);
        let year = Utc::now().with_timezone(&self.utc_offset).year();
        let chart = chart_series(&active_batches, year, self.utc_offset);

        DashboardOverview {
            selling_price,
            totals,
            cards,
            chart,
            active_batches,
            sold_batches,
        }
    }

    /// Série mensal de um ano específico (lotes ativos criados naquele ano).
    pub async fn chart_for_year(&self, year: i32) -> Result<ChartSeries, AppError> {
        let (first, last) = match (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AppError::InvalidInput(format!("Invalid year: {year}"))),
        };
        let (from, to) = local_day_bounds(first, last, self.utc_offset)?;

        let batches = self
            .repo
            .list_active_created_between(from, to)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Erro ao buscar lotes do ano {}: {:?}", year, e);
                Vec::new()
            });

        let price = self.settings.selling_price().await;
        let aggregates = self.aggregate_all(batches, price).await;
        Ok(chart_series(&aggregates, year, self.utc_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::batch::BatchStatus;
    use chrono::TimeZone;

    fn d(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    fn batch(id: i64) -> Batch {
        Batch {
            id,
            created_at: Utc.with_ymd_and_hms(2026, 3, id as u32, 9, 0, 0).unwrap(),
            status: BatchStatus::Active,
            note: None,
            finished_at: None,
        }
    }

    #[test]
    fn weights_are_grouped_per_batch() {
        let grouped = group_weights(
            vec![(2, Some(d("6.0"))), (1, None)],
            vec![(1, Some(d("5.0"))), (2, Some(d("3.0"))), (1, Some(d("3.0")))],
        );
        assert_eq!(grouped[&1].shell, vec![None]);
        assert_eq!(grouped[&1].nut, vec![Some(d("5.0")), Some(d("3.0"))]);
        assert_eq!(grouped[&2].shell, vec![Some(d("6.0"))]);
    }

    #[test]
    fn aggregation_keeps_listing_order_and_zeroes_batches_without_readings() {
        let batches = vec![batch(3), batch(1), batch(2)];
        let grouped = group_weights(
            vec![(1, Some(d("6.0")))],
            vec![(1, Some(d("5.0"))), (1, Some(d("3.0"))), (3, Some(d("1.0")))],
        );

        let rows = aggregate_grouped(&batches, grouped, d("350"));
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 1, 2]);
        assert_eq!(rows[0].nut_weight, d("1.0"));
        assert_eq!(rows[1].total_weight, d("14.0"));
        assert_eq!(rows[1].weight_lost, d("2.0"));
        assert_eq!(rows[1].sales_value, d("2800.00"));
        assert_eq!(rows[2].total_weight, Decimal::ZERO);
    }

    #[tokio::test]
    async fn strict_aggregation_reports_database_failures() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://unused@localhost/unused")
            .unwrap();
        let settings = SettingsService::new(crate::db::SettingsRepository::new(pool.clone()));
        let service = DashboardService::new(
            BatchRepository::new(pool),
            settings,
            FixedOffset::east_opt(8 * 3600).unwrap(),
        );

        // Sem lotes, nenhuma consulta é feita
        assert!(service.try_aggregate_all(&[], d("350")).await.unwrap().is_empty());

        assert!(service.try_aggregate_all(&[batch(1)], d("350")).await.is_err());
        let lenient = service.aggregate_all(vec![batch(1)], d("350")).await;
        assert_eq!(lenient[0].total_weight, Decimal::ZERO);
    }
}
