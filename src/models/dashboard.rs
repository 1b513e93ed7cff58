// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::batch::BatchAggregate;

// 1. Totais entre lotes (base dos cards do topo)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionTotals {
    pub total_batches: usize,
    pub total_shell_weight: Decimal,
    pub total_nut_weight: Decimal,
    pub total_production: Decimal, // Soma dos pesos totais (casca + amêndoa)
    pub total_input_weight: Decimal,
    pub total_weight_lost: Decimal,
    pub total_sales_value: Decimal,
    pub average_per_batch: Decimal,
    pub average_weight_lost: Decimal,
    pub latest_batch: Option<LatestBatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestBatch {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub total_weight: Decimal,
}

// 2. Os textos prontos dos cards (o front só injeta)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCards {
    #[schema(example = "3")]
    pub total_batches: String,
    #[schema(example = "18.00kg")]
    pub total_shell_weight: String,
    #[schema(example = "24.00kg")]
    pub total_nut_weight: String,
    #[schema(example = "Last updated: Oct 18, 2026")]
    pub last_updated: Option<String>,
    #[schema(example = "42.00kg")]
    pub total_production: String,
    #[schema(example = "14.00kg")]
    pub average_per_batch: String,
    #[schema(example = "2.00kg")]
    pub average_weight_lost: String,
    #[schema(example = "October 18, 2026, 02:30 PM")]
    pub latest_batch_date: String,
    #[schema(example = "14.00kg")]
    pub latest_batch_weight: String,
    #[schema(example = "₱8,400.00")]
    pub total_sales_value: String,
    #[schema(example = "Price per kg: ₱350.00")]
    pub price_per_kg: String,
}

// 3. Gráfico de linha (produção mensal do ano)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    #[schema(example = 2026)]
    pub year: i32,
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
    #[schema(example = 90)]
    pub y_max: i64,
    #[schema(example = 10)]
    pub y_step: i64,
}

// 4. Tudo que a página do dashboard precisa numa chamada só
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub selling_price: Decimal,
    pub totals: ProductionTotals,
    pub cards: SummaryCards,
    pub chart: ChartSeries,
    pub active_batches: Vec<BatchAggregate>,
    pub sold_batches: Vec<BatchAggregate>,
}
