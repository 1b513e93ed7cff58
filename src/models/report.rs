// src/models/report.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::batch::BatchAggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    Batches, // Lotes ativos, filtrados pela data de criação
    Sales,   // Lotes vendidos, filtrados pela data de venda
}

impl ReportKind {
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Batches => "Batches",
            ReportKind::Sales => "Sales",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::Batches => "batches",
            ReportKind::Sales => "sales",
        }
    }
}

/// Atalhos de período (os botões Hoje / Semana / Mês / Ano).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportParams {
    /// batches (padrão) ou sales
    pub kind: Option<ReportKind>,
    /// Data inicial (inclusiva), formato YYYY-MM-DD
    #[param(example = "2026-01-01")]
    pub start: Option<NaiveDate>,
    /// Data final (inclusiva), formato YYYY-MM-DD
    #[param(example = "2026-01-31")]
    pub end: Option<NaiveDate>,
    /// Atalho de período; ignorado quando start/end são enviados
    pub period: Option<ReportPeriod>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRange {
    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub start: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-01-31")]
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub text: String,
    // Célula numérica negativa (ex.: peso perdido) que deve ser destacada
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub negative: bool,
}

impl TableCell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), negative: false }
    }

    pub fn highlighted(text: impl Into<String>, negative: bool) -> Self {
        Self { text: text.into(), negative }
    }
}

/// A tabela exatamente como aparece na tela; as exportações partem dela.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<TableCell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub batch_count: usize,
    pub total_input_weight: Decimal,
    pub total_shell_weight: Decimal,
    pub total_nut_weight: Decimal,
    pub total_weight: Decimal,
    pub total_weight_lost: Decimal,
    pub total_sales_value: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub kind: ReportKind,
    pub range: ReportRange,
    pub selling_price: Decimal,
    pub rows: Vec<BatchAggregate>,
    pub table: ReportTable,
    pub summary: ReportSummary,
}
