// src/models/batch.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "batch_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Active, // Em processamento / estoque
    Sold,   // Vendido (vai para a tabela de vendas)
}

impl BatchStatus {
    pub fn label(self) -> &'static str {
        match self {
            BatchStatus::Active => "Active",
            BatchStatus::Sold => "Sold",
        }
    }
}

/// Tipo de leitura de balança. Cada tipo tem sua própria tabela.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    Shell,
    Nut,
}

impl ReadingKind {
    pub fn table(self) -> &'static str {
        match self {
            ReadingKind::Shell => "shell_readings",
            ReadingKind::Nut => "nut_readings",
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[schema(example = 42)]
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub status: BatchStatus,
    #[schema(example = "Lote da manhã")]
    pub note: Option<String>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: i64,
    pub batch_id: i64,
    #[schema(example = "5.250")]
    pub weight: Decimal,
    pub timestamp: DateTime<Utc>,
    pub note: Option<String>,
}

/// Pesos crus de um lote, como vieram do banco (NULL conta como zero na agregação).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchWeights {
    pub shell: Vec<Option<Decimal>>,
    pub nut: Vec<Option<Decimal>>,
}

/// Um lote já agregado: o que as tabelas do dashboard e dos relatórios mostram.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchAggregate {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub status: BatchStatus,
    pub note: Option<String>,
    #[schema(example = "8.00")]
    pub input_weight: Decimal,
    #[schema(example = "6.00")]
    pub shell_weight: Decimal,
    #[schema(example = "8.00")]
    pub nut_weight: Decimal,
    #[schema(example = "14.00")]
    pub total_weight: Decimal,
    // Pode ser negativo (mais casca que amêndoa); o front deve destacar
    #[schema(example = "2.00")]
    pub weight_lost: Decimal,
    #[schema(example = "2800.00")]
    pub sales_value: Decimal,
}

impl BatchAggregate {
    pub fn has_negative_loss(&self) -> bool {
        self.weight_lost.is_sign_negative() && !self.weight_lost.is_zero()
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchDetail {
    pub batch: Batch,
    pub shell_readings: Vec<Reading>,
    pub nut_readings: Vec<Reading>,
    pub aggregate: BatchAggregate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBatch {
    #[serde(flatten)]
    pub detail: BatchDetail,
    #[schema(example = "8kg of pili processed.")]
    pub message: String,
    // false quando a leitura opcional de casca falhou e foi descartada
    pub shell_reading_saved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn aggregate_with_loss(loss: Decimal) -> BatchAggregate {
        BatchAggregate {
            id: 1,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
            finished_at: None,
            status: BatchStatus::Active,
            note: None,
            input_weight: Decimal::ZERO,
            shell_weight: Decimal::ZERO,
            nut_weight: Decimal::ZERO,
            total_weight: Decimal::ZERO,
            weight_lost: loss,
            sales_value: Decimal::ZERO,
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&BatchStatus::Sold).unwrap(), "\"sold\"");
        let back: BatchStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(back, BatchStatus::Active);
    }

    #[test]
    fn reading_kind_maps_to_table() {
        assert_eq!(ReadingKind::Shell.table(), "shell_readings");
        assert_eq!(ReadingKind::Nut.table(), "nut_readings");
    }

    #[test]
    fn negative_loss_flag() {
        assert!(aggregate_with_loss(Decimal::new(-150, 2)).has_negative_loss());
        assert!(!aggregate_with_loss(Decimal::ZERO).has_negative_loss());
        assert!(!aggregate_with_loss(Decimal::new(-0, 2)).has_negative_loss());
        assert!(!aggregate_with_loss(Decimal::new(200, 2)).has_negative_loss());
    }
}
