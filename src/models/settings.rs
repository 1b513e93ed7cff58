// src/models/settings.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Nome da linha em `app_settings` que guarda o preço de venda por kg.
pub const SELLING_PRICE_SETTING: &str = "pili_selling_price";

/// Preço usado quando ainda não existe configuração salva.
pub const DEFAULT_SELLING_PRICE: Decimal = Decimal::from_parts(350, 0, 0, false, 0);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppSetting {
    #[schema(ignore)]
    pub id: i64,

    #[schema(example = "pili_selling_price")]
    pub setting_name: String,

    #[schema(example = "350")]
    pub setting_value: String,

    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellingPriceResponse {
    #[schema(example = "350.00")]
    pub selling_price: Decimal,
    #[schema(example = "Price per kg: ₱350.00")]
    pub display: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedSellingPrice {
    pub saved: bool,
    pub selling_price: Decimal,
    #[schema(example = "Selling price saved successfully!")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_price_is_350() {
        assert_eq!(DEFAULT_SELLING_PRICE, Decimal::from(350));
    }
}
