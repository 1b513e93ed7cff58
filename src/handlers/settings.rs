// src/handlers/settings.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_positive},
    config::AppState,
    models::settings::{SavedSellingPrice, SellingPriceResponse},
    services::presentation::price_per_kg_label,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSellingPricePayload {
    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "350.00")]
    pub price: Decimal,

    // O cliente precisa confirmar a alteração
    #[serde(default)]
    pub confirm: bool,
}

// GET /api/settings/selling-price
#[utoipa::path(
    get,
    path = "/api/settings/selling-price",
    tag = "Settings",
    responses(
        (status = 200, description = "Preço de venda atual por kg", body = SellingPriceResponse)
    )
)]
pub async fn get_selling_price(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let selling_price = app_state.settings_service.selling_price().await;

    Ok((
        StatusCode::OK,
        Json(SellingPriceResponse {
            selling_price,
            display: price_per_kg_label(selling_price),
        }),
    ))
}

// PUT /api/settings/selling-price
#[utoipa::path(
    put,
    path = "/api/settings/selling-price",
    tag = "Settings",
    request_body = UpdateSellingPricePayload,
    responses(
        (status = 200, description = "Preço salvo", body = SavedSellingPrice),
        (status = 400, description = "Preço inválido ou sem confirmação")
    )
)]
pub async fn update_selling_price(
    State(app_state): State<AppState>,
    Json(payload): Json<UpdateSellingPricePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if !payload.confirm {
        return Err(AppError::ConfirmationRequired);
    }

    let saved = app_state
        .settings_service
        .save_selling_price(payload.price)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SavedSellingPrice {
            saved: true,
            selling_price: saved.setting_value.parse().unwrap_or(payload.price),
            message: "Selling price saved successfully!".to_string(),
        }),
    ))
}
