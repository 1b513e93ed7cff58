// src/handlers/batches.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_weight},
    config::AppState,
    models::{
        batch::{BatchAggregate, BatchDetail, CreatedBatch, Reading, ReadingKind},
        dashboard::DashboardOverview,
    },
};

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchPayload {
    /// Peso de amêndoa (kg) que entra no lote
    #[validate(custom(function = "validate_weight"))]
    #[schema(example = "8.0")]
    pub weight: Decimal,

    /// Peso de casca (kg), opcional
    #[schema(example = "6.0")]
    pub shell_weight: Option<Decimal>,

    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddReadingPayload {
    pub kind: ReadingKind,

    #[validate(custom(function = "validate_weight"))]
    #[schema(example = "2.5")]
    pub weight: Decimal,

    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SellPayload {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    Active,
    Sold,
    All,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBatchesQuery {
    /// active (padrão), sold ou all
    pub status: Option<StatusFilter>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SoldBatchResponse {
    pub batch: BatchAggregate,
    // Dashboard recalculado logo após a venda
    pub dashboard: DashboardOverview,
}

// --- HANDLERS ---

// GET /api/batches
#[utoipa::path(
    get,
    path = "/api/batches",
    tag = "Batches",
    params(ListBatchesQuery),
    responses(
        (status = 200, description = "Lotes com pesos agregados", body = Vec<BatchAggregate>)
    )
)]
pub async fn list_batches(
    State(app_state): State<AppState>,
    Query(query): Query<ListBatchesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.dashboard_service;

    let batches = match query.status.unwrap_or_default() {
        StatusFilter::Active => service.list_active().await,
        StatusFilter::Sold => service.list_sold().await,
        StatusFilter::All => {
            let (mut active, sold) = tokio::join!(service.list_active(), service.list_sold());
            active.extend(sold);
            active
        }
    };

    Ok((StatusCode::OK, Json(batches)))
}

// POST /api/batches
#[utoipa::path(
    post,
    path = "/api/batches",
    tag = "Batches",
    request_body = CreateBatchPayload,
    responses(
        (status = 201, description = "Lote criado", body = CreatedBatch),
        (status = 400, description = "Peso inválido")
    )
)]
pub async fn create_batch(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateBatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = app_state
        .batch_service
        .create_batch(payload.weight, payload.shell_weight, payload.note.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/batches/{id}
#[utoipa::path(
    get,
    path = "/api/batches/{id}",
    tag = "Batches",
    params(("id" = i64, Path, description = "ID do lote")),
    responses(
        (status = 200, description = "Lote com suas leituras", body = BatchDetail),
        (status = 404, description = "Lote não encontrado")
    )
)]
pub async fn get_batch(
    State(app_state): State<AppState>,
    Path(batch_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.batch_service.get_batch(batch_id).await?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/batches/{id}/readings
#[utoipa::path(
    post,
    path = "/api/batches/{id}/readings",
    tag = "Batches",
    params(("id" = i64, Path, description = "ID do lote")),
    request_body = AddReadingPayload,
    responses(
        (status = 201, description = "Leitura registrada", body = Reading),
        (status = 400, description = "Peso inválido"),
        (status = 404, description = "Lote não encontrado")
    )
)]
pub async fn add_reading(
    State(app_state): State<AppState>,
    Path(batch_id): Path<i64>,
    Json(payload): Json<AddReadingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let reading = app_state
        .batch_service
        .add_reading(batch_id, payload.kind, payload.weight, payload.note.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(reading)))
}

// POST /api/batches/{id}/sell
#[utoipa::path(
    post,
    path = "/api/batches/{id}/sell",
    tag = "Batches",
    params(("id" = i64, Path, description = "ID do lote")),
    request_body = SellPayload,
    responses(
        (status = 200, description = "Lote vendido", body = SoldBatchResponse),
        (status = 400, description = "Venda não confirmada"),
        (status = 404, description = "Lote não encontrado"),
        (status = 409, description = "Lote já vendido")
    )
)]
pub async fn sell_batch(
    State(app_state): State<AppState>,
    Path(batch_id): Path<i64>,
    Json(payload): Json<SellPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !payload.confirm {
        return Err(AppError::ConfirmationRequired);
    }

    let batch = app_state.batch_service.sell_batch(batch_id).await?;
    let dashboard = app_state.dashboard_service.overview().await;

    Ok((StatusCode::OK, Json(SoldBatchResponse { batch, dashboard })))
}

// DELETE /api/batches/{id}
#[utoipa::path(
    delete,
    path = "/api/batches/{id}",
    tag = "Batches",
    params(("id" = i64, Path, description = "ID do lote")),
    responses(
        (status = 204, description = "Lote e leituras apagados"),
        (status = 404, description = "Lote não encontrado")
    )
)]
pub async fn delete_batch(
    State(app_state): State<AppState>,
    Path(batch_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.batch_service.delete_batch(batch_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
