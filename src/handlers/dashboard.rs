// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{ChartSeries, DashboardOverview},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChartQuery {
    /// Ano do gráfico (padrão: ano atual)
    #[param(example = 2026)]
    pub year: Option<i32>,
}

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Cards de resumo, gráfico mensal e listas de lotes", body = DashboardOverview)
    )
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let overview = app_state.dashboard_service.overview().await;

    Ok((StatusCode::OK, Json(overview)))
}

// GET /api/dashboard/chart
#[utoipa::path(
    get,
    path = "/api/dashboard/chart",
    tag = "Dashboard",
    params(ChartQuery),
    responses(
        (status = 200, description = "Produção (kg) por mês do ano", body = ChartSeries),
        (status = 400, description = "Ano inválido")
    )
)]
pub async fn get_chart(
    State(app_state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<impl IntoResponse, AppError> {
    let year = query
        .year
        .unwrap_or_else(|| Utc::now().with_timezone(&app_state.utc_offset).year());

    let chart = app_state.dashboard_service.chart_for_year(year).await?;

    Ok((StatusCode::OK, Json(chart)))
}
