// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::report::{Report, ReportParams},
    services::export_service::export_file_name,
};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// GET /api/reports
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    params(ReportParams),
    responses(
        (status = 200, description = "Tabela e resumo do período", body = Report),
        (status = 400, description = "Datas ausentes ou início depois do fim")
    )
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.report_service.generate(&params).await?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /api/reports/export/pdf
#[utoipa::path(
    get,
    path = "/api/reports/export/pdf",
    tag = "Reports",
    params(ReportParams),
    responses(
        (status = 200, description = "Relatório em PDF (application/pdf)"),
        (status = 400, description = "Datas ausentes ou início depois do fim")
    )
)]
pub async fn export_pdf(
    State(app_state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Response, AppError> {
    let report = app_state.report_service.generate_for_export(&params).await?;
    let pdf_bytes = app_state.export_service.report_pdf(&report)?;
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(report.kind, "pdf"));

    // Configura os Headers para o navegador baixar o arquivo
    let headers = [
        (header::CONTENT_TYPE, "application/pdf"),
        (header::CONTENT_DISPOSITION, disposition.as_str()),
    ];

    Ok((headers, pdf_bytes).into_response())
}

// GET /api/reports/export/xlsx
#[utoipa::path(
    get,
    path = "/api/reports/export/xlsx",
    tag = "Reports",
    params(ReportParams),
    responses(
        (status = 200, description = "Relatório em planilha Excel (.xlsx)"),
        (status = 400, description = "Datas ausentes ou início depois do fim")
    )
)]
pub async fn export_xlsx(
    State(app_state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Response, AppError> {
    let report = app_state.report_service.generate_for_export(&params).await?;
    let xlsx_bytes = app_state.export_service.report_xlsx(&report)?;
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(report.kind, "xlsx"));

    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
        (header::CONTENT_DISPOSITION, disposition.as_str()),
    ];

    Ok((headers, xlsx_bytes).into_response())
}
