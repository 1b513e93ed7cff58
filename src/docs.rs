// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_overview,
        handlers::dashboard::get_chart,

        // --- Batches ---
        handlers::batches::list_batches,
        handlers::batches::create_batch,
        handlers::batches::get_batch,
        handlers::batches::add_reading,
        handlers::batches::sell_batch,
        handlers::batches::delete_batch,

        // --- Settings ---
        handlers::settings::get_selling_price,
        handlers::settings::update_selling_price,

        // --- Reports ---
        handlers::reports::get_report,
        handlers::reports::export_pdf,
        handlers::reports::export_xlsx,
    ),
    components(
        schemas(
            // --- Batches ---
            models::batch::BatchStatus,
            models::batch::ReadingKind,
            models::batch::Batch,
            models::batch::Reading,
            models::batch::BatchAggregate,
            models::batch::BatchDetail,
            models::batch::CreatedBatch,

            // --- Dashboard ---
            models::dashboard::ProductionTotals,
            models::dashboard::LatestBatch,
            models::dashboard::SummaryCards,
            models::dashboard::ChartSeries,
            models::dashboard::DashboardOverview,

            // --- Settings ---
            models::settings::AppSetting,
            models::settings::SellingPriceResponse,
            models::settings::SavedSellingPrice,

            // --- Reports ---
            models::report::ReportKind,
            models::report::ReportPeriod,
            models::report::ReportRange,
            models::report::TableCell,
            models::report::ReportTable,
            models::report::ReportSummary,
            models::report::Report,

            // --- Payloads ---
            handlers::batches::CreateBatchPayload,
            handlers::batches::AddReadingPayload,
            handlers::batches::SellPayload,
            handlers::batches::StatusFilter,
            handlers::batches::SoldBatchResponse,
            handlers::settings::UpdateSellingPricePayload,
        )
    ),
    tags(
        (name = "Dashboard", description = "Cards de resumo e gráfico mensal de produção"),
        (name = "Batches", description = "Lotes de quebra, leituras de peso e venda"),
        (name = "Settings", description = "Preço de venda por kg"),
        (name = "Reports", description = "Relatórios por período e exportação PDF/Excel")
    ),
    modifiers(&InfoAddon)
)]
pub struct ApiDoc;

struct InfoAddon;

impl utoipa::Modify for InfoAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = "Pili Cracker API".to_string();
        openapi.info.description =
            Some("Registro de lotes de pili, pesos de casca e amêndoa, vendas e relatórios.".to_string());
    }
}
