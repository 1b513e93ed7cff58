//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;

/// Monta todas as rotas da API sobre o estado já inicializado.
pub fn router(app_state: AppState) -> Router {
    let batch_routes = Router::new()
        .route("/"
               ,post(handlers::batches::create_batch)
               .get(handlers::batches::list_batches)
        )
        .route("/{id}"
               ,get(handlers::batches::get_batch)
               .delete(handlers::batches::delete_batch)
        )
        .route("/{id}/readings"
               ,post(handlers::batches::add_reading)
        )
        .route("/{id}/sell"
               ,post(handlers::batches::sell_batch)
        );

    let dashboard_routes = Router::new()
        .route("/", get(handlers::dashboard::get_overview))
        .route("/chart", get(handlers::dashboard::get_chart));

    let settings_routes = Router::new()
        .route("/selling-price"
               ,get(handlers::settings::get_selling_price)
               .put(handlers::settings::update_selling_price)
        );

    let report_routes = Router::new()
        .route("/", get(handlers::reports::get_report))
        .route("/export/pdf", get(handlers::reports::export_pdf))
        .route("/export/xlsx", get(handlers::reports::export_xlsx));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/batches", batch_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/settings", settings_routes)
        .nest("/api/reports", report_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; sem ele, "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração ou o banco falharem, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
