// src/config.rs

use anyhow::Context;
use chrono::FixedOffset;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, path::PathBuf, time::Duration};

use crate::{
    db::{BatchRepository, SettingsRepository},
    services::{
        batch_service::BatchService,
        dashboard_service::DashboardService,
        export_service::ExportService,
        report_service::ReportService,
        settings_service::SettingsService,
    },
};

/// Configuração lida do ambiente (.env) uma única vez na inicialização.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    // Fuso usado para "dia", "mês" e "ano" nos relatórios e no gráfico
    pub utc_offset: FixedOffset,
    pub fonts_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().context("DB_MAX_CONNECTIONS deve ser um número inteiro")?,
            Err(_) => 5,
        };

        let offset_hours: i32 = match env::var("APP_UTC_OFFSET_HOURS") {
            Ok(raw) => raw.parse().context("APP_UTC_OFFSET_HOURS deve ser um número inteiro")?,
            Err(_) => 8, // Horário das Filipinas
        };
        let utc_offset = FixedOffset::east_opt(offset_hours * 3600)
            .context("APP_UTC_OFFSET_HOURS fora do intervalo válido")?;

        let fonts_dir = env::var("FONTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./fonts"));

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            utc_offset,
            fonts_dir,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub utc_offset: FixedOffset,
    pub batch_service: BatchService,
    pub dashboard_service: DashboardService,
    pub settings_service: SettingsService,
    pub report_service: ReportService,
    pub export_service: ExportService,
}

impl AppState {
    // Conecta e valida o banco antes de devolver o estado: se falhar, o app não sobe.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        sqlx::query("SELECT 1")
            .execute(&db_pool)
            .await
            .context("Banco de dados não respondeu ao ping inicial")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: &Config) -> Self {
        let batch_repo = BatchRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());

        let settings_service = SettingsService::new(settings_repo);
        let dashboard_service = DashboardService::new(
            batch_repo.clone(),
            settings_service.clone(),
            config.utc_offset,
        );
        let batch_service = BatchService::new(
            db_pool.clone(),
            batch_repo.clone(),
            settings_service.clone(),
        );
        let report_service = ReportService::new(
            batch_repo,
            dashboard_service.clone(),
            settings_service.clone(),
            config.utc_offset,
        );
        let export_service = ExportService::new(config.fonts_dir.clone(), config.utc_offset);

        Self {
            db_pool,
            utc_offset: config.utc_offset,
            batch_service,
            dashboard_service,
            settings_service,
            report_service,
            export_service,
        }
    }
}
