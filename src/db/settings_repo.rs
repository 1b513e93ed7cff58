use sqlx::{Executor, PgPool, Postgres};
use crate::{
    common::error::AppError,
    models::settings::AppSetting,
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // Busca uma configuração pelo nome. "Não encontrado" vira None, não erro.
    pub async fn find_by_name<'e, E>(
        &self,
        executor: E,
        name: &str,
    ) -> Result<Option<AppSetting>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let setting = sqlx::query_as::<_, AppSetting>(
            "SELECT id, setting_name, setting_value, updated_at FROM app_settings WHERE setting_name = $1",
        )
            .bind(name)
            .fetch_optional(executor)
            .await?;

        Ok(setting)
    }

    pub async fn update_value<'e, E>(
        &self,
        executor: E,
        id: i64,
        value: &str,
    ) -> Result<AppSetting, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let setting = sqlx::query_as::<_, AppSetting>(
            r#"
            UPDATE app_settings
            SET setting_value = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, setting_name, setting_value, updated_at
            "#,
        )
            .bind(id)
            .bind(value)
            .fetch_one(executor)
            .await?;

        Ok(setting)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        name: &str,
        value: &str,
    ) -> Result<AppSetting, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let setting = sqlx::query_as::<_, AppSetting>(
            r#"
            INSERT INTO app_settings (setting_name, setting_value)
            VALUES ($1, $2)
            RETURNING id, setting_name, setting_value, updated_at
            "#,
        )
            .bind(name)
            .bind(value)
            .fetch_one(executor)
            .await?;

        Ok(setting)
    }
}
