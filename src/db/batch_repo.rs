// src/db/batch_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::batch::{Batch, BatchStatus, Reading, ReadingKind},
};

const BATCH_COLUMNS: &str = "id, created_at, status, note, finished_at";

// Repositório de lotes e leituras (tabelas batches, shell_readings e nut_readings)
#[derive(Clone)]
pub struct BatchRepository {
    pool: PgPool,
}

impl BatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEITURAS (fora de transação, direto na pool)
    // =========================================================================

    // Lotes ainda não vendidos, do mais novo para o mais antigo
    pub async fn list_active(&self) -> Result<Vec<Batch>, AppError> {
        let sql = format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE status <> 'sold' ORDER BY created_at DESC"
        );
        let batches = sqlx::query_as::<_, Batch>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(batches)
    }

    // Lotes vendidos, pela data da venda
    pub async fn list_sold(&self) -> Result<Vec<Batch>, AppError> {
        let sql = format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE status = 'sold' \
             ORDER BY finished_at DESC NULLS LAST, created_at DESC"
        );
        let batches = sqlx::query_as::<_, Batch>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(batches)
    }

    /// Lotes não vendidos criados em `[from, to)`.
    pub async fn list_active_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Batch>, AppError> {
        let sql = format!(
            "SELECT {BATCH_COLUMNS} FROM batches \
             WHERE status <> 'sold' AND created_at >= $1 AND created_at < $2 \
             ORDER BY created_at DESC"
        );
        let batches = sqlx::query_as::<_, Batch>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(batches)
    }

    /// Lotes vendidos com `finished_at` em `[from, to)`.
    pub async fn list_sold_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Batch>, AppError> {
        let sql = format!(
            "SELECT {BATCH_COLUMNS} FROM batches \
             WHERE status = 'sold' AND finished_at >= $1 AND finished_at < $2 \
             ORDER BY finished_at DESC"
        );
        let batches = sqlx::query_as::<_, Batch>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(batches)
    }

    // Só (lote, peso) de vários lotes de uma vez, que é o que a agregação precisa.
    // O SQLx lida bem com arrays usando ANY
    pub async fn reading_weights_for(
        &self,
        kind: ReadingKind,
        batch_ids: &[i64],
    ) -> Result<Vec<(i64, Option<Decimal>)>, AppError> {
        if batch_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT batch_id, weight FROM {} WHERE batch_id = ANY($1)",
            kind.table()
        );
        let weights = sqlx::query_as::<_, (i64, Option<Decimal>)>(&sql)
            .bind(batch_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(weights)
    }

    // =========================================================================
    //  OPERAÇÕES COM EXECUTOR (podem rodar dentro de transação)
    // =========================================================================

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        batch_id: i64,
    ) -> Result<Option<Batch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {BATCH_COLUMNS} FROM batches WHERE id = $1");
        let batch = sqlx::query_as::<_, Batch>(&sql)
            .bind(batch_id)
            .fetch_optional(executor)
            .await?;
        Ok(batch)
    }

    pub async fn list_readings<'e, E>(
        &self,
        executor: E,
        kind: ReadingKind,
        batch_id: i64,
    ) -> Result<Vec<Reading>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"SELECT id, batch_id, weight, "timestamp", note FROM {} WHERE batch_id = $1 ORDER BY "timestamp" ASC, id ASC"#,
            kind.table()
        );
        let readings = sqlx::query_as::<_, Reading>(&sql)
            .bind(batch_id)
            .fetch_all(executor)
            .await?;
        Ok(readings)
    }

    pub async fn insert_batch<'e, E>(
        &self,
        executor: E,
        note: Option<&str>,
    ) -> Result<Batch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO batches (status, note) VALUES ($1, $2) RETURNING {BATCH_COLUMNS}"
        );
        let batch = sqlx::query_as::<_, Batch>(&sql)
            .bind(BatchStatus::Active)
            .bind(note)
            .fetch_one(executor)
            .await?;
        Ok(batch)
    }

    pub async fn insert_reading<'e, E>(
        &self,
        executor: E,
        kind: ReadingKind,
        batch_id: i64,
        weight: Decimal,
        note: Option<&str>,
    ) -> Result<Reading, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"INSERT INTO {} (batch_id, weight, note) VALUES ($1, $2, $3) RETURNING id, batch_id, weight, "timestamp", note"#,
            kind.table()
        );
        let reading = sqlx::query_as::<_, Reading>(&sql)
            .bind(batch_id)
            .bind(weight)
            .bind(note)
            .fetch_one(executor)
            .await?;
        Ok(reading)
    }

    // Retorna None se o lote não existe ou já estava vendido
    pub async fn mark_sold<'e, E>(
        &self,
        executor: E,
        batch_id: i64,
    ) -> Result<Option<Batch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE batches SET status = $1, finished_at = NOW() \
             WHERE id = $2 AND status <> $1 RETURNING {BATCH_COLUMNS}"
        );
        let batch = sqlx::query_as::<_, Batch>(&sql)
            .bind(BatchStatus::Sold)
            .bind(batch_id)
            .fetch_optional(executor)
            .await?;
        Ok(batch)
    }

    pub async fn delete_readings<'e, E>(
        &self,
        executor: E,
        kind: ReadingKind,
        batch_id: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("DELETE FROM {} WHERE batch_id = $1", kind.table());
        let result = sqlx::query(&sql)
            .bind(batch_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_batch<'e, E>(
        &self,
        executor: E,
        batch_id: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM batches WHERE id = $1")
            .bind(batch_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
