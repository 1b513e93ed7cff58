// src/services/batch_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, PgPool};

use crate::{
    common::{error::AppError, validation::exceeds_weight_scale},
    db::BatchRepository,
    models::batch::{
        Batch, BatchAggregate, BatchDetail, BatchWeights, CreatedBatch, Reading, ReadingKind,
    },
    services::{aggregation::aggregate_batch, settings_service::SettingsService},
};

#[derive(Clone)]
pub struct BatchService {
    pool: PgPool,
    repo: BatchRepository,
    settings: SettingsService,
}

fn weights_of(shell: &[Reading], nut: &[Reading]) -> BatchWeights {
    BatchWeights {
        shell: shell.iter().map(|r| Some(r.weight)).collect(),
        nut: nut.iter().map(|r| Some(r.weight)).collect(),
    }
}

fn too_precise() -> AppError {
    AppError::InvalidInput("Weight can have at most 3 decimal places.".into())
}

fn clean_note(note: Option<&str>) -> Option<&str> {
    note.map(str::trim).filter(|n| !n.is_empty())
}

impl BatchService {
    pub fn new(pool: PgPool, repo: BatchRepository, settings: SettingsService) -> Self {
        Self { pool, repo, settings }
    }

    async fn detail_of(&self, batch: Batch, shell: Vec<Reading>, nut: Vec<Reading>) -> BatchDetail {
        let price = self.settings.selling_price().await;
        let aggregate = aggregate_batch(&batch, &weights_of(&shell, &nut), price);
        BatchDetail {
            batch,
            shell_readings: shell,
            nut_readings: nut,
            aggregate,
        }
    }

    // --- CRIAÇÃO ("Crack") ---

    /// Cria o lote com a leitura de amêndoa e, opcionalmente, a de casca.
    ///
    /// Lote + leitura de amêndoa são atômicos: se a leitura falhar o lote some
    /// junto. A leitura de casca roda num savepoint; se falhar, é descartada e
    /// o lote continua valendo.
    pub async fn create_batch(
        &self,
        nut_weight: Decimal,
        shell_weight: Option<Decimal>,
        note: Option<&str>,
    ) -> Result<CreatedBatch, AppError> {
        if nut_weight <= Decimal::ZERO {
            return Err(AppError::InvalidInput(
                "Please enter a valid weight to crack (must be a positive number).".into(),
            ));
        }
        if exceeds_weight_scale(&nut_weight)
            || shell_weight.is_some_and(|w| w > Decimal::ZERO && exceeds_weight_scale(&w))
        {
            return Err(too_precise());
        }
        let note = clean_note(note);

        let mut tx = self.pool.begin().await?;

        let batch = self.repo.insert_batch(&mut *tx, note).await?;
        let nut = self
            .repo
            .insert_reading(&mut *tx, ReadingKind::Nut, batch.id, nut_weight, None)
            .await?;

        let mut shell_readings = Vec::new();
        let mut shell_reading_saved = true;
        if let Some(weight) = shell_weight.filter(|w| *w > Decimal::ZERO) {
            let mut savepoint = tx.begin().await?;
            match self
                .repo
                .insert_reading(&mut *savepoint, ReadingKind::Shell, batch.id, weight, None)
                .await
            {
                Ok(reading) => {
                    savepoint.commit().await?;
                    shell_readings.push(reading);
                }
                Err(e) => {
                    tracing::error!("Erro ao salvar leitura de casca do lote {}: {:?}", batch.id, e);
                    savepoint.rollback().await?;
                    shell_reading_saved = false;
                }
            }
        }

        tx.commit().await?;

        // Mensagem com o peso como ficou gravado
        let stored_weight = nut.weight.normalize();
        tracing::info!("Lote {} criado com {}kg de amêndoa", batch.id, stored_weight);

        let detail = self.detail_of(batch, shell_readings, vec![nut]).await;
        Ok(CreatedBatch {
            detail,
            message: format!("{}kg of pili processed.", stored_weight),
            shell_reading_saved,
        })
    }

    // --- LEITURAS AVULSAS ---

    pub async fn add_reading(
        &self,
        batch_id: i64,
        kind: ReadingKind,
        weight: Decimal,
        note: Option<&str>,
    ) -> Result<Reading, AppError> {
        if weight <= Decimal::ZERO {
            return Err(AppError::InvalidInput("Weight must be a positive number.".into()));
        }
        if exceeds_weight_scale(&weight) {
            return Err(too_precise());
        }

        let mut tx = self.pool.begin().await?;

        if self.repo.find_by_id(&mut *tx, batch_id).await?.is_none() {
            return Err(AppError::BatchNotFound(batch_id));
        }
        let reading = self
            .repo
            .insert_reading(&mut *tx, kind, batch_id, weight, clean_note(note))
            .await?;

        tx.commit().await?;
        Ok(reading)
    }

    // --- CONSULTA ---

    pub async fn get_batch(&self, batch_id: i64) -> Result<BatchDetail, AppError> {
        let batch = self
            .repo
            .find_by_id(&self.pool, batch_id)
            .await?
            .ok_or(AppError::BatchNotFound(batch_id))?;

        let (shell, nut) = tokio::try_join!(
            self.repo.list_readings(&self.pool, ReadingKind::Shell, batch_id),
            self.repo.list_readings(&self.pool, ReadingKind::Nut, batch_id),
        )?;

        Ok(self.detail_of(batch, shell, nut).await)
    }

    // --- VENDA ---

    pub async fn sell_batch(&self, batch_id: i64) -> Result<BatchAggregate, AppError> {
        let mut tx = self.pool.begin().await?;

        let sold = match self.repo.mark_sold(&mut *tx, batch_id).await? {
            Some(batch) => batch,
            None => {
                // Distingue "não existe" de "já vendido"
                return match self.repo.find_by_id(&mut *tx, batch_id).await? {
                    Some(_) => Err(AppError::BatchAlreadySold(batch_id)),
                    None => Err(AppError::BatchNotFound(batch_id)),
                };
            }
        };

        let shell = self.repo.list_readings(&mut *tx, ReadingKind::Shell, batch_id).await?;
        let nut = self.repo.list_readings(&mut *tx, ReadingKind::Nut, batch_id).await?;

        tx.commit().await?;

        tracing::info!("Lote {} vendido", batch_id);
        Ok(self.detail_of(sold, shell, nut).await.aggregate)
    }

    // --- EXCLUSÃO ---

    /// Apaga casca, amêndoa e o lote, tudo ou nada.
    pub async fn delete_batch(&self, batch_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if self.repo.find_by_id(&mut *tx, batch_id).await?.is_none() {
            return Err(AppError::BatchNotFound(batch_id));
        }

        let shells = self.repo.delete_readings(&mut *tx, ReadingKind::Shell, batch_id).await?;
        let nuts = self.repo.delete_readings(&mut *tx, ReadingKind::Nut, batch_id).await?;
        self.repo.delete_batch(&mut *tx, batch_id).await?;

        tx.commit().await?;

        tracing::info!(
            "Lote {} apagado ({} leitura(s) de casca, {} de amêndoa)",
            batch_id,
            shells,
            nuts
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(weight: &str) -> Reading {
        Reading {
            id: 1,
            batch_id: 1,
            weight: weight.parse().unwrap(),
            timestamp: Utc::now(),
            note: None,
        }
    }

    #[test]
    fn readings_become_weights() {
        let weights = weights_of(&[reading("6.0")], &[reading("5.0"), reading("3.0")]);
        assert_eq!(weights.shell, vec![Some("6.0".parse().unwrap())]);
        assert_eq!(weights.nut.len(), 2);
    }

    #[test]
    fn blank_notes_are_dropped() {
        assert_eq!(clean_note(Some("   ")), None);
        assert_eq!(clean_note(Some(" morning run ")), Some("morning run"));
        assert_eq!(clean_note(None), None);
    }

    #[tokio::test]
    async fn create_rejects_non_positive_weight_before_touching_the_database() {
        // Pool preguiçosa: nenhuma conexão é aberta se a validação barrar antes
        let pool = PgPool::connect_lazy("postgres://unused@localhost/unused").unwrap();
        let repo = BatchRepository::new(pool.clone());
        let settings = SettingsService::new(crate::db::SettingsRepository::new(pool.clone()));
        let service = BatchService::new(pool, repo, settings);

        let err = service.create_batch(Decimal::ZERO, None, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = service
            .add_reading(1, ReadingKind::Shell, Decimal::new(-1, 0), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn weights_finer_than_the_column_are_rejected() {
        let pool = PgPool::connect_lazy("postgres://unused@localhost/unused").unwrap();
        let repo = BatchRepository::new(pool.clone());
        let settings = SettingsService::new(crate::db::SettingsRepository::new(pool.clone()));
        let service = BatchService::new(pool, repo, settings);
        let tiny: Decimal = "0.0004".parse().unwrap();

        let err = service.create_batch(tiny, None, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(m) if m.contains("3 decimal places")));

        let err = service
            .create_batch(Decimal::ONE, Some(tiny), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = service
            .add_reading(1, ReadingKind::Nut, tiny, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
