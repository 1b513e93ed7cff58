// src/services/settings_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::SettingsRepository,
    models::settings::{AppSetting, DEFAULT_SELLING_PRICE, SELLING_PRICE_SETTING},
};

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
}

/// Interpreta o valor salvo. Texto inválido ou preço não positivo = None.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|p| *p > Decimal::ZERO)
}

impl SettingsService {
    pub fn new(repo: SettingsRepository) -> Self {
        Self { repo }
    }

    /// Preço de venda atual. Nunca falha: sem linha, erro de banco ou valor
    /// corrompido caem no padrão (350), com log nos dois últimos casos.
    pub async fn selling_price(&self) -> Decimal {
        match self.repo.find_by_name(self.repo.pool(), SELLING_PRICE_SETTING).await {
            Ok(Some(setting)) => match parse_price(&setting.setting_value) {
                Some(price) => price,
                None => {
                    tracing::warn!(
                        "Valor inválido em {}: {:?}; usando o padrão",
                        SELLING_PRICE_SETTING,
                        setting.setting_value
                    );
                    DEFAULT_SELLING_PRICE
                }
            },
            Ok(None) => DEFAULT_SELLING_PRICE,
            Err(e) => {
                tracing::error!("Erro ao buscar o preço de venda: {:?}", e);
                DEFAULT_SELLING_PRICE
            }
        }
    }

    /// Salva o preço (update se já existe, insert se não). Busca e escrita
    /// rodam na mesma transação.
    pub async fn save_selling_price(&self, price: Decimal) -> Result<AppSetting, AppError> {
        if price <= Decimal::ZERO {
            return Err(AppError::InvalidInput("Please enter a valid positive number.".into()));
        }

        let value = price.normalize().to_string();
        let mut tx = self.repo.pool().begin().await?;

        let existing = self.repo.find_by_name(&mut *tx, SELLING_PRICE_SETTING).await?;
        let saved = match existing {
            Some(setting) => self.repo.update_value(&mut *tx, setting.id, &value).await?,
            None => self.repo.insert(&mut *tx, SELLING_PRICE_SETTING, &value).await?,
        };

        tx.commit().await?;

        tracing::info!("Preço de venda atualizado para {}", value);
        Ok(saved)
    }
}
