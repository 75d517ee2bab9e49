// src/db/settings_repo.rs

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    common::error::AppError,
    models::settings::{CompanySettings, UpdateSettingsRequest},
};

// Registro único de configurações da empresa
#[derive(Clone, Default)]
pub struct SettingsRepository {
    current: Arc<RwLock<Option<CompanySettings>>>,
}

impl SettingsRepository {
    pub fn new(seed: Option<CompanySettings>) -> Self {
        Self {
            current: Arc::new(RwLock::new(seed)),
        }
    }

    pub async fn get_settings(&self) -> Result<CompanySettings, AppError> {
        // Nunca salvo: devolve o padrão sem gravar
        Ok(self.current.read().await.clone().unwrap_or_default())
    }

    pub async fn update_settings(
        &self,
        input: UpdateSettingsRequest,
    ) -> Result<CompanySettings, AppError> {
        let mut current = self.current.write().await;
        let base = current.clone().unwrap_or_default();

        let updated = CompanySettings {
            company_name: input.company_name.trim().to_string(),
            tax_id: input.tax_id,
            address: input.address,
            phone: input.phone,
            email: input.email,
            timezone: input.timezone.unwrap_or(base.timezone),
            default_page_size: input.default_page_size.unwrap_or(base.default_page_size),
            updated_at: Some(Utc::now()),
        };

        *current = Some(updated.clone());
        Ok(updated)
    }
}
