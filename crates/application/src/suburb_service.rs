use std::sync::Arc;

use pagecraft_core::{AppError, AppResult, SuburbId};
use pagecraft_domain::{Suburb, SuburbChanges, SuburbDetails};
use tracing::info;

use crate::page_ports::SuburbRepository;

/// Application service for suburb market statistics.
#[derive(Clone)]
pub struct SuburbService {
    repository: Arc<dyn SuburbRepository>,
}

impl SuburbService {
    /// Creates a suburb service.
    #[must_use]
    pub fn new(repository: Arc<dyn SuburbRepository>) -> Self {
        Self { repository }
    }

    /// Lists suburbs shown to visitors.
    pub async fn list_active(&self) -> AppResult<Vec<Suburb>> {
        self.repository.list_suburbs(true).await
    }

    /// Lists every suburb for admins.
    pub async fn list_all(&self) -> AppResult<Vec<Suburb>> {
        self.repository.list_suburbs(false).await
    }

    /// Returns one suburb by name, ignoring case.
    pub async fn get_by_name(&self, name: &str) -> AppResult<Suburb> {
        self.repository
            .find_suburb_by_name(name.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("suburb '{}'", name.trim())))
    }

    /// Creates a suburb record under a free name.
    pub async fn create(&self, details: SuburbDetails) -> AppResult<Suburb> {
        let suburb = Suburb::new(details)?;
        self.ensure_name_free(suburb.name(), None).await?;

        self.repository.save_suburb(suburb.clone()).await?;
        info!(suburb_id = %suburb.id(), name = suburb.name(), "suburb created");
        Ok(suburb)
    }

    /// Applies a partial update.
    pub async fn update(&self, suburb_id: SuburbId, changes: SuburbChanges) -> AppResult<Suburb> {
        let mut suburb = self
            .repository
            .find_suburb(suburb_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("suburb '{suburb_id}'")))?;

        suburb.apply(changes)?;
        self.ensure_name_free(suburb.name(), Some(suburb_id)).await?;

        self.repository.save_suburb(suburb.clone()).await?;
        Ok(suburb)
    }

    async fn ensure_name_free(&self, name: &str, owner: Option<SuburbId>) -> AppResult<()> {
        match self.repository.find_suburb_by_name(name).await? {
            Some(existing) if Some(existing.id()) != owner => Err(AppError::Conflict(format!(
                "suburb '{name}' already exists"
            ))),
            _ => Ok(()),
        }
    }
}
