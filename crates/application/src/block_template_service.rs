use std::collections::HashSet;
use std::sync::Arc;

use pagecraft_core::{AppError, AppResult, BlockTemplateId};
use pagecraft_domain::{BlockConfig, BlockTemplate, FormFlow, FormStep, PageDocument};
use tracing::info;

use crate::document_inspection::{inspect_document, issues_error};
use crate::page_ports::BlockTemplateRepository;
use crate::{BlockCategory, BlockRegistry};

/// Input for saving a block to the library.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBlockTemplateInput {
    /// Display name.
    pub name: String,
    /// Picker category; must match the block type's category when given.
    pub category: Option<BlockCategory>,
    /// Block to save.
    pub default_config: BlockConfig,
}

/// Application service for the editor's reusable block library.
#[derive(Clone)]
pub struct BlockTemplateService {
    repository: Arc<dyn BlockTemplateRepository>,
    registry: Arc<BlockRegistry>,
}

impl BlockTemplateService {
    /// Creates a block template service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn BlockTemplateRepository>,
        registry: Arc<BlockRegistry>,
    ) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// Lists templates, optionally of one category.
    pub async fn list(&self, category: Option<BlockCategory>) -> AppResult<Vec<BlockTemplate>> {
        self.repository
            .list_block_templates(category.as_ref().map(BlockCategory::as_str))
            .await
    }

    /// Returns one template by id.
    pub async fn get(&self, template_id: BlockTemplateId) -> AppResult<BlockTemplate> {
        self.repository
            .find_block_template(template_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("block template '{template_id}'")))
    }

    /// Saves a user template once its block type is registered and its props decode.
    pub async fn create(&self, input: CreateBlockTemplateInput) -> AppResult<BlockTemplate> {
        let category = self.category_for(&input.default_config, input.category)?;
        self.check_config(&input.default_config)?;

        let template =
            BlockTemplate::new(input.name, category.as_str(), input.default_config, false)?;
        self.repository.save_block_template(template.clone()).await?;
        info!(
            template_id = %template.id(),
            block_type = template.block_type(),
            "block template created"
        );
        Ok(template)
    }

    /// Adds one system template per registered block type that lacks one.
    pub async fn seed_system_templates(&self) -> AppResult<usize> {
        let seeded: HashSet<String> = self
            .repository
            .list_block_templates(None)
            .await?
            .into_iter()
            .filter(BlockTemplate::is_system)
            .map(|template| template.block_type().to_owned())
            .collect();

        let mut created = 0;
        for block_type in self.registry.all_types() {
            if seeded.contains(block_type) {
                continue;
            }
            let (Some(metadata), Some(config)) = (
                self.registry.get_metadata(block_type),
                self.registry.create_default_config(block_type),
            ) else {
                continue;
            };

            let template =
                BlockTemplate::new(metadata.name(), metadata.category().as_str(), config, true)?;
            self.repository.save_block_template(template).await?;
            created += 1;
        }

        if created > 0 {
            info!(created, "system block templates seeded");
        }
        Ok(created)
    }

    fn category_for(
        &self,
        config: &BlockConfig,
        requested: Option<BlockCategory>,
    ) -> AppResult<BlockCategory> {
        let metadata = self.registry.get_metadata(config.block_type()).ok_or_else(|| {
            AppError::Validation(format!("unknown block type '{}'", config.block_type()))
        })?;

        match requested {
            Some(category) if category != metadata.category() => {
                Err(AppError::Validation(format!(
                    "block type '{}' belongs to category '{}', not '{}'",
                    config.block_type(),
                    metadata.category().as_str(),
                    category.as_str()
                )))
            }
            _ => Ok(metadata.category()),
        }
    }

    fn check_config(&self, config: &BlockConfig) -> AppResult<()> {
        let step = FormStep::new("block-template", "Block template", vec![config.clone()])?;
        let document = PageDocument::new(Vec::new(), FormFlow::new(vec![step]));
        inspect_document(&self.registry, &document).map_err(|issues| issues_error(&issues))?;
        Ok(())
    }
}
