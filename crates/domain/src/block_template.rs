use chrono::{DateTime, Utc};
use pagecraft_core::{AppError, AppResult, BlockTemplateId, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::BlockConfig;

/// Maximum block template name length.
pub const BLOCK_TEMPLATE_NAME_MAX_LENGTH: usize = 128;
/// Maximum category key length.
pub const BLOCK_TEMPLATE_CATEGORY_MAX_LENGTH: usize = 32;

/// A pre-configured block saved to the editor's block library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTemplate {
    id: BlockTemplateId,
    name: NonEmptyString,
    category: NonEmptyString,
    default_config: BlockConfig,
    is_system: bool,
    created_at: DateTime<Utc>,
}

impl BlockTemplate {
    /// Creates a new library entry; the block type is taken from `default_config`.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        default_config: BlockConfig,
        is_system: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id: BlockTemplateId::new(),
            name: validate_template_name(name)?,
            category: validate_category(category)?,
            default_config,
            is_system,
            created_at: Utc::now(),
        })
    }

    /// Restores a template from storage.
    pub fn restore(
        id: BlockTemplateId,
        name: impl Into<String>,
        category: impl Into<String>,
        default_config: BlockConfig,
        is_system: bool,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            category: NonEmptyString::new(category)?,
            default_config,
            is_system,
            created_at,
        })
    }

    /// Returns template id.
    #[must_use]
    pub fn id(&self) -> BlockTemplateId {
        self.id
    }

    /// Returns display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns picker category key.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Returns the registry type key of the saved block.
    #[must_use]
    pub fn block_type(&self) -> &str {
        self.default_config.block_type()
    }

    /// Returns the saved block.
    #[must_use]
    pub fn default_config(&self) -> &BlockConfig {
        &self.default_config
    }

    /// Returns whether the template ships with the builder.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    /// Returns creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn validate_template_name(name: impl Into<String>) -> AppResult<NonEmptyString> {
    let name = NonEmptyString::new(name)
        .map_err(|_| AppError::Validation("block template name must not be empty".to_owned()))?;
    if name.as_str().chars().count() > BLOCK_TEMPLATE_NAME_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "block template name must be at most {BLOCK_TEMPLATE_NAME_MAX_LENGTH} characters"
        )));
    }

    Ok(name)
}

fn validate_category(category: impl Into<String>) -> AppResult<NonEmptyString> {
    let category = NonEmptyString::new(category).map_err(|_| {
        AppError::Validation("block template category must not be empty".to_owned())
    })?;
    if category.as_str().chars().count() > BLOCK_TEMPLATE_CATEGORY_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "block template category must be at most {BLOCK_TEMPLATE_CATEGORY_MAX_LENGTH} characters"
        )));
    }

    Ok(category)
}
