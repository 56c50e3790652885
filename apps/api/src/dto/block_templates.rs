use pagecraft_application::{BlockCategory, CreateBlockTemplateInput};
use pagecraft_core::AppError;
use pagecraft_domain::{BlockConfig, BlockTemplate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Incoming payload for saving a block to the library.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-block-template-request.ts"
)]
pub struct CreateBlockTemplateRequest {
    pub name: String,
    pub category: Option<String>,
    #[ts(type = "Record<string, unknown>")]
    pub default_config: Value,
}

impl CreateBlockTemplateRequest {
    pub fn into_input(self) -> Result<CreateBlockTemplateInput, AppError> {
        let default_config: BlockConfig = serde_json::from_value(self.default_config)
            .map_err(|error| AppError::Validation(format!("invalid block config: {error}")))?;

        Ok(CreateBlockTemplateInput {
            name: self.name,
            category: parse_category(self.category.as_deref())?,
            default_config,
        })
    }
}

/// Query string of the block library listing.
#[derive(Debug, Default, Deserialize)]
pub struct BlockTemplateListQuery {
    pub category: Option<String>,
}

impl BlockTemplateListQuery {
    pub fn category(&self) -> Result<Option<BlockCategory>, AppError> {
        parse_category(self.category.as_deref())
    }
}

fn parse_category(value: Option<&str>) -> Result<Option<BlockCategory>, AppError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse::<BlockCategory>)
        .transpose()
}

/// API representation of a library block.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/block-template-response.ts"
)]
pub struct BlockTemplateResponse {
    pub id: String,
    pub name: String,
    pub category: String,
    pub block_type: String,
    #[ts(type = "Record<string, unknown>")]
    pub default_config: Value,
    pub is_system: bool,
    pub created_at: String,
}

impl TryFrom<BlockTemplate> for BlockTemplateResponse {
    type Error = AppError;

    fn try_from(template: BlockTemplate) -> Result<Self, Self::Error> {
        let default_config = serde_json::to_value(template.default_config()).map_err(|error| {
            AppError::Internal(format!("failed to serialize block template: {error}"))
        })?;

        Ok(Self {
            id: template.id().to_string(),
            name: template.name().to_owned(),
            category: template.category().to_owned(),
            block_type: template.block_type().to_owned(),
            default_config,
            is_system: template.is_system(),
            created_at: template.created_at().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pagecraft_application::BlockCategory;
    use serde_json::json;

    use super::{BlockTemplateListQuery, CreateBlockTemplateRequest};

    #[test]
    fn blank_category_means_any() {
        let query = BlockTemplateListQuery {
            category: Some(" ".to_owned()),
        };
        assert!(matches!(query.category(), Ok(None)));

        let query = BlockTemplateListQuery {
            category: Some("social-proof".to_owned()),
        };
        assert!(matches!(query.category(), Ok(Some(BlockCategory::SocialProof))));
    }

    #[test]
    fn malformed_configs_are_rejected() {
        let request = CreateBlockTemplateRequest {
            name: "Broken".to_owned(),
            category: None,
            default_config: json!({"props": {}}),
        };
        assert!(request.into_input().is_err());
    }
}
