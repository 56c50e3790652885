//! Built-in block types.

mod content;
mod conversion;
mod form;
mod layout;
mod social_proof;

use pagecraft_core::{AppError, AppResult};
use pagecraft_domain::{BlockConfig, BlockProps};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::BlockRegistry;

pub use content::{
    BodyTextProps, HeadingLevel, HeadlineProps, HeroImageProps, SpacerProps, SubheadlineProps,
};
pub use conversion::{CtaAction, CtaButtonProps, ProgressBarProps, TrustBadge, TrustBadgesProps};
pub use form::{
    AddressFinderProps, CheckboxProps, EmailInputProps, PhoneInputProps, RadioCardsProps,
    RadioOption, TextInputProps,
};
pub use layout::{CardProps, ColumnConfig, ColumnsProps, ContainerProps};
pub use social_proof::{AgentCardProps, StatItem, StatsBarProps, TestimonialCardProps};

/// Registers every built-in block type.
pub(crate) fn register_builtin(registry: &mut BlockRegistry) {
    form::register(registry);
    content::register(registry);
    social_proof::register(registry);
    layout::register(registry);
    conversion::register(registry);
}

/// Horizontal text alignment shared by content blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

/// Decodes the persisted props of a block into its typed props struct.
pub(crate) fn decode_props<P: DeserializeOwned>(config: &BlockConfig) -> AppResult<P> {
    serde_json::from_value(Value::Object(config.props().clone())).map_err(|error| {
        AppError::Configuration(format!(
            "block '{}' ({}) has invalid props: {error}",
            config.id(),
            config.block_type()
        ))
    })
}

/// Serializes the default props struct of a block type.
pub(crate) fn default_props<P: Serialize + Default>() -> BlockProps {
    match serde_json::to_value(P::default()) {
        Ok(Value::Object(props)) => props,
        _ => BlockProps::new(),
    }
}

/// Serializes resolved props for the view model.
pub(crate) fn resolved_props<P: Serialize>(config: &BlockConfig, props: &P) -> AppResult<Value> {
    serde_json::to_value(props).map_err(|error| {
        AppError::Internal(format!(
            "failed to serialize props of block '{}': {error}",
            config.id()
        ))
    })
}

/// Returns the error for a form block whose field name is blank.
pub(crate) fn missing_field_name(config: &BlockConfig) -> AppError {
    AppError::Configuration(format!(
        "block '{}' ({}) has no field name",
        config.id(),
        config.block_type()
    ))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientCount {
    Number(u64),
    Float(f64),
    Text(String),
}

/// Accepts a count stored either as a JSON number or as a numeric string.
///
/// Select inputs in the editor persist their values as strings.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match LenientCount::deserialize(deserializer)? {
        LenientCount::Number(value) => u32::try_from(value).map_err(D::Error::custom),
        LenientCount::Float(value) if value.fract() == 0.0 && value >= 0.0 => {
            u32::try_from(value as u64).map_err(D::Error::custom)
        }
        LenientCount::Float(value) => Err(D::Error::custom(format!(
            "expected a whole number, found {value}"
        ))),
        LenientCount::Text(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|_| D::Error::custom(format!("expected a whole number, found '{text}'"))),
    }
}

/// Rejects a count outside the supported values.
pub(crate) fn ensure_count_in(
    config: &BlockConfig,
    key: &str,
    value: u32,
    allowed: &[u32],
) -> AppResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }

    Err(AppError::Configuration(format!(
        "block '{}' ({}) has unsupported {key} {value}",
        config.id(),
        config.block_type()
    )))
}
