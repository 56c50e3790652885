use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use pagecraft_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open property bag persisted for one block instance.
pub type BlockProps = Map<String, Value>;

const BLOCK_ID_SUFFIX_LENGTH: usize = 7;
const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

static BLOCK_ID_FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generates a document-unique block identifier: `{type}-{unix_millis}-{suffix}`.
#[must_use]
pub fn generate_block_id(block_type: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    format!("{block_type}-{millis}-{}", random_base36_suffix())
}

fn random_base36_suffix() -> String {
    let mut bytes = [0_u8; 8];
    let mut seed = match getrandom::fill(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(_) => {
            let counter = BLOCK_ID_FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
            counter.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ Utc::now().timestamp_micros().unsigned_abs()
        }
    };

    let mut suffix = String::with_capacity(BLOCK_ID_SUFFIX_LENGTH);
    for _ in 0..BLOCK_ID_SUFFIX_LENGTH {
        let index = usize::try_from(seed % 36).unwrap_or_default();
        suffix.push(char::from(BASE36_ALPHABET[index]));
        seed /= 36;
    }

    suffix
}

/// Breakpoint visibility of one block. Display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockVisibility {
    /// Shown on desktop widths.
    #[serde(default = "visible_by_default")]
    pub desktop: bool,
    /// Shown on tablet widths.
    #[serde(default = "visible_by_default")]
    pub tablet: bool,
    /// Shown on mobile widths.
    #[serde(default = "visible_by_default")]
    pub mobile: bool,
}

fn visible_by_default() -> bool {
    true
}

impl Default for BlockVisibility {
    fn default() -> Self {
        Self {
            desktop: true,
            tablet: true,
            mobile: true,
        }
    }
}

impl BlockVisibility {
    /// Returns whether the block is hidden on every breakpoint.
    #[must_use]
    pub fn is_hidden_everywhere(&self) -> bool {
        !self.desktop && !self.tablet && !self.mobile
    }
}

/// Entrance effect played when a block scrolls into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntranceAnimation {
    /// No entrance effect.
    #[default]
    None,
    /// Opacity fade.
    FadeIn,
    /// Fade while moving up.
    SlideUp,
    /// Fade while moving down.
    SlideDown,
    /// Fade while growing from 95%.
    ScaleIn,
}

impl EntranceAnimation {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FadeIn => "fadeIn",
            Self::SlideUp => "slideUp",
            Self::SlideDown => "slideDown",
            Self::ScaleIn => "scaleIn",
        }
    }
}

impl FromStr for EntranceAnimation {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" => Ok(Self::None),
            "fadeIn" => Ok(Self::FadeIn),
            "slideUp" => Ok(Self::SlideUp),
            "slideDown" => Ok(Self::SlideDown),
            "scaleIn" => Ok(Self::ScaleIn),
            _ => Err(AppError::Validation(format!(
                "unknown entrance animation '{value}'"
            ))),
        }
    }
}

/// Entrance animation settings for one block.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockAnimation {
    /// Effect kind.
    #[serde(default)]
    pub entrance: EntranceAnimation,
    /// Delay in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    /// Duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// One configured instance of a block type inside a page document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    props: BlockProps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<BlockConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visibility: Option<BlockVisibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    animation: Option<BlockAnimation>,
}

impl BlockConfig {
    /// Creates a block config with validated id and type.
    pub fn new(
        id: impl Into<String>,
        block_type: impl Into<String>,
        props: BlockProps,
    ) -> AppResult<Self> {
        let id = NonEmptyString::new(id)
            .map_err(|_| AppError::Validation("block id must not be empty".to_owned()))?;
        let block_type = NonEmptyString::new(block_type)
            .map_err(|_| AppError::Validation("block type must not be empty".to_owned()))?;

        Ok(Self {
            id: id.into(),
            block_type: block_type.into(),
            props,
            children: None,
            visibility: None,
            animation: None,
        })
    }

    /// Builds a config from trusted built-in content.
    pub(crate) fn authored(id: &str, block_type: &str, props: Value) -> Self {
        Self {
            id: id.to_owned(),
            block_type: block_type.to_owned(),
            props: match props {
                Value::Object(map) => map,
                _ => BlockProps::new(),
            },
            children: None,
            visibility: None,
            animation: None,
        }
    }

    /// Creates a block config with a freshly generated id.
    pub fn with_generated_id(block_type: impl Into<String>, props: BlockProps) -> AppResult<Self> {
        let block_type = block_type.into();
        Self::new(generate_block_id(block_type.as_str()), block_type, props)
    }

    /// Sets nested children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<BlockConfig>) -> Self {
        self.children = Some(children);
        self
    }

    /// Sets breakpoint visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: BlockVisibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Sets entrance animation.
    #[must_use]
    pub fn with_animation(mut self, animation: BlockAnimation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Replaces the id with a freshly generated one.
    pub fn regenerate_id(&mut self) {
        self.id = generate_block_id(self.block_type.as_str());
    }

    /// Returns block id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns registry type key.
    #[must_use]
    pub fn block_type(&self) -> &str {
        self.block_type.as_str()
    }

    /// Returns raw persisted props.
    #[must_use]
    pub fn props(&self) -> &BlockProps {
        &self.props
    }

    /// Returns raw persisted props for in-place edits.
    pub fn props_mut(&mut self) -> &mut BlockProps {
        &mut self.props
    }

    /// Returns nested children, empty when none are declared.
    #[must_use]
    pub fn children(&self) -> &[BlockConfig] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Returns whether a `children` list is declared at all.
    #[must_use]
    pub fn has_children_list(&self) -> bool {
        self.children.is_some()
    }

    /// Returns the children list for in-place edits, creating it when absent.
    pub fn children_mut(&mut self) -> &mut Vec<BlockConfig> {
        self.children.get_or_insert_with(Vec::new)
    }

    /// Returns effective visibility, all breakpoints by default.
    #[must_use]
    pub fn visibility(&self) -> BlockVisibility {
        self.visibility.unwrap_or_default()
    }

    /// Returns configured animation, if any.
    #[must_use]
    pub fn animation(&self) -> Option<&BlockAnimation> {
        self.animation.as_ref()
    }

    /// Returns a string prop.
    #[must_use]
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Returns a boolean prop.
    #[must_use]
    pub fn prop_bool(&self, key: &str) -> Option<bool> {
        self.props.get(key).and_then(Value::as_bool)
    }

    /// Returns the declared field name when it is non-blank.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        self.prop_str("fieldName")
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use serde_json::json;

    use super::{BlockAnimation, BlockConfig, BlockVisibility, EntranceAnimation, generate_block_id};

    #[test]
    fn generated_block_id_carries_type_prefix_and_suffix() {
        let id = generate_block_id("radio-cards");
        let parts: Vec<&str> = id.rsplitn(3, '-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 7);
        assert!(parts[0].chars().all(|ch| ch.is_ascii_alphanumeric()));
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2], "radio-cards");
    }

    #[test]
    fn block_config_rejects_blank_type() {
        let result = BlockConfig::new("block-1", "  ", serde_json::Map::new());
        assert!(result.is_err());
    }

    #[test]
    fn block_config_defaults_visibility_to_all_breakpoints() {
        let block = serde_json::from_value::<BlockConfig>(json!({
            "id": "headline-1",
            "type": "headline",
            "props": {"text": "Hello"}
        }));
        assert!(block.is_ok());
        let block = block.unwrap_or_else(|_| unreachable!());

        assert_eq!(block.visibility(), BlockVisibility::default());
        assert!(block.animation().is_none());
        assert!(block.children().is_empty());
    }

    #[test]
    fn block_config_serializes_camel_case_shape() {
        let block = BlockConfig::new("card-1", "card", serde_json::Map::new())
            .unwrap_or_else(|_| unreachable!())
            .with_visibility(BlockVisibility {
                desktop: true,
                tablet: false,
                mobile: true,
            })
            .with_animation(BlockAnimation {
                entrance: EntranceAnimation::SlideUp,
                delay: Some(0.2),
                duration: None,
            })
            .with_children(Vec::new());

        let value = serde_json::to_value(&block).unwrap_or_default();
        assert_eq!(value["type"], json!("card"));
        assert_eq!(value["animation"]["entrance"], json!("slideUp"));
        assert_eq!(value["visibility"]["tablet"], json!(false));
        assert_eq!(value["children"], json!([]));
    }

    #[test]
    fn field_name_ignores_blank_values() {
        let mut props = serde_json::Map::new();
        props.insert("fieldName".to_owned(), json!("   "));
        let block = BlockConfig::new("text-1", "text-input", props)
            .unwrap_or_else(|_| unreachable!());

        assert!(block.field_name().is_none());
    }

    #[test]
    fn entrance_animation_parses_storage_values() {
        assert_eq!(
            "scaleIn".parse::<EntranceAnimation>().ok(),
            Some(EntranceAnimation::ScaleIn)
        );
        assert!("bounce".parse::<EntranceAnimation>().is_err());
    }

    proptest! {
        #[test]
        fn generated_block_ids_are_unique_across_calls(count in 2_usize..200) {
            let ids: HashSet<String> = (0..count).map(|_| generate_block_id("spacer")).collect();
            prop_assert_eq!(ids.len(), count);
        }
    }
}
