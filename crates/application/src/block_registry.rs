use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;

use pagecraft_core::{AppError, AppResult};
use pagecraft_domain::{BlockConfig, BlockProps, BlockVisibility, FieldSpec, generate_block_id};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::renderer::{BlockContent, RenderContext};

/// Behavior of one block type.
pub trait Block: Send + Sync {
    /// Produces the type-specific content of one block instance.
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent>;

    /// Returns the form field this block declares, if any.
    fn field_spec(&self, _config: &BlockConfig) -> AppResult<Option<FieldSpec>> {
        Ok(None)
    }

    /// Returns blocks nested inside this block.
    fn nested_blocks<'a>(&self, config: &'a BlockConfig) -> AppResult<Cow<'a, [BlockConfig]>> {
        Ok(Cow::Borrowed(config.children()))
    }

    /// Returns where this block keeps nested blocks for editing.
    fn slot_storage(&self) -> SlotStorage {
        SlotStorage::None
    }
}

/// Where a block type persists its nested blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStorage {
    /// Not a container.
    None,
    /// One slot in the config's `children` list.
    Children,
    /// One slot per entry of a props array, each holding a block list.
    PropList {
        /// Props key of the array.
        list_key: &'static str,
        /// Key of the block list inside each entry.
        blocks_key: &'static str,
    },
}

/// Editor block-picker categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockCategory {
    /// Input fields.
    Form,
    /// Static text and media.
    Content,
    /// Testimonials, stats, agents.
    SocialProof,
    /// Containers and grids.
    Layout,
    /// Buttons, progress, badges.
    Conversion,
}

impl BlockCategory {
    /// Every category in picker order.
    pub const ALL: [Self; 5] = [
        Self::Form,
        Self::Content,
        Self::SocialProof,
        Self::Layout,
        Self::Conversion,
    ];

    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Content => "content",
            Self::SocialProof => "social-proof",
            Self::Layout => "layout",
            Self::Conversion => "conversion",
        }
    }
}

impl FromStr for BlockCategory {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "form" => Ok(Self::Form),
            "content" => Ok(Self::Content),
            "social-proof" => Ok(Self::SocialProof),
            "layout" => Ok(Self::Layout),
            "conversion" => Ok(Self::Conversion),
            _ => Err(AppError::Validation(format!(
                "unknown block category '{value}'"
            ))),
        }
    }
}

/// Editor widget kind of one prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// Number input.
    Number,
    /// Toggle.
    Boolean,
    /// Dropdown of fixed options.
    Select,
    /// Color picker.
    Color,
    /// Image url.
    Image,
    /// Repeating list.
    Array,
}

/// One choice of a select prop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropOption {
    /// Display label.
    pub label: String,
    /// Stored value.
    pub value: String,
}

/// Editable-property descriptor read by the editing UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropSchema {
    key: String,
    label: String,
    #[serde(rename = "type")]
    prop_type: PropType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<PropOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
}

impl PropSchema {
    /// Creates a descriptor of the given widget kind.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, prop_type: PropType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            prop_type,
            options: None,
            default: None,
            required: false,
            placeholder: None,
        }
    }

    /// Creates a single-line text descriptor.
    #[must_use]
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, PropType::Text)
    }

    /// Creates a boolean toggle descriptor.
    #[must_use]
    pub fn boolean(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, PropType::Boolean)
    }

    /// Creates a select descriptor from `(label, value)` pairs.
    #[must_use]
    pub fn select(key: impl Into<String>, label: impl Into<String>, options: &[(&str, &str)]) -> Self {
        let mut schema = Self::new(key, label, PropType::Select);
        schema.options = Some(
            options
                .iter()
                .map(|(label, value)| PropOption {
                    label: (*label).to_owned(),
                    value: (*value).to_owned(),
                })
                .collect(),
        );
        schema
    }

    /// Marks the prop as required in the editor.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default used when the block's default props omit this key.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Sets editor placeholder text.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Returns prop key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns editor label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns widget kind.
    #[must_use]
    pub fn prop_type(&self) -> PropType {
        self.prop_type
    }

    /// Returns select options.
    #[must_use]
    pub fn options(&self) -> &[PropOption] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Returns default value.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns whether the editor requires a value.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Registry-side description of one block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMetadata {
    #[serde(rename = "type")]
    block_type: String,
    name: String,
    description: String,
    category: BlockCategory,
    icon: String,
    default_props: BlockProps,
    props_schema: Vec<PropSchema>,
}

impl BlockMetadata {
    /// Creates metadata; the type key is assigned on registration.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: BlockCategory,
        icon: impl Into<String>,
        default_props: BlockProps,
    ) -> Self {
        Self {
            block_type: String::new(),
            name: name.into(),
            description: description.into(),
            category,
            icon: icon.into(),
            default_props,
            props_schema: Vec::new(),
        }
    }

    /// Sets the editable-property descriptors.
    #[must_use]
    pub fn with_schema(mut self, props_schema: Vec<PropSchema>) -> Self {
        self.props_schema = props_schema;
        self
    }

    /// Returns registry type key.
    #[must_use]
    pub fn block_type(&self) -> &str {
        self.block_type.as_str()
    }

    /// Returns display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns picker description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns picker category.
    #[must_use]
    pub fn category(&self) -> BlockCategory {
        self.category
    }

    /// Returns icon name.
    #[must_use]
    pub fn icon(&self) -> &str {
        self.icon.as_str()
    }

    /// Returns default props.
    #[must_use]
    pub fn default_props(&self) -> &BlockProps {
        &self.default_props
    }

    /// Returns editable-property descriptors.
    #[must_use]
    pub fn props_schema(&self) -> &[PropSchema] {
        &self.props_schema
    }

    /// Aligns schema defaults and default props so neither contradicts the other.
    fn reconcile_defaults(&mut self) {
        for schema in &mut self.props_schema {
            match self.default_props.get(schema.key.as_str()) {
                Some(value) => schema.default = Some(value.clone()),
                None => {
                    if let Some(default) = &schema.default {
                        self.default_props.insert(schema.key.clone(), default.clone());
                    }
                }
            }
        }
    }
}

#[derive(Clone)]
struct RegisteredBlock {
    block: Arc<dyn Block>,
    metadata: BlockMetadata,
}

/// Lookup table from block type key to behavior and metadata.
#[derive(Clone, Default)]
pub struct BlockRegistry {
    entries: HashMap<String, RegisteredBlock>,
}

impl BlockRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in block type.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::blocks::register_builtin(&mut registry);
        registry
    }

    /// Registers a block type. A later registration of the same key replaces the earlier one.
    pub fn register(
        &mut self,
        block_type: impl Into<String>,
        block: Arc<dyn Block>,
        mut metadata: BlockMetadata,
    ) {
        let block_type = block_type.into();
        metadata.block_type = block_type.clone();
        metadata.reconcile_defaults();
        self.entries
            .insert(block_type, RegisteredBlock { block, metadata });
    }

    /// Returns the behavior of a block type.
    #[must_use]
    pub fn get_component(&self, block_type: &str) -> Option<Arc<dyn Block>> {
        self.entries
            .get(block_type)
            .map(|entry| Arc::clone(&entry.block))
    }

    /// Returns the metadata of a block type.
    #[must_use]
    pub fn get_metadata(&self, block_type: &str) -> Option<&BlockMetadata> {
        self.entries.get(block_type).map(|entry| &entry.metadata)
    }

    /// Creates a fresh config with default props, a new unique id, and default visibility.
    #[must_use]
    pub fn create_default_config(&self, block_type: &str) -> Option<BlockConfig> {
        let metadata = self.get_metadata(block_type)?;
        BlockConfig::new(
            generate_block_id(block_type),
            block_type,
            metadata.default_props.clone(),
        )
        .ok()
        .map(|config| config.with_visibility(BlockVisibility::default()))
    }

    /// Groups metadata by category; every category is present, entries sorted by name.
    #[must_use]
    pub fn get_by_category(&self) -> BTreeMap<BlockCategory, Vec<&BlockMetadata>> {
        let mut grouped: BTreeMap<BlockCategory, Vec<&BlockMetadata>> = BlockCategory::ALL
            .into_iter()
            .map(|category| (category, Vec::new()))
            .collect();

        for entry in self.entries.values() {
            grouped
                .entry(entry.metadata.category)
                .or_default()
                .push(&entry.metadata);
        }

        for metadata in grouped.values_mut() {
            metadata.sort_by(|left, right| left.name.cmp(&right.name));
        }

        grouped
    }

    /// Returns every registered type key, sorted.
    #[must_use]
    pub fn all_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Returns whether a type key is registered.
    #[must_use]
    pub fn has(&self, block_type: &str) -> bool {
        self.entries.contains_key(block_type)
    }

    /// Returns the form field declared by a block; unknown types declare none.
    pub fn field_spec(&self, config: &BlockConfig) -> AppResult<Option<FieldSpec>> {
        match self.entries.get(config.block_type()) {
            Some(entry) => entry.block.field_spec(config),
            None => Ok(None),
        }
    }

    /// Returns where a block type keeps nested blocks; unknown types are not containers.
    #[must_use]
    pub fn slot_storage(&self, block_type: &str) -> SlotStorage {
        self.entries
            .get(block_type)
            .map_or(SlotStorage::None, |entry| entry.block.slot_storage())
    }

    /// Returns blocks nested inside a block; unknown types fall back to `children`.
    pub fn nested_blocks<'a>(&self, config: &'a BlockConfig) -> AppResult<Cow<'a, [BlockConfig]>> {
        match self.entries.get(config.block_type()) {
            Some(entry) => entry.block.nested_blocks(config),
            None => Ok(Cow::Borrowed(config.children())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use pagecraft_core::AppResult;
    use pagecraft_domain::{BlockConfig, BlockVisibility};
    use serde_json::{Map, json};

    use super::{Block, BlockCategory, BlockMetadata, BlockRegistry, PropSchema};
    use crate::renderer::{BlockContent, RenderContext};

    struct MarkerBlock(&'static str);

    impl Block for MarkerBlock {
        fn render(
            &self,
            config: &BlockConfig,
            _context: &RenderContext<'_>,
        ) -> AppResult<BlockContent> {
            Ok(BlockContent::new(self.0, serde_json::Value::Object(config.props().clone())))
        }
    }

    fn marker_metadata(name: &str) -> BlockMetadata {
        let mut defaults = Map::new();
        defaults.insert("tone".to_owned(), json!("warm"));
        BlockMetadata::new(name, "marker", BlockCategory::Content, "Star", defaults).with_schema(
            vec![
                PropSchema::select("tone", "Tone", &[("Warm", "warm"), ("Cool", "cool")]),
                PropSchema::text("caption", "Caption").with_default(json!("hi")),
            ],
        )
    }

    #[test]
    fn every_builtin_default_config_satisfies_schema_defaults() {
        let registry = BlockRegistry::builtin();

        for block_type in registry.all_types() {
            let metadata = registry.get_metadata(block_type);
            assert!(metadata.is_some());
            let metadata = metadata.unwrap_or_else(|| unreachable!());

            let config = registry.create_default_config(block_type);
            assert!(config.is_some());
            let config = config.unwrap_or_else(|| unreachable!());

            assert_eq!(config.block_type(), block_type);
            assert_eq!(config.visibility(), BlockVisibility::default());
            for schema in metadata.props_schema() {
                if let Some(default) = schema.default_value() {
                    assert_eq!(
                        config.props().get(schema.key()),
                        Some(default),
                        "{block_type}.{}",
                        schema.key()
                    );
                }
            }
        }
    }

    #[test]
    fn default_config_ids_are_unique_across_calls() {
        let registry = BlockRegistry::builtin();
        let ids: HashSet<String> = (0..50)
            .filter_map(|_| registry.create_default_config("headline"))
            .map(|config| config.id().to_owned())
            .collect();

        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn unknown_types_return_none() {
        let registry = BlockRegistry::builtin();

        assert!(registry.get_component("marquee").is_none());
        assert!(registry.get_metadata("marquee").is_none());
        assert!(registry.create_default_config("marquee").is_none());
        assert!(!registry.has("marquee"));
    }

    #[test]
    fn builtin_registry_covers_all_categories() {
        let registry = BlockRegistry::builtin();
        let grouped = registry.get_by_category();

        assert_eq!(registry.all_types().len(), 20);
        assert_eq!(grouped.len(), 5);
        assert_eq!(grouped[&BlockCategory::Form].len(), 6);
        assert_eq!(grouped[&BlockCategory::Content].len(), 5);
        assert_eq!(grouped[&BlockCategory::SocialProof].len(), 3);
        assert_eq!(grouped[&BlockCategory::Layout].len(), 3);
        assert_eq!(grouped[&BlockCategory::Conversion].len(), 3);
    }

    #[test]
    fn empty_registry_still_lists_every_category() {
        let registry = BlockRegistry::new();
        let grouped = registry.get_by_category();
        assert_eq!(grouped.len(), 5);
        assert!(grouped.values().all(Vec::is_empty));
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = BlockRegistry::new();
        registry.register("marker", Arc::new(MarkerBlock("first")), marker_metadata("First"));
        registry.register("marker", Arc::new(MarkerBlock("second")), marker_metadata("Second"));

        assert_eq!(registry.all_types(), vec!["marker"]);
        assert_eq!(
            registry.get_metadata("marker").map(BlockMetadata::name),
            Some("Second")
        );
    }

    #[test]
    fn registration_reconciles_schema_and_default_props() {
        let mut registry = BlockRegistry::new();
        registry.register("marker", Arc::new(MarkerBlock("m")), marker_metadata("Marker"));

        let metadata = registry
            .get_metadata("marker")
            .unwrap_or_else(|| unreachable!());
        assert_eq!(metadata.block_type(), "marker");
        assert_eq!(metadata.props_schema()[0].default_value(), Some(&json!("warm")));
        assert_eq!(metadata.default_props().get("caption"), Some(&json!("hi")));
    }
}
