use std::sync::Arc;

use pagecraft_core::{AppError, AppResult};
use pagecraft_domain::{BlockConfig, FieldRule, FieldSpec, format_nz_phone};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    decode_props, default_props, ensure_count_in, lenient_count, missing_field_name,
    resolved_props,
};
use crate::renderer::{BlockContent, RenderContext};
use crate::{Block, BlockCategory, BlockMetadata, BlockRegistry, PropSchema, PropType};

pub(super) fn register(registry: &mut BlockRegistry) {
    registry.register(
        "address-finder",
        Arc::new(AddressFinderBlock),
        BlockMetadata::new(
            "Address Finder",
            "NZ address autocomplete with map integration",
            BlockCategory::Form,
            "MapPin",
            default_props::<AddressFinderProps>(),
        )
        .with_schema(vec![
            PropSchema::text("label", "Label"),
            PropSchema::text("placeholder", "Placeholder"),
            PropSchema::text("helperText", "Helper Text"),
            PropSchema::boolean("required", "Required"),
            PropSchema::text("fieldName", "Field Name"),
        ]),
    );

    registry.register(
        "text-input",
        Arc::new(TextInputBlock),
        BlockMetadata::new(
            "Text Input",
            "Single line text input field",
            BlockCategory::Form,
            "Type",
            default_props::<TextInputProps>(),
        )
        .with_schema(vec![
            PropSchema::text("label", "Label"),
            PropSchema::text("placeholder", "Placeholder"),
            PropSchema::text("helperText", "Helper Text"),
            PropSchema::boolean("required", "Required"),
            PropSchema::text("fieldName", "Field Name").required(),
            PropSchema::select("type", "Input Type", &[("Text", "text"), ("Phone", "tel")]),
            PropSchema::text("autoComplete", "Autocomplete"),
        ]),
    );

    registry.register(
        "email-input",
        Arc::new(EmailInputBlock),
        BlockMetadata::new(
            "Email Input",
            "Email address input with validation",
            BlockCategory::Form,
            "Mail",
            default_props::<EmailInputProps>(),
        )
        .with_schema(vec![
            PropSchema::text("label", "Label"),
            PropSchema::text("placeholder", "Placeholder"),
            PropSchema::text("helperText", "Helper Text"),
            PropSchema::boolean("required", "Required"),
            PropSchema::text("fieldName", "Field Name"),
        ]),
    );

    registry.register(
        "phone-input",
        Arc::new(PhoneInputBlock),
        BlockMetadata::new(
            "Phone Input",
            "NZ phone number input with formatting",
            BlockCategory::Form,
            "Phone",
            default_props::<PhoneInputProps>(),
        )
        .with_schema(vec![
            PropSchema::text("label", "Label"),
            PropSchema::text("placeholder", "Placeholder"),
            PropSchema::text("helperText", "Helper Text"),
            PropSchema::boolean("required", "Required"),
            PropSchema::text("fieldName", "Field Name"),
        ]),
    );

    registry.register(
        "radio-cards",
        Arc::new(RadioCardsBlock),
        BlockMetadata::new(
            "Radio Cards",
            "Visual card-style radio button selection",
            BlockCategory::Form,
            "LayoutGrid",
            default_props::<RadioCardsProps>(),
        )
        .with_schema(vec![
            PropSchema::text("label", "Label"),
            PropSchema::text("helperText", "Helper Text"),
            PropSchema::boolean("required", "Required"),
            PropSchema::text("fieldName", "Field Name").required(),
            PropSchema::new("options", "Options", PropType::Array),
            PropSchema::select(
                "columns",
                "Columns",
                &[
                    ("1 Column", "1"),
                    ("2 Columns", "2"),
                    ("3 Columns", "3"),
                    ("4 Columns", "4"),
                ],
            ),
            PropSchema::boolean("autoAdvance", "Auto-advance on selection"),
        ]),
    );

    registry.register(
        "checkbox",
        Arc::new(CheckboxBlock),
        BlockMetadata::new(
            "Checkbox",
            "Single checkbox for consent or options",
            BlockCategory::Form,
            "CheckSquare",
            default_props::<CheckboxProps>(),
        )
        .with_schema(vec![
            PropSchema::text("label", "Label").required(),
            PropSchema::text("helperText", "Helper Text"),
            PropSchema::boolean("required", "Required"),
            PropSchema::text("fieldName", "Field Name").required(),
            PropSchema::text("linkText", "Link Text (in label)"),
            PropSchema::text("linkUrl", "Link URL"),
        ]),
    );
}

fn field_spec(
    config: &BlockConfig,
    field_name: &str,
    label: &str,
    required: bool,
    rule: FieldRule,
) -> AppResult<FieldSpec> {
    let field_name = field_name.trim();
    if field_name.is_empty() {
        return Err(missing_field_name(config));
    }

    FieldSpec::new(
        field_name,
        config.id(),
        config.block_type(),
        label,
        required,
        rule,
    )
    .map_err(|error| AppError::Configuration(error.to_string()))
}

fn render_field<P: Serialize>(
    component: &str,
    config: &BlockConfig,
    props: &P,
    spec: &FieldSpec,
    context: &RenderContext<'_>,
) -> AppResult<BlockContent> {
    Ok(BlockContent::new(component, resolved_props(config, props)?)
        .with_field(context.field_binding(spec)))
}

/// Props of `address-finder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddressFinderProps {
    /// Field label.
    pub label: String,
    /// Input placeholder.
    pub placeholder: String,
    /// Hint shown under the input.
    pub helper_text: String,
    /// Whether an address is required.
    pub required: bool,
    /// Payload key.
    pub field_name: String,
    /// Message shown when no suggestion was picked.
    pub error_message: String,
}

impl Default for AddressFinderProps {
    fn default() -> Self {
        Self {
            label: "Property Address".to_owned(),
            placeholder: "Start typing your address...".to_owned(),
            helper_text: "Enter your property address to get started".to_owned(),
            required: true,
            field_name: "address".to_owned(),
            error_message: "Please select an address from the suggestions".to_owned(),
        }
    }
}

struct AddressFinderBlock;

impl AddressFinderBlock {
    fn spec(config: &BlockConfig, props: &AddressFinderProps) -> AppResult<FieldSpec> {
        field_spec(
            config,
            &props.field_name,
            &props.label,
            props.required,
            FieldRule::Address,
        )
    }
}

impl Block for AddressFinderBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: AddressFinderProps = decode_props(config)?;
        let spec = Self::spec(config, &props)?;
        render_field("AddressFinder", config, &props, &spec, context)
    }

    fn field_spec(&self, config: &BlockConfig) -> AppResult<Option<FieldSpec>> {
        let props: AddressFinderProps = decode_props(config)?;
        Self::spec(config, &props).map(Some)
    }
}

/// Props of `text-input`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextInputProps {
    /// Field label.
    pub label: String,
    /// Input placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Hint shown under the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    /// Whether a value is required.
    pub required: bool,
    /// Payload key.
    pub field_name: String,
    /// HTML input type, `text` or `tel`.
    #[serde(rename = "type")]
    pub input_type: String,
    /// Browser autocomplete hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_complete: Option<String>,
    /// Maximum input length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

impl Default for TextInputProps {
    fn default() -> Self {
        Self {
            label: "Text Field".to_owned(),
            placeholder: Some("Enter text...".to_owned()),
            helper_text: None,
            required: false,
            field_name: "textField".to_owned(),
            input_type: "text".to_owned(),
            auto_complete: None,
            max_length: None,
        }
    }
}

struct TextInputBlock;

impl TextInputBlock {
    fn spec(config: &BlockConfig, props: &TextInputProps) -> AppResult<FieldSpec> {
        let label = if props.label.trim().is_empty() {
            props.field_name.as_str()
        } else {
            props.label.as_str()
        };
        field_spec(
            config,
            &props.field_name,
            label,
            props.required,
            FieldRule::Text,
        )
    }
}

impl Block for TextInputBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: TextInputProps = decode_props(config)?;
        if !matches!(props.input_type.as_str(), "text" | "tel") {
            return Err(AppError::Configuration(format!(
                "block '{}' (text-input) has unsupported input type '{}'",
                config.id(),
                props.input_type
            )));
        }
        let spec = Self::spec(config, &props)?;
        render_field("TextInput", config, &props, &spec, context)
    }

    fn field_spec(&self, config: &BlockConfig) -> AppResult<Option<FieldSpec>> {
        let props: TextInputProps = decode_props(config)?;
        Self::spec(config, &props).map(Some)
    }
}

/// Props of `email-input`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailInputProps {
    /// Field label.
    pub label: String,
    /// Input placeholder.
    pub placeholder: String,
    /// Hint shown under the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    /// Whether an address is required.
    pub required: bool,
    /// Payload key.
    pub field_name: String,
}

impl Default for EmailInputProps {
    fn default() -> Self {
        Self {
            label: "Email Address".to_owned(),
            placeholder: "you@example.com".to_owned(),
            helper_text: None,
            required: true,
            field_name: "email".to_owned(),
        }
    }
}

struct EmailInputBlock;

impl EmailInputBlock {
    fn spec(config: &BlockConfig, props: &EmailInputProps) -> AppResult<FieldSpec> {
        field_spec(
            config,
            &props.field_name,
            &props.label,
            props.required,
            FieldRule::Email,
        )
    }
}

impl Block for EmailInputBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: EmailInputProps = decode_props(config)?;
        let spec = Self::spec(config, &props)?;
        render_field("EmailInput", config, &props, &spec, context)
    }

    fn field_spec(&self, config: &BlockConfig) -> AppResult<Option<FieldSpec>> {
        let props: EmailInputProps = decode_props(config)?;
        Self::spec(config, &props).map(Some)
    }
}

/// Props of `phone-input`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhoneInputProps {
    /// Field label.
    pub label: String,
    /// Input placeholder.
    pub placeholder: String,
    /// Hint shown under the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    /// Whether a number is required.
    pub required: bool,
    /// Payload key.
    pub field_name: String,
}

impl Default for PhoneInputProps {
    fn default() -> Self {
        Self {
            label: "Phone Number".to_owned(),
            placeholder: "021 123 4567".to_owned(),
            helper_text: None,
            required: true,
            field_name: "phone".to_owned(),
        }
    }
}

struct PhoneInputBlock;

impl PhoneInputBlock {
    fn spec(config: &BlockConfig, props: &PhoneInputProps) -> AppResult<FieldSpec> {
        field_spec(
            config,
            &props.field_name,
            &props.label,
            props.required,
            FieldRule::Phone,
        )
    }
}

impl Block for PhoneInputBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: PhoneInputProps = decode_props(config)?;
        let spec = Self::spec(config, &props)?;
        let binding = context.field_binding(&spec).map(|mut binding| {
            binding.display_value = binding
                .value
                .as_ref()
                .and_then(Value::as_str)
                .map(format_nz_phone);
            binding
        });

        Ok(BlockContent::new("PhoneInput", resolved_props(config, &props)?).with_field(binding))
    }

    fn field_spec(&self, config: &BlockConfig) -> AppResult<Option<FieldSpec>> {
        let props: PhoneInputProps = decode_props(config)?;
        Self::spec(config, &props).map(Some)
    }
}

/// One selectable card of `radio-cards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioOption {
    /// Submitted value.
    pub value: String,
    /// Card title.
    pub label: String,
    /// Card subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl RadioOption {
    fn new(value: &str, label: &str, icon: &str) -> Self {
        Self {
            value: value.to_owned(),
            label: label.to_owned(),
            description: None,
            icon: Some(icon.to_owned()),
        }
    }
}

/// Props of `radio-cards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadioCardsProps {
    /// Question label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Hint shown under the question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    /// Whether a selection is required.
    pub required: bool,
    /// Payload key.
    pub field_name: String,
    /// Selectable cards.
    pub options: Vec<RadioOption>,
    /// Grid columns, 1 to 4.
    #[serde(deserialize_with = "lenient_count")]
    pub columns: u32,
    /// Advances to the next step once a card is picked.
    pub auto_advance: bool,
}

impl Default for RadioCardsProps {
    fn default() -> Self {
        Self {
            label: Some("Select an option".to_owned()),
            helper_text: None,
            required: true,
            field_name: "selection".to_owned(),
            options: vec![
                RadioOption::new("option1", "Option 1", "Home"),
                RadioOption::new("option2", "Option 2", "Building"),
            ],
            columns: 2,
            auto_advance: false,
        }
    }
}

struct RadioCardsBlock;

impl RadioCardsBlock {
    fn spec(config: &BlockConfig, props: &RadioCardsProps) -> AppResult<FieldSpec> {
        let options = props
            .options
            .iter()
            .map(|option| option.value.clone())
            .collect();
        Ok(field_spec(
            config,
            &props.field_name,
            props.label.as_deref().unwrap_or_default(),
            props.required,
            FieldRule::Choice { options },
        )?
        .with_auto_advance(props.auto_advance))
    }
}

impl Block for RadioCardsBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: RadioCardsProps = decode_props(config)?;
        ensure_count_in(config, "columns", props.columns, &[1, 2, 3, 4])?;
        let spec = Self::spec(config, &props)?;
        render_field("RadioCards", config, &props, &spec, context)
    }

    fn field_spec(&self, config: &BlockConfig) -> AppResult<Option<FieldSpec>> {
        let props: RadioCardsProps = decode_props(config)?;
        Self::spec(config, &props).map(Some)
    }
}

/// Props of `checkbox`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckboxProps {
    /// Agreement text.
    pub label: String,
    /// Hint shown under the checkbox.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    /// Whether the box must be ticked.
    pub required: bool,
    /// Payload key.
    pub field_name: String,
    /// Part of the label rendered as a link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    /// Link target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}

impl Default for CheckboxProps {
    fn default() -> Self {
        Self {
            label: "I agree to the terms and conditions".to_owned(),
            helper_text: None,
            required: true,
            field_name: "consent".to_owned(),
            link_text: Some("terms and conditions".to_owned()),
            link_url: Some("/terms".to_owned()),
        }
    }
}

struct CheckboxBlock;

impl CheckboxBlock {
    fn spec(config: &BlockConfig, props: &CheckboxProps) -> AppResult<FieldSpec> {
        field_spec(
            config,
            &props.field_name,
            &props.label,
            props.required,
            FieldRule::Consent,
        )
    }
}

impl Block for CheckboxBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: CheckboxProps = decode_props(config)?;
        let spec = Self::spec(config, &props)?;
        render_field("Checkbox", config, &props, &spec, context)
    }

    fn field_spec(&self, config: &BlockConfig) -> AppResult<Option<FieldSpec>> {
        let props: CheckboxProps = decode_props(config)?;
        Self::spec(config, &props).map(Some)
    }
}
