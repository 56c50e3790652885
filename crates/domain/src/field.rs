use std::collections::BTreeMap;
use std::sync::LazyLock;

use pagecraft_core::{AppResult, NonEmptyString};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Submitted field values keyed by field name.
pub type FieldValueMap = Map<String, Value>;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").ok());

// Leading 0 or +64, then 7 to 12 digits, spaces or dashes.
static NZ_PHONE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\+64|0)[\d\s-]{7,12}$").ok());

/// Returns whether a value matches the accepted email shape.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value.trim()))
}

/// Returns whether a value matches the NZ phone pattern.
#[must_use]
pub fn is_valid_nz_phone(value: &str) -> bool {
    NZ_PHONE_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value.trim()))
}

/// Groups NZ phone digits for display, e.g. `0211234567` -> `021 123 4567`.
#[must_use]
pub fn format_nz_phone(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '+')
        .collect();

    if let Some(rest) = cleaned.strip_prefix("+64") {
        return match rest.len() {
            0..=2 => format!("+64 {rest}"),
            3..=5 => format!("+64 {} {}", &rest[..2], &rest[2..]),
            _ => format!(
                "+64 {} {} {}",
                &rest[..2],
                &rest[2..5],
                &rest[5..rest.len().min(9)]
            ),
        };
    }

    if !cleaned.starts_with('0') {
        return cleaned;
    }

    let is_mobile =
        cleaned.len() > 2 && matches!(&cleaned[1..3], "21" | "22" | "27" | "28" | "29");
    let (prefix_len, middle_len) = if is_mobile { (3, 3) } else { (2, 3) };
    let middle_end = prefix_len + middle_len;

    if cleaned.len() <= prefix_len {
        return cleaned;
    }
    if cleaned.len() <= middle_end {
        return format!("{} {}", &cleaned[..prefix_len], &cleaned[prefix_len..]);
    }

    let tail_end = cleaned.len().min(middle_end + 4);
    format!(
        "{} {} {}",
        &cleaned[..prefix_len],
        &cleaned[prefix_len..middle_end],
        &cleaned[middle_end..tail_end]
    )
}

/// Validation rule attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldRule {
    /// Free text.
    Text,
    /// Email address.
    Email,
    /// NZ phone number.
    Phone,
    /// Boolean agreement.
    Consent,
    /// Single choice among declared option values.
    Choice {
        /// Accepted option values.
        options: Vec<String>,
    },
    /// Property address text.
    Address,
}

/// Form field declared by one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    field_name: NonEmptyString,
    block_id: String,
    block_type: String,
    label: String,
    required: bool,
    rule: FieldRule,
    auto_advance: bool,
}

impl FieldSpec {
    /// Creates a field spec.
    pub fn new(
        field_name: impl Into<String>,
        block_id: impl Into<String>,
        block_type: impl Into<String>,
        label: impl Into<String>,
        required: bool,
        rule: FieldRule,
    ) -> AppResult<Self> {
        Ok(Self {
            field_name: NonEmptyString::new(field_name)?,
            block_id: block_id.into(),
            block_type: block_type.into(),
            label: label.into(),
            required,
            rule,
            auto_advance: false,
        })
    }

    /// Marks this field as advancing the flow once a value is committed.
    #[must_use]
    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    /// Returns payload key.
    #[must_use]
    pub fn field_name(&self) -> &str {
        self.field_name.as_str()
    }

    /// Returns owning block id.
    #[must_use]
    pub fn block_id(&self) -> &str {
        self.block_id.as_str()
    }

    /// Returns owning block type.
    #[must_use]
    pub fn block_type(&self) -> &str {
        self.block_type.as_str()
    }

    /// Returns display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns whether a value must be present.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Returns validation rule.
    #[must_use]
    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }

    /// Returns whether committing a value advances the flow.
    #[must_use]
    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    fn required_message(&self) -> String {
        let label = self.label.trim();
        if label.is_empty() {
            "This field is required".to_owned()
        } else {
            format!("{label} is required")
        }
    }
}

/// Field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Failing field name.
    pub field_name: String,
    /// User-facing message.
    pub message: String,
}

/// Validation failures keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Records one failure, replacing an earlier one for the same field.
    pub fn insert(&mut self, error: FieldError) {
        self.0.insert(error.field_name, error.message);
    }

    /// Clears the failure of one field.
    pub fn remove(&mut self, field_name: &str) {
        self.0.remove(field_name);
    }

    /// Returns the message for one field.
    #[must_use]
    pub fn get(&self, field_name: &str) -> Option<&str> {
        self.0.get(field_name).map(String::as_str)
    }

    /// Returns whether no failures are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates failing field names and messages in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(field_name, message)| (field_name.as_str(), message.as_str()))
    }

    /// Renders failures as one summary line.
    #[must_use]
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(field_name, message)| format!("{field_name}: {message}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn present_text(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

/// Validates one field value against its spec.
#[must_use]
pub fn validate_field(spec: &FieldSpec, value: Option<&Value>) -> Option<FieldError> {
    let message = match spec.rule() {
        FieldRule::Text | FieldRule::Address => {
            (spec.required() && present_text(value).is_none()).then(|| spec.required_message())
        }
        FieldRule::Email => match present_text(value) {
            Some(text) if !is_valid_email(text) => {
                Some("Please enter a valid email address".to_owned())
            }
            Some(_) => None,
            None if !is_absent(value) => Some("Please enter a valid email address".to_owned()),
            None => spec.required().then(|| "Email is required".to_owned()),
        },
        FieldRule::Phone => match present_text(value) {
            Some(text) if !is_valid_nz_phone(text) => {
                Some("Please enter a valid NZ phone number".to_owned())
            }
            Some(_) => None,
            None if !is_absent(value) => Some("Please enter a valid NZ phone number".to_owned()),
            None => spec.required().then(|| spec.required_message()),
        },
        FieldRule::Consent => {
            let agreed = matches!(value, Some(Value::Bool(true)));
            (spec.required() && !agreed).then(|| "You must agree to continue".to_owned())
        }
        FieldRule::Choice { options } => match present_text(value) {
            Some(text) if !options.iter().any(|option| option == text) => {
                Some("Please select a valid option".to_owned())
            }
            Some(_) => None,
            None if !is_absent(value) => Some("Please select a valid option".to_owned()),
            None => spec.required().then(|| "Please select an option".to_owned()),
        },
    };

    message.map(|message| FieldError {
        field_name: spec.field_name().to_owned(),
        message,
    })
}

/// Validates every spec against a value map.
#[must_use]
pub fn validate_fields<'a>(
    specs: impl IntoIterator<Item = &'a FieldSpec>,
    values: &FieldValueMap,
) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for spec in specs {
        if let Some(error) = validate_field(spec, values.get(spec.field_name())) {
            errors.insert(error);
        }
    }

    errors
}
