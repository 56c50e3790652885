use pagecraft_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::BlockConfig;
use crate::field::is_valid_email;

/// Fallback label of the final submit button.
pub const DEFAULT_SUBMIT_BUTTON_TEXT: &str = "Submit";
/// Fallback title shown after a successful submission.
pub const DEFAULT_SUCCESS_TITLE: &str = "Thank You!";
/// Fallback message shown after a successful submission.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "We've received your submission.";

/// Layout hint of one form step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepLayout {
    /// One field per row.
    #[default]
    Single,
    /// Two fields per row on wide screens.
    TwoColumn,
}

impl StepLayout {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::TwoColumn => "two-column",
        }
    }
}

/// One page of a multi-step form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStep {
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    blocks: Vec<BlockConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layout: Option<StepLayout>,
}

impl FormStep {
    /// Creates a validated form step.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        blocks: Vec<BlockConfig>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?.into(),
            title: title.into(),
            description: None,
            blocks,
            layout: None,
        })
    }

    pub(crate) fn authored(id: &str, title: &str, blocks: Vec<BlockConfig>) -> Self {
        Self {
            id: id.to_owned(),
            title: title.to_owned(),
            description: None,
            blocks,
            layout: None,
        }
    }

    /// Sets step description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets step layout hint.
    #[must_use]
    pub fn with_layout(mut self, layout: StepLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Returns step id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns step title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns field blocks of this step.
    #[must_use]
    pub fn blocks(&self) -> &[BlockConfig] {
        &self.blocks
    }

    /// Returns field blocks for in-place edits.
    pub fn blocks_mut(&mut self) -> &mut Vec<BlockConfig> {
        &mut self.blocks
    }

    /// Returns effective layout.
    #[must_use]
    pub fn layout(&self) -> StepLayout {
        self.layout.unwrap_or_default()
    }
}

/// Post-submission actions consumed by the lead pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAction {
    /// Webhook receiving every accepted lead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Notification recipient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_to: Option<String>,
    /// Page the visitor is sent to after success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl SubmitAction {
    /// Validates action targets.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(webhook_url) = non_blank(self.webhook_url.as_deref()) {
            validate_absolute_http_url("webhookUrl", webhook_url)?;
        }

        if let Some(redirect_url) = non_blank(self.redirect_url.as_deref()) {
            // relative redirects stay on the same site
            if !redirect_url.starts_with('/') {
                validate_absolute_http_url("redirectUrl", redirect_url)?;
            }
        }

        if let Some(email_to) = non_blank(self.email_to.as_deref())
            && !is_valid_email(email_to)
        {
            return Err(AppError::Validation(format!(
                "submit action emailTo '{email_to}' is not a valid email address"
            )));
        }

        Ok(())
    }

    /// Returns the webhook url when configured.
    #[must_use]
    pub fn webhook_url(&self) -> Option<&str> {
        non_blank(self.webhook_url.as_deref())
    }

    /// Returns the notification recipient when configured.
    #[must_use]
    pub fn email_to(&self) -> Option<&str> {
        non_blank(self.email_to.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn validate_absolute_http_url(key: &str, value: &str) -> AppResult<()> {
    let parsed = Url::parse(value).map_err(|error| {
        AppError::Validation(format!("submit action {key} '{value}' is invalid: {error}"))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "submit action {key} must use http or https"
        )));
    }

    Ok(())
}

/// Ordered steps plus submission outcome configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFlow {
    #[serde(default)]
    steps: Vec<FormStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    submit_button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    success_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    success_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    submit_action: Option<SubmitAction>,
}

impl FormFlow {
    /// Creates a flow from ordered steps.
    #[must_use]
    pub fn new(steps: Vec<FormStep>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Sets submit button label.
    #[must_use]
    pub fn with_submit_button_text(mut self, text: impl Into<String>) -> Self {
        self.submit_button_text = Some(text.into());
        self
    }

    /// Sets success title and message.
    #[must_use]
    pub fn with_success(mut self, title: impl Into<String>, message: impl Into<String>) -> Self {
        self.success_title = Some(title.into());
        self.success_message = Some(message.into());
        self
    }

    /// Sets post-submission actions.
    #[must_use]
    pub fn with_submit_action(mut self, submit_action: SubmitAction) -> Self {
        self.submit_action = Some(submit_action);
        self
    }

    /// Returns ordered steps.
    #[must_use]
    pub fn steps(&self) -> &[FormStep] {
        &self.steps
    }

    /// Returns steps for in-place edits.
    pub fn steps_mut(&mut self) -> &mut Vec<FormStep> {
        &mut self.steps
    }

    /// Returns number of steps.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Returns the step at a one-based position.
    #[must_use]
    pub fn step(&self, number: usize) -> Option<&FormStep> {
        number.checked_sub(1).and_then(|index| self.steps.get(index))
    }

    /// Returns effective submit button label.
    #[must_use]
    pub fn submit_button_text(&self) -> &str {
        non_blank(self.submit_button_text.as_deref()).unwrap_or(DEFAULT_SUBMIT_BUTTON_TEXT)
    }

    /// Returns effective success title.
    #[must_use]
    pub fn success_title(&self) -> &str {
        non_blank(self.success_title.as_deref()).unwrap_or(DEFAULT_SUCCESS_TITLE)
    }

    /// Returns effective success message.
    #[must_use]
    pub fn success_message(&self) -> &str {
        non_blank(self.success_message.as_deref()).unwrap_or(DEFAULT_SUCCESS_MESSAGE)
    }

    /// Returns configured submit action.
    #[must_use]
    pub fn submit_action(&self) -> Option<&SubmitAction> {
        self.submit_action.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{FormFlow, FormStep, StepLayout, SubmitAction};

    #[test]
    fn form_flow_falls_back_to_default_outcome_text() {
        let flow = FormFlow::new(Vec::new()).with_submit_button_text("  ");

        assert_eq!(flow.submit_button_text(), "Submit");
        assert_eq!(flow.success_title(), "Thank You!");
        assert_eq!(flow.success_message(), "We've received your submission.");
    }

    #[test]
    fn step_lookup_is_one_based() {
        let first = FormStep::new("first", "First", Vec::new()).unwrap_or_else(|_| unreachable!());
        let flow = FormFlow::new(vec![first]);

        assert!(flow.step(0).is_none());
        assert_eq!(flow.step(1).map(FormStep::id), Some("first"));
        assert!(flow.step(2).is_none());
    }

    #[test]
    fn step_layout_uses_kebab_case() {
        let step = serde_json::from_value::<FormStep>(json!({
            "id": "contact",
            "title": "Contact",
            "blocks": [],
            "layout": "two-column"
        }));
        assert!(step.is_ok());
        assert_eq!(
            step.unwrap_or_else(|_| unreachable!()).layout(),
            StepLayout::TwoColumn
        );
    }

    #[test]
    fn submit_action_rejects_non_http_webhook() {
        let action = SubmitAction {
            webhook_url: Some("ftp://hooks.example.com".to_owned()),
            ..SubmitAction::default()
        };
        assert!(action.validate().is_err());
    }

    #[test]
    fn submit_action_accepts_relative_redirect_and_valid_email() {
        let action = SubmitAction {
            webhook_url: Some("https://hooks.example.com/leads".to_owned()),
            email_to: Some("sales@example.co.nz".to_owned()),
            redirect_url: Some("/thank-you".to_owned()),
        };
        assert!(action.validate().is_ok());
    }

    #[test]
    fn submit_action_rejects_invalid_email() {
        let action = SubmitAction {
            email_to: Some("sales@".to_owned()),
            ..SubmitAction::default()
        };
        assert!(action.validate().is_err());
    }
}
