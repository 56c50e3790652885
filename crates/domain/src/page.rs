use std::borrow::Cow;

use pagecraft_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{BlockConfig, FormFlow, legacy_appraisal_flow};

/// Fallback vertical padding of a section.
pub const DEFAULT_SECTION_PADDING: &str = "2rem";

/// Kind of section background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    /// Solid CSS color.
    Color,
    /// CSS gradient expression.
    Gradient,
    /// Image url drawn under a dark overlay.
    Image,
}

/// Section background descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBackground {
    /// Background kind.
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    /// Color, gradient, or image url.
    pub value: String,
}

/// Vertical padding of a section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionPadding {
    /// Top padding as a CSS length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    /// Bottom padding as a CSS length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
}

impl SectionPadding {
    /// Returns effective top padding.
    #[must_use]
    pub fn top(&self) -> &str {
        self.top.as_deref().unwrap_or(DEFAULT_SECTION_PADDING)
    }

    /// Returns effective bottom padding.
    #[must_use]
    pub fn bottom(&self) -> &str {
        self.bottom.as_deref().unwrap_or(DEFAULT_SECTION_PADDING)
    }
}

/// Ordered group of static page blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSection {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    blocks: Vec<BlockConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background: Option<SectionBackground>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    padding: Option<SectionPadding>,
}

impl PageSection {
    /// Creates a validated section.
    pub fn new(id: impl Into<String>, blocks: Vec<BlockConfig>) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?.into(),
            name: None,
            blocks,
            background: None,
            padding: None,
        })
    }

    pub(crate) fn authored(id: &str, name: &str, blocks: Vec<BlockConfig>) -> Self {
        Self {
            id: id.to_owned(),
            name: Some(name.to_owned()),
            blocks,
            background: None,
            padding: None,
        }
    }

    /// Sets section name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets section background.
    #[must_use]
    pub fn with_background(mut self, background: SectionBackground) -> Self {
        self.background = Some(background);
        self
    }

    /// Sets section padding.
    #[must_use]
    pub fn with_padding(mut self, padding: SectionPadding) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Returns section id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns optional section name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns ordered blocks.
    #[must_use]
    pub fn blocks(&self) -> &[BlockConfig] {
        &self.blocks
    }

    /// Returns blocks for in-place edits.
    pub fn blocks_mut(&mut self) -> &mut Vec<BlockConfig> {
        &mut self.blocks
    }

    /// Returns background descriptor.
    #[must_use]
    pub fn background(&self) -> Option<&SectionBackground> {
        self.background.as_ref()
    }

    /// Returns effective padding.
    #[must_use]
    pub fn padding(&self) -> Cow<'_, SectionPadding> {
        match &self.padding {
            Some(padding) => Cow::Borrowed(padding),
            None => Cow::Owned(SectionPadding::default()),
        }
    }

    /// Returns whether this section hosts the page form.
    #[must_use]
    pub fn is_form_section(&self) -> bool {
        self.id == "form"
            || self
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains("form"))
    }
}

/// Persisted page content: `{ sections, formFlow }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    #[serde(default)]
    sections: Vec<PageSection>,
    #[serde(default)]
    form_flow: FormFlow,
}

impl PageDocument {
    /// Creates a document.
    #[must_use]
    pub fn new(sections: Vec<PageSection>, form_flow: FormFlow) -> Self {
        Self {
            sections,
            form_flow,
        }
    }

    /// Returns ordered sections.
    #[must_use]
    pub fn sections(&self) -> &[PageSection] {
        &self.sections
    }

    /// Returns sections for in-place edits.
    pub fn sections_mut(&mut self) -> &mut Vec<PageSection> {
        &mut self.sections
    }

    /// Returns the authored form flow.
    #[must_use]
    pub fn form_flow(&self) -> &FormFlow {
        &self.form_flow
    }

    /// Returns the authored form flow for in-place edits.
    pub fn form_flow_mut(&mut self) -> &mut FormFlow {
        &mut self.form_flow
    }

    /// Returns whether the document carries its own form steps.
    #[must_use]
    pub fn uses_dynamic_flow(&self) -> bool {
        !self.form_flow.steps().is_empty()
    }

    /// Returns the authored flow, or the legacy appraisal flow for documents without steps.
    #[must_use]
    pub fn effective_form_flow(&self) -> Cow<'_, FormFlow> {
        if self.uses_dynamic_flow() {
            Cow::Borrowed(&self.form_flow)
        } else {
            Cow::Owned(legacy_appraisal_flow())
        }
    }

    /// Finds the section named or id'd `form`.
    #[must_use]
    pub fn find_form_section(&self) -> Option<&PageSection> {
        self.sections.iter().find(|section| section.is_form_section())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{PageDocument, PageSection};

    fn document_json() -> serde_json::Value {
        json!({
            "sections": [
                {
                    "id": "hero",
                    "name": "Hero",
                    "blocks": [
                        {
                            "id": "card-1",
                            "type": "card",
                            "props": {"variant": "elevated"},
                            "children": [
                                {
                                    "id": "headline-1",
                                    "type": "headline",
                                    "props": {"text": "Nested"},
                                    "animation": {"entrance": "fadeIn", "duration": 0.6}
                                }
                            ]
                        }
                    ],
                    "background": {"type": "gradient", "value": "linear-gradient(#fff, #000)"},
                    "padding": {"top": "4rem", "bottom": "3rem"}
                },
                {"id": "lead", "name": "Lead Form Area", "blocks": []}
            ],
            "formFlow": {
                "steps": [
                    {
                        "id": "step-1",
                        "title": "Address",
                        "blocks": [
                            {
                                "id": "address-1",
                                "type": "address-finder",
                                "props": {"fieldName": "address", "required": true},
                                "visibility": {"desktop": true, "tablet": true, "mobile": false}
                            }
                        ]
                    }
                ],
                "submitButtonText": "Send"
            }
        })
    }

    #[test]
    fn page_document_round_trips_nested_children() {
        let original = document_json();
        let document = serde_json::from_value::<PageDocument>(original.clone());
        assert!(document.is_ok());
        let document = document.unwrap_or_else(|_| unreachable!());

        let serialized = serde_json::to_value(&document).unwrap_or_default();
        assert_eq!(serialized, original);

        let reparsed = serde_json::from_value::<PageDocument>(serialized)
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(reparsed, document);
        assert_eq!(reparsed.sections()[0].blocks()[0].children().len(), 1);
    }

    #[test]
    fn empty_document_falls_back_to_legacy_flow() {
        let document = PageDocument::default();

        assert!(!document.uses_dynamic_flow());
        assert_eq!(document.effective_form_flow().total_steps(), 4);
    }

    #[test]
    fn find_form_section_matches_name_case_insensitively() {
        let document = serde_json::from_value::<PageDocument>(document_json())
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(document.find_form_section().map(PageSection::id), Some("lead"));
    }

    #[test]
    fn section_padding_defaults_to_two_rem() {
        let section = PageSection::new("plain", Vec::new()).unwrap_or_else(|_| unreachable!());
        assert_eq!(section.padding().top(), "2rem");
        assert_eq!(section.padding().bottom(), "2rem");
    }
}
