use std::sync::Arc;

use pagecraft_core::{AppError, AppResult};
use pagecraft_domain::BlockConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    TextAlign, decode_props, default_props, ensure_count_in, lenient_count, resolved_props,
};
use crate::renderer::{BlockContent, RenderContext};
use crate::{Block, BlockCategory, BlockMetadata, BlockRegistry, PropSchema, PropType};

pub(super) fn register(registry: &mut BlockRegistry) {
    registry.register(
        "cta-button",
        Arc::new(CtaButtonBlock),
        BlockMetadata::new(
            "CTA Button",
            "Call-to-action button with multiple styles",
            BlockCategory::Conversion,
            "MousePointerClick",
            default_props::<CtaButtonProps>(),
        )
        .with_schema(vec![
            PropSchema::text("text", "Button Text").required(),
            PropSchema::select(
                "action",
                "Action",
                &[
                    ("Scroll to Section", "scroll"),
                    ("External Link", "link"),
                    ("Phone Call", "phone"),
                    ("Email", "email"),
                    ("Submit Form", "submit"),
                ],
            ),
            PropSchema::text("href", "Link/Phone/Email"),
            PropSchema::text("scrollTo", "Scroll Target ID"),
            PropSchema::select(
                "size",
                "Size",
                &[
                    ("Small", "sm"),
                    ("Medium", "md"),
                    ("Large", "lg"),
                    ("Extra Large", "xl"),
                ],
            ),
            PropSchema::select(
                "variant",
                "Style",
                &[
                    ("Primary", "primary"),
                    ("Secondary", "secondary"),
                    ("Outline", "outline"),
                    ("Ghost", "ghost"),
                ],
            ),
            PropSchema::boolean("fullWidth", "Full Width"),
            PropSchema::select(
                "icon",
                "Icon",
                &[
                    ("None", "none"),
                    ("Arrow", "arrow"),
                    ("Chevron", "chevron"),
                    ("Phone", "phone"),
                    ("Mail", "mail"),
                    ("Calendar", "calendar"),
                ],
            ),
            PropSchema::select(
                "iconPosition",
                "Icon Position",
                &[("Left", "left"), ("Right", "right")],
            ),
            PropSchema::boolean("animate", "Animate"),
        ]),
    );

    registry.register(
        "progress-bar",
        Arc::new(ProgressBarBlock),
        BlockMetadata::new(
            "Progress Bar",
            "Visual progress indicator for multi-step forms",
            BlockCategory::Conversion,
            "Loader",
            default_props::<ProgressBarProps>(),
        )
        .with_schema(vec![
            PropSchema::new("current", "Current Step", PropType::Number),
            PropSchema::new("total", "Total Steps", PropType::Number),
            PropSchema::boolean("showLabels", "Show Labels"),
            PropSchema::boolean("showPercentage", "Show Percentage"),
            PropSchema::select(
                "variant",
                "Style",
                &[
                    ("Continuous", "default"),
                    ("Stepped", "stepped"),
                    ("Dots", "dots"),
                ],
            ),
            PropSchema::select(
                "size",
                "Size",
                &[("Small", "sm"), ("Medium", "md"), ("Large", "lg")],
            ),
            PropSchema::boolean("animated", "Animated"),
        ]),
    );

    registry.register(
        "trust-badges",
        Arc::new(TrustBadgesBlock),
        BlockMetadata::new(
            "Trust Badges",
            "Display trust indicators and certifications",
            BlockCategory::Conversion,
            "Shield",
            default_props::<TrustBadgesProps>(),
        )
        .with_schema(vec![
            PropSchema::new("badges", "Badges", PropType::Array),
            PropSchema::select(
                "variant",
                "Style",
                &[("Grid", "default"), ("Compact", "compact"), ("Pills", "pills")],
            ),
            PropSchema::select(
                "alignment",
                "Alignment",
                &[("Left", "left"), ("Center", "center"), ("Right", "right")],
            ),
            PropSchema::select(
                "columns",
                "Columns",
                &[
                    ("2 Columns", "2"),
                    ("3 Columns", "3"),
                    ("4 Columns", "4"),
                    ("6 Columns", "6"),
                ],
            ),
        ]),
    );
}

/// What a CTA button does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaAction {
    /// Scrolls to an element id on the page.
    #[default]
    Scroll,
    /// Navigates to a url.
    Link,
    /// Starts a phone call.
    Phone,
    /// Opens a mail client.
    Email,
    /// Submits the running form.
    Submit,
}

/// Props of `cta-button`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaButtonProps {
    /// Button label.
    pub text: String,
    /// Press behavior.
    pub action: CtaAction,
    /// Url, phone number, or email address for the matching action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Element id for scroll actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_to: Option<String>,
    /// Size token.
    pub size: String,
    /// Style variant.
    pub variant: String,
    /// Stretches to the container width.
    pub full_width: bool,
    /// Icon token, `none` to hide.
    pub icon: String,
    /// Icon side.
    pub icon_position: String,
    /// Entrance emphasis.
    pub animate: bool,
}

impl Default for CtaButtonProps {
    fn default() -> Self {
        Self {
            text: "Get Your Free Appraisal".to_owned(),
            action: CtaAction::Scroll,
            href: None,
            scroll_to: Some("appraisal-form".to_owned()),
            size: "lg".to_owned(),
            variant: "primary".to_owned(),
            full_width: false,
            icon: "arrow".to_owned(),
            icon_position: "right".to_owned(),
            animate: true,
        }
    }
}

impl CtaButtonProps {
    /// Returns the navigation target the button resolves to, if any.
    #[must_use]
    pub fn target(&self) -> Option<String> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned)
        };

        match self.action {
            CtaAction::Scroll => non_blank(&self.scroll_to).map(|id| format!("#{id}")),
            CtaAction::Link => non_blank(&self.href),
            CtaAction::Phone => non_blank(&self.href).map(|phone| format!("tel:{phone}")),
            CtaAction::Email => non_blank(&self.href).map(|email| format!("mailto:{email}")),
            CtaAction::Submit => None,
        }
    }
}

struct CtaButtonBlock;

impl Block for CtaButtonBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: CtaButtonProps = decode_props(config)?;
        let mut resolved = resolved_props(config, &props)?;
        if let Value::Object(map) = &mut resolved {
            if let Some(target) = props.target() {
                map.insert("target".to_owned(), Value::String(target));
            }
            map.insert(
                "interactive".to_owned(),
                Value::Bool(!context.is_editing()),
            );
        }

        Ok(BlockContent::new("CtaButton", resolved))
    }
}

/// Props of `progress-bar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressBarProps {
    /// Current step.
    #[serde(deserialize_with = "lenient_count")]
    pub current: u32,
    /// Step count.
    #[serde(deserialize_with = "lenient_count")]
    pub total: u32,
    /// "Step n of m" caption.
    pub show_labels: bool,
    /// Percentage caption.
    pub show_percentage: bool,
    /// Style variant.
    pub variant: String,
    /// Size token.
    pub size: String,
    /// Animated fill.
    pub animated: bool,
}

impl Default for ProgressBarProps {
    fn default() -> Self {
        Self {
            current: 1,
            total: 4,
            show_labels: true,
            show_percentage: false,
            variant: "default".to_owned(),
            size: "md".to_owned(),
            animated: true,
        }
    }
}

struct ProgressBarBlock;

impl Block for ProgressBarBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let mut props: ProgressBarProps = decode_props(config)?;
        if let Some(form) = context.form() {
            props.current = u32::try_from(form.current_step()).unwrap_or(u32::MAX);
            props.total = u32::try_from(form.total_steps()).unwrap_or(u32::MAX);
        }
        if props.total == 0 {
            return Err(AppError::Configuration(format!(
                "block '{}' (progress-bar) needs at least one step",
                config.id()
            )));
        }
        props.current = props.current.min(props.total);

        let percentage = (f64::from(props.current) / f64::from(props.total) * 100.0).round();
        let mut resolved = resolved_props(config, &props)?;
        if let Value::Object(map) = &mut resolved {
            map.insert("percentage".to_owned(), Value::from(percentage as u32));
        }

        Ok(BlockContent::new("ProgressBar", resolved))
    }
}

/// One badge of `trust-badges`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustBadge {
    /// Icon token; unknown or missing icons show a shield.
    #[serde(default = "default_badge_icon")]
    pub icon: String,
    /// Caption.
    pub text: String,
}

fn default_badge_icon() -> String {
    "shield".to_owned()
}

impl TrustBadge {
    fn new(icon: &str, text: &str) -> Self {
        Self {
            icon: icon.to_owned(),
            text: text.to_owned(),
        }
    }
}

/// Props of `trust-badges`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrustBadgesProps {
    /// Badges in display order.
    pub badges: Vec<TrustBadge>,
    /// Style variant.
    pub variant: String,
    /// Alignment.
    pub alignment: TextAlign,
    /// Grid columns: 2, 3, 4 or 6.
    #[serde(deserialize_with = "lenient_count")]
    pub columns: u32,
}

impl Default for TrustBadgesProps {
    fn default() -> Self {
        Self {
            badges: vec![
                TrustBadge::new("shield", "Licensed & Insured"),
                TrustBadge::new("star", "5-Star Reviews"),
                TrustBadge::new("clock", "Quick Response"),
                TrustBadge::new("award", "Award Winning"),
            ],
            variant: "default".to_owned(),
            alignment: TextAlign::Center,
            columns: 4,
        }
    }
}

struct TrustBadgesBlock;

impl Block for TrustBadgesBlock {
    fn render(&self, config: &BlockConfig, _context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: TrustBadgesProps = decode_props(config)?;
        ensure_count_in(config, "columns", props.columns, &[2, 3, 4, 6])?;
        Ok(BlockContent::new(
            "TrustBadges",
            resolved_props(config, &props)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CtaAction, CtaButtonProps, TrustBadgesProps};

    #[test]
    fn cta_targets_follow_the_action() {
        let mut props = CtaButtonProps::default();
        assert_eq!(props.target().as_deref(), Some("#appraisal-form"));

        props.action = CtaAction::Phone;
        props.href = Some(" 021 123 4567 ".to_owned());
        assert_eq!(props.target().as_deref(), Some("tel:021 123 4567"));

        props.action = CtaAction::Email;
        props.href = Some("agent@example.co.nz".to_owned());
        assert_eq!(props.target().as_deref(), Some("mailto:agent@example.co.nz"));

        props.action = CtaAction::Submit;
        assert!(props.target().is_none());
    }

    #[test]
    fn badges_without_an_icon_fall_back_to_the_shield() {
        let props = serde_json::from_value::<TrustBadgesProps>(json!({
            "badges": [{ "text": "Free, no-obligation" }, { "icon": "clock", "text": "Fast" }]
        }));
        assert!(props.is_ok());
        let props = props.unwrap_or_default();

        assert_eq!(props.badges[0].icon, "shield");
        assert_eq!(props.badges[1].icon, "clock");
    }
}
