use std::sync::Arc;

use pagecraft_core::AppResult;
use pagecraft_domain::BlockConfig;
use serde::{Deserialize, Serialize};

use super::{TextAlign, decode_props, default_props, lenient_count, resolved_props};
use crate::renderer::{BlockContent, RenderContext};
use crate::{Block, BlockCategory, BlockMetadata, BlockRegistry, PropSchema, PropType};

const ALIGN_OPTIONS: &[(&str, &str)] = &[("Left", "left"), ("Center", "center"), ("Right", "right")];
const MAX_WIDTH_OPTIONS: &[(&str, &str)] = &[
    ("Small", "sm"),
    ("Medium", "md"),
    ("Large", "lg"),
    ("Extra Large", "xl"),
    ("Full Width", "full"),
];

pub(super) fn register(registry: &mut BlockRegistry) {
    registry.register(
        "headline",
        Arc::new(PropsOnly::<HeadlineProps>::new("Headline")),
        BlockMetadata::new(
            "Headline",
            "Main headline text with customizable size and alignment",
            BlockCategory::Content,
            "Type",
            default_props::<HeadlineProps>(),
        )
        .with_schema(vec![
            PropSchema::text("text", "Text").required(),
            PropSchema::select(
                "level",
                "Heading Level",
                &[("H1 (Largest)", "h1"), ("H2", "h2"), ("H3", "h3")],
            ),
            PropSchema::select("align", "Alignment", ALIGN_OPTIONS),
            PropSchema::new("color", "Color", PropType::Color),
            PropSchema::select("maxWidth", "Max Width", MAX_WIDTH_OPTIONS),
        ]),
    );

    registry.register(
        "subheadline",
        Arc::new(PropsOnly::<SubheadlineProps>::new("Subheadline")),
        BlockMetadata::new(
            "Subheadline",
            "Supporting text below headlines",
            BlockCategory::Content,
            "Text",
            default_props::<SubheadlineProps>(),
        )
        .with_schema(vec![
            PropSchema::new("text", "Text", PropType::Textarea).required(),
            PropSchema::select("align", "Alignment", ALIGN_OPTIONS),
            PropSchema::new("color", "Color", PropType::Color),
            PropSchema::select("maxWidth", "Max Width", MAX_WIDTH_OPTIONS),
        ]),
    );

    registry.register(
        "body-text",
        Arc::new(PropsOnly::<BodyTextProps>::new("BodyText")),
        BlockMetadata::new(
            "Body Text",
            "Paragraph text content with rich formatting support",
            BlockCategory::Content,
            "AlignLeft",
            default_props::<BodyTextProps>(),
        )
        .with_schema(vec![
            PropSchema::new("content", "Content", PropType::Textarea).required(),
            PropSchema::select("align", "Alignment", ALIGN_OPTIONS),
            PropSchema::select("maxWidth", "Max Width", MAX_WIDTH_OPTIONS),
            PropSchema::boolean("prose", "Enable Rich Text Styling"),
        ]),
    );

    registry.register(
        "hero-image",
        Arc::new(PropsOnly::<HeroImageProps>::new("HeroImage")),
        BlockMetadata::new(
            "Hero Image",
            "Full-width hero image with optional overlay",
            BlockCategory::Content,
            "Image",
            default_props::<HeroImageProps>(),
        )
        .with_schema(vec![
            PropSchema::new("imageUrl", "Image URL", PropType::Image).required(),
            PropSchema::text("altText", "Alt Text"),
            PropSchema::select(
                "height",
                "Height",
                &[
                    ("Small (300px)", "sm"),
                    ("Medium (400px)", "md"),
                    ("Large (500px)", "lg"),
                    ("Extra Large (600px)", "xl"),
                    ("Full Screen", "full"),
                ],
            ),
            PropSchema::boolean("overlay", "Show Overlay"),
            PropSchema::new("overlayOpacity", "Overlay Opacity (%)", PropType::Number),
            PropSchema::select(
                "objectPosition",
                "Image Position",
                &[("Top", "top"), ("Center", "center"), ("Bottom", "bottom")],
            ),
        ]),
    );

    registry.register(
        "spacer",
        Arc::new(PropsOnly::<SpacerProps>::new("Spacer")),
        BlockMetadata::new(
            "Spacer",
            "Add vertical spacing between elements",
            BlockCategory::Content,
            "Space",
            default_props::<SpacerProps>(),
        )
        .with_schema(vec![
            PropSchema::select(
                "height",
                "Height",
                &[
                    ("Extra Small (16px)", "xs"),
                    ("Small (32px)", "sm"),
                    ("Medium (48px)", "md"),
                    ("Large (64px)", "lg"),
                    ("Extra Large (96px)", "xl"),
                    ("2X Large (128px)", "2xl"),
                ],
            ),
            PropSchema::boolean("hideOnMobile", "Hide on Mobile"),
        ]),
    );
}

/// Block whose output is its decoded props.
pub(super) struct PropsOnly<P> {
    component: &'static str,
    props: std::marker::PhantomData<fn() -> P>,
}

impl<P> PropsOnly<P> {
    pub(super) fn new(component: &'static str) -> Self {
        Self {
            component,
            props: std::marker::PhantomData,
        }
    }
}

impl<P> Block for PropsOnly<P>
where
    P: Serialize + serde::de::DeserializeOwned,
{
    fn render(&self, config: &BlockConfig, _context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: P = decode_props(config)?;
        Ok(BlockContent::new(
            self.component,
            resolved_props(config, &props)?,
        ))
    }
}

/// Heading level of `headline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    /// Page title.
    #[default]
    H1,
    /// Section title.
    H2,
    /// Subsection title.
    H3,
}

/// Props of `headline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeadlineProps {
    /// Heading text.
    pub text: String,
    /// Heading level.
    pub level: HeadingLevel,
    /// Alignment.
    pub align: TextAlign,
    /// Text color override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Width cap token.
    pub max_width: String,
}

impl Default for HeadlineProps {
    fn default() -> Self {
        Self {
            text: "Your Headline Here".to_owned(),
            level: HeadingLevel::H1,
            align: TextAlign::Center,
            color: None,
            max_width: "lg".to_owned(),
        }
    }
}

/// Props of `subheadline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubheadlineProps {
    /// Supporting text.
    pub text: String,
    /// Alignment.
    pub align: TextAlign,
    /// Text color override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Width cap token.
    pub max_width: String,
}

impl Default for SubheadlineProps {
    fn default() -> Self {
        Self {
            text: "Your subheadline text goes here".to_owned(),
            align: TextAlign::Center,
            color: None,
            max_width: "lg".to_owned(),
        }
    }
}

/// Props of `body-text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BodyTextProps {
    /// Paragraph text.
    pub content: String,
    /// Alignment.
    pub align: TextAlign,
    /// Width cap token.
    pub max_width: String,
    /// Rich text styling.
    pub prose: bool,
}

impl Default for BodyTextProps {
    fn default() -> Self {
        Self {
            content: "Your body text content goes here. This block supports multiple paragraphs and basic formatting.".to_owned(),
            align: TextAlign::Left,
            max_width: "lg".to_owned(),
            prose: true,
        }
    }
}

/// Props of `hero-image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroImageProps {
    /// Image source.
    pub image_url: String,
    /// Alternative text.
    pub alt_text: String,
    /// Height token.
    pub height: String,
    /// Darkening overlay.
    pub overlay: bool,
    /// Overlay opacity in percent.
    #[serde(deserialize_with = "lenient_count")]
    pub overlay_opacity: u32,
    /// Focal point.
    pub object_position: String,
}

impl Default for HeroImageProps {
    fn default() -> Self {
        Self {
            image_url: String::new(),
            alt_text: "Hero image".to_owned(),
            height: "lg".to_owned(),
            overlay: true,
            overlay_opacity: 30,
            object_position: "center".to_owned(),
        }
    }
}

/// Props of `spacer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpacerProps {
    /// Height token.
    pub height: String,
    /// Collapses on mobile widths.
    pub hide_on_mobile: bool,
}

impl Default for SpacerProps {
    fn default() -> Self {
        Self {
            height: "md".to_owned(),
            hide_on_mobile: false,
        }
    }
}
