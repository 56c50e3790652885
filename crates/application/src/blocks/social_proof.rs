use std::sync::Arc;

use pagecraft_core::AppResult;
use pagecraft_domain::BlockConfig;
use serde::{Deserialize, Serialize};

use super::content::PropsOnly;
use super::{decode_props, default_props, ensure_count_in, lenient_count, resolved_props};
use crate::renderer::{BlockContent, RenderContext};
use crate::{Block, BlockCategory, BlockMetadata, BlockRegistry, PropSchema, PropType};

pub(super) fn register(registry: &mut BlockRegistry) {
    registry.register(
        "testimonial-card",
        Arc::new(TestimonialCardBlock),
        BlockMetadata::new(
            "Testimonial Card",
            "Single testimonial with author info and rating",
            BlockCategory::SocialProof,
            "MessageSquare",
            default_props::<TestimonialCardProps>(),
        )
        .with_schema(vec![
            PropSchema::new("quote", "Quote", PropType::Textarea).required(),
            PropSchema::text("authorName", "Author Name").required(),
            PropSchema::text("authorRole", "Author Role"),
            PropSchema::new("authorImage", "Author Image URL", PropType::Image),
            PropSchema::select(
                "rating",
                "Rating (1-5)",
                &[
                    ("5 Stars", "5"),
                    ("4 Stars", "4"),
                    ("3 Stars", "3"),
                    ("2 Stars", "2"),
                    ("1 Star", "1"),
                ],
            ),
            PropSchema::boolean("showQuoteIcon", "Show Quote Icon"),
            PropSchema::select(
                "variant",
                "Style",
                &[
                    ("Default", "default"),
                    ("Highlighted", "highlighted"),
                    ("Minimal", "minimal"),
                ],
            ),
        ]),
    );

    registry.register(
        "stats-bar",
        Arc::new(StatsBarBlock),
        BlockMetadata::new(
            "Stats Bar",
            "Display key statistics in a row",
            BlockCategory::SocialProof,
            "BarChart",
            default_props::<StatsBarProps>(),
        )
        .with_schema(vec![
            PropSchema::new("stats", "Statistics", PropType::Array),
            PropSchema::select(
                "columns",
                "Columns",
                &[("2 Columns", "2"), ("3 Columns", "3"), ("4 Columns", "4")],
            ),
            PropSchema::boolean("animated", "Animate on Scroll"),
            PropSchema::select(
                "variant",
                "Style",
                &[
                    ("Default", "default"),
                    ("Bordered", "bordered"),
                    ("Cards", "cards"),
                ],
            ),
        ]),
    );

    registry.register(
        "agent-card",
        Arc::new(PropsOnly::<AgentCardProps>::new("AgentCard")),
        BlockMetadata::new(
            "Agent Card",
            "Display agent profile with photo and contact info",
            BlockCategory::SocialProof,
            "User",
            default_props::<AgentCardProps>(),
        )
        .with_schema(vec![
            PropSchema::text("name", "Name").required(),
            PropSchema::text("title", "Title").required(),
            PropSchema::new("photo", "Photo URL", PropType::Image),
            PropSchema::text("phone", "Phone"),
            PropSchema::text("email", "Email"),
            PropSchema::text("experience", "Experience"),
            PropSchema::new("achievements", "Achievements", PropType::Array),
            PropSchema::select(
                "variant",
                "Style",
                &[
                    ("Default (Centered)", "default"),
                    ("Horizontal", "horizontal"),
                    ("Compact", "compact"),
                ],
            ),
        ]),
    );
}

/// Props of `testimonial-card`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialCardProps {
    /// Quoted text.
    pub quote: String,
    /// Author name.
    pub author_name: String,
    /// Author role, e.g. "Homeowner".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_role: Option<String>,
    /// Author photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_image: Option<String>,
    /// Star rating, 1 to 5.
    #[serde(deserialize_with = "lenient_count")]
    pub rating: u32,
    /// Decorative quote mark.
    pub show_quote_icon: bool,
    /// Style variant.
    pub variant: String,
}

impl Default for TestimonialCardProps {
    fn default() -> Self {
        Self {
            quote: "This is an amazing testimonial quote that shows how great your service is!"
                .to_owned(),
            author_name: "John Smith".to_owned(),
            author_role: Some("Homeowner".to_owned()),
            author_image: None,
            rating: 5,
            show_quote_icon: true,
            variant: "default".to_owned(),
        }
    }
}

struct TestimonialCardBlock;

impl Block for TestimonialCardBlock {
    fn render(&self, config: &BlockConfig, _context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: TestimonialCardProps = decode_props(config)?;
        ensure_count_in(config, "rating", props.rating, &[1, 2, 3, 4, 5])?;
        Ok(BlockContent::new(
            "TestimonialCard",
            resolved_props(config, &props)?,
        ))
    }
}

/// One figure of `stats-bar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatItem {
    /// Figure, e.g. "500+".
    pub value: String,
    /// Caption.
    pub label: String,
    /// Text before the figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Text after the figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl StatItem {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_owned(),
            label: label.to_owned(),
            prefix: None,
            suffix: None,
        }
    }
}

/// Props of `stats-bar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsBarProps {
    /// Figures.
    pub stats: Vec<StatItem>,
    /// Grid columns: 2, 3 or 4.
    #[serde(deserialize_with = "lenient_count")]
    pub columns: u32,
    /// Count-up animation.
    pub animated: bool,
    /// Style variant.
    pub variant: String,
}

impl Default for StatsBarProps {
    fn default() -> Self {
        Self {
            stats: vec![
                StatItem::new("500+", "Homes Sold"),
                StatItem::new("$1.2M", "Avg Sale Price"),
                StatItem::new("14", "Days on Market"),
                StatItem::new("98%", "Client Satisfaction"),
            ],
            columns: 4,
            animated: true,
            variant: "default".to_owned(),
        }
    }
}

struct StatsBarBlock;

impl Block for StatsBarBlock {
    fn render(&self, config: &BlockConfig, _context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: StatsBarProps = decode_props(config)?;
        ensure_count_in(config, "columns", props.columns, &[2, 3, 4])?;
        Ok(BlockContent::new("StatsBar", resolved_props(config, &props)?))
    }
}

/// Props of `agent-card`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentCardProps {
    /// Agent name.
    pub name: String,
    /// Job title.
    pub title: String,
    /// Portrait url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Experience line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    /// Achievement badges.
    pub achievements: Vec<String>,
    /// Style variant.
    pub variant: String,
}

impl Default for AgentCardProps {
    fn default() -> Self {
        Self {
            name: "John Cooper".to_owned(),
            title: "Senior Sales Consultant".to_owned(),
            photo: None,
            phone: Some("021 123 4567".to_owned()),
            email: Some("john@cooperco.co.nz".to_owned()),
            experience: Some("15 years experience".to_owned()),
            achievements: vec![
                "Top Performer 2023".to_owned(),
                "50+ Sales This Year".to_owned(),
            ],
            variant: "default".to_owned(),
        }
    }
}
