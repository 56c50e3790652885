use std::borrow::Cow;
use std::sync::Arc;

use pagecraft_core::AppResult;
use pagecraft_domain::BlockConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_props, default_props, resolved_props};
use crate::renderer::{BlockContent, RenderContext};
use crate::{Block, BlockCategory, BlockMetadata, BlockRegistry, PropSchema, SlotStorage};

const PADDING_OPTIONS: &[(&str, &str)] = &[
    ("None", "none"),
    ("Small", "sm"),
    ("Medium", "md"),
    ("Large", "lg"),
];

pub(super) fn register(registry: &mut BlockRegistry) {
    registry.register(
        "container",
        Arc::new(ContainerBlock),
        BlockMetadata::new(
            "Container",
            "Wrapper with max-width, padding, and background options",
            BlockCategory::Layout,
            "Square",
            default_props::<ContainerProps>(),
        )
        .with_schema(vec![
            PropSchema::select(
                "maxWidth",
                "Max Width",
                &[
                    ("Small (640px)", "sm"),
                    ("Medium (768px)", "md"),
                    ("Large (1024px)", "lg"),
                    ("Extra Large (1280px)", "xl"),
                    ("2X Large (1536px)", "2xl"),
                    ("Full Width", "full"),
                ],
            ),
            PropSchema::select(
                "padding",
                "Padding",
                &[
                    ("None", "none"),
                    ("Small", "sm"),
                    ("Medium", "md"),
                    ("Large", "lg"),
                    ("Extra Large", "xl"),
                ],
            ),
            PropSchema::select(
                "background",
                "Background",
                &[
                    ("Transparent", "transparent"),
                    ("White", "white"),
                    ("Gray", "gray"),
                    ("Primary Light", "primary"),
                    ("Gradient", "gradient"),
                ],
            ),
            PropSchema::boolean("centered", "Center Content"),
        ]),
    );

    registry.register(
        "columns",
        Arc::new(ColumnsBlock),
        BlockMetadata::new(
            "Columns",
            "Multi-column layout with flexible widths",
            BlockCategory::Layout,
            "Columns",
            default_props::<ColumnsProps>(),
        )
        .with_schema(vec![
            PropSchema::select(
                "gap",
                "Gap",
                &[
                    ("None", "none"),
                    ("Small", "sm"),
                    ("Medium", "md"),
                    ("Large", "lg"),
                    ("Extra Large", "xl"),
                ],
            ),
            PropSchema::select(
                "verticalAlign",
                "Vertical Alignment",
                &[
                    ("Top", "top"),
                    ("Center", "center"),
                    ("Bottom", "bottom"),
                    ("Stretch", "stretch"),
                ],
            ),
            PropSchema::boolean("stackOnMobile", "Stack on Mobile"),
            PropSchema::boolean("reverseOnMobile", "Reverse on Mobile"),
        ]),
    );

    registry.register(
        "card",
        Arc::new(CardBlock),
        BlockMetadata::new(
            "Card",
            "Card wrapper with shadow and border options",
            BlockCategory::Layout,
            "CreditCard",
            default_props::<CardProps>(),
        )
        .with_schema(vec![
            PropSchema::select(
                "variant",
                "Style",
                &[
                    ("Default", "default"),
                    ("Elevated", "elevated"),
                    ("Bordered", "bordered"),
                    ("Ghost", "ghost"),
                ],
            ),
            PropSchema::select("padding", "Padding", PADDING_OPTIONS),
            PropSchema::select(
                "rounded",
                "Border Radius",
                &[
                    ("None", "none"),
                    ("Small", "sm"),
                    ("Medium", "md"),
                    ("Large", "lg"),
                    ("Extra Large", "xl"),
                    ("2X Large", "2xl"),
                ],
            ),
            PropSchema::boolean("hover", "Hover Effect"),
        ]),
    );
}

/// Props of `container`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerProps {
    /// Width cap token.
    pub max_width: String,
    /// Inner padding token.
    pub padding: String,
    /// Background token.
    pub background: String,
    /// Centers the content horizontally.
    pub centered: bool,
}

impl Default for ContainerProps {
    fn default() -> Self {
        Self {
            max_width: "xl".to_owned(),
            padding: "md".to_owned(),
            background: "transparent".to_owned(),
            centered: true,
        }
    }
}

struct ContainerBlock;

impl Block for ContainerBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: ContainerProps = decode_props(config)?;
        Ok(
            BlockContent::new("Container", resolved_props(config, &props)?)
                .with_slot("children", context.render_children(config.children())),
        )
    }

    fn slot_storage(&self) -> SlotStorage {
        SlotStorage::Children
    }
}

/// One column of `columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Blocks of this column.
    #[serde(default)]
    pub blocks: Vec<BlockConfig>,
    /// Width fraction token, e.g. `1/2`.
    #[serde(default = "default_column_width")]
    pub width: String,
}

fn default_column_width() -> String {
    "1/2".to_owned()
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            width: default_column_width(),
        }
    }
}

/// Props of `columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnsProps {
    /// Columns in display order.
    pub columns: Vec<ColumnConfig>,
    /// Gap token.
    pub gap: String,
    /// Cross-axis alignment.
    pub vertical_align: String,
    /// Stacks columns on mobile widths.
    pub stack_on_mobile: bool,
    /// Reverses the stacked order on mobile widths.
    pub reverse_on_mobile: bool,
}

impl Default for ColumnsProps {
    fn default() -> Self {
        Self {
            columns: vec![ColumnConfig::default(), ColumnConfig::default()],
            gap: "md".to_owned(),
            vertical_align: "top".to_owned(),
            stack_on_mobile: true,
            reverse_on_mobile: false,
        }
    }
}

/// Props key holding the column list.
pub(crate) const COLUMNS_KEY: &str = "columns";
/// Key of the block list inside one column.
pub(crate) const COLUMN_BLOCKS_KEY: &str = "blocks";

struct ColumnsBlock;

impl Block for ColumnsBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: ColumnsProps = decode_props(config)?;

        let mut resolved = resolved_props(config, &props)?;
        if let Some(columns) = resolved.get_mut(COLUMNS_KEY).and_then(Value::as_array_mut) {
            for column in columns.iter_mut().filter_map(Value::as_object_mut) {
                column.remove(COLUMN_BLOCKS_KEY);
            }
        }

        Ok(props.columns.iter().enumerate().fold(
            BlockContent::new("Columns", resolved),
            |content, (index, column)| {
                content.with_slot(
                    format!("column-{index}"),
                    context.render_children(&column.blocks),
                )
            },
        ))
    }

    fn nested_blocks<'a>(&self, config: &'a BlockConfig) -> AppResult<Cow<'a, [BlockConfig]>> {
        let props: ColumnsProps = decode_props(config)?;
        Ok(Cow::Owned(
            props
                .columns
                .into_iter()
                .flat_map(|column| column.blocks)
                .collect(),
        ))
    }

    fn slot_storage(&self) -> SlotStorage {
        SlotStorage::PropList {
            list_key: COLUMNS_KEY,
            blocks_key: COLUMN_BLOCKS_KEY,
        }
    }
}

/// Props of `card`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardProps {
    /// Style variant.
    pub variant: String,
    /// Inner padding token.
    pub padding: String,
    /// Corner radius token.
    pub rounded: String,
    /// Lift on hover.
    pub hover: bool,
    /// Children stored in props by older documents.
    #[serde(skip_serializing)]
    pub children: Vec<BlockConfig>,
}

impl Default for CardProps {
    fn default() -> Self {
        Self {
            variant: "default".to_owned(),
            padding: "md".to_owned(),
            rounded: "xl".to_owned(),
            hover: false,
            children: Vec::new(),
        }
    }
}

struct CardBlock;

impl CardBlock {
    fn children<'a>(config: &'a BlockConfig, props: CardProps) -> Cow<'a, [BlockConfig]> {
        if config.has_children_list() || props.children.is_empty() {
            Cow::Borrowed(config.children())
        } else {
            Cow::Owned(props.children)
        }
    }
}

impl Block for CardBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let props: CardProps = decode_props(config)?;
        let resolved = resolved_props(config, &props)?;
        let children = Self::children(config, props);

        Ok(BlockContent::new("Card", resolved)
            .with_slot("children", context.render_children(&children)))
    }

    fn nested_blocks<'a>(&self, config: &'a BlockConfig) -> AppResult<Cow<'a, [BlockConfig]>> {
        let props: CardProps = decode_props(config)?;
        Ok(Self::children(config, props))
    }

    fn slot_storage(&self) -> SlotStorage {
        SlotStorage::Children
    }
}
