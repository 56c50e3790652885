use std::sync::Arc;

use pagecraft_core::AppError;
use pagecraft_domain::{
    BackgroundKind, BlockConfig, BlockVisibility, EntranceAnimation, FieldErrors, FieldSpec,
    FieldValueMap, FormFlow, FormStep, PageDocument, PageSection, StepLayout,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::BlockRegistry;

/// Deepest block nesting the renderer and document inspection accept.
pub const MAX_BLOCK_DEPTH: usize = 20;

const DEFAULT_ANIMATION_DURATION: f64 = 0.4;
const IMAGE_OVERLAY: &str = "rgba(0, 0, 0, 0.3)";

/// Audience of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Public page; unknown or failing blocks are skipped.
    #[default]
    Live,
    /// Admin canvas; problems render as visible placeholders.
    Editing,
}

/// Render pass settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Render audience.
    pub mode: RenderMode,
    /// Suppresses entrance animations in live mode too.
    pub disable_animations: bool,
}

impl RenderOptions {
    /// Public page settings.
    #[must_use]
    pub fn live() -> Self {
        Self::default()
    }

    /// Admin canvas settings.
    #[must_use]
    pub fn editing() -> Self {
        Self {
            mode: RenderMode::Editing,
            disable_animations: true,
        }
    }

    fn is_editing(&self) -> bool {
        self.mode == RenderMode::Editing
    }
}

/// Read handle on a running form's state, shared with field blocks in live mode.
#[derive(Debug, Clone, Copy)]
pub struct FormContext<'a> {
    values: &'a FieldValueMap,
    errors: &'a FieldErrors,
    current_step: usize,
    total_steps: usize,
}

impl<'a> FormContext<'a> {
    /// Creates a form handle.
    #[must_use]
    pub fn new(
        values: &'a FieldValueMap,
        errors: &'a FieldErrors,
        current_step: usize,
        total_steps: usize,
    ) -> Self {
        Self {
            values,
            errors,
            current_step,
            total_steps,
        }
    }

    /// Returns the one-based current step.
    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }
}

/// Current value and error of one form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBinding {
    /// Payload key.
    pub field_name: String,
    /// Committed value.
    pub value: Option<Value>,
    /// Value formatted for display, when it differs from the raw value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    /// Field-scoped validation message.
    pub error: Option<String>,
    /// Whether a value must be present.
    pub required: bool,
}

/// Named group of nested blocks, e.g. one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockSlot {
    /// Slot key.
    pub key: String,
    /// Rendered blocks of the slot.
    pub blocks: Vec<RenderedBlock>,
}

/// Type-specific output of one block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockContent {
    /// Component name the UI layer draws.
    pub component: String,
    /// Props merged with the type's defaults.
    pub props: Value,
    /// Field binding for form blocks in live mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldBinding>,
    /// Nested block groups of containers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<BlockSlot>,
}

impl BlockContent {
    /// Creates content without field binding or nested blocks.
    #[must_use]
    pub fn new(component: impl Into<String>, props: Value) -> Self {
        Self {
            component: component.into(),
            props,
            field: None,
            slots: Vec::new(),
        }
    }

    /// Attaches a field binding.
    #[must_use]
    pub fn with_field(mut self, field: Option<FieldBinding>) -> Self {
        self.field = field;
        self
    }

    /// Appends a nested block group.
    #[must_use]
    pub fn with_slot(mut self, key: impl Into<String>, blocks: Vec<RenderedBlock>) -> Self {
        self.slots.push(BlockSlot {
            key: key.into(),
            blocks,
        });
        self
    }
}

/// Visible stand-in for a block that cannot render in editing mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    /// Headline.
    pub title: String,
    /// Explanation.
    pub detail: String,
}

/// Body of a rendered block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockBody {
    /// Normal output.
    Content(BlockContent),
    /// Editing-mode stand-in.
    Placeholder(Placeholder),
}

/// Animated properties at one end of an entrance animation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AnimationFrame {
    /// Opacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Vertical offset in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Scale factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// Entrance animation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationView {
    /// Effect kind.
    pub entrance: EntranceAnimation,
    /// Starting frame.
    pub initial: AnimationFrame,
    /// Final frame.
    pub animate: AnimationFrame,
    /// Duration in seconds.
    pub duration: f64,
    /// Delay in seconds.
    pub delay: f64,
    /// Easing curve.
    pub ease: &'static str,
}

/// Editing-mode handle used to address the block in editor operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorHandle {
    /// Block id.
    pub block_id: String,
    /// Nesting depth, 1 for top-level blocks.
    pub depth: usize,
}

/// One rendered block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedBlock {
    /// Block id.
    pub id: String,
    /// Block type key.
    pub block_type: String,
    /// Responsive visibility classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_class: Option<String>,
    /// Entrance animation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationView>,
    /// Output.
    pub body: BlockBody,
    /// Editing-mode handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<EditorHandle>,
}

/// Resolved section styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStyle {
    /// Solid background color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// CSS background shorthand, used for gradients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Background image url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Overlay color drawn over a background image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
    /// Top padding.
    pub padding_top: String,
    /// Bottom padding.
    pub padding_bottom: String,
}

/// One rendered section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    /// Section id, used as the anchor.
    pub id: String,
    /// Section name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Resolved styling.
    pub style: SectionStyle,
    /// Rendered blocks.
    pub blocks: Vec<RenderedBlock>,
}

/// One rendered form step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    /// One-based step number.
    pub number: usize,
    /// Step id.
    pub id: String,
    /// Step title.
    pub title: String,
    /// Step description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Layout hint.
    pub layout: StepLayout,
    /// Rendered field blocks.
    pub blocks: Vec<RenderedBlock>,
}

/// Rendered form flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowView {
    /// Rendered steps.
    pub steps: Vec<StepView>,
    /// Submit button label.
    pub submit_button_text: String,
    /// Success title.
    pub success_title: String,
    /// Success message.
    pub success_message: String,
}

/// Rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    /// Rendered sections.
    pub sections: Vec<SectionView>,
    /// Rendered effective form flow.
    pub form: FlowView,
}

/// State handed to a block while it renders.
pub struct RenderContext<'a> {
    registry: &'a BlockRegistry,
    options: RenderOptions,
    form: Option<FormContext<'a>>,
    depth: usize,
    shallow: bool,
}

impl<'a> RenderContext<'a> {
    /// Editing context that validates one block without rendering its children.
    pub(crate) fn dry_run(registry: &'a BlockRegistry, depth: usize) -> Self {
        Self {
            registry,
            options: RenderOptions::editing(),
            form: None,
            depth,
            shallow: true,
        }
    }

    /// Returns render audience.
    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.options.mode
    }

    /// Returns whether this is an editing pass.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.options.is_editing()
    }

    /// Returns nesting depth of the block being rendered.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the running form, in live mode only.
    #[must_use]
    pub fn form(&self) -> Option<FormContext<'a>> {
        if self.is_editing() { None } else { self.form }
    }

    /// Renders nested blocks one level deeper with the same mode.
    #[must_use]
    pub fn render_children(&self, blocks: &[BlockConfig]) -> Vec<RenderedBlock> {
        if self.shallow {
            return Vec::new();
        }

        blocks
            .iter()
            .filter_map(|block| {
                render_block_at(self.registry, self.options, self.form, block, self.depth + 1)
            })
            .collect()
    }

    /// Returns the current value and error of a field, in live mode only.
    #[must_use]
    pub fn field_binding(&self, spec: &FieldSpec) -> Option<FieldBinding> {
        let form = self.form()?;
        Some(FieldBinding {
            field_name: spec.field_name().to_owned(),
            value: form.values.get(spec.field_name()).cloned(),
            display_value: None,
            error: form.errors.get(spec.field_name()).map(ToOwned::to_owned),
            required: spec.required(),
        })
    }
}

/// Turns block, section, and page configuration into view models.
#[derive(Clone)]
pub struct BlockRenderer {
    registry: Arc<BlockRegistry>,
}

impl BlockRenderer {
    /// Creates a renderer over a populated registry.
    #[must_use]
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry blocks are resolved through.
    #[must_use]
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Renders one top-level block. `None` means the block is skipped.
    #[must_use]
    pub fn render_block(
        &self,
        config: &BlockConfig,
        options: RenderOptions,
        form: Option<FormContext<'_>>,
    ) -> Option<RenderedBlock> {
        render_block_at(&self.registry, options, form, config, 1)
    }

    /// Renders one section.
    #[must_use]
    pub fn render_section(
        &self,
        section: &PageSection,
        options: RenderOptions,
        form: Option<FormContext<'_>>,
    ) -> SectionView {
        SectionView {
            id: section.id().to_owned(),
            name: section.name().map(ToOwned::to_owned),
            style: section_style(section),
            blocks: section
                .blocks()
                .iter()
                .filter_map(|block| self.render_block(block, options, form))
                .collect(),
        }
    }

    /// Renders one form step.
    #[must_use]
    pub fn render_step(
        &self,
        number: usize,
        step: &FormStep,
        options: RenderOptions,
        form: Option<FormContext<'_>>,
    ) -> StepView {
        StepView {
            number,
            id: step.id().to_owned(),
            title: step.title().to_owned(),
            description: step.description().map(ToOwned::to_owned),
            layout: step.layout(),
            blocks: step
                .blocks()
                .iter()
                .filter_map(|block| self.render_block(block, options, form))
                .collect(),
        }
    }

    /// Renders every step of a flow.
    #[must_use]
    pub fn render_flow(
        &self,
        flow: &FormFlow,
        options: RenderOptions,
        form: Option<FormContext<'_>>,
    ) -> FlowView {
        FlowView {
            steps: flow
                .steps()
                .iter()
                .enumerate()
                .map(|(index, step)| self.render_step(index + 1, step, options, form))
                .collect(),
            submit_button_text: flow.submit_button_text().to_owned(),
            success_title: flow.success_title().to_owned(),
            success_message: flow.success_message().to_owned(),
        }
    }

    /// Renders every section and the effective form flow of a document.
    #[must_use]
    pub fn render_page(
        &self,
        document: &PageDocument,
        options: RenderOptions,
        form: Option<FormContext<'_>>,
    ) -> PageView {
        PageView {
            sections: document
                .sections()
                .iter()
                .map(|section| self.render_section(section, options, form))
                .collect(),
            form: self.render_flow(&document.effective_form_flow(), options, form),
        }
    }
}

fn render_block_at(
    registry: &BlockRegistry,
    options: RenderOptions,
    form: Option<FormContext<'_>>,
    config: &BlockConfig,
    depth: usize,
) -> Option<RenderedBlock> {
    if depth > MAX_BLOCK_DEPTH {
        let error = AppError::Configuration(format!(
            "block '{}' exceeds the maximum nesting depth of {MAX_BLOCK_DEPTH}",
            config.id()
        ));
        return render_failure(options, config, depth, &error);
    }

    let Some(block) = registry.get_component(config.block_type()) else {
        if options.is_editing() {
            return Some(placeholder_block(
                config,
                depth,
                format!("Unknown block type: {}", config.block_type()),
                "This block type is not registered in the block registry.".to_owned(),
            ));
        }

        debug!(
            block_id = config.id(),
            block_type = config.block_type(),
            "skipping unregistered block type"
        );
        return None;
    };

    let context = RenderContext {
        registry,
        options,
        form,
        depth,
        shallow: false,
    };

    match block.render(config, &context) {
        Ok(content) => Some(RenderedBlock {
            id: config.id().to_owned(),
            block_type: config.block_type().to_owned(),
            visibility_class: visibility_class(config.visibility()),
            animation: animation_view(config, options),
            body: BlockBody::Content(content),
            editor: editor_handle(config, options, depth),
        }),
        Err(error) => render_failure(options, config, depth, &error),
    }
}

fn render_failure(
    options: RenderOptions,
    config: &BlockConfig,
    depth: usize,
    error: &AppError,
) -> Option<RenderedBlock> {
    if options.is_editing() {
        return Some(placeholder_block(
            config,
            depth,
            format!("Error rendering block: {}", config.block_type()),
            error.to_string(),
        ));
    }

    warn!(
        block_id = config.id(),
        block_type = config.block_type(),
        depth,
        error = %error,
        "skipping block that failed to render"
    );
    None
}

fn placeholder_block(
    config: &BlockConfig,
    depth: usize,
    title: String,
    detail: String,
) -> RenderedBlock {
    RenderedBlock {
        id: config.id().to_owned(),
        block_type: config.block_type().to_owned(),
        visibility_class: None,
        animation: None,
        body: BlockBody::Placeholder(Placeholder { title, detail }),
        editor: Some(EditorHandle {
            block_id: config.id().to_owned(),
            depth,
        }),
    }
}

fn editor_handle(config: &BlockConfig, options: RenderOptions, depth: usize) -> Option<EditorHandle> {
    options.is_editing().then(|| EditorHandle {
        block_id: config.id().to_owned(),
        depth,
    })
}

/// Maps breakpoint visibility to responsive utility classes.
#[must_use]
pub fn visibility_class(visibility: BlockVisibility) -> Option<String> {
    let BlockVisibility {
        desktop,
        tablet,
        mobile,
    } = visibility;

    let class = match (mobile, tablet, desktop) {
        (false, false, false) => "hidden",
        (false, true, _) => "hidden md:block",
        (false, false, true) => "hidden lg:block",
        (true, false, false) => "md:hidden",
        (true, true, false) => "lg:hidden",
        (true, _, true) => return None,
    };

    Some(class.to_owned())
}

fn animation_view(config: &BlockConfig, options: RenderOptions) -> Option<AnimationView> {
    if options.is_editing() || options.disable_animations {
        return None;
    }

    let animation = config.animation()?;
    let (initial, animate) = match animation.entrance {
        EntranceAnimation::None => return None,
        EntranceAnimation::FadeIn => (
            AnimationFrame {
                opacity: Some(0.0),
                ..AnimationFrame::default()
            },
            AnimationFrame {
                opacity: Some(1.0),
                ..AnimationFrame::default()
            },
        ),
        EntranceAnimation::SlideUp | EntranceAnimation::SlideDown => {
            let offset = if animation.entrance == EntranceAnimation::SlideUp {
                20.0
            } else {
                -20.0
            };
            (
                AnimationFrame {
                    opacity: Some(0.0),
                    y: Some(offset),
                    scale: None,
                },
                AnimationFrame {
                    opacity: Some(1.0),
                    y: Some(0.0),
                    scale: None,
                },
            )
        }
        EntranceAnimation::ScaleIn => (
            AnimationFrame {
                opacity: Some(0.0),
                y: None,
                scale: Some(0.95),
            },
            AnimationFrame {
                opacity: Some(1.0),
                y: None,
                scale: Some(1.0),
            },
        ),
    };

    Some(AnimationView {
        entrance: animation.entrance,
        initial,
        animate,
        duration: animation.duration.unwrap_or(DEFAULT_ANIMATION_DURATION),
        delay: animation.delay.unwrap_or_default(),
        ease: "easeOut",
    })
}

/// Resolves background and padding of a section.
#[must_use]
pub fn section_style(section: &PageSection) -> SectionStyle {
    let padding = section.padding();
    let mut style = SectionStyle {
        background_color: None,
        background: None,
        background_image: None,
        overlay: None,
        padding_top: padding.top().to_owned(),
        padding_bottom: padding.bottom().to_owned(),
    };

    if let Some(background) = section.background() {
        match background.kind {
            BackgroundKind::Color => style.background_color = Some(background.value.clone()),
            BackgroundKind::Gradient => style.background = Some(background.value.clone()),
            BackgroundKind::Image => {
                style.background_image = Some(background.value.clone());
                style.overlay = Some(IMAGE_OVERLAY.to_owned());
            }
        }
    }

    style
}

#[cfg(test)]
mod tests;
