use std::sync::Arc;

use pagecraft_core::{AppError, AppResult};
use pagecraft_domain::{
    BackgroundKind, BlockAnimation, BlockConfig, BlockVisibility, EntranceAnimation, FieldError,
    FieldErrors, FieldRule, FieldSpec, FieldValueMap, FormFlow, PageDocument, PageSection,
    SectionBackground,
};
use serde_json::{Map, Value, json};

use super::{
    BlockBody, BlockContent, BlockRenderer, FormContext, MAX_BLOCK_DEPTH, RenderContext,
    RenderOptions, RenderedBlock, section_style, visibility_class,
};
use crate::{Block, BlockCategory, BlockMetadata, BlockRegistry};

struct FailingBlock;

impl Block for FailingBlock {
    fn render(&self, config: &BlockConfig, _context: &RenderContext<'_>) -> AppResult<BlockContent> {
        Err(AppError::Configuration(format!(
            "block '{}' cannot render",
            config.id()
        )))
    }
}

struct BoundFieldBlock;

impl Block for BoundFieldBlock {
    fn render(&self, config: &BlockConfig, context: &RenderContext<'_>) -> AppResult<BlockContent> {
        let spec = FieldSpec::new("email", config.id(), "bound", "Email", true, FieldRule::Email)?;
        Ok(BlockContent::new("Bound", Value::Null).with_field(context.field_binding(&spec)))
    }
}

fn renderer() -> BlockRenderer {
    let mut registry = BlockRegistry::builtin();
    let metadata = || {
        BlockMetadata::new("Test", "test", BlockCategory::Content, "Bug", Map::new())
    };
    registry.register("failing", Arc::new(FailingBlock), metadata());
    registry.register("bound", Arc::new(BoundFieldBlock), metadata());
    BlockRenderer::new(Arc::new(registry))
}

fn block(id: &str, block_type: &str) -> BlockConfig {
    BlockConfig::new(id, block_type, Map::new()).unwrap_or_else(|_| unreachable!())
}

fn nested_containers(depth: usize) -> BlockConfig {
    let mut current = block("leaf", "spacer");
    for level in 1..depth {
        current = block(&format!("container-{level}"), "container").with_children(vec![current]);
    }
    current
}

fn deepest_body(block: &RenderedBlock) -> &BlockBody {
    match &block.body {
        BlockBody::Content(content) => content
            .slots
            .first()
            .and_then(|slot| slot.blocks.first())
            .map_or(&block.body, deepest_body),
        BlockBody::Placeholder(_) => &block.body,
    }
}

#[test]
fn unknown_block_is_skipped_live_and_placeholder_while_editing() {
    let renderer = renderer();
    let unknown = block("x-1", "marquee");

    assert!(renderer
        .render_block(&unknown, RenderOptions::live(), None)
        .is_none());

    let editing = renderer.render_block(&unknown, RenderOptions::editing(), None);
    assert!(matches!(
        editing.map(|block| block.body),
        Some(BlockBody::Placeholder(placeholder))
            if placeholder.title == "Unknown block type: marquee"
    ));
}

#[test]
fn failing_block_does_not_take_down_siblings() {
    let renderer = renderer();
    let section = PageSection::new(
        "hero",
        vec![
            block("a", "headline"),
            block("b", "failing"),
            block("c", "body-text"),
        ],
    )
    .unwrap_or_else(|_| unreachable!());

    let live = renderer.render_section(&section, RenderOptions::live(), None);
    let ids: Vec<&str> = live.blocks.iter().map(|block| block.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);

    let editing = renderer.render_section(&section, RenderOptions::editing(), None);
    assert_eq!(editing.blocks.len(), 3);
    assert!(matches!(
        &editing.blocks[1].body,
        BlockBody::Placeholder(placeholder)
            if placeholder.title == "Error rendering block: failing"
                && placeholder.detail.contains("cannot render")
    ));
}

#[test]
fn nesting_at_the_limit_renders_and_one_more_level_fails() {
    let renderer = renderer();

    let at_limit = renderer.render_block(
        &nested_containers(MAX_BLOCK_DEPTH),
        RenderOptions::editing(),
        None,
    );
    assert!(at_limit.is_some());
    let at_limit = at_limit.unwrap_or_else(|| unreachable!());
    assert!(matches!(deepest_body(&at_limit), BlockBody::Content(_)));

    let over_limit = renderer.render_block(
        &nested_containers(MAX_BLOCK_DEPTH + 1),
        RenderOptions::editing(),
        None,
    );
    assert!(over_limit.is_some());
    let over_limit = over_limit.unwrap_or_else(|| unreachable!());
    assert!(matches!(
        deepest_body(&over_limit),
        BlockBody::Placeholder(placeholder) if placeholder.detail.contains("nesting depth")
    ));
}

#[test]
fn editor_handles_only_appear_while_editing() {
    let renderer = renderer();
    let container = block("outer", "container").with_children(vec![block("inner", "headline")]);

    let live = renderer.render_block(&container, RenderOptions::live(), None);
    assert!(live.is_some_and(|block| block.editor.is_none()));

    let editing = renderer.render_block(&container, RenderOptions::editing(), None);
    let inner_depth = editing.and_then(|block| match block.body {
        BlockBody::Content(content) => content
            .slots
            .into_iter()
            .next()
            .and_then(|slot| slot.blocks.into_iter().next())
            .and_then(|inner| inner.editor)
            .map(|handle| handle.depth),
        BlockBody::Placeholder(_) => None,
    });
    assert_eq!(inner_depth, Some(2));
}

#[test]
fn field_binding_is_live_only() {
    let renderer = renderer();
    let mut values = FieldValueMap::new();
    values.insert("email".to_owned(), json!("a@b"));
    let mut errors = FieldErrors::default();
    errors.insert(FieldError {
        field_name: "email".to_owned(),
        message: "Please enter a valid email address".to_owned(),
    });
    let form = FormContext::new(&values, &errors, 1, 1);
    let bound = block("email-1", "bound");

    let field = |options| {
        renderer
            .render_block(&bound, options, Some(form))
            .and_then(|block| match block.body {
                BlockBody::Content(content) => content.field,
                BlockBody::Placeholder(_) => None,
            })
    };

    let live = field(RenderOptions::live());
    assert!(live.is_some());
    let live = live.unwrap_or_else(|| unreachable!());
    assert_eq!(live.value, Some(json!("a@b")));
    assert_eq!(
        live.error.as_deref(),
        Some("Please enter a valid email address")
    );
    assert!(live.required);

    assert!(field(RenderOptions::editing()).is_none());
}

#[test]
fn animation_defaults_and_suppression() {
    let renderer = renderer();
    let animated = block("h-1", "headline").with_animation(BlockAnimation {
        entrance: EntranceAnimation::SlideUp,
        delay: None,
        duration: None,
    });

    let live = renderer
        .render_block(&animated, RenderOptions::live(), None)
        .and_then(|block| block.animation);
    assert!(live.is_some());
    let live = live.unwrap_or_else(|| unreachable!());
    assert_eq!(live.duration, 0.4);
    assert_eq!(live.delay, 0.0);
    assert_eq!(live.initial.y, Some(20.0));
    assert_eq!(live.animate.opacity, Some(1.0));
    assert_eq!(live.ease, "easeOut");

    let disabled = RenderOptions {
        disable_animations: true,
        ..RenderOptions::live()
    };
    assert!(renderer
        .render_block(&animated, disabled, None)
        .is_some_and(|block| block.animation.is_none()));
    assert!(renderer
        .render_block(&animated, RenderOptions::editing(), None)
        .is_some_and(|block| block.animation.is_none()));

    let none = block("h-2", "headline").with_animation(BlockAnimation::default());
    assert!(renderer
        .render_block(&none, RenderOptions::live(), None)
        .is_some_and(|block| block.animation.is_none()));
}

#[test]
fn visibility_maps_to_breakpoint_classes() {
    let visibility = |desktop, tablet, mobile| BlockVisibility {
        desktop,
        tablet,
        mobile,
    };

    assert_eq!(visibility_class(visibility(true, true, true)), None);
    assert_eq!(
        visibility_class(visibility(true, true, false)).as_deref(),
        Some("hidden md:block")
    );
    assert_eq!(
        visibility_class(visibility(true, false, false)).as_deref(),
        Some("hidden lg:block")
    );
    assert_eq!(
        visibility_class(visibility(false, false, true)).as_deref(),
        Some("md:hidden")
    );
    assert_eq!(
        visibility_class(visibility(false, true, true)).as_deref(),
        Some("lg:hidden")
    );
    assert_eq!(
        visibility_class(visibility(false, false, false)).as_deref(),
        Some("hidden")
    );
}

#[test]
fn section_style_resolves_background_and_padding() {
    let section = PageSection::new("hero", Vec::new())
        .unwrap_or_else(|_| unreachable!())
        .with_background(SectionBackground {
            kind: BackgroundKind::Image,
            value: "https://cdn.example.com/house.jpg".to_owned(),
        });

    let style = section_style(&section);
    assert_eq!(
        style.background_image.as_deref(),
        Some("https://cdn.example.com/house.jpg")
    );
    assert_eq!(style.overlay.as_deref(), Some("rgba(0, 0, 0, 0.3)"));
    assert_eq!(style.padding_top, "2rem");
    assert_eq!(style.padding_bottom, "2rem");
    assert!(style.background_color.is_none());
}

#[test]
fn page_without_dynamic_steps_renders_the_legacy_flow() {
    let renderer = renderer();
    let document = PageDocument::new(Vec::new(), FormFlow::default());

    let view = renderer.render_page(&document, RenderOptions::live(), None);

    assert_eq!(view.form.steps.len(), 4);
    assert_eq!(view.form.steps[0].id, "address");
    assert_eq!(view.form.steps[3].number, 4);
    assert_eq!(view.form.submit_button_text, "Get My Free Appraisal");
}
