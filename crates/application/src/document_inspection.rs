use std::collections::{HashMap, HashSet};

use pagecraft_core::{AppError, AppResult};
use pagecraft_domain::{BlockConfig, FieldSpec, FormFlow, PageDocument};
use serde::Serialize;
use tracing::debug;

use crate::BlockRegistry;
use crate::renderer::{MAX_BLOCK_DEPTH, RenderContext};

/// Kinds of problems found in a page document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Two blocks share an id.
    DuplicateBlockId,
    /// Two steps share an id.
    DuplicateStepId,
    /// A block tree is nested deeper than the renderer allows.
    TooDeep,
    /// A block type is not registered.
    UnknownBlockType,
    /// Props cannot be decoded for the block type.
    InvalidProps,
    /// Two form fields submit under the same name.
    DuplicateFieldName,
    /// Webhook, redirect, or notification address is malformed.
    InvalidSubmitAction,
    /// The flow has no steps.
    EmptyFlow,
}

/// One problem found in a page document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationIssue {
    /// Problem kind.
    pub kind: IssueKind,
    /// Offending block, when the problem is block-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl ConfigurationIssue {
    fn new(kind: IssueKind, block_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            block_id: block_id.map(ToOwned::to_owned),
            message: message.into(),
        }
    }

    /// Returns whether the issue only degrades rendering.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.kind == IssueKind::UnknownBlockType
    }
}

/// Folds blocking issues into one configuration error.
#[must_use]
pub fn issues_error(issues: &[ConfigurationIssue]) -> AppError {
    let messages: Vec<&str> = issues.iter().map(|issue| issue.message.as_str()).collect();
    AppError::Configuration(format!("page document is invalid: {}", messages.join("; ")))
}

/// A form flow with the fields of every step resolved through the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFlow {
    flow: FormFlow,
    step_fields: Vec<Vec<FieldSpec>>,
}

impl CompiledFlow {
    /// Resolves the fields of every step, failing on any blocking issue.
    pub fn compile(registry: &BlockRegistry, flow: &FormFlow) -> AppResult<Self> {
        let mut inspector = Inspector::new(registry);
        let compiled = inspector.inspect_flow(flow);
        if inspector.issues.is_empty() {
            Ok(compiled)
        } else {
            Err(issues_error(&inspector.issues))
        }
    }

    /// Returns the source flow.
    #[must_use]
    pub fn flow(&self) -> &FormFlow {
        &self.flow
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.step_fields.len()
    }

    /// Returns the fields of a one-based step; out-of-range steps have none.
    #[must_use]
    pub fn step_fields(&self, number: usize) -> &[FieldSpec] {
        number
            .checked_sub(1)
            .and_then(|index| self.step_fields.get(index))
            .map_or(&[], Vec::as_slice)
    }

    /// Returns every field of the flow in step order.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.step_fields.iter().flatten()
    }

    /// Returns a field by name with its one-based step number.
    #[must_use]
    pub fn field(&self, field_name: &str) -> Option<(usize, &FieldSpec)> {
        self.step_fields
            .iter()
            .enumerate()
            .find_map(|(index, fields)| {
                fields
                    .iter()
                    .find(|spec| spec.field_name() == field_name)
                    .map(|spec| (index + 1, spec))
            })
    }
}

/// Result of a successful document inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentIndex {
    flow: CompiledFlow,
    block_count: usize,
    warnings: Vec<ConfigurationIssue>,
}

impl DocumentIndex {
    /// Returns the compiled effective flow.
    #[must_use]
    pub fn flow(&self) -> &CompiledFlow {
        &self.flow
    }

    /// Returns the number of blocks, nested ones included.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.block_count
    }

    /// Returns non-blocking issues.
    #[must_use]
    pub fn warnings(&self) -> &[ConfigurationIssue] {
        &self.warnings
    }

    /// Returns the compiled flow, dropping the rest of the index.
    #[must_use]
    pub fn into_flow(self) -> CompiledFlow {
        self.flow
    }
}

/// Walks every section, step, and nested block of a document.
///
/// Unknown block types are reported as warnings; every other issue is blocking.
pub fn inspect_document(
    registry: &BlockRegistry,
    document: &PageDocument,
) -> Result<DocumentIndex, Vec<ConfigurationIssue>> {
    let mut inspector = Inspector::new(registry);

    for section in document.sections() {
        inspector.visit(section.blocks(), 1, None);
    }
    let flow = inspector.inspect_flow(&document.effective_form_flow());

    if inspector.issues.is_empty() {
        Ok(DocumentIndex {
            flow,
            block_count: inspector.block_count,
            warnings: inspector.warnings,
        })
    } else {
        Err(inspector.issues)
    }
}

struct Inspector<'r> {
    registry: &'r BlockRegistry,
    seen_block_ids: HashSet<String>,
    field_owners: HashMap<String, String>,
    issues: Vec<ConfigurationIssue>,
    warnings: Vec<ConfigurationIssue>,
    block_count: usize,
}

impl<'r> Inspector<'r> {
    fn new(registry: &'r BlockRegistry) -> Self {
        Self {
            registry,
            seen_block_ids: HashSet::new(),
            field_owners: HashMap::new(),
            issues: Vec::new(),
            warnings: Vec::new(),
            block_count: 0,
        }
    }

    fn inspect_flow(&mut self, flow: &FormFlow) -> CompiledFlow {
        if flow.steps().is_empty() {
            self.issues.push(ConfigurationIssue::new(
                IssueKind::EmptyFlow,
                None,
                "form flow has no steps",
            ));
        }

        if let Some(action) = flow.submit_action()
            && let Err(error) = action.validate()
        {
            self.issues.push(ConfigurationIssue::new(
                IssueKind::InvalidSubmitAction,
                None,
                error.to_string(),
            ));
        }

        let mut step_ids = HashSet::new();
        let mut step_fields = Vec::with_capacity(flow.steps().len());
        for step in flow.steps() {
            if !step_ids.insert(step.id()) {
                self.issues.push(ConfigurationIssue::new(
                    IssueKind::DuplicateStepId,
                    None,
                    format!("step id '{}' is used more than once", step.id()),
                ));
            }

            let mut fields = Vec::new();
            self.visit(step.blocks(), 1, Some(&mut fields));
            step_fields.push(fields);
        }

        CompiledFlow {
            flow: flow.clone(),
            step_fields,
        }
    }

    fn visit(
        &mut self,
        blocks: &[BlockConfig],
        depth: usize,
        mut fields: Option<&mut Vec<FieldSpec>>,
    ) {
        for block in blocks {
            self.block_count += 1;

            if !self.seen_block_ids.insert(block.id().to_owned()) {
                self.issues.push(ConfigurationIssue::new(
                    IssueKind::DuplicateBlockId,
                    Some(block.id()),
                    format!("block id '{}' is used more than once", block.id()),
                ));
            }

            if depth > MAX_BLOCK_DEPTH {
                self.issues.push(ConfigurationIssue::new(
                    IssueKind::TooDeep,
                    Some(block.id()),
                    format!(
                        "block '{}' exceeds the maximum nesting depth of {MAX_BLOCK_DEPTH}",
                        block.id()
                    ),
                ));
                continue;
            }

            match self.registry.get_component(block.block_type()) {
                Some(component) => {
                    let dry_run = RenderContext::dry_run(self.registry, depth);
                    if let Err(error) = component.render(block, &dry_run) {
                        self.invalid_props(block, &error);
                    }
                }
                None => {
                    debug!(
                        block_id = block.id(),
                        block_type = block.block_type(),
                        "document references an unregistered block type"
                    );
                    self.warnings.push(ConfigurationIssue::new(
                        IssueKind::UnknownBlockType,
                        Some(block.id()),
                        format!("unknown block type '{}'", block.block_type()),
                    ));
                }
            }

            if let Some(fields) = fields.as_deref_mut() {
                match self.registry.field_spec(block) {
                    Ok(Some(spec)) => self.claim_field(spec, fields),
                    Ok(None) => {}
                    Err(error) => self.invalid_props(block, &error),
                }
            }

            match self.registry.nested_blocks(block) {
                Ok(nested) => self.visit(&nested, depth + 1, fields.as_deref_mut()),
                Err(error) => self.invalid_props(block, &error),
            }
        }
    }

    fn claim_field(&mut self, spec: FieldSpec, fields: &mut Vec<FieldSpec>) {
        if let Some(owner) = self.field_owners.get(spec.field_name()) {
            self.issues.push(ConfigurationIssue::new(
                IssueKind::DuplicateFieldName,
                Some(spec.block_id()),
                format!(
                    "field name '{}' of block '{}' is already used by block '{owner}'",
                    spec.field_name(),
                    spec.block_id()
                ),
            ));
            return;
        }

        self.field_owners
            .insert(spec.field_name().to_owned(), spec.block_id().to_owned());
        fields.push(spec);
    }

    fn invalid_props(&mut self, block: &BlockConfig, error: &AppError) {
        let message = error.to_string();
        let duplicate = self.issues.iter().any(|issue| {
            issue.kind == IssueKind::InvalidProps
                && issue.block_id.as_deref() == Some(block.id())
        });
        if !duplicate {
            self.issues.push(ConfigurationIssue::new(
                IssueKind::InvalidProps,
                Some(block.id()),
                message,
            ));
        }
    }
}
