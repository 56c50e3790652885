use std::sync::Arc;

use pagecraft_core::{AppError, AppResult};
use pagecraft_domain::{
    BlockConfig, BlockProps, FormStep, PageDocument, PageSection, generate_block_id,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::renderer::RenderContext;
use crate::{BlockRegistry, SlotStorage};

type ListVisitor<'v> = dyn FnMut(&mut Vec<BlockConfig>) -> AppResult<bool> + 'v;
type SlotVisitor<'v> = dyn FnMut(&mut [Vec<BlockConfig>]) -> AppResult<bool> + 'v;

/// Where a block is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockLocation {
    /// Top level of a page section.
    Section {
        /// Section id.
        section_id: String,
    },
    /// Top level of a form step.
    Step {
        /// Step id.
        step_id: String,
    },
    /// Slot of a container block.
    Container {
        /// Container block id.
        block_id: String,
        /// Zero-based slot, e.g. the column index.
        #[serde(default)]
        slot: usize,
    },
}

/// One document edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Appends an empty section.
    AddSection {
        /// Section name.
        #[serde(default)]
        name: Option<String>,
    },
    /// Appends an empty form step.
    AddStep {
        /// Step title.
        title: String,
    },
    /// Inserts a default-configured block.
    InsertBlock {
        /// Target list.
        location: BlockLocation,
        /// Registry type key.
        block_type: String,
        /// Position in the target list; appended when absent.
        #[serde(default)]
        index: Option<usize>,
    },
    /// Inserts a copy of a block tree, such as a saved block template, under fresh ids.
    InsertCopy {
        /// Target list.
        location: BlockLocation,
        /// Block to copy.
        block: BlockConfig,
        /// Position in the target list; appended when absent.
        #[serde(default)]
        index: Option<usize>,
    },
    /// Merges props into a block; `null` removes a key.
    UpdateBlockProps {
        /// Block id.
        block_id: String,
        /// Props patch.
        props: BlockProps,
    },
    /// Moves a block to another list or position.
    MoveBlock {
        /// Block id.
        block_id: String,
        /// Target list.
        location: BlockLocation,
        /// Position in the target list; appended when absent.
        #[serde(default)]
        index: Option<usize>,
    },
    /// Removes a block with everything nested inside it.
    RemoveBlock {
        /// Block id.
        block_id: String,
    },
}

/// In-memory editing session over one page document.
pub struct DocumentEditor {
    registry: Arc<BlockRegistry>,
    document: PageDocument,
}

impl DocumentEditor {
    /// Starts editing a document.
    #[must_use]
    pub fn new(registry: Arc<BlockRegistry>, document: PageDocument) -> Self {
        Self { registry, document }
    }

    /// Returns the current document.
    #[must_use]
    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    /// Finishes editing.
    #[must_use]
    pub fn into_document(self) -> PageDocument {
        self.document
    }

    /// Applies one command and returns the id of the section, step, or block it touched.
    pub fn apply(&mut self, command: EditorCommand) -> AppResult<String> {
        match command {
            EditorCommand::AddSection { name } => self.add_section(name),
            EditorCommand::AddStep { title } => self.add_step(title),
            EditorCommand::InsertBlock {
                location,
                block_type,
                index,
            } => self.insert_block(&location, &block_type, index),
            EditorCommand::InsertCopy {
                location,
                block,
                index,
            } => self.insert_copy(&location, block, index),
            EditorCommand::UpdateBlockProps { block_id, props } => {
                self.update_block_props(&block_id, props)?;
                Ok(block_id)
            }
            EditorCommand::MoveBlock {
                block_id,
                location,
                index,
            } => {
                self.move_block(&block_id, &location, index)?;
                Ok(block_id)
            }
            EditorCommand::RemoveBlock { block_id } => {
                self.remove_block(&block_id)?;
                Ok(block_id)
            }
        }
    }

    /// Appends an empty section and returns its id.
    pub fn add_section(&mut self, name: Option<String>) -> AppResult<String> {
        let id = generate_block_id("section");
        let mut section = PageSection::new(id.clone(), Vec::new())?;
        if let Some(name) = name.filter(|name| !name.trim().is_empty()) {
            section = section.with_name(name);
        }

        self.document.sections_mut().push(section);
        Ok(id)
    }

    /// Appends an empty form step and returns its id.
    pub fn add_step(&mut self, title: String) -> AppResult<String> {
        let id = generate_block_id("step");
        let step = FormStep::new(id.clone(), title, Vec::new())?;
        self.document.form_flow_mut().steps_mut().push(step);
        Ok(id)
    }

    /// Inserts a default-configured block and returns its id.
    pub fn insert_block(
        &mut self,
        location: &BlockLocation,
        block_type: &str,
        index: Option<usize>,
    ) -> AppResult<String> {
        let block = self.registry.create_default_config(block_type).ok_or_else(|| {
            AppError::Validation(format!("unknown block type '{block_type}'"))
        })?;
        let id = block.id().to_owned();
        self.place(location, block, index)?;
        Ok(id)
    }

    /// Inserts a block tree with every id regenerated and returns the new root id.
    pub fn insert_copy(
        &mut self,
        location: &BlockLocation,
        mut block: BlockConfig,
        index: Option<usize>,
    ) -> AppResult<String> {
        if !self.registry.has(block.block_type()) {
            return Err(AppError::Validation(format!(
                "unknown block type '{}'",
                block.block_type()
            )));
        }

        regenerate_ids(&self.registry, &mut block)?;
        let id = block.id().to_owned();
        self.place(location, block, index)?;
        Ok(id)
    }

    /// Returns a copy of a block wherever it is nested.
    #[must_use]
    pub fn find_block(&self, block_id: &str) -> Option<BlockConfig> {
        let registry = self.registry.as_ref();
        self.document
            .sections()
            .iter()
            .map(PageSection::blocks)
            .chain(self.document.form_flow().steps().iter().map(FormStep::blocks))
            .find_map(|blocks| find_in(registry, blocks, block_id))
    }

    /// Merges a props patch into a block. The patched props must still decode.
    pub fn update_block_props(&mut self, block_id: &str, patch: BlockProps) -> AppResult<()> {
        let registry = Arc::clone(&self.registry);
        let mut patch = Some(patch);
        let mut outcome: AppResult<()> = Ok(());

        let found = self.edit_lists(&mut |list| {
            let Some(block) = list.iter_mut().find(|block| block.id() == block_id) else {
                return Ok(false);
            };

            let previous = block.props().clone();
            for (key, value) in patch.take().unwrap_or_default() {
                if value.is_null() {
                    block.props_mut().remove(&key);
                } else {
                    block.props_mut().insert(key, value);
                }
            }

            if let Some(component) = registry.get_component(block.block_type())
                && let Err(error) = component.render(block, &RenderContext::dry_run(&registry, 1))
            {
                *block.props_mut() = previous;
                outcome = Err(error);
            }
            Ok(true)
        })?;

        if !found {
            return Err(block_not_found(block_id));
        }
        outcome
    }

    /// Removes a block and returns it.
    pub fn remove_block(&mut self, block_id: &str) -> AppResult<BlockConfig> {
        let mut removed = None;
        self.edit_lists(&mut |list| {
            match list.iter().position(|block| block.id() == block_id) {
                Some(position) => {
                    removed = Some(list.remove(position));
                    Ok(true)
                }
                None => Ok(false),
            }
        })?;

        removed.ok_or_else(|| block_not_found(block_id))
    }

    /// Moves a block to another list or position.
    pub fn move_block(
        &mut self,
        block_id: &str,
        location: &BlockLocation,
        index: Option<usize>,
    ) -> AppResult<()> {
        let block = self
            .find_block(block_id)
            .ok_or_else(|| block_not_found(block_id))?;

        if let BlockLocation::Container {
            block_id: target, ..
        } = location
            && (target == block_id || find_in(&self.registry, &[block.clone()], target).is_some())
        {
            return Err(AppError::Validation(format!(
                "block '{block_id}' cannot be moved into itself"
            )));
        }

        let snapshot = self.document.clone();
        let block = self.remove_block(block_id)?;
        if let Err(error) = self.place(location, block, index) {
            self.document = snapshot;
            return Err(error);
        }

        Ok(())
    }

    fn place(
        &mut self,
        location: &BlockLocation,
        block: BlockConfig,
        index: Option<usize>,
    ) -> AppResult<()> {
        match location {
            BlockLocation::Section { section_id } => {
                let section = self
                    .document
                    .sections_mut()
                    .iter_mut()
                    .find(|section| section.id() == section_id)
                    .ok_or_else(|| AppError::NotFound(format!("section '{section_id}'")))?;
                insert_at(section.blocks_mut(), block, index);
                Ok(())
            }
            BlockLocation::Step { step_id } => {
                let step = self
                    .document
                    .form_flow_mut()
                    .steps_mut()
                    .iter_mut()
                    .find(|step| step.id() == step_id)
                    .ok_or_else(|| AppError::NotFound(format!("form step '{step_id}'")))?;
                insert_at(step.blocks_mut(), block, index);
                Ok(())
            }
            BlockLocation::Container { block_id, slot } => {
                let registry = Arc::clone(&self.registry);
                let mut pending = Some(block);
                let found = self.edit_lists(&mut |list| {
                    let Some(container) = list.iter_mut().find(|block| block.id() == block_id)
                    else {
                        return Ok(false);
                    };

                    let container_type = container.block_type().to_owned();
                    let placed = with_slots_mut(&registry, container, &mut |slots| {
                        let target = slots.get_mut(*slot).ok_or_else(|| {
                            AppError::Validation(format!(
                                "block '{block_id}' ({container_type}) has no slot {slot}"
                            ))
                        })?;
                        if let Some(block) = pending.take() {
                            insert_at(target, block, index);
                        }
                        Ok(true)
                    })?;
                    Ok(placed)
                })?;

                if found {
                    Ok(())
                } else {
                    Err(block_not_found(block_id))
                }
            }
        }
    }

    fn edit_lists(&mut self, visit: &mut ListVisitor<'_>) -> AppResult<bool> {
        let registry = Arc::clone(&self.registry);
        for section in self.document.sections_mut() {
            if edit_tree(&registry, section.blocks_mut(), visit)? {
                return Ok(true);
            }
        }
        for step in self.document.form_flow_mut().steps_mut() {
            if edit_tree(&registry, step.blocks_mut(), visit)? {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

fn block_not_found(block_id: &str) -> AppError {
    AppError::NotFound(format!("block '{block_id}'"))
}

fn regenerate_ids(registry: &BlockRegistry, block: &mut BlockConfig) -> AppResult<()> {
    block.regenerate_id();
    with_slots_mut(registry, block, &mut |slots| {
        for nested in slots.iter_mut().flatten() {
            regenerate_ids(registry, nested)?;
        }
        Ok(true)
    })?;
    Ok(())
}

fn insert_at(list: &mut Vec<BlockConfig>, block: BlockConfig, index: Option<usize>) {
    let index = index.map_or(list.len(), |index| index.min(list.len()));
    list.insert(index, block);
}

fn find_in(registry: &BlockRegistry, blocks: &[BlockConfig], block_id: &str) -> Option<BlockConfig> {
    blocks.iter().find_map(|block| {
        if block.id() == block_id {
            return Some(block.clone());
        }
        registry
            .nested_blocks(block)
            .ok()
            .and_then(|nested| find_in(registry, &nested, block_id))
    })
}

/// Offers `list` and then every nested list below it to `visit` until it reports a hit.
fn edit_tree(
    registry: &BlockRegistry,
    list: &mut Vec<BlockConfig>,
    visit: &mut ListVisitor<'_>,
) -> AppResult<bool> {
    if visit(list)? {
        return Ok(true);
    }

    for block in list.iter_mut() {
        let hit = with_slots_mut(registry, block, &mut |slots| {
            for slot in slots.iter_mut() {
                if edit_tree(registry, slot, visit)? {
                    return Ok(true);
                }
            }
            Ok(false)
        })?;
        if hit {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Exposes the nested block lists of a container for editing.
///
/// Lists stored in props are written back only when `edit` reports a change.
fn with_slots_mut(
    registry: &BlockRegistry,
    block: &mut BlockConfig,
    edit: &mut SlotVisitor<'_>,
) -> AppResult<bool> {
    let storage = match registry.slot_storage(block.block_type()) {
        SlotStorage::None if block.has_children_list() => SlotStorage::Children,
        storage => storage,
    };

    match storage {
        SlotStorage::None => Ok(false),
        SlotStorage::Children if block.has_children_list() => {
            edit(std::slice::from_mut(block.children_mut()))
        }
        SlotStorage::Children => {
            let mut slot: Vec<BlockConfig> = match block.props().get("children") {
                Some(legacy) => decode_blocks(block, legacy)?,
                None => Vec::new(),
            };
            let changed = edit(std::slice::from_mut(&mut slot))?;
            if changed {
                block.props_mut().remove("children");
                *block.children_mut() = slot;
            }
            Ok(changed)
        }
        SlotStorage::PropList {
            list_key,
            blocks_key,
        } => {
            let entries = match block.props().get(list_key) {
                Some(Value::Array(entries)) => entries.clone(),
                Some(_) => {
                    return Err(AppError::Configuration(format!(
                        "block '{}' has a malformed '{list_key}' prop",
                        block.id()
                    )));
                }
                None => Vec::new(),
            };

            let mut slots = entries
                .iter()
                .map(|entry| match entry.get(blocks_key) {
                    Some(blocks) => decode_blocks(block, blocks),
                    None => Ok(Vec::new()),
                })
                .collect::<AppResult<Vec<_>>>()?;

            let changed = edit(&mut slots)?;
            if changed {
                let mut entries = entries;
                for (entry, slot) in entries.iter_mut().zip(slots) {
                    if let Value::Object(entry) = entry {
                        let blocks = serde_json::to_value(slot).map_err(|error| {
                            AppError::Internal(format!("failed to encode nested blocks: {error}"))
                        })?;
                        entry.insert(blocks_key.to_owned(), blocks);
                    }
                }
                block
                    .props_mut()
                    .insert(list_key.to_owned(), Value::Array(entries));
            }
            Ok(changed)
        }
    }
}

fn decode_blocks(owner: &BlockConfig, value: &Value) -> AppResult<Vec<BlockConfig>> {
    serde_json::from_value(value.clone()).map_err(|error| {
        AppError::Configuration(format!(
            "block '{}' has malformed nested blocks: {error}",
            owner.id()
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pagecraft_domain::{BlockConfig, FormFlow, PageDocument, PageSection};
    use serde_json::{Map, Value, json};

    use super::{BlockLocation, DocumentEditor, EditorCommand};
    use crate::BlockRegistry;

    fn editor() -> DocumentEditor {
        let section = PageSection::new("hero", Vec::new()).unwrap_or_else(|_| unreachable!());
        DocumentEditor::new(
            Arc::new(BlockRegistry::builtin()),
            PageDocument::new(vec![section], FormFlow::default()),
        )
    }

    fn section(id: &str) -> BlockLocation {
        BlockLocation::Section {
            section_id: id.to_owned(),
        }
    }

    fn props(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn insert_and_find_blocks_at_any_depth() {
        let mut editor = editor();
        let card = editor.insert_block(&section("hero"), "card", None);
        assert!(card.is_ok());
        let card = card.unwrap_or_default();

        let headline = editor.insert_block(
            &BlockLocation::Container {
                block_id: card.clone(),
                slot: 0,
            },
            "headline",
            None,
        );
        assert!(headline.is_ok());
        let headline = headline.unwrap_or_default();

        let found = editor.find_block(&headline);
        assert_eq!(found.map(|block| block.block_type().to_owned()), Some("headline".to_owned()));
        assert_eq!(
            editor
                .find_block(&card)
                .map(|block| block.children().len()),
            Some(1)
        );
    }

    #[test]
    fn blocks_inserted_into_columns_persist_in_props() {
        let mut editor = editor();
        let columns = editor
            .insert_block(&section("hero"), "columns", None)
            .unwrap_or_default();

        let email = editor.insert_block(
            &BlockLocation::Container {
                block_id: columns.clone(),
                slot: 1,
            },
            "email-input",
            None,
        );
        assert!(email.is_ok());

        let stored = editor.find_block(&columns).unwrap_or_else(|| unreachable!());
        let second_column = &stored.props()["columns"][1]["blocks"];
        assert_eq!(second_column[0]["type"], json!("email-input"));
        assert_eq!(stored.props()["columns"][1]["width"], json!("1/2"));

        let missing_slot = editor.insert_block(
            &BlockLocation::Container {
                block_id: columns,
                slot: 5,
            },
            "spacer",
            None,
        );
        assert!(missing_slot.is_err());
    }

    #[test]
    fn prop_patches_merge_and_must_still_decode() {
        let mut editor = editor();
        let headline = editor
            .insert_block(&section("hero"), "headline", None)
            .unwrap_or_default();

        let patched = editor.update_block_props(
            &headline,
            props(json!({"text": "Free appraisal", "maxWidth": null})),
        );
        assert!(patched.is_ok());
        let block = editor.find_block(&headline).unwrap_or_else(|| unreachable!());
        assert_eq!(block.prop_str("text"), Some("Free appraisal"));
        assert!(block.props().get("maxWidth").is_none());

        let rejected = editor.update_block_props(&headline, props(json!({"level": "h9"})));
        assert!(rejected.is_err());
        let block = editor.find_block(&headline).unwrap_or_else(|| unreachable!());
        assert_eq!(block.prop_str("level"), Some("h1"));
    }

    #[test]
    fn move_block_between_sections_and_steps() {
        let mut editor = editor();
        let step = editor.add_step("Contact".to_owned()).unwrap_or_default();
        let email = editor
            .insert_block(&section("hero"), "email-input", None)
            .unwrap_or_default();

        let moved = editor.move_block(
            &email,
            &BlockLocation::Step {
                step_id: step.clone(),
            },
            Some(0),
        );
        assert!(moved.is_ok());
        assert!(editor.document().sections()[0].blocks().is_empty());
        assert_eq!(editor.document().form_flow().steps()[0].blocks()[0].id(), email);
    }

    #[test]
    fn container_cannot_move_into_itself() {
        let mut editor = editor();
        let outer = editor
            .insert_block(&section("hero"), "container", None)
            .unwrap_or_default();
        let inner = editor
            .insert_block(
                &BlockLocation::Container {
                    block_id: outer.clone(),
                    slot: 0,
                },
                "card",
                None,
            )
            .unwrap_or_default();

        let result = editor.move_block(
            &outer,
            &BlockLocation::Container {
                block_id: inner,
                slot: 0,
            },
            None,
        );
        assert!(result.is_err());
        assert!(editor.find_block(&outer).is_some());
    }

    #[test]
    fn failed_move_restores_the_document() {
        let mut editor = editor();
        let headline = editor
            .insert_block(&section("hero"), "headline", None)
            .unwrap_or_default();

        let result = editor.move_block(&headline, &section("missing"), None);
        assert!(result.is_err());
        assert!(editor.find_block(&headline).is_some());
    }

    #[test]
    fn legacy_card_children_move_into_the_children_list() {
        let card = BlockConfig::new(
            "card-1",
            "card",
            props(json!({"children": [{"id": "old", "type": "spacer", "props": {}}]})),
        )
        .unwrap_or_else(|_| unreachable!());
        let section = PageSection::new("hero", vec![card]).unwrap_or_else(|_| unreachable!());
        let mut editor = DocumentEditor::new(
            Arc::new(BlockRegistry::builtin()),
            PageDocument::new(vec![section], FormFlow::default()),
        );

        let removed = editor.remove_block("old");
        assert!(removed.is_ok());
        let card = editor.find_block("card-1").unwrap_or_else(|| unreachable!());
        assert!(card.has_children_list());
        assert!(card.children().is_empty());
        assert!(card.props().get("children").is_none());
    }

    #[test]
    fn copies_are_inserted_under_fresh_ids_at_every_depth() {
        let columns = BlockConfig::new(
            "cols-saved",
            "columns",
            props(json!({"columns": [
                {
                    "width": "1/2",
                    "blocks": [{"id": "email-saved", "type": "email-input", "props": {}}]
                },
                {"width": "1/2", "blocks": []}
            ]})),
        )
        .unwrap_or_else(|_| unreachable!());
        let mut editor = editor();

        let first = editor.insert_copy(&section("hero"), columns.clone(), None);
        let second = editor.insert_copy(&section("hero"), columns, None);
        assert!(first.is_ok());
        assert!(second.is_ok());
        let (first, second) = (first.unwrap_or_default(), second.unwrap_or_default());
        assert_ne!(first, "cols-saved");
        assert_ne!(first, second);

        let stored = editor.find_block(&first).unwrap_or_else(|| unreachable!());
        let nested_id = stored.props()["columns"][0]["blocks"][0]["id"].clone();
        assert_ne!(nested_id, json!("email-saved"));
        assert!(editor.find_block("email-saved").is_none());

        let unknown = BlockConfig::new("x", "no-such-block", Map::new())
            .unwrap_or_else(|_| unreachable!());
        assert!(editor.insert_copy(&section("hero"), unknown, None).is_err());
    }

    #[test]
    fn commands_deserialize_from_json() {
        let command: Result<EditorCommand, _> = serde_json::from_value(json!({
            "op": "insert_block",
            "location": {"kind": "container", "block_id": "cols", "slot": 1},
            "block_type": "spacer"
        }));

        assert!(matches!(
            command,
            Ok(EditorCommand::InsertBlock { location: BlockLocation::Container { slot: 1, .. }, index: None, .. })
        ));
    }
}
