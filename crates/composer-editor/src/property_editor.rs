//! Property editing for a single block

use composer_blocks::html::{escape_attr, html_escape};
use composer_blocks::{Block, BlockRegistry, BlockResult, BlockTypeDescriptor};
use composer_forms::{EditorChange, EditorForm, FormErrors};
use serde_json::Value as JsonValue;

/// Binds a block to its type's editor form.
///
/// Applying a change never mutates the block; the returned payload is handed
/// to [`PageComposer::update_block`](crate::PageComposer::update_block).
///
/// # Examples
///
/// ```
/// use composer_blocks::{Block, BlockRegistry, PageId};
/// use composer_editor::PropertyEditor;
/// use composer_forms::{EditorChange, FieldPath};
/// use serde_json::json;
///
/// let registry = BlockRegistry::builtin();
/// let block = Block::new(PageId::new(), "heading", json!({"text": "Old"}), 0);
///
/// let editor = PropertyEditor::new(&registry, &block).unwrap();
/// let content = editor
/// 	.apply(&EditorChange::set(FieldPath::field("text"), "New"))
/// 	.unwrap();
/// assert_eq!(content["text"], "New");
/// assert_eq!(block.content()["text"], "Old");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PropertyEditor<'a> {
	block: &'a Block,
	descriptor: &'a BlockTypeDescriptor,
}

impl<'a> PropertyEditor<'a> {
	/// Fails with `UnknownBlockType` for blocks whose type is not registered
	pub fn new(registry: &'a BlockRegistry, block: &'a Block) -> BlockResult<Self> {
		let descriptor = registry.get_descriptor(block.block_type().as_str())?;
		Ok(Self { block, descriptor })
	}

	pub fn block(&self) -> &'a Block {
		self.block
	}

	pub fn form(&self) -> &'a EditorForm {
		self.descriptor.editor()
	}

	/// Soft validation of the current content
	pub fn errors(&self) -> FormErrors {
		self.form().validate(self.block.content())
	}

	/// Apply `change` to the current content and return the conformed result
	pub fn apply(&self, change: &EditorChange) -> BlockResult<JsonValue> {
		let content = self.form().apply(self.block.content(), change)?;
		self.descriptor.conform(&content)
	}

	pub fn render(&self) -> String {
		format!(
			r#"<form class="composer-editor" data-block-id="{}" data-block-type="{}"><h3 class="composer-editor-title">{}</h3>{}</form>"#,
			self.block.id(),
			escape_attr(self.block.block_type().as_str()),
			html_escape(self.descriptor.label()),
			self.form().render(self.block.content(), &self.errors())
		)
	}
}
