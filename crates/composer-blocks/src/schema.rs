//! Per-type payload schemas and registry descriptors

use crate::block::BlockType;
use crate::error::{BlockError, BlockResult};
use crate::registry::CatalogEntry;
use composer_forms::EditorForm;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Picker category of a block type, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
	Basic,
	Media,
	Sections,
	SocialProof,
	Forms,
}

impl BlockCategory {
	pub const ALL: [BlockCategory; 5] = [
		BlockCategory::Basic,
		BlockCategory::Media,
		BlockCategory::Sections,
		BlockCategory::SocialProof,
		BlockCategory::Forms,
	];

	pub fn label(&self) -> &'static str {
		match self {
			BlockCategory::Basic => "Basic",
			BlockCategory::Media => "Media",
			BlockCategory::Sections => "Sections",
			BlockCategory::SocialProof => "Social proof",
			BlockCategory::Forms => "Forms",
		}
	}
}

impl fmt::Display for BlockCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// A typed content record for one block type.
///
/// Implementors are closed records: `#[serde(default, deny_unknown_fields)]`
/// so that a payload with a foreign key or a wrong value type fails to
/// deserialize. `Default` is the content of a freshly added block.
pub trait BlockSchema: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
	/// Type tag stored with every block of this type
	const TYPE: &'static str;
	const LABEL: &'static str;
	const DESCRIPTION: &'static str;
	const CATEGORY: BlockCategory;

	/// Property form describing how the payload is edited
	fn editor() -> EditorForm;

	/// Read-only HTML of the payload
	fn render(&self) -> String;
}

type ConformFn = fn(&JsonValue) -> BlockResult<JsonValue>;
type RenderFn = fn(&JsonValue) -> BlockResult<String>;

/// Registry entry: everything the engine needs to know about one block type
pub struct BlockTypeDescriptor {
	block_type: BlockType,
	label: &'static str,
	description: &'static str,
	category: BlockCategory,
	default_content: JsonValue,
	editor: EditorForm,
	conform: ConformFn,
	render: RenderFn,
}

impl BlockTypeDescriptor {
	/// Derive a descriptor from a typed content record
	///
	/// # Examples
	///
	/// ```
	/// use composer_blocks::schema::BlockTypeDescriptor;
	/// use composer_blocks::types::Heading;
	/// use serde_json::json;
	///
	/// let descriptor = BlockTypeDescriptor::of::<Heading>();
	/// assert_eq!(descriptor.block_type().as_str(), "heading");
	///
	/// let conformed = descriptor.conform(&json!({"text": "Hello"})).unwrap();
	/// assert_eq!(conformed, json!({"text": "Hello", "level": "h2", "align": "left"}));
	///
	/// assert!(descriptor.conform(&json!({"text": "Hello", "color": "red"})).is_err());
	/// ```
	pub fn of<T: BlockSchema>() -> Self {
		// Plain records always serialize; the empty object still conforms
		// because every record is `#[serde(default)]`.
		let default_content =
			serde_json::to_value(T::default()).unwrap_or_else(|_| JsonValue::Object(Map::new()));
		Self {
			block_type: BlockType::new(T::TYPE),
			label: T::LABEL,
			description: T::DESCRIPTION,
			category: T::CATEGORY,
			default_content,
			editor: T::editor(),
			conform: conform_as::<T>,
			render: render_as::<T>,
		}
	}

	pub fn block_type(&self) -> &BlockType {
		&self.block_type
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	pub fn description(&self) -> &'static str {
		self.description
	}

	pub fn category(&self) -> BlockCategory {
		self.category
	}

	pub fn default_content(&self) -> &JsonValue {
		&self.default_content
	}

	pub fn editor(&self) -> &EditorForm {
		&self.editor
	}

	/// Pass a payload through the type's record, returning its canonical form
	pub fn conform(&self, content: &JsonValue) -> BlockResult<JsonValue> {
		(self.conform)(content)
	}

	pub fn render(&self, content: &JsonValue) -> BlockResult<String> {
		(self.render)(content)
	}

	pub fn catalog_entry(&self) -> CatalogEntry {
		CatalogEntry {
			block_type: self.block_type.clone(),
			label: self.label.to_string(),
			description: self.description.to_string(),
		}
	}
}

impl fmt::Debug for BlockTypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BlockTypeDescriptor")
			.field("block_type", &self.block_type)
			.field("label", &self.label)
			.field("category", &self.category)
			.finish_non_exhaustive()
	}
}

fn decode<T: BlockSchema>(content: &JsonValue) -> BlockResult<T> {
	if !content.is_object() {
		return Err(BlockError::InvalidContent {
			block_type: T::TYPE.to_string(),
			reason: "content must be an object".to_string(),
		});
	}
	T::deserialize(content).map_err(|e| BlockError::InvalidContent {
		block_type: T::TYPE.to_string(),
		reason: e.to_string(),
	})
}

fn conform_as<T: BlockSchema>(content: &JsonValue) -> BlockResult<JsonValue> {
	let record = decode::<T>(content)?;
	serde_json::to_value(&record).map_err(|e| BlockError::InvalidContent {
		block_type: T::TYPE.to_string(),
		reason: e.to_string(),
	})
}

fn render_as<T: BlockSchema>(content: &JsonValue) -> BlockResult<String> {
	Ok(decode::<T>(content)?.render())
}
