//! Block data model

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a block, generated on the client at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}

	pub fn from_uuid(uuid: Uuid) -> Self {
		Self(uuid)
	}

	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl Default for BlockId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for BlockId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl FromStr for BlockId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Uuid::parse_str(s).map(Self)
	}
}

/// Identifier of the page that owns a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(Uuid);

impl PageId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}

	pub fn from_uuid(uuid: Uuid) -> Self {
		Self(uuid)
	}

	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl Default for PageId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for PageId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl FromStr for PageId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Uuid::parse_str(s).map(Self)
	}
}

/// Block type identifier
///
/// A tag rather than an enum: a block loaded from storage may carry a tag the
/// current registry no longer knows, and it must survive hydration so it can
/// be shown as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockType(String);

impl BlockType {
	pub fn new(tag: impl Into<String>) -> Self {
		Self(tag.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for BlockType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for BlockType {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for BlockType {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for BlockType {
	fn from(tag: &str) -> Self {
		Self(tag.to_string())
	}
}

impl From<String> for BlockType {
	fn from(tag: String) -> Self {
		Self(tag)
	}
}

impl PartialEq<str> for BlockType {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for BlockType {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

/// The atomic unit of a composed page.
///
/// `id`, `page_id` and `block_type` are fixed at construction. Only the
/// collection that owns a block changes its content and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
	id: BlockId,
	page_id: PageId,
	block_type: BlockType,
	content: JsonValue,
	order_index: usize,
}

impl Block {
	/// Create a block with a freshly generated id
	pub fn new(
		page_id: PageId,
		block_type: impl Into<BlockType>,
		content: JsonValue,
		order_index: usize,
	) -> Self {
		Self::from_parts(BlockId::new(), page_id, block_type, content, order_index)
	}

	/// Rebuild a block from stored parts
	pub fn from_parts(
		id: BlockId,
		page_id: PageId,
		block_type: impl Into<BlockType>,
		content: JsonValue,
		order_index: usize,
	) -> Self {
		Self {
			id,
			page_id,
			block_type: block_type.into(),
			content,
			order_index,
		}
	}

	pub fn id(&self) -> BlockId {
		self.id
	}

	pub fn page_id(&self) -> PageId {
		self.page_id
	}

	pub fn block_type(&self) -> &BlockType {
		&self.block_type
	}

	pub fn content(&self) -> &JsonValue {
		&self.content
	}

	pub fn order_index(&self) -> usize {
		self.order_index
	}

	pub fn order_entry(&self) -> OrderEntry {
		OrderEntry {
			id: self.id,
			order_index: self.order_index,
		}
	}

	pub(crate) fn replace_content(&mut self, content: JsonValue) -> JsonValue {
		std::mem::replace(&mut self.content, content)
	}

	pub(crate) fn set_order_index(&mut self, order_index: usize) {
		self.order_index = order_index;
	}
}

/// One `{id, order_index}` pair of a bulk reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderEntry {
	pub id: BlockId,
	pub order_index: usize,
}

impl OrderEntry {
	pub fn new(id: BlockId, order_index: usize) -> Self {
		Self { id, order_index }
	}
}
