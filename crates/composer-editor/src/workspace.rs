//! Editing workspace: the live preview with the selected block swapped for
//! its property form

use crate::property_editor::PropertyEditor;
use composer_blocks::{BlockCollection, BlockId, PreviewOptions, PreviewRenderer};

/// Class added to the section of the block being edited
pub const SELECTED_CLASS: &str = "is-selected";

/// Render `collection` in order. The selected block shows its editor form
/// instead of its preview; a selected block without an editor (unknown
/// type) falls back to the preview.
pub fn render_workspace(
	collection: &BlockCollection,
	options: &PreviewOptions,
	selected: Option<BlockId>,
) -> String {
	let registry = collection.registry();
	let renderer = PreviewRenderer::new(registry).with_options(options.clone());

	let mut html = String::from(r#"<div class="composer-workspace">"#);
	for block in collection {
		if selected == Some(block.id()) {
			let inner = match PropertyEditor::new(registry, block) {
				Ok(editor) => editor.render(),
				Err(_) => renderer.render_inner(block),
			};
			html.push_str(&renderer.wrap(block, &inner, SELECTED_CLASS));
		} else {
			html.push_str(&renderer.render_block(block));
		}
	}
	html.push_str("</div>");
	html
}
