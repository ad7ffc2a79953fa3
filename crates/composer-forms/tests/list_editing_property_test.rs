//! Property-based tests for repeatable list editing

use composer_forms::{CharField, EditorChange, EditorForm, FieldPath, ListField};
use proptest::prelude::*;
use serde_json::{Value, json};

fn form() -> EditorForm {
	EditorForm::new()
		.field(CharField::new("title"))
		.field(ListField::new("items").field(CharField::new("quote").required()))
}

fn quotes(content: &Value) -> Vec<String> {
	content["items"]
		.as_array()
		.map(|items| {
			items
				.iter()
				.map(|item| item["quote"].as_str().unwrap_or_default().to_string())
				.collect()
		})
		.unwrap_or_default()
}

fn content_with(quotes: &[String]) -> Value {
	let items: Vec<Value> = quotes.iter().map(|q| json!({"quote": q})).collect();
	json!({"title": "", "items": items})
}

proptest! {
	#[test]
	fn prop_remove_preserves_relative_order(
		entries in proptest::collection::vec("[a-z]{1,8}", 1..12),
		pick in any::<usize>(),
	) {
		// Arrange
		let form = form();
		let index = pick % entries.len();
		let mut expected = entries.clone();
		expected.remove(index);

		// Act
		let updated = form
			.apply(&content_with(&entries), &EditorChange::remove_item("items", index))
			.unwrap();

		// Assert
		prop_assert_eq!(quotes(&updated), expected);
	}

	#[test]
	fn prop_move_preserves_other_entries(
		entries in proptest::collection::vec("[a-z]{1,8}", 1..12),
		from in any::<usize>(),
		to in any::<usize>(),
	) {
		// Arrange
		let form = form();
		let from = from % entries.len();
		let to = to % entries.len();
		let mut expected = entries.clone();
		let moved = expected.remove(from);
		expected.insert(to, moved);

		// Act
		let updated = form
			.apply(&content_with(&entries), &EditorChange::move_item("items", from, to))
			.unwrap();

		// Assert
		prop_assert_eq!(quotes(&updated), expected);
	}

	#[test]
	fn prop_every_change_yields_complete_object(
		title in ".{0,20}",
		adds in 0usize..5,
	) {
		// Arrange
		let form = form();
		let mut content = json!({});

		// Act
		content = form
			.apply(&content, &EditorChange::set(FieldPath::field("title"), title))
			.unwrap();
		for _ in 0..adds {
			content = form.apply(&content, &EditorChange::add_item("items")).unwrap();
		}

		// Assert
		let object = content.as_object().unwrap();
		prop_assert_eq!(object.len(), 2);
		prop_assert_eq!(quotes(&content).len(), adds);
		let errors = form.validate(&content);
		for index in 0..adds {
			let path = FieldPath::item("items", index, "quote").to_string();
			prop_assert!(errors.contains(&path));
		}
	}
}
