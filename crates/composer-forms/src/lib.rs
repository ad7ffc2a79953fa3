//! Editor form descriptors for the Reinhardt page composer
//!
//! Every block type declares an [`EditorForm`]: an ordered list of fields that
//! describes how its content payload is edited. This crate provides:
//!
//! - Scalar fields (text, URL, email, integer, boolean, choice)
//! - A repeatable [`ListField`] for arrays of nested objects (testimonials, FAQ entries)
//! - [`EditorChange`] application that always yields a complete payload
//! - Soft validation that reports inline errors without blocking a commit
//! - Server-side HTML rendering of the property form
//!
//! ## Example
//!
//! ```
//! use composer_forms::{CharField, EditorChange, EditorForm, FieldPath};
//! use serde_json::json;
//!
//! let form = EditorForm::new()
//! 	.field(CharField::new("title").required().with_label("Title"));
//!
//! let content = form.initial_content();
//! let updated = form
//! 	.apply(
//! 		&content,
//! 		&EditorChange::set(FieldPath::field("title"), json!("Welcome")),
//! 	)
//! 	.unwrap();
//! assert_eq!(updated, json!({"title": "Welcome"}));
//! ```

pub mod bound_field;
pub mod field;
pub mod fields;
pub mod form;
pub mod rendering;
pub mod validators;

pub use bound_field::BoundField;
pub use field::{EditorField, FieldError, FieldPath, FieldResult, Widget};
pub use fields::{BooleanField, CharField, ChoiceField, IntegerField, ListField};
pub use form::{EditorChange, EditorForm, FormError, FormErrors, FormResult};
pub use validators::{EmailValidator, UrlValidator};
