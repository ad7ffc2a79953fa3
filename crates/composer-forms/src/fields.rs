// Scalar fields
pub mod boolean_field;
pub mod char_field;
pub mod choice_field;
pub mod integer_field;

// Repeatable sub-forms
pub mod list_field;

pub use boolean_field::BooleanField;
pub use char_field::CharField;
pub use choice_field::ChoiceField;
pub use integer_field::IntegerField;
pub use list_field::ListField;
