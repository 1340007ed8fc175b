//! Report building: list rendering, pass-through output and suggestions

pub mod formatter;
pub mod suggest;

pub use formatter::{field, field_or, format_execution, render_value, ListSpec, Presentation};
pub use suggest::{render_suggestions, render_under, suggest, suggested_commands};
