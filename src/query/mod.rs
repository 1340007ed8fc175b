//! Natural-language query handling
//!
//! query -> billing alias / literal bypass / ordered IntentRule table
//! -> command string -> CommandRouter -> Response Formatter

pub mod classifier;
pub mod rules;

pub use classifier::{billing_alias, QueryClassifier};
pub use rules::{default_rules, IntentRule, Plan, Qualifiers, QueryIntent};
