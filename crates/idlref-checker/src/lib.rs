//! Validation of parsed IDL.
//!
//! Rules run over every block of a document at once so that cross-block
//! problems (duplicate definitions, dictionaries declared elsewhere) are
//! visible. Each issue may carry an [`Autofix`] that rewrites the tree.

pub mod autofix;
pub use autofix::Autofix;

pub mod rules;
pub use rules::{ValidationIssue, rule_names, validate};

pub mod validator;
pub use validator::{ValidationBlock, Validator};

#[cfg(test)]
#[path = "../tests/rules_tests.rs"]
mod rules_tests;

#[cfg(test)]
#[path = "../tests/validator_tests.rs"]
mod validator_tests;
