//! Name binding for IDL definitions.
//!
//! The [`IdentifierResolver`] gives every definition node a unique display
//! name and anchor id. The [`DefinitionLinker`] decides, per name
//! occurrence, whether it links to an existing `<dfn>`, becomes the
//! definition itself, or stays an unlinked reference.

pub mod decorator;
pub use decorator::{Decorator, IdlDecorator};

pub mod linker;
pub use linker::{DefinitionLinker, LinkDecision, LinkOutcome, dfn_type};

pub mod registry;
pub use registry::{DefinitionMap, DefinitionRegistry};

pub mod resolver;
pub use resolver::{IdentifierResolver, ResolvedIdentity};

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod resolver_tests;

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod registry_tests;

#[cfg(test)]
#[path = "../tests/linker_tests.rs"]
mod linker_tests;
