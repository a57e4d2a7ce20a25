//! Built-in base types shipped to the consumer.
//!
//! Every bundle that contains a node type also contains the chain of base
//! declarations it extends. These are the roots of that chain: [`ENTITY`]
//! (event registrations and children), [`COMPONENT`] (an element addressed by
//! identity, the default type of a [`Node`](crate::component::Node)) and
//! [`PAGE`] (the default root handed to the entry point).

use crate::component::ComponentType;

/// Base of every shipped type: registrations, children, `start`/`stop` recursion.
pub static ENTITY: ComponentType =
	ComponentType::new("Entity", None, include_str!("../assets/runtime/entity.js"));

/// An entity bound to the element carrying its identity.
pub static COMPONENT: ComponentType = ComponentType::new(
	"Component",
	Some(&ENTITY),
	include_str!("../assets/runtime/component.js"),
);

/// Default root type passed to the entry point.
pub static PAGE: ComponentType =
	ComponentType::new("Page", Some(&ENTITY), include_str!("../assets/runtime/page.js"));

/// Entry point invoked with the root type once the bundle is evaluated.
pub const DEFAULT_ENTRY_POINT: &str = "function (Root) {\n\tconst root = new Root();\n\troot.start();\n}";
