//! Component system for sprig-pages
//!
//! This module provides the component tree: addressable [`Node`]s that
//! compose into parents, render to markup and carry event registrations, and
//! the [`ComponentType`] descriptors that tell the dependency collector which
//! declarations a node needs on the consumer.
//!
//! ## Usage
//!
//! ```
//! use sprig_pages::component::{Child, Node};
//!
//! let item = Node::with_identity("li", "first").unwrap();
//! item.append_child("One").unwrap();
//!
//! let list = Node::with_identity("ul", "list").unwrap().class("menu");
//! list.compose([Child::from(&item), Child::from("<li>Two</li>")]).unwrap();
//!
//! assert_eq!(
//!     list.render(),
//!     r#"<ul id="list" class="menu"><li id="first">One</li><li>Two</li></ul>"#
//! );
//! assert!(item.parent().unwrap().ptr_eq(&list));
//! ```

pub(crate) mod compose;
mod node;
pub(crate) mod scope;
mod types;

pub use node::{Child, Node};
pub(crate) use node::WeakNode;
pub use types::{Ancestor, ComponentType, TypeAncestry};
