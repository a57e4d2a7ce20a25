//! Sprig Pages - server-rendered component trees with client-side rebinding
//!
//! A small component model that renders a tree of nodes to HTML on the server,
//! ships only the type declarations the tree actually uses, and re-establishes
//! event bindings on the consumer once the markup has been inserted.
//!
//! ## Architecture
//!
//! - [`component`]: Nodes, tree composition and component type descriptors
//! - [`callback`]: Identity-compared event handlers
//! - [`identity`]: Generated and validated element identities
//! - [`lifecycle`]: Symmetric `start`/`stop` binding of handlers to a target
//! - [`target`]: The rendering-target abstraction and an in-memory document
//! - [`bundle`]: Dependency collection into an ordered declaration bundle
//! - [`page`]: The root context that produces the final HTML artifact
//! - [`config`]: Page options, loadable from TOML
//! - [`runtime`]: Built-in base type declarations shipped with every bundle
//!
//! ## Example
//!
//! ```
//! use sprig_pages::prelude::*;
//!
//! let button = Node::with_identity("button", "btn").unwrap();
//! button.append_child("Click me").unwrap();
//! let clicked = button.on("click", |_event: &Event| {});
//!
//! let container = Node::new("div").class("dropdown");
//! container.compose([Child::from(&button), Child::from("hi")]).unwrap();
//!
//! let mut page = Page::new();
//! page.add_child(&container).unwrap();
//! let html = page.render().unwrap();
//! assert!(html.contains("<button id=\"btn\">Click me</button>hi"));
//!
//! let mut target = MemoryTarget::from_markup(&html);
//! let mut lifecycle = Lifecycle::new();
//! let report = lifecycle.start(&container, &mut target);
//! assert_eq!(report.bound, 1);
//! assert!(lifecycle.is_bound(&button, "click", &clicked));
//! ```

#![warn(missing_docs)]

pub mod bundle;
pub mod callback;
pub mod component;
pub mod config;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod page;
pub mod runtime;
pub mod target;

/// Commonly used types.
pub mod prelude {
	pub use crate::bundle::{Declaration, DeclarationBundle};
	pub use crate::callback::{Callback, Event};
	pub use crate::component::{Child, ComponentType, Node, TypeAncestry};
	pub use crate::config::PageOptions;
	pub use crate::error::{PagesError, Result};
	pub use crate::lifecycle::{Lifecycle, LifecycleFailure, LifecyclePhase, LifecycleReport};
	pub use crate::page::Page;
	pub use crate::target::{MemoryTarget, RenderTarget, TargetError};
}

pub use bundle::{Declaration, DeclarationBundle};
pub use callback::{Callback, Event};
pub use component::{Child, ComponentType, Node, TypeAncestry};
pub use config::PageOptions;
pub use error::{PagesError, Result};
pub use lifecycle::{Lifecycle, LifecycleFailure, LifecyclePhase, LifecycleReport};
pub use page::Page;
pub use target::{MemoryTarget, RenderTarget, TargetError};
