//! # Sprig
//!
//! Server-rendered component trees that rebind their event handlers once the
//! markup reaches the consumer, shipping only the type declarations the tree
//! actually uses.
//!
//! ## Feature Flags
//!
//! - `pages` (default) - Component tree, lifecycle, dependency collection and
//!   page rendering (via `sprig-pages`)
//!
//! ## Quick Example
//!
//! ```rust
//! use sprig::prelude::*;
//!
//! let toggle = Node::with_identity("button", "toggle").unwrap();
//! toggle.append_child("Menu").unwrap();
//! toggle.on("click", |_event: &Event| {});
//!
//! let mut page = Page::with_options(PageOptions::new().title("Menu"));
//! page.add_child(&toggle).unwrap();
//!
//! let html = page.render().unwrap();
//! let mut target = MemoryTarget::from_markup(&html);
//! let mut lifecycle = Lifecycle::new();
//! assert_eq!(page.start(&mut lifecycle, &mut target).bound, 1);
//! ```

#[cfg(feature = "pages")]
pub mod pages;

#[cfg(feature = "pages")]
pub use sprig_pages::{
	Callback, Child, ComponentType, Event, Lifecycle, LifecycleReport, MemoryTarget, Node, Page,
	PageOptions, PagesError, RenderTarget,
};

pub mod prelude {
	//! Commonly used types, re-exported from the enabled feature crates.

	#[cfg(feature = "pages")]
	pub use sprig_pages::prelude::*;
}

#[cfg(all(test, feature = "pages"))]
mod tests {
	use super::prelude::*;
	use rstest::rstest;

	#[rstest]
	fn test_prelude_renders_page() {
		let mut page = Page::new();
		page.add_child(&Node::with_identity("main", "root").unwrap())
			.unwrap();
		assert!(page.render().unwrap().contains(r#"<main id="root"></main>"#));
	}

	#[rstest]
	fn test_pages_module_reaches_runtime() {
		assert_eq!(crate::pages::runtime::PAGE.name(), "Page");
	}
}
