//! Server-rendered component trees with client-side rebinding
//!
//! This module provides access to sprig-pages.
//!
//! ## Architecture
//!
//! - **Component Tree**: Identity-addressed nodes composed into parents and pages
//! - **Lifecycle**: Symmetric `start`/`stop` binding against a rendering target
//! - **Dependency Collection**: Only the declarations a page uses are shipped
//! - **Page Rendering**: Head, body and bootstrap script in one document
//!
//! ## Example
//!
//! ```rust
//! use sprig::pages::component::{ComponentType, Node};
//! use sprig::pages::runtime::COMPONENT;
//! use sprig::pages::Page;
//!
//! static BUTTON: ComponentType =
//!     ComponentType::new("Button", Some(&COMPONENT), "class Button extends Component {}");
//!
//! let mut page = Page::new();
//! page.add_child(&Node::new("button").of_type(&BUTTON).unwrap()).unwrap();
//! assert!(page.render().unwrap().contains("class Button extends Component"));
//! ```

// Re-export all sprig-pages functionality
pub use sprig_pages::*;
