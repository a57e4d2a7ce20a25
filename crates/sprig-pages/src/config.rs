//! Page options.
//!
//! Options control the document shell around the rendered body. They can be
//! built in code or loaded from a TOML table; missing keys fall back to the
//! defaults.
//!
//! ```
//! use sprig_pages::config::PageOptions;
//!
//! let options = PageOptions::from_toml_str(
//!     r#"
//!     title = "Dashboard"
//!     minify = true
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(options.title, "Dashboard");
//! assert_eq!(options.lang, "en");
//! assert!(options.minify);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options for rendering a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
	/// Value of the `lang` attribute on `<html>`.
	pub lang: String,
	/// Document title.
	pub title: String,
	/// Character set declared in the head.
	pub charset: String,
	/// Whether to collapse whitespace between tags.
	pub minify: bool,
	/// Whether to embed the JSON manifest of bundled types.
	pub include_manifest: bool,
}

impl Default for PageOptions {
	fn default() -> Self {
		Self {
			lang: "en".to_string(),
			title: "Page".to_string(),
			charset: "UTF-8".to_string(),
			minify: false,
			include_manifest: true,
		}
	}
}

impl PageOptions {
	/// Creates options with default values.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses options from a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}

	/// Sets the document language.
	pub fn lang(mut self, lang: impl Into<String>) -> Self {
		self.lang = lang.into();
		self
	}

	/// Sets the document title.
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	/// Sets the declared character set.
	pub fn charset(mut self, charset: impl Into<String>) -> Self {
		self.charset = charset.into();
		self
	}

	/// Enables or disables minification.
	pub fn minify(mut self, minify: bool) -> Self {
		self.minify = minify;
		self
	}

	/// Enables or disables the JSON manifest.
	pub fn manifest(mut self, include: bool) -> Self {
		self.include_manifest = include;
		self
	}
}
