//! The page: root context that produces the final HTML artifact.
//!
//! A [`Page`] owns the scope every mounted node shares (identity set and
//! declaration bundle), head metadata, the entry point and the root type. Its
//! artifact has three parts:
//!
//! 1. A head with charset, title and style blocks.
//! 2. A body with the rendered markup of every mounted node.
//! 3. A script that evaluates the bundle and then calls the entry point with
//!    the root type.
//!
//! ```
//! use sprig_pages::prelude::*;
//!
//! let mut page = Page::with_options(PageOptions::new().title("Demo"));
//! page.add_child(&Node::with_identity("main", "content").unwrap()).unwrap();
//!
//! let html = page.render().unwrap();
//! assert!(html.starts_with("<!DOCTYPE html>"));
//! assert!(html.contains("<title>Demo</title>"));
//! assert!(html.contains(r#"<main id="content"></main>"#));
//! assert!(html.contains("(Page);"));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::bundle::DeclarationBundle;
use crate::component::compose::mount_roots;
use crate::component::scope::Owner;
use crate::component::{Child, ComponentType, Node};
use crate::config::PageOptions;
use crate::error::Result;
use crate::lifecycle::{Lifecycle, LifecycleReport};
use crate::runtime::{DEFAULT_ENTRY_POINT, PAGE};
use crate::target::RenderTarget;

/// Closing script tags, in any letter case.
static SCRIPT_CLOSE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)</(script)").expect("script close pattern is valid"));

/// Identity of the manifest script element.
pub const MANIFEST_ID: &str = "sprig-manifest";

/// Types shipped with a page, in bundle order.
#[derive(Debug, Serialize)]
struct Manifest<'a> {
	types: Vec<&'a str>,
	root: &'a str,
}

/// Root rendering context.
#[derive(Debug)]
pub struct Page {
	options: PageOptions,
	scope: Owner,
	styles: Vec<String>,
	entry_point: String,
	root_type: &'static ComponentType,
}

impl Default for Page {
	fn default() -> Self {
		Self::with_options(PageOptions::default())
	}
}

impl Page {
	/// Creates an empty page with default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty page with the given options.
	pub fn with_options(options: PageOptions) -> Self {
		Self {
			options,
			scope: Owner::new(),
			styles: Vec::new(),
			entry_point: DEFAULT_ENTRY_POINT.to_string(),
			root_type: &PAGE,
		}
	}

	/// The page options.
	pub fn options(&self) -> &PageOptions {
		&self.options
	}

	/// Adds a style block to the head.
	pub fn style(mut self, css: impl Into<String>) -> Self {
		self.add_style(css);
		self
	}

	/// Adds a style block to the head.
	pub fn add_style(&mut self, css: impl Into<String>) {
		self.styles.push(css.into());
	}

	/// Replaces the entry point.
	///
	/// The entry point is a function expression taking the root type; it is
	/// invoked once the bundle has been evaluated.
	pub fn entry_point(mut self, entry_point: impl Into<String>) -> Self {
		self.entry_point = entry_point.into();
		self
	}

	/// Replaces the type handed to the entry point.
	pub fn root_type(mut self, root_type: &'static ComponentType) -> Self {
		self.root_type = root_type;
		self
	}

	/// Mounts `children` as top-level body content, in order.
	///
	/// Every node in the mounted subtrees is checked for identity clashes and
	/// its type collected into the page bundle before anything changes.
	///
	/// # Errors
	///
	/// [`PagesError::AlreadyMounted`](crate::error::PagesError::AlreadyMounted),
	/// [`PagesError::DuplicateIdentity`](crate::error::PagesError::DuplicateIdentity)
	/// [`PagesError::UnresolvableDeclaration`](crate::error::PagesError::UnresolvableDeclaration)
	/// or [`PagesError::ConflictingDeclaration`](crate::error::PagesError::ConflictingDeclaration).
	/// On error the page is unchanged.
	pub fn compose<I>(&mut self, children: I) -> Result<()>
	where
		I: IntoIterator,
		I::Item: Into<Child>,
	{
		mount_roots(&self.scope, children.into_iter().map(Into::into).collect())
	}

	/// Mounts a single item.
	pub fn add_child(&mut self, child: impl Into<Child>) -> Result<()> {
		self.compose([child.into()])
	}

	/// Top-level body nodes, in composition order.
	pub fn roots(&self) -> Vec<Node> {
		self.scope
			.body()
			.iter()
			.filter_map(Child::as_node)
			.cloned()
			.collect()
	}

	/// Returns true if a mounted node carries `identity`.
	pub fn contains_identity(&self, identity: &str) -> bool {
		self.scope.contains_identity(identity)
	}

	/// Returns true if `node` is mounted on this page.
	pub fn owns(&self, node: &Node) -> bool {
		node.owner().is_some_and(|owner| owner.ptr_eq(&self.scope))
	}

	/// Declarations collected for the mounted nodes.
	///
	/// The root type is added at render time and is only present here if a
	/// mounted node already uses it.
	pub fn bundle(&self) -> DeclarationBundle {
		self.scope.bundle()
	}

	/// The bundle shipped by [`Page::render`]: mounted types plus the root
	/// type.
	pub fn shipped_bundle(&self) -> Result<DeclarationBundle> {
		let mut bundle = self.scope.bundle();
		bundle.collect(self.root_type)?;
		Ok(bundle)
	}

	/// Renders the body markup only.
	pub fn render_body(&self) -> String {
		let mut out = String::new();
		for child in self.scope.body() {
			child.render_into(&mut out);
		}
		out
	}

	/// Renders the complete document.
	///
	/// # Errors
	///
	/// [`PagesError::UnresolvableDeclaration`](crate::error::PagesError::UnresolvableDeclaration)
	/// or [`PagesError::ConflictingDeclaration`](crate::error::PagesError::ConflictingDeclaration)
	/// if the root type cannot be shipped, or
	/// [`PagesError::Manifest`](crate::error::PagesError::Manifest) if the
	/// manifest fails to serialize.
	pub fn render(&self) -> Result<String> {
		let bundle = self.shipped_bundle()?;
		let body = self.render_body();

		let mut html = String::with_capacity(body.len() + 1024);

		html.push_str("<!DOCTYPE html>\n");
		html.push_str(&format!(
			"<html lang=\"{}\">\n",
			html_escape(&self.options.lang)
		));

		html.push_str("<head>\n");
		html.push_str(&format!(
			"<meta charset=\"{}\">\n",
			html_escape(&self.options.charset)
		));
		html.push_str(&format!(
			"<title>{}</title>\n",
			html_escape(&self.options.title)
		));
		for css in &self.styles {
			html.push_str(&format!("<style>{}</style>\n", css));
		}
		html.push_str("</head>\n");

		html.push_str("<body>\n");
		if !body.is_empty() {
			html.push_str(&body);
			html.push('\n');
		}

		if self.options.include_manifest {
			let manifest = Manifest {
				types: bundle.type_names(),
				root: self.root_type.name(),
			};
			let json = serde_json::to_string(&manifest)?;
			html.push_str(&format!(
				"<script id=\"{}\" type=\"application/json\">{}</script>\n",
				MANIFEST_ID,
				escape_script(&json)
			));
		}

		html.push_str("<script>\n");
		html.push_str(&escape_script(&self.render_script(&bundle)));
		html.push_str("\n</script>\n");

		html.push_str("</body>\n");
		html.push_str("</html>");

		tracing::debug!(
			"rendered page with {} root node(s) and {} declaration(s)",
			self.roots().len(),
			bundle.len()
		);

		if self.options.minify {
			Ok(minify_html(&html))
		} else {
			Ok(html)
		}
	}

	fn render_script(&self, bundle: &DeclarationBundle) -> String {
		let mut script = bundle.to_script();
		if !script.is_empty() {
			script.push('\n');
		}
		script.push_str(&format!("({})({});", self.entry_point.trim(), self.root_type.name()));
		script
	}

	/// Starts every body node.
	pub fn start<T>(&self, lifecycle: &mut Lifecycle, target: &mut T) -> LifecycleReport
	where
		T: RenderTarget + ?Sized,
	{
		let mut report = LifecycleReport::default();
		for root in self.roots() {
			report.merge(lifecycle.start(&root, target));
		}
		report
	}

	/// Stops every body node.
	pub fn stop<T>(&self, lifecycle: &mut Lifecycle, target: &mut T) -> LifecycleReport
	where
		T: RenderTarget + ?Sized,
	{
		let mut report = LifecycleReport::default();
		for root in self.roots() {
			report.merge(lifecycle.stop(&root, target));
		}
		report
	}
}

/// Simple HTML escape function.
fn html_escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

/// Escapes closing script tags so embedded text cannot end its script
/// element early. `<\/script` is read back as `</script` inside JavaScript
/// strings and is not recognized as a closing tag by HTML parsers.
fn escape_script(text: &str) -> String {
	SCRIPT_CLOSE.replace_all(text, r"<\/$1").into_owned()
}

/// Maximum input size for HTML minification (1 MiB).
///
/// Larger inputs are returned unmodified.
const MINIFY_HTML_MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Elements whose content is copied through minification untouched.
const PRESERVED_BLOCKS: &[&str] = &["pre", "script", "textarea"];

/// Collapses runs of whitespace into a single space.
///
/// Content of `<pre>`, `<script>` and `<textarea>` blocks is preserved.
fn minify_html(html: &str) -> String {
	if html.len() > MINIFY_HTML_MAX_INPUT_SIZE {
		return html.to_string();
	}

	let mut result = String::with_capacity(html.len());
	let mut prev_was_whitespace = false;
	let mut preserved: Option<&str> = None;
	let mut chars = html.char_indices();

	while let Some((byte_pos, c)) = chars.next() {
		let remaining = &html[byte_pos..];

		if preserved.is_none() && c == '<' {
			preserved = PRESERVED_BLOCKS
				.iter()
				.copied()
				.find(|tag| opens_block(remaining, tag));
		}

		if let Some(tag) = preserved
			&& c == '<'
			&& remaining
				.strip_prefix("</")
				.and_then(|after| after.strip_prefix(tag))
				.is_some_and(|after| after.starts_with('>'))
		{
			let close = format!("</{}>", tag);
			result.push_str(&close);
			// Skip the rest of the closing tag (we already consumed '<')
			for _ in 1..close.len() {
				chars.next();
			}
			preserved = None;
			prev_was_whitespace = false;
			continue;
		}

		if preserved.is_some() {
			result.push(c);
		} else if c.is_whitespace() {
			if !prev_was_whitespace {
				result.push(' ');
				prev_was_whitespace = true;
			}
		} else {
			result.push(c);
			prev_was_whitespace = false;
		}
	}

	result
}

/// Detects an opening tag such as `<pre>` or `<pre class="...">`.
fn opens_block(remaining: &str, tag: &str) -> bool {
	remaining
		.strip_prefix('<')
		.and_then(|after| after.strip_prefix(tag))
		.is_some_and(|after| {
			after.starts_with(|ch: char| ch == '>' || ch.is_ascii_whitespace()) || after.is_empty()
		})
}
