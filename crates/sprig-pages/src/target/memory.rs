//! In-memory rendering target.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::{ListenerId, RenderTarget, TargetError};
use crate::callback::{Callback, Event};

/// Opening or closing tag. Attribute values may contain `>`.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#)
		.expect("tag pattern is valid")
});

/// `id="..."` attribute inside a tag.
static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?:^|\s)id\s*=\s*"([^"]*)""#).expect("id pattern is valid")
});

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Elements whose content is raw text and must not be scanned for tags.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug)]
struct Listener {
	id: ListenerId,
	event: String,
	callback: Callback,
}

#[derive(Debug, Default)]
struct MemoryElement {
	tag: String,
	parent: Option<String>,
	text: Option<String>,
	inserted: Vec<String>,
	listeners: Vec<Listener>,
}

/// An identity-addressable document held in memory.
///
/// Elements are discovered by scanning `id` attributes of loaded or inserted
/// markup; nesting is tracked so that replacing an element's text removes its
/// descendants the way a browser does. Listeners are stored per element and
/// run synchronously by [`MemoryTarget::dispatch`].
///
/// ```
/// use sprig_pages::callback::{Callback, Event};
/// use sprig_pages::target::{MemoryTarget, RenderTarget};
///
/// let mut target = MemoryTarget::from_markup(r#"<div id="app"><button id="btn">Go</button></div>"#);
/// assert!(target.contains("btn"));
///
/// let callback = Callback::new(|_: &Event| {});
/// target.add_listener("btn", "click", &callback).unwrap();
/// assert_eq!(target.dispatch("btn", "click"), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryTarget {
	elements: HashMap<String, MemoryElement>,
	next_listener: u64,
}

impl MemoryTarget {
	/// Creates an empty document.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a document from a complete markup string.
	pub fn from_markup(markup: &str) -> Self {
		let mut target = Self::new();
		target.load(markup);
		target
	}

	/// Adds a bare element, e.g. a mount point that exists before any markup.
	pub fn with_element(mut self, identity: impl Into<String>, tag: impl Into<String>) -> Self {
		self.elements.insert(
			identity.into(),
			MemoryElement {
				tag: tag.into(),
				..MemoryElement::default()
			},
		);
		self
	}

	/// Registers every identified element found in `markup` at the top level.
	pub fn load(&mut self, markup: &str) {
		self.register(markup, None);
	}

	/// Removes an element and all of its descendants.
	///
	/// Returns false if no element carried the identity.
	pub fn remove_element(&mut self, identity: &str) -> bool {
		if self.elements.remove(identity).is_none() {
			return false;
		}
		self.remove_descendants(identity);
		true
	}

	/// Runs every handler attached for `event` on `identity`.
	///
	/// Returns how many handlers ran.
	pub fn dispatch(&self, identity: &str, event: &str) -> usize {
		let Some(element) = self.elements.get(identity) else {
			return 0;
		};

		let callbacks: Vec<Callback> = element
			.listeners
			.iter()
			.filter(|listener| listener.event == event)
			.map(|listener| listener.callback.clone())
			.collect();

		let dispatched = Event::new(event, identity);
		for callback in &callbacks {
			callback.call(&dispatched);
		}
		callbacks.len()
	}

	/// Number of listeners attached to `identity`, across all events.
	pub fn listener_count(&self, identity: &str) -> usize {
		self.elements
			.get(identity)
			.map_or(0, |element| element.listeners.len())
	}

	/// Total number of listeners attached anywhere in the document.
	pub fn total_listeners(&self) -> usize {
		self.elements.values().map(|e| e.listeners.len()).sum()
	}

	/// Text set through [`RenderTarget::set_text`], if any.
	pub fn text(&self, identity: &str) -> Option<&str> {
		self.elements.get(identity)?.text.as_deref()
	}

	/// Tag name of the element carrying `identity`.
	pub fn tag(&self, identity: &str) -> Option<&str> {
		self.elements.get(identity).map(|e| e.tag.as_str())
	}

	/// Identity of the nearest identified ancestor of `identity`.
	pub fn parent_of(&self, identity: &str) -> Option<&str> {
		self.elements.get(identity)?.parent.as_deref()
	}

	/// Markup fragments inserted into `identity`, in insertion order.
	pub fn inserted(&self, identity: &str) -> &[String] {
		self.elements
			.get(identity)
			.map(|element| element.inserted.as_slice())
			.unwrap_or_default()
	}

	/// Number of identified elements.
	pub fn len(&self) -> usize {
		self.elements.len()
	}

	/// Returns true if the document holds no identified element.
	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	fn register(&mut self, markup: &str, root: Option<&str>) {
		// One entry per open element; `None` for elements without an id.
		let mut open: Vec<(String, Option<String>)> = Vec::new();
		let mut pos = 0;

		while let Some(caps) = TAG_PATTERN.captures_at(markup, pos) {
			let whole = caps.get(0).map_or(markup.len(), |m| m.end());
			pos = whole;

			let closing = !caps[1].is_empty();
			let tag = caps[2].to_ascii_lowercase();
			let attrs = caps.get(3).map_or("", |m| m.as_str());
			let self_closing = !caps[4].is_empty();

			if closing {
				if let Some(index) = open.iter().rposition(|(open_tag, _)| *open_tag == tag) {
					open.truncate(index);
				}
				continue;
			}

			let identity = ID_PATTERN.captures(attrs).map(|c| c[1].to_string());
			if let Some(identity) = &identity {
				let parent = open
					.iter()
					.rev()
					.find_map(|(_, id)| id.clone())
					.or_else(|| root.map(str::to_string));
				if self.elements.contains_key(identity) {
					tracing::debug!("duplicate element identity '{}' ignored", identity);
				} else {
					self.elements.insert(
						identity.clone(),
						MemoryElement {
							tag: tag.clone(),
							parent,
							..MemoryElement::default()
						},
					);
				}
			}

			if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
				let close = format!("</{}", tag);
				pos = markup[pos..]
					.to_ascii_lowercase()
					.find(&close)
					.map_or(markup.len(), |offset| pos + offset);
				continue;
			}

			if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
				open.push((tag, identity));
			}
		}
	}

	fn remove_descendants(&mut self, identity: &str) {
		let mut removed = vec![identity.to_string()];
		while let Some(ancestor) = removed.pop() {
			let children: Vec<String> = self
				.elements
				.iter()
				.filter(|(_, element)| element.parent.as_deref() == Some(ancestor.as_str()))
				.map(|(id, _)| id.clone())
				.collect();
			for child in children {
				self.elements.remove(&child);
				removed.push(child);
			}
		}
	}

	fn element_mut(&mut self, identity: &str) -> Result<&mut MemoryElement, TargetError> {
		self.elements
			.get_mut(identity)
			.ok_or_else(|| TargetError::ElementMissing(identity.to_string()))
	}
}

impl RenderTarget for MemoryTarget {
	fn contains(&self, identity: &str) -> bool {
		self.elements.contains_key(identity)
	}

	fn add_listener(
		&mut self,
		identity: &str,
		event: &str,
		callback: &Callback,
	) -> Result<ListenerId, TargetError> {
		let id = ListenerId(self.next_listener);
		let element = self.element_mut(identity)?;
		element.listeners.push(Listener {
			id,
			event: event.to_string(),
			callback: callback.clone(),
		});
		self.next_listener += 1;
		Ok(id)
	}

	fn remove_listener(
		&mut self,
		identity: &str,
		event: &str,
		listener: ListenerId,
	) -> Result<(), TargetError> {
		let element = self.element_mut(identity)?;
		let index = element
			.listeners
			.iter()
			.position(|l| l.id == listener && l.event == event)
			.ok_or_else(|| TargetError::UnknownListener {
				identity: identity.to_string(),
				event: event.to_string(),
				listener,
			})?;
		element.listeners.remove(index);
		Ok(())
	}

	fn insert_markup(&mut self, parent: &str, markup: &str) -> Result<(), TargetError> {
		self.element_mut(parent)?.inserted.push(markup.to_string());
		self.register(markup, Some(parent));
		Ok(())
	}

	fn set_text(&mut self, identity: &str, text: &str) -> Result<(), TargetError> {
		let element = self.element_mut(identity)?;
		element.text = Some(text.to_string());
		element.inserted.clear();
		self.remove_descendants(identity);
		Ok(())
	}
}
