//! Nodes: addressable, renderable units of a component tree.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::scope::Owner;
use super::types::ComponentType;
use crate::callback::{Callback, IntoCallback};
use crate::error::Result;
use crate::identity::{generate_identity, validate_identity};
use crate::runtime::COMPONENT;

/// One item of a node's content: literal markup or a composed child node.
#[derive(Debug, Clone)]
pub enum Child {
	/// Literal markup, inserted verbatim.
	Text(String),
	/// A child node, rendered in place.
	Node(Node),
}

impl Child {
	/// Literal markup.
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	/// The node, if this child is one.
	pub fn as_node(&self) -> Option<&Node> {
		match self {
			Self::Node(node) => Some(node),
			Self::Text(_) => None,
		}
	}

	pub(crate) fn render_into(&self, out: &mut String) {
		match self {
			Self::Text(text) => out.push_str(text),
			Self::Node(node) => node.render_into(out),
		}
	}
}

impl From<&str> for Child {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<String> for Child {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<Node> for Child {
	fn from(node: Node) -> Self {
		Self::Node(node)
	}
}

impl From<&Node> for Child {
	fn from(node: &Node) -> Self {
		Self::Node(node.clone())
	}
}

pub(crate) struct NodeData {
	pub(crate) identity: String,
	pub(crate) tag: String,
	pub(crate) style_class: Option<String>,
	pub(crate) attrs: Vec<(String, String)>,
	pub(crate) content: Vec<Child>,
	/// Event names in first-registration order, each with its handlers.
	pub(crate) listeners: Vec<(String, Vec<Callback>)>,
	pub(crate) parent: Option<Weak<RefCell<NodeData>>>,
	pub(crate) owner: Option<Owner>,
	pub(crate) component_type: &'static ComponentType,
}

/// A handle that does not keep its node alive.
///
/// While it exists the node's allocation is not reused, so [`Node::key`]
/// stays unique for it.
#[derive(Debug, Clone)]
pub(crate) struct WeakNode(Weak<RefCell<NodeData>>);

impl WeakNode {
	pub(crate) fn is_alive(&self) -> bool {
		self.0.strong_count() > 0
	}
}

/// A shared handle to an element in a component tree.
///
/// Cloning a `Node` clones the handle, not the element: both handles refer to
/// the same node. A node is created detached, becomes composed when it is
/// passed into a parent's content, and is mounted once its tree is added to a
/// [`Page`](crate::page::Page).
#[derive(Clone)]
pub struct Node(pub(crate) Rc<RefCell<NodeData>>);

impl Node {
	/// Creates a detached node with a generated identity.
	pub fn new(tag: impl Into<String>) -> Self {
		Self::from_parts(tag.into(), generate_identity())
	}

	/// Creates a detached node with a caller-supplied identity.
	pub fn with_identity(tag: impl Into<String>, identity: impl Into<String>) -> Result<Self> {
		let identity = identity.into();
		validate_identity(&identity)?;
		Ok(Self::from_parts(tag.into(), identity))
	}

	fn from_parts(tag: String, identity: String) -> Self {
		Self(Rc::new(RefCell::new(NodeData {
			identity,
			tag,
			style_class: None,
			attrs: Vec::new(),
			content: Vec::new(),
			listeners: Vec::new(),
			parent: None,
			owner: None,
			component_type: &COMPONENT,
		})))
	}

	/// Sets the style class.
	pub fn class(self, class: impl Into<String>) -> Self {
		self.set_class(Some(class.into()));
		self
	}

	/// Adds an attribute rendered after `id` and `class`.
	pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.borrow_mut().attrs.push((name.into(), value.into()));
		self
	}

	/// Sets the component type shipped for this node and returns the node.
	///
	/// See [`Node::set_type`] for the errors.
	pub fn of_type(self, component_type: &'static ComponentType) -> Result<Self> {
		self.set_type(component_type)?;
		Ok(self)
	}

	/// Composes `children` and returns the node, for building trees inline.
	pub fn with_children<I>(self, children: I) -> Result<Self>
	where
		I: IntoIterator,
		I::Item: Into<Child>,
	{
		self.compose(children)?;
		Ok(self)
	}

	/// Replaces or clears the style class.
	pub fn set_class(&self, class: Option<String>) {
		self.0.borrow_mut().style_class = class;
	}

	/// The identity addressing this node's element.
	pub fn identity(&self) -> String {
		self.0.borrow().identity.clone()
	}

	/// The tag name.
	pub fn tag(&self) -> String {
		self.0.borrow().tag.clone()
	}

	/// The style class, if any.
	pub fn style_class(&self) -> Option<String> {
		self.0.borrow().style_class.clone()
	}

	/// The component type shipped for this node.
	pub fn component_type(&self) -> &'static ComponentType {
		self.0.borrow().component_type
	}

	/// Registers `handler` for `event` and returns it, so it can be removed
	/// again with [`Node::off`].
	///
	/// Registering does not bind anything; binding happens when the lifecycle
	/// manager starts the node.
	pub fn on(&self, event: impl Into<String>, handler: impl IntoCallback) -> Callback {
		let event = event.into();
		let callback = handler.into_callback();
		let mut data = self.0.borrow_mut();
		match data.listeners.iter_mut().find(|(name, _)| *name == event) {
			Some((_, handlers)) => handlers.push(callback.clone()),
			None => data.listeners.push((event, vec![callback.clone()])),
		}
		callback
	}

	/// Removes a registration. Returns false if `handler` was not registered
	/// for `event`.
	pub fn off(&self, event: &str, handler: &Callback) -> bool {
		let mut data = self.0.borrow_mut();
		let Some(index) = data.listeners.iter().position(|(name, _)| name == event) else {
			return false;
		};
		let handlers = &mut data.listeners[index].1;
		let Some(position) = handlers.iter().position(|h| h.ptr_eq(handler)) else {
			return false;
		};
		handlers.remove(position);
		if handlers.is_empty() {
			data.listeners.remove(index);
		}
		true
	}

	/// Handlers registered for `event`, in registration order.
	pub fn handlers(&self, event: &str) -> Vec<Callback> {
		self.0
			.borrow()
			.listeners
			.iter()
			.find(|(name, _)| name == event)
			.map(|(_, handlers)| handlers.clone())
			.unwrap_or_default()
	}

	/// Every (event, handler) registration, events in first-registration order
	/// and handlers in registration order.
	pub fn registrations(&self) -> Vec<(String, Callback)> {
		self.0
			.borrow()
			.listeners
			.iter()
			.flat_map(|(event, handlers)| handlers.iter().map(|h| (event.clone(), h.clone())))
			.collect()
	}

	/// Child nodes in composition order.
	pub fn children(&self) -> Vec<Node> {
		self.0
			.borrow()
			.content
			.iter()
			.filter_map(Child::as_node)
			.cloned()
			.collect()
	}

	/// The parent node, if this node is composed into one.
	pub fn parent(&self) -> Option<Node> {
		self.0.borrow().parent.as_ref()?.upgrade().map(Node)
	}

	/// Returns true if the node has been composed into a parent or a page.
	pub fn is_composed(&self) -> bool {
		let data = self.0.borrow();
		data.parent.is_some() || data.owner.is_some()
	}

	/// Returns true if the node's tree is mounted on a page.
	pub fn is_mounted(&self) -> bool {
		self.0.borrow().owner.is_some()
	}

	/// Returns true if both handles refer to the same node.
	pub fn ptr_eq(&self, other: &Node) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	/// This node followed by all descendants, parents before children.
	pub fn descendants(&self) -> Vec<Node> {
		let mut out = Vec::new();
		self.walk_pre_order(&mut |node| out.push(node.clone()));
		out
	}

	pub(crate) fn walk_pre_order(&self, visit: &mut impl FnMut(&Node)) {
		visit(self);
		for child in self.children() {
			child.walk_pre_order(visit);
		}
	}

	pub(crate) fn walk_post_order(&self, visit: &mut impl FnMut(&Node)) {
		for child in self.children() {
			child.walk_post_order(visit);
		}
		visit(self);
	}

	/// Replaces literal content. Callers detach child nodes first.
	pub(crate) fn replace_content(&self, content: Child) {
		self.0.borrow_mut().content = vec![content];
	}

	/// Address of the node's shared data, stable for the node's lifetime.
	pub(crate) fn key(&self) -> usize {
		Rc::as_ptr(&self.0) as usize
	}

	pub(crate) fn downgrade(&self) -> WeakNode {
		WeakNode(Rc::downgrade(&self.0))
	}

	pub(crate) fn owner(&self) -> Option<Owner> {
		self.0.borrow().owner.clone()
	}

	pub(crate) fn set_owner_recursive(&self, owner: Option<&Owner>) {
		self.walk_pre_order(&mut |node| node.0.borrow_mut().owner = owner.cloned());
	}

	/// Renders the node's markup.
	///
	/// The output depends only on the node's current fields and those of its
	/// descendants: `<tag id="…" class="…" attrs…>content</tag>`. Literal
	/// content is emitted verbatim; attribute values are quoted safely.
	pub fn render(&self) -> String {
		let mut out = String::new();
		self.render_into(&mut out);
		out
	}

	pub(crate) fn render_into(&self, out: &mut String) {
		let data = self.0.borrow();
		out.push('<');
		out.push_str(&data.tag);
		out.push_str(&format!(" id=\"{}\"", data.identity));
		if let Some(class) = &data.style_class {
			out.push_str(&format!(" class=\"{}\"", html_escape_attr(class)));
		}
		for (name, value) in &data.attrs {
			out.push_str(&format!(" {}=\"{}\"", name, html_escape_attr(value)));
		}
		out.push('>');
		for child in &data.content {
			child.render_into(out);
		}
		out.push_str("</");
		out.push_str(&data.tag);
		out.push('>');
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let data = self.0.borrow();
		f.debug_struct("Node")
			.field("identity", &data.identity)
			.field("tag", &data.tag)
			.field("type", &data.component_type.name())
			.field("children", &data.content.iter().filter(|c| c.as_node().is_some()).count())
			.field("mounted", &data.owner.is_some())
			.finish()
	}
}

/// Escapes a string for use in an HTML attribute value.
fn html_escape_attr(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('"', "&quot;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::callback::Event;
	use proptest::prelude::*;
	use rstest::rstest;

	static BUTTON: ComponentType =
		ComponentType::new("Button", Some(&COMPONENT), "class Button extends Component {}");

	#[rstest]
	fn test_render_leaf() {
		let node = Node::with_identity("button", "btn").unwrap().class("primary");
		node.append_child("Click me!").unwrap();
		assert_eq!(
			node.render(),
			r#"<button id="btn" class="primary">Click me!</button>"#
		);
	}

	#[rstest]
	fn test_render_without_class_omits_attribute() {
		let node = Node::with_identity("ul", "list").unwrap();
		assert_eq!(node.render(), r#"<ul id="list"></ul>"#);
	}

	#[rstest]
	fn test_render_attrs_in_order_and_escaped() {
		let node = Node::with_identity("input", "name")
			.unwrap()
			.attr("type", "text")
			.attr("placeholder", "\"quoted\" & <b>");
		assert_eq!(
			node.render(),
			r#"<input id="name" type="text" placeholder="&quot;quoted&quot; &amp; &lt;b&gt;"></input>"#
		);
	}

	#[rstest]
	fn test_literal_content_is_verbatim() {
		let node = Node::with_identity("div", "raw").unwrap();
		node.append_child("<em>trusted</em>").unwrap();
		assert_eq!(node.render(), r#"<div id="raw"><em>trusted</em></div>"#);
	}

	#[rstest]
	fn test_new_generates_identity() {
		let first = Node::new("div");
		let second = Node::new("div");
		assert_ne!(first.identity(), second.identity());
		assert!(crate::identity::is_generated(&first.identity()));
	}

	#[rstest]
	fn test_with_identity_rejects_invalid() {
		assert!(Node::with_identity("div", "has space").is_err());
	}

	#[rstest]
	fn test_default_type_is_component() {
		let node = Node::new("div");
		assert_eq!(node.component_type(), &COMPONENT);
		let typed = Node::new("button").of_type(&BUTTON).unwrap();
		assert_eq!(typed.component_type().name(), "Button");
	}

	#[rstest]
	fn test_registrations_keep_order() {
		let node = Node::new("button");
		let first = node.on("click", |_: &Event| {});
		let hover = node.on("mouseover", |_: &Event| {});
		let second = node.on("click", |_: &Event| {});

		let registrations = node.registrations();
		assert_eq!(registrations.len(), 3);
		assert_eq!(registrations[0].0, "click");
		assert!(registrations[0].1.ptr_eq(&first));
		assert_eq!(registrations[1].0, "click");
		assert!(registrations[1].1.ptr_eq(&second));
		assert_eq!(registrations[2].0, "mouseover");
		assert!(registrations[2].1.ptr_eq(&hover));
	}

	#[rstest]
	fn test_off_removes_by_identity() {
		let node = Node::new("button");
		let kept = node.on("click", |_: &Event| {});
		let removed = node.on("click", |_: &Event| {});

		assert!(node.off("click", &removed));
		assert!(!node.off("click", &removed));
		assert!(!node.off("keydown", &kept));

		let handlers = node.handlers("click");
		assert_eq!(handlers.len(), 1);
		assert!(handlers[0].ptr_eq(&kept));
	}

	#[rstest]
	fn test_off_last_handler_drops_event() {
		let node = Node::new("button");
		let only = node.on("click", |_: &Event| {});
		assert!(node.off("click", &only));
		assert!(node.registrations().is_empty());
		assert!(node.handlers("click").is_empty());
	}

	#[rstest]
	fn test_descendants_pre_order() {
		let leaf_a = Node::with_identity("li", "a").unwrap();
		let leaf_b = Node::with_identity("li", "b").unwrap();
		let list = Node::with_identity("ul", "list")
			.unwrap()
			.with_children([&leaf_a, &leaf_b])
			.unwrap();
		let root = Node::with_identity("div", "root")
			.unwrap()
			.with_children([&list])
			.unwrap();

		let order: Vec<String> = root.descendants().iter().map(Node::identity).collect();
		assert_eq!(order, vec!["root", "list", "a", "b"]);
	}

	#[rstest]
	fn test_debug_output() {
		let node = Node::with_identity("div", "dbg").unwrap();
		let debug = format!("{:?}", node);
		assert!(debug.contains("dbg"));
		assert!(debug.contains("Component"));
	}

	proptest! {
		#[test]
		fn prop_render_is_deterministic(
			texts in proptest::collection::vec("[a-z <>&]{0,12}", 0..6),
			class in proptest::option::of("[a-z-]{1,10}"),
		) {
			let node = Node::with_identity("section", "prop").unwrap();
			node.set_class(class);
			for (index, text) in texts.iter().enumerate() {
				if index % 2 == 0 {
					node.append_child(text.as_str()).unwrap();
				} else {
					let child = Node::with_identity("span", format!("child-{}", index)).unwrap();
					child.append_child(text.as_str()).unwrap();
					node.append_child(&child).unwrap();
				}
			}

			let first = node.render();
			let second = node.render();
			prop_assert_eq!(&first, &second);
			prop_assert!(first.starts_with("<section id=\"prop\""));
			prop_assert!(first.ends_with("</section>"));
		}
	}
}
