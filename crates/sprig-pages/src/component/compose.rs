//! Tree composition.
//!
//! Every operation here validates the whole batch before touching any node, so
//! a failed call leaves all trees and the page scope exactly as they were.

use std::rc::Rc;

use super::node::{Child, Node};
use super::scope::Owner;
use super::types::ComponentType;
use crate::error::{PagesError, Result};

impl Node {
	/// Composes `children` into this node's content, in order.
	///
	/// Literal items are inserted verbatim. Node items become children of this
	/// node and inherit its page scope; if this node is already mounted, their
	/// identities are checked and their types collected into the page bundle.
	///
	/// # Errors
	///
	/// - [`PagesError::CyclicComposition`] if a child is this node or one of
	///   its ancestors.
	/// - [`PagesError::AlreadyMounted`] if a child is already composed, or is
	///   passed twice.
	/// - [`PagesError::DuplicateIdentity`],
	///   [`PagesError::UnresolvableDeclaration`] or
	///   [`PagesError::ConflictingDeclaration`] from the page scope.
	pub fn compose<I>(&self, children: I) -> Result<()>
	where
		I: IntoIterator,
		I::Item: Into<Child>,
	{
		let children: Vec<Child> = children.into_iter().map(Into::into).collect();
		let nodes = child_nodes(&children);

		let ancestors = self.ancestors_and_self();
		for node in &nodes {
			if ancestors.iter().any(|a| a.ptr_eq(node)) {
				return Err(PagesError::CyclicComposition {
					parent: self.identity(),
					child: node.identity(),
				});
			}
		}
		check_unmounted(&nodes)?;

		let owner = self.owner();
		let admission = owner.as_ref().map(|o| o.admit(&nodes)).transpose()?;

		for node in &nodes {
			node.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
		}
		if let (Some(owner), Some(admission)) = (&owner, admission) {
			owner.commit(admission);
			for node in &nodes {
				node.set_owner_recursive(Some(owner));
			}
		}
		tracing::debug!(
			"composed {} child node(s) into '{}'",
			nodes.len(),
			self.identity()
		);
		self.0.borrow_mut().content.extend(children);
		Ok(())
	}

	/// Composes a single item.
	pub fn append_child(&self, child: impl Into<Child>) -> Result<()> {
		self.compose([child.into()])
	}

	/// Removes this node from its parent or from the page body.
	///
	/// The subtree keeps its content and registrations but leaves the page
	/// scope: its identities are released and it can be composed again.
	///
	/// # Errors
	///
	/// [`PagesError::NotMounted`] if the node is neither composed nor mounted.
	pub fn detach(&self) -> Result<()> {
		let parent = self.0.borrow_mut().parent.take();
		let owner = self.owner();

		match (parent, &owner) {
			(Some(weak), _) => {
				if let Some(parent) = weak.upgrade() {
					parent
						.borrow_mut()
						.content
						.retain(|child| !child.as_node().is_some_and(|n| n.ptr_eq(self)));
				}
			}
			(None, Some(owner)) => {
				owner.remove_root(self);
			}
			(None, None) => {
				return Err(PagesError::NotMounted {
					identity: self.identity(),
				});
			}
		}

		if let Some(owner) = owner {
			owner.release(self);
			self.set_owner_recursive(None);
		}
		tracing::debug!("detached '{}'", self.identity());
		Ok(())
	}

	/// Changes the component type shipped for this node.
	///
	/// If the node is mounted, the new type chain is collected into the page
	/// bundle first, so a mounted node never references an unshipped type.
	///
	/// # Errors
	///
	/// [`PagesError::UnresolvableDeclaration`] or
	/// [`PagesError::ConflictingDeclaration`] from the page bundle. On error
	/// the node keeps its previous type.
	pub fn set_type(&self, component_type: &'static ComponentType) -> Result<()> {
		if let Some(owner) = self.owner() {
			owner.collect_type(component_type)?;
		}
		self.0.borrow_mut().component_type = component_type;
		Ok(())
	}

	/// This node followed by its ancestors, nearest first.
	fn ancestors_and_self(&self) -> Vec<Node> {
		std::iter::successors(Some(self.clone()), Node::parent).collect()
	}
}

/// Mounts `children` as top-level content of the page owning `owner`.
pub(crate) fn mount_roots(owner: &Owner, children: Vec<Child>) -> Result<()> {
	let nodes = child_nodes(&children);
	check_unmounted(&nodes)?;

	let admission = owner.admit(&nodes)?;
	owner.commit(admission);
	for node in &nodes {
		node.set_owner_recursive(Some(owner));
	}
	tracing::debug!("mounted {} root node(s) on page", nodes.len());
	owner.push_body(children);
	Ok(())
}

fn child_nodes(children: &[Child]) -> Vec<Node> {
	children.iter().filter_map(Child::as_node).cloned().collect()
}

fn check_unmounted(nodes: &[Node]) -> Result<()> {
	for (index, node) in nodes.iter().enumerate() {
		if node.is_composed() || nodes[..index].iter().any(|n| n.ptr_eq(node)) {
			return Err(PagesError::AlreadyMounted {
				identity: node.identity(),
			});
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn node(tag: &str, identity: &str) -> Node {
		Node::with_identity(tag, identity).unwrap()
	}

	#[rstest]
	fn test_compose_orders_content_and_children() {
		let list = node("ul", "list");
		let first = node("li", "one");
		let second = node("li", "two");

		list.compose([Child::from(&first), Child::from("<hr>"), Child::from(&second)])
			.unwrap();

		assert_eq!(
			list.render(),
			r#"<ul id="list"><li id="one"></li><hr><li id="two"></li></ul>"#
		);
		let children: Vec<String> = list.children().iter().map(Node::identity).collect();
		assert_eq!(children, vec!["one", "two"]);
		assert!(first.parent().unwrap().ptr_eq(&list));
		assert!(first.is_composed());
		assert!(!first.is_mounted());
	}

	#[rstest]
	fn test_compose_twice_is_already_mounted() {
		let left = node("div", "left");
		let right = node("div", "right");
		let child = node("span", "child");
		left.append_child(&child).unwrap();

		let err = right.append_child(&child).unwrap_err();
		assert!(matches!(err, PagesError::AlreadyMounted { ref identity } if identity == "child"));
		assert!(right.children().is_empty());
		assert_eq!(right.render(), r#"<div id="right"></div>"#);
		assert!(child.parent().unwrap().ptr_eq(&left));
	}

	#[rstest]
	fn test_same_node_twice_in_batch() {
		let parent = node("div", "parent");
		let child = node("span", "child");

		let err = parent
			.compose([Child::from(&child), Child::from(&child)])
			.unwrap_err();
		assert!(matches!(err, PagesError::AlreadyMounted { .. }));
		assert!(parent.children().is_empty());
		assert!(!child.is_composed());
	}

	#[rstest]
	fn test_compose_into_self_is_cycle() {
		let solo = node("div", "solo");
		let err = solo.append_child(&solo).unwrap_err();
		assert!(matches!(err, PagesError::CyclicComposition { .. }));
	}

	#[rstest]
	fn test_compose_ancestor_is_cycle() {
		let outer = node("div", "outer");
		let middle = node("div", "middle");
		let inner = node("div", "inner");
		outer.append_child(&middle).unwrap();
		middle.append_child(&inner).unwrap();

		let err = inner.append_child(&outer).unwrap_err();
		assert!(matches!(
			err,
			PagesError::CyclicComposition { ref parent, ref child }
				if parent == "inner" && child == "outer"
		));
		assert!(inner.children().is_empty());
	}

	#[rstest]
	fn test_failed_batch_leaves_earlier_items_untouched() {
		let parent = node("div", "parent");
		let fresh = node("span", "fresh");
		let taken = node("span", "taken");
		node("div", "elsewhere").append_child(&taken).unwrap();

		let result = parent.compose([Child::from(&fresh), Child::from("text"), Child::from(&taken)]);
		assert!(result.is_err());
		assert!(!fresh.is_composed());
		assert_eq!(parent.render(), r#"<div id="parent"></div>"#);
	}

	#[rstest]
	fn test_detach_allows_recomposition() {
		let first = node("div", "first");
		let second = node("div", "second");
		let child = node("span", "moved");
		first.compose([Child::from("a"), Child::from(&child), Child::from("b")])
			.unwrap();

		child.detach().unwrap();
		assert!(!child.is_composed());
		assert_eq!(first.render(), r#"<div id="first">ab</div>"#);

		second.append_child(&child).unwrap();
		assert!(child.parent().unwrap().ptr_eq(&second));
	}

	#[rstest]
	fn test_detach_detached_node() {
		let loose = node("div", "loose");
		let err = loose.detach().unwrap_err();
		assert!(matches!(err, PagesError::NotMounted { ref identity } if identity == "loose"));
	}
}
