//! Page scope shared by every mounted node.
//!
//! A page owns one scope. Each node mounted under the page holds a handle to
//! it, so nodes composed into an already mounted parent are checked against
//! the same identity set and collected into the same bundle as the rest of
//! the page.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::node::{Child, Node};
use super::types::TypeAncestry;
use crate::bundle::DeclarationBundle;
use crate::error::{PagesError, Result};

#[derive(Debug, Default)]
pub(crate) struct ScopeState {
	/// Top-level content of the page body, in composition order.
	pub(crate) body: Vec<Child>,
	/// Identities of every mounted node.
	pub(crate) identities: HashSet<String>,
	/// Declarations collected for every mounted node.
	pub(crate) bundle: DeclarationBundle,
}

/// Validated, not yet applied changes for a batch of subtrees.
#[derive(Debug)]
pub(crate) struct Admission {
	identities: Vec<String>,
	bundle: DeclarationBundle,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Owner(pub(crate) Rc<RefCell<ScopeState>>);

impl Owner {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn ptr_eq(&self, other: &Owner) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	/// Checks identities and collects declarations for every node in `roots`.
	///
	/// Children are collected before their container. Nothing in the scope
	/// changes until the returned admission is committed.
	pub(crate) fn admit(&self, roots: &[Node]) -> Result<Admission> {
		let state = self.0.borrow();
		let mut identities: Vec<String> = Vec::new();
		let mut bundle = state.bundle.clone();
		let mut failure: Option<PagesError> = None;

		for root in roots {
			root.walk_post_order(&mut |node| {
				if failure.is_some() {
					return;
				}
				let identity = node.identity();
				if state.identities.contains(&identity) || identities.contains(&identity) {
					failure = Some(PagesError::DuplicateIdentity { identity });
					return;
				}
				if let Err(err) = bundle.collect(node.component_type()) {
					failure = Some(err);
					return;
				}
				identities.push(identity);
			});
			if let Some(err) = failure.take() {
				return Err(err);
			}
		}

		Ok(Admission { identities, bundle })
	}

	pub(crate) fn commit(&self, admission: Admission) {
		let mut state = self.0.borrow_mut();
		state.identities.extend(admission.identities);
		state.bundle = admission.bundle;
	}

	/// Forgets the identities of `node` and its descendants.
	///
	/// Declarations stay in the bundle.
	pub(crate) fn release(&self, node: &Node) {
		let mut state = self.0.borrow_mut();
		node.walk_pre_order(&mut |n| {
			state.identities.remove(&n.identity());
		});
	}

	/// Collects one more type chain into the bundle.
	pub(crate) fn collect_type(&self, ty: &dyn TypeAncestry) -> Result<()> {
		self.0.borrow_mut().bundle.collect(ty)?;
		Ok(())
	}

	pub(crate) fn contains_identity(&self, identity: &str) -> bool {
		self.0.borrow().identities.contains(identity)
	}

	pub(crate) fn bundle(&self) -> DeclarationBundle {
		self.0.borrow().bundle.clone()
	}

	pub(crate) fn body(&self) -> Vec<Child> {
		self.0.borrow().body.clone()
	}

	pub(crate) fn push_body(&self, children: Vec<Child>) {
		self.0.borrow_mut().body.extend(children);
	}

	/// Removes `node` from the body. Returns false if it is not a body root.
	pub(crate) fn remove_root(&self, node: &Node) -> bool {
		let mut state = self.0.borrow_mut();
		let Some(index) = state
			.body
			.iter()
			.position(|child| child.as_node().is_some_and(|n| n.ptr_eq(node)))
		else {
			return false;
		};
		state.body.remove(index);
		true
	}
}
