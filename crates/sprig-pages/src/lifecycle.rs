//! Lifecycle management for live component trees.
//!
//! Markup rendered on the server carries no behaviour. Once it has been
//! inserted into a rendering target, [`Lifecycle::start`] walks the tree and
//! attaches every registered handler to the element addressed by its node's
//! identity; [`Lifecycle::stop`] detaches them again.
//!
//! ## Rules
//!
//! - Both walks are pre-order: a node before its children, children in
//!   composition order. Events are bound in first-registration order and
//!   handlers per event in registration order.
//! - `start` never binds the same (event, handler) pair twice for a node.
//! - `stop` unbinds exactly what `start` bound, using the listener handles the
//!   manager recorded, and leaves the node's registrations in place so a
//!   later `start` rebinds the same set.
//! - The record of attached handlers belongs to the node, not to its
//!   identity. A node detached and replaced by another node with the same
//!   identity keeps its own bindings; starting or stopping the newcomer never
//!   touches them.
//! - A missing element does not abort the walk. It is reported in the
//!   [`LifecycleReport`] and logged, and the walk continues. Only nodes with
//!   something to change are checked: on `start` a node with registrations,
//!   on `stop` a node with attached handlers. Other nodes are visited without
//!   looking at the target.

use std::collections::HashMap;
use std::fmt;

use crate::callback::Callback;
use crate::component::{Child, Node, WeakNode};
use crate::error::{PagesError, Result};
use crate::target::{ListenerId, RenderTarget, TargetError};

/// Which walk produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
	/// Binding handlers.
	Start,
	/// Unbinding handlers.
	Stop,
}

impl fmt::Display for LifecyclePhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Start => f.write_str("start"),
			Self::Stop => f.write_str("stop"),
		}
	}
}

/// A node whose bindings could not be changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleFailure {
	/// Identity of the node.
	pub identity: String,
	/// The walk that hit the failure.
	pub phase: LifecyclePhase,
	/// What the target reported.
	pub error: TargetError,
}

/// Outcome of a `start` or `stop` walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleReport {
	/// Handlers newly attached.
	pub bound: usize,
	/// Handlers detached.
	pub unbound: usize,
	/// Handlers left alone because they were already attached.
	pub skipped: usize,
	/// Nodes visited.
	pub visited: usize,
	/// Per-node failures, in visiting order.
	pub failures: Vec<LifecycleFailure>,
}

impl LifecycleReport {
	/// Returns true if no node failed.
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}

	/// Adds the counts and failures of `other` to this report.
	pub fn merge(&mut self, other: LifecycleReport) {
		self.bound += other.bound;
		self.unbound += other.unbound;
		self.skipped += other.skipped;
		self.visited += other.visited;
		self.failures.extend(other.failures);
	}

	fn fail(&mut self, identity: String, phase: LifecyclePhase, error: TargetError) {
		tracing::warn!("lifecycle {} failed for '{}': {}", phase, identity, error);
		self.failures.push(LifecycleFailure {
			identity,
			phase,
			error,
		});
	}
}

#[derive(Debug, Clone)]
struct ActiveBinding {
	event: String,
	callback: Callback,
	listener: ListenerId,
}

/// Handlers attached for one node.
#[derive(Debug)]
struct NodeBindings {
	node: WeakNode,
	bindings: Vec<ActiveBinding>,
}

/// Owns the record of which handlers are currently attached to the target.
///
/// The record is kept per node and is never rebuilt by querying the target.
/// Entries of dropped nodes are pruned on the next walk.
#[derive(Debug, Default)]
pub struct Lifecycle {
	active: HashMap<usize, NodeBindings>,
}

impl Lifecycle {
	/// Creates a manager with nothing bound.
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds every registered handler of `node` and its descendants.
	pub fn start<T>(&mut self, node: &Node, target: &mut T) -> LifecycleReport
	where
		T: RenderTarget + ?Sized,
	{
		self.prune();
		let mut report = LifecycleReport::default();
		node.walk_pre_order(&mut |n| self.start_node(n, target, &mut report));
		tracing::debug!(
			"started '{}': {} bound, {} skipped, {} failure(s)",
			node.identity(),
			report.bound,
			report.skipped,
			report.failures.len()
		);
		report
	}

	/// Unbinds every handler this manager attached for `node` and its
	/// descendants.
	pub fn stop<T>(&mut self, node: &Node, target: &mut T) -> LifecycleReport
	where
		T: RenderTarget + ?Sized,
	{
		self.prune();
		let mut report = LifecycleReport::default();
		node.walk_pre_order(&mut |n| self.stop_node(n, target, &mut report));
		tracing::debug!(
			"stopped '{}': {} unbound, {} failure(s)",
			node.identity(),
			report.unbound,
			report.failures.len()
		);
		report
	}

	fn start_node<T>(&mut self, node: &Node, target: &mut T, report: &mut LifecycleReport)
	where
		T: RenderTarget + ?Sized,
	{
		report.visited += 1;
		let registrations = node.registrations();
		if registrations.is_empty() {
			return;
		}

		let identity = node.identity();
		if !target.contains(&identity) {
			report.fail(
				identity.clone(),
				LifecyclePhase::Start,
				TargetError::ElementMissing(identity),
			);
			return;
		}

		let key = node.key();
		let bindings = &mut self
			.active
			.entry(key)
			.or_insert_with(|| NodeBindings {
				node: node.downgrade(),
				bindings: Vec::new(),
			})
			.bindings;
		for (event, callback) in registrations {
			if bindings
				.iter()
				.any(|b| b.event == event && b.callback.ptr_eq(&callback))
			{
				report.skipped += 1;
				continue;
			}
			match target.add_listener(&identity, &event, &callback) {
				Ok(listener) => {
					bindings.push(ActiveBinding {
						event,
						callback,
						listener,
					});
					report.bound += 1;
				}
				Err(error) => report.fail(identity.clone(), LifecyclePhase::Start, error),
			}
		}
		if bindings.is_empty() {
			self.active.remove(&key);
		}
	}

	fn stop_node<T>(&mut self, node: &Node, target: &mut T, report: &mut LifecycleReport)
	where
		T: RenderTarget + ?Sized,
	{
		report.visited += 1;
		let Some(NodeBindings { bindings, .. }) = self.active.remove(&node.key()) else {
			return;
		};

		let identity = node.identity();
		if !target.contains(&identity) {
			report.fail(
				identity.clone(),
				LifecyclePhase::Stop,
				TargetError::ElementMissing(identity),
			);
			return;
		}

		for binding in bindings {
			match target.remove_listener(&identity, &binding.event, binding.listener) {
				Ok(()) => report.unbound += 1,
				Err(error) => report.fail(identity.clone(), LifecyclePhase::Stop, error),
			}
		}
	}

	fn prune(&mut self) {
		self.active.retain(|_, record| record.node.is_alive());
	}

	fn bindings_of(&self, node: &Node) -> &[ActiveBinding] {
		self.active
			.get(&node.key())
			.map_or(&[], |record| record.bindings.as_slice())
	}

	/// Returns true if `handler` is currently attached for `event` on `node`.
	pub fn is_bound(&self, node: &Node, event: &str, handler: &Callback) -> bool {
		self.bindings_of(node)
			.iter()
			.any(|b| b.event == event && b.callback.ptr_eq(handler))
	}

	/// Number of handlers currently attached for `node` alone.
	pub fn active_count(&self, node: &Node) -> usize {
		self.bindings_of(node).len()
	}

	/// Returns true if any handler is attached for `node`.
	pub fn is_live(&self, node: &Node) -> bool {
		self.active_count(node) > 0
	}

	/// Number of handlers attached across all nodes.
	pub fn total_active(&self) -> usize {
		self.active.values().map(|record| record.bindings.len()).sum()
	}

	/// Composes `child` into a live `parent`, inserts its markup into the
	/// parent's element and starts it.
	///
	/// # Errors
	///
	/// Returns [`PagesError::Target`] if the parent element is missing, or
	/// any error from [`Node::append_child`]. On error the tree is unchanged.
	pub fn append_live<T>(&mut self, parent: &Node, child: &Node, target: &mut T) -> Result<LifecycleReport>
	where
		T: RenderTarget + ?Sized,
	{
		let parent_identity = parent.identity();
		if !target.contains(&parent_identity) {
			return Err(TargetError::ElementMissing(parent_identity).into());
		}

		parent.append_child(child)?;
		if let Err(error) = target.insert_markup(&parent_identity, &child.render()) {
			child.detach()?;
			return Err(PagesError::Target(error));
		}
		Ok(self.start(child, target))
	}

	/// Replaces the content of a live `node` with `text`.
	///
	/// Child nodes are stopped and detached first; they are no longer part of
	/// the element once its text is replaced.
	///
	/// # Errors
	///
	/// Returns [`PagesError::Target`] if the element is missing. On error
	/// nothing is stopped or detached.
	pub fn set_text<T>(&mut self, node: &Node, text: &str, target: &mut T) -> Result<LifecycleReport>
	where
		T: RenderTarget + ?Sized,
	{
		let identity = node.identity();
		if !target.contains(&identity) {
			return Err(TargetError::ElementMissing(identity).into());
		}

		let mut report = LifecycleReport::default();
		for child in node.children() {
			report.merge(self.stop(&child, target));
			child.detach()?;
		}
		node.replace_content(Child::Text(escape_text(text)));
		target.set_text(&identity, text)?;
		Ok(report)
	}
}

fn escape_text(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}
