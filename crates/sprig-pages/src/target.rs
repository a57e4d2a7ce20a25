//! Rendering targets.
//!
//! A rendering target is the live, identity-addressable surface that rendered
//! markup is inserted into (a browser document on the consumer). The core never
//! owns it; it only looks elements up, binds and unbinds named-event handlers
//! and inserts markup through [`RenderTarget`].
//!
//! [`MemoryTarget`] is an in-memory document used for tests and for simulating
//! hydration on the server.

mod memory;

pub use memory::MemoryTarget;

use crate::callback::Callback;

/// Handle returned when a listener is attached, used to detach it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
	/// Creates a handle from a raw value assigned by a target.
	pub fn from_raw(raw: u64) -> Self {
		Self(raw)
	}

	/// The raw handle value.
	pub fn as_raw(self) -> u64 {
		self.0
	}
}

/// Errors reported by a rendering target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
	/// No live element carries the identity.
	#[error("target element '{0}' is missing")]
	ElementMissing(String),

	/// The listener handle is not attached to the element.
	#[error("listener {listener:?} for '{event}' is not attached to '{identity}'")]
	UnknownListener {
		/// Identity of the element
		identity: String,
		/// Event name the listener was expected under
		event: String,
		/// The unknown handle
		listener: ListenerId,
	},
}

/// The identity-addressable surface the lifecycle manager binds against.
pub trait RenderTarget {
	/// Returns true if a live element carries `identity`.
	fn contains(&self, identity: &str) -> bool;

	/// Attaches `callback` for `event` on the element addressed by `identity`.
	fn add_listener(
		&mut self,
		identity: &str,
		event: &str,
		callback: &Callback,
	) -> Result<ListenerId, TargetError>;

	/// Detaches a listener previously returned by [`RenderTarget::add_listener`].
	fn remove_listener(
		&mut self,
		identity: &str,
		event: &str,
		listener: ListenerId,
	) -> Result<(), TargetError>;

	/// Inserts `markup` as the last child of the element addressed by `parent`.
	fn insert_markup(&mut self, parent: &str, markup: &str) -> Result<(), TargetError>;

	/// Replaces the text content of the element addressed by `identity`.
	fn set_text(&mut self, identity: &str, text: &str) -> Result<(), TargetError>;
}
