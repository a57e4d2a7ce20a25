//! Callback types and event handler conversion.
//!
//! Handlers registered on a [`Node`](crate::component::Node) are wrapped in a
//! [`Callback`]. Two callbacks are the same handler only when they share the
//! same allocation: cloning a `Callback` keeps its identity, wrapping the same
//! closure twice does not. The lifecycle manager relies on this to avoid
//! double-binding and to unbind exactly what it bound.
//!
//! ## Example
//!
//! ```
//! use sprig_pages::callback::{Callback, Event};
//!
//! let handler = Callback::new(|event: &Event| {
//!     assert_eq!(event.name(), "click");
//! });
//! let alias = handler.clone();
//! assert!(handler.ptr_eq(&alias));
//!
//! handler.call(&Event::new("click", "btn"));
//! ```

use std::fmt;
use std::rc::Rc;

/// An event delivered to a handler by the rendering target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	name: String,
	target: String,
}

impl Event {
	/// Creates an event named `name` dispatched on the element `target`.
	pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			target: target.into(),
		}
	}

	/// The event name, e.g. `"click"`.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Identity of the element the event was dispatched on.
	pub fn target(&self) -> &str {
		&self.target
	}
}

/// A cloneable event handler compared by identity.
///
/// Nodes and the lifecycle manager live on a single thread, so the handler is
/// reference counted without `Send + Sync` bounds.
#[derive(Clone)]
pub struct Callback {
	inner: Rc<dyn Fn(&Event) + 'static>,
}

impl Callback {
	/// Creates a new callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&Event) + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Invokes the handler.
	pub fn call(&self, event: &Event) {
		(self.inner)(event)
	}

	/// Returns true if both callbacks refer to the same handler.
	pub fn ptr_eq(&self, other: &Callback) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for Callback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Callback")
			.field("ptr", &Rc::as_ptr(&self.inner).cast::<()>())
			.finish()
	}
}

/// Conversion into a [`Callback`].
///
/// Implemented for closures taking `&Event` and for `Callback` itself, so a
/// handler that is already registered somewhere can be reused with its
/// identity intact.
pub trait IntoCallback {
	/// Converts self into a [`Callback`].
	fn into_callback(self) -> Callback;
}

impl<F> IntoCallback for F
where
	F: Fn(&Event) + 'static,
{
	fn into_callback(self) -> Callback {
		Callback::new(self)
	}
}

impl IntoCallback for Callback {
	fn into_callback(self) -> Callback {
		self
	}
}

impl IntoCallback for &Callback {
	fn into_callback(self) -> Callback {
		self.clone()
	}
}
