//! Error types for sprig-pages.
//!
//! Errors fall into three groups:
//!
//! - **Structural** errors ([`PagesError::AlreadyMounted`],
//!   [`PagesError::CyclicComposition`], [`PagesError::DuplicateIdentity`],
//!   [`PagesError::InvalidIdentity`], [`PagesError::NotMounted`]) are detected at
//!   compose time and abort that composition without touching any tree.
//! - **Dependency** errors ([`PagesError::UnresolvableDeclaration`],
//!   [`PagesError::ConflictingDeclaration`]) abort the composition that needed
//!   the declaration; already collected types stay intact.
//! - **Lifecycle** errors ([`TargetError`]) are never returned from `start` or
//!   `stop`. They are collected per node in a
//!   [`LifecycleReport`](crate::lifecycle::LifecycleReport) and traversal continues.

use crate::target::TargetError;

/// Result type alias for sprig-pages operations.
pub type Result<T> = std::result::Result<T, PagesError>;

/// Errors returned by composition, bundling and page rendering.
#[derive(Debug, thiserror::Error)]
pub enum PagesError {
	/// The node is already composed into a parent or mounted on a page.
	#[error("node '{identity}' is already mounted elsewhere")]
	AlreadyMounted {
		/// Identity of the node that was composed twice
		identity: String,
	},

	/// The node would become its own ancestor.
	#[error("composing '{child}' into '{parent}' would create a cycle")]
	CyclicComposition {
		/// Identity of the receiving parent
		parent: String,
		/// Identity of the child that is an ancestor of the parent
		child: String,
	},

	/// Two nodes mounted under one page would share an identity.
	#[error("identity '{identity}' is already mounted on this page")]
	DuplicateIdentity {
		/// The clashing identity
		identity: String,
	},

	/// A caller-supplied identity cannot address an element.
	#[error("invalid identity '{identity}': {reason}")]
	InvalidIdentity {
		/// The rejected identity
		identity: String,
		/// Why it was rejected
		reason: &'static str,
	},

	/// The node is neither composed into a parent nor mounted on a page.
	#[error("node '{identity}' is not mounted")]
	NotMounted {
		/// Identity of the detached node
		identity: String,
	},

	/// A type in the ancestry chain has no stable textual declaration.
	#[error("type '{type_name}' has no stable declaration to ship")]
	UnresolvableDeclaration {
		/// Name of the type that could not be declared
		type_name: String,
	},

	/// Two different declarations were shipped under one type identifier.
	#[error("type '{type_name}' is already bundled with a different declaration")]
	ConflictingDeclaration {
		/// The shared type identifier
		type_name: String,
	},

	/// The rendering target rejected a live operation.
	#[error(transparent)]
	Target(#[from] TargetError),

	/// Page options could not be parsed.
	#[error("invalid page configuration: {0}")]
	Config(#[from] toml::de::Error),

	/// The bundle manifest could not be serialized.
	#[error("failed to serialize bundle manifest: {0}")]
	Manifest(#[from] serde_json::Error),
}

impl PagesError {
	/// Returns true for errors detected while composing a tree.
	pub fn is_structural(&self) -> bool {
		matches!(
			self,
			Self::AlreadyMounted { .. }
				| Self::CyclicComposition { .. }
				| Self::DuplicateIdentity { .. }
				| Self::InvalidIdentity { .. }
				| Self::NotMounted { .. }
		)
	}

	/// Returns true for errors raised while collecting declarations.
	pub fn is_dependency(&self) -> bool {
		matches!(
			self,
			Self::UnresolvableDeclaration { .. } | Self::ConflictingDeclaration { .. }
		)
	}
}
