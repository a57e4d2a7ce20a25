//! Dependency collection.
//!
//! A page ships the declarations of every type its mounted nodes use, and of
//! the types those extend, so the consumer can rebuild equivalent objects
//! without receiving the whole framework. The bundle grows additively: each
//! collection walks one ancestry chain and appends only the types not yet
//! present, base types first.
//!
//! ## Invariants
//!
//! - A type identifier appears at most once, with a single declaration text.
//! - If `A` extends `B` and both are present, `B` comes before `A`.
//! - A failed collection leaves the bundle exactly as it was.

use std::collections::HashSet;

use serde::Serialize;

use crate::component::TypeAncestry;
use crate::error::{PagesError, Result};

/// A single shipped declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
	/// Type identifier.
	pub type_name: String,
	/// Text the consumer evaluates.
	#[serde(skip)]
	pub text: String,
}

/// Ordered, deduplicated declarations.
///
/// ```
/// use sprig_pages::bundle::DeclarationBundle;
/// use sprig_pages::runtime::{COMPONENT, PAGE};
///
/// let mut bundle = DeclarationBundle::new();
/// assert_eq!(bundle.collect(&COMPONENT).unwrap(), 2);
/// assert_eq!(bundle.collect(&PAGE).unwrap(), 1);
/// assert_eq!(bundle.type_names(), ["Entity", "Component", "Page"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeclarationBundle {
	present: HashSet<String>,
	entries: Vec<Declaration>,
}

impl DeclarationBundle {
	/// Creates an empty bundle.
	pub fn new() -> Self {
		Self::default()
	}

	/// Walks the ancestry of `ty` and appends every missing declaration,
	/// most-base first.
	///
	/// Returns how many declarations were added. If any missing type has no
	/// stable declaration, or a type already present is declared with
	/// different text, nothing is added.
	pub fn collect(&mut self, ty: &dyn TypeAncestry) -> Result<usize> {
		let mut walk: Vec<Declaration> = Vec::new();

		for ancestor in ty.ancestry() {
			let known = self
				.entries
				.iter()
				.chain(walk.iter())
				.find(|d| d.type_name == ancestor.name);
			if let Some(known) = known {
				if let Some(text) = ancestor.declaration
					&& text != known.text
				{
					return Err(PagesError::ConflictingDeclaration {
						type_name: ancestor.name.to_string(),
					});
				}
				continue;
			}
			let text = ancestor
				.declaration
				.ok_or_else(|| PagesError::UnresolvableDeclaration {
					type_name: ancestor.name.to_string(),
				})?;
			walk.insert(
				0,
				Declaration {
					type_name: ancestor.name.to_string(),
					text: text.to_string(),
				},
			);
		}

		let added = walk.len();
		for declaration in walk {
			tracing::debug!("bundling declaration for '{}'", declaration.type_name);
			self.present.insert(declaration.type_name.clone());
			self.entries.push(declaration);
		}
		Ok(added)
	}

	/// Collects several chains, all or nothing.
	pub fn collect_all<'a, I>(&mut self, types: I) -> Result<usize>
	where
		I: IntoIterator<Item = &'a dyn TypeAncestry>,
	{
		let mut staged = self.clone();
		let mut added = 0;
		for ty in types {
			added += staged.collect(ty)?;
		}
		*self = staged;
		Ok(added)
	}

	/// Returns true if `type_name` has been collected.
	pub fn contains(&self, type_name: &str) -> bool {
		self.present.contains(type_name)
	}

	/// Position of `type_name` in the bundle.
	pub fn position(&self, type_name: &str) -> Option<usize> {
		self.entries.iter().position(|d| d.type_name == type_name)
	}

	/// Declarations in shipping order.
	pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
		self.entries.iter()
	}

	/// Type identifiers in shipping order.
	pub fn type_names(&self) -> Vec<&str> {
		self.entries.iter().map(|d| d.type_name.as_str()).collect()
	}

	/// Number of declarations.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if nothing has been collected.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Concatenates the declarations for embedding in a script.
	pub fn to_script(&self) -> String {
		self.entries
			.iter()
			.map(|d| d.text.trim_end())
			.collect::<Vec<_>>()
			.join("\n")
	}
}
