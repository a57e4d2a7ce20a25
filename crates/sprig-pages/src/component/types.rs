//! Component type descriptors.

use std::fmt;

/// One entry of a type's ancestry: its identifier and, when it has a stable
/// textual form, the declaration the consumer evaluates to recreate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ancestor<'a> {
	/// Type identifier, unique within a bundle.
	pub name: &'a str,
	/// Declaration text, or `None` for types with no stable textual form.
	pub declaration: Option<&'a str>,
}

/// Capability consumed by the dependency collector.
///
/// Anything that can list its type ancestry can be bundled; the collector
/// never inspects the implementor beyond this list.
pub trait TypeAncestry {
	/// Ordered from the most-derived type toward the base, stopping before the
	/// implicit base sentinel.
	fn ancestry(&self) -> Vec<Ancestor<'_>>;
}

/// A static description of a component type and the type it extends.
///
/// Types form a single-inheritance chain that ends at a type with no parent;
/// everything past that is the base sentinel and is never shipped.
///
/// ```
/// use sprig_pages::component::{ComponentType, TypeAncestry};
/// use sprig_pages::runtime::COMPONENT;
///
/// static BUTTON: ComponentType =
///     ComponentType::new("Button", Some(&COMPONENT), "class Button extends Component {}");
///
/// let names: Vec<_> = BUTTON.ancestry().iter().map(|a| a.name).collect();
/// assert_eq!(names, ["Button", "Component", "Entity"]);
/// assert!(BUTTON.is_a(&COMPONENT));
/// ```
#[derive(Debug)]
pub struct ComponentType {
	name: &'static str,
	extends: Option<&'static ComponentType>,
	declaration: Option<&'static str>,
}

impl ComponentType {
	/// Describes a type with a stable declaration.
	pub const fn new(
		name: &'static str,
		extends: Option<&'static ComponentType>,
		declaration: &'static str,
	) -> Self {
		Self {
			name,
			extends,
			declaration: Some(declaration),
		}
	}

	/// Describes a type that only exists at runtime and cannot be shipped.
	pub const fn synthesized(name: &'static str, extends: Option<&'static ComponentType>) -> Self {
		Self {
			name,
			extends,
			declaration: None,
		}
	}

	/// The type identifier.
	pub const fn name(&self) -> &'static str {
		self.name
	}

	/// The type this one extends.
	pub const fn extends(&self) -> Option<&'static ComponentType> {
		self.extends
	}

	/// The declaration text, if the type has a stable one.
	pub const fn declaration(&self) -> Option<&'static str> {
		self.declaration
	}

	/// Iterates over this type followed by each ancestor.
	///
	/// Stops at the first repeated name, so a misdeclared chain that loops
	/// back on itself still terminates.
	pub fn chain(&self) -> impl Iterator<Item = &ComponentType> {
		let mut seen: Vec<&'static str> = Vec::new();
		std::iter::successors(Some(self), |ty| ty.extends).take_while(move |ty| {
			if seen.contains(&ty.name) {
				false
			} else {
				seen.push(ty.name);
				true
			}
		})
	}

	/// Returns true if this type is `other` or extends it.
	pub fn is_a(&self, other: &ComponentType) -> bool {
		self.chain().any(|ty| ty == other)
	}
}

impl PartialEq for ComponentType {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl Eq for ComponentType {}

impl fmt::Display for ComponentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

impl TypeAncestry for ComponentType {
	fn ancestry(&self) -> Vec<Ancestor<'_>> {
		self.chain()
			.map(|ty| Ancestor {
				name: ty.name,
				declaration: ty.declaration,
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::runtime::{COMPONENT, ENTITY, PAGE};
	use rstest::rstest;

	static BUTTON: ComponentType =
		ComponentType::new("Button", Some(&COMPONENT), "class Button extends Component {}");
	static DROPDOWN_BUTTON: ComponentType = ComponentType::new(
		"DropdownButton",
		Some(&BUTTON),
		"class DropdownButton extends Button {}",
	);
	static GENERATED: ComponentType = ComponentType::synthesized("Generated", Some(&BUTTON));

	#[rstest]
	fn test_ancestry_most_derived_first() {
		let names: Vec<&str> = DROPDOWN_BUTTON.ancestry().iter().map(|a| a.name).collect();
		assert_eq!(names, vec!["DropdownButton", "Button", "Component", "Entity"]);
	}

	#[rstest]
	fn test_root_type_has_only_itself() {
		let ancestry = ENTITY.ancestry();
		assert_eq!(ancestry.len(), 1);
		assert_eq!(ancestry[0].name, "Entity");
		assert!(ancestry[0].declaration.is_some());
	}

	#[rstest]
	fn test_synthesized_has_no_declaration() {
		let ancestry = GENERATED.ancestry();
		assert_eq!(ancestry[0].name, "Generated");
		assert!(ancestry[0].declaration.is_none());
		assert!(ancestry[1].declaration.is_some());
	}

	#[rstest]
	#[case(&DROPDOWN_BUTTON, &BUTTON, true)]
	#[case(&DROPDOWN_BUTTON, &ENTITY, true)]
	#[case(&BUTTON, &DROPDOWN_BUTTON, false)]
	#[case(&PAGE, &COMPONENT, false)]
	#[case(&PAGE, &PAGE, true)]
	fn test_is_a(
		#[case] ty: &'static ComponentType,
		#[case] other: &'static ComponentType,
		#[case] expected: bool,
	) {
		assert_eq!(ty.is_a(other), expected);
	}

	#[rstest]
	fn test_chain_includes_self() {
		let names: Vec<&str> = BUTTON.chain().map(ComponentType::name).collect();
		assert_eq!(names, vec!["Button", "Component", "Entity"]);
	}

	#[rstest]
	fn test_display_is_name() {
		assert_eq!(BUTTON.to_string(), "Button");
	}
}
