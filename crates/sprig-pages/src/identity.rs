//! Element identities.
//!
//! Every node is addressed in the rendering target by its identity, which is
//! rendered as the element's `id` attribute. Identities are either supplied by
//! the caller and validated here, or generated from a process-wide counter.
//! Uniqueness within one page is enforced when nodes are mounted.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{PagesError, Result};

/// Prefix of generated identities.
pub const IDENTITY_PREFIX: &str = "sp-";

/// Global counter for generating unique identities.
static IDENTITY_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a fresh identity such as `sp-12`.
pub fn generate_identity() -> String {
	let id = IDENTITY_COUNTER.fetch_add(1, Ordering::SeqCst);
	format!("{}{}", IDENTITY_PREFIX, id)
}

/// Returns true if `identity` has the shape of a generated identity.
pub fn is_generated(identity: &str) -> bool {
	identity
		.strip_prefix(IDENTITY_PREFIX)
		.is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Checks that a caller-supplied identity can be rendered as an `id` attribute
/// and looked up again by the rendering target.
pub fn validate_identity(identity: &str) -> Result<()> {
	let reason = if identity.is_empty() {
		Some("identity must not be empty")
	} else if identity.chars().any(char::is_whitespace) {
		Some("identity must not contain whitespace")
	} else if identity.contains(&['"', '\'', '<', '>', '&'][..]) {
		Some("identity must not contain markup characters")
	} else {
		None
	};

	match reason {
		Some(reason) => Err(PagesError::InvalidIdentity {
			identity: identity.to_string(),
			reason,
		}),
		None => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_generate_identity_is_unique() {
		let first = generate_identity();
		let second = generate_identity();
		assert_ne!(first, second);
		assert!(first.starts_with(IDENTITY_PREFIX));
		assert!(is_generated(&first));
		assert!(is_generated(&second));
	}

	#[rstest]
	#[case("btn", true)]
	#[case("dropdown-button", true)]
	#[case("list_1", true)]
	#[case("", false)]
	#[case("two words", false)]
	#[case("tab\there", false)]
	#[case("a\"b", false)]
	#[case("<x>", false)]
	fn test_validate_identity(#[case] identity: &str, #[case] valid: bool) {
		assert_eq!(validate_identity(identity).is_ok(), valid);
	}

	#[rstest]
	fn test_validate_identity_reports_reason() {
		let err = validate_identity("").unwrap_err();
		assert!(matches!(
			err,
			PagesError::InvalidIdentity {
				reason: "identity must not be empty",
				..
			}
		));
	}

	#[rstest]
	#[case("sp-0", true)]
	#[case("sp-42", true)]
	#[case("sp-", false)]
	#[case("sp-x1", false)]
	#[case("btn", false)]
	fn test_is_generated(#[case] identity: &str, #[case] expected: bool) {
		assert_eq!(is_generated(identity), expected);
	}
}
