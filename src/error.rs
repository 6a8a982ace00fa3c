use thiserror::Error;

/// Why a `delete` or `set` call was refused.
/// A rejected call leaves the list untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejected {
	/// The call was not immediately preceded by a successful
	/// `next`, `previous`, `find_next` or `find_previous`.
	#[error("no eligible prior call")]
	NotEligible,
	#[error("list empty")]
	Empty,
}
