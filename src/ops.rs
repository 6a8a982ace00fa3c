use std::fmt;

/// The capability set a [`CursorList`](crate::CursorList) is built with.
/// It decides how values are compared, copied into the list and released from it,
/// and is fixed for the lifetime of the list.
pub trait ElemOps<T> {
	/// Equality used by `find_next` and `find_previous`.
	fn compare(&self, a: &T, b: &T) -> bool;

	/// Produce the owned copy stored by `add` and `set`.
	fn make_owned(&self, value: &T) -> T;

	/// Release a value leaving the list through `delete`, `set` or drop.
	fn release_owned(&self, value: T);
}

/// Ops for any `T: Clone + PartialEq`: `==`, `clone` and plain `drop`.
/// ```
/// # use cursorlist::{CursorList, CloneOps};
/// let mut list = CursorList::new(CloneOps);
/// list.add(&"a".to_string());
/// assert_eq!(list.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CloneOps;

impl<T: Clone + PartialEq> ElemOps<T> for CloneOps {
	#[inline]
	fn compare(&self, a: &T, b: &T) -> bool { a == b }

	#[inline]
	fn make_owned(&self, value: &T) -> T { value.clone() }

	#[inline]
	fn release_owned(&self, value: T) { drop(value) }
}

/// Ops assembled from three closures.
/// ```
/// # use cursorlist::{CursorList, FnOps};
/// // compare case-insensitively, store upper-cased copies
/// let ops = FnOps::new(
/// 	|a: &String, b: &String| a.eq_ignore_ascii_case(b),
/// 	|v: &String| v.to_uppercase(),
/// 	drop::<String>,
/// );
///
/// let mut list = CursorList::new(ops);
/// list.add(&"abc".to_string());
/// list.reset();
///
/// assert_eq!(list.find_next(&"Abc".to_string()).map(String::as_str), Some("ABC"));
/// ```
#[derive(Clone, Copy)]
pub struct FnOps<C, M, R> {
	compare: C,
	make:    M,
	release: R,
}

impl<C, M, R> FnOps<C, M, R> {
	#[inline]
	pub const fn new(compare: C, make: M, release: R) -> Self {
		Self { compare, make, release }
	}
}

impl<T, C, M, R> ElemOps<T> for FnOps<C, M, R>
where
	C: Fn(&T, &T) -> bool,
	M: Fn(&T) -> T,
	R: Fn(T),
{
	#[inline]
	fn compare(&self, a: &T, b: &T) -> bool { (self.compare)(a, b) }

	#[inline]
	fn make_owned(&self, value: &T) -> T { (self.make)(value) }

	#[inline]
	fn release_owned(&self, value: T) { (self.release)(value) }
}

impl<C, M, R> fmt::Debug for FnOps<C, M, R> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("FnOps")
	}
}
