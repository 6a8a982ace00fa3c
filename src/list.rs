use std::fmt::{self, Debug};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use tracing::{debug, trace};

use crate::error::Rejected;
use crate::ops::ElemOps;

type Link<T> = Option<NonNull<Node<T>>>;

/// A doubly linked list with a list-iterator cursor sitting *between* elements.
/// The cursor is the pair of nodes `before` and `after` it; `next` and `previous` step over one of them.
///
/// `delete` and `set` act on the element returned by the last successful
/// `next`, `previous`, `find_next` or `find_previous`, and only once:
/// any other call in between (`add`, `has_next`, `had_previous`, `reset`) takes that right away.
pub struct CursorList<T, O: ElemOps<T>> {
	head:   Link<T>,
	tail:   Link<T>,
	before: Link<T>,
	after:  Link<T>,
	last:   Link<T>,
	len:    usize,
	index:  usize,
	ops:    O,
	_boo:   PhantomData<Box<Node<T>>>,
}

struct Node<T> {
	prev: Link<T>,
	next: Link<T>,
	elem: T,
}

impl<T> Node<T> {
	fn new_nonnull(elem: T) -> NonNull<Self> {
		unsafe {
			NonNull::new_unchecked(Box::into_raw(Box::new(Self {
				prev: None,
				next: None,
				elem,
			})))
		}
	}
}

unsafe impl<T: Send, O: ElemOps<T> + Send> Send for CursorList<T, O> {}
unsafe impl<T: Sync, O: ElemOps<T> + Sync> Sync for CursorList<T, O> {}

impl<T, O: ElemOps<T>> CursorList<T, O> {
	/// Create a new empty list bound to `ops`. `O(1)`.
	/// Does not allocate any memory.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps};
	/// let list: CursorList<u8, _> = CursorList::new(CloneOps);
	/// assert!(list.is_empty());
	/// ```
	#[inline]
	pub const fn new(ops: O) -> Self {
		Self {
			head:   None,
			tail:   None,
			before: None,
			after:  None,
			last:   None,
			len:    0,
			index:  0,
			ops,
			_boo:   PhantomData,
		}
	}

	/// Insert an owned copy of `value` right before the cursor. `O(1)`.
	/// The next `previous` returns it, the next `next` is unaffected.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps};
	/// let mut list = CursorList::new(CloneOps);
	/// list.add(&1);
	/// list.add(&2);
	///
	/// assert_eq!(list.next(), None);
	/// assert_eq!(list.previous(), Some(&2));
	/// assert_eq!(format!("{list:?}"), "[1, 2]");
	/// ```
	pub fn add(&mut self, value: &T) {
		let elem = self.ops.make_owned(value);
		self.link(elem);
		self.last = None;
	}

	fn link(&mut self, elem: T) {
		let mut new = Node::new_nonnull(elem);

		unsafe {
			match (self.before, self.after) {
				// empty
				(None, None) => {
					self.head = Some(new);
					self.tail = Some(new);
				},
				// new head
				(None, Some(mut after)) => {
					new.as_mut().next   = Some(after);
					after.as_mut().prev = Some(new);
					self.head = Some(new);
				},
				// new tail
				(Some(mut before), None) => {
					new.as_mut().prev    = Some(before);
					before.as_mut().next = Some(new);
					self.tail = Some(new);
				},
				(Some(mut before), Some(mut after)) => {
					new.as_mut().prev    = Some(before);
					new.as_mut().next    = Some(after);
					before.as_mut().next = Some(new);
					after.as_mut().prev  = Some(new);
				},
			}
		}

		self.before = Some(new);
		self.index += 1;
		self.len   += 1;
	}

	/// Whether `next` would return an element. `O(1)`.
	/// Like every call other than a move, this forfeits a pending `delete`/`set`.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps, Rejected};
	/// let mut list: CursorList<_, CloneOps> = [1].into_iter().collect();
	/// assert_eq!(list.next(), Some(&1));
	///
	/// assert!(!list.has_next());
	/// assert_eq!(list.delete(), Err(Rejected::NotEligible));
	/// ```
	#[inline]
	pub fn has_next(&mut self) -> bool {
		self.last = None;
		self.after.is_some()
	}

	/// Whether `previous` would return an element. `O(1)`.
	/// Forfeits a pending `delete`/`set`, same as `has_next`.
	#[inline]
	pub fn had_previous(&mut self) -> bool {
		self.last = None;
		self.before.is_some()
	}

	/// Step the cursor over the element after it and return that element. `O(1)`.
	/// Returns `None`, without moving, at the end of the list.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps};
	/// let mut list: CursorList<_, CloneOps> = [1, 2].into_iter().collect();
	/// assert_eq!(list.next(), Some(&1));
	/// assert_eq!(list.next(), Some(&2));
	/// assert_eq!(list.next(), None);
	/// assert_eq!(list.next(), None);
	/// ```
	pub fn next(&mut self) -> Option<&T> {
		let node = self.after?;

		self.before = Some(node);
		self.after  = unsafe { node.as_ref().next };
		self.index += 1;
		self.last   = Some(node);

		Some(unsafe { &node.as_ref().elem })
	}

	/// Step the cursor back over the element before it and return that element. `O(1)`.
	/// Returns `None`, without moving, at the start of the list.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps};
	/// let mut list: CursorList<_, CloneOps> = [1, 2].into_iter().collect();
	/// assert_eq!(list.previous(), None);
	///
	/// list.next();
	/// list.next();
	/// assert_eq!(list.previous(), Some(&2));
	/// assert_eq!(list.previous(), Some(&1));
	/// ```
	pub fn previous(&mut self) -> Option<&T> {
		let node = self.before?;

		self.after  = Some(node);
		self.before = unsafe { node.as_ref().prev };
		self.index -= 1;
		self.last   = Some(node);

		Some(unsafe { &node.as_ref().elem })
	}

	/// Search forward from the cursor for an element equal to `value`. `O(n)`.
	/// On a match the cursor lands past it exactly as if `next` had returned it.
	/// Otherwise `None` is returned and the cursor is left at the end of the list.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps};
	/// let mut list: CursorList<_, CloneOps> = [1, 2, 3, 2].into_iter().collect();
	///
	/// assert_eq!(list.find_next(&2), Some(&2));
	/// assert_eq!(list.index(), 2);
	/// assert_eq!(list.find_next(&2), Some(&2));
	/// assert_eq!(list.index(), 4);
	///
	/// list.reset();
	/// assert_eq!(list.find_next(&7), None);
	/// assert!(!list.has_next());
	/// ```
	pub fn find_next(&mut self, value: &T) -> Option<&T> {
		let mut cur     = self.after;
		let mut skipped = 0;

		while let Some(node) = cur {
			if self.ops.compare(unsafe { &node.as_ref().elem }, value) {
				self.before = unsafe { node.as_ref().prev };
				self.after  = Some(node);
				self.index += skipped;
				return self.next();
			}

			cur = unsafe { node.as_ref().next };
			skipped += 1;
		}

		trace!(scanned = skipped, "find_next exhausted");
		self.before = self.tail;
		self.after  = None;
		self.index  = self.len;
		self.last   = None;
		None
	}

	/// Search backward from the cursor for an element equal to `value`. `O(n)`.
	/// On a match the cursor lands before it exactly as if `previous` had returned it.
	/// Otherwise `None` is returned and the cursor is left at the start of the list.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps};
	/// let mut list: CursorList<_, CloneOps> = [1, 2, 3].into_iter().collect();
	/// while list.next().is_some() {}
	///
	/// assert_eq!(list.find_previous(&2), Some(&2));
	/// assert_eq!(list.index(), 1);
	/// assert_eq!(list.find_previous(&3), None);
	/// assert_eq!(list.index(), 0);
	/// ```
	pub fn find_previous(&mut self, value: &T) -> Option<&T> {
		let mut cur     = self.before;
		let mut skipped = 0;

		while let Some(node) = cur {
			if self.ops.compare(unsafe { &node.as_ref().elem }, value) {
				self.before = Some(node);
				self.after  = unsafe { node.as_ref().next };
				self.index -= skipped;
				return self.previous();
			}

			cur = unsafe { node.as_ref().prev };
			skipped += 1;
		}

		trace!(scanned = skipped, "find_previous exhausted");
		self.before = None;
		self.after  = self.head;
		self.index  = 0;
		self.last   = None;
		None
	}

	fn eligible(&self, op: &'static str) -> Result<NonNull<Node<T>>, Rejected> {
		let reason = match self.last {
			_ if self.len == 0 => Rejected::Empty,
			None => Rejected::NotEligible,
			Some(node) => return Ok(node),
		};

		debug!(op, %reason, "rejected");
		Err(reason)
	}

	/// Remove the element returned by the last move, releasing its value. `O(1)`.
	/// Only valid right after a successful `next`, `previous`, `find_next` or `find_previous`.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps, Rejected};
	/// let mut list: CursorList<_, CloneOps> = [1, 2, 3].into_iter().collect();
	/// list.next();
	/// list.next();
	///
	/// assert_eq!(list.delete(), Ok(()));
	/// assert_eq!(list.delete(), Err(Rejected::NotEligible));
	/// assert_eq!(list.next(), Some(&3));
	/// assert_eq!(format!("{list:?}"), "[1, 3]");
	/// ```
	pub fn delete(&mut self) -> Result<(), Rejected> {
		let node = self.eligible("delete")?;
		let Node { prev, next, elem } = *unsafe { Box::from_raw(node.as_ptr()) };

		unsafe {
			match (prev, next) {
				// only element
				(None, None) => {
					self.head = None;
					self.tail = None;
				},
				// head
				(None, Some(mut next)) => {
					next.as_mut().prev = None;
					self.head = Some(next);
				},
				// tail
				(Some(mut prev), None) => {
					prev.as_mut().next = None;
					self.tail = Some(prev);
				},
				(Some(mut prev), Some(mut next)) => {
					prev.as_mut().next = Some(next);
					next.as_mut().prev = Some(prev);
				},
			}
		}

		// the node sits on one side of the cursor
		if self.before == Some(node) {
			self.before = prev;
			self.index -= 1;
		} else {
			self.after = next;
		}

		self.len -= 1;
		self.last = None;
		self.ops.release_owned(elem);
		Ok(())
	}

	/// Replace the element returned by the last move with an owned copy of `value`. `O(1)`.
	/// The old value is released. Same preconditions as `delete`.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps, Rejected};
	/// let mut list: CursorList<_, CloneOps> = [1, 2, 3].into_iter().collect();
	/// assert_eq!(list.set(&9), Err(Rejected::NotEligible));
	///
	/// list.next();
	/// assert_eq!(list.set(&9), Ok(()));
	/// assert_eq!(list.set(&8), Err(Rejected::NotEligible));
	/// assert_eq!(format!("{list:?}"), "[9, 2, 3]");
	/// ```
	pub fn set(&mut self, value: &T) -> Result<(), Rejected> {
		let mut node = self.eligible("set")?;

		let new = self.ops.make_owned(value);
		let old = mem::replace(unsafe { &mut node.as_mut().elem }, new);

		self.last = None;
		self.ops.release_owned(old);
		Ok(())
	}

	/// Move the cursor back to the start of the list. `O(1)`.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps};
	/// let mut list: CursorList<_, CloneOps> = [1, 2].into_iter().collect();
	/// while list.next().is_some() {}
	///
	/// list.reset();
	/// assert_eq!(list.index(), 0);
	/// assert_eq!(list.next(), Some(&1));
	/// ```
	#[inline]
	pub fn reset(&mut self) {
		self.before = None;
		self.after  = self.head;
		self.index  = 0;
		self.last   = None;
	}

	/// Get a ref to the element `next` would return, without moving. `O(1)`.
	#[inline]
	pub fn peek_next(&self) -> Option<&T> {
		self.after.map(|n| unsafe { &(*n.as_ptr()).elem })
	}

	/// Get a ref to the element `previous` would return, without moving. `O(1)`.
	#[inline]
	pub fn peek_previous(&self) -> Option<&T> {
		self.before.map(|n| unsafe { &(*n.as_ptr()).elem })
	}

	/// Get the number of elements in the list. `O(1)`.
	#[inline]
	pub const fn len(&self) -> usize {
		self.len
	}

	/// Check if the list is empty. `O(1)`.
	#[inline]
	pub const fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Number of elements in front of the cursor. `O(1)`.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps};
	/// let mut list: CursorList<_, CloneOps> = [1, 2, 3].into_iter().collect();
	/// list.next();
	/// list.add(&0);
	/// assert_eq!(list.index(), 2);
	/// ```
	#[inline]
	pub const fn index(&self) -> usize {
		self.index
	}

	#[inline]
	pub const fn ops(&self) -> &O {
		&self.ops
	}

	/// Iterate front to back over the elements, leaving the cursor alone. `O(1)`.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps};
	/// let mut list: CursorList<_, CloneOps> = [1, 2, 3].into_iter().collect();
	/// list.next();
	///
	/// assert_eq!(list.iter().rev().collect::<Vec<_>>(), [&3, &2, &1]);
	/// assert_eq!(list.next(), Some(&2));
	/// ```
	#[inline]
	pub fn iter(&self) -> Iter<'_, T> {
		Iter {
			front: self.head,
			back:  self.tail,
			len:   self.len,
			_list: PhantomData,
		}
	}
}

impl<T, O: ElemOps<T> + Default> Default for CursorList<T, O> {
	#[inline]
	fn default() -> Self {
		Self::new(O::default())
	}
}

impl<T: Debug, O: ElemOps<T>> Debug for CursorList<T, O> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

impl<T, O: ElemOps<T>> Drop for CursorList<T, O> {
	/// Release every value and free every node. `O(n)`.
	fn drop(&mut self) {
		let mut cur = self.head.take();

		while let Some(node) = cur {
			let Node { next, elem, .. } = *unsafe { Box::from_raw(node.as_ptr()) };
			self.ops.release_owned(elem);
			cur = next;
		}
	}
}

impl<T, O: ElemOps<T>> Extend<T> for CursorList<T, O> {
	/// Append already owned values at the tail, then reset the cursor. `O(n)`.
	/// ```
	/// # use cursorlist::{CursorList, CloneOps};
	/// let mut list = CursorList::new(CloneOps);
	/// list.add(&1);
	/// list.extend([2, 3]);
	///
	/// assert_eq!(format!("{list:?}"), "[1, 2, 3]");
	/// assert_eq!(list.index(), 0);
	/// ```
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		self.before = self.tail;
		self.after  = None;
		self.index  = self.len;

		iter.into_iter().for_each(|elem| self.link(elem));
		self.reset();
	}
}

impl<T, O: ElemOps<T> + Default> FromIterator<T> for CursorList<T, O> {
	/// Create a new list from an iterator. `O(n)`.
	/// Cursor is set to the front of the list.
	#[inline]
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut list = Self::default();
		list.extend(iter);
		list
	}
}


/*
* =====================
* ===== Iter bits =====
* =====================
*/

/// Borrowing iterator over a [`CursorList`], see [`CursorList::iter`].
pub struct Iter<'i, T> {
	front: Link<T>,
	back:  Link<T>,
	len:   usize,
	_list: PhantomData<&'i T>,
}

impl<'i, T> Iterator for Iter<'i, T> {
	type Item = &'i T;

	#[inline]
	fn next(&mut self) -> Option<Self::Item> {
		if self.len == 0 { return None; }

		self.front.map(|n| unsafe {
			self.len  -= 1;
			self.front = n.as_ref().next;
			&(*n.as_ptr()).elem
		})
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>)
		{ (self.len, Some(self.len)) }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
	#[inline]
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.len == 0 { return None; }

		self.back.map(|n| unsafe {
			self.len -= 1;
			self.back = n.as_ref().prev;
			&(*n.as_ptr()).elem
		})
	}
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
	#[inline]
	fn clone(&self) -> Self {
		Self { ..*self }
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use crate::ops::CloneOps;

	/// Walk the links both ways and check them against the list's bookkeeping.
	fn check<T, O: ElemOps<T>>(list: &CursorList<T, O>) {
		let mut count = 0;
		let mut prev: Link<T> = None;
		let mut cur = list.head;
		let mut cursor_seen = list.before.is_none() && list.index == 0;

		while let Some(node) = cur {
			let n = unsafe { node.as_ref() };
			assert_eq!(n.prev, prev, "broken back link at {count}");
			count += 1;

			if list.before == Some(node) {
				assert_eq!(list.index, count);
				assert_eq!(n.next, list.after);
				cursor_seen = true;
			}

			prev = cur;
			cur  = n.next;
		}

		assert_eq!(count, list.len);
		assert_eq!(prev, list.tail);
		assert!(cursor_seen || list.len == 0);
		if list.before.is_none() { assert_eq!(list.after, list.head); }
		if list.after.is_none()  { assert_eq!(list.before, list.tail); }
		if let Some(last) = list.last {
			assert!(list.before == Some(last) || list.after == Some(last));
		}
	}

	fn list(values: &[i32]) -> CursorList<i32, CloneOps> {
		let list = values.iter().copied().collect();
		check(&list);
		list
	}

	#[test]
	fn add_covers_every_position() {
		let mut list = CursorList::new(CloneOps);
		list.add(&2);                        // empty
		check(&list);
		list.reset();
		list.add(&0);                        // at head
		check(&list);
		list.add(&1);                        // interior
		check(&list);
		while list.next().is_some() {}
		list.add(&3);                        // at tail
		check(&list);

		assert_eq!(list.iter().copied().collect::<Vec<_>>(), [0, 1, 2, 3]);
		assert_eq!(list.index(), 4);
	}

	#[test]
	fn delete_covers_every_position() {
		// head, after next
		let mut l = list(&[1, 2, 3]);
		l.next();
		l.delete().unwrap();
		check(&l);
		assert_eq!(l.peek_next(), Some(&2));

		// tail, after previous
		l.next();
		l.next();
		l.previous();
		l.delete().unwrap();
		check(&l);
		assert_eq!(l.peek_previous(), Some(&2));
		assert!(l.peek_next().is_none());

		// interior, both directions
		let mut l = list(&[1, 2, 3, 4]);
		l.next();
		l.next();
		l.delete().unwrap();
		check(&l);
		assert_eq!((l.peek_previous(), l.peek_next()), (Some(&1), Some(&3)));
		l.next();
		l.previous();
		l.delete().unwrap();
		check(&l);
		assert_eq!((l.peek_previous(), l.peek_next()), (Some(&1), Some(&4)));

		// only element
		let mut l = list(&[7]);
		l.next();
		l.delete().unwrap();
		check(&l);
		assert!(l.head.is_none() && l.tail.is_none());
	}

	#[test]
	fn finds_keep_the_cursor_consistent() {
		let mut l = list(&[1, 2, 3, 2, 1]);

		assert_eq!(l.find_next(&3), Some(&3));
		check(&l);
		assert_eq!(l.find_previous(&1), Some(&1));
		check(&l);
		assert_eq!(l.index(), 0);

		assert_eq!(l.find_next(&9), None);
		check(&l);
		assert_eq!(l.index(), 5);
		assert_eq!(l.delete(), Err(Rejected::NotEligible));

		assert_eq!(l.find_previous(&9), None);
		check(&l);
		assert_eq!(l.index(), 0);
	}

	#[test]
	fn finds_on_empty_list() {
		let mut l = list(&[]);
		assert_eq!(l.find_next(&1), None);
		assert_eq!(l.find_previous(&1), None);
		check(&l);
	}

	#[test]
	fn failed_move_keeps_eligibility() {
		let mut l = list(&[1]);
		l.next();
		assert_eq!(l.next(), None);
		assert_eq!(l.delete(), Ok(()));
		check(&l);
		assert!(l.is_empty());
	}

	#[test]
	fn empty_list_rejects() {
		let mut l = list(&[]);
		assert_eq!(l.delete(), Err(Rejected::Empty));
		assert_eq!(l.set(&1), Err(Rejected::Empty));
	}

	#[test]
	fn iter_meets_in_the_middle() {
		let l = list(&[1, 2, 3]);
		let mut it = l.iter();
		assert_eq!(it.len(), 3);
		assert_eq!(it.next(), Some(&1));
		assert_eq!(it.next_back(), Some(&3));
		assert_eq!(it.next(), Some(&2));
		assert_eq!(it.next_back(), None);
		assert_eq!(it.next(), None);
	}
}
