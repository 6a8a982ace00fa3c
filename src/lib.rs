//! A doubly linked list driven through a list-iterator cursor.
//! The cursor sits *between* elements: `next`/`previous` step over one,
//! `add` inserts right before it, and `delete`/`set` act on whatever the last step returned.
//!
//! Values are owned by the list through an [`ElemOps`] capability set,
//! which copies them in, compares them for `find_next`/`find_previous`, and releases them on the way out.
//!
//! `O(1)` everything at the cursor, `O(n)` searches.
//!
//! ## Example
//!
//! ```rust
//! use cursorlist::{CursorList, CloneOps, Rejected};
//!
//! let mut list = CursorList::new(CloneOps);
//!
//! list.add(&'a');
//! list.add(&'b');
//! list.add(&'c');
//! list.reset();
//!
//! assert_eq!(list.next(), Some(&'a'));
//! assert_eq!(list.next(), Some(&'b'));
//! assert_eq!(list.delete(), Ok(()));
//! assert_eq!(list.delete(), Err(Rejected::NotEligible));
//!
//! list.reset();
//! assert_eq!(list.next(), Some(&'a'));
//! assert_eq!(list.next(), Some(&'c'));
//! assert_eq!(list.next(), None);
//!
//! assert_eq!(list.find_previous(&'a'), Some(&'a'));
//! assert_eq!(list.set(&'z'), Ok(()));
//! assert_eq!(format!("{list:?}"), "['z', 'c']");
//! ```

#![deny(clippy::all)]
#![allow(clippy::should_implement_trait)]

mod error;
mod list;
mod ops;

pub use error::Rejected;
pub use list::{CursorList, Iter};
pub use ops::{CloneOps, ElemOps, FnOps};
