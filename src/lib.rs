// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An ordered bidirectional map ("bimap") backed by a pair of splay trees
//! that share one set of pair records.
//!
//! A [`Bimap`] stores `(left, right)` pairs such that each left value and
//! each right value appears at most once, and can be queried from either
//! side in amortized `O(log n)`. Iteration is sorted on both sides, each
//! under its own comparator.
//!
//! Every record is one slot in an arena; the slot carries two link triples,
//! one per tree, so the left-ordered tree and the right-ordered tree are
//! superimposed over the same storage. Positions in the map are denoted by
//! [`LeftCursor`]/[`RightCursor`] tokens that stay valid across rebalancing
//! and can be flipped to the opposite side of the same pair in constant
//! time.
//!
//! Splay trees rebalance on access: lookups rotate the visited node to the
//! root, so the mutating entry points ([`Bimap::find_left`],
//! [`Bimap::at_left`], the bound queries, cursor stepping) take `&mut self`.
//! Side-effect-free lookups are available separately as
//! [`Bimap::get_left`]/[`Bimap::get_right`] and the iterators, which
//! traverse without rotating.
//!
//! The map is single-threaded. Because even lookups reshape the trees,
//! callers that share a map across threads must serialize *all* access
//! behind one exclusive lock; a read-write lock is not sound here.
//!
//! # Examples
//!
//! ```rust
//! use splay_bimap::Bimap;
//!
//! let mut ids = Bimap::new();
//! ids.insert(1, "one");
//! ids.insert(2, "two");
//! ids.insert(3, "three");
//!
//! assert_eq!(ids.at_left(&2), Ok(&"two"));
//! assert_eq!(ids.at_right(&"three"), Ok(&3));
//!
//! // Sorted on either side.
//! let lefts: Vec<i32> = ids.lefts().copied().collect();
//! assert_eq!(lefts, vec![1, 2, 3]);
//! let rights: Vec<&str> = ids.rights().copied().collect();
//! assert_eq!(rights, vec!["one", "three", "two"]);
//!
//! assert_eq!(ids.remove_left(&2), Some((2, "two")));
//! assert_eq!(ids.len(), 2);
//! assert!(ids.get_left(&2).is_none());
//! ```

use thiserror::Error;

mod iter;
mod map;
mod node;
mod tree;

pub use iter::{IntoIter, IterLeft, IterRight, LeftCursor, Lefts, RightCursor, Rights};
pub use map::Bimap;

/// Error returned by [`Bimap::at_left`] and [`Bimap::at_right`] when the
/// queried key has no pairing. The map is left unmodified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("key has no pairing in the bimap")]
pub struct NotFound;
