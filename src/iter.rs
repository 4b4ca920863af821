// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Cursors and iterators over a [`Bimap`](crate::Bimap).
//!
//! A cursor is a small `Copy` token naming one pair of the map on one side,
//! or the end sentinel. It holds a slot index plus the generation the slot
//! had when the cursor was issued, so a cursor whose pair has been erased is
//! recognized instead of silently denoting whatever reused the slot.
//! Cursors are dereferenced and stepped through the map
//! ([`Bimap::left`](crate::Bimap::left), [`Bimap::next_left`](crate::Bimap::next_left), ...);
//! equality is pair identity and survives splaying.
//!
//! The iterators traverse by parent walk without splaying, so they borrow
//! the map shared and leave the tree shape alone.

use std::iter;
use std::mem;
use std::vec;

use crate::node::{Handle, Ix, Side, Slot, SlotState};
use crate::tree;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct RawCursor(pub(crate) Option<Handle>);

impl RawCursor {
    pub(crate) const END: RawCursor = RawCursor(None);
}

/// A position on the left side of a [`Bimap`](crate::Bimap): one pair, or
/// the one-past-the-maximum end sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LeftCursor(pub(crate) RawCursor);

/// A position on the right side of a [`Bimap`](crate::Bimap).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RightCursor(pub(crate) RawCursor);

impl LeftCursor {
    /// The end sentinel: one past the greatest left value.
    pub fn end() -> LeftCursor {
        LeftCursor(RawCursor::END)
    }

    pub fn is_end(self) -> bool {
        self.0 .0.is_none()
    }

    /// The right-side cursor of the same pair. Constant time; no search or
    /// rotation. The end cursor flips to the end cursor.
    pub fn flip(self) -> RightCursor {
        RightCursor(self.0)
    }
}

impl RightCursor {
    /// The end sentinel: one past the greatest right value.
    pub fn end() -> RightCursor {
        RightCursor(RawCursor::END)
    }

    pub fn is_end(self) -> bool {
        self.0 .0.is_none()
    }

    /// The left-side cursor of the same pair. Constant time.
    pub fn flip(self) -> LeftCursor {
        LeftCursor(self.0)
    }
}

pub(crate) struct RawIter<'a, L, R> {
    pub(crate) slots: &'a [Slot<L, R>],
    pub(crate) side: Side,
    pub(crate) front: Option<Ix>,
    pub(crate) back: Option<Ix>,
    pub(crate) remaining: usize,
}

impl<'a, L, R> RawIter<'a, L, R> {
    fn next_ix(&mut self) -> Option<Ix> {
        let ix = self.front?;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.front = None;
            self.back = None;
        } else {
            self.front = tree::next_in_order(self.slots, self.side, ix);
        }
        Some(ix)
    }

    fn next_back_ix(&mut self) -> Option<Ix> {
        let ix = self.back?;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.front = None;
            self.back = None;
        } else {
            self.back = tree::prev_in_order(self.slots, self.side, ix);
        }
        Some(ix)
    }
}

/// Lazy iterator over the pairs of a map in ascending left order, yielding
/// `(&left, &right)`.
pub struct IterLeft<'a, L: 'a, R: 'a>(pub(crate) RawIter<'a, L, R>);

/// Lazy iterator over the pairs of a map in ascending right order, yielding
/// `(&right, &left)`.
pub struct IterRight<'a, L: 'a, R: 'a>(pub(crate) RawIter<'a, L, R>);

impl<'a, L, R> Iterator for IterLeft<'a, L, R> {
    type Item = (&'a L, &'a R);

    fn next(&mut self) -> Option<(&'a L, &'a R)> {
        self.0.next_ix().map(|ix| {
            let pair = &self.0.slots[ix as usize].record().pair;
            (&pair.left, &pair.right)
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.remaining, Some(self.0.remaining))
    }
}

impl<'a, L, R> DoubleEndedIterator for IterLeft<'a, L, R> {
    fn next_back(&mut self) -> Option<(&'a L, &'a R)> {
        self.0.next_back_ix().map(|ix| {
            let pair = &self.0.slots[ix as usize].record().pair;
            (&pair.left, &pair.right)
        })
    }
}

impl<'a, L, R> ExactSizeIterator for IterLeft<'a, L, R> {}

impl<'a, L, R> Iterator for IterRight<'a, L, R> {
    type Item = (&'a R, &'a L);

    fn next(&mut self) -> Option<(&'a R, &'a L)> {
        self.0.next_ix().map(|ix| {
            let pair = &self.0.slots[ix as usize].record().pair;
            (&pair.right, &pair.left)
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.remaining, Some(self.0.remaining))
    }
}

impl<'a, L, R> DoubleEndedIterator for IterRight<'a, L, R> {
    fn next_back(&mut self) -> Option<(&'a R, &'a L)> {
        self.0.next_back_ix().map(|ix| {
            let pair = &self.0.slots[ix as usize].record().pair;
            (&pair.right, &pair.left)
        })
    }
}

impl<'a, L, R> ExactSizeIterator for IterRight<'a, L, R> {}

/// Iterator over the left values in ascending left order.
pub struct Lefts<'a, L: 'a, R: 'a>(
    pub(crate) iter::Map<IterLeft<'a, L, R>, fn((&'a L, &'a R)) -> &'a L>,
);

/// Iterator over the right values in ascending right order.
pub struct Rights<'a, L: 'a, R: 'a>(
    pub(crate) iter::Map<IterRight<'a, L, R>, fn((&'a R, &'a L)) -> &'a R>,
);

impl<'a, L, R> Iterator for Lefts<'a, L, R> {
    type Item = &'a L;
    #[inline]
    fn next(&mut self) -> Option<&'a L> {
        self.0.next()
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, L, R> DoubleEndedIterator for Lefts<'a, L, R> {
    fn next_back(&mut self) -> Option<&'a L> {
        self.0.next_back()
    }
}

impl<'a, L, R> ExactSizeIterator for Lefts<'a, L, R> {}

impl<'a, L, R> Iterator for Rights<'a, L, R> {
    type Item = &'a R;
    #[inline]
    fn next(&mut self) -> Option<&'a R> {
        self.0.next()
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, L, R> DoubleEndedIterator for Rights<'a, L, R> {
    fn next_back(&mut self) -> Option<&'a R> {
        self.0.next_back()
    }
}

impl<'a, L, R> ExactSizeIterator for Rights<'a, L, R> {}

/// Consuming iterator, draining the pairs in ascending left order.
pub struct IntoIter<L, R> {
    pub(crate) slots: Vec<Slot<L, R>>,
    pub(crate) order: vec::IntoIter<Ix>,
}

impl<L, R> Iterator for IntoIter<L, R> {
    type Item = (L, R);

    fn next(&mut self) -> Option<(L, R)> {
        let ix = self.order.next()?;
        let slot = &mut self.slots[ix as usize];
        let state = mem::replace(&mut slot.state, SlotState::Vacant { next_free: None });
        match state {
            SlotState::Occupied(record) => Some((record.pair.left, record.pair.right)),
            SlotState::Vacant { .. } => unreachable!("drained slot revisited"),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<L, R> ExactSizeIterator for IntoIter<L, R> {}

#[cfg(feature = "ordered_iter")]
impl<'a, L, R> ::ordered_iter::OrderedMapIterator for IterLeft<'a, L, R> {
    type Key = &'a L;
    type Val = &'a R;
}

#[cfg(feature = "ordered_iter")]
impl<'a, L, R> ::ordered_iter::OrderedMapIterator for IterRight<'a, L, R> {
    type Key = &'a R;
    type Val = &'a L;
}
