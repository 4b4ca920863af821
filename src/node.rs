// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pair records and the slot arena they live in.
//!
//! Every pair occupies one slot of a `Vec<Slot<L, R>>`. A slot holds the two
//! values plus two link triples, one per tree, so a single allocation serves
//! as a node of both the left-ordered and the right-ordered tree. Trees refer
//! to slots by index; freed slots are chained into a free list and their
//! generation counter is bumped so that cursors into dead pairs can be told
//! apart from cursors into whatever occupies the slot next.

/// Index of a slot in the arena.
pub(crate) type Ix = u32;

/// Which of the two orderings a tree, face, or cursor belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// One stored association.
#[derive(Clone, Debug)]
pub(crate) struct Pair<L, R> {
    pub(crate) left: L,
    pub(crate) right: R,
}

/// One face's structural links: the slot's position in one of the two trees.
#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct Links {
    pub(crate) parent: Option<Ix>,
    pub(crate) left: Option<Ix>,
    pub(crate) right: Option<Ix>,
}

/// An occupied slot: the pair plus its two faces.
#[derive(Clone, Debug)]
pub(crate) struct Record<L, R> {
    pub(crate) pair: Pair<L, R>,
    pub(crate) faces: [Links; 2],
}

/// A token naming one live pair: slot index plus the generation the slot had
/// when the token was issued. A mismatch means the pair has since been erased.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Handle {
    pub(crate) ix: Ix,
    pub(crate) generation: u32,
}

#[derive(Clone, Debug)]
pub(crate) enum SlotState<L, R> {
    Occupied(Record<L, R>),
    Vacant { next_free: Option<Ix> },
}

#[derive(Clone, Debug)]
pub(crate) struct Slot<L, R> {
    pub(crate) generation: u32,
    pub(crate) state: SlotState<L, R>,
}

impl<L, R> Slot<L, R> {
    #[inline]
    pub(crate) fn record(&self) -> &Record<L, R> {
        match &self.state {
            SlotState::Occupied(record) => record,
            SlotState::Vacant { .. } => unreachable!("tree links into a vacant slot"),
        }
    }

    #[inline]
    pub(crate) fn record_mut(&mut self) -> &mut Record<L, R> {
        match &mut self.state {
            SlotState::Occupied(record) => record,
            SlotState::Vacant { .. } => unreachable!("tree links into a vacant slot"),
        }
    }

    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self.state, SlotState::Occupied(_))
    }
}

impl<L, R> Record<L, R> {
    pub(crate) fn new(left: L, right: R) -> Record<L, R> {
        Record {
            pair: Pair { left, right },
            faces: [Links::default(), Links::default()],
        }
    }

    #[inline]
    pub(crate) fn links(&self, side: Side) -> &Links {
        &self.faces[side.index()]
    }

    #[inline]
    pub(crate) fn links_mut(&mut self, side: Side) -> &mut Links {
        &mut self.faces[side.index()]
    }
}
