// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::mem;

use compare::{natural, Compare, Natural};

use crate::iter::{
    IntoIter, IterLeft, IterRight, LeftCursor, Lefts, RawCursor, RawIter, RightCursor, Rights,
};
use crate::node::{Handle, Ix, Pair, Record, Side, Slot, SlotState};
use crate::tree;
use crate::NotFound;

/// An ordered bidirectional map based on two splay trees superimposed over
/// one set of pair records.
///
/// Each left value and each right value appears in at most one pair. The
/// left-ordered tree is sorted by `CmpL` over the left values and the
/// right-ordered tree by `CmpR` over the right values, so lookup, insertion
/// and removal from either side run in amortized `O(log n)` and iteration is
/// sorted on both sides.
///
/// Splay trees rebalance on access, which is why the searching entry points
/// ([`find_left`][Bimap::find_left], [`at_left`][Bimap::at_left], the bound
/// queries, cursor stepping) take `&mut self`. The non-splaying lookups
/// ([`get_left`][Bimap::get_left], [`contains_left`][Bimap::contains_left])
/// and the iterators take `&self` and leave the tree shape alone, at the
/// price of not moving hot pairs toward the root.
pub struct Bimap<L, R, CmpL: Compare<L> = Natural<L>, CmpR: Compare<R> = Natural<R>> {
    slots: Vec<Slot<L, R>>,
    free_head: Option<Ix>,
    roots: [Option<Ix>; 2],
    length: usize,
    cmp_left: CmpL,
    cmp_right: CmpR,
}

impl<L: Ord, R: Ord> Bimap<L, R> {
    /// Creates an empty map ordered naturally on both sides.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::Bimap;
    ///
    /// let mut map = Bimap::new();
    /// map.insert(1, "one");
    /// assert_eq!(map.at_left(&1), Ok(&"one"));
    /// ```
    pub fn new() -> Bimap<L, R> {
        Bimap::with_comparators(natural(), natural())
    }
}

impl<L, R, CmpL, CmpR> Bimap<L, R, CmpL, CmpR>
where
    CmpL: Compare<L>,
    CmpR: Compare<R>,
{
    /// Creates an empty map ordered by `cmp_left` on the left side and
    /// `cmp_right` on the right side.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::Bimap;
    /// use compare::{natural, Compare};
    ///
    /// let mut map = Bimap::with_comparators(natural().rev(), natural());
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// map.insert(3, "c");
    ///
    /// let lefts: Vec<i32> = map.lefts().copied().collect();
    /// assert_eq!(lefts, vec![3, 2, 1]);
    /// let rights: Vec<&str> = map.rights().copied().collect();
    /// assert_eq!(rights, vec!["a", "b", "c"]);
    /// ```
    pub fn with_comparators(cmp_left: CmpL, cmp_right: CmpR) -> Bimap<L, R, CmpL, CmpR> {
        Bimap {
            slots: vec![],
            free_head: None,
            roots: [None, None],
            length: 0,
            cmp_left,
            cmp_right,
        }
    }

    /// Returns the comparators ordering the two sides.
    pub fn comparators(&self) -> (&CmpL, &CmpR) {
        (&self.cmp_left, &self.cmp_right)
    }

    /// Returns the number of pairs in the map.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no pairs.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Removes all pairs from the map.
    ///
    /// Every cursor issued before the call becomes stale and will be refused
    /// by the cursor-taking operations, even if its slot is later reused.
    pub fn clear(&mut self) {
        self.roots = [None, None];
        self.length = 0;
        self.free_head = None;
        for i in (0..self.slots.len()).rev() {
            let next_free = self.free_head;
            let slot = &mut self.slots[i];
            if slot.is_occupied() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            slot.state = SlotState::Vacant { next_free };
            self.free_head = Some(i as Ix);
        }
    }

    // Arena plumbing.

    fn alloc(&mut self, left: L, right: R) -> Ix {
        let record = Record::new(left, right);
        match self.free_head {
            Some(ix) => {
                let slot = &mut self.slots[ix as usize];
                self.free_head = match slot.state {
                    SlotState::Vacant { next_free } => next_free,
                    SlotState::Occupied(_) => unreachable!("occupied slot on the free list"),
                };
                slot.state = SlotState::Occupied(record);
                ix
            }
            None => {
                assert!(
                    self.slots.len() < Ix::MAX as usize,
                    "splay-bimap: slot index space exhausted"
                );
                self.slots.push(Slot {
                    generation: 0,
                    state: SlotState::Occupied(record),
                });
                (self.slots.len() - 1) as Ix
            }
        }
    }

    fn free(&mut self, ix: Ix) -> Pair<L, R> {
        let next_free = self.free_head;
        let slot = &mut self.slots[ix as usize];
        slot.generation = slot.generation.wrapping_add(1);
        let state = mem::replace(&mut slot.state, SlotState::Vacant { next_free });
        self.free_head = Some(ix);
        match state {
            SlotState::Occupied(record) => record.pair,
            SlotState::Vacant { .. } => unreachable!("freeing a vacant slot"),
        }
    }

    fn handle(&self, ix: Ix) -> Handle {
        Handle {
            ix,
            generation: self.slots[ix as usize].generation,
        }
    }

    fn pair(&self, ix: Ix) -> &Pair<L, R> {
        &self.slots[ix as usize].record().pair
    }

    /// Checks a cursor token against the arena: `None` for the end sentinel
    /// and for tokens whose pair has since been erased.
    fn resolve_live(&self, raw: RawCursor) -> Option<Ix> {
        let handle = raw.0?;
        let slot = self.slots.get(handle.ix as usize)?;
        (slot.is_occupied() && slot.generation == handle.generation).then_some(handle.ix)
    }

    fn resolve(&self, raw: RawCursor, op: &str) -> Ix {
        match self.resolve_live(raw) {
            Some(ix) => ix,
            None => panic!("Bimap::{op}: cursor is the end sentinel or its pair was erased"),
        }
    }

    // Comparator-driven descent. Returns the last node visited and how the
    // sought key compared against it, or `None` on an empty side.

    fn locate<F>(&self, side: Side, mut ord: F) -> Option<(Ix, Ordering)>
    where
        F: FnMut(&Pair<L, R>) -> Ordering,
    {
        let mut cur = self.roots[side.index()]?;
        loop {
            let decision = ord(self.pair(cur));
            let next = match decision {
                Ordering::Less => tree::links(&self.slots, side, cur).left,
                Ordering::Greater => tree::links(&self.slots, side, cur).right,
                Ordering::Equal => None,
            };
            match next {
                Some(n) => cur = n,
                None => return Some((cur, decision)),
            }
        }
    }

    fn locate_left<Q: ?Sized>(&self, key: &Q) -> Option<(Ix, Ordering)>
    where
        CmpL: Compare<Q, L>,
    {
        let cmp = &self.cmp_left;
        self.locate(Side::Left, |pair| cmp.compare(key, &pair.left))
    }

    fn locate_right<Q: ?Sized>(&self, key: &Q) -> Option<(Ix, Ordering)>
    where
        CmpR: Compare<Q, R>,
    {
        let cmp = &self.cmp_right;
        self.locate(Side::Right, |pair| cmp.compare(key, &pair.right))
    }

    fn splay_to_root(&mut self, side: Side, ix: Ix) {
        tree::splay(&mut self.slots, side, ix);
        self.roots[side.index()] = Some(ix);
    }

    /// Splays the last node a search visited and turns the outcome into a
    /// cursor: the node itself on a hit, end on a miss.
    fn seek(&mut self, side: Side, located: Option<(Ix, Ordering)>) -> RawCursor {
        match located {
            None => RawCursor::END,
            Some((near, decision)) => {
                self.splay_to_root(side, near);
                if decision == Ordering::Equal {
                    RawCursor(Some(self.handle(near)))
                } else {
                    RawCursor::END
                }
            }
        }
    }

    /// In-order successor of the current root, splayed to the root in turn.
    fn splayed_successor(&mut self, side: Side, ix: Ix) -> Option<Ix> {
        let r = tree::links(&self.slots, side, ix).right?;
        let m = tree::subtree_min(&self.slots, side, r);
        self.splay_to_root(side, m);
        Some(m)
    }

    fn splayed_predecessor(&mut self, side: Side, ix: Ix) -> Option<Ix> {
        let l = tree::links(&self.slots, side, ix).left?;
        let m = tree::subtree_max(&self.slots, side, l);
        self.splay_to_root(side, m);
        Some(m)
    }

    /// Hangs the freshly allocated `ix` into one side's tree: descends to the
    /// nearest existing node, splays it up, and splits the tree around it.
    fn attach(&mut self, side: Side, ix: Ix) {
        let located = {
            let pair = self.pair(ix);
            match side {
                Side::Left => {
                    let cmp = &self.cmp_left;
                    let key = &pair.left;
                    self.locate(side, |probe| cmp.compare(key, &probe.left))
                }
                Side::Right => {
                    let cmp = &self.cmp_right;
                    let key = &pair.right;
                    self.locate(side, |probe| cmp.compare(key, &probe.right))
                }
            }
        };
        match located {
            None => self.roots[side.index()] = Some(ix),
            Some((near, decision)) => {
                debug_assert!(decision != Ordering::Equal);
                self.splay_to_root(side, near);
                tree::attach_root(&mut self.slots, side, ix, near, decision == Ordering::Less);
                self.roots[side.index()] = Some(ix);
            }
        }
    }

    /// Detaches `ix` from both trees and frees its slot, returning the pair.
    fn unlink(&mut self, ix: Ix) -> Pair<L, R> {
        self.roots[Side::Left.index()] = tree::remove(&mut self.slots, Side::Left, ix);
        self.roots[Side::Right.index()] = tree::remove(&mut self.slots, Side::Right, ix);
        self.length -= 1;
        self.free(ix)
    }

    /// Inserts the pair `(left, right)` and returns a cursor to it.
    ///
    /// If `left` already has a pairing, or `right` does, the map is left
    /// unchanged and the end cursor is returned; a pair is only ever inserted
    /// whole. The probes for both checks splay, so a refused insert still
    /// moves the conflicting pair toward the root.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::Bimap;
    ///
    /// let mut map = Bimap::new();
    /// assert!(!map.insert(1, "one").is_end());
    /// assert!(map.insert(1, "uno").is_end());   // left taken
    /// assert!(map.insert(2, "one").is_end());   // right taken
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, left: L, right: R) -> LeftCursor {
        if !self.find_left(&left).is_end() || !self.find_right(&right).is_end() {
            return LeftCursor::end();
        }
        let ix = self.alloc(left, right);
        self.attach(Side::Left, ix);
        self.attach(Side::Right, ix);
        self.length += 1;
        LeftCursor(RawCursor(Some(self.handle(ix))))
    }

    /// Removes the pair whose left value equals `key`, returning it, or
    /// `None` if there is none. A miss still splays the nearest left value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::Bimap;
    ///
    /// let mut map = Bimap::new();
    /// map.insert(1, "one");
    /// assert_eq!(map.remove_left(&1), Some((1, "one")));
    /// assert_eq!(map.remove_left(&1), None);
    /// ```
    pub fn remove_left<Q: ?Sized>(&mut self, key: &Q) -> Option<(L, R)>
    where
        CmpL: Compare<Q, L>,
    {
        let found = self.find_left(key);
        let ix = self.resolve_live(found.0)?;
        let pair = self.unlink(ix);
        Some((pair.left, pair.right))
    }

    /// Removes the pair whose right value equals `key`, returning it, or
    /// `None` if there is none.
    pub fn remove_right<Q: ?Sized>(&mut self, key: &Q) -> Option<(L, R)>
    where
        CmpR: Compare<Q, R>,
    {
        let found = self.find_right(key);
        let ix = self.resolve_live(found.0)?;
        let pair = self.unlink(ix);
        Some((pair.left, pair.right))
    }

    fn remove_at(&mut self, side: Side, raw: RawCursor, op: &str) -> RawCursor {
        let ix = self.resolve(raw, op);
        self.splay_to_root(side, ix);
        let succ = tree::links(&self.slots, side, ix)
            .right
            .map(|r| tree::subtree_min(&self.slots, side, r))
            .map(|s| self.handle(s));
        self.unlink(ix);
        RawCursor(succ)
    }

    /// Removes the pair `at` denotes and returns the cursor to its in-order
    /// successor on the left side (the end cursor if it was the greatest).
    ///
    /// # Panics
    ///
    /// Panics if `at` is the end cursor or stale.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::Bimap;
    ///
    /// let mut map = Bimap::new();
    /// map.insert(1, "x");
    /// map.insert(2, "y");
    /// map.insert(3, "z");
    ///
    /// let at = map.find_left(&2);
    /// let next = map.remove_left_at(at);
    /// assert_eq!(map.left(next), &3);
    /// ```
    pub fn remove_left_at(&mut self, at: LeftCursor) -> LeftCursor {
        LeftCursor(self.remove_at(Side::Left, at.0, "remove_left_at"))
    }

    /// Removes the pair `at` denotes and returns the cursor to its in-order
    /// successor on the right side.
    ///
    /// # Panics
    ///
    /// Panics if `at` is the end cursor or stale.
    pub fn remove_right_at(&mut self, at: RightCursor) -> RightCursor {
        RightCursor(self.remove_at(Side::Right, at.0, "remove_right_at"))
    }

    /// Removes every pair in the left-order range `[first, last)` and
    /// returns `last`.
    ///
    /// # Panics
    ///
    /// Panics if a cursor in the range is stale, or if `last` does not follow
    /// `first` (removal then runs off the end and hits the end sentinel).
    pub fn remove_left_range(&mut self, mut first: LeftCursor, last: LeftCursor) -> LeftCursor {
        while first != last {
            first = self.remove_left_at(first);
        }
        last
    }

    /// Removes every pair in the right-order range `[first, last)` and
    /// returns `last`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`remove_left_range`][Bimap::remove_left_range].
    pub fn remove_right_range(&mut self, mut first: RightCursor, last: RightCursor) -> RightCursor {
        while first != last {
            first = self.remove_right_at(first);
        }
        last
    }

    /// Searches the left side for `key` and returns a cursor to its pair,
    /// or the end cursor if absent. Splays the last node visited either way.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::Bimap;
    ///
    /// let mut map = Bimap::new();
    /// map.insert(2, "two");
    ///
    /// let at = map.find_left(&2);
    /// assert_eq!(map.left(at), &2);
    /// assert_eq!(map.right(at.flip()), &"two");
    /// assert!(map.find_left(&7).is_end());
    /// ```
    pub fn find_left<Q: ?Sized>(&mut self, key: &Q) -> LeftCursor
    where
        CmpL: Compare<Q, L>,
    {
        let located = self.locate_left(key);
        LeftCursor(self.seek(Side::Left, located))
    }

    /// Searches the right side for `key` and returns a cursor to its pair,
    /// or the end cursor if absent.
    pub fn find_right<Q: ?Sized>(&mut self, key: &Q) -> RightCursor
    where
        CmpR: Compare<Q, R>,
    {
        let located = self.locate_right(key);
        RightCursor(self.seek(Side::Right, located))
    }

    /// Returns the right value paired with `key` without splaying.
    ///
    /// This borrows the map shared and leaves the tree shape alone, so it
    /// does not benefit from rebalancing; prefer
    /// [`find_left`][Bimap::find_left] or [`at_left`][Bimap::at_left] on hot
    /// paths.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::Bimap;
    ///
    /// let mut map = Bimap::new();
    /// map.insert(1, "one");
    /// assert_eq!(map.get_left(&1), Some(&"one"));
    /// assert_eq!(map.get_left(&2), None);
    /// ```
    pub fn get_left<Q: ?Sized>(&self, key: &Q) -> Option<&R>
    where
        CmpL: Compare<Q, L>,
    {
        match self.locate_left(key) {
            Some((ix, Ordering::Equal)) => Some(&self.pair(ix).right),
            _ => None,
        }
    }

    /// Returns the left value paired with `key` without splaying.
    pub fn get_right<Q: ?Sized>(&self, key: &Q) -> Option<&L>
    where
        CmpR: Compare<Q, R>,
    {
        match self.locate_right(key) {
            Some((ix, Ordering::Equal)) => Some(&self.pair(ix).left),
            _ => None,
        }
    }

    /// Returns `true` if some pair has `key` as its left value. Does not
    /// splay.
    pub fn contains_left<Q: ?Sized>(&self, key: &Q) -> bool
    where
        CmpL: Compare<Q, L>,
    {
        self.get_left(key).is_some()
    }

    /// Returns `true` if some pair has `key` as its right value. Does not
    /// splay.
    pub fn contains_right<Q: ?Sized>(&self, key: &Q) -> bool
    where
        CmpR: Compare<Q, R>,
    {
        self.get_right(key).is_some()
    }

    /// Returns the right value paired with `key`, or [`NotFound`] if `key`
    /// has no pairing. A miss does not modify the map beyond the splay.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::{Bimap, NotFound};
    ///
    /// let mut map = Bimap::new();
    /// map.insert(1, "one");
    /// assert_eq!(map.at_left(&1), Ok(&"one"));
    /// assert_eq!(map.at_left(&9), Err(NotFound));
    /// ```
    pub fn at_left<Q: ?Sized>(&mut self, key: &Q) -> Result<&R, NotFound>
    where
        CmpL: Compare<Q, L>,
    {
        let found = self.find_left(key);
        match self.resolve_live(found.0) {
            Some(ix) => Ok(&self.pair(ix).right),
            None => Err(NotFound),
        }
    }

    /// Returns the left value paired with `key`, or [`NotFound`].
    pub fn at_right<Q: ?Sized>(&mut self, key: &Q) -> Result<&L, NotFound>
    where
        CmpR: Compare<Q, R>,
    {
        let found = self.find_right(key);
        match self.resolve_live(found.0) {
            Some(ix) => Ok(&self.pair(ix).left),
            None => Err(NotFound),
        }
    }

    /// Returns the right value paired with `key`, inserting the pair
    /// `(key, R::default())` first if `key` has no pairing.
    ///
    /// Right values are unique, so if the default right value is already
    /// paired with some other left value, that pair is evicted to make room.
    /// At most one pair ever holds the default right value; it acts as a
    /// reusable scratch slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::Bimap;
    ///
    /// let mut map: Bimap<i32, String> = Bimap::new();
    /// map.insert(1, "a".to_string());
    ///
    /// assert_eq!(map.at_left_or_default(2), "");
    /// // 3 takes over the default slot; the pair (2, "") is evicted.
    /// assert_eq!(map.at_left_or_default(3), "");
    /// assert!(!map.contains_left(&2));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn at_left_or_default(&mut self, key: L) -> &R
    where
        R: Default,
    {
        let found = self.find_left(&key);
        let ix = match self.resolve_live(found.0) {
            Some(ix) => ix,
            None => {
                let default = R::default();
                let clash = self.find_right(&default);
                if let Some(evict) = self.resolve_live(clash.0) {
                    self.unlink(evict);
                }
                let inserted = self.insert(key, default);
                self.resolve(inserted.0, "at_left_or_default")
            }
        };
        &self.pair(ix).right
    }

    /// Returns the left value paired with `key`, inserting the pair
    /// `(L::default(), key)` first if `key` has no pairing. The mirror of
    /// [`at_left_or_default`][Bimap::at_left_or_default]: an existing pair
    /// holding the default left value is evicted.
    pub fn at_right_or_default(&mut self, key: R) -> &L
    where
        L: Default,
    {
        let found = self.find_right(&key);
        let ix = match self.resolve_live(found.0) {
            Some(ix) => ix,
            None => {
                let default = L::default();
                let clash = self.find_left(&default);
                if let Some(evict) = self.resolve_live(clash.0) {
                    self.unlink(evict);
                }
                let inserted = self.insert(default, key);
                self.resolve(inserted.0, "at_right_or_default")
            }
        };
        &self.pair(ix).left
    }

    // `decision` is how the sought key compared against the nearest node:
    // `Less` means the node already exceeds the key.
    fn bound(&mut self, side: Side, located: Option<(Ix, Ordering)>, strict: bool) -> RawCursor {
        let (near, decision) = match located {
            None => return RawCursor::END,
            Some(t) => t,
        };
        self.splay_to_root(side, near);
        let hit = match decision {
            Ordering::Less => Some(near),
            Ordering::Equal if !strict => Some(near),
            _ => self.splayed_successor(side, near),
        };
        RawCursor(hit.map(|ix| self.handle(ix)))
    }

    /// Returns a cursor to the first pair whose left value is not less than
    /// `key`, or the end cursor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::Bimap;
    ///
    /// let mut map = Bimap::new();
    /// map.insert(10, "a");
    /// map.insert(20, "b");
    /// map.insert(30, "c");
    ///
    /// let at = map.lower_bound_left(&15);
    /// assert_eq!(map.left(at), &20);
    /// let at = map.upper_bound_left(&20);
    /// assert_eq!(map.left(at), &30);
    /// assert!(map.lower_bound_left(&35).is_end());
    /// ```
    pub fn lower_bound_left<Q: ?Sized>(&mut self, key: &Q) -> LeftCursor
    where
        CmpL: Compare<Q, L>,
    {
        let located = self.locate_left(key);
        LeftCursor(self.bound(Side::Left, located, false))
    }

    /// Returns a cursor to the first pair whose left value is greater than
    /// `key`, or the end cursor.
    pub fn upper_bound_left<Q: ?Sized>(&mut self, key: &Q) -> LeftCursor
    where
        CmpL: Compare<Q, L>,
    {
        let located = self.locate_left(key);
        LeftCursor(self.bound(Side::Left, located, true))
    }

    /// Returns a cursor to the first pair whose right value is not less than
    /// `key`, or the end cursor.
    pub fn lower_bound_right<Q: ?Sized>(&mut self, key: &Q) -> RightCursor
    where
        CmpR: Compare<Q, R>,
    {
        let located = self.locate_right(key);
        RightCursor(self.bound(Side::Right, located, false))
    }

    /// Returns a cursor to the first pair whose right value is greater than
    /// `key`, or the end cursor.
    pub fn upper_bound_right<Q: ?Sized>(&mut self, key: &Q) -> RightCursor
    where
        CmpR: Compare<Q, R>,
    {
        let located = self.locate_right(key);
        RightCursor(self.bound(Side::Right, located, true))
    }

    fn edge(&self, side: Side, last: bool) -> RawCursor {
        match self.roots[side.index()] {
            None => RawCursor::END,
            Some(root) => {
                let ix = if last {
                    tree::subtree_max(&self.slots, side, root)
                } else {
                    tree::subtree_min(&self.slots, side, root)
                };
                RawCursor(Some(self.handle(ix)))
            }
        }
    }

    /// Cursor to the pair with the least left value, or the end cursor on an
    /// empty map. Does not splay.
    pub fn first_left(&self) -> LeftCursor {
        LeftCursor(self.edge(Side::Left, false))
    }

    /// Cursor to the pair with the greatest left value, or the end cursor.
    pub fn last_left(&self) -> LeftCursor {
        LeftCursor(self.edge(Side::Left, true))
    }

    /// Cursor to the pair with the least right value, or the end cursor.
    pub fn first_right(&self) -> RightCursor {
        RightCursor(self.edge(Side::Right, false))
    }

    /// Cursor to the pair with the greatest right value, or the end cursor.
    pub fn last_right(&self) -> RightCursor {
        RightCursor(self.edge(Side::Right, true))
    }

    /// Steps `at` to the next pair in left order, splaying it up; the end
    /// cursor follows the greatest pair.
    ///
    /// # Panics
    ///
    /// Panics if `at` is the end cursor or stale.
    pub fn next_left(&mut self, at: LeftCursor) -> LeftCursor {
        let ix = self.resolve(at.0, "next_left");
        self.splay_to_root(Side::Left, ix);
        let succ = self.splayed_successor(Side::Left, ix);
        LeftCursor(RawCursor(succ.map(|s| self.handle(s))))
    }

    /// Steps `at` to the previous pair in left order.
    ///
    /// # Panics
    ///
    /// Panics if `at` is the end cursor or stale, or if it denotes the pair
    /// with the least left value.
    pub fn prev_left(&mut self, at: LeftCursor) -> LeftCursor {
        let ix = self.resolve(at.0, "prev_left");
        self.splay_to_root(Side::Left, ix);
        match self.splayed_predecessor(Side::Left, ix) {
            Some(p) => LeftCursor(RawCursor(Some(self.handle(p)))),
            None => panic!("Bimap::prev_left: no pair before the first"),
        }
    }

    /// Steps `at` to the next pair in right order.
    ///
    /// # Panics
    ///
    /// Panics if `at` is the end cursor or stale.
    pub fn next_right(&mut self, at: RightCursor) -> RightCursor {
        let ix = self.resolve(at.0, "next_right");
        self.splay_to_root(Side::Right, ix);
        let succ = self.splayed_successor(Side::Right, ix);
        RightCursor(RawCursor(succ.map(|s| self.handle(s))))
    }

    /// Steps `at` to the previous pair in right order.
    ///
    /// # Panics
    ///
    /// Panics if `at` is the end cursor or stale, or if it denotes the pair
    /// with the least right value.
    pub fn prev_right(&mut self, at: RightCursor) -> RightCursor {
        let ix = self.resolve(at.0, "prev_right");
        self.splay_to_root(Side::Right, ix);
        match self.splayed_predecessor(Side::Right, ix) {
            Some(p) => RightCursor(RawCursor(Some(self.handle(p)))),
            None => panic!("Bimap::prev_right: no pair before the first"),
        }
    }

    /// The left value of the pair `at` denotes. The right value of the same
    /// pair is `self.right(at.flip())`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is the end cursor or stale.
    pub fn left(&self, at: LeftCursor) -> &L {
        let ix = self.resolve(at.0, "left");
        &self.pair(ix).left
    }

    /// The right value of the pair `at` denotes.
    ///
    /// # Panics
    ///
    /// Panics if `at` is the end cursor or stale.
    pub fn right(&self, at: RightCursor) -> &R {
        let ix = self.resolve(at.0, "right");
        &self.pair(ix).right
    }

    fn raw_iter(&self, side: Side) -> RawIter<'_, L, R> {
        let root = self.roots[side.index()];
        RawIter {
            slots: &self.slots,
            side,
            front: root.map(|r| tree::subtree_min(&self.slots, side, r)),
            back: root.map(|r| tree::subtree_max(&self.slots, side, r)),
            remaining: self.length,
        }
    }

    /// Iterates the pairs as `(&left, &right)` in ascending left order.
    /// Does not splay.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::Bimap;
    ///
    /// let mut map = Bimap::new();
    /// map.insert(2, "b");
    /// map.insert(1, "c");
    /// map.insert(3, "a");
    ///
    /// let pairs: Vec<(i32, &str)> = map.iter_left().map(|(l, r)| (*l, *r)).collect();
    /// assert_eq!(pairs, vec![(1, "c"), (2, "b"), (3, "a")]);
    /// ```
    pub fn iter_left(&self) -> IterLeft<'_, L, R> {
        IterLeft(self.raw_iter(Side::Left))
    }

    /// Iterates the pairs as `(&right, &left)` in ascending right order.
    /// Does not splay.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splay_bimap::Bimap;
    ///
    /// let mut map = Bimap::new();
    /// map.insert(2, "b");
    /// map.insert(1, "c");
    /// map.insert(3, "a");
    ///
    /// let pairs: Vec<(&str, i32)> = map.iter_right().map(|(r, l)| (*r, *l)).collect();
    /// assert_eq!(pairs, vec![("a", 3), ("b", 2), ("c", 1)]);
    /// ```
    pub fn iter_right(&self) -> IterRight<'_, L, R> {
        IterRight(self.raw_iter(Side::Right))
    }

    /// Iterates the left values in ascending left order.
    pub fn lefts<'a>(&'a self) -> Lefts<'a, L, R> {
        fn first<A, B>((a, _): (A, B)) -> A {
            a
        }
        let first: fn((&'a L, &'a R)) -> &'a L = first;
        Lefts(self.iter_left().map(first))
    }

    /// Iterates the right values in ascending right order.
    pub fn rights<'a>(&'a self) -> Rights<'a, L, R> {
        fn first<A, B>((a, _): (A, B)) -> A {
            a
        }
        let first: fn((&'a R, &'a L)) -> &'a R = first;
        Rights(self.iter_right().map(first))
    }

    /// Checks every structural invariant, panicking on the first violation:
    /// parent/child link coherence, strictly increasing in-order walks that
    /// visit every pair on both sides, occupancy matching `len`, and a free
    /// list covering exactly the vacant slots. Exposed for integration and
    /// property tests; not part of the supported API.
    #[doc(hidden)]
    pub fn assert_valid(&self) {
        let occupied: Vec<Ix> = (0..self.slots.len() as Ix)
            .filter(|&i| self.slots[i as usize].is_occupied())
            .collect();
        assert_eq!(occupied.len(), self.length, "occupancy disagrees with len");

        for side in [Side::Left, Side::Right] {
            let root = self.roots[side.index()];
            if self.length == 0 {
                assert!(root.is_none(), "root set on an empty side");
                continue;
            }
            let root = root.expect("no root on a populated side");
            assert_eq!(
                tree::links(&self.slots, side, root).parent,
                None,
                "root has a parent"
            );
            for &ix in &occupied {
                let links = tree::links(&self.slots, side, ix);
                for child in [links.left, links.right].into_iter().flatten() {
                    assert_eq!(
                        tree::links(&self.slots, side, child).parent,
                        Some(ix),
                        "child does not point back at its parent"
                    );
                }
            }

            let mut seen = 0;
            let mut prev: Option<Ix> = None;
            let mut cur = Some(tree::subtree_min(&self.slots, side, root));
            while let Some(ix) = cur {
                if let Some(p) = prev {
                    let ord = match side {
                        Side::Left => {
                            self.cmp_left.compare(&self.pair(p).left, &self.pair(ix).left)
                        }
                        Side::Right => self
                            .cmp_right
                            .compare(&self.pair(p).right, &self.pair(ix).right),
                    };
                    assert_eq!(ord, Ordering::Less, "in-order walk is not strictly increasing");
                }
                seen += 1;
                prev = Some(ix);
                cur = tree::next_in_order(&self.slots, side, ix);
            }
            assert_eq!(seen, self.length, "in-order walk misses pairs");
        }

        let mut free = 0;
        let mut cur = self.free_head;
        while let Some(ix) = cur {
            let slot = &self.slots[ix as usize];
            cur = match slot.state {
                SlotState::Vacant { next_free } => next_free,
                SlotState::Occupied(_) => panic!("occupied slot on the free list"),
            };
            free += 1;
        }
        assert_eq!(
            free,
            self.slots.len() - occupied.len(),
            "free list does not cover the vacant slots"
        );
    }
}

impl<L, R, CmpL, CmpR> Clone for Bimap<L, R, CmpL, CmpR>
where
    L: Clone,
    R: Clone,
    CmpL: Compare<L> + Clone,
    CmpR: Compare<R> + Clone,
{
    fn clone(&self) -> Bimap<L, R, CmpL, CmpR> {
        Bimap {
            slots: self.slots.clone(),
            free_head: self.free_head,
            roots: self.roots,
            length: self.length,
            cmp_left: self.cmp_left.clone(),
            cmp_right: self.cmp_right.clone(),
        }
    }
}

impl<L, R, CmpL, CmpR> Default for Bimap<L, R, CmpL, CmpR>
where
    CmpL: Compare<L> + Default,
    CmpR: Compare<R> + Default,
{
    fn default() -> Bimap<L, R, CmpL, CmpR> {
        Bimap::with_comparators(Default::default(), Default::default())
    }
}

impl<L: Debug, R: Debug, CmpL, CmpR> Debug for Bimap<L, R, CmpL, CmpR>
where
    CmpL: Compare<L>,
    CmpR: Compare<R>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (l, r)) in self.iter_left().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?} <-> {:?}", l, r)?;
        }
        write!(f, "}}")
    }
}

// Comparison is provided only for naturally ordered maps, where pair-by-pair
// comparison in left order agrees with the ordering the trees maintain.

impl<L: PartialEq + Ord, R: PartialEq + Ord> PartialEq for Bimap<L, R> {
    fn eq(&self, other: &Bimap<L, R>) -> bool {
        self.length == other.length && self.iter_left().eq(other.iter_left())
    }
}

impl<L: Eq + Ord, R: Eq + Ord> Eq for Bimap<L, R> {}

impl<L: PartialOrd + Ord, R: PartialOrd + Ord> PartialOrd for Bimap<L, R> {
    fn partial_cmp(&self, other: &Bimap<L, R>) -> Option<Ordering> {
        self.iter_left().partial_cmp(other.iter_left())
    }
}

impl<L: Ord, R: Ord> Ord for Bimap<L, R> {
    fn cmp(&self, other: &Bimap<L, R>) -> Ordering {
        self.iter_left().cmp(other.iter_left())
    }
}

impl<L: Hash, R: Hash, CmpL, CmpR> Hash for Bimap<L, R, CmpL, CmpR>
where
    CmpL: Compare<L>,
    CmpR: Compare<R>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        for pair in self.iter_left() {
            pair.hash(state);
        }
    }
}

impl<L, R, CmpL, CmpR> FromIterator<(L, R)> for Bimap<L, R, CmpL, CmpR>
where
    CmpL: Compare<L> + Default,
    CmpR: Compare<R> + Default,
{
    /// Collects pairs into a map. Pairs that collide with an already
    /// collected left or right value are dropped; the first occurrence wins.
    fn from_iter<T: IntoIterator<Item = (L, R)>>(it: T) -> Bimap<L, R, CmpL, CmpR> {
        let mut map = Bimap::default();
        map.extend(it);
        map
    }
}

impl<L, R, CmpL, CmpR> Extend<(L, R)> for Bimap<L, R, CmpL, CmpR>
where
    CmpL: Compare<L>,
    CmpR: Compare<R>,
{
    fn extend<T: IntoIterator<Item = (L, R)>>(&mut self, it: T) {
        for (l, r) in it {
            self.insert(l, r);
        }
    }
}

impl<'a, L, R, CmpL, CmpR> IntoIterator for &'a Bimap<L, R, CmpL, CmpR>
where
    CmpL: Compare<L>,
    CmpR: Compare<R>,
{
    type Item = (&'a L, &'a R);
    type IntoIter = IterLeft<'a, L, R>;

    fn into_iter(self) -> IterLeft<'a, L, R> {
        self.iter_left()
    }
}

impl<L, R, CmpL, CmpR> IntoIterator for Bimap<L, R, CmpL, CmpR>
where
    CmpL: Compare<L>,
    CmpR: Compare<R>,
{
    type Item = (L, R);
    type IntoIter = IntoIter<L, R>;

    /// Consumes the map, draining the pairs in ascending left order.
    fn into_iter(self) -> IntoIter<L, R> {
        let mut order = Vec::with_capacity(self.length);
        let mut cur = self.roots[Side::Left.index()]
            .map(|r| tree::subtree_min(&self.slots, Side::Left, r));
        while let Some(ix) = cur {
            order.push(ix);
            cur = tree::next_in_order(&self.slots, Side::Left, ix);
        }
        IntoIter {
            slots: self.slots,
            order: order.into_iter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use compare::{natural, Compare};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::Bimap;
    use crate::{LeftCursor, NotFound, RightCursor};

    #[test]
    fn find_on_empty() {
        let mut m: Bimap<i32, i32> = Bimap::new();
        assert!(m.find_left(&1).is_end());
        assert!(m.find_right(&1).is_end());
        assert_eq!(m.get_left(&1), None);
        assert!(m.is_empty());
        m.assert_valid();
    }

    #[test]
    fn insert_and_lookup_both_sides() {
        let mut m = Bimap::new();
        assert!(!m.insert(1, "one").is_end());
        assert!(!m.insert(2, "two").is_end());
        assert!(!m.insert(3, "three").is_end());
        assert_eq!(m.len(), 3);

        assert_eq!(m.at_left(&2), Ok(&"two"));
        assert_eq!(m.at_right(&"three"), Ok(&3));
        assert_eq!(m.get_left(&1), Some(&"one"));
        assert_eq!(m.get_right(&"one"), Some(&1));
        assert!(m.contains_left(&3));
        assert!(!m.contains_right(&"four"));
        m.assert_valid();
    }

    #[test]
    fn insert_refuses_either_collision() {
        let mut m = Bimap::new();
        m.insert(1, "one");
        assert!(m.insert(1, "uno").is_end());
        assert!(m.insert(2, "one").is_end());
        assert_eq!(m.len(), 1);
        assert_eq!(m.at_left(&1), Ok(&"one"));
        m.assert_valid();
    }

    #[test]
    fn at_miss_leaves_map_unchanged() {
        let mut m = Bimap::new();
        m.insert(1, "one");
        assert_eq!(m.at_left(&9), Err(NotFound));
        assert_eq!(m.at_right(&"nine"), Err(NotFound));
        assert_eq!(m.len(), 1);
        m.assert_valid();
    }

    #[test]
    fn at_or_default_reuses_and_evicts_the_default_slot() {
        let mut m: Bimap<i32, String> = Bimap::new();
        m.insert(1, "a".to_string());
        m.insert(2, "b".to_string());

        assert_eq!(m.at_left_or_default(3), "");
        assert_eq!(m.len(), 3);

        // 4 takes over the default right value; (3, "") goes away.
        assert_eq!(m.at_left_or_default(4), "");
        assert_eq!(m.len(), 3);
        assert!(!m.contains_left(&3));
        assert_eq!(m.get_left(&4).map(String::as_str), Some(""));

        // A hit never inserts or evicts.
        assert_eq!(m.at_left_or_default(1), "a");
        assert_eq!(m.len(), 3);
        m.assert_valid();
    }

    #[test]
    fn at_right_or_default_mirrors() {
        let mut m: Bimap<i32, &str> = Bimap::new();
        m.insert(7, "seven");
        assert_eq!(*m.at_right_or_default("eight"), 0);
        assert_eq!(m.len(), 2);
        // "nine" claims the default left value 0, evicting ("eight"'s pair).
        assert_eq!(*m.at_right_or_default("nine"), 0);
        assert_eq!(m.len(), 2);
        assert!(!m.contains_right(&"eight"));
        m.assert_valid();
    }

    #[test]
    fn flip_is_pair_identity() {
        let mut m = Bimap::new();
        m.insert(1, "a");
        m.insert(2, "b");

        let l = m.find_left(&2);
        let r = l.flip();
        assert_eq!(m.right(r), &"b");
        assert_eq!(r.flip(), l);
        assert_eq!(m.find_right(&"b").flip(), l);
        assert!(LeftCursor::end().flip().is_end());
    }

    #[test]
    fn remove_by_key_returns_the_pair() {
        let mut m = Bimap::new();
        m.insert(1, "one");
        m.insert(2, "two");

        assert_eq!(m.remove_left(&1), Some((1, "one")));
        assert_eq!(m.remove_left(&1), None);
        assert_eq!(m.remove_right(&"two"), Some((2, "two")));
        assert_eq!(m.remove_right(&"two"), None);
        assert!(m.is_empty());
        m.assert_valid();
    }

    #[test]
    fn remove_at_returns_the_successor() {
        let mut m = Bimap::new();
        m.insert(1, "x");
        m.insert(2, "y");
        m.insert(3, "z");

        let at = m.find_left(&2);
        let next = m.remove_left_at(at);
        assert_eq!(m.left(next), &3);
        assert_eq!(m.len(), 2);

        let next = m.remove_left_at(next);
        assert!(next.is_end());
        assert_eq!(m.len(), 1);
        m.assert_valid();
    }

    #[test]
    fn remove_range_left() {
        let mut m = Bimap::new();
        for i in 0..10 {
            m.insert(i, i * 10);
        }
        let first = m.lower_bound_left(&3);
        let last = m.lower_bound_left(&7);
        let back = m.remove_left_range(first, last);

        assert_eq!(m.left(back), &7);
        let lefts: Vec<i32> = m.lefts().copied().collect();
        assert_eq!(lefts, vec![0, 1, 2, 7, 8, 9]);
        m.assert_valid();
    }

    #[test]
    fn remove_range_to_end() {
        let mut m = Bimap::new();
        for i in 0..5 {
            m.insert(i, i);
        }
        let first = m.lower_bound_right(&2);
        let back = m.remove_right_range(first, RightCursor::end());
        assert!(back.is_end());
        assert_eq!(m.len(), 2);
        m.assert_valid();
    }

    #[test]
    fn bounds_both_sides() {
        let mut m = Bimap::new();
        m.insert(10, "j");
        m.insert(20, "t");
        m.insert(30, "x");

        let at = m.lower_bound_left(&10);
        assert_eq!(m.left(at), &10);
        let at = m.upper_bound_left(&10);
        assert_eq!(m.left(at), &20);
        let at = m.lower_bound_left(&15);
        assert_eq!(m.left(at), &20);
        assert!(m.lower_bound_left(&31).is_end());
        assert!(m.upper_bound_left(&30).is_end());

        let at = m.lower_bound_right(&"k");
        assert_eq!(m.right(at), &"t");
        let at = m.upper_bound_right(&"t");
        assert_eq!(m.right(at), &"x");
        assert!(m.upper_bound_right(&"z").is_end());
        m.assert_valid();
    }

    #[test]
    fn first_and_last() {
        let mut m = Bimap::new();
        assert!(m.first_left().is_end());
        assert!(m.last_right().is_end());

        m.insert(2, "b");
        m.insert(1, "c");
        m.insert(3, "a");

        assert_eq!(m.left(m.first_left()), &1);
        assert_eq!(m.left(m.last_left()), &3);
        assert_eq!(m.right(m.first_right()), &"a");
        assert_eq!(m.right(m.last_right()), &"c");
    }

    #[test]
    fn stepping_walks_in_order() {
        let mut m = Bimap::new();
        for (l, r) in [(2, "b"), (1, "c"), (3, "a")] {
            m.insert(l, r);
        }

        let mut at = m.first_left();
        let mut seen = vec![];
        while !at.is_end() {
            seen.push(*m.left(at));
            at = m.next_left(at);
        }
        assert_eq!(seen, vec![1, 2, 3]);

        let at = m.last_right();
        let at = m.prev_right(at);
        assert_eq!(m.right(at), &"b");
        m.assert_valid();
    }

    #[test]
    fn iteration_is_sorted_on_each_side() {
        let mut m = Bimap::new();
        m.insert(2, "b");
        m.insert(1, "c");
        m.insert(3, "a");

        let pairs: Vec<(i32, &str)> = m.iter_left().map(|(l, r)| (*l, *r)).collect();
        assert_eq!(pairs, vec![(1, "c"), (2, "b"), (3, "a")]);

        let pairs: Vec<(&str, i32)> = m.iter_right().map(|(r, l)| (*r, *l)).collect();
        assert_eq!(pairs, vec![("a", 3), ("b", 2), ("c", 1)]);

        let back: Vec<i32> = m.lefts().rev().copied().collect();
        assert_eq!(back, vec![3, 2, 1]);

        let mut it = m.iter_left();
        assert_eq!(it.len(), 3);
        it.next();
        assert_eq!(it.len(), 2);
        assert_eq!(it.next_back().map(|(l, _)| *l), Some(3));
        assert_eq!(it.next().map(|(l, _)| *l), Some(2));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn reversed_comparator_orders_one_side() {
        let mut m = Bimap::with_comparators(natural().rev(), natural());
        m.insert(1, "b");
        m.insert(2, "a");
        m.insert(3, "c");

        let lefts: Vec<i32> = m.lefts().copied().collect();
        assert_eq!(lefts, vec![3, 2, 1]);
        let rights: Vec<&str> = m.rights().copied().collect();
        assert_eq!(rights, vec!["a", "b", "c"]);

        assert_eq!(m.at_left(&2), Ok(&"a"));
        // Bounds follow the reversed order.
        let at = m.lower_bound_left(&2);
        assert_eq!(m.left(at), &2);
        let at = m.upper_bound_left(&2);
        assert_eq!(m.left(at), &1);
        m.assert_valid();
    }

    #[test]
    fn eq_ignores_insertion_order() {
        let a: Bimap<i32, i32> = [(1, 10), (2, 20), (3, 30)].into_iter().collect();
        let b: Bimap<i32, i32> = [(3, 30), (1, 10), (2, 20)].into_iter().collect();
        let c: Bimap<i32, i32> = [(1, 10), (2, 20)].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(c < a);
    }

    #[test]
    fn from_iter_first_pair_wins() {
        let m: Bimap<i32, &str> = [(1, "one"), (1, "uno"), (2, "one"), (2, "two")]
            .into_iter()
            .collect();
        assert_eq!(m.len(), 2);
        let pairs: Vec<(i32, &str)> = m.iter_left().map(|(l, r)| (*l, *r)).collect();
        assert_eq!(pairs, vec![(1, "one"), (2, "two")]);
        m.assert_valid();
    }

    #[test]
    fn clone_is_independent() {
        let mut m = Bimap::new();
        m.insert(1, "one");
        m.insert(2, "two");
        let snapshot = m.clone();

        m.remove_left(&1);
        m.insert(3, "three");

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get_left(&1), Some(&"one"));
        assert_eq!(snapshot.get_left(&3), None);
        snapshot.assert_valid();
        m.assert_valid();
    }

    #[test]
    fn debug_format() {
        let mut m = Bimap::new();
        assert_eq!(format!("{:?}", m), "{}");
        m.insert(2, "b");
        m.insert(1, "a");
        assert_eq!(format!("{:?}", m), "{1 <-> \"a\", 2 <-> \"b\"}");
    }

    #[test]
    fn into_iter_drains_in_left_order() {
        let mut m = Bimap::new();
        m.insert(2, "b".to_string());
        m.insert(1, "a".to_string());
        m.insert(3, "c".to_string());

        let drained: Vec<(i32, String)> = m.into_iter().collect();
        assert_eq!(
            drained,
            vec![
                (1, "a".to_string()),
                (2, "b".to_string()),
                (3, "c".to_string())
            ]
        );
    }

    #[test]
    fn cursors_survive_splaying() {
        let mut m = Bimap::new();
        for i in 0..50 {
            m.insert(i, i * 2);
        }
        let at = m.find_left(&25);

        // Reshape both trees thoroughly.
        for i in 0..50 {
            m.find_left(&i);
            m.find_right(&(i * 2));
        }

        assert_eq!(m.left(at), &25);
        assert_eq!(m.right(at.flip()), &50);
        assert_eq!(m.find_left(&25), at);
        m.assert_valid();
    }

    #[test]
    fn clear_empties_and_stales() {
        let mut m = Bimap::new();
        for i in 0..8 {
            m.insert(i, i);
        }
        m.clear();
        assert!(m.is_empty());
        assert!(m.find_left(&3).is_end());
        m.assert_valid();

        // Slots are reusable afterwards.
        m.insert(1, 1);
        assert_eq!(m.len(), 1);
        m.assert_valid();
    }

    #[test]
    #[should_panic(expected = "end sentinel or its pair was erased")]
    fn end_cursor_deref_panics() {
        let m: Bimap<i32, i32> = Bimap::new();
        m.left(LeftCursor::end());
    }

    #[test]
    #[should_panic(expected = "end sentinel or its pair was erased")]
    fn stale_cursor_deref_panics() {
        let mut m = Bimap::new();
        m.insert(1, "one");
        let at = m.find_left(&1);
        m.remove_left_at(at);
        // The slot may even be reoccupied; the cursor must still be refused.
        m.insert(1, "one");
        m.left(at);
    }

    #[test]
    #[should_panic(expected = "end sentinel or its pair was erased")]
    fn cursor_from_before_clear_panics() {
        let mut m = Bimap::new();
        m.insert(1, "one");
        let at = m.find_left(&1);
        m.clear();
        m.insert(1, "one");
        m.left(at);
    }

    #[test]
    #[should_panic(expected = "no pair before the first")]
    fn prev_of_first_panics() {
        let mut m = Bimap::new();
        m.insert(1, "one");
        let first = m.first_left();
        m.prev_left(first);
    }

    #[test]
    fn random_ops_match_model() {
        let mut rng = StdRng::seed_from_u64(0xB1_5EED);
        let mut map: Bimap<i32, i32> = Bimap::new();
        let mut byl: BTreeMap<i32, i32> = BTreeMap::new();
        let mut byr: BTreeMap<i32, i32> = BTreeMap::new();

        for _ in 0..500 {
            match rng.random_range(0..10) {
                0..=5 => {
                    let l = rng.random_range(0..64);
                    let r = rng.random_range(0..64);
                    let inserted = !map.insert(l, r).is_end();
                    let fresh = !byl.contains_key(&l) && !byr.contains_key(&r);
                    assert_eq!(inserted, fresh);
                    if fresh {
                        byl.insert(l, r);
                        byr.insert(r, l);
                    }
                }
                6 | 7 => {
                    let l = rng.random_range(0..64);
                    let removed = map.remove_left(&l);
                    let expected = byl.remove(&l).map(|r| {
                        byr.remove(&r);
                        (l, r)
                    });
                    assert_eq!(removed, expected);
                }
                8 => {
                    let r = rng.random_range(0..64);
                    let removed = map.remove_right(&r);
                    let expected = byr.remove(&r).map(|l| {
                        byl.remove(&l);
                        (l, r)
                    });
                    assert_eq!(removed, expected);
                }
                _ => {
                    let l = rng.random_range(0..64);
                    assert_eq!(map.get_left(&l), byl.get(&l));
                }
            }
            map.assert_valid();
            assert_eq!(map.len(), byl.len());
        }

        let lefts: Vec<(i32, i32)> = map.iter_left().map(|(l, r)| (*l, *r)).collect();
        let expected: Vec<(i32, i32)> = byl.iter().map(|(l, r)| (*l, *r)).collect();
        assert_eq!(lefts, expected);

        let rights: Vec<(i32, i32)> = map.iter_right().map(|(r, l)| (*r, *l)).collect();
        let expected: Vec<(i32, i32)> = byr.iter().map(|(r, l)| (*r, *l)).collect();
        assert_eq!(rights, expected);
    }
}
