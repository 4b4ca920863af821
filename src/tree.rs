// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The splay-tree engine.
//!
//! All functions here are structural: they operate on one side's link
//! triples through slot indices and never look at the stored values.
//! Rotation direction is decided from the parent links, so a single engine
//! serves both the left-ordered and the right-ordered tree regardless of
//! value types. Comparator-driven descent lives in `map`.
//!
//! The splay discipline is the classic one: while the node has a
//! grandparent, apply a zig-zig (rotate the parent first, then the node)
//! when node and parent lean the same way, or a zig-zag (rotate the node
//! twice) otherwise; finish with a single zig when the parent is the root.
//! The amortized logarithmic bound depends on always rotating in these
//! root-ward pairs.

use crate::node::{Ix, Links, Side, Slot};

#[inline]
pub(crate) fn links<L, R>(slots: &[Slot<L, R>], side: Side, ix: Ix) -> Links {
    *slots[ix as usize].record().links(side)
}

#[inline]
fn set_parent<L, R>(slots: &mut [Slot<L, R>], side: Side, ix: Ix, to: Option<Ix>) {
    slots[ix as usize].record_mut().links_mut(side).parent = to;
}

#[inline]
fn set_left<L, R>(slots: &mut [Slot<L, R>], side: Side, ix: Ix, to: Option<Ix>) {
    slots[ix as usize].record_mut().links_mut(side).left = to;
}

#[inline]
fn set_right<L, R>(slots: &mut [Slot<L, R>], side: Side, ix: Ix, to: Option<Ix>) {
    slots[ix as usize].record_mut().links_mut(side).right = to;
}

/// Single rotation of `node` above its parent (the "zig"), fixing up the
/// parent links of the three affected subtrees. `node` must have a parent.
pub(crate) fn rotate_up<L, R>(slots: &mut [Slot<L, R>], side: Side, node: Ix) {
    let p = match links(slots, side, node).parent {
        Some(p) => p,
        None => unreachable!("rotate_up at the root"),
    };
    let g = links(slots, side, p).parent;

    if links(slots, side, p).left == Some(node) {
        // Right rotation: node's right subtree becomes p's left.
        let b = links(slots, side, node).right;
        set_left(slots, side, p, b);
        if let Some(b) = b {
            set_parent(slots, side, b, Some(p));
        }
        set_right(slots, side, node, Some(p));
    } else {
        let b = links(slots, side, node).left;
        set_right(slots, side, p, b);
        if let Some(b) = b {
            set_parent(slots, side, b, Some(p));
        }
        set_left(slots, side, node, Some(p));
    }

    set_parent(slots, side, p, Some(node));
    set_parent(slots, side, node, g);
    if let Some(g) = g {
        if links(slots, side, g).left == Some(p) {
            set_left(slots, side, g, Some(node));
        } else {
            set_right(slots, side, g, Some(node));
        }
    }
}

/// Rotates `node` to the root of its tree. The caller is responsible for
/// storing `node` as the new root afterwards.
pub(crate) fn splay<L, R>(slots: &mut [Slot<L, R>], side: Side, node: Ix) {
    while let Some(p) = links(slots, side, node).parent {
        match links(slots, side, p).parent {
            None => rotate_up(slots, side, node),
            Some(g) => {
                let node_leans_left = links(slots, side, p).left == Some(node);
                let parent_leans_left = links(slots, side, g).left == Some(p);
                if node_leans_left == parent_leans_left {
                    // zig-zig: the parent goes over the grandparent first.
                    rotate_up(slots, side, p);
                    rotate_up(slots, side, node);
                } else {
                    // zig-zag
                    rotate_up(slots, side, node);
                    rotate_up(slots, side, node);
                }
            }
        }
    }
}

pub(crate) fn subtree_min<L, R>(slots: &[Slot<L, R>], side: Side, mut ix: Ix) -> Ix {
    while let Some(l) = links(slots, side, ix).left {
        ix = l;
    }
    ix
}

pub(crate) fn subtree_max<L, R>(slots: &[Slot<L, R>], side: Side, mut ix: Ix) -> Ix {
    while let Some(r) = links(slots, side, ix).right {
        ix = r;
    }
    ix
}

/// In-order successor by a pure parent walk. Does not rotate, so iterators
/// and cursors can advance without reshaping the tree.
pub(crate) fn next_in_order<L, R>(slots: &[Slot<L, R>], side: Side, mut ix: Ix) -> Option<Ix> {
    if let Some(r) = links(slots, side, ix).right {
        return Some(subtree_min(slots, side, r));
    }
    loop {
        let p = links(slots, side, ix).parent?;
        if links(slots, side, p).left == Some(ix) {
            return Some(p);
        }
        ix = p;
    }
}

/// In-order predecessor by a pure parent walk.
pub(crate) fn prev_in_order<L, R>(slots: &[Slot<L, R>], side: Side, mut ix: Ix) -> Option<Ix> {
    if let Some(l) = links(slots, side, ix).left {
        return Some(subtree_max(slots, side, l));
    }
    loop {
        let p = links(slots, side, ix).parent?;
        if links(slots, side, p).right == Some(ix) {
            return Some(p);
        }
        ix = p;
    }
}

/// Joins two trees where every element of `a` orders before every element of
/// `b`. The maximum of `a` is splayed to the top and `b` hung off its free
/// right arm. Returns the root of the joined tree.
pub(crate) fn merge<L, R>(
    slots: &mut [Slot<L, R>],
    side: Side,
    a: Option<Ix>,
    b: Option<Ix>,
) -> Option<Ix> {
    let a = match a {
        Some(a) => a,
        None => return b,
    };
    let b = match b {
        Some(b) => b,
        None => return Some(a),
    };
    let m = subtree_max(slots, side, a);
    splay(slots, side, m);
    set_right(slots, side, m, Some(b));
    set_parent(slots, side, b, Some(m));
    Some(m)
}

/// Splits the tree at its root `near` and hangs both halves off the fresh
/// node `node`, which becomes the new root. This is the insertion path:
/// `near` is the closest existing element (already splayed to the top) and
/// `node_is_less` says on which side of it the new element orders.
pub(crate) fn attach_root<L, R>(
    slots: &mut [Slot<L, R>],
    side: Side,
    node: Ix,
    near: Ix,
    node_is_less: bool,
) {
    if node_is_less {
        // near and everything right of it stay on node's right; near's left
        // subtree moves under node.
        let l = links(slots, side, near).left;
        set_left(slots, side, near, None);
        if let Some(l) = l {
            set_parent(slots, side, l, Some(node));
        }
        set_left(slots, side, node, l);
        set_right(slots, side, node, Some(near));
    } else {
        let r = links(slots, side, near).right;
        set_right(slots, side, near, None);
        if let Some(r) = r {
            set_parent(slots, side, r, Some(node));
        }
        set_right(slots, side, node, r);
        set_left(slots, side, node, Some(near));
    }
    set_parent(slots, side, near, Some(node));
    set_parent(slots, side, node, None);
}

/// Unlinks `node` from its tree: splays it to the top, detaches both
/// children, and merges them into the tree that takes its place. Returns the
/// new root. `node`'s own links are cleared.
pub(crate) fn remove<L, R>(slots: &mut [Slot<L, R>], side: Side, node: Ix) -> Option<Ix> {
    splay(slots, side, node);
    let Links { left, right, .. } = links(slots, side, node);
    if let Some(l) = left {
        set_parent(slots, side, l, None);
    }
    if let Some(r) = right {
        set_parent(slots, side, r, None);
    }
    set_left(slots, side, node, None);
    set_right(slots, side, node, None);
    merge(slots, side, left, right)
}
