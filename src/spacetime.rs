//! Space and time coordinates of the children of a list.
//!
//! A child's *space* index is its position among the live children; it
//! shifts whenever something is inserted or deleted before it. A child's
//! *time* index is the order in which it was created; it never changes and
//! is never reused. `SpaceTime` keeps both directions of the mapping:
//!
//! ```text
//! t2s[t] = Some(s)   child created t-th is now at space index s
//! t2s[t] = None      child created t-th has been deleted
//! s2t[s] = t
//! ```

use crate::address::Address;
use crate::address::best_lookup;
use crate::error::AddressError;
use crate::tree::SExpr;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpaceTime {
    pub t2s: Vec<Option<usize>>,
    pub s2t: Vec<usize>,
}

impl SpaceTime {
    /// The tables of a list that just came into being.
    pub fn new() -> SpaceTime {
        return SpaceTime::default();
    }

    /// Number of live children.
    pub fn len(&self) -> usize {
        return self.s2t.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.s2t.is_empty();
    }

    /// Record the insertion of a new child at space index `index`. Returns
    /// the new child's time index.
    pub fn insert(&mut self, index: usize) -> usize {
        for s in self.t2s.iter_mut().flatten() {
            if *s >= index {
                *s += 1;
            }
        }
        let t = self.t2s.len();
        self.t2s.push(Some(index));
        self.s2t.insert(index, t);
        debug_assert!(self.is_consistent(), "{:?}", self);
        return t;
    }

    /// Record the deletion of the child at space index `index`.
    pub fn delete(&mut self, index: usize) {
        let t = self.s2t.remove(index);
        self.t2s[t] = None;
        for s in self.t2s.iter_mut().flatten() {
            if *s > index {
                *s -= 1;
            }
        }
        debug_assert!(self.is_consistent(), "{:?}", self);
    }

    /// Record that the child at `index` changed. Identity is unaffected.
    pub fn replace(&mut self, _index: usize) {}

    /// Space index of time index `t`; `None` if it was deleted or never existed.
    pub fn s_for_t(&self, t: usize) -> Option<usize> {
        return self.t2s.get(t).copied().flatten();
    }

    pub fn t_for_s(&self, s: usize) -> Option<usize> {
        return self.s2t.get(s).copied();
    }

    /// Both directions agree with each other.
    pub fn is_consistent(&self) -> bool {
        let forward = self.t2s.iter().enumerate().all(|(t, s)| match s {
            None => true,
            Some(s) => self.s2t.get(*s) == Some(&t),
        });
        let backward = self
            .s2t
            .iter()
            .enumerate()
            .all(|(s, t)| self.t2s.get(*t) == Some(&Some(s)));
        return forward && backward;
    }
}

fn spacetime(node: &SExpr) -> Option<&SpaceTime> {
    return match node {
        SExpr::List(list) => Some(&list.spacetime),
        SExpr::Atom(_) => None,
    };
}

/// The time address of the node at `s_address`, which must exist.
pub fn t_address_for_s_address(node: &SExpr, s_address: &[usize]) -> Result<Address, AddressError> {
    let t_address = best_t_address_for_s_address(node, s_address);
    if t_address.len() != s_address.len() {
        return Err(AddressError::OutOfBounds(Address::from_slice(s_address)));
    }
    return Ok(t_address);
}

/// The time address of the longest prefix of `s_address` that exists.
pub fn best_t_address_for_s_address(node: &SExpr, s_address: &[usize]) -> Address {
    return best_lookup(node, s_address, |node, s| {
        let t = spacetime(node)?.t_for_s(s)?;
        return Some((s, t));
    });
}

/// The space address of the longest prefix of `t_address` that still exists.
/// A result shorter than `t_address` means the node is gone.
pub fn best_s_address_for_t_address(node: &SExpr, t_address: &[usize]) -> Address {
    return best_lookup(node, t_address, |node, t| {
        let s = spacetime(node)?.s_for_t(t)?;
        return Some((s, s));
    });
}

/// The space address for `t_address`, or `None` if that node no longer exists.
pub fn get_s_address_for_t_address(node: &SExpr, t_address: &[usize]) -> Option<Address> {
    let s_address = best_s_address_for_t_address(node, t_address);
    if s_address.len() != t_address.len() {
        return None;
    }
    return Some(s_address);
}

/// Where the node at `s_address` in `tree_0` lives in `tree_1`, as far as it
/// can be followed.
pub fn best_stable_s_over_time(tree_0: &SExpr, s_address: &[usize], tree_1: &SExpr) -> Result<Address, AddressError> {
    let t_address = t_address_for_s_address(tree_0, s_address)?;
    return Ok(best_s_address_for_t_address(tree_1, &t_address));
}

/// Where the node at `s_address` in `tree_0` lives in `tree_1`; `None` if it
/// was deleted in between.
pub fn get_stable_s_over_time(
    tree_0: &SExpr,
    s_address: &[usize],
    tree_1: &SExpr,
) -> Result<Option<Address>, AddressError> {
    let t_address = t_address_for_s_address(tree_0, s_address)?;
    return Ok(get_s_address_for_t_address(tree_1, &t_address));
}
