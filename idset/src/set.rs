//! [`Idset`]: a [`BitTree`] plus the creation-time autogrow flag, and the
//! free functions that reproduce the historical "null idset" sentinels
//! for callers that model an idset as `Option<&Idset>`.

use bitflags::bitflags;

use crate::bittree::{BitTree, BitTreeIter, INVALID_ID};
use crate::error::{invalid, Result};

bitflags! {
    /// Flags shared by [`Idset::create`] and [`Idset::encode`]; which
    /// combinations are legal depends on which side you're on (see each
    /// method's docs). Combinations outside the documented set are
    /// rejected at the API boundary, never silently ignored.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct IdsetFlags: u8 {
        /// Emit maximal runs of consecutive ids as `lo-hi` on encode.
        const RANGE    = 0b0000_0001;
        /// Wrap non-empty encoded output in `[...]`.
        const BRACKETS = 0b0000_0010;
        /// Creation-time only: grow capacity on out-of-range insert.
        const AUTOGROW = 0b0000_0100;
    }
}

/// A set of non-negative integer ids, plus whether it was created with
/// autogrow permission. Two idsets are equal iff they hold the same
/// members, regardless of underlying capacity.
#[derive(Clone, Debug)]
pub struct Idset {
    pub(crate) tree: BitTree,
}

impl Idset {
    /// `size_hint = 0` is legal. `flags` may only contain [`IdsetFlags::AUTOGROW`];
    /// passing `RANGE`/`BRACKETS` here is an error since those are
    /// encode-only.
    pub fn create(size_hint: u32, flags: IdsetFlags) -> Result<Self> {
        if flags.intersects(IdsetFlags::RANGE | IdsetFlags::BRACKETS) {
            return Err(invalid(
                "RANGE and BRACKETS are encode-time flags, not valid at create",
            ));
        }
        let autogrow = flags.contains(IdsetFlags::AUTOGROW);
        Ok(Self {
            tree: BitTree::create(size_hint, autogrow),
        })
    }

    pub fn decode(s: &str) -> Result<Self> {
        crate::codec::decode(s)
    }

    pub fn encode(&self, flags: IdsetFlags) -> Result<String> {
        crate::codec::encode(self, flags)
    }

    pub fn autogrow(&self) -> bool {
        self.tree.autogrow()
    }

    pub fn capacity(&self) -> u32 {
        self.tree.capacity()
    }

    pub fn count(&self) -> u32 {
        self.tree.count()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.tree.contains(id)
    }

    pub fn first(&self) -> u32 {
        self.tree.first()
    }

    pub fn last(&self) -> u32 {
        self.tree.last()
    }

    pub fn next(&self, prev: u32) -> u32 {
        self.tree.next(prev)
    }

    pub fn predecessor(&self, x: u32) -> u32 {
        self.tree.predecessor(x)
    }

    pub fn insert(&mut self, id: u32) -> Result<()> {
        if id == INVALID_ID {
            return Err(invalid("id is the reserved invalid sentinel"));
        }
        if self.tree.insert(id) {
            Ok(())
        } else {
            Err(invalid(format!(
                "id {id} is out of range ({}) and this idset does not autogrow",
                self.tree.capacity()
            )))
        }
    }

    pub fn remove(&mut self, id: u32) -> Result<()> {
        if id == INVALID_ID {
            return Err(invalid("id is the reserved invalid sentinel"));
        }
        self.tree.remove(id);
        Ok(())
    }

    /// `lo > hi` is treated as the swapped interval.
    pub fn range_insert(&mut self, lo: u32, hi: u32) -> Result<()> {
        if lo == INVALID_ID || hi == INVALID_ID {
            return Err(invalid("range bound is the reserved invalid sentinel"));
        }
        if self.tree.range_insert(lo, hi) {
            Ok(())
        } else {
            Err(invalid(format!(
                "range {lo}-{hi} exceeds capacity ({}) and this idset does not autogrow",
                self.tree.capacity()
            )))
        }
    }

    pub fn range_remove(&mut self, lo: u32, hi: u32) -> Result<()> {
        if lo == INVALID_ID || hi == INVALID_ID {
            return Err(invalid("range bound is the reserved invalid sentinel"));
        }
        self.tree.range_remove(lo, hi);
        Ok(())
    }

    pub fn iter(&self) -> BitTreeIter<'_> {
        self.tree.iter()
    }

    fn members_equal(&self, other: &Self) -> bool {
        if self.count() != other.count() {
            return false;
        }
        let mut a = self.first();
        let mut b = other.first();
        while a != INVALID_ID {
            if a != b {
                return false;
            }
            a = self.next(a);
            b = other.next(b);
        }
        true
    }
}

impl PartialEq for Idset {
    fn eq(&self, other: &Self) -> bool {
        self.members_equal(other)
    }
}

impl Eq for Idset {}

impl<'a> IntoIterator for &'a Idset {
    type Item = u32;
    type IntoIter = BitTreeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// `count` on a "null idset." Used by callers that model an absent
/// idset as `Option<&Idset>` instead of an always-present empty one.
pub fn count_opt(idset: Option<&Idset>) -> u32 {
    idset.map_or(0, Idset::count)
}

pub fn first_opt(idset: Option<&Idset>) -> u32 {
    idset.map_or(INVALID_ID, Idset::first)
}

pub fn last_opt(idset: Option<&Idset>) -> u32 {
    idset.map_or(INVALID_ID, Idset::last)
}

pub fn next_opt(idset: Option<&Idset>, prev: u32) -> u32 {
    idset.map_or(INVALID_ID, |s| s.next(prev))
}

/// A null idset is distinguishable from an empty one: `equal(None, _)`
/// is always `false`, even when both sides are `None`.
pub fn equal(a: Option<&Idset>, b: Option<&Idset>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}
