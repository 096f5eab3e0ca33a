//! Research snapshots and the doubly linked ranked list.
//!
//! A [`ResearchList`] keeps its nodes in an arena of slots linked by
//! `prev`/`next` slot handles, with the first and last handles and the
//! length cached. Positions seen by callers are 1-based: valid positions are
//! `1..=len`, and `len + 1` is accepted by [`ResearchList::insert`] to
//! append.
//!
//! # Invariants
//!
//! - Walking `next` from `first` visits exactly `len` nodes and ends at
//!   `last`; walking `prev` from `last` visits the same nodes in reverse.
//! - Every slot is either occupied by a linked node or listed as free.

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::country::Country;
use crate::error::RegistryError;

// ---------------------------------------------------------------------------
// Research
// ---------------------------------------------------------------------------

/// Aggregate figures a country is ranked by.
///
/// Ordering compares infectivity first, then lethality, then severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResearchStats {
    /// Total confirmed cases.
    pub infectivity: u64,
    /// Total critical cases.
    pub severity: u64,
    /// Total deaths.
    pub lethality: u64,
}

impl Ord for ResearchStats {
    fn cmp(&self, other: &Self) -> Ordering {
        self.infectivity
            .cmp(&other.infectivity)
            .then(self.lethality.cmp(&other.lethality))
            .then(self.severity.cmp(&other.severity))
    }
}

impl PartialOrd for ResearchStats {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Three-way comparison of two snapshots: `1` if `a` ranks higher, `-1` if
/// lower, `0` on a tie in all three figures.
pub fn compare_stats(a: &ResearchStats, b: &ResearchStats) -> i8 {
    match a.cmp(b) {
        Ordering::Greater => 1,
        Ordering::Equal => 0,
        Ordering::Less => -1,
    }
}

/// A country and the figures it had when the snapshot was taken.
///
/// The stats are not refreshed when the country changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Research {
    /// Owned copy of the country.
    pub country: Country,
    /// Figures at snapshot time.
    pub stats: ResearchStats,
}

impl Research {
    /// Snapshot `country`'s current totals.
    pub fn new(country: &Country) -> Self {
        let stats = ResearchStats {
            infectivity: u64::try_from(country.total_cases()).unwrap_or(0),
            severity: u64::try_from(country.total_critical_cases()).unwrap_or(0),
            lethality: u64::try_from(country.total_deaths()).unwrap_or(0),
        };
        Self {
            country: country.clone(),
            stats,
        }
    }
}

impl fmt::Display for Research {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Infectivity: {};\tSeverity: {};\tLethality: {};\tCountry_Name: \"{}\"",
            self.stats.infectivity, self.stats.severity, self.stats.lethality, self.country.name
        )
    }
}

// ---------------------------------------------------------------------------
// Ranked list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct ResearchNode {
    research: Research,
    prev: Option<usize>,
    next: Option<usize>,
}

/// An ordered, 1-based list of research snapshots.
#[derive(Debug, Clone, Default)]
pub struct ResearchList {
    slots: Vec<Option<ResearchNode>>,
    free: Vec<usize>,
    first: Option<usize>,
    last: Option<usize>,
    len: usize,
}

impl ResearchList {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            first: None,
            last: None,
            len: 0,
        }
    }

    /// Return the number of snapshots.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Return whether the list is empty.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The snapshot at position 1.
    pub fn first(&self) -> Option<&Research> {
        self.first.and_then(|slot| self.node(slot)).map(|node| &node.research)
    }

    /// The snapshot at position `len`.
    pub fn last(&self) -> Option<&Research> {
        self.last.and_then(|slot| self.node(slot)).map(|node| &node.research)
    }

    /// Iterate from first to last.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            next: self.first,
        }
    }

    /// Insert `research` so that it ends up at position `index`.
    ///
    /// `index` must be in `1..=len + 1`; `len + 1` appends. No duplicate
    /// check is made.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidIndex`] for any other index and
    /// [`RegistryError::Memory`] if the arena cannot grow. The list is
    /// unchanged on error.
    pub fn insert(&mut self, research: Research, index: usize) -> Result<(), RegistryError> {
        let append_at = self.len.saturating_add(1);
        if index == 0 || index > append_at {
            return Err(RegistryError::InvalidIndex {
                index,
                len: self.len,
            });
        }

        let successor = if index == append_at {
            None
        } else {
            self.slot_at(index)
        };
        let predecessor = match successor {
            Some(slot) => self.node(slot).and_then(|node| node.prev),
            None => self.last,
        };

        tracing::debug!(key = %research.country.name, index, len = self.len, "research insert");
        let slot = self.allocate(ResearchNode {
            research,
            prev: predecessor,
            next: successor,
        })?;
        self.set_next(predecessor, Some(slot));
        self.set_prev(successor, Some(slot));
        self.len = self.len.saturating_add(1);
        Ok(())
    }

    /// Unlink the snapshot at `index` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyList`] on an empty list and
    /// [`RegistryError::InvalidIndex`] if `index` is not in `1..=len`.
    pub fn delete(&mut self, index: usize) -> Result<Research, RegistryError> {
        if self.is_empty() {
            return Err(RegistryError::EmptyList);
        }
        let len = self.len;
        let node = self
            .slot_at(index)
            .and_then(|slot| self.slots.get_mut(slot).and_then(Option::take).map(|node| (slot, node)));
        let Some((slot, node)) = node else {
            return Err(RegistryError::InvalidIndex { index, len });
        };

        self.set_next(node.prev, node.next);
        self.set_prev(node.next, node.prev);
        self.len = self.len.saturating_sub(1);
        if self.len == 0 {
            self.slots = Vec::new();
            self.free = Vec::new();
        } else {
            self.free.push(slot);
        }
        tracing::debug!(key = %node.research.country.name, index, len = self.len, "research delete");
        Ok(node.research)
    }

    /// Return the snapshot at `index`, if `index` is in `1..=len`.
    pub fn get(&self, index: usize) -> Option<&Research> {
        self.slot_at(index)
            .and_then(|slot| self.node(slot))
            .map(|node| &node.research)
    }

    /// Exchange the nodes at positions `i` and `j` by relinking them.
    ///
    /// Swapping a position with itself does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidIndex`] if either position is not in
    /// `1..=len`.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<(), RegistryError> {
        let (low, high) = if i <= j { (i, j) } else { (j, i) };
        let (Some(a), Some(b)) = (self.slot_at(low), self.slot_at(high)) else {
            let index = if self.slot_at(i).is_none() { i } else { j };
            return Err(RegistryError::InvalidIndex {
                index,
                len: self.len,
            });
        };
        if a == b {
            return Ok(());
        }

        let (Some(node_a), Some(node_b)) = (self.node(a), self.node(b)) else {
            return Err(RegistryError::NotFound(format!("slot {a} or {b}")));
        };
        let (before_a, after_a) = (node_a.prev, node_a.next);
        let (before_b, after_b) = (node_b.prev, node_b.next);

        if after_a == Some(b) {
            // before_a, a, b, after_b  ->  before_a, b, a, after_b
            self.set_next(before_a, Some(b));
            self.relink(b, before_a, Some(a));
            self.relink(a, Some(b), after_b);
            self.set_prev(after_b, Some(a));
        } else {
            self.set_next(before_a, Some(b));
            self.relink(b, before_a, after_a);
            self.set_prev(after_a, Some(b));
            self.set_next(before_b, Some(a));
            self.relink(a, before_b, after_b);
            self.set_prev(after_b, Some(a));
        }
        tracing::debug!(low, high, "research swap");
        Ok(())
    }

    /// The 1-based position of the first snapshot of a country with the
    /// same name as `country`.
    pub fn position_of(&self, country: &Country) -> Option<usize> {
        self.iter()
            .position(|research| research.country.name == country.name)
            .and_then(|offset| offset.checked_add(1))
    }

    /// Same answer as [`ResearchList::position_of`], found by recursion on
    /// the `next` handles. Stack depth grows with the position searched.
    pub fn position_of_recursive(&self, country: &Country) -> Option<usize> {
        self.position_from(self.first, &country.name, 1)
    }

    fn position_from(&self, slot: Option<usize>, name: &str, position: usize) -> Option<usize> {
        let node = self.node(slot?)?;
        if node.research.country.name == name {
            Some(position)
        } else {
            self.position_from(node.next, name, position.checked_add(1)?)
        }
    }

    /// Sort in descending [`ResearchStats`] order.
    ///
    /// Adjacent positions are compared and swapped only when the later one
    /// ranks strictly higher, so equal snapshots keep their relative order.
    /// Sorting an empty list succeeds.
    ///
    /// # Errors
    ///
    /// Propagates a [`ResearchList::swap`] failure, which would indicate a
    /// broken chain.
    pub fn bubble_sort(&mut self) -> Result<(), RegistryError> {
        for settled in 1..self.len {
            let mut swapped = false;
            for j in (settled.saturating_add(1)..=self.len).rev() {
                let before = j.saturating_sub(1);
                let (Some(further), Some(nearer)) = (self.get(j), self.get(before)) else {
                    continue;
                };
                if compare_stats(&further.stats, &nearer.stats) == 1 {
                    self.swap(j, before)?;
                    swapped = true;
                }
            }
            if !swapped {
                break;
            }
        }
        tracing::debug!(len = self.len, "research sort");
        Ok(())
    }

    /// Drop every snapshot. Safe to call on an empty list.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    // -----------------------------------------------------------------------
    // Arena plumbing
    // -----------------------------------------------------------------------

    fn node(&self, slot: usize) -> Option<&ResearchNode> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut ResearchNode> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Slot holding position `index`, walking from `first`. The last
    /// position is answered without a walk.
    fn slot_at(&self, index: usize) -> Option<usize> {
        if index == 0 || index > self.len {
            return None;
        }
        if index == self.len {
            return self.last;
        }
        let mut slot = self.first;
        for _ in 1..index {
            slot = slot.and_then(|s| self.node(s)).and_then(|node| node.next);
        }
        slot
    }

    fn allocate(&mut self, node: ResearchNode) -> Result<usize, RegistryError> {
        if let Some(slot) = self.free.pop() {
            if let Some(vacant) = self.slots.get_mut(slot) {
                *vacant = Some(node);
                return Ok(slot);
            }
        }
        self.slots.try_reserve(1)?;
        let slot = self.slots.len();
        self.slots.push(Some(node));
        Ok(slot)
    }

    /// Point `slot`'s successor at `next`, or `first` when `slot` is `None`.
    fn set_next(&mut self, slot: Option<usize>, next: Option<usize>) {
        match slot.and_then(|s| self.node_mut(s)) {
            Some(node) => node.next = next,
            None => self.first = next,
        }
    }

    /// Point `slot`'s predecessor at `prev`, or `last` when `slot` is `None`.
    fn set_prev(&mut self, slot: Option<usize>, prev: Option<usize>) {
        match slot.and_then(|s| self.node_mut(s)) {
            Some(node) => node.prev = prev,
            None => self.last = prev,
        }
    }

    fn relink(&mut self, slot: usize, prev: Option<usize>, next: Option<usize>) {
        if let Some(node) = self.node_mut(slot) {
            node.prev = prev;
            node.next = next;
        }
    }
}

impl fmt::Display for ResearchList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== List Contents:")?;
        writeln!(f)?;
        for (position, research) in (1_usize..).zip(self.iter()) {
            writeln!(f, "\tElemPos: {position}:\t{research}")?;
        }
        Ok(())
    }
}

/// Borrowing iterator over a [`ResearchList`], first to last.
pub struct Iter<'a> {
    list: &'a ResearchList,
    next: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Research;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.next?)?;
        self.next = node.next;
        Some(&node.research)
    }
}

impl<'a> IntoIterator for &'a ResearchList {
    type Item = &'a Research;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
