use core::fmt;
use core::ops::Bound::{Excluded, Unbounded};
use std::collections::BTreeMap;

use super::interval::Interval;

/// Bookkeeping of the received parts of a fixed range.
///
/// Filled intervals are stored keyed by their minimum. At rest no two of them overlap or touch,
/// neighbours are merged as soon as the gap between them closes. The list is complete once a
/// single interval covers the whole declared range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoleList {
    range: Interval,
    filled: BTreeMap<u32, u32>,
}

/// The reason an interval could not be filled.
///
/// A failed fill never modifies the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillError {
    /// The interval reaches outside the declared range.
    OutOfRange,

    /// The interval shares at least one point with an already filled one.
    Overlap,
}

impl HoleList {
    /// Create a list in which all of `range` is missing.
    pub fn new(range: Interval) -> Self {
        HoleList {
            range,
            filled: BTreeMap::new(),
        }
    }

    /// The declared range.
    pub fn range(&self) -> Interval {
        self.range
    }

    /// Mark `interval` as received.
    ///
    /// Looks up the nearest filled interval starting at or before `interval.min()` and the nearest
    /// one starting after it. Either one overlapping is an error, checked before anything is
    /// modified. Either one adjacent is merged with the new interval.
    pub fn fill(&mut self, interval: Interval) -> Result<(), FillError> {
        if !self.range.contains(&interval) {
            return Err(FillError::OutOfRange);
        }

        let pred = self.filled.range(..=interval.min())
            .next_back()
            .map(|(&min, &max)| Interval::new(min, max));
        let succ = self.filled.range((Excluded(interval.min()), Unbounded))
            .next()
            .map(|(&min, &max)| Interval::new(min, max));

        if pred.map_or(false, |pred| pred.intersects(&interval)) {
            return Err(FillError::Overlap);
        }

        if succ.map_or(false, |succ| succ.intersects(&interval)) {
            return Err(FillError::Overlap);
        }

        let mut merged = interval;
        if let Some(pred) = pred.filter(|pred| pred.is_adjacent(&interval)) {
            self.filled.remove(&pred.min());
            merged = Interval::new(pred.min(), merged.max());
        }

        if let Some(succ) = succ.filter(|succ| succ.is_adjacent(&interval)) {
            self.filled.remove(&succ.min());
            merged = Interval::new(merged.min(), succ.max());
        }

        self.filled.insert(merged.min(), merged.max());
        Ok(())
    }

    /// Check if a single filled interval covers the declared range.
    pub fn is_complete(&self) -> bool {
        self.filled.len() == 1
            && self.filled.get(&self.range.min()) == Some(&self.range.max())
    }

    /// Check if nothing was filled yet.
    pub fn is_empty(&self) -> bool {
        self.filled.is_empty()
    }

    /// Forget all filled intervals.
    pub fn clear(&mut self) {
        self.filled.clear();
    }

    /// Iterate the filled intervals in ascending order.
    pub fn filled(&self) -> impl Iterator<Item=Interval> + '_ {
        self.filled.iter().map(|(&min, &max)| Interval::new(min, max))
    }

    /// Iterate the missing intervals of the declared range in ascending order.
    pub fn holes(&self) -> impl Iterator<Item=Interval> + '_ {
        let range = self.range;
        let mut next = Some(range.min());
        let mut filled = self.filled();

        core::iter::from_fn(move || loop {
            let start = next?;
            match filled.next() {
                Some(data) => {
                    next = data.max().checked_add(1).filter(|&n| n <= range.max());
                    if data.min() > start {
                        return Some(Interval::new(start, data.min() - 1));
                    }
                },
                None => {
                    next = None;
                    return Some(Interval::new(start, range.max()));
                },
            }
        })
    }
}

impl fmt::Display for HoleList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[ ")?;
        for interval in self.filled() {
            write!(f, "{} ", interval)?;
        }
        write!(f, "]")?;
        Ok(())
    }
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FillError::OutOfRange => write!(f, "interval outside of the declared range"),
            FillError::Overlap => write!(f, "interval overlaps filled data"),
        }
    }
}

impl std::error::Error for FillError {}

#[cfg(test)]
mod test {
    use super::*;

    fn iv(min: u32, max: u32) -> Interval {
        Interval::new(min, max)
    }

    fn list() -> HoleList {
        HoleList::new(iv(0, 99))
    }

    fn filled(list: &HoleList) -> Vec<Interval> {
        list.filled().collect()
    }

    fn holes(list: &HoleList) -> Vec<Interval> {
        list.holes().collect()
    }

    #[test]
    fn empty() {
        let list = list();
        assert!(list.is_empty());
        assert!(!list.is_complete());
        assert_eq!(holes(&list), vec![iv(0, 99)]);
    }

    #[test]
    fn fill_in_order() {
        let mut list = list();
        assert_eq!(list.fill(iv(0, 7)), Ok(()));
        assert_eq!(list.fill(iv(8, 15)), Ok(()));
        assert_eq!(filled(&list), vec![iv(0, 15)]);
        assert!(!list.is_complete());
        assert_eq!(list.fill(iv(16, 99)), Ok(()));
        assert_eq!(filled(&list), vec![iv(0, 99)]);
        assert!(list.is_complete());
        assert_eq!(holes(&list), vec![]);
    }

    #[test]
    fn fill_out_of_order_merges_both_sides() {
        let mut list = list();
        assert_eq!(list.fill(iv(16, 23)), Ok(()));
        assert_eq!(list.fill(iv(0, 7)), Ok(()));
        assert_eq!(filled(&list), vec![iv(0, 7), iv(16, 23)]);
        assert_eq!(holes(&list), vec![iv(8, 15), iv(24, 99)]);
        assert_eq!(list.to_string(), "[ [0, 7] [16, 23] ]");

        assert_eq!(list.fill(iv(8, 15)), Ok(()));
        assert_eq!(filled(&list), vec![iv(0, 23)]);
        assert_eq!(holes(&list), vec![iv(24, 99)]);
    }

    #[test]
    fn fill_leaves_gap() {
        let mut list = list();
        assert_eq!(list.fill(iv(0, 7)), Ok(()));
        assert_eq!(list.fill(iv(9, 15)), Ok(()));
        assert_eq!(filled(&list), vec![iv(0, 7), iv(9, 15)]);
        assert_eq!(holes(&list), vec![iv(8, 8), iv(16, 99)]);
    }

    #[test]
    fn overlap_with_predecessor() {
        let mut list = list();
        list.fill(iv(0, 7)).unwrap();
        let before = list.clone();
        assert_eq!(list.fill(iv(4, 11)), Err(FillError::Overlap));
        assert_eq!(list.fill(iv(7, 7)), Err(FillError::Overlap));
        assert_eq!(list, before);
    }

    #[test]
    fn overlap_with_successor() {
        let mut list = list();
        list.fill(iv(16, 23)).unwrap();
        let before = list.clone();
        assert_eq!(list.fill(iv(8, 16)), Err(FillError::Overlap));
        assert_eq!(list, before);
    }

    #[test]
    fn overlap_with_enclosed() {
        let mut list = list();
        list.fill(iv(0, 7)).unwrap();
        list.fill(iv(40, 47)).unwrap();
        list.fill(iv(60, 67)).unwrap();
        let before = list.clone();
        // Starts in a hole and swallows a filled interval entirely.
        assert_eq!(list.fill(iv(32, 55)), Err(FillError::Overlap));
        // Adjacent to the predecessor, overlapping two successors.
        assert_eq!(list.fill(iv(8, 70)), Err(FillError::Overlap));
        assert_eq!(list, before);
    }

    #[test]
    fn same_start_overlaps() {
        let mut list = list();
        list.fill(iv(8, 15)).unwrap();
        assert_eq!(list.fill(iv(8, 9)), Err(FillError::Overlap));
        assert_eq!(list.fill(iv(8, 31)), Err(FillError::Overlap));
    }

    #[test]
    fn out_of_range() {
        let mut list = HoleList::new(iv(0, 15));
        assert_eq!(list.fill(iv(8, 16)), Err(FillError::OutOfRange));
        assert!(list.is_empty());
    }

    #[test]
    fn complete_only_when_whole_range() {
        let mut list = HoleList::new(iv(0, 15));
        list.fill(iv(1, 15)).unwrap();
        assert!(!list.is_complete());
        list.fill(iv(0, 0)).unwrap();
        assert!(list.is_complete());
        list.clear();
        assert!(list.is_empty());
        assert!(!list.is_complete());
    }
}
