use core::{fmt, iter};

/// A closed range `[min, max]` of integers.
///
/// Both endpoints belong to the interval, so `[3, 3]` holds exactly one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    min: u32,
    max: u32,
}

/// A pivot did not lie within the interval to split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotContained;

impl Interval {
    /// Create the interval `[min, max]`.
    ///
    /// # Panics
    /// This function panics if `max < min`.
    pub fn new(min: u32, max: u32) -> Self {
        assert!(min <= max, "interval end before its start");
        Interval { min, max }
    }

    /// The interval holding only `point`.
    pub fn point(point: u32) -> Self {
        Interval { min: point, max: point }
    }

    /// The interval `[start, start + len - 1]`, if `len` is not zero and the end is representable.
    pub fn with_len(start: u32, len: u32) -> Option<Self> {
        let last = len.checked_sub(1)?;
        let max = start.checked_add(last)?;
        Some(Interval { min: start, max })
    }

    /// The smallest point of the interval.
    pub fn min(&self) -> u32 {
        self.min
    }

    /// The largest point of the interval.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// The distance between the endpoints, `max - min`.
    ///
    /// Note that the interval holds one point more than its width.
    pub fn width(&self) -> u32 {
        self.max - self.min
    }

    /// Check if the two intervals share at least one point.
    pub fn intersects(&self, other: &Interval) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Check if `point` lies within the interval.
    pub fn contains_point(&self, point: u32) -> bool {
        self.min <= point && point <= self.max
    }

    /// Check if `other` is a subrange of this interval.
    pub fn contains(&self, other: &Interval) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Check if either interval is a subrange of the other.
    ///
    /// The wider interval is tried as the container.
    pub fn nested_with(&self, other: &Interval) -> bool {
        if self.width() >= other.width() {
            self.contains(other)
        } else {
            other.contains(self)
        }
    }

    /// Check if the intervals do not overlap but no integer lies between them.
    pub fn is_adjacent(&self, other: &Interval) -> bool {
        self.max.checked_add(1) == Some(other.min)
            || other.max.checked_add(1) == Some(self.min)
    }

    /// Split into `[min, pivot]` and `[pivot, max]`.
    ///
    /// The pieces share the pivot point.
    pub fn split_at(&self, pivot: u32) -> Result<(Interval, Interval), NotContained> {
        if !self.contains_point(pivot) {
            return Err(NotContained);
        }

        Ok((Interval { min: self.min, max: pivot }, Interval { min: pivot, max: self.max }))
    }

    /// Split into `[min, pivot.max]` and `[pivot.min, max]`.
    ///
    /// The pieces overlap on the pivot.
    pub fn split_by(&self, pivot: &Interval) -> Result<(Interval, Interval), NotContained> {
        if !self.contains(pivot) {
            return Err(NotContained);
        }

        Ok((Interval { min: self.min, max: pivot.max }, Interval { min: pivot.min, max: self.max }))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

impl fmt::Display for NotContained {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "pivot not contained in interval")
    }
}

impl std::error::Error for NotContained {}

/// Partition an arbitrary set of intervals into pieces that do not overlap.
///
/// The union of the output equals the union of the input. Intervals are first grouped into
/// closures, maximal runs in which each interval starts no later than the furthest end seen so
/// far in the run. Intervals that only touch (`a.max + 1 == b.min`) belong to different closures.
///
/// With `merge_points` each closure yields one interval spanning it. Otherwise every endpoint in
/// the closure becomes a boundary and consecutive boundaries `p0 < p1 < .. < pk` yield the pieces
/// `[p0, p1], [p1, p2], ..`, which share their boundaries. A closure with a single boundary point
/// yields that point.
///
/// The output is sorted. Feeding it back in with `merge_points == false` reproduces it.
pub fn disjoin<I>(intervals: I, merge_points: bool) -> Vec<Interval>
    where I: IntoIterator<Item=Interval>,
{
    let mut sorted: Vec<Interval> = intervals.into_iter().collect();
    sorted.sort_by_key(|iv| (iv.min, iv.max));
    sorted.dedup();

    let mut disjoined = Vec::new();
    let mut points = Vec::new();
    let mut rest = &sorted[..];

    while let Some(first) = rest.first() {
        let mut reach = first.max;
        let end = rest.iter()
            .position(|next| {
                if next.min > reach {
                    true
                } else {
                    reach = reach.max(next.max);
                    false
                }
            })
            .unwrap_or(rest.len());
        let (closure, tail) = rest.split_at(end);
        rest = tail;

        if merge_points {
            disjoined.push(Interval { min: first.min, max: reach });
            continue;
        }

        points.clear();
        points.extend(closure.iter().flat_map(|iv| iter::once(iv.min).chain(iter::once(iv.max))));
        points.sort();
        points.dedup();

        if let [single] = points[..] {
            disjoined.push(Interval::point(single));
        } else {
            disjoined.extend(points.windows(2).map(|pair| Interval { min: pair[0], max: pair[1] }));
        }
    }

    disjoined
}

#[cfg(test)]
mod test {
    use super::*;

    fn iv(min: u32, max: u32) -> Interval {
        Interval::new(min, max)
    }

    fn covers(intervals: &[Interval], point: u32) -> bool {
        intervals.iter().any(|iv| iv.contains_point(point))
    }

    #[test]
    #[should_panic]
    fn reversed_bounds() {
        Interval::new(4, 3);
    }

    #[test]
    fn bounds_of_owned() {
        let owned = iv(3, 9);
        assert_eq!(owned.min(), 3);
        assert_eq!(owned.max(), 9);
        assert_eq!(owned.max().checked_add(1), Some(10));
    }

    #[test]
    fn disjoin_unsorted() {
        let input = vec![iv(8, 9), iv(0, 2), iv(8, 9), iv(1, 4)];
        assert_eq!(disjoin(input, true), vec![iv(0, 4), iv(8, 9)]);
    }

    #[test]
    fn relations() {
        let a = iv(0, 7);
        assert_eq!(a.width(), 7);
        assert!(a.intersects(&iv(7, 9)));
        assert!(!a.intersects(&iv(8, 9)));
        assert!(a.is_adjacent(&iv(8, 9)));
        assert!(iv(8, 9).is_adjacent(&a));
        assert!(!a.is_adjacent(&iv(9, 9)));
        assert!(a.contains(&iv(2, 3)));
        assert!(!iv(2, 3).contains(&a));
        assert!(iv(2, 3).nested_with(&a));
        assert!(!iv(2, 9).nested_with(&a));
        assert_eq!(Interval::with_len(8, 8), Some(iv(8, 15)));
        assert_eq!(Interval::with_len(8, 0), None);
        assert_eq!(Interval::with_len(u32::max_value(), 2), None);
    }

    #[test]
    fn split() {
        assert_eq!(iv(0, 10).split_at(4), Ok((iv(0, 4), iv(4, 10))));
        assert_eq!(iv(0, 10).split_at(11), Err(NotContained));
        assert_eq!(iv(0, 10).split_by(&iv(3, 5)), Ok((iv(0, 5), iv(3, 10))));
        assert_eq!(iv(0, 10).split_by(&iv(3, 15)), Err(NotContained));
    }

    #[test]
    fn disjoin_merged() {
        let input = vec![iv(10, 12), iv(0, 4), iv(3, 6), iv(5, 5), iv(7, 8), iv(0, 4)];
        assert_eq!(disjoin(input, true), vec![iv(0, 6), iv(7, 8), iv(10, 12)]);
    }

    #[test]
    fn disjoin_split_points() {
        let input = vec![iv(0, 4), iv(2, 8), iv(20, 20)];
        assert_eq!(disjoin(input, false),
                   vec![iv(0, 2), iv(2, 4), iv(4, 8), iv(20, 20)]);
    }

    #[test]
    fn disjoin_chained_closure() {
        // The third interval only reaches the first through the second.
        let input = vec![iv(0, 3), iv(3, 10), iv(9, 12), iv(13, 14)];
        assert_eq!(disjoin(input, true), vec![iv(0, 12), iv(13, 14)]);
    }

    #[test]
    fn disjoin_properties() {
        let input = vec![
            iv(5, 9), iv(0, 2), iv(1, 6), iv(30, 31), iv(15, 15),
            iv(16, 20), iv(18, 25), iv(2, 2), iv(40, 44), iv(41, 42),
        ];

        for &merge in &[true, false] {
            let output = disjoin(input.clone(), merge);

            for point in 0..50 {
                assert_eq!(covers(&input, point), covers(&output, point), "point {}", point);
            }

            for pair in output.windows(2) {
                if merge {
                    assert!(!pair[0].intersects(&pair[1]));
                } else {
                    // Pieces may share a boundary point but nothing more.
                    assert!(pair[0].max() <= pair[1].min());
                }
            }

            if !merge {
                assert_eq!(disjoin(output.clone(), false), output);
            }
        }
    }

    #[test]
    fn disjoin_empty() {
        assert_eq!(disjoin(Vec::new(), false), Vec::new());
    }
}
