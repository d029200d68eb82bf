use std::{fmt, slice::Iter};

/// Represent a range of time, from a start to an end, generally in seconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    pub(crate) fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Returns the start time of the range
    pub(crate) fn start(&self) -> f64 {
        self.start
    }

    /// Returns the end time of the range
    pub(crate) fn end(&self) -> f64 {
        self.end
    }
}

/// Abstracts non-contiguous chronological ranges of time, generally expressed in seconds.
///
/// Ranges are kept in the order in which they were reported, which for media buffers is in
/// ascending start order.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct TimeRanges {
    ranges: Vec<TimeRange>,
}

impl TimeRanges {
    /// Create a new empty `TimeRanges` object
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Build a `TimeRanges` object from a flat list of `f64` couples, as communicated by the
    /// JavaScript-side: the first value of each couple being the start of a contiguous range in
    /// seconds and the second its end.
    ///
    /// A trailing value without its end counterpart is ignored.
    pub(crate) fn from_flat(flat: &[f64]) -> Self {
        flat.chunks_exact(2)
            .map(|couple| TimeRange::new(couple[0], couple[1]))
            .collect()
    }

    /// Returns the starting time of the range whose index is given in argument.
    ///
    /// Returns `None` if the given index is superior or equal to the number of actual ranges.
    pub(crate) fn start(&self, idx: usize) -> Option<f64> {
        self.ranges.get(idx).map(|r| r.start)
    }
}

impl fmt::Display for TimeRanges {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.ranges.is_empty() {
            return write!(f, "(empty)");
        }
        for (i, range) in self.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}, {})", range.start(), range.end())?;
        }
        Ok(())
    }
}

impl FromIterator<TimeRange> for TimeRanges {
    fn from_iter<I: IntoIterator<Item = TimeRange>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TimeRanges {
    type Item = &'a TimeRange;
    type IntoIter = Iter<'a, TimeRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
