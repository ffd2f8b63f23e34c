use std::ops::{Bound, Range, RangeBounds};

use thiserror::Error;
use tracing::debug;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The request is empty or reaches outside `[0, len)`.
    #[error("range [{start}, {end}) is empty or out of bounds for length {len}")]
    OutOfRange {
        start: usize,
        end: usize,
        len: usize,
    },
}

fn reject<T>(start: usize, end: usize, len: usize) -> Result<T> {
    debug!(start, end, len, "rejected out-of-range request");
    Err(Error::OutOfRange { start, end, len })
}

/// Resolves `range` to a non-empty half-open `[start, end)` inside `[0, len)`.
pub(crate) fn normalize_range<R: RangeBounds<usize>>(range: R, len: usize) -> Result<Range<usize>> {
    let start = match range.start_bound() {
        Bound::Included(&start) => Some(start),
        Bound::Excluded(&start) => start.checked_add(1),
        Bound::Unbounded => Some(0),
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.checked_add(1),
        Bound::Excluded(&end) => Some(end),
        Bound::Unbounded => Some(len),
    };

    match (start, end) {
        (Some(start), Some(end)) if start < end && end <= len => Ok(start..end),
        (start, end) => reject(start.unwrap_or(usize::MAX), end.unwrap_or(usize::MAX), len),
    }
}

pub(crate) fn check_position(position: usize, len: usize) -> Result<()> {
    if position < len {
        Ok(())
    } else {
        reject(position, position.saturating_add(1), len)
    }
}

/// `start` may equal `len`; it marks the empty suffix.
pub(crate) fn check_start(start: usize, len: usize) -> Result<()> {
    if start <= len {
        Ok(())
    } else {
        reject(start, start, len)
    }
}
