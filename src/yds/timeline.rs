//! Phase 2: translate compressed coordinates back onto the real timeline.

use itertools::Itertools;

use crate::time::{Duration, Instant};

/// A half-open stretch `[start, end)` of absolute time.
pub type Segment = (Instant, Instant);

/// The parts of the absolute timeline that have already been handed
/// out to critical intervals.
///
/// Groups are resolved in the order in which they were cut. When a
/// group is resolved, its coordinates are relative to a timeline from
/// which all earlier groups have been removed. Re-inserting those
/// removed stretches yields the group's absolute position.
#[derive(Debug, Clone)]
pub(crate) struct Timeline {
    /// Sorted, disjoint, and non-adjacent.
    claimed: Vec<Segment>,
    /// Points closer than this are the same point up to rounding.
    slack: Duration,
}

impl Timeline {
    /// An unclaimed timeline whose points do not exceed `horizon`.
    pub fn new(horizon: Instant) -> Self {
        Timeline {
            claimed: Vec::new(),
            slack: horizon.rounding_slack(),
        }
    }

    /// Map the compressed interval `[start, end)` to the absolute
    /// segments it covers. The result is split wherever an already
    /// claimed segment lies strictly inside the interval.
    pub fn expand(&self, start: Instant, end: Instant) -> Vec<Segment> {
        let eps = self.slack;
        let mut segments = Vec::new();
        let mut shift = Duration::zero();
        let mut lo = start;

        for &(claimed_start, claimed_end) in &self.claimed {
            // position of the claimed segment in compressed coordinates
            let position = claimed_start - shift;
            if position >= end - eps {
                break;
            }
            if position > lo + eps {
                segments.push((lo + shift, claimed_start));
                lo = position;
            }
            shift += claimed_end - claimed_start;
        }
        if end > lo {
            segments.push((lo + shift, end + shift));
        }
        segments
    }

    /// Mark the given absolute segments as taken.
    pub fn claim(&mut self, segments: impl IntoIterator<Item = Segment>) {
        let eps = self.slack;
        let mut claimed = std::mem::take(&mut self.claimed);
        claimed.extend(segments);
        claimed.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.claimed = claimed
            .into_iter()
            .coalesce(|a, b| {
                if b.0 <= a.1 + eps {
                    Ok((a.0, a.1.max(b.1)))
                } else {
                    Err((a, b))
                }
            })
            .collect();
    }

    /// The claimed stretches of the timeline, in ascending order.
    pub fn claimed(&self) -> &[Segment] {
        &self.claimed
    }
}
