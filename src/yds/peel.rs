//! Phase 1: repeatedly cut the critical interval out of the timeline.

use tracing::{debug, trace};

use crate::density;
use crate::job::Window;
use crate::time::{Instant, Speed, Work};

/// A job that has not yet been assigned to a critical interval,
/// together with its current, possibly compressed, window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PendingJob {
    /// Position of the job in the caller's input.
    pub index: usize,
    pub release: Instant,
    pub deadline: Instant,
    pub work: Work,
}

impl PendingJob {
    fn new<W: Window>(index: usize, job: &W) -> Self {
        PendingJob {
            index,
            release: job.release(),
            deadline: job.deadline(),
            work: job.work(),
        }
    }

    /// Excise `[start, end)` from the job's window.
    fn compress(&mut self, start: Instant, end: Instant) {
        self.release = squash(self.release, start, end);
        self.deadline = squash(self.deadline, start, end);
    }
}

impl Window for PendingJob {
    fn release(&self) -> Instant {
        self.release
    }

    fn deadline(&self) -> Instant {
        self.deadline
    }

    fn work(&self) -> Work {
        self.work
    }
}

/// Where the point `t` ends up once `[start, end)` is removed from the
/// timeline and everything after it is shifted to the left. Points
/// inside the removed interval collapse onto `start`.
///
/// Points after the cut keep their exact distance from `end`, so a
/// window reaching past the cut never shrinks to nothing.
fn squash(t: Instant, start: Instant, end: Instant) -> Instant {
    if t <= start {
        t
    } else if t < end {
        start
    } else {
        start + (t - end)
    }
}

/// One critical interval, expressed in the compressed coordinates
/// that were current when it was cut.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Group {
    pub start: Instant,
    pub end: Instant,
    pub speed: Speed,
    /// The captured jobs, with their windows as of the cut.
    pub members: Vec<PendingJob>,
}

/// Peel critical intervals off the given jobs until none remain.
///
/// Groups are returned in the order in which they were cut, which is
/// also the order of non-increasing speed.
pub(crate) fn peel<W: Window>(jobs: &[W], epsilon: f64) -> Vec<Group> {
    let mut pending: Vec<PendingJob> = jobs
        .iter()
        .enumerate()
        .map(|(index, job)| PendingJob::new(index, job))
        .collect();
    let mut groups = Vec::new();

    while !pending.is_empty() {
        let critical = density::densest_interval(&pending, epsilon).unwrap_or_else(|| {
            panic!(
                "no critical interval found among {} pending jobs",
                pending.len()
            )
        });
        let speed = critical.density();
        debug!(
            round = groups.len(),
            start = %critical.start,
            end = %critical.end,
            speed = %speed,
            jobs = critical.members.len(),
            "cutting critical interval"
        );

        // `members` is sorted, so one pass splits the pending set.
        let mut members = Vec::with_capacity(critical.members.len());
        let mut remaining = Vec::with_capacity(pending.len() - critical.members.len());
        let mut captured = critical.members.iter().peekable();
        for (idx, job) in pending.into_iter().enumerate() {
            if captured.next_if(|m| **m == idx).is_some() {
                members.push(job);
            } else {
                remaining.push(job);
            }
        }

        for job in remaining.iter_mut() {
            job.compress(critical.start, critical.end);
            trace!(
                job = job.index,
                release = %job.release,
                deadline = %job.deadline,
                "compressed window"
            );
        }
        pending = remaining;

        groups.push(Group {
            start: critical.start,
            end: critical.end,
            speed,
            members,
        });
    }

    groups
}
