//! Jobs, the common [Window] interface, and input validation.

use auto_impl::auto_impl;
use thiserror::Error;

use crate::time::{Instant, Work};

/// Anything that occupies a feasibility window on the timeline and
/// requires a certain amount of processing within it.
///
/// Both the caller-supplied [Job]s and the internal, time-compressed
/// copies maintained by the schedule builder expose this view, so
/// that the [density analysis][crate::density] can work on either.
#[auto_impl(&, Box, Rc)]
pub trait Window {
    /// The earliest time at which processing may start.
    fn release(&self) -> Instant;

    /// The time by which all processing must be complete.
    fn deadline(&self) -> Instant;

    /// The amount of processing required (at speed 1).
    fn work(&self) -> Work;

    /// Does the window lie within `[start, end)`?
    ///
    /// The comparison is exact: interval bounds are always taken from
    /// the release times and deadlines themselves.
    fn is_contained_in(&self, start: Instant, end: Instant) -> bool {
        self.release() >= start && self.deadline() <= end
    }
}

/// A job with a release time, a deadline, and a processing demand.
///
/// The `id` is opaque to the scheduler: it is carried through to the
/// output for labeling and otherwise never inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct Job<Id> {
    pub id: Id,
    pub release: Instant,
    pub deadline: Instant,
    pub work: Work,
}

impl<Id> Job<Id> {
    pub fn new(
        id: Id,
        release: impl Into<Instant>,
        deadline: impl Into<Instant>,
        work: impl Into<Work>,
    ) -> Self {
        Job {
            id,
            release: release.into(),
            deadline: deadline.into(),
            work: work.into(),
        }
    }
}

impl<Id: Clone> Job<Id> {
    /// Check that the job is well-formed: finite parameters, a
    /// non-negative release time, a non-empty window, and strictly
    /// positive work.
    pub fn validate(&self) -> Result<(), MalformedJob<Id>> {
        if !(self.release.is_finite() && self.deadline.is_finite() && self.work.is_finite()) {
            return Err(MalformedJob::NonFiniteParameter {
                id: self.id.clone(),
            });
        }
        if self.release < Instant::zero() {
            return Err(MalformedJob::NegativeRelease {
                id: self.id.clone(),
                release: self.release,
            });
        }
        if self.release >= self.deadline {
            return Err(MalformedJob::EmptyWindow {
                id: self.id.clone(),
                release: self.release,
                deadline: self.deadline,
            });
        }
        if self.work <= Work::zero() {
            return Err(MalformedJob::NonPositiveWork {
                id: self.id.clone(),
                work: self.work,
            });
        }
        Ok(())
    }
}

impl<Id> Window for Job<Id> {
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

/// Error type returned when the input contains a job that cannot be
/// scheduled under any speed assignment.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MalformedJob<Id> {
    /// Release time, deadline, or work is NaN or infinite.
    #[error("job {id} has a non-finite parameter")]
    NonFiniteParameter { id: Id },
    /// The job is released before time zero.
    #[error("job {id} is released at {release}, before time zero")]
    NegativeRelease { id: Id, release: Instant },
    /// The release time is not strictly before the deadline.
    #[error("job {id} has release time {release} >= deadline {deadline}")]
    EmptyWindow {
        id: Id,
        release: Instant,
        deadline: Instant,
    },
    /// The job requires no (or negative) processing.
    #[error("job {id} has non-positive work {work}")]
    NonPositiveWork { id: Id, work: Work },
}

impl<Id> MalformedJob<Id> {
    /// The identity of the offending job.
    pub fn id(&self) -> &Id {
        match self {
            MalformedJob::NonFiniteParameter { id }
            | MalformedJob::NegativeRelease { id, .. }
            | MalformedJob::EmptyWindow { id, .. }
            | MalformedJob::NonPositiveWork { id, .. } => id,
        }
    }
}

/// Validate all jobs in input order and report the first offender.
pub fn validate<Id>(jobs: &[Job<Id>]) -> Result<(), MalformedJob<Id>>
where
    Id: Clone,
{
    jobs.iter().try_for_each(Job::validate)
}
