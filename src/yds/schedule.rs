use itertools::Itertools;
use thiserror::Error;

use super::timeline::Segment;
use crate::energy::PowerModel;
use crate::job::Job;
use crate::time::{Duration, Energy, Instant, Speed, Work};

/// One stretch of processing of one job at a constant speed.
///
/// A job may be split across several entries, either because it is
/// preempted by a job with an earlier deadline, or because a faster
/// critical interval lies inside its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry<Id> {
    pub id: Id,
    pub start: Instant,
    pub end: Instant,
    pub speed: Speed,
    pub(crate) job: usize,
}

impl<Id> ScheduleEntry<Id> {
    /// Position of the scheduled job in the input.
    pub fn job_index(&self) -> usize {
        self.job
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The amount of work processed during this entry.
    pub fn work(&self) -> Work {
        self.speed * self.duration()
    }
}

/// A critical interval as it appears in the final schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalGroup<Id> {
    pub speed: Speed,
    /// The jobs processed in this interval, in input order.
    pub jobs: Vec<Id>,
    /// The absolute stretches of time covered by the interval. There
    /// is more than one if faster intervals were cut out of it earlier.
    pub segments: Vec<Segment>,
}

impl<Id> CriticalGroup<Id> {
    /// Start of the first segment, if there is one.
    pub fn start(&self) -> Option<Instant> {
        self.segments.first().map(|s| s.0)
    }

    /// End of the last segment, if there is one.
    pub fn end(&self) -> Option<Instant> {
        self.segments.last().map(|s| s.1)
    }

    /// Total processor time spent in this interval.
    pub fn length(&self) -> Duration {
        self.segments.iter().map(|(s, e)| *e - *s).sum()
    }
}

/// An energy-minimal speed schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule<Id> {
    pub(crate) entries: Vec<ScheduleEntry<Id>>,
    pub(crate) groups: Vec<CriticalGroup<Id>>,
    pub(crate) busy: Vec<Segment>,
}

impl<Id> Schedule<Id> {
    pub(crate) fn empty() -> Self {
        Schedule {
            entries: Vec::new(),
            groups: Vec::new(),
            busy: Vec::new(),
        }
    }

    /// All entries, ordered by start time.
    pub fn entries(&self) -> &[ScheduleEntry<Id>] {
        &self.entries
    }

    /// The critical intervals in the order in which they were
    /// identified, i.e., in order of non-increasing speed.
    pub fn groups(&self) -> &[CriticalGroup<Id>] {
        &self.groups
    }

    /// The maximal stretches of time during which the processor is busy.
    pub fn busy_periods(&self) -> &[Segment] {
        &self.busy
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start of the first and end of the last entry.
    pub fn span(&self) -> Option<(Instant, Instant)> {
        Some((self.entries.first()?.start, self.entries.last()?.end))
    }

    /// The highest speed used anywhere in the schedule.
    pub fn peak_speed(&self) -> Option<Speed> {
        self.groups.first().map(|g| g.speed)
    }

    /// Total energy consumed under the given power model.
    pub fn energy(&self, model: &impl PowerModel) -> Energy {
        self.entries
            .iter()
            .map(|e| model.energy(e.speed, e.duration()))
            .sum()
    }

    /// All entries of the job at position `job` in the input.
    pub fn entries_of(&self, job: usize) -> impl Iterator<Item = &ScheduleEntry<Id>> + '_ {
        self.entries.iter().filter(move |e| e.job == job)
    }

    /// Check the schedule against the jobs it was computed for.
    ///
    /// Verifies that entries do not overlap, that each entry lies
    /// within its job's window, that every job runs at a single speed
    /// and receives exactly its required work, and that the processor
    /// idles only while no job's window is open.
    ///
    /// All tolerances are relative: points in time may be off by
    /// `epsilon` times the latest deadline, and a job's processed work
    /// by `epsilon` times its required work, plus the rounding error
    /// of its entries' bounds.
    pub fn verify(&self, jobs: &[Job<Id>], epsilon: f64) -> Result<(), InvariantViolation> {
        let horizon = super::horizon(jobs);
        let rounding = horizon.rounding_slack();
        let eps = Duration::from(epsilon * f64::from(horizon)).max(rounding);

        for (a, b) in self.entries.iter().tuple_windows() {
            if b.start < a.end - eps {
                return Err(InvariantViolation::Overlap { at: b.start });
            }
            if b.start > a.end + eps {
                check_idle(jobs, a.end, b.start, eps)?;
            }
        }
        if let Some((first, last)) = self.span() {
            let lead = jobs.iter().map(|j| j.release).reduce(Instant::min);
            let tail = jobs.iter().map(|j| j.deadline).reduce(Instant::max);
            if let Some(lead) = lead.filter(|t| *t < first - eps) {
                check_idle(jobs, lead, first, eps)?;
            }
            if let Some(tail) = tail.filter(|t| *t > last + eps) {
                check_idle(jobs, last, tail, eps)?;
            }
        }

        for e in &self.entries {
            let job = jobs.get(e.job).ok_or(InvariantViolation::UnknownJob { job: e.job })?;
            if e.start < job.release - eps || e.end > job.deadline + eps {
                return Err(InvariantViolation::OutsideWindow {
                    job: e.job,
                    start: e.start,
                    end: e.end,
                });
            }
        }

        for (idx, job) in jobs.iter().enumerate() {
            let entries: Vec<&ScheduleEntry<Id>> = self.entries_of(idx).collect();
            let first = match entries.first() {
                Some(first) => first,
                None => {
                    return Err(InvariantViolation::WorkMismatch {
                        job: idx,
                        required: job.work,
                        processed: Work::zero(),
                    })
                }
            };
            if entries.iter().any(|e| e.speed != first.speed) {
                return Err(InvariantViolation::SpeedMismatch { job: idx });
            }
            let processed: Work = entries.iter().map(|e| e.work()).sum();
            let tolerance = epsilon * f64::from(job.work)
                + f64::from(first.speed * rounding) * 2.0 * entries.len() as f64;
            if (f64::from(processed) - f64::from(job.work)).abs() > tolerance {
                return Err(InvariantViolation::WorkMismatch {
                    job: idx,
                    required: job.work,
                    processed,
                });
            }
        }

        Ok(())
    }
}

/// Idling in `[start, end)` is fine only if no job can run then.
fn check_idle<Id>(
    jobs: &[Job<Id>],
    start: Instant,
    end: Instant,
    eps: Duration,
) -> Result<(), InvariantViolation> {
    match jobs
        .iter()
        .position(|j| j.release < end - eps && j.deadline > start + eps)
    {
        Some(job) => Err(InvariantViolation::Gap { start, end, job }),
        None => Ok(()),
    }
}

impl<Id> IntoIterator for Schedule<Id> {
    type Item = ScheduleEntry<Id>;
    type IntoIter = std::vec::IntoIter<ScheduleEntry<Id>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, Id> IntoIterator for &'a Schedule<Id> {
    type Item = &'a ScheduleEntry<Id>;
    type IntoIter = std::slice::Iter<'a, ScheduleEntry<Id>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Error type describing a schedule that violates a correctness
/// property. The scheduler never produces such schedules for
/// validated input; encountering one indicates a bug.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum InvariantViolation {
    /// Two entries occupy the processor at the same time.
    #[error("entries overlap at {at}")]
    Overlap { at: Instant },
    /// The processor idles although a job's window is open.
    #[error("processor idles during [{start}, {end}) while job #{job} is pending")]
    Gap {
        start: Instant,
        end: Instant,
        job: usize,
    },
    /// A job runs outside of its window.
    #[error("job #{job} runs during [{start}, {end}), outside of its window")]
    OutsideWindow {
        job: usize,
        start: Instant,
        end: Instant,
    },
    /// A job runs at more than one speed.
    #[error("job #{job} runs at more than one speed")]
    SpeedMismatch { job: usize },
    /// An entry refers to a job that is not part of the input.
    #[error("entry refers to unknown job #{job}")]
    UnknownJob { job: usize },
    /// A job receives more or less processing than it requires, or
    /// none at all.
    #[error("job #{job} requires {required} but receives {processed}")]
    WorkMismatch {
        job: usize,
        required: Work,
        processed: Work,
    },
}
