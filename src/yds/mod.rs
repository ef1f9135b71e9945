/*! Energy-minimal speed scaling (**YDS**)

This module implements the offline algorithm of Yao, Demers, and
Shenker for scheduling jobs with release times, deadlines, and
processing demands on a single variable-speed processor such that
all deadlines are met and the energy consumed under any convex power
function is minimized.

The schedule is built in two phases:

1. *Peeling*: the [critical interval][crate::density::densest_interval]
   is identified, its jobs are fixed to run at the interval's density,
   and the interval is cut out of the timeline. This repeats on the
   compressed timeline until no jobs remain.
2. *Reconstruction*: the intervals are mapped back onto the real
   timeline in the order in which they were cut, and the jobs of each
   interval are dispatched by preemptive EDF at the interval's speed.

## Citation

- F. Yao, A. Demers, and S. Shenker, “A Scheduling Model for Reduced CPU Energy”, *Proceedings of the 36th Annual Symposium on Foundations of Computer Science (FOCS 1995)*, pp.&nbsp;374--382, 1995.
*/

use std::fmt::Display;

use tracing::{debug, trace};

use crate::config::Config;
use crate::job::{self, Job, MalformedJob};
use crate::time::Instant;

mod edf;
mod peel;
mod schedule;
mod timeline;

pub use schedule::{CriticalGroup, InvariantViolation, Schedule, ScheduleEntry};
pub use timeline::Segment;

use peel::Group;
use timeline::Timeline;

/// Compute an energy-minimal schedule for `jobs` using the default
/// [Config].
///
/// See [schedule_with] for details.
pub fn schedule<Id>(jobs: &[Job<Id>]) -> Result<Schedule<Id>, MalformedJob<Id>>
where
    Id: Clone + Display,
{
    schedule_with(jobs, &Config::default())
}

/// Compute an energy-minimal schedule for `jobs`.
///
/// All jobs are validated first; if any job is malformed, the first
/// offender (in input order) is reported and nothing is scheduled.
/// An empty job set yields an empty schedule.
///
/// The resulting entries are ordered by start time and do not
/// overlap. The processor is busy whenever at least one job's window
/// is open. If `config.verify` is set, the result is audited with
/// [Schedule::verify] and any violation causes a panic, as it
/// indicates a bug rather than a problem with the input.
pub fn schedule_with<Id>(jobs: &[Job<Id>], config: &Config) -> Result<Schedule<Id>, MalformedJob<Id>>
where
    Id: Clone + Display,
{
    job::validate(jobs)?;
    if jobs.is_empty() {
        return Ok(Schedule::empty());
    }

    let groups = peel::peel(jobs, config.epsilon);
    debug!(jobs = jobs.len(), groups = groups.len(), "peeling complete");
    let schedule = reconstruct(jobs, &groups);

    if config.verify {
        if let Err(violation) = schedule.verify(jobs, config.epsilon) {
            panic!("YDS produced an invalid schedule: {}", violation);
        }
    }
    Ok(schedule)
}

/// Resolve the groups' compressed coordinates to absolute time and
/// dispatch each group's jobs.
fn reconstruct<Id>(jobs: &[Job<Id>], groups: &[Group]) -> Schedule<Id>
where
    Id: Clone + Display,
{
    let mut timeline = Timeline::new(horizon(jobs));
    let mut entries = Vec::with_capacity(jobs.len());
    let mut critical = Vec::with_capacity(groups.len());

    for group in groups {
        for piece in edf::dispatch(&group.members, group.start, group.speed) {
            for (start, end) in timeline.expand(piece.start, piece.end) {
                trace!(job = %jobs[piece.job].id, start = %start, end = %end, "placed");
                entries.push(ScheduleEntry {
                    id: jobs[piece.job].id.clone(),
                    start,
                    end,
                    speed: group.speed,
                    job: piece.job,
                });
            }
        }

        let segments = timeline.expand(group.start, group.end);
        timeline.claim(segments.iter().copied());

        let mut members: Vec<usize> = group.members.iter().map(|m| m.index).collect();
        members.sort_unstable();
        critical.push(CriticalGroup {
            speed: group.speed,
            jobs: members.into_iter().map(|idx| jobs[idx].id.clone()).collect(),
            segments,
        });
    }

    entries.sort_by(|a, b| a.start.total_cmp(&b.start));
    Schedule {
        entries,
        groups: critical,
        busy: timeline.claimed().to_vec(),
    }
}

/// The latest deadline, which bounds every point of the schedule.
fn horizon<Id>(jobs: &[Job<Id>]) -> Instant {
    jobs.iter().map(|j| j.deadline).fold(Instant::zero(), Instant::max)
}
