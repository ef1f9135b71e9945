//! EDF dispatching of the jobs of a single critical interval.

use std::cmp::Ordering;

use tracing::trace;

use super::peel::PendingJob;
use crate::time::{Instant, Speed, Work};

/// A contiguous stretch of (compressed) time during which one job runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Piece {
    /// Position of the job in the caller's input.
    pub job: usize,
    pub start: Instant,
    pub end: Instant,
}

/// The EDF priority order: earlier deadline first, then earlier
/// release, then earlier position in the input.
pub(crate) fn edf_order(a: &PendingJob, b: &PendingJob) -> Ordering {
    a.deadline
        .total_cmp(&b.deadline)
        .then(a.release.total_cmp(&b.release))
        .then(a.index.cmp(&b.index))
}

/// Run the given jobs by preemptive EDF at a constant `speed`,
/// starting at `start`.
///
/// A pending job is preempted only when another job is released, and
/// only if the newly released job has higher EDF priority. Inside a
/// critical interval the processor never idles and every job finishes
/// by its deadline; if all jobs share a release time the result is
/// simply the jobs laid out back to back in EDF order.
///
/// A job is finished once it runs up to its computed completion time,
/// no matter how little work it requires.
pub(crate) fn dispatch(jobs: &[PendingJob], start: Instant, speed: Speed) -> Vec<Piece> {
    let mut remaining: Vec<Work> = jobs.iter().map(|j| j.work).collect();
    let mut finished = vec![false; jobs.len()];
    let mut pieces: Vec<Piece> = Vec::with_capacity(jobs.len());
    let mut now = start;

    loop {
        let unfinished: Vec<usize> = (0..jobs.len()).filter(|k| !finished[*k]).collect();
        let next_release = unfinished
            .iter()
            .map(|k| jobs[*k].release)
            .filter(|r| *r > now)
            .min_by(Instant::total_cmp);
        let ready = unfinished
            .iter()
            .copied()
            .filter(|k| jobs[*k].release <= now)
            .min_by(|a, b| edf_order(&jobs[*a], &jobs[*b]));

        let k = match (ready, next_release) {
            (Some(k), _) => k,
            (None, Some(release)) => {
                trace!(from = %now, until = %release, "idle");
                now = release;
                continue;
            }
            (None, None) => break,
        };

        let completion = now + remaining[k].max(Work::zero()) / speed;
        let end = match next_release {
            // a release that coincides with the completion up to
            // rounding does not preempt
            Some(release) if release < completion - completion.rounding_slack() => {
                remaining[k] -= speed * (release - now);
                release
            }
            _ => {
                finished[k] = true;
                completion
            }
        };

        // rounding may leave a preempted job with nothing to do
        if end > now {
            match pieces.last_mut() {
                Some(last) if last.job == jobs[k].index && last.end == now => last.end = end,
                _ => pieces.push(Piece {
                    job: jobs[k].index,
                    start: now,
                    end,
                }),
            }
            now = end;
        }
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{i, w};

    fn pending(index: usize, release: f64, deadline: f64, work: f64) -> PendingJob {
        PendingJob {
            index,
            release: i(release),
            deadline: i(deadline),
            work: w(work),
        }
    }

    #[test]
    fn common_release_runs_back_to_back() {
        let jobs = vec![
            pending(0, 0.0, 8.0, 2.0),
            pending(1, 0.0, 4.0, 1.0),
            pending(2, 0.0, 6.0, 1.0),
        ];
        let pieces = dispatch(&jobs, i(0.0), Speed::from(0.5));
        let order: Vec<usize> = pieces.iter().map(|p| p.job).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!((pieces[0].start, pieces[0].end), (i(0.0), i(2.0)));
        assert_eq!((pieces[1].start, pieces[1].end), (i(2.0), i(4.0)));
        assert_eq!((pieces[2].start, pieces[2].end), (i(4.0), i(8.0)));
    }

    #[test]
    fn later_release_with_earlier_deadline_preempts() {
        let jobs = vec![pending(0, 0.0, 4.0, 3.0), pending(1, 1.0, 3.0, 1.5)];
        let pieces = dispatch(&jobs, i(0.0), Speed::from(1.125));
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].job, 0);
        assert_eq!(pieces[1].job, 1);
        assert_eq!(pieces[2].job, 0);
        assert_eq!(pieces[0].end, i(1.0));
        assert!(pieces[1].start >= jobs[1].release);
        assert!((f64::from(pieces[2].end) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn release_of_lower_priority_job_does_not_split() {
        let jobs = vec![pending(0, 0.0, 2.0, 2.0), pending(1, 1.0, 4.0, 2.0)];
        let pieces = dispatch(&jobs, i(0.0), Speed::from(1.0));
        assert_eq!(pieces.len(), 2);
        assert_eq!((pieces[0].job, pieces[0].start, pieces[0].end), (0, i(0.0), i(2.0)));
        assert_eq!((pieces[1].job, pieces[1].start, pieces[1].end), (1, i(2.0), i(4.0)));
    }

    #[test]
    fn deadline_ties_follow_release_then_input_order() {
        let jobs = vec![
            pending(3, 0.0, 4.0, 1.0),
            pending(1, 0.0, 4.0, 1.0),
            pending(2, 0.0, 4.0, 1.0),
            pending(0, 0.0, 4.0, 1.0),
        ];
        let pieces = dispatch(&jobs, i(0.0), Speed::from(1.0));
        let order: Vec<usize> = pieces.iter().map(|p| p.job).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn negligible_work_still_runs() {
        let jobs = vec![pending(0, 0.0, 2.0, 1.0), pending(1, 0.0, 1.0, 5e-10)];
        let pieces = dispatch(&jobs, i(0.0), Speed::from(0.5 + 2.5e-10));
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].job, 1);
        assert_eq!(pieces[0].start, i(0.0));
        assert!(pieces[0].end > i(0.0));
        assert_eq!(pieces[1].start, pieces[0].end);
        assert!((f64::from(pieces[1].end) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn preemption_leaves_no_empty_pieces() {
        let jobs = vec![
            pending(0, 0.0, 3.0, 1e-12),
            pending(1, 1e-13, 3.0, 1e-12),
            pending(2, 0.0, 1e-12, 1e-12),
        ];
        let pieces = dispatch(&jobs, i(0.0), Speed::from(1.0));
        assert!(pieces.iter().all(|p| p.end > p.start));
        let mut jobs_run: Vec<usize> = pieces.iter().map(|p| p.job).collect();
        jobs_run.sort_unstable();
        jobs_run.dedup();
        assert_eq!(jobs_run, vec![0, 1, 2]);
    }
}
