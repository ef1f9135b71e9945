/*! Interval density analysis

The *density* of an interval `[t1, t2)` is the total work of all jobs
whose windows lie entirely within the interval, divided by the
interval's length. It lower-bounds the speed at which any feasible
schedule must run on average throughout the interval.

The analysis in this module finds the interval of maximum density,
the so-called *critical interval*, among all intervals delimited by
release times and deadlines. It is the key step of the
Yao–Demers–Shenker algorithm implemented in [crate::yds].

## Citation

- F. Yao, A. Demers, and S. Shenker, “A Scheduling Model for Reduced CPU Energy”, *Proceedings of the 36th Annual Symposium on Foundations of Computer Science (FOCS 1995)*, pp.&nbsp;374--382, 1995.
*/

use crate::job::Window;
use crate::time::{Duration, Instant, Speed, Work};

/// An interval of maximum density and the jobs confined to it.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalInterval {
    pub start: Instant,
    pub end: Instant,
    /// Total work of the jobs contained in `[start, end)`.
    pub work: Work,
    /// Indices (into the analyzed slice) of the jobs contained in
    /// `[start, end)`, in ascending order.
    pub members: Vec<usize>,
}

impl CriticalInterval {
    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// The minimum speed at which the contained jobs can be processed.
    pub fn density(&self) -> Speed {
        self.work / self.length()
    }
}

/// A candidate interval encountered during the search.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: Instant,
    end: Instant,
    work: Work,
}

impl Candidate {
    fn length(&self) -> Duration {
        self.end - self.start
    }

    fn density(&self) -> f64 {
        f64::from(self.work / self.length())
    }

    /// Strictly higher density wins; at equal density, the narrower
    /// interval wins. Remaining ties go to the candidate seen first.
    ///
    /// Densities and lengths are compared relative to their magnitude,
    /// so the outcome does not depend on the units of time and work.
    fn improves_on(&self, other: &Candidate, epsilon: f64) -> bool {
        let (mine, theirs) = (self.density(), other.density());
        let tolerance = epsilon * mine.max(theirs);
        if (mine - theirs).abs() > tolerance {
            return mine > theirs;
        }
        let (mine, theirs) = (f64::from(self.length()), f64::from(other.length()));
        mine < theirs - epsilon * theirs
    }
}

/// The distinct release times and deadlines of the given jobs in
/// ascending order. Only exact duplicates are merged, so every
/// non-empty window is delimited by two distinct points.
pub fn breakpoints<W: Window>(jobs: &[W]) -> Vec<Instant> {
    let mut points: Vec<Instant> = jobs
        .iter()
        .flat_map(|j| [j.release(), j.deadline()])
        .collect();
    points.sort_by(Instant::total_cmp);
    points.dedup();
    points
}

/// Total work of all jobs whose windows lie within `[start, end)`.
pub fn contained_work<W: Window>(jobs: &[W], start: Instant, end: Instant) -> Work {
    jobs.iter()
        .filter(|j| j.is_contained_in(start, end))
        .map(|j| j.work())
        .sum()
}

/// The density of the interval `[start, end)` w.r.t. the given jobs.
pub fn density<W: Window>(jobs: &[W], start: Instant, end: Instant) -> Speed {
    assert!(start < end);
    contained_work(jobs, start, end) / (end - start)
}

/// Find the interval of maximum density among all intervals whose
/// endpoints are [breakpoints] of `jobs`.
///
/// Ties are broken deterministically: among intervals of equal
/// density (up to a relative error of `epsilon`), the shortest one is
/// chosen, and among those, the one with the lexicographically
/// smallest `(start, end)`.
///
/// Returns `None` if no interval contains any job, which is the case
/// exactly if `jobs` is empty (or contains only malformed jobs).
pub fn densest_interval<W: Window>(jobs: &[W], epsilon: f64) -> Option<CriticalInterval> {
    let points = breakpoints(jobs);
    let mut best: Option<Candidate> = None;

    for (i, &start) in points.iter().enumerate() {
        // Sweep the end point to the right, picking up jobs in order
        // of their deadlines as soon as they are fully contained.
        let mut eligible: Vec<(Instant, Work)> = jobs
            .iter()
            .filter(|j| j.release() >= start)
            .map(|j| (j.deadline(), j.work()))
            .collect();
        eligible.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut eligible = eligible.into_iter().peekable();

        let mut work = Work::zero();
        for &end in &points[i + 1..] {
            while let Some((_, w)) = eligible.next_if(|(deadline, _)| *deadline <= end) {
                work += w;
            }
            // empty intervals are never critical
            if work <= Work::zero() {
                continue;
            }
            let candidate = Candidate { start, end, work };
            if best.map_or(true, |b| candidate.improves_on(&b, epsilon)) {
                best = Some(candidate);
            }
        }
    }

    best.map(|b| {
        let members: Vec<usize> = jobs
            .iter()
            .enumerate()
            .filter(|(_, j)| j.is_contained_in(b.start, b.end))
            .map(|(idx, _)| idx)
            .collect();
        CriticalInterval {
            start: b.start,
            end: b.end,
            work: members.iter().map(|idx| jobs[*idx].work()).sum(),
            members,
        }
    })
}
