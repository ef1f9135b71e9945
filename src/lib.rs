/*! Energy-minimal speed scaling for jobs with deadlines

This crate computes, for a static set of jobs with release times,
deadlines, and processing demands, a schedule on a single
variable-speed processor that meets all deadlines while minimizing the
energy consumed under any convex power function of speed. It
implements the classic critical-interval algorithm of Yao, Demers, and
Shenker.

```
use speed_scaling::job::Job;
use speed_scaling::yds;

let jobs = vec![Job::new("a", 0.0, 10.0, 1.0), Job::new("b", 4.0, 6.0, 10.0)];
let schedule = yds::schedule(&jobs).unwrap();
assert_eq!(schedule.entries().len(), 3);
```
*/

pub mod config;
pub mod density;
pub mod energy;
pub mod job;
pub mod time;
pub mod yds;

pub use config::Config;
