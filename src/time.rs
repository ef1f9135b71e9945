//! The continuous time model used throughout the crate.
//!
//! All quantities are thin wrappers around `f64`. Only the
//! combinations that make physical sense are provided as operators,
//! e.g., the difference of two [Instant]s is a [Duration], and
//! [Work] processed over a [Duration] yields a [Speed].

use derive_more::{Add, AddAssign, Display, From, Into, Sub, SubAssign, Sum};
use std::cmp::Ordering;
use std::ops;

/// Relative error budget of a time point, in units of its magnitude.
const ROUNDING: f64 = 64.0 * f64::EPSILON;

/// A point on the (real-valued) timeline.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, From, Into)]
pub struct Instant(f64);

/// The length of an interval.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    Display,
    From,
    Into,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
)]
pub struct Duration(f64);

/// An amount of processing, measured in time units at speed 1.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    Display,
    From,
    Into,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
)]
pub struct Work(f64);

/// A processor speed (frequency factor). Processing `w` units of
/// [Work] at speed `s` takes `w / s` time units.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, From, Into)]
pub struct Speed(f64);

/// Energy consumed by the processor.
#[derive(
    Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, From, Into, Add, AddAssign, Sum,
)]
pub struct Energy(f64);

impl Instant {
    /// The origin of the timeline.
    pub const fn zero() -> Instant {
        Instant(0.0)
    }

    /// Total order on instants (see [f64::total_cmp]).
    pub fn total_cmp(&self, other: &Instant) -> Ordering {
        self.0.total_cmp(&other.0)
    }

    /// The rounding error that accumulates in points of a timeline
    /// extending up to `self` as windows are compressed and expanded.
    pub(crate) fn rounding_slack(self) -> Duration {
        Duration(self.0.abs() * ROUNDING)
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub fn min(self, other: Instant) -> Instant {
        Instant(self.0.min(other.0))
    }

    pub fn max(self, other: Instant) -> Instant {
        Instant(self.0.max(other.0))
    }
}

impl Duration {
    pub const fn zero() -> Duration {
        Duration(0.0)
    }

    pub fn max(self, other: Duration) -> Duration {
        Duration(self.0.max(other.0))
    }
}

impl Work {
    pub const fn zero() -> Work {
        Work(0.0)
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub fn max(self, other: Work) -> Work {
        Work(self.0.max(other.0))
    }
}

impl Speed {
    /// Raise the speed to the power `exponent`.
    pub fn powf(self, exponent: f64) -> f64 {
        self.0.powf(exponent)
    }
}

impl ops::Sub for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl ops::Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant(self.0 + rhs.0)
    }
}

impl ops::Sub<Duration> for Instant {
    type Output = Instant;

    fn sub(self, rhs: Duration) -> Instant {
        Instant(self.0 - rhs.0)
    }
}

impl ops::AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0
    }
}

impl ops::SubAssign<Duration> for Instant {
    fn sub_assign(&mut self, rhs: Duration) {
        self.0 -= rhs.0
    }
}

impl ops::Div<Duration> for Work {
    type Output = Speed;

    fn div(self, rhs: Duration) -> Speed {
        Speed(self.0 / rhs.0)
    }
}

impl ops::Div<Speed> for Work {
    type Output = Duration;

    fn div(self, rhs: Speed) -> Duration {
        Duration(self.0 / rhs.0)
    }
}

impl ops::Mul<Duration> for Speed {
    type Output = Work;

    fn mul(self, rhs: Duration) -> Work {
        Work(self.0 * rhs.0)
    }
}
