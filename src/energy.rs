/*! Models of processor power consumption

The schedules computed by [crate::yds] are energy-optimal for *every*
convex power function simultaneously. The models in this module are
therefore needed only to evaluate a schedule, not to compute one.
*/

use auto_impl::auto_impl;

use crate::time::{Duration, Energy, Speed};

/// The interface for models of power consumption as a function of
/// processor speed.
#[auto_impl(&, Box, Rc)]
pub trait PowerModel {
    /// Model: the power drawn while running at `speed`.
    fn power(&self, speed: Speed) -> f64;

    /// Model: the energy consumed by running at `speed` for `duration`.
    fn energy(&self, speed: Speed, duration: Duration) -> Energy {
        Energy::from(self.power(speed) * f64::from(duration))
    }
}

/// The classic polynomial power model `P(s) = s^α`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polynomial {
    exponent: f64,
}

impl Polynomial {
    /// Construct a new polynomial model. The exponent must exceed one
    /// for the model to be strictly convex.
    pub fn new(exponent: f64) -> Self {
        assert!(exponent > 1.0, "power exponent must exceed one");
        Polynomial { exponent }
    }

    /// The cube-root rule `P(s) = s^3` commonly assumed for CMOS.
    pub fn cubic() -> Self {
        Polynomial::new(3.0)
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        Polynomial::cubic()
    }
}

impl PowerModel for Polynomial {
    fn power(&self, speed: Speed) -> f64 {
        speed.powf(self.exponent)
    }
}
