/// Tunables of the scheduler.
///
/// The algorithm itself has no parameters; the configuration only
/// controls how floating-point comparisons are made and whether the
/// final schedule is audited before it is returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Relative tolerance. Densities within a factor of `epsilon` of
    /// each other count as tied; [verification][crate::yds::Schedule::verify]
    /// accepts errors of `epsilon` times a job's work or the latest
    /// deadline. Release times and deadlines are compared exactly.
    pub epsilon: f64,
    /// Audit the reconstructed schedule with
    /// [Schedule::verify][crate::yds::Schedule::verify] and panic on
    /// any violation.
    pub verify: bool,
}

impl Config {
    pub const DEFAULT_EPSILON: f64 = 1e-9;

    pub fn with_epsilon(self, epsilon: f64) -> Config {
        assert!(epsilon >= 0.0 && epsilon.is_finite());
        Config { epsilon, ..self }
    }

    pub fn with_verification(self, verify: bool) -> Config {
        Config { verify, ..self }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            epsilon: Config::DEFAULT_EPSILON,
            verify: cfg!(debug_assertions),
        }
    }
}
