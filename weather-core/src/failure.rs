//! Sources that decide whether a simulated remote call fails.
//!
//! The simulated service never samples randomness itself; it asks the
//! [`FailureSource`] it was built with, so tests can force either outcome.

use std::fmt::{self, Debug};

/// The two simulated remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    Submit,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Submit => "submit",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait FailureSource: Send + Sync + Debug {
    fn should_fail(&self, operation: Operation) -> bool;
}

/// Fails each call independently with a fixed probability.
#[derive(Debug, Clone, Copy)]
pub struct RandomFailures {
    probability: f64,
}

impl RandomFailures {
    pub const DEFAULT_PROBABILITY: f64 = 0.5;

    /// `probability` is clamped to `[0.0, 1.0]`.
    pub fn new(probability: f64) -> Self {
        Self { probability: probability.clamp(0.0, 1.0) }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for RandomFailures {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROBABILITY)
    }
}

impl FailureSource for RandomFailures {
    fn should_fail(&self, _operation: Operation) -> bool {
        rand::random::<f64>() < self.probability
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverFail;

impl FailureSource for NeverFail {
    fn should_fail(&self, _operation: Operation) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFail;

impl FailureSource for AlwaysFail {
    fn should_fail(&self, _operation: Operation) -> bool {
        true
    }
}

/// Fails only the given operation.
#[derive(Debug, Clone, Copy)]
pub struct FailOn(pub Operation);

impl FailureSource for FailOn {
    fn should_fail(&self, operation: Operation) -> bool {
        operation == self.0
    }
}
