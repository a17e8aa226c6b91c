use crate::algorithm::dna::Dna;
use crate::io::error::{Exhaustion, GenerationError, Result};
use std::collections::HashSet;

/// Outcome of offering a candidate DNA to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The admission key was new and is now recorded
    Accepted,
    /// An edition with the same admission key already exists
    Rejected,
}

/// Admission keys produced so far and the duplicate-draw budget
#[derive(Debug, Clone)]
pub struct UniquenessTracker {
    seen: HashSet<String>,
    consecutive_failures: usize,
    total_rejections: usize,
    tolerance: usize,
}

impl UniquenessTracker {
    /// Tracker that gives up after `tolerance` consecutive duplicates
    pub fn new(tolerance: usize) -> Self {
        Self {
            seen: HashSet::new(),
            consecutive_failures: 0,
            total_rejections: 0,
            tolerance,
        }
    }

    /// Admit a candidate if its key is unseen
    pub fn admit(&mut self, candidate: &Dna) -> Admission {
        if self.seen.insert(candidate.admission_key()) {
            self.consecutive_failures = 0;
            Admission::Accepted
        } else {
            Admission::Rejected
        }
    }

    /// Whether a candidate's key has already been admitted
    pub fn contains(&self, candidate: &Dna) -> bool {
        self.seen.contains(&candidate.admission_key())
    }

    /// Count a rejected draw against the tolerance
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationExhausted` once consecutive rejections reach the
    /// tolerance; `target` names the phase target that could not be reached
    pub fn record_rejection(&mut self, target: usize) -> Result<()> {
        self.consecutive_failures += 1;
        self.total_rejections += 1;
        if self.consecutive_failures >= self.tolerance {
            return Err(GenerationError::ConfigurationExhausted {
                target,
                cause: Exhaustion::DuplicateDna {
                    failures: self.consecutive_failures,
                },
            });
        }
        Ok(())
    }

    /// Number of admitted keys
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been admitted
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Rejections since the last acceptance
    pub const fn consecutive_failures(&self) -> usize {
        self.consecutive_failures
    }

    /// Rejections over the whole run
    pub const fn total_rejections(&self) -> usize {
        self.total_rejections
    }
}
