//! Gate policies: when does a unit's predecessor let it start?

use std::fmt;

use super::animation::Animation;

/// Eligibility rule applied between neighbouring units.
///
/// A scheduler uses exactly one policy for its whole sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Strict hand-off: the predecessor must be finished.
    Completion,
    /// Pipelined: the predecessor only has to raise its unlock flag, which it
    /// may do long before (or instead of) finishing.
    EarlyUnlock,
}

impl Gate {
    /// Does `predecessor` permit the unit after it to advance this frame?
    pub fn permits(self, predecessor: &dyn Animation) -> bool {
        match self {
            Gate::Completion => predecessor.is_finished(),
            Gate::EarlyUnlock => predecessor.unlocks_next(),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Completion => write!(f, "completion"),
            Gate::EarlyUnlock => write!(f, "early-unlock"),
        }
    }
}
