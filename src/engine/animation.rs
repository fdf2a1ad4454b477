//! The capability every scheduled animation provides.

use crate::renderer::Surface;

/// One independently-steppable visual behavior.
///
/// Progress state belongs to the implementor and is only ever changed by its
/// own [`advance`](Animation::advance) and [`reset`](Animation::reset). The
/// scheduler reads the completion flags and nothing else.
pub trait Animation {
    /// Advance by one discrete step. Must be a no-op on progress once
    /// [`is_finished`](Animation::is_finished) returns true.
    fn advance(&mut self);

    /// Draw the current progress state. Has no effect on scheduling state and
    /// is called every frame the unit is eligible, finished or not.
    fn render(&self, surface: &mut dyn Surface);

    fn is_finished(&self) -> bool;

    /// Whether the next unit in the sequence may start. Defaults to completion;
    /// animations that run forever override this to hand off early.
    fn unlocks_next(&self) -> bool {
        self.is_finished()
    }

    /// Restore progress and completion to their initial values.
    fn reset(&mut self);

    /// Short label used in logs and the status bar.
    fn name(&self) -> &str {
        "animation"
    }
}
