use derive_more::Display;

/// Result message attached to a finished or failed round.
///
/// Cleared whenever a new round starts. The `Display` form is the exact text
/// shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Feedback {
    /// Solved within 30% of the budget with no incorrect moves.
    #[display("Excellent!")]
    Excellent,
    /// Solved within 50% of the budget with at most 3 incorrect moves.
    #[display("Good job!")]
    GoodJob,
    /// Solved within 60% of the budget with at most 6 incorrect moves.
    #[display("Well done!")]
    WellDone,
    /// Solved, but too slowly or too sloppily to gain score.
    #[display("Please Try Again")]
    TryAgain,
    /// The countdown ran out.
    #[display("Time Over!")]
    TimeOver,
    /// Three timeouts recorded; progress is about to hard-reset.
    #[display("You failed to solve for 3 times")]
    StreakFailed,
}
