use std::time::Duration;

use derive_more::{Display, Error, From};
use tileswap_core::{Arrangement, ArrangementError, GridSize, GridSizeOutOfRange};
use tileswap_generator::Shuffler;

use crate::{Clock, Feedback, SessionError, Snapshot, SnapshotStore};

/// Starting score for a fresh player.
pub const INITIAL_SCORE: f64 = 3.0;
/// Highest level reached before progression wraps back to level 1.
pub const LEVEL_CAP: u32 = 10;
/// Number of background images cycled through by level.
pub const IMAGE_COUNT: usize = 10;
/// Seconds removed from the countdown for an incorrect move.
pub const INCORRECT_MOVE_PENALTY: u32 = 10;
/// Score cost of peeking at the full image.
pub const PREVIEW_PENALTY: f64 = 1.0;
/// Timeouts recorded before the failure streak hard-resets progress.
pub const STREAK_LIMIT: usize = 3;
/// Countdown tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);
/// Delay between a round result and the automatic next round.
pub const DISPLAY_DELAY: Duration = Duration::from_secs(4);

/// Lifecycle phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The countdown is running and swaps are accepted.
    Active,
    /// The arrangement matched; the result is on display before auto-advance.
    Solved,
    /// The countdown ran out; the same level restarts after the delay.
    TimedOut,
    /// Three timeouts accumulated; a hard reset fires after the delay.
    StreakFailed,
}

/// Values handed off to an external leaderboard when a round is solved.
///
/// The session only produces these; storing and ranking them is the
/// collaborator's concern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionRecord {
    /// Score after the solve was applied.
    pub score: f64,
    /// Level after the solve was applied.
    pub level: u32,
    /// Seconds of the budget spent solving.
    pub completion_time: u32,
}

#[derive(Debug)]
struct Round {
    solved: Arrangement,
    current: Arrangement,
    budget: u32,
    timer: u32,
    image_index: usize,
    incorrect_moves: u32,
    phase: Phase,
    next_tick: Option<Duration>,
}

#[derive(Debug, Clone, Copy)]
enum PendingAction {
    NextRound,
    HardReset,
}

#[derive(Debug, Display, Error, From)]
enum RestoreError {
    #[display("{_0}")]
    GridSize(GridSizeOutOfRange),
    #[display("{_0}")]
    Arrangement(ArrangementError),
    #[display("level 0 is not a valid 1-based level")]
    ZeroLevel,
}

/// One player's puzzle session: the current round plus everything that
/// survives across rounds (score, level, failure history).
///
/// All timing is cooperative. The session holds deadlines against the
/// injected [`Clock`] and fires them when [`poll`](Self::poll) runs; starting
/// a new round drops the superseded round's deadlines, so a stale delay can
/// never act on a newer round's state. Every state-changing operation writes
/// a [`Snapshot`] through the injected [`SnapshotStore`].
///
/// # Examples
///
/// ```
/// use tileswap_core::GridSize;
/// use tileswap_game::{ManualClock, MemoryStore, Session};
/// use tileswap_generator::Shuffler;
///
/// let mut session = Session::new(
///     MemoryStore::new(),
///     ManualClock::new(),
///     Shuffler::seeded(7),
///     GridSize::new(3)?,
/// );
/// session.start()?;
///
/// assert_eq!(session.level(), 1);
/// assert_eq!(session.timer(), Some(88)); // 9 pieces * 10 - level * 2
/// assert!(!session.is_solved());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Session<S, C> {
    store: S,
    clock: C,
    shuffler: Shuffler,
    grid_size: GridSize,
    round: Option<Round>,
    score: f64,
    level: u32,
    failure_count: u32,
    failure_levels: Vec<u32>,
    feedback: Option<Feedback>,
    pending: Option<(Duration, PendingAction)>,
    last_completion: Option<CompletionRecord>,
}

impl<S: SnapshotStore, C: Clock> Session<S, C> {
    /// Creates an unstarted session shell.
    ///
    /// Every operation except [`start`](Self::start) and
    /// [`set_grid_size`](Self::set_grid_size) fails with
    /// [`SessionError::NotStarted`] until a round exists.
    #[must_use]
    pub fn new(store: S, clock: C, shuffler: Shuffler, grid_size: GridSize) -> Self {
        Self {
            store,
            clock,
            shuffler,
            grid_size,
            round: None,
            score: INITIAL_SCORE,
            level: 1,
            failure_count: 0,
            failure_levels: Vec::new(),
            feedback: None,
            pending: None,
            last_completion: None,
        }
    }

    /// Restores a session from the store's snapshot, or starts fresh.
    ///
    /// A usable snapshot is restored directly: grid size, arrangement, score,
    /// level, and failure history come back exactly as persisted, without
    /// re-shuffling, and a full countdown for the restored level begins. A
    /// missing, unreadable, or malformed snapshot falls back to a fresh start
    /// at `default_size` (with a logged warning rather than an error).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] only if persisting the fresh start
    /// fails; snapshot load problems never propagate.
    pub fn resume_or_start(
        store: S,
        clock: C,
        shuffler: Shuffler,
        default_size: GridSize,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(store, clock, shuffler, default_size);
        match session.store.load() {
            Ok(Some(snapshot)) => match session.restore(&snapshot) {
                Ok(()) => return Ok(session),
                Err(err) => log::warn!("discarding unusable snapshot: {err}"),
            },
            Ok(None) => {}
            Err(err) => log::warn!("snapshot load failed, starting fresh: {err}"),
        }
        session.start()?;
        Ok(session)
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), RestoreError> {
        let grid_size = GridSize::new(snapshot.grid_size)?;
        let current = Arrangement::from_pieces(snapshot.arrangement.clone(), grid_size)?;
        if snapshot.level == 0 {
            return Err(RestoreError::ZeroLevel);
        }

        self.grid_size = grid_size;
        self.score = snapshot.score;
        self.level = snapshot.level;
        self.failure_levels.clone_from(&snapshot.failure_levels);
        // The counter advances in lockstep with the history and is not
        // persisted separately.
        self.failure_count = u32::try_from(self.failure_levels.len()).unwrap_or(u32::MAX);

        let budget = round_budget(grid_size, self.level);
        self.round = Some(Round {
            solved: Arrangement::solved(grid_size),
            current,
            budget,
            timer: budget,
            image_index: image_index(self.level),
            incorrect_moves: snapshot.incorrect_moves,
            phase: Phase::Active,
            next_tick: Some(self.clock.now() + TICK_PERIOD),
        });
        self.feedback = None;
        self.pending = None;
        self.last_completion = None;
        log::info!(
            "resumed session: level {}, {}x{} grid, score {}",
            self.level,
            grid_size,
            grid_size,
            self.score
        );
        Ok(())
    }

    /// Starts a fresh round at the session's current grid size and level.
    ///
    /// Shuffles a new arrangement, resets the incorrect-move count, computes
    /// the time budget, restarts the countdown, clears feedback, and persists
    /// a snapshot carrying the accumulated score/level/failure history.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the snapshot cannot be written.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.start_round()
    }

    /// Replaces the grid size and starts a fresh round at it.
    ///
    /// Always a full restart: a freshly shuffled arrangement (never a resize
    /// of the old one), incorrect moves back to zero, and any deadlines of
    /// the superseded round dropped. The level carries over.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the snapshot cannot be written.
    pub fn set_grid_size(&mut self, size: GridSize) -> Result<(), SessionError> {
        self.grid_size = size;
        self.start_round()
    }

    /// Swaps the pieces at two positions.
    ///
    /// An allowed move may still be "incorrect": when both positions end up
    /// holding the wrong piece after the swap, the incorrect-move counter
    /// goes up by one and the countdown loses
    /// [`INCORRECT_MOVE_PENALTY`] seconds (floored at zero, which counts as a
    /// timeout). A swap that fixes at least one position is free. Solving the
    /// arrangement settles the round and schedules the next one.
    ///
    /// Swaps arriving while a settled round is still on display are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotStarted`] before the first round,
    /// [`SessionError::PieceOutOfRange`] for positions outside the board, and
    /// [`SessionError::Store`] if persisting fails.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), SessionError> {
        let round = self.round.as_mut().ok_or(SessionError::NotStarted)?;
        let len = round.current.len();
        for index in [a, b] {
            if index >= len {
                return Err(SessionError::PieceOutOfRange { index, len });
            }
        }
        if round.phase != Phase::Active {
            log::debug!("ignoring swap({a}, {b}) against a settled round");
            return Ok(());
        }

        round.current.swap(a, b);
        let now_a = round.current.piece_at(a) == round.solved.piece_at(a);
        let now_b = round.current.piece_at(b) == round.solved.piece_at(b);

        // The penalized before/after combinations are exactly those where
        // both positions end incorrect, whatever they held before.
        if !now_a && !now_b {
            round.incorrect_moves += 1;
            round.timer = round.timer.saturating_sub(INCORRECT_MOVE_PENALTY);
        }

        let timed_out = round.timer == 0;
        let solved = round.current == round.solved;
        self.persist()?;
        if timed_out {
            self.time_out()?;
        } else if solved {
            self.complete()?;
        }
        Ok(())
    }

    /// Deducts the preview penalty from the score without touching the board.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotStarted`] before the first round and
    /// [`SessionError::Store`] if persisting fails.
    pub fn preview(&mut self) -> Result<(), SessionError> {
        if self.round.is_none() {
            return Err(SessionError::NotStarted);
        }
        self.score -= PREVIEW_PENALTY;
        self.persist()
    }

    /// Wipes all persisted progress and starts over from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the store cannot be written.
    pub fn clear_progress(&mut self) -> Result<(), SessionError> {
        log::info!("clearing all persisted progress");
        self.hard_reset()
    }

    /// Processes every countdown tick and scheduled transition now due.
    ///
    /// Call this from the driver's event loop. Multiple elapsed ticks are
    /// processed in order, so a large clock jump still lands on the timeout
    /// transition exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if a resulting state change cannot be
    /// persisted.
    pub fn poll(&mut self) -> Result<(), SessionError> {
        let now = self.clock.now();
        loop {
            let timed_out = {
                let Some(round) = self.round.as_mut() else {
                    break;
                };
                let Some(deadline) = round.next_tick else {
                    break;
                };
                if deadline > now {
                    break;
                }
                round.next_tick = Some(deadline + TICK_PERIOD);
                round.timer = round.timer.saturating_sub(1);
                round.timer == 0
            };
            if timed_out {
                self.time_out()?;
            }
        }

        if let Some((due, action)) = self.pending
            && due <= now
        {
            self.pending = None;
            match action {
                PendingAction::NextRound => self.start_round()?,
                PendingAction::HardReset => self.hard_reset()?,
            }
        }
        Ok(())
    }

    /// Returns the current grid size.
    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Returns the accumulated score.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns the current level (1-based).
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Returns the number of timeouts since the last hard reset or wrap.
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    /// Returns the levels at which timeouts were recorded, in order.
    #[must_use]
    pub fn failure_levels(&self) -> &[u32] {
        &self.failure_levels
    }

    /// Returns the feedback attached to the latest round result, if any.
    #[must_use]
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// Returns the leaderboard record of the most recent solve, if any.
    #[must_use]
    pub fn last_completion(&self) -> Option<CompletionRecord> {
        self.last_completion
    }

    /// Returns the current round's phase, or `None` before the first round.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        self.round.as_ref().map(|round| round.phase)
    }

    /// Returns the seconds left on the countdown.
    #[must_use]
    pub fn timer(&self) -> Option<u32> {
        self.round.as_ref().map(|round| round.timer)
    }

    /// Returns the incorrect-move count of the current round.
    #[must_use]
    pub fn incorrect_moves(&self) -> Option<u32> {
        self.round.as_ref().map(|round| round.incorrect_moves)
    }

    /// Returns the background image selector for the current round.
    #[must_use]
    pub fn image_index(&self) -> Option<usize> {
        self.round.as_ref().map(|round| round.image_index)
    }

    /// Returns the live arrangement.
    #[must_use]
    pub fn arrangement(&self) -> Option<&Arrangement> {
        self.round.as_ref().map(|round| &round.current)
    }

    /// Returns the solved arrangement the player is working toward.
    #[must_use]
    pub fn solved_arrangement(&self) -> Option<&Arrangement> {
        self.round.as_ref().map(|round| &round.solved)
    }

    /// Returns `true` if the live arrangement matches the solved one.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.round
            .as_ref()
            .is_some_and(|round| round.current == round.solved)
    }

    /// Returns `true` once a round exists (started or resumed).
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.round.is_some()
    }

    fn start_round(&mut self) -> Result<(), SessionError> {
        if self.level > LEVEL_CAP {
            // Soft wrap: score and failure history survive, the counter and
            // level do not.
            self.level = 1;
            self.failure_count = 0;
            log::info!("level cap passed; wrapping back to level 1");
        }
        let shuffled = self.shuffler.shuffle(self.grid_size);
        let budget = round_budget(self.grid_size, self.level);
        self.round = Some(Round {
            solved: Arrangement::solved(self.grid_size),
            current: shuffled.arrangement,
            budget,
            timer: budget,
            image_index: image_index(self.level),
            incorrect_moves: 0,
            phase: Phase::Active,
            next_tick: Some(self.clock.now() + TICK_PERIOD),
        });
        self.feedback = None;
        // Drops any delay still owed by the superseded round.
        self.pending = None;
        self.persist()?;
        log::info!(
            "round started: level {}, {} pieces, {budget}s budget, shuffle seed {}",
            self.level,
            self.grid_size.piece_count(),
            shuffled.seed
        );
        Ok(())
    }

    fn complete(&mut self) -> Result<(), SessionError> {
        let (completion_time, budget, incorrect) = {
            let round = self.round.as_mut().ok_or(SessionError::NotStarted)?;
            round.phase = Phase::Solved;
            round.next_tick = None;
            (
                round.budget - round.timer,
                f64::from(round.budget),
                round.incorrect_moves,
            )
        };
        let elapsed = f64::from(completion_time);

        let (feedback, score_delta, level_delta) = if elapsed <= budget * 0.3 && incorrect == 0 {
            (Feedback::Excellent, 2.0, 1)
        } else if elapsed <= budget * 0.5 && incorrect <= 3 {
            (Feedback::GoodJob, 1.5, 1)
        } else if elapsed <= budget * 0.6 && incorrect <= 6 {
            (Feedback::WellDone, 1.0, 0)
        } else {
            (Feedback::TryAgain, -0.5, 0)
        };

        self.score += score_delta;
        self.level += level_delta;
        self.feedback = Some(feedback);
        self.last_completion = Some(CompletionRecord {
            score: self.score,
            level: self.level,
            completion_time,
        });
        self.pending = Some((self.clock.now() + DISPLAY_DELAY, PendingAction::NextRound));
        self.persist()?;
        log::info!(
            "round solved in {completion_time}s with {incorrect} incorrect moves: {feedback}"
        );
        Ok(())
    }

    fn time_out(&mut self) -> Result<(), SessionError> {
        {
            let round = self.round.as_mut().ok_or(SessionError::NotStarted)?;
            round.phase = Phase::TimedOut;
            round.next_tick = None;
        }
        self.feedback = Some(Feedback::TimeOver);
        self.failure_count += 1;
        self.failure_levels.push(self.level);
        self.persist()?;
        log::info!("round timed out at level {}", self.level);

        let due = self.clock.now() + DISPLAY_DELAY;
        if self.failure_levels.len() >= STREAK_LIMIT {
            self.feedback = Some(Feedback::StreakFailed);
            if let Some(round) = self.round.as_mut() {
                round.phase = Phase::StreakFailed;
            }
            self.pending = Some((due, PendingAction::HardReset));
            log::info!(
                "failure streak reached {} timeouts; progress will reset",
                self.failure_levels.len()
            );
        } else {
            // The same level restarts; timeouts never advance progression.
            self.pending = Some((due, PendingAction::NextRound));
        }
        Ok(())
    }

    fn hard_reset(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        self.failure_levels.clear();
        self.failure_count = 0;
        self.score = INITIAL_SCORE;
        self.level = 1;
        self.last_completion = None;
        self.start_round()
    }

    fn persist(&self) -> Result<(), SessionError> {
        let Some(round) = &self.round else {
            return Ok(());
        };
        let snapshot = Snapshot {
            grid_size: self.grid_size.get(),
            arrangement: round.current.pieces().to_vec(),
            score: self.score,
            level: self.level,
            incorrect_moves: round.incorrect_moves,
            failure_levels: self.failure_levels.clone(),
        };
        self.store.save(&snapshot)?;
        Ok(())
    }
}

fn round_budget(size: GridSize, level: u32) -> u32 {
    #[expect(clippy::cast_possible_truncation)]
    let pieces = size.piece_count() as u32;
    (pieces * 10).saturating_sub(level * 2)
}

fn image_index(level: u32) -> usize {
    usize::try_from(level).map_or(0, |level| level % IMAGE_COUNT)
}
