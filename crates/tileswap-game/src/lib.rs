//! The Tileswap session state machine.
//!
//! A [`Session`] owns everything mutable about one player's game: the live
//! arrangement, score, level, countdown, incorrect-move count, and failure
//! history. It implements the move protocol, the scoring thresholds, the
//! countdown lifecycle, the failure-streak reset policy, and snapshot
//! persistence, against two injected capabilities:
//!
//! - [`SnapshotStore`] — key-value persistence for the resumable
//!   [`Snapshot`] record ([`MemoryStore`] ships for tests)
//! - [`Clock`] — monotonic time, pumped through [`Session::poll`]
//!   ([`ManualClock`] ships for deterministic tests)
//!
//! # Examples
//!
//! ```
//! use tileswap_core::GridSize;
//! use tileswap_game::{ManualClock, MemoryStore, Session};
//! use tileswap_generator::Shuffler;
//!
//! let mut session = Session::new(
//!     MemoryStore::new(),
//!     ManualClock::new(),
//!     Shuffler::seeded(1),
//!     GridSize::new(2)?,
//! );
//! session.start()?;
//!
//! // 4 pieces * 10 seconds, minus 2 for level 1.
//! assert_eq!(session.timer(), Some(38));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{
    clock::{Clock, ManualClock},
    error::SessionError,
    feedback::Feedback,
    session::{
        CompletionRecord, DISPLAY_DELAY, IMAGE_COUNT, INCORRECT_MOVE_PENALTY, INITIAL_SCORE,
        LEVEL_CAP, PREVIEW_PENALTY, Phase, STREAK_LIMIT, Session, TICK_PERIOD,
    },
    snapshot::{MemoryStore, Snapshot, SnapshotStore, StoreError},
};

mod clock;
mod error;
mod feedback;
mod session;
mod snapshot;
