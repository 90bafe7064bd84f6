use derive_more::{Display, Error, From};

use crate::StoreError;

/// Errors surfaced by [`Session`](crate::Session) operations.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// An operation ran before `start` or resume. Signals a driver bug, not a
    /// recoverable runtime condition.
    #[display("session has not been started")]
    NotStarted,
    /// A swap named a position outside the current arrangement.
    #[display("position {index} is outside the {len}-piece arrangement")]
    PieceOutOfRange {
        /// The offending position.
        index: usize,
        /// Piece count of the current arrangement.
        len: usize,
    },
    /// The snapshot store failed while persisting session state.
    #[display("{_0}")]
    #[from]
    Store(StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SessionError::NotStarted.to_string(),
            "session has not been started"
        );
        assert_eq!(
            SessionError::PieceOutOfRange { index: 9, len: 9 }.to_string(),
            "position 9 is outside the 9-piece arrangement"
        );
        let store = SessionError::from(StoreError::new("disk full"));
        assert_eq!(store.to_string(), "snapshot store failure: disk full");
    }
}
