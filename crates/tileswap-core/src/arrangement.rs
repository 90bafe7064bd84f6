use derive_more::{Display, Error};

use crate::GridSize;

/// Identifier of a single puzzle piece.
///
/// Pieces of an `n`×`n` puzzle carry ids `1..=n*n`; id 0 is reserved for a
/// blank slot and never appears in generated arrangements.
pub type PieceId = u16;

/// Error returned when an arrangement does not fit its grid size.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ArrangementError {
    /// The piece sequence has the wrong length for the grid.
    #[display("expected {expected} pieces, got {actual}")]
    LengthMismatch {
        /// Piece count required by the grid size.
        expected: usize,
        /// Piece count actually supplied.
        actual: usize,
    },
    /// The piece sequence is not a permutation of `1..=n*n`.
    #[display("pieces are not a permutation of 1..={_0}")]
    NotAPermutation(#[error(not(source))] usize),
}

/// An ordered assignment of piece ids to grid positions.
///
/// Position `i` (row-major) holds piece `pieces()[i]`. An arrangement always
/// contains each id in `1..=n*n` exactly once; the solved arrangement holds
/// them in ascending order.
///
/// # Examples
///
/// ```
/// use tileswap_core::{Arrangement, GridSize};
///
/// let size = GridSize::new(2)?;
/// let mut arrangement = Arrangement::solved(size);
/// assert!(arrangement.is_solved());
///
/// arrangement.swap(0, 3);
/// assert_eq!(arrangement.pieces(), &[4, 2, 3, 1]);
/// assert!(!arrangement.is_solved());
/// # Ok::<(), tileswap_core::GridSizeOutOfRange>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arrangement {
    pieces: Vec<PieceId>,
}

impl Arrangement {
    /// Returns the solved arrangement for a grid: pieces `1..=n*n` in order.
    #[must_use]
    pub fn solved(size: GridSize) -> Self {
        #[expect(clippy::cast_possible_truncation)]
        let pieces = (1..=size.piece_count() as PieceId).collect();
        Self { pieces }
    }

    /// Builds an arrangement from raw piece ids, validating shape and content.
    ///
    /// # Errors
    ///
    /// Returns [`ArrangementError::LengthMismatch`] if `pieces` does not have
    /// `size.piece_count()` entries, and [`ArrangementError::NotAPermutation`]
    /// if the entries are not exactly the ids `1..=n*n`.
    pub fn from_pieces(pieces: Vec<PieceId>, size: GridSize) -> Result<Self, ArrangementError> {
        let expected = size.piece_count();
        if pieces.len() != expected {
            return Err(ArrangementError::LengthMismatch {
                expected,
                actual: pieces.len(),
            });
        }
        let mut seen = vec![false; expected];
        for &piece in &pieces {
            let id = usize::from(piece);
            if id == 0 || id > expected || seen[id - 1] {
                return Err(ArrangementError::NotAPermutation(expected));
            }
            seen[id - 1] = true;
        }
        Ok(Self { pieces })
    }

    /// Returns the piece ids in position order.
    #[must_use]
    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }

    /// Returns the number of positions on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Returns `true` if the arrangement has no positions.
    ///
    /// Never the case for arrangements built through this crate, since grid
    /// sizes start at 2.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Returns the piece at a position, or `None` if out of range.
    #[must_use]
    pub fn piece_at(&self, position: usize) -> Option<PieceId> {
        self.pieces.get(position).copied()
    }

    /// Returns `true` if every position holds its own piece id.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.pieces
            .iter()
            .enumerate()
            .all(|(i, &piece)| usize::from(piece) == i + 1)
    }

    /// Swaps the pieces at two positions.
    ///
    /// # Panics
    ///
    /// Panics if either position is out of range. Callers holding unvalidated
    /// positions should bounds-check against [`Self::len`] first.
    pub fn swap(&mut self, a: usize, b: usize) {
        assert!(a < self.pieces.len() && b < self.pieces.len());
        self.pieces.swap(a, b);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn grid_size() -> impl Strategy<Value = GridSize> {
        (2u8..=12).prop_map(|side| GridSize::new(side).expect("side in range"))
    }

    proptest! {
        #[test]
        fn prop_solved_contains_each_piece_once(size in grid_size()) {
            let solved = Arrangement::solved(size);
            prop_assert_eq!(solved.len(), size.piece_count());
            for (i, &piece) in solved.pieces().iter().enumerate() {
                prop_assert_eq!(usize::from(piece), i + 1);
            }
            prop_assert!(solved.is_solved());
        }

        #[test]
        fn prop_swap_is_an_involution(size in grid_size(), a in 0usize..144, b in 0usize..144) {
            let a = a % size.piece_count();
            let b = b % size.piece_count();
            let mut arrangement = Arrangement::solved(size);
            let before = arrangement.clone();
            arrangement.swap(a, b);
            arrangement.swap(a, b);
            prop_assert_eq!(arrangement, before);
        }
    }

    #[test]
    fn test_from_pieces_validates_shape() {
        let size = GridSize::new(2).expect("valid size");
        assert!(Arrangement::from_pieces(vec![3, 1, 4, 2], size).is_ok());
        assert_eq!(
            Arrangement::from_pieces(vec![1, 2, 3], size),
            Err(ArrangementError::LengthMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            Arrangement::from_pieces(vec![1, 2, 3, 3], size),
            Err(ArrangementError::NotAPermutation(4))
        );
        assert_eq!(
            Arrangement::from_pieces(vec![0, 1, 2, 3], size),
            Err(ArrangementError::NotAPermutation(4))
        );
        assert_eq!(
            Arrangement::from_pieces(vec![1, 2, 3, 5], size),
            Err(ArrangementError::NotAPermutation(4))
        );
    }

    #[test]
    fn test_swap_moves_pieces() {
        let size = GridSize::new(3).expect("valid size");
        let mut arrangement = Arrangement::solved(size);
        arrangement.swap(0, 8);
        assert_eq!(arrangement.piece_at(0), Some(9));
        assert_eq!(arrangement.piece_at(8), Some(1));
        assert!(!arrangement.is_solved());
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_swap_out_of_range_panics() {
        let size = GridSize::new(2).expect("valid size");
        let mut arrangement = Arrangement::solved(size);
        arrangement.swap(0, 4);
    }
}
