//! Core types for the Tileswap puzzle engine.
//!
//! This crate defines the board-level vocabulary shared by the generator and
//! the game session:
//!
//! - [`GridSize`] — a validated side length (2-12 tiles per side)
//! - [`Arrangement`] — an assignment of piece ids to grid positions
//! - [`has_canonical_parity`] — the permutation parity predicate used as the
//!   shuffle acceptance gate
//!
//! # Examples
//!
//! ```
//! use tileswap_core::{Arrangement, GridSize, has_canonical_parity};
//!
//! let size = GridSize::new(3)?;
//! let solved = Arrangement::solved(size);
//! assert_eq!(solved.pieces(), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
//!
//! // The solved arrangement has no inversions, so it sits in the canonical
//! // parity class and would be rejected by the shuffler.
//! assert!(has_canonical_parity(&solved, size));
//! # Ok::<(), tileswap_core::GridSizeOutOfRange>(())
//! ```

pub use self::{
    arrangement::{Arrangement, ArrangementError, PieceId},
    grid_size::{GridSize, GridSizeOutOfRange},
    parity::{BLANK_PIECE, has_canonical_parity},
};

mod arrangement;
mod grid_size;
mod parity;
