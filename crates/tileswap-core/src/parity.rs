use crate::{Arrangement, GridSize};

/// Reserved id for a blank slot.
///
/// Blank pieces are skipped when counting inversions and anchor the
/// row-parity term on even-sided grids. Generated arrangements never contain
/// one, but the predicate accepts arrangements that do.
pub const BLANK_PIECE: u16 = 0;

/// Classifies an arrangement's permutation parity, 15-puzzle style.
///
/// Counts inversions (pairs of positions whose piece ids are out of ascending
/// order, ignoring blanks) and, on even-sided grids, folds in the parity of
/// the blank's row. The shuffler treats a `true` result as "still in the
/// canonical class" and rejects the shuffle; it makes no reachability claim
/// about the free-swap move model.
///
/// On even-sided grids with no blank present, the row term degenerates to
/// row 0, so the predicate reduces to "inversion count is even". That exact
/// behavior is load-bearing for shuffle acceptance and must not be "fixed".
///
/// # Examples
///
/// ```
/// use tileswap_core::{Arrangement, GridSize, has_canonical_parity};
///
/// let size = GridSize::new(3)?;
/// let mut arrangement = Arrangement::solved(size);
/// assert!(has_canonical_parity(&arrangement, size));
///
/// // A single transposition flips the inversion parity.
/// arrangement.swap(0, 1);
/// assert!(!has_canonical_parity(&arrangement, size));
/// # Ok::<(), tileswap_core::GridSizeOutOfRange>(())
/// ```
#[must_use]
pub fn has_canonical_parity(arrangement: &Arrangement, size: GridSize) -> bool {
    let pieces = arrangement.pieces();
    let mut inversions = 0usize;
    for (i, &left) in pieces.iter().enumerate() {
        if left == BLANK_PIECE {
            continue;
        }
        for &right in &pieces[i + 1..] {
            if right != BLANK_PIECE && left > right {
                inversions += 1;
            }
        }
    }
    let even_inversions = inversions % 2 == 0;

    if size.get() % 2 == 0 {
        let row_from_bottom = pieces
            .iter()
            .position(|&piece| piece == BLANK_PIECE)
            .map_or(0, |index| index / usize::from(size.get()) + 1);
        (row_from_bottom % 2 == 0) == even_inversions
    } else {
        even_inversions
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn size(side: u8) -> GridSize {
        GridSize::new(side).expect("side in range")
    }

    fn arrangement(pieces: Vec<u16>, side: u8) -> Arrangement {
        Arrangement::from_pieces(pieces, size(side)).expect("valid arrangement")
    }

    #[test]
    fn test_solved_is_canonical_for_all_sizes() {
        for side in 2..=12 {
            let solved = Arrangement::solved(size(side));
            assert!(has_canonical_parity(&solved, size(side)), "side {side}");
        }
    }

    #[test]
    fn test_odd_grid_uses_inversion_parity_alone() {
        // One inversion: odd, not canonical.
        let one = arrangement(vec![2, 1, 3, 4, 5, 6, 7, 8, 9], 3);
        assert!(!has_canonical_parity(&one, size(3)));

        // Two inversions: even again.
        let two = arrangement(vec![2, 1, 3, 4, 5, 6, 7, 9, 8], 3);
        assert!(has_canonical_parity(&two, size(3)));
    }

    #[test]
    fn test_even_grid_without_blank_reduces_to_inversion_parity() {
        // No blank id present: the row term contributes "row 0", which is
        // even, so the predicate is just "inversions even".
        let odd = arrangement(vec![2, 1, 3, 4], 2);
        assert!(!has_canonical_parity(&odd, size(2)));

        let even = arrangement(vec![2, 1, 4, 3], 2);
        assert!(has_canonical_parity(&even, size(2)));
    }

    proptest! {
        #[test]
        fn prop_single_swap_flips_parity_on_odd_grids(
            side in (3u8..=11).prop_filter("odd", |s| s % 2 == 1),
            a in 0usize..121,
            b in 0usize..121,
        ) {
            let grid = size(side);
            let a = a % grid.piece_count();
            let b = b % grid.piece_count();
            prop_assume!(a != b);

            let mut shuffled = Arrangement::solved(grid);
            let before = has_canonical_parity(&shuffled, grid);
            shuffled.swap(a, b);
            prop_assert_ne!(has_canonical_parity(&shuffled, grid), before);
        }
    }
}
