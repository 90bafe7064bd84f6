use derive_more::{Display, Error};

/// Error returned when constructing a [`GridSize`] outside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("grid size {_0} is outside the supported range 2-12")]
pub struct GridSizeOutOfRange(#[error(not(source))] pub u8);

/// A validated puzzle side length.
///
/// The board is always square; a grid size of `n` means `n * n` pieces.
/// Supported sizes are 2 through 12 tiles per side.
///
/// # Examples
///
/// ```
/// use tileswap_core::GridSize;
///
/// let size = GridSize::new(4)?;
/// assert_eq!(size.get(), 4);
/// assert_eq!(size.piece_count(), 16);
///
/// assert!(GridSize::new(1).is_err());
/// assert!(GridSize::new(13).is_err());
/// # Ok::<(), tileswap_core::GridSizeOutOfRange>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("{_0}")]
pub struct GridSize(u8);

impl GridSize {
    /// The smallest supported grid (2×2).
    pub const MIN: Self = Self(2);
    /// The largest supported grid (12×12).
    pub const MAX: Self = Self(12);

    /// Creates a grid size, rejecting values outside 2-12.
    ///
    /// # Errors
    ///
    /// Returns [`GridSizeOutOfRange`] if `side` is not in `2..=12`.
    pub const fn new(side: u8) -> Result<Self, GridSizeOutOfRange> {
        if side >= Self::MIN.0 && side <= Self::MAX.0 {
            Ok(Self(side))
        } else {
            Err(GridSizeOutOfRange(side))
        }
    }

    /// Returns the side length.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the number of pieces on the board (`side * side`).
    #[must_use]
    pub const fn piece_count(self) -> usize {
        (self.0 as usize) * (self.0 as usize)
    }
}

impl TryFrom<u8> for GridSize {
    type Error = GridSizeOutOfRange;

    fn try_from(side: u8) -> Result<Self, Self::Error> {
        Self::new(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_supported_range() {
        for side in 2..=12 {
            let size = GridSize::new(side).expect("side in range");
            assert_eq!(size.get(), side);
            assert_eq!(size.piece_count(), usize::from(side) * usize::from(side));
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(GridSize::new(0), Err(GridSizeOutOfRange(0)));
        assert_eq!(GridSize::new(1), Err(GridSizeOutOfRange(1)));
        assert_eq!(GridSize::new(13), Err(GridSizeOutOfRange(13)));
        assert_eq!(GridSize::try_from(255), Err(GridSizeOutOfRange(255)));
    }

    #[test]
    fn test_bounds_constants() {
        assert_eq!(GridSize::MIN.get(), 2);
        assert_eq!(GridSize::MAX.get(), 12);
    }
}
