use std::fmt::Display;

/// A cell coordinate inside a grid
/// x is the column, positive is to the right
/// y is the row, 0 is the bottom row and positive is up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct XyVector {
    pub x: usize,
    pub y: usize,
}

impl XyVector {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Moves by a signed offset
    /// Returns None if the result would have a negative component,
    /// upper bounds are up to the caller
    pub fn checked_offset(&self, offset: OffsetVector) -> Option<XyVector> {
        let x = self.x.checked_add_signed(offset.dx)?;
        let y = self.y.checked_add_signed(offset.dy)?;
        Some(XyVector { x, y })
    }
}

impl Display for XyVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A signed relative offset between two cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OffsetVector {
    pub dx: isize,
    pub dy: isize,
}

impl OffsetVector {
    pub const fn new(dx: isize, dy: isize) -> Self {
        Self { dx, dy }
    }
}

/// A grid coordinate that may lie outside of the grid
/// Pointer positions are delivered in this form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SignedXyVector {
    pub x: i64,
    pub y: i64,
}

impl SignedXyVector {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Converts to an unsigned coordinate if both components are non negative
    pub fn to_xy_vector(&self) -> Option<XyVector> {
        let x = usize::try_from(self.x).ok()?;
        let y = usize::try_from(self.y).ok()?;
        Some(XyVector { x, y })
    }
}
