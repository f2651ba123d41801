//! Movement of elements in the world.
//! Each element that moves has a fixed set of relative moves it may attempt every tick.
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use derive_more::BitOr;
use strum_macros::EnumIter;

use crate::physics::fallingsand::util::vectors::OffsetVector;

/// A single relative move an element can attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Move {
    /// Straight down, (0, -1)
    Down,
    /// Diagonally down and to the left, (-1, -1)
    DownLeft,
    /// Diagonally down and to the right, (+1, -1)
    DownRight,
    /// Sideways to the left, (-1, 0)
    Left,
    /// Sideways to the right, (+1, 0)
    Right,
}

impl Move {
    /// The relative offset of the destination cell
    pub const fn offset(self) -> OffsetVector {
        match self {
            Move::Down => OffsetVector::new(0, -1),
            Move::DownLeft => OffsetVector::new(-1, -1),
            Move::DownRight => OffsetVector::new(1, -1),
            Move::Left => OffsetVector::new(-1, 0),
            Move::Right => OffsetVector::new(1, 0),
        }
    }

    /// The bit representing this move inside a [MoveSet]
    const fn bit(self) -> u8 {
        match self {
            Move::Down => 0b0000_0001,
            Move::DownLeft => 0b0000_0010,
            Move::DownRight => 0b0000_0100,
            Move::Left => 0b0000_1000,
            Move::Right => 0b0001_0000,
        }
    }
}

/// An immutable set of [Move]s, stored as a bitset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, BitOr)]
pub struct MoveSet(u8);

impl MoveSet {
    /// No moves at all
    pub const NONE: MoveSet = MoveSet(0);
    /// Down plus both diagonals
    pub const GRANULAR: MoveSet =
        MoveSet(Move::Down.bit() | Move::DownLeft.bit() | Move::DownRight.bit());
    /// Everything granular can do, plus sideways flow
    pub const LIQUID: MoveSet = MoveSet(Self::GRANULAR.0 | Move::Left.bit() | Move::Right.bit());

    /// Creates a set holding exactly one move
    pub const fn single(mv: Move) -> Self {
        MoveSet(mv.bit())
    }

    /// Whether the given move is permitted
    pub const fn contains(self, mv: Move) -> bool {
        self.0 & mv.bit() != 0
    }

    /// Whether no move is permitted
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Move> for MoveSet {
    fn from(mv: Move) -> Self {
        MoveSet::single(mv)
    }
}

impl FromIterator<Move> for MoveSet {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        iter.into_iter()
            .fold(MoveSet::NONE, |acc, mv| acc | MoveSet::single(mv))
    }
}

/// Orders a pair of mirrored moves by the tick parity
/// Even ticks prefer the left hand move, odd ticks prefer the right hand move
pub fn ordered_pair(left: Move, right: Move, move_parity: u64) -> [Move; 2] {
    if move_parity == 0 {
        [left, right]
    } else {
        [right, left]
    }
}

/// The destinations an element with the given capabilities should try, in priority order
/// Down first, then the diagonals, then sideways, both pairs ordered by `move_parity`
pub fn candidate_moves(moves: MoveSet, move_parity: u64) -> impl Iterator<Item = Move> {
    std::iter::once(Move::Down)
        .chain(ordered_pair(Move::DownLeft, Move::DownRight, move_parity))
        .chain(ordered_pair(Move::Left, Move::Right, move_parity))
        .filter(move |mv| moves.contains(*mv))
}
