use bevy::render::color::Color;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use super::movement::MoveSet;

/// The content of a single cell in the world
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// Literally nothing
    #[default]
    Empty,
    Sand,
    Water,
}

impl ElementType {
    /// The moves this element may attempt each tick
    /// Elements that never move on their own return None
    pub fn get_moves(&self) -> Option<MoveSet> {
        match self {
            ElementType::Empty => None,
            ElementType::Sand => Some(MoveSet::GRANULAR),
            ElementType::Water => Some(MoveSet::LIQUID),
        }
    }

    pub fn get_color(&self) -> Color {
        match self {
            ElementType::Empty => Color::BLACK,
            ElementType::Sand => Color::FUCHSIA,
            ElementType::Water => Color::CYAN,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ElementType::Empty
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::physics::fallingsand::elements::movement::Move;

    #[test]
    fn test_empty_never_moves() {
        assert_eq!(ElementType::Empty.get_moves(), None);
    }

    #[test]
    fn test_sand_does_not_flow_sideways() {
        let moves = ElementType::Sand.get_moves().unwrap();
        assert!(moves.contains(Move::Down));
        assert!(!moves.contains(Move::Left));
        assert!(!moves.contains(Move::Right));
    }

    #[test]
    fn test_water_flows_sideways() {
        let moves = ElementType::Water.get_moves().unwrap();
        assert!(moves.contains(Move::Left));
        assert!(moves.contains(Move::Right));
    }

    #[test]
    fn test_colors() {
        assert_eq!(ElementType::Empty.get_color().as_rgba_u8(), [0, 0, 0, 255]);
        assert_eq!(ElementType::Sand.get_color().as_rgba_u8(), [255, 0, 255, 255]);
        assert_eq!(ElementType::Water.get_color().as_rgba_u8(), [0, 255, 255, 255]);
    }

    #[test]
    fn test_colors_are_distinct() {
        let colors: Vec<[u8; 4]> = ElementType::iter()
            .map(|e| e.get_color().as_rgba_u8())
            .collect();
        for (i, a) in colors.iter().enumerate() {
            for b in colors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&ElementType::Sand).unwrap(),
            "\"sand\""
        );
        assert_eq!(
            serde_json::from_str::<ElementType>("\"water\"").unwrap(),
            ElementType::Water
        );
        assert!(serde_json::from_str::<ElementType>("\"lava\"").is_err());
    }
}
