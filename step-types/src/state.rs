//! The piece state: position plus color.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::WireError;

/// X coordinate of the origin the piece resets to.
pub const ORIGIN_X: u32 = 100;

/// Y coordinate of the origin the piece resets to.
pub const ORIGIN_Y: u32 = 50;

/// Fill color of the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Default color before any weather lookup or user choice.
    #[default]
    White,
    /// Cold (below 10°C).
    Blue,
    /// Mild (10–20°C).
    Green,
    /// Warm (20–30°C).
    Yellow,
    /// Hot (30°C and above).
    Red,
}

impl Color {
    /// All colors, in declaration order.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Red,
    ];

    /// Lowercase name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Red => "red",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Color::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| WireError::UnknownColor(s.to_string()))
    }
}

/// Position and color of the piece.
///
/// `State` is an immutable value. Every transform returns a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    /// Horizontal position, never negative.
    pub x: u32,
    /// Vertical position, never negative.
    pub y: u32,
    /// Fill color.
    pub color: Color,
}

impl State {
    /// Create a state at the given position.
    pub const fn new(x: u32, y: u32, color: Color) -> Self {
        Self { x, y, color }
    }

    /// The origin `(100, 50)` with the given color.
    pub const fn origin(color: Color) -> Self {
        Self::new(ORIGIN_X, ORIGIN_Y, color)
    }

    /// Copy of this state at a new position.
    pub const fn with_position(self, x: u32, y: u32) -> Self {
        Self::new(x, y, self.color)
    }

    /// Copy of this state with a new color.
    pub const fn with_color(self, color: Color) -> Self {
        Self::new(self.x, self.y, color)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::origin(Color::White)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}", self.x, self.y, self.color)
    }
}
