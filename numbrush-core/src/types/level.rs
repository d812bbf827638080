//! Level data: palettes, sections and their authored order
//!
//! Levels are immutable once built. The order of `sections` is the order in
//! which the player is asked to fill them; section numbers are only labels.

use crate::error::LevelError;
use std::collections::HashSet;
use std::fmt;

/// A fill color, stored as authored (`#RRGGBB`).
///
/// Comparison is exact string equality, so `#ffd700` and `#FFD700` are
/// different colors as far as matching is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Color(String);

impl Color {
    pub fn new(hex: impl Into<String>) -> Self {
        Color(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse `#RRGGBB` into its components, if well formed.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.0.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Friendly name for the colors used by the bundled levels.
    pub fn name(&self) -> &'static str {
        match self.0.to_ascii_uppercase().as_str() {
            "#1E90FF" => "Sky Blue",
            "#FFD700" => "Gold",
            "#FF69B4" => "Pink",
            "#8B0000" => "Dark Red",
            "#FFA500" => "Orange",
            "#FF0000" => "Red",
            "#8B4513" => "Brown",
            "#EC4899" => "Hot Pink",
            "#FCD34D" => "Yellow",
            "#10B981" => "Green",
            "#3B82F6" => "Blue",
            "#EF4444" => "Bright Red",
            "#8B5CF6" => "Purple",
            "#F97316" => "Tangerine",
            "#1F2937" => "Charcoal",
            "#D97706" => "Amber",
            "#F3F4F6" => "White",
            "#0000FF" => "Royal Blue",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Color::new(value)
    }
}

/// Authored drawing data for a section. Carried through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    /// SVG path data
    #[cfg_attr(feature = "serde", serde(default))]
    pub path: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub label_x: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub label_y: f32,
}

/// One numbered region of a level
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    pub number: u32,
    pub color: Color,
    #[cfg_attr(feature = "serde", serde(default))]
    pub geometry: Geometry,
}

impl Section {
    pub fn new(number: u32, color: impl Into<Color>) -> Self {
        Self {
            number,
            color: color.into(),
            geometry: Geometry::default(),
        }
    }

    pub fn instruction(&self) -> Instruction {
        Instruction {
            number: self.number,
            color: self.color.clone(),
        }
    }
}

/// The (section, color) pair the player has to satisfy next
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    pub number: u32,
    pub color: Color,
}

/// Unvalidated level record, as it appears in a catalogue file.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelData {
    pub name: String,
    pub palette: Vec<Color>,
    pub sections: Vec<Section>,
}

/// A validated level.
///
/// Invariants: at least one section, section numbers are unique, and every
/// section's target color appears in the palette.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "LevelData", into = "LevelData"))]
pub struct Level {
    name: String,
    sections: Vec<Section>,
    palette: Vec<Color>,
}

impl Level {
    pub fn new(
        name: impl Into<String>,
        sections: Vec<Section>,
        palette: Vec<Color>,
    ) -> Result<Self, LevelError> {
        let name = name.into();
        if sections.is_empty() {
            return Err(LevelError::NoSections(name));
        }

        let mut seen = HashSet::with_capacity(sections.len());
        for section in &sections {
            if !seen.insert(section.number) {
                return Err(LevelError::DuplicateSection {
                    level: name,
                    number: section.number,
                });
            }
            if !palette.contains(&section.color) {
                return Err(LevelError::ColorNotInPalette {
                    level: name,
                    number: section.number,
                    color: section.color.to_string(),
                });
            }
        }

        Ok(Self {
            name,
            sections,
            palette,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sections in completion order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn section(&self, number: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.number == number)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false for a validated level; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl TryFrom<LevelData> for Level {
    type Error = LevelError;

    fn try_from(data: LevelData) -> Result<Self, Self::Error> {
        Level::new(data.name, data.sections, data.palette)
    }
}

impl From<Level> for LevelData {
    fn from(level: Level) -> Self {
        LevelData {
            name: level.name,
            palette: level.palette,
            sections: level.sections,
        }
    }
}
