use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {axis} anchor: {input} (use {expected})")]
pub struct ParseAnchorError {
    axis: &'static str,
    input: String,
    expected: &'static str,
}

/// Where a window sits along one axis of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Alignment {
    Start,
    Center,
    End,
}

impl Alignment {
    /// Offset of a span of `size` pixels inside `extent` pixels.
    /// Center rounds toward negative infinity so an oversized span is never shifted right.
    pub(crate) fn offset(self, extent: u32, size: u32) -> i64 {
        let free = i64::from(extent) - i64::from(size);
        match self {
            Alignment::Start => 0,
            Alignment::Center => free.div_euclid(2),
            Alignment::End => free,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAnchor {
    Left,
    #[default]
    Center,
    Right,
}

impl HorizontalAnchor {
    pub const ALL: [HorizontalAnchor; 3] = [
        HorizontalAnchor::Left,
        HorizontalAnchor::Center,
        HorizontalAnchor::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HorizontalAnchor::Left => "left",
            HorizontalAnchor::Center => "center",
            HorizontalAnchor::Right => "right",
        }
    }

    pub(crate) fn alignment(self) -> Alignment {
        match self {
            HorizontalAnchor::Left => Alignment::Start,
            HorizontalAnchor::Center => Alignment::Center,
            HorizontalAnchor::Right => Alignment::End,
        }
    }
}

impl FromStr for HorizontalAnchor {
    type Err = ParseAnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "l" => Ok(HorizontalAnchor::Left),
            "center" | "centre" | "c" => Ok(HorizontalAnchor::Center),
            "right" | "r" => Ok(HorizontalAnchor::Right),
            _ => Err(ParseAnchorError {
                axis: "horizontal",
                input: s.to_string(),
                expected: "left, center, right",
            }),
        }
    }
}

impl fmt::Display for HorizontalAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAnchor {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VerticalAnchor {
    pub const ALL: [VerticalAnchor; 3] = [
        VerticalAnchor::Top,
        VerticalAnchor::Center,
        VerticalAnchor::Bottom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VerticalAnchor::Top => "top",
            VerticalAnchor::Center => "center",
            VerticalAnchor::Bottom => "bottom",
        }
    }

    pub(crate) fn alignment(self) -> Alignment {
        match self {
            VerticalAnchor::Top => Alignment::Start,
            VerticalAnchor::Center => Alignment::Center,
            VerticalAnchor::Bottom => Alignment::End,
        }
    }
}

impl FromStr for VerticalAnchor {
    type Err = ParseAnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" | "t" => Ok(VerticalAnchor::Top),
            "center" | "centre" | "middle" | "c" => Ok(VerticalAnchor::Center),
            "bottom" | "b" => Ok(VerticalAnchor::Bottom),
            _ => Err(ParseAnchorError {
                axis: "vertical",
                input: s.to_string(),
                expected: "top, center, bottom",
            }),
        }
    }
}

impl fmt::Display for VerticalAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
