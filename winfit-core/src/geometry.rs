use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::anchor::{HorizontalAnchor, VerticalAnchor};

/// Screen size assumed when the display cannot be queried.
pub const FALLBACK_SCREEN: ScreenSize = ScreenSize {
    width: 1920,
    height: 1080,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid screen size: {0} (expected WIDTHxHEIGHT, e.g. 2560x1440)")]
pub struct ParseScreenSizeError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FromStr for ScreenSize {
    type Err = ParseScreenSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseScreenSizeError(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let width: u32 = w.trim().parse().map_err(|_| err())?;
        let height: u32 = h.trim().parse().map_err(|_| err())?;
        if width == 0 || height == 0 {
            return Err(err());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Computes the frame of a window sized to a percentage of `screen` and
/// anchored on each axis.
///
/// Sizes and centered offsets are truncated to whole pixels. Percentages are
/// not clamped: anything over 100 yields a frame larger than the screen with a
/// negative origin for right/bottom and centered anchors.
pub fn resolve(
    screen: ScreenSize,
    width_percent: u32,
    height_percent: u32,
    horizontal: HorizontalAnchor,
    vertical: VerticalAnchor,
) -> Rect {
    let width = scale(screen.width, width_percent);
    let height = scale(screen.height, height_percent);

    Rect {
        x: saturate(horizontal.alignment().offset(screen.width, width)),
        y: saturate(vertical.alignment().offset(screen.height, height)),
        width,
        height,
    }
}

fn scale(extent: u32, percent: u32) -> u32 {
    let scaled = u64::from(extent) * u64::from(percent) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
