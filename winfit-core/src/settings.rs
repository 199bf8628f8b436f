use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anchor::{HorizontalAnchor, VerticalAnchor};
use crate::geometry::{resolve, Rect, ScreenSize};

pub const DEFAULT_TARGET_APP: &str = "Visual Studio Code";
pub const DEFAULT_PROCESS_NAME: &str = "Code";
pub const DEFAULT_WIDTH_PERCENT: u32 = 60;
pub const DEFAULT_HEIGHT_PERCENT: u32 = 90;

pub const MIN_PERCENT: u32 = 1;
pub const MAX_PERCENT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{field} must be a whole number, got {input:?}")]
    NotANumber { field: &'static str, input: String },
    #[error("{field} must be between {} and {}, got {value}", MIN_PERCENT, MAX_PERCENT)]
    OutOfRange { field: &'static str, value: u32 },
}

/// Everything needed to place one application window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowSettings {
    /// Application to bring to the front.
    pub target_app: String,
    /// Process whose first window gets moved. Often differs from `target_app`.
    pub process_name: String,
    pub width_percent: u32,
    pub height_percent: u32,
    pub horizontal_anchor: HorizontalAnchor,
    pub vertical_anchor: VerticalAnchor,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            target_app: DEFAULT_TARGET_APP.to_string(),
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            width_percent: DEFAULT_WIDTH_PERCENT,
            height_percent: DEFAULT_HEIGHT_PERCENT,
            horizontal_anchor: HorizontalAnchor::default(),
            vertical_anchor: VerticalAnchor::default(),
        }
    }
}

impl WindowSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_name("target app", &self.target_app)?;
        validate_name("process name", &self.process_name)?;
        validate_percent("width", self.width_percent)?;
        validate_percent("height", self.height_percent)?;
        Ok(())
    }

    pub fn resolve(&self, screen: ScreenSize) -> Rect {
        resolve(
            screen,
            self.width_percent,
            self.height_percent,
            self.horizontal_anchor,
            self.vertical_anchor,
        )
    }
}

fn validate_name(field: &'static str, value: &str) -> Result<(), SettingsError> {
    if value.trim().is_empty() {
        return Err(SettingsError::Empty(field));
    }
    Ok(())
}

pub fn validate_percent(field: &'static str, value: u32) -> Result<u32, SettingsError> {
    if !(MIN_PERCENT..=MAX_PERCENT).contains(&value) {
        return Err(SettingsError::OutOfRange { field, value });
    }
    Ok(value)
}

/// Parses user input such as `"60"` or `"60%"` into a percentage.
pub fn parse_percent(field: &'static str, input: &str) -> Result<u32, SettingsError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let value: u32 = digits.parse().map_err(|_| SettingsError::NotANumber {
        field,
        input: input.to_string(),
    })?;
    validate_percent(field, value)
}

/// Parses a non-empty name, trimming surrounding whitespace.
pub fn parse_name(field: &'static str, input: &str) -> Result<String, SettingsError> {
    validate_name(field, input)?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FALLBACK_SCREEN;

    #[test]
    fn test_default_values() {
        let settings = WindowSettings::default();
        assert_eq!(settings.target_app, "Visual Studio Code");
        assert_eq!(settings.process_name, "Code");
        assert_eq!(settings.width_percent, 60);
        assert_eq!(settings.height_percent, 90);
        assert_eq!(settings.horizontal_anchor, HorizontalAnchor::Center);
        assert_eq!(settings.vertical_anchor, VerticalAnchor::Center);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        let settings = WindowSettings {
            target_app: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::Empty("target app"))
        );

        let settings = WindowSettings {
            process_name: String::new(),
            ..Default::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::Empty("process name"))
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_percent() {
        let settings = WindowSettings {
            width_percent: 0,
            ..Default::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::OutOfRange {
                field: "width",
                value: 0
            })
        );

        let settings = WindowSettings {
            height_percent: 101,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = WindowSettings {
            width_percent: 100,
            height_percent: 1,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("width", "60"), Ok(60));
        assert_eq!(parse_percent("width", " 75% "), Ok(75));
        assert_eq!(parse_percent("width", "100 %"), Ok(100));
    }

    #[test]
    fn test_parse_percent_rejects_non_numeric() {
        assert_eq!(
            parse_percent("height", "ninety"),
            Err(SettingsError::NotANumber {
                field: "height",
                input: "ninety".to_string()
            })
        );
        assert!(parse_percent("height", "").is_err());
        assert!(parse_percent("height", "-5").is_err());
        assert!(parse_percent("height", "12.5").is_err());
    }

    #[test]
    fn test_parse_percent_rejects_out_of_range() {
        assert!(matches!(
            parse_percent("width", "0"),
            Err(SettingsError::OutOfRange { value: 0, .. })
        ));
        assert!(matches!(
            parse_percent("width", "150"),
            Err(SettingsError::OutOfRange { value: 150, .. })
        ));
    }

    #[test]
    fn test_parse_name_trims() {
        assert_eq!(parse_name("process name", "  Safari "), Ok("Safari".to_string()));
        assert!(parse_name("process name", "\t").is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SettingsError::OutOfRange {
                field: "width",
                value: 150
            }
            .to_string(),
            "width must be between 1 and 100, got 150"
        );
        assert_eq!(
            SettingsError::Empty("target app").to_string(),
            "target app must not be empty"
        );
    }

    #[test]
    fn test_resolve_uses_all_fields() {
        let settings = WindowSettings {
            horizontal_anchor: HorizontalAnchor::Right,
            vertical_anchor: VerticalAnchor::Bottom,
            ..Default::default()
        };
        let rect = settings.resolve(FALLBACK_SCREEN);
        assert_eq!(
            rect,
            Rect {
                x: 768,
                y: 108,
                width: 1152,
                height: 972
            }
        );
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(WindowSettings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "target_app": "Visual Studio Code",
                "process_name": "Code",
                "width_percent": 60,
                "height_percent": 90,
                "horizontal_anchor": "center",
                "vertical_anchor": "center"
            })
        );
    }

    #[test]
    fn test_deserialize_rejects_unknown_and_missing_keys() {
        let extra = r#"{"target_app":"a","process_name":"b","width_percent":1,
            "height_percent":1,"horizontal_anchor":"left","vertical_anchor":"top","x":1}"#;
        assert!(serde_json::from_str::<WindowSettings>(extra).is_err());

        let missing = r#"{"target_app":"a","process_name":"b","width_percent":1,
            "height_percent":1,"horizontal_anchor":"left"}"#;
        assert!(serde_json::from_str::<WindowSettings>(missing).is_err());
    }
}
