pub mod anchor;
pub mod geometry;
pub mod settings;
pub mod store;

pub use anchor::{HorizontalAnchor, ParseAnchorError, VerticalAnchor};
pub use geometry::{resolve, ParseScreenSizeError, Rect, ScreenSize, FALLBACK_SCREEN};
pub use settings::{parse_name, parse_percent, SettingsError, WindowSettings};
pub use store::{JsonFileStore, MemoryStore, SettingsStore, StoreError, SETTINGS_KEY};
