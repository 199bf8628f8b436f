use std::fmt::Display;
use std::time::Duration;

use anyhow::{Context, Result};
use winfit_core::{
    parse_name, parse_percent, HorizontalAnchor, Rect, ScreenSize, SettingsStore, StoreError,
    VerticalAnchor, WindowSettings, FALLBACK_SCREEN,
};

use crate::platform::{ApplyError, DisplayService, WindowManipulator};
use crate::prompt::Prompter;

/// Time given to an application to come to the front before its window is moved.
pub const DEFAULT_ACTIVATION_DELAY: Duration = Duration::from_millis(500);

const REUSE_CHOICES: [&str; 2] = ["Use saved settings", "Configure new settings"];

/// Wires settings, the display and the window manipulator together.
pub struct Positioner<'a> {
    display: &'a dyn DisplayService,
    windows: &'a dyn WindowManipulator,
    activation_delay: Duration,
}

impl<'a> Positioner<'a> {
    pub fn new(display: &'a dyn DisplayService, windows: &'a dyn WindowManipulator) -> Self {
        Self {
            display,
            windows,
            activation_delay: DEFAULT_ACTIVATION_DELAY,
        }
    }

    pub fn with_activation_delay(mut self, delay: Duration) -> Self {
        self.activation_delay = delay;
        self
    }

    /// Current screen size, or [`FALLBACK_SCREEN`] if the display cannot be queried.
    pub fn screen_size(&self) -> ScreenSize {
        match self.display.screen_size() {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!("Could not read screen size ({}), assuming {}", e, FALLBACK_SCREEN);
                FALLBACK_SCREEN
            }
        }
    }

    /// Frame the window would get, without touching it.
    pub fn preview(&self, settings: &WindowSettings) -> Rect {
        settings.resolve(self.screen_size())
    }

    pub fn position(&self, settings: &WindowSettings) -> Result<Rect, ApplyError> {
        let screen = self.screen_size();
        let rect = settings.resolve(screen);
        tracing::debug!(
            "Resolved {}% x {}% ({}/{}) on {} to {}",
            settings.width_percent,
            settings.height_percent,
            settings.horizontal_anchor,
            settings.vertical_anchor,
            screen,
            rect
        );

        // A failed activation usually means the apply step fails too, with a better message.
        if let Err(e) = self.windows.activate(&settings.target_app) {
            tracing::warn!("Failed to activate {}: {}", settings.target_app, e);
        }
        if !self.activation_delay.is_zero() {
            std::thread::sleep(self.activation_delay);
        }

        self.windows.apply_rect(&settings.process_name, &rect)?;
        Ok(rect)
    }
}

pub fn describe_settings(settings: &WindowSettings) -> String {
    format!(
        "{} (process {}): {}% x {}%, {} / {}",
        settings.target_app,
        settings.process_name,
        settings.width_percent,
        settings.height_percent,
        settings.horizontal_anchor,
        settings.vertical_anchor
    )
}

/// Interactive flow: pick or enter settings, optionally save them, then position the window.
pub fn run_interactive(
    prompter: &mut dyn Prompter,
    store: &dyn SettingsStore,
    positioner: &Positioner,
) -> Result<Rect> {
    let settings = choose_settings(prompter, store)?;
    let rect = positioner
        .position(&settings)
        .with_context(|| format!("Failed to position {}", settings.target_app))?;
    prompter.notify(&format!("Moved {} to {}", settings.process_name, rect))?;
    Ok(rect)
}

pub fn choose_settings(
    prompter: &mut dyn Prompter,
    store: &dyn SettingsStore,
) -> Result<WindowSettings> {
    let current = match store.read() {
        Ok(saved) => {
            prompter.notify(&format!("Saved settings: {}", describe_settings(&saved)))?;
            if prompter.choose("What would you like to do?", &REUSE_CHOICES, 0)? == 0 {
                return Ok(saved);
            }
            saved
        }
        Err(StoreError::NotFound { .. }) => store.load(),
        Err(e) => {
            prompter.notify(&format!("Saved settings cannot be used: {}", e))?;
            store.load()
        }
    };

    let settings = collect_settings(prompter, &current)?;
    if prompter.confirm("Save these settings for next time?", false)? {
        store.save(&settings).context("Failed to save settings")?;
        prompter.notify("Settings saved.")?;
    }
    Ok(settings)
}

/// Asks for every field in order, prefilled from `defaults`.
pub fn collect_settings(
    prompter: &mut dyn Prompter,
    defaults: &WindowSettings,
) -> Result<WindowSettings> {
    let target_app = ask_valid(
        prompter,
        "Target application",
        &defaults.target_app,
        |s| parse_name("target app", s),
    )?;

    // The old process name rarely fits a different app.
    let process_default = if target_app == defaults.target_app {
        defaults.process_name.clone()
    } else {
        target_app.clone()
    };
    let process_name = ask_valid(prompter, "Process name", &process_default, |s| {
        parse_name("process name", s)
    })?;

    let width_percent = ask_valid(
        prompter,
        "Width (% of screen)",
        &defaults.width_percent.to_string(),
        |s| parse_percent("width", s),
    )?;
    let height_percent = ask_valid(
        prompter,
        "Height (% of screen)",
        &defaults.height_percent.to_string(),
        |s| parse_percent("height", s),
    )?;

    let horizontal_names = HorizontalAnchor::ALL.map(|a| a.as_str());
    let horizontal_default = HorizontalAnchor::ALL
        .iter()
        .position(|a| *a == defaults.horizontal_anchor)
        .unwrap_or(1);
    let choice = prompter.choose("Horizontal position", &horizontal_names, horizontal_default)?;
    let horizontal_anchor = HorizontalAnchor::ALL
        .get(choice)
        .copied()
        .with_context(|| format!("No horizontal position number {}", choice + 1))?;

    let vertical_names = VerticalAnchor::ALL.map(|a| a.as_str());
    let vertical_default = VerticalAnchor::ALL
        .iter()
        .position(|a| *a == defaults.vertical_anchor)
        .unwrap_or(1);
    let choice = prompter.choose("Vertical position", &vertical_names, vertical_default)?;
    let vertical_anchor = VerticalAnchor::ALL
        .get(choice)
        .copied()
        .with_context(|| format!("No vertical position number {}", choice + 1))?;

    Ok(WindowSettings {
        target_app,
        process_name,
        width_percent,
        height_percent,
        horizontal_anchor,
        vertical_anchor,
    })
}

fn ask_valid<T, E: Display>(
    prompter: &mut dyn Prompter,
    message: &str,
    default: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<T> {
    loop {
        let answer = prompter.ask(message, Some(default))?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(e) => prompter.notify(&e.to_string())?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockDisplay, MockWindowManipulator};
    use crate::prompt::LinePrompter;
    use std::io::Cursor;
    use winfit_core::MemoryStore;

    type TestPrompter = LinePrompter<Cursor<Vec<u8>>, Vec<u8>>;

    fn prompter(input: &str) -> TestPrompter {
        LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn safari_settings() -> WindowSettings {
        WindowSettings {
            target_app: "Safari".to_string(),
            process_name: "Safari".to_string(),
            width_percent: 75,
            height_percent: 50,
            horizontal_anchor: HorizontalAnchor::Right,
            vertical_anchor: VerticalAnchor::Top,
        }
    }

    #[test]
    fn test_position_uses_display_size() {
        let display = MockDisplay::new(2560, 1440);
        let windows = MockWindowManipulator::new();
        let positioner = Positioner::new(&display, &windows).with_activation_delay(Duration::ZERO);

        let rect = positioner.position(&WindowSettings::default()).unwrap();

        let expected = Rect {
            x: 512,
            y: 72,
            width: 1536,
            height: 1296,
        };
        assert_eq!(rect, expected);
        assert_eq!(*windows.activated.borrow(), vec!["Visual Studio Code"]);
        assert_eq!(windows.applied(), vec![("Code".to_string(), expected)]);
    }

    #[test]
    fn test_position_falls_back_when_display_fails() {
        let display = MockDisplay::failing();
        let windows = MockWindowManipulator::new();
        let positioner = Positioner::new(&display, &windows).with_activation_delay(Duration::ZERO);

        assert_eq!(positioner.screen_size(), FALLBACK_SCREEN);
        let rect = positioner.position(&WindowSettings::default()).unwrap();
        assert_eq!(
            rect,
            Rect {
                x: 384,
                y: 54,
                width: 1152,
                height: 972
            }
        );
    }

    #[test]
    fn test_position_reports_apply_error() {
        let display = MockDisplay::new(1920, 1080);
        let windows = MockWindowManipulator::new()
            .with_apply_error(ApplyError::NoWindows("Code".to_string()));
        let positioner = Positioner::new(&display, &windows).with_activation_delay(Duration::ZERO);

        let result = positioner.position(&WindowSettings::default());
        assert_eq!(result, Err(ApplyError::NoWindows("Code".to_string())));
    }

    #[test]
    fn test_activation_failure_does_not_abort() {
        let display = MockDisplay::new(1920, 1080);
        let windows = MockWindowManipulator::new()
            .with_activate_error(ApplyError::Other("cannot launch".to_string()));
        let positioner = Positioner::new(&display, &windows).with_activation_delay(Duration::ZERO);

        assert!(positioner.position(&WindowSettings::default()).is_ok());
        assert_eq!(windows.applied().len(), 1);
    }

    #[test]
    fn test_preview_does_not_touch_windows() {
        let display = MockDisplay::new(1920, 1080);
        let windows = MockWindowManipulator::new();
        let positioner = Positioner::new(&display, &windows);

        let rect = positioner.preview(&safari_settings());
        assert_eq!(
            rect,
            Rect {
                x: 480,
                y: 0,
                width: 1440,
                height: 540
            }
        );
        assert!(windows.activated.borrow().is_empty());
        assert!(windows.applied().is_empty());
    }

    #[test]
    fn test_interactive_new_settings_saved() {
        let display = MockDisplay::new(1920, 1080);
        let windows = MockWindowManipulator::new();
        let positioner = Positioner::new(&display, &windows).with_activation_delay(Duration::ZERO);
        let store = MemoryStore::new();
        // app, process (defaults to app), width, height, right, top, save
        let mut p = prompter("Safari\n\n75\n50%\n3\n1\ny\n");

        let rect = run_interactive(&mut p, &store, &positioner).unwrap();

        assert_eq!(store.saved(), Some(safari_settings()));
        assert_eq!(rect, safari_settings().resolve(FALLBACK_SCREEN));
        assert_eq!(windows.applied(), vec![("Safari".to_string(), rect)]);
    }

    #[test]
    fn test_interactive_prompt_order() {
        let store = MemoryStore::new();
        let mut p = prompter("\n\n\n\n\n\n\n");

        let settings = choose_settings(&mut p, &store).unwrap();
        assert_eq!(settings, WindowSettings::default());

        let out = String::from_utf8(p.into_output()).unwrap();
        let order = [
            "Target application",
            "Process name",
            "Width",
            "Height",
            "Horizontal position",
            "Vertical position",
            "Save these settings",
        ];
        let positions: Vec<usize> = order.iter().map(|s| out.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", out);
        assert!(!store.exists());
    }

    #[test]
    fn test_interactive_reuses_saved_settings() {
        let store = MemoryStore::with_settings(safari_settings());
        let mut p = prompter("1\n");

        let settings = choose_settings(&mut p, &store).unwrap();
        assert_eq!(settings, safari_settings());
    }

    #[test]
    fn test_interactive_reconfigure_prefills_saved() {
        let store = MemoryStore::with_settings(safari_settings());
        // configure new, keep everything but width, don't save
        let mut p = prompter("2\n\n\n40\n\n\n\nn\n");

        let settings = choose_settings(&mut p, &store).unwrap();
        assert_eq!(
            settings,
            WindowSettings {
                width_percent: 40,
                ..safari_settings()
            }
        );
        assert_eq!(store.saved(), Some(safari_settings()));
    }

    #[test]
    fn test_interactive_reasks_invalid_percent() {
        let store = MemoryStore::new();
        let mut p = prompter("Terminal\nTerminal\nabc\n150\n80\n\n\n\nn\n");

        let settings = choose_settings(&mut p, &store).unwrap();
        assert_eq!(settings.width_percent, 80);
        assert_eq!(settings.height_percent, 90);

        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("width must be a whole number"));
        assert!(out.contains("width must be between 1 and 100, got 150"));
    }

    #[test]
    fn test_interactive_save_failure_aborts() {
        let display = MockDisplay::new(1920, 1080);
        let windows = MockWindowManipulator::new();
        let positioner = Positioner::new(&display, &windows).with_activation_delay(Duration::ZERO);
        let store = MemoryStore::read_only();
        let mut p = prompter("\n\n\n\n\n\ny\n");

        let err = run_interactive(&mut p, &store, &positioner).unwrap_err();
        assert!(err.to_string().contains("Failed to save settings"));
        assert!(windows.applied().is_empty());
    }

    #[test]
    fn test_interactive_apply_error_is_reported() {
        let display = MockDisplay::new(1920, 1080);
        let windows = MockWindowManipulator::new().with_apply_error(ApplyError::PermissionDenied);
        let positioner = Positioner::new(&display, &windows).with_activation_delay(Duration::ZERO);
        let store = MemoryStore::with_settings(safari_settings());
        let mut p = prompter("1\n");

        let err = run_interactive(&mut p, &store, &positioner).unwrap_err();
        assert_eq!(err.to_string(), "Failed to position Safari");
        assert_eq!(
            err.downcast_ref::<ApplyError>(),
            Some(&ApplyError::PermissionDenied)
        );
    }

    #[test]
    fn test_interactive_closed_input_fails() {
        let store = MemoryStore::new();
        let mut p = prompter("Safari\n");
        assert!(choose_settings(&mut p, &store).is_err());
    }

    /// Accepts every default but answers choices with an index past the end.
    struct OutOfRangeChooser;

    impl Prompter for OutOfRangeChooser {
        fn ask(&mut self, _message: &str, default: Option<&str>) -> Result<String> {
            Ok(default.unwrap_or_default().to_string())
        }

        fn choose(&mut self, _message: &str, choices: &[&str], _default: usize) -> Result<usize> {
            Ok(choices.len())
        }

        fn confirm(&mut self, _message: &str, default: bool) -> Result<bool> {
            Ok(default)
        }

        fn notify(&mut self, _message: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_out_of_range_choice_is_an_error() {
        let err = collect_settings(&mut OutOfRangeChooser, &WindowSettings::default()).unwrap_err();
        assert_eq!(err.to_string(), "No horizontal position number 4");
    }

    #[test]
    fn test_describe_settings() {
        assert_eq!(
            describe_settings(&WindowSettings::default()),
            "Visual Studio Code (process Code): 60% x 90%, center / center"
        );
    }
}
