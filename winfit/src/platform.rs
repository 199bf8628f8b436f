use thiserror::Error;
use winfit_core::{Rect, ScreenSize};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    #[error("no active display")]
    NoActiveDisplay,
    #[error("display information is not available on this platform")]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("{0} has no open windows")]
    NoWindows(String),
    #[error("no running process named {0}")]
    ProcessNotFound(String),
    #[error("accessibility permission is required (System Settings > Privacy & Security > Accessibility)")]
    PermissionDenied,
    #[error("{0}")]
    Other(String),
}

/// Trait for querying the screen the window is placed on.
/// This abstraction allows mocking in tests.
pub trait DisplayService {
    fn screen_size(&self) -> Result<ScreenSize, DisplayError>;
}

/// Trait for manipulating application windows (side effects).
/// This abstraction allows mocking in tests.
pub trait WindowManipulator {
    /// Bring `target_app` to the front, launching it if needed.
    fn activate(&self, target_app: &str) -> Result<(), ApplyError>;
    /// Move and resize the first window of `process_name` to `rect`.
    fn apply_rect(&self, process_name: &str, rect: &Rect) -> Result<(), ApplyError>;
}

#[cfg(target_os = "macos")]
pub use macos_impl::{MacOSDisplayService, MacOSWindowManipulator};

#[cfg(target_os = "macos")]
mod macos_impl {
    use super::*;
    use crate::macos::{
        activate_application_named, describe_ax_error, find_running_application,
        get_main_display_bounds, is_trusted_with_prompt, launch_application, AXUIElement,
        AX_ERROR_API_DISABLED,
    };
    use core_graphics::geometry::{CGPoint, CGSize};

    /// macOS implementation of DisplayService
    #[derive(Default)]
    pub struct MacOSDisplayService;

    impl DisplayService for MacOSDisplayService {
        fn screen_size(&self) -> Result<ScreenSize, DisplayError> {
            let bounds = get_main_display_bounds().ok_or(DisplayError::NoActiveDisplay)?;
            Ok(ScreenSize::new(bounds.width as u32, bounds.height as u32))
        }
    }

    /// macOS implementation of WindowManipulator
    #[derive(Default)]
    pub struct MacOSWindowManipulator;

    impl WindowManipulator for MacOSWindowManipulator {
        fn activate(&self, target_app: &str) -> Result<(), ApplyError> {
            if activate_application_named(target_app) {
                return Ok(());
            }
            tracing::debug!("{} is not running, launching it", target_app);
            launch_application(target_app).map_err(ApplyError::Other)
        }

        fn apply_rect(&self, process_name: &str, rect: &Rect) -> Result<(), ApplyError> {
            if !is_trusted_with_prompt() {
                return Err(ApplyError::PermissionDenied);
            }

            let app = find_running_application(process_name)
                .ok_or_else(|| ApplyError::ProcessNotFound(process_name.to_string()))?;

            let ax_app = AXUIElement::application(app.pid);
            let ax_windows = match ax_app.windows() {
                Ok(w) => w,
                Err(AX_ERROR_API_DISABLED) => return Err(ApplyError::PermissionDenied),
                Err(e) => {
                    tracing::warn!("Failed to get windows for pid {}: {}", app.pid, e);
                    return Err(ApplyError::Other(format!(
                        "could not list windows of {}: {}",
                        process_name,
                        describe_ax_error(e)
                    )));
                }
            };

            let Some(window) = ax_windows.first() else {
                return Err(ApplyError::NoWindows(process_name.to_string()));
            };

            let new_pos = CGPoint::new(rect.x as f64, rect.y as f64);
            let new_size = CGSize::new(rect.width as f64, rect.height as f64);

            // Position first so the resize is not clipped by the screen edge.
            window.set_position(new_pos).map_err(|e| {
                tracing::warn!("Failed to move window of pid {}: {}", app.pid, e);
                ax_failure("move", process_name, e)
            })?;
            window.set_size(new_size).map_err(|e| {
                tracing::warn!("Failed to resize window of pid {}: {}", app.pid, e);
                ax_failure("resize", process_name, e)
            })?;

            tracing::info!(
                "Set window {:?} of {} (pid {}) to {}",
                window.title().unwrap_or_default(),
                process_name,
                app.pid,
                rect
            );
            Ok(())
        }
    }

    fn ax_failure(action: &str, process_name: &str, err: i32) -> ApplyError {
        if err == AX_ERROR_API_DISABLED {
            return ApplyError::PermissionDenied;
        }
        ApplyError::Other(format!(
            "could not {} the window of {}: {}",
            action,
            process_name,
            describe_ax_error(err)
        ))
    }
}

/// Fallback for platforms without window control. The display falls back to
/// the default screen size and applying a frame always fails.
#[derive(Default)]
pub struct UnsupportedPlatform;

impl DisplayService for UnsupportedPlatform {
    fn screen_size(&self) -> Result<ScreenSize, DisplayError> {
        Err(DisplayError::Unsupported)
    }
}

impl WindowManipulator for UnsupportedPlatform {
    fn activate(&self, target_app: &str) -> Result<(), ApplyError> {
        Err(ApplyError::Other(format!(
            "cannot activate {} on this platform",
            target_app
        )))
    }

    fn apply_rect(&self, _process_name: &str, _rect: &Rect) -> Result<(), ApplyError> {
        Err(ApplyError::Other(
            "window placement is only supported on macOS".to_string(),
        ))
    }
}

/// Create the platform-appropriate collaborators.
pub fn system_services() -> (Box<dyn DisplayService>, Box<dyn WindowManipulator>) {
    #[cfg(target_os = "macos")]
    {
        (
            Box::new(MacOSDisplayService),
            Box::new(MacOSWindowManipulator),
        )
    }
    #[cfg(not(target_os = "macos"))]
    {
        (Box::new(UnsupportedPlatform), Box::new(UnsupportedPlatform))
    }
}
