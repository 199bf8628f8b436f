use objc2::rc::Retained;
use objc2_app_kit::{NSApplicationActivationOptions, NSRunningApplication, NSWorkspace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningApp {
    pub pid: i32,
    pub name: Option<String>,
    pub executable: Option<String>,
}

impl RunningApp {
    /// Matches either the localized app name or the executable name, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.name
            .as_deref()
            .is_some_and(|n| n.eq_ignore_ascii_case(name))
            || self
                .executable
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(name))
    }
}

fn running_application_handles() -> Vec<Retained<NSRunningApplication>> {
    unsafe {
        let workspace = NSWorkspace::sharedWorkspace();
        let apps = workspace.runningApplications();
        (0..apps.count())
            .map(|i| apps.objectAtIndex(i))
            .filter(|app| !app.isTerminated())
            .collect()
    }
}

fn describe(app: &NSRunningApplication) -> RunningApp {
    unsafe {
        RunningApp {
            pid: app.processIdentifier(),
            name: app.localizedName().map(|n| n.to_string()),
            executable: app
                .executableURL()
                .and_then(|url| url.lastPathComponent())
                .map(|n| n.to_string()),
        }
    }
}

pub fn get_running_applications() -> Vec<RunningApp> {
    running_application_handles()
        .iter()
        .map(|app| describe(app))
        .collect()
}

pub fn find_running_application(name: &str) -> Option<RunningApp> {
    get_running_applications()
        .into_iter()
        .find(|app| app.matches(name))
}

/// Bring a running application to the front. Returns false when it is not running.
pub fn activate_application_named(name: &str) -> bool {
    for app in running_application_handles() {
        let info = describe(&app);
        if !info.matches(name) {
            continue;
        }
        let activated = unsafe {
            app.activateWithOptions(NSApplicationActivationOptions::ActivateAllWindows)
        };
        if activated {
            tracing::debug!("Activated {} (pid {})", name, info.pid);
        } else {
            tracing::warn!("Activation of {} (pid {}) was refused", name, info.pid);
        }
        return true;
    }
    false
}

/// Launch an application by name with `open -a`, which also activates it.
pub fn launch_application(name: &str) -> Result<(), String> {
    let status = std::process::Command::new("/usr/bin/open")
        .arg("-a")
        .arg(name)
        .status()
        .map_err(|e| format!("Failed to run open: {}", e))?;

    if status.success() {
        tracing::info!("Launched {}", name);
        Ok(())
    } else {
        Err(format!("open -a {:?} exited with {}", name, status))
    }
}
