mod app;
#[cfg(target_os = "macos")]
mod macos;
mod platform;
mod prompt;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use argh::FromArgs;
use tracing_subscriber::EnvFilter;
use winfit_core::{
    parse_name, parse_percent, HorizontalAnchor, JsonFileStore, ScreenSize, SettingsStore,
    StoreError, VerticalAnchor, WindowSettings,
};

use app::{describe_settings, Positioner, DEFAULT_ACTIVATION_DELAY};
use prompt::LinePrompter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// winfit - resize an application window to a fraction of the screen
#[derive(FromArgs)]
struct Cli {
    /// settings file to use instead of the per-user default
    #[argh(option)]
    config: Option<PathBuf>,
    /// milliseconds to wait after activating the application (default 500)
    #[argh(option)]
    delay_ms: Option<u64>,
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Run(RunCmd),
    Apply(ApplyCmd),
    Resolve(ResolveCmd),
    Show(ShowCmd),
    Path(PathCmd),
    Version(VersionCmd),
}

/// Ask for settings interactively and position the window (the default)
#[derive(FromArgs)]
#[argh(subcommand, name = "run")]
struct RunCmd {}

/// Position the window using saved settings, overridden by any options given
#[derive(FromArgs)]
#[argh(subcommand, name = "apply")]
struct ApplyCmd {
    /// application to bring to the front
    #[argh(option)]
    app: Option<String>,
    /// process whose first window is moved (defaults to --app when that is given)
    #[argh(option)]
    process: Option<String>,
    /// width in percent of the screen (1-100)
    #[argh(option)]
    width: Option<String>,
    /// height in percent of the screen (1-100)
    #[argh(option)]
    height: Option<String>,
    /// horizontal anchor: left, center, right
    #[argh(option)]
    horizontal: Option<HorizontalAnchor>,
    /// vertical anchor: top, center, bottom
    #[argh(option)]
    vertical: Option<VerticalAnchor>,
    /// save the resulting settings for next time
    #[argh(switch)]
    save: bool,
    /// print the frame without moving the window
    #[argh(switch)]
    dry_run: bool,
}

/// Print the frame for the given size and anchors
#[derive(FromArgs)]
#[argh(subcommand, name = "resolve")]
struct ResolveCmd {
    /// width in percent of the screen (1-100)
    #[argh(option)]
    width: String,
    /// height in percent of the screen (1-100)
    #[argh(option)]
    height: String,
    /// horizontal anchor: left, center, right
    #[argh(option, default = "HorizontalAnchor::Center")]
    horizontal: HorizontalAnchor,
    /// vertical anchor: top, center, bottom
    #[argh(option, default = "VerticalAnchor::Center")]
    vertical: VerticalAnchor,
    /// screen size as WIDTHxHEIGHT instead of the main display
    #[argh(option)]
    screen: Option<ScreenSize>,
}

/// Show the settings that would be used
#[derive(FromArgs)]
#[argh(subcommand, name = "show")]
struct ShowCmd {
    /// print as JSON
    #[argh(switch)]
    json: bool,
}

/// Print the settings file location
#[derive(FromArgs)]
#[argh(subcommand, name = "path")]
struct PathCmd {}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

fn main() {
    let cli: Cli = argh::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(SubCommand::Run(RunCmd {}));
    if let SubCommand::Version(_) = command {
        println!("winfit {}", VERSION);
        return Ok(());
    }

    let (display, windows) = platform::system_services();
    let delay = cli
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_ACTIVATION_DELAY);
    let positioner = Positioner::new(&*display, &*windows).with_activation_delay(delay);
    let config = cli.config;

    execute(command, || open_store(config.clone()), &positioner)
}

/// Runs one subcommand. The store is opened only by the subcommands that use it.
fn execute(
    command: SubCommand,
    open: impl Fn() -> Result<JsonFileStore>,
    positioner: &Positioner,
) -> Result<()> {
    match command {
        SubCommand::Run(_) => {
            let store = open()?;
            tracing::debug!("Using settings at {}", store.path().display());
            let stdin = io::stdin();
            let mut prompter = LinePrompter::new(stdin.lock(), io::stdout());
            app::run_interactive(&mut prompter, &store, positioner)?;
        }
        SubCommand::Apply(cmd) => {
            let store = open()?;
            let settings = apply_overrides(store.load(), &cmd)?;
            if cmd.save {
                store.save(&settings).context("Failed to save settings")?;
            }
            if cmd.dry_run {
                println!("{}", positioner.preview(&settings));
                return Ok(());
            }
            let rect = positioner
                .position(&settings)
                .with_context(|| format!("Failed to position {}", settings.target_app))?;
            println!("Moved {} to {}", settings.process_name, rect);
        }
        SubCommand::Resolve(cmd) => {
            let width = parse_percent("width", &cmd.width)?;
            let height = parse_percent("height", &cmd.height)?;
            let screen = cmd.screen.unwrap_or_else(|| positioner.screen_size());
            let rect = winfit_core::resolve(screen, width, height, cmd.horizontal, cmd.vertical);
            println!("{}", rect);
        }
        SubCommand::Show(cmd) => show(&open()?, cmd.json)?,
        SubCommand::Path(_) => println!("{}", open()?.path().display()),
        SubCommand::Version(_) => println!("winfit {}", VERSION),
    }

    Ok(())
}

fn open_store(config: Option<PathBuf>) -> Result<JsonFileStore> {
    match config {
        Some(path) => Ok(JsonFileStore::new(path)),
        None => JsonFileStore::default_location().context("Failed to locate settings file"),
    }
}

fn show(store: &JsonFileStore, json: bool) -> Result<()> {
    let (settings, source) = match store.read() {
        Ok(settings) => (settings, "saved".to_string()),
        Err(StoreError::NotFound { .. }) => (store.load(), "defaults".to_string()),
        Err(e) => (store.load(), format!("defaults (saved settings unusable: {})", e)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        println!("{}", describe_settings(&settings));
        println!("Source: {}", source);
        println!("File: {}", store.path().display());
    }
    Ok(())
}

fn apply_overrides(base: WindowSettings, cmd: &ApplyCmd) -> Result<WindowSettings> {
    let mut settings = base;

    if let Some(app) = &cmd.app {
        settings.target_app = parse_name("target app", app)?;
        if cmd.process.is_none() {
            settings.process_name = settings.target_app.clone();
        }
    }
    if let Some(process) = &cmd.process {
        settings.process_name = parse_name("process name", process)?;
    }
    if let Some(width) = &cmd.width {
        settings.width_percent = parse_percent("width", width)?;
    }
    if let Some(height) = &cmd.height {
        settings.height_percent = parse_percent("height", height)?;
    }
    if let Some(horizontal) = cmd.horizontal {
        settings.horizontal_anchor = horizontal;
    }
    if let Some(vertical) = cmd.vertical {
        settings.vertical_anchor = vertical;
    }

    settings.validate()?;
    Ok(settings)
}
