#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use anyhow::Context;
use blockfall::app::{App, AppResult};
use blockfall::config::{self, Config};
use blockfall::input::map_key_event;
use blockfall::systems::TickOutcome;
use blockfall::ui;
use crossterm::{
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use log::{debug, error, info};
use ratatui::{Terminal, prelude::*};

fn main() -> AppResult<()> {
    let (config, config_error) = match config::loader::load_config_from_file() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_logging(&config)?;

    info!("Starting Blockfall");
    if let Some(e) = config_error {
        error!("Failed to load configuration: {e}");
    } else {
        info!("Configuration loaded successfully");
    }

    // Terminal initialization
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;

    // Key release events are needed to end a fast drop when Down is let go
    let key_release_supported = supports_keyboard_enhancement().unwrap_or(false);
    if key_release_supported {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    info!("Key release reporting: {key_release_supported}");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_config(config);
    app.set_key_release_supported(key_release_supported);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    if key_release_supported {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("Game error: {err:?}");
    }
    info!("Final score {} ({} lines)", app.score(), app.lines());

    res
}

// The TUI owns the terminal, so stderr (and with it env_logger) goes to a file
fn init_logging(config: &Config) -> AppResult<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.log.file)
        .with_context(|| format!("creating log file {}", config.log.file))?;

    let stderr_fd = io::stderr().as_raw_fd();
    let log_file_fd = log_file.as_raw_fd();

    // Safety: both descriptors are open for the duration of the call; dup2 only
    // replaces the stderr descriptor.
    if unsafe { libc::dup2(log_file_fd, stderr_fd) } < 0 {
        return Err(io::Error::last_os_error()).context("redirecting stderr to the log file");
    }

    let env = env_logger::Env::default().default_filter_or(config.log.level.as_str());
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> AppResult<()> {
    let frame_interval = app.config.display.frame_interval();

    // Flush any input left over from before the game started
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    debug!("Entering main loop");
    let mut dirty = true;
    let mut last_render = Instant::now();

    loop {
        if dirty || last_render.elapsed() >= frame_interval {
            terminal.draw(|f| ui::render(f, app))?;
            last_render = Instant::now();
            dirty = false;
        }

        if app.should_quit {
            return Ok(());
        }

        let now = Instant::now();
        if let Some(outcome) = app.update(now) {
            dirty = true;
            if let TickOutcome::GameOver { .. } = outcome {
                info!("Game over, press Enter to restart");
            }
            continue;
        }

        // Sleep until the next drop or frame, whichever is sooner, unless input arrives
        let mut deadline = last_render + frame_interval;
        if let Some(wakeup) = app.next_wakeup() {
            deadline = deadline.min(wakeup);
        }
        let timeout = deadline.saturating_duration_since(Instant::now());

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                debug!("Key event: {key:?}");
                if let Some(command) = map_key_event(&key) {
                    app.handle_command(command, Instant::now());
                    dirty = true;
                }
            }
        }
    }
}
