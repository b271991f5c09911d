//! grapevine — a live-updating view of Twitter trackbacks for a site.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  PollMsg   ┌──────────┐  draw()  ┌──────────┐
//! │  poll.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (thread) │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!      │                       ▲
//!      │ load() + aggregate()  │ handle_key_event()
//!      ▼                       │
//! ┌──────────┐            ┌──────────┐
//! │ grapevine│            │ input.rs │
//! │  (lib)   │            └──────────┘
//! └──────────┘
//! ```
//!
//! * **`config`** — command-line / environment options.
//! * **`poll`** — runs the loader and aggregator on a background thread.
//! * **`app`** — owns all view state (trackbacks, scroll position, etc.).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod app;
mod config;
mod input;
mod poll;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use app::App;
use config::Cli;
use grapevine::{checkpoint, HttpTitleFetcher, TopsyClient};
use poll::{PollMsg, Poller};

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before printing a panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Log to stderr in `--once` mode, otherwise to the log file: the terminal
/// belongs to the UI while it runs.
fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if cli.once {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&cli.log_file)
            .with_context(|| format!("opening log file {}", cli.log_file.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    // -- build the pipeline --------------------------------------------------
    let saved = match &cli.state_file {
        Some(path) => checkpoint::read(path)
            .with_context(|| format!("reading checkpoint {}", path.display()))?,
        None => None,
    };
    let state = cli.initial_state(saved.as_ref())?;
    tracing::info!(site = %cli.site, per_page = cli.per_page, watermark = ?state.watermark, "starting");

    let client = TopsyClient::new(cli.endpoint.clone(), cli.http_timeout())?;
    let fetcher = HttpTitleFetcher::new(cli.http_timeout())?;
    let mut poller = Poller::new(client, fetcher, state).with_checkpoint(cli.state_file.clone());

    if cli.once {
        for t in poller.poll_once()? {
            println!(
                "{}\t@{}\t{}\t{}",
                t.message.created_at.to_rfc3339(),
                t.message.author,
                t.topic_name,
                t.message.url
            );
        }
        tracing::info!(
            topics = poller.topic_count(),
            watermark = ?poller.state().watermark,
            "single load finished"
        );
        return Ok(());
    }

    // -- start background polling --------------------------------------------
    let rx = poll::spawn(poller, cli.poll_interval());

    install_panic_hook();
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(cli.site.clone());

    // -- main event loop -----------------------------------------------------
    // ~10 fps: drain poll results, render, then wait up to one tick for input.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = rx.try_recv() {
            match msg {
                PollMsg::Trackbacks(trackbacks) => {
                    let added = app.merge_trackbacks(trackbacks);
                    app.status = format!("Loaded {added} new trackbacks");
                }
                PollMsg::Error(e) => {
                    app.status = format!("Error: {e}");
                }
            }
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    Ok(())
}
