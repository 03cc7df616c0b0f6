mod app;
mod logging;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use floorops_core::{
    build_http_client, spawn_background, tasks::EVENT_QUEUE_CAPACITY, DashboardConfig,
    DashboardEvent, RuntimeState,
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::PathBuf, time::Duration};
use tokio::sync::mpsc;
use tracing::{info, warn};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Parser, Debug)]
#[command(name = "floorops-dashboard", version, about = "Live restaurant floor dashboard")]
struct Args {
    /// Base URL of the floor server; the data endpoint is <url>/data.
    #[arg(long)]
    server_url: Option<String>,
    /// Seconds between health probes.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    probe_interval: Option<u64>,
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    probe_timeout: Option<u64>,
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    fetch_timeout: Option<u64>,
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    clock_tick: Option<u64>,
    /// Directory for floorops-dashboard.log. Logs are discarded when unset.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[arg(long)]
    debug: bool,
}

/// Flags override whatever `base` resolved from the environment.
fn resolve_config(args: &Args, base: DashboardConfig) -> Result<DashboardConfig> {
    let mut config = match args.server_url.as_deref() {
        Some(url) => base
            .with_base_url(url)
            .with_context(|| format!("invalid --server-url {url}"))?,
        None => base,
    };
    if let Some(secs) = args.probe_interval {
        config.probe_interval = Duration::from_secs(secs);
    }
    if let Some(secs) = args.probe_timeout {
        config.probe_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = args.fetch_timeout {
        config.fetch_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = args.clock_tick {
        config.clock_tick = Duration::from_secs(secs);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_path = logging::init_logging(
        logging::resolve_log_dir(args.log_dir.clone()).as_deref(),
        args.debug,
    );
    let config = resolve_config(
        &args,
        DashboardConfig::from_env().context("invalid floor server environment")?,
    )?;
    info!(
        event = "dashboard_start",
        url = %config.data_url(),
        log = ?log_path
    );

    let client = build_http_client().context("building http client")?;
    let runtime = RuntimeState::new();
    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let tasks = spawn_background(runtime.clone(), &config, client, event_tx);
    let grace = config.fetch_timeout + config.probe_timeout + Duration::from_secs(1);

    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(err) => {
            runtime.shutdown();
            tasks.join(grace).await;
            return Err(err);
        }
    };
    let mut app = App::new(runtime.clone());
    let result = run_app(&mut terminal, &mut app, event_rx).await;

    runtime.shutdown();
    if let Err(err) = restore_terminal(&mut terminal) {
        warn!(event = "terminal_restore_failed", error = %err);
    }
    tasks.join(grace).await;
    info!(event = "dashboard_stop");
    result
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Term,
    app: &mut App,
    mut event_rx: mpsc::Receiver<DashboardEvent>,
) -> Result<()> {
    let mut input = EventStream::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;
        tokio::select! {
            Some(event) = event_rx.recv() => {
                app.apply_event(event);
                while let Ok(event) = event_rx.try_recv() {
                    app.apply_event(event);
                }
            }
            maybe_input = input.next() => {
                match maybe_input {
                    Some(Ok(event)) => {
                        if app.handle_input(event) {
                            break;
                        }
                    }
                    Some(Err(err)) => {
                        warn!(event = "terminal_input_error", error = %err);
                        break;
                    }
                    None => break,
                }
            }
            _ = &mut ctrl_c => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["floorops-dashboard"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).expect("valid args")
    }

    #[test]
    fn flags_override_base_config() {
        let config = resolve_config(
            &args(&[
                "--server-url",
                "http://127.0.0.1:8080/",
                "--probe-interval",
                "5",
                "--fetch-timeout",
                "9",
            ]),
            DashboardConfig::default(),
        )
        .expect("config");
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.data_url(), "http://127.0.0.1:8080/data");
        assert_eq!(config.probe_interval, Duration::from_secs(5));
        assert_eq!(config.fetch_timeout, Duration::from_secs(9));
        assert_eq!(config.probe_timeout, Duration::from_secs(3));
        assert_eq!(config.clock_tick, Duration::from_secs(1));
    }

    #[test]
    fn no_flags_keeps_base_config() {
        let config = resolve_config(&args(&[]), DashboardConfig::default()).expect("config");
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn zero_second_intervals_are_rejected() {
        let parsed = Args::try_parse_from(["floorops-dashboard", "--probe-interval", "0"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn unsupported_scheme_is_an_error() {
        let result = resolve_config(
            &args(&["--server-url", "ftp://floor.local"]),
            DashboardConfig::default(),
        );
        assert!(result.is_err());
    }
}
