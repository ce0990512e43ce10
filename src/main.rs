mod api;
mod app;
mod config;
mod launch;
mod logging;
mod scroll;
mod state;
mod ui;

use api::LaunchClient;
use app::App;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use indicatif::{ProgressBar, ProgressStyle};
use launch::LaunchRecord;
use ratatui::layout::Rect;
use scroll::ScrollGate;
use std::path::PathBuf;
use std::time::Duration;

/// Rows moved by PgUp/PgDn inside the detail overlay.
const DETAIL_PAGE: i16 = 5;

/// Browse SpaceX's 2020 launches in the terminal
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Launch list URL (defaults to the 2020 listing of the v3 API)
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive explorer (default)
    Run,
    /// Fetch once and print the launches
    List {
        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }

    match config::project_dirs() {
        Ok(dirs) => {
            if let Err(e) = logging::init(dirs.cache_dir(), &config.log_level) {
                eprintln!("Warning: logging disabled: {e}");
            }
        }
        Err(e) => eprintln!("Warning: logging disabled: {e}"),
    }
    tracing::info!("launch-explorer v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Commands::Run) {
        Commands::List { json } => list_launches(&config, json).await?,
        Commands::Run => {
            let client = LaunchClient::new(&config)?;
            let mut app = App::new(ScrollGate::default());

            // Init terminal; everything after this point restores it before reporting
            let mut terminal = ratatui::init();
            let result = start_app(&mut terminal, &mut app, client, config.tick_rate());

            // Restore terminal
            let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
            ratatui::restore();
            drop(app);

            if let Err(e) = result {
                tracing::error!("terminal failure: {e}");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn start_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    client: LaunchClient,
    tick_rate: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;

    let size = terminal.size()?;
    app.update_viewport(Rect::new(0, 0, size.width, size.height));
    app.mount(client);

    run_app(terminal, app, tick_rate)
}

fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    tick_rate: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.poll_fetch();
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        if crossterm::event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                Event::Resize(width, height) => {
                    app.update_viewport(Rect::new(0, 0, width, height));
                }
                _ => {}
            }
        }
        app.tick();
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.overlay().is_some() {
        handle_detail_key(app, key);
        return;
    }

    if key.code == KeyCode::Char('?') {
        app.show_help = true;
        return;
    }

    handle_list_key(app, key);
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.cursor_next();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.cursor_prev();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.cursor_down();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.cursor_up();
        }
        KeyCode::PageDown => {
            app.page_down();
        }
        KeyCode::PageUp => {
            app.page_up();
        }
        KeyCode::Char('g') | KeyCode::Home => {
            app.cursor_first();
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor_last();
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.open_detail();
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
            app.dismiss();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_detail(1);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_detail(-1);
        }
        KeyCode::PageDown => {
            app.scroll_detail(DETAIL_PAGE);
        }
        KeyCode::PageUp => {
            app.scroll_detail(-DETAIL_PAGE);
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let overlay_open = app.overlay().is_some();
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.click(mouse.column, mouse.row),
        MouseEventKind::ScrollDown if overlay_open => app.scroll_detail(1),
        MouseEventKind::ScrollUp if overlay_open => app.scroll_detail(-1),
        MouseEventKind::ScrollDown => app.scroll_rows(1),
        MouseEventKind::ScrollUp => app.scroll_rows(-1),
        _ => {}
    }
}

fn summary_line(launch: &LaunchRecord) -> String {
    format!(
        "{:>4}  {}  ({})",
        launch.flight_number, launch.mission_name, launch.rocket.rocket_name
    )
}

async fn list_launches(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let client = LaunchClient::new(config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Fetching {}", client.endpoint()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = client.fetch_launches().await;
    pb.finish_and_clear();

    match result {
        Ok(launches) if json => {
            println!("{}", serde_json::to_string_pretty(&launches)?);
        }
        Ok(launches) => {
            for launch in &launches {
                println!("{}", summary_line(launch));
            }
        }
        Err(e) => {
            tracing::warn!("list failed: {e}");
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    }
    Ok(())
}
