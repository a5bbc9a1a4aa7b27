mod app;
mod config;
mod export;
mod presets;
mod settings;
mod simulation;
mod ui;

use app::App;
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use export::GifRecorder;
use presets::PresetManager;
use rand::Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::{SimulationSettings, Viewport};
use simulation::{Phase, Point};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "circle-growth")]
#[command(about = "Interactive circle-growth connectivity simulation in the terminal")]
struct Args {
    // === Simulation Parameters ===
    /// Number of points to place before the run starts (1-64, default 10)
    #[arg(short = 'n', long)]
    points: Option<usize>,

    /// Radius growth per step (default 0.05)
    #[arg(short = 'r', long)]
    rate: Option<f64>,

    /// Total number of simulation steps (default 20)
    #[arg(short = 's', long)]
    steps: Option<usize>,

    /// Consecutive isolated steps before a circle freezes (default 4)
    #[arg(short = 'i', long = "isolation-limit")]
    isolation_limit: Option<u32>,

    /// Lower bound of the square viewport (default -1.0)
    #[arg(long = "view-min")]
    view_min: Option<f64>,

    /// Upper bound of the square viewport (default 2.0)
    #[arg(long = "view-max")]
    view_max: Option<f64>,

    /// Scatter the points randomly instead of clicking to place them
    #[arg(long, default_value = "false")]
    random: bool,

    // === Pacing/Display Parameters ===
    /// Milliseconds between simulation steps (default 1000)
    #[arg(long)]
    interval: Option<u64>,

    /// Start with connection lines hidden
    #[arg(long = "hide-connections", default_value = "false")]
    hide_connections: bool,

    /// Start with predicted final radii shown
    #[arg(long, default_value = "false")]
    predictions: bool,

    // === Config/Preset ===
    /// Load settings from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Apply a named preset (classic, sparse, crowded, marathon, or a user preset)
    #[arg(long)]
    preset: Option<String>,

    /// Write the resolved settings to the default config location and continue
    #[arg(long = "save-config", default_value = "false")]
    save_config: bool,

    // === Export ===
    /// Record the run to an animated GIF at this path
    #[arg(long)]
    record: Option<PathBuf>,

    /// Edge length in pixels for GIF/PNG export (default 640)
    #[arg(long = "export-size", default_value = "640")]
    export_size: u32,
}

/// Resolve settings: config file, then preset, then CLI overrides
fn resolve_settings(args: &Args) -> Result<SimulationSettings, String> {
    let mut settings = if let Some(path) = &args.config {
        AppConfig::load_from_file(path)?.settings
    } else if let Some(path) = config::default_config_path().filter(|p| p.exists()) {
        AppConfig::load_from_file(&path)?.settings
    } else {
        SimulationSettings::default()
    };

    if let Some(name) = &args.preset {
        let manager = PresetManager::new();
        match manager.find(name) {
            Some(preset) => settings = preset.settings.clone(),
            None => {
                return Err(format!(
                    "Unknown preset '{}' (known: {})",
                    name,
                    manager.names().join(", ")
                ))
            }
        }
    }

    if let Some(points) = args.points {
        settings.num_points = points.clamp(1, settings::MAX_POINTS);
    }
    if let Some(rate) = args.rate {
        settings.expansion_rate = rate;
    }
    if let Some(steps) = args.steps {
        settings.total_steps = steps;
    }
    if let Some(limit) = args.isolation_limit {
        settings.isolation_limit = limit;
    }
    if args.view_min.is_some() || args.view_max.is_some() {
        let min = args.view_min.unwrap_or(settings.viewport.x_min);
        let max = args.view_max.unwrap_or(settings.viewport.x_max);
        settings.viewport = Viewport::square(min, max);
    }
    if let Some(interval) = args.interval {
        settings.step_interval_ms = interval.clamp(50, 5000);
    }
    if args.hide_connections {
        settings.show_connections = false;
    }
    if args.predictions {
        settings.show_predictions = true;
    }

    settings.validate()?;
    Ok(settings)
}

/// Scatter the configured number of points uniformly inside the viewport
fn scatter_points(app: &mut App) {
    let mut rng = rand::thread_rng();
    let vp = app.simulation.settings.viewport;
    while app.simulation.phase() == Phase::Placing {
        let x = rng.gen_range(vp.x_min..vp.x_max);
        let y = rng.gen_range(vp.y_min..vp.y_max);
        app.place_point(Point::new(x, y));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Validate before touching the terminal so diagnostics stay readable
    let settings = match resolve_settings(&args) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    if args.save_config {
        let app_config = AppConfig {
            version: 1,
            settings: settings.clone(),
        };
        match config::default_config_path() {
            Some(path) => {
                app_config.save_to_file(&path)?;
                eprintln!("Saved config to {}", path.display());
            }
            None => eprintln!("No config directory available; settings not saved"),
        }
    }

    let mut app = App::new(settings);
    app.snapshot_size = args.export_size;

    if let Some(path) = &args.record {
        let recorder = GifRecorder::create(
            path,
            args.export_size,
            app.simulation.settings.step_interval_ms,
        )
        .map_err(io::Error::other)?;
        app.attach_recorder(recorder);
    }

    if args.random {
        scatter_points(&mut app);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps so the placement preview tracks the pointer smoothly
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
                        KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                            app.toggle_help()
                        }
                        KeyCode::Char('c') | KeyCode::Char('C') => app.toggle_connections(),
                        KeyCode::Char('p') | KeyCode::Char('P') => app.toggle_predictions(),
                        KeyCode::Char('x') | KeyCode::Char('X') => app.snapshot(),
                        KeyCode::Char('+') | KeyCode::Char('=') => {
                            app.increase_speed();
                            app.focus = app::Focus::Interval;
                        }
                        KeyCode::Char('-') | KeyCode::Char('_') => {
                            app.decrease_speed();
                            app.focus = app::Focus::Interval;
                        }

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => {
                            if !app.show_help && app.focus.is_param() {
                                app.adjust_focused_up();
                            }
                        }
                        KeyCode::Down => {
                            if !app.show_help && app.focus.is_param() {
                                app.adjust_focused_down();
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() {
                                app.focus = app::Focus::Controls;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => {
                    let frame_area = terminal.size().map(|size| ratatui::layout::Rect {
                        x: 0,
                        y: 0,
                        width: size.width,
                        height: size.height,
                    })?;
                    let inner = ui::canvas_inner(frame_area, app.fullscreen_mode);
                    let world = ui::screen_to_world(
                        inner,
                        &app.simulation.settings.viewport,
                        mouse.column,
                        mouse.row,
                    );
                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            if let Some(point) = world {
                                app.place_point(point);
                            }
                        }
                        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                            app.set_cursor(world);
                        }
                        _ => {}
                    }
                }
                // Canvas bounds are world coordinates; a resize just
                // changes the cell mapping on the next draw
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        // Run simulation tick
        app.tick(Instant::now());
    }
}
