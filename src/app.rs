use crate::export::{self, GifRecorder};
use crate::settings::SimulationSettings;
use crate::simulation::{GrowthSimulation, Phase, Point};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Focus state for parameter editing in the sidebar
/// Alphabetically ordered for consistent UI display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    // Alphabetical order
    Connections,
    Interval,
    IsolationLimit,
    Points,
    Predictions,
    Rate,
    Steps,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in alphabetical order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Connections,
            Focus::Connections => Focus::Interval,
            Focus::Interval => Focus::IsolationLimit,
            Focus::IsolationLimit => Focus::Points,
            Focus::Points => Focus::Predictions,
            Focus::Predictions => Focus::Rate,
            Focus::Rate => Focus::Steps,
            Focus::Steps => Focus::Connections, // Loop back
        }
    }

    /// Shift+Tab cycles through parameters in reverse order
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Steps,
            Focus::Connections => Focus::Steps, // Loop back
            Focus::Interval => Focus::Connections,
            Focus::IsolationLimit => Focus::Interval,
            Focus::Points => Focus::IsolationLimit,
            Focus::Predictions => Focus::Points,
            Focus::Rate => Focus::Predictions,
            Focus::Steps => Focus::Rate,
        }
    }

    /// Get the line index in the parameters box for this focus
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::None | Focus::Controls => 0,
            Focus::Connections => 0,
            Focus::Interval => 1,
            Focus::IsolationLimit => 2,
            Focus::Points => 3,
            Focus::Predictions => 4,
            Focus::Rate => 5,
            Focus::Steps => 6,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }

    /// Simulation parameters are fixed once placement ends; only these
    /// focus targets stay editable afterwards.
    pub fn is_presentation(&self) -> bool {
        matches!(self, Focus::Connections | Focus::Interval | Focus::Predictions)
    }
}

/// Main application state
pub struct App {
    pub simulation: GrowthSimulation,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    /// Live pointer position in world coordinates, for placement preview
    pub cursor: Option<Point>,
    /// One-line operational feedback shown in the sidebar
    pub notice: Option<String>,
    /// Edge length of PNG snapshots in pixels
    pub snapshot_size: u32,
    recorder: Option<GifRecorder>,
    last_step: Instant,
}

impl App {
    pub fn new(settings: SimulationSettings) -> Self {
        Self {
            simulation: GrowthSimulation::new(settings),
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            cursor: None,
            notice: None,
            snapshot_size: 640,
            recorder: None,
            last_step: Instant::now(),
        }
    }

    /// Attach a GIF recorder; one frame gets appended per completed step
    pub fn attach_recorder(&mut self, recorder: GifRecorder) {
        self.recorder = Some(recorder);
    }

    /// Advance the simulation if the phase is RUNNING and the configured
    /// step interval has elapsed. Called once per host-loop frame; pause
    /// and placement suspend stepping simply by this not firing.
    pub fn tick(&mut self, now: Instant) {
        if self.simulation.phase() != Phase::Running {
            return;
        }
        let interval = Duration::from_millis(self.simulation.settings.step_interval_ms);
        if now.duration_since(self.last_step) < interval {
            return;
        }
        self.last_step = now;
        self.simulation.step();
        self.record_frame();
    }

    fn record_frame(&mut self) {
        if let Some(recorder) = &mut self.recorder {
            if let Err(err) = recorder.record_step(&self.simulation) {
                self.notice = Some(err);
                self.recorder = None;
            }
        }
    }

    /// Handle a placement click in world coordinates
    pub fn place_point(&mut self, point: Point) {
        if self.simulation.place_point(point) && self.simulation.phase() == Phase::Running {
            // Give the first step a full interval after the last click
            self.last_step = Instant::now();
            self.notice = Some("Starting simulation...".to_string());
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.simulation.toggle_pause();
    }

    /// Restart the run with the already-placed points
    pub fn restart(&mut self) {
        if self.simulation.phase() != Phase::Placing {
            self.simulation.restart();
            self.last_step = Instant::now();
            self.notice = Some("Restarted".to_string());
        }
    }

    /// Update the live pointer position (world coordinates)
    pub fn set_cursor(&mut self, cursor: Option<Point>) {
        self.cursor = cursor;
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        self.adjust_focused(1);
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        self.adjust_focused(-1);
    }

    fn adjust_focused(&mut self, sign: i32) {
        // Simulation parameters only respond before the run starts
        if self.focus.is_param()
            && !self.focus.is_presentation()
            && self.simulation.phase() != Phase::Placing
        {
            self.notice = Some("Parameters are fixed once the run starts".to_string());
            return;
        }
        if self.focus == Focus::Points {
            self.simulation.adjust_num_points(sign);
            return;
        }
        let settings = &mut self.simulation.settings;
        match self.focus {
            Focus::None | Focus::Controls | Focus::Points => {}
            Focus::Connections => settings.toggle_connections(),
            Focus::Interval => settings.adjust_step_interval(-(sign as i64) * 100),
            Focus::IsolationLimit => settings.adjust_isolation_limit(sign),
            Focus::Predictions => settings.toggle_predictions(),
            Focus::Rate => settings.adjust_expansion_rate(sign as f64 * 0.01),
            Focus::Steps => settings.adjust_total_steps(sign * 5),
        }
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Toggle connection-line rendering
    pub fn toggle_connections(&mut self) {
        self.simulation.settings.toggle_connections();
    }

    /// Toggle predicted-radius rendering
    pub fn toggle_predictions(&mut self) {
        self.simulation.settings.toggle_predictions();
    }

    /// Speed up stepping (shorter interval)
    pub fn increase_speed(&mut self) {
        self.simulation.settings.adjust_step_interval(-100);
    }

    /// Slow down stepping (longer interval)
    pub fn decrease_speed(&mut self) {
        self.simulation.settings.adjust_step_interval(100);
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Write a PNG snapshot of the current state to the working directory
    pub fn snapshot(&mut self) {
        let path = PathBuf::from(format!(
            "circle-growth-step-{}.png",
            self.simulation.step_index()
        ));
        self.notice = Some(match export::save_png(&self.simulation, &path, self.snapshot_size) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(err) => err,
        });
    }
}
