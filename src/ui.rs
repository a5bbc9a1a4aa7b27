use crate::app::{App, Focus};
use crate::settings::Viewport;
use crate::simulation::{Phase, Point};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
        Block, BorderType, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;
const ACTIVE_COLOR: Color = Color::Red;
const FROZEN_COLOR: Color = Color::DarkGray;
const CONNECTION_COLOR: Color = Color::Gray;
const PREVIEW_COLOR: Color = Color::DarkGray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// The canvas interior (inside borders) for a given frame size.
/// Mouse coordinates are mapped against this rect.
pub fn canvas_inner(frame_area: Rect, fullscreen: bool) -> Rect {
    let canvas = if fullscreen {
        frame_area
    } else {
        Rect {
            x: frame_area.x + SIDEBAR_WIDTH,
            y: frame_area.y,
            width: frame_area.width.saturating_sub(SIDEBAR_WIDTH),
            height: frame_area.height,
        }
    };
    Rect {
        x: canvas.x + 1,
        y: canvas.y + 1,
        width: canvas.width.saturating_sub(2),
        height: canvas.height.saturating_sub(2),
    }
}

/// Map a terminal cell inside the canvas interior to world coordinates.
/// Returns None for positions outside the canvas.
pub fn screen_to_world(inner: Rect, viewport: &Viewport, column: u16, row: u16) -> Option<Point> {
    if inner.width == 0
        || inner.height == 0
        || column < inner.x
        || row < inner.y
        || column >= inner.x + inner.width
        || row >= inner.y + inner.height
    {
        return None;
    }
    // Cell centers, terminal rows growing downward
    let fx = (column - inner.x) as f64 + 0.5;
    let fy = (row - inner.y) as f64 + 0.5;
    let x = viewport.x_min + fx / inner.width as f64 * viewport.width();
    let y = viewport.y_max - fy / inner.height as f64 * viewport.height();
    Some(Point::new(x, y))
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),  // Status
            Constraint::Length(9),  // Parameters
            Constraint::Min(10),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Circle Growth ");

    let sim = &app.simulation;
    let total = sim.settings.total_steps.max(1);
    let progress = sim.step_index() as f32 / total as f32;
    let progress_width = (area.width.saturating_sub(4)) as usize;
    let filled = (progress * progress_width as f32) as usize;
    let empty = progress_width.saturating_sub(filled);

    let status_color = match sim.phase() {
        Phase::Placing => HIGHLIGHT_COLOR,
        Phase::Running => BORDER_COLOR,
        Phase::Paused => HIGHLIGHT_COLOR,
        Phase::Completed => Color::Green,
    };

    let phase = sim.phase();
    let mut content = vec![
        Line::from(Span::styled(
            sim.status_line(),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
            Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(
            phase.name(),
            Style::default().fg(status_color),
        )),
    ];
    if let Some(notice) = &app.notice {
        content.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(DIM_TEXT_COLOR),
        )));
    }

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let sim = &app.simulation;
    let settings = &sim.settings;
    let on_off = |flag: bool| if flag { "on" } else { "off" }.to_string();

    let content = vec![
        make_line(
            "Lines",
            on_off(settings.show_connections),
            app.focus == Focus::Connections,
        ),
        make_line(
            "Interval",
            format!("{}ms", settings.step_interval_ms),
            app.focus == Focus::Interval,
        ),
        make_line(
            "Isolation",
            format!("{}", settings.isolation_limit),
            app.focus == Focus::IsolationLimit,
        ),
        make_line(
            "Points",
            format!("{}/{}", sim.points().len(), settings.num_points),
            app.focus == Focus::Points,
        ),
        make_line(
            "Predict",
            on_off(settings.show_predictions),
            app.focus == Focus::Predictions,
        ),
        make_line(
            "Rate",
            format!("{:.3}", settings.expansion_rate),
            app.focus == Focus::Rate,
        ),
        make_line(
            "Steps",
            format!("{}", settings.total_steps),
            app.focus == Focus::Steps,
        ),
    ];

    // Calculate scroll to keep focused item visible based on actual area
    let focus_line = app.focus.line_index();
    let visible_height = area.height.saturating_sub(2); // minus borders
    let content_height = content.len() as u16;

    let scroll = if visible_height == 0 || visible_height >= content_height {
        0
    } else if focus_line >= visible_height {
        focus_line.saturating_sub(visible_height - 1)
    } else {
        0
    };

    let paragraph = Paragraph::new(content).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let place_desc = if app.simulation.phase() == Phase::Placing {
        "place point"
    } else {
        "(placement done)"
    };

    let content = vec![
        make_control("Click", place_desc),
        make_control("Space", "pause/resume"),
        make_control("R", "restart run"),
        make_control("C", "connection lines"),
        make_control("P", "predicted radii"),
        make_control("X", "PNG snapshot"),
        make_control("+/-", "speed"),
        make_control("Tab", "edit params"),
        make_control("V", "fullscreen"),
        make_control("H/?", "help"),
        make_control("Q", "quit"),
    ];

    let block = styled_block(" Controls ");
    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let sim = &app.simulation;
    let vp = sim.settings.viewport;

    let canvas = Canvas::default()
        .block(styled_block(""))
        .marker(Marker::Braille)
        .x_bounds([vp.x_min, vp.x_max])
        .y_bounds([vp.y_min, vp.y_max])
        .paint(|ctx| {
            let points = sim.points();

            // Connections first so they sit behind the circles
            if sim.settings.show_connections {
                for &(i, j) in sim.connections() {
                    ctx.draw(&CanvasLine {
                        x1: points[i].x,
                        y1: points[i].y,
                        x2: points[j].x,
                        y2: points[j].y,
                        color: CONNECTION_COLOR,
                    });
                }
            }

            for (i, point) in points.iter().enumerate() {
                if sim.settings.show_predictions {
                    if let Some(predicted) = sim.predicted_radius(i) {
                        ctx.draw(&Circle {
                            x: point.x,
                            y: point.y,
                            radius: predicted,
                            color: PREVIEW_COLOR,
                        });
                    }
                }
                if sim.radius(i) > 0.0 {
                    let color = if sim.is_active(i) {
                        ACTIVE_COLOR
                    } else {
                        FROZEN_COLOR
                    };
                    ctx.draw(&Circle {
                        x: point.x,
                        y: point.y,
                        radius: sim.radius(i),
                        color,
                    });
                }
            }

            // Center dots on top
            let centers: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
            ctx.draw(&Points {
                coords: &centers,
                color: TEXT_COLOR,
            });

            // Placement preview follows the pointer
            if sim.phase() == Phase::Placing {
                if let Some(cursor) = app.cursor {
                    ctx.draw(&Circle {
                        x: cursor.x,
                        y: cursor.y,
                        radius: sim.placement_preview_radius(),
                        color: PREVIEW_COLOR,
                    });
                    ctx.draw(&Points {
                        coords: &[(cursor.x, cursor.y)],
                        color: HIGHLIGHT_COLOR,
                    });
                }
            }
        });

    frame.render_widget(canvas, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    // Calculate the canvas area (exclude sidebar unless fullscreen)
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(32);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "CIRCLE-GROWTH CONNECTIVITY",
            Style::default().fg(BORDER_COLOR),
        )),
        Line::from(""),
        Line::from("Click to place points, then circles grow around them each step. Overlapping circles are connected; a circle that spends too many consecutive steps without a connection freezes and stops growing."),
        Line::from(""),
        Line::from(Span::styled("PLACEMENT:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("The faint circle under the pointer previews the radius a point would freeze at if it never connects (isolation limit x rate)."),
        Line::from(""),
        Line::from(Span::styled("DURING A RUN:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Red circles are still growing. Gray circles are frozen; a frozen circle thaws if a growing neighbor reaches it. Lines join connected pairs."),
        Line::from(""),
        Line::from(Span::styled("R - Restart", Style::default().fg(TEXT_COLOR))),
        Line::from("Re-runs from step 0 with the same points. Works while paused too (and unpauses)."),
        Line::from(""),
        Line::from(Span::styled("P - Predicted Radii", Style::default().fg(TEXT_COLOR))),
        Line::from("Faint rings show where each active circle will freeze if it stays isolated."),
        Line::from(""),
        Line::from(Span::styled("X - Snapshot", Style::default().fg(TEXT_COLOR))),
        Line::from("Writes a PNG of the current state to the working directory. Use --record to capture a whole run as a GIF."),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Tab/Shift-Tab selects, Up/Down adjusts. Simulation parameters lock once placement ends; interval and display toggles stay live."),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, R=Restart, C=Lines, P=Predictions, V=Fullscreen, +/-=Speed, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_inside_canvas_maps_into_viewport() {
        let inner = Rect {
            x: 25,
            y: 1,
            width: 60,
            height: 30,
        };
        let vp = Viewport::square(-1.0, 2.0);

        // Center cell lands near the viewport center
        let point = screen_to_world(inner, &vp, 25 + 30, 1 + 15).unwrap();
        assert!((point.x - 0.5).abs() < 0.1);
        assert!((point.y - 0.5).abs() < 0.1);

        // Every in-canvas cell maps inside the viewport
        for column in inner.x..inner.x + inner.width {
            for row in inner.y..inner.y + inner.height {
                let p = screen_to_world(inner, &vp, column, row).unwrap();
                assert!(vp.contains(p.x, p.y));
            }
        }
    }

    #[test]
    fn click_outside_canvas_is_rejected() {
        let inner = Rect {
            x: 25,
            y: 1,
            width: 60,
            height: 30,
        };
        let vp = Viewport::default();
        assert!(screen_to_world(inner, &vp, 0, 5).is_none()); // sidebar
        assert!(screen_to_world(inner, &vp, 30, 0).is_none()); // top border
        assert!(screen_to_world(inner, &vp, 85, 5).is_none()); // past right edge
        assert!(screen_to_world(inner, &vp, 30, 31).is_none()); // below
    }

    #[test]
    fn top_of_canvas_is_top_of_world() {
        let inner = Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        };
        let vp = Viewport::square(0.0, 1.0);
        let top = screen_to_world(inner, &vp, 5, 0).unwrap();
        let bottom = screen_to_world(inner, &vp, 5, 9).unwrap();
        assert!(top.y > bottom.y);
    }

    #[test]
    fn canvas_inner_excludes_sidebar_and_borders() {
        let frame = Rect {
            x: 0,
            y: 0,
            width: 100,
            height: 40,
        };
        let inner = canvas_inner(frame, false);
        assert_eq!(inner.x, SIDEBAR_WIDTH + 1);
        assert_eq!(inner.y, 1);
        assert_eq!(inner.width, 100 - SIDEBAR_WIDTH - 2);
        assert_eq!(inner.height, 38);

        let full = canvas_inner(frame, true);
        assert_eq!(full.x, 1);
        assert_eq!(full.width, 98);
    }

    #[test]
    fn tiny_terminal_does_not_underflow() {
        let frame = Rect {
            x: 0,
            y: 0,
            width: 5,
            height: 2,
        };
        let inner = canvas_inner(frame, false);
        assert_eq!(inner.width, 0);
        let vp = Viewport::default();
        assert!(screen_to_world(inner, &vp, 3, 1).is_none());
    }
}
