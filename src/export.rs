use crate::settings::Viewport;
use crate::simulation::GrowthSimulation;
use image::{Rgba, RgbaImage};
use std::fs::File;
use std::path::Path;

const BACKGROUND: Rgba<u8> = Rgba([18, 18, 28, 255]);
const ACTIVE_COLOR: Rgba<u8> = Rgba([220, 60, 60, 255]);
const FROZEN_COLOR: Rgba<u8> = Rgba([130, 130, 130, 255]);
const PREVIEW_COLOR: Rgba<u8> = Rgba([80, 80, 110, 255]);
const CENTER_COLOR: Rgba<u8> = Rgba([240, 240, 240, 255]);
const CONNECTION_COLOR: Rgba<u8> = Rgba([90, 90, 90, 255]);

/// Map world coordinates to pixel coordinates (y axis flipped)
fn world_to_pixel(vp: &Viewport, width: u32, height: u32, x: f64, y: f64) -> (f64, f64) {
    let px = (x - vp.x_min) / vp.width() * width as f64;
    let py = (vp.y_max - y) / vp.height() * height as f64;
    (px, py)
}

fn plot(image: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

/// Small filled square marking a circle center
fn plot_center(image: &mut RgbaImage, px: f64, py: f64) {
    let cx = px.round() as i64;
    let cy = py.round() as i64;
    for dy in -1..=1 {
        for dx in -1..=1 {
            plot(image, cx + dx, cy + dy, CENTER_COLOR);
        }
    }
}

/// Sample a line segment in pixel space
fn draw_line(image: &mut RgbaImage, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba<u8>) {
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = x0 + (x1 - x0) * t;
        let y = y0 + (y1 - y0) * t;
        plot(image, x.round() as i64, y.round() as i64, color);
    }
}

/// Sample a circle outline in pixel space. Radii are world units and get
/// scaled per axis, so non-square viewports still render correctly.
fn draw_circle(
    image: &mut RgbaImage,
    vp: &Viewport,
    cx: f64,
    cy: f64,
    radius: f64,
    color: Rgba<u8>,
) {
    let (px, py) = world_to_pixel(vp, image.width(), image.height(), cx, cy);
    let rx = radius / vp.width() * image.width() as f64;
    let ry = radius / vp.height() * image.height() as f64;
    let samples = (std::f64::consts::TAU * rx.max(ry)).ceil().max(16.0) as usize;
    for i in 0..samples {
        let angle = i as f64 / samples as f64 * std::f64::consts::TAU;
        let x = px + rx * angle.cos();
        let y = py + ry * angle.sin();
        plot(image, x.round() as i64, y.round() as i64, color);
    }
}

/// Rasterize the current simulation state: connection lines behind,
/// circle outlines colored by active/frozen, centers on top.
pub fn render_frame(sim: &GrowthSimulation, width: u32, height: u32) -> RgbaImage {
    let vp = sim.settings.viewport;
    let mut image = RgbaImage::from_pixel(width, height, BACKGROUND);

    let points = sim.points();

    if sim.settings.show_connections {
        for &(i, j) in sim.connections() {
            let (x0, y0) = world_to_pixel(&vp, width, height, points[i].x, points[i].y);
            let (x1, y1) = world_to_pixel(&vp, width, height, points[j].x, points[j].y);
            draw_line(&mut image, x0, y0, x1, y1, CONNECTION_COLOR);
        }
    }

    for (i, point) in points.iter().enumerate() {
        if sim.settings.show_predictions {
            if let Some(predicted) = sim.predicted_radius(i) {
                draw_circle(&mut image, &vp, point.x, point.y, predicted, PREVIEW_COLOR);
            }
        }
        let color = if sim.is_active(i) {
            ACTIVE_COLOR
        } else {
            FROZEN_COLOR
        };
        if sim.radius(i) > 0.0 {
            draw_circle(&mut image, &vp, point.x, point.y, sim.radius(i), color);
        }
        let (px, py) = world_to_pixel(&vp, width, height, point.x, point.y);
        plot_center(&mut image, px, py);
    }

    image
}

/// Write a PNG snapshot of the current state
pub fn save_png(sim: &GrowthSimulation, path: &Path, size: u32) -> Result<(), String> {
    let image = render_frame(sim, size, size);
    image
        .save(path)
        .map_err(|e| format!("Failed to write snapshot {}: {}", path.display(), e))
}

/// Streams one GIF frame per simulation step to disk
pub struct GifRecorder {
    encoder: gif::Encoder<File>,
    width: u16,
    height: u16,
    /// Frame delay in GIF time units (centiseconds)
    delay: u16,
    frames: usize,
}

impl GifRecorder {
    pub fn create(path: &Path, size: u32, step_interval_ms: u64) -> Result<Self, String> {
        let width = size.clamp(64, 2048) as u16;
        let height = width;
        let file = File::create(path)
            .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
        let mut encoder = gif::Encoder::new(file, width, height, &[])
            .map_err(|e| format!("Failed to start GIF encoder: {}", e))?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| format!("Failed to configure GIF encoder: {}", e))?;
        Ok(Self {
            encoder,
            width,
            height,
            delay: (step_interval_ms / 10).clamp(2, u16::MAX as u64) as u16,
            frames: 0,
        })
    }

    /// Append the current simulation state as one frame
    pub fn push_frame(&mut self, sim: &GrowthSimulation) -> Result<(), String> {
        let image = render_frame(sim, self.width as u32, self.height as u32);
        let mut data = image.into_raw();
        let mut frame = gif::Frame::from_rgba_speed(self.width, self.height, &mut data, 10);
        frame.delay = self.delay;
        self.encoder
            .write_frame(&frame)
            .map_err(|e| format!("Failed to write GIF frame: {}", e))
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn record_step(&mut self, sim: &GrowthSimulation) -> Result<(), String> {
        self.push_frame(sim)?;
        self.frames += 1;
        Ok(())
    }
}
