use serde::{Deserialize, Serialize};

/// Hard cap on the number of placeable points. Connectivity is a brute
/// force O(N^2) pass each step, which is plenty at this scale.
pub const MAX_POINTS: usize = 64;

/// Rectangular world bounds used for display and click clamping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    /// Square viewport covering `min..max` on both axes
    pub fn square(min: f64, max: f64) -> Self {
        Self {
            x_min: min,
            x_max: max,
            y_min: min,
            y_max: max,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Clamp a coordinate into the viewport
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x.clamp(self.x_min, self.x_max),
            y.clamp(self.y_min, self.y_max),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        // Matches the classic plot window: -1..2 on both axes
        Self::square(-1.0, 2.0)
    }
}

/// All simulation settings consolidated into one struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    // === Simulation Parameters (fixed once placement ends) ===
    /// Number of points to place before the run starts (1-64)
    pub num_points: usize,
    /// Radius growth per step for every active circle (0.001-1.0)
    pub expansion_rate: f64,
    /// Total number of discrete steps in a run (1-1000)
    pub total_steps: usize,
    /// Consecutive connection-free steps before a circle freezes (1-100)
    pub isolation_limit: u32,
    /// World bounds for display and click clamping
    pub viewport: Viewport,

    // === Presentation Parameters (adjustable at any time) ===
    /// Wall-clock milliseconds between simulation steps (50-5000)
    pub step_interval_ms: u64,
    /// Draw connection lines between overlapping circles
    pub show_connections: bool,
    /// Draw predicted final radii around active circles
    pub show_predictions: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            // The classic run: 10 hand-placed points, slow growth
            num_points: 10,
            expansion_rate: 0.05,
            total_steps: 20,
            isolation_limit: 4,
            viewport: Viewport::default(),

            step_interval_ms: 1000,
            show_connections: true,
            show_predictions: false,
        }
    }
}

impl SimulationSettings {
    /// Validate the configuration once at startup. The engine assumes a
    /// valid configuration afterwards and has no fallible operations.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_points > MAX_POINTS {
            return Err(format!(
                "num_points must be at most {} (got {})",
                MAX_POINTS, self.num_points
            ));
        }
        if !(self.expansion_rate.is_finite() && self.expansion_rate > 0.0) {
            return Err(format!(
                "expansion_rate must be positive (got {})",
                self.expansion_rate
            ));
        }
        if self.total_steps == 0 {
            return Err("total_steps must be at least 1".to_string());
        }
        if self.isolation_limit == 0 {
            return Err("isolation_limit must be at least 1".to_string());
        }
        let vp = &self.viewport;
        if !(vp.x_min.is_finite()
            && vp.x_max.is_finite()
            && vp.y_min.is_finite()
            && vp.y_max.is_finite())
            || vp.width() <= 0.0
            || vp.height() <= 0.0
        {
            return Err(format!(
                "viewport must have positive extent (got x {}..{}, y {}..{})",
                vp.x_min, vp.x_max, vp.y_min, vp.y_max
            ));
        }
        if self.step_interval_ms == 0 {
            return Err("step_interval_ms must be at least 1".to_string());
        }
        Ok(())
    }

    /// Adjust expansion rate within bounds
    pub fn adjust_expansion_rate(&mut self, delta: f64) {
        self.expansion_rate = (self.expansion_rate + delta).clamp(0.001, 1.0);
    }

    /// Adjust total step count within bounds
    pub fn adjust_total_steps(&mut self, delta: i32) {
        self.total_steps = (self.total_steps as i32 + delta).clamp(1, 1000) as usize;
    }

    /// Adjust isolation limit within bounds
    pub fn adjust_isolation_limit(&mut self, delta: i32) {
        self.isolation_limit = (self.isolation_limit as i32 + delta).clamp(1, 100) as u32;
    }

    /// Adjust step interval within bounds
    pub fn adjust_step_interval(&mut self, delta: i64) {
        self.step_interval_ms = (self.step_interval_ms as i64 + delta).clamp(50, 5000) as u64;
    }

    /// Toggle connection-line rendering
    pub fn toggle_connections(&mut self) {
        self.show_connections = !self.show_connections;
    }

    /// Toggle predicted-radius rendering
    pub fn toggle_predictions(&mut self) {
        self.show_predictions = !self.show_predictions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        assert!(SimulationSettings::default().validate().is_ok());
    }

    #[test]
    fn rejects_nonpositive_rate() {
        let mut settings = SimulationSettings::default();
        settings.expansion_rate = 0.0;
        assert!(settings.validate().is_err());
        settings.expansion_rate = -0.5;
        assert!(settings.validate().is_err());
        settings.expansion_rate = f64::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_zero_steps_and_limit() {
        let mut settings = SimulationSettings::default();
        settings.total_steps = 0;
        assert!(settings.validate().is_err());

        let mut settings = SimulationSettings::default();
        settings.isolation_limit = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_degenerate_viewport() {
        let mut settings = SimulationSettings::default();
        settings.viewport = Viewport::square(1.0, 1.0);
        assert!(settings.validate().is_err());

        settings.viewport = Viewport::square(2.0, -1.0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_too_many_points() {
        let mut settings = SimulationSettings::default();
        settings.num_points = MAX_POINTS + 1;
        assert!(settings.validate().is_err());
        settings.num_points = MAX_POINTS;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn zero_points_is_valid_degenerate_config() {
        let mut settings = SimulationSettings::default();
        settings.num_points = 0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn adjusters_stay_in_bounds() {
        let mut settings = SimulationSettings::default();
        settings.adjust_expansion_rate(100.0);
        assert_eq!(settings.expansion_rate, 1.0);
        settings.adjust_expansion_rate(-100.0);
        assert_eq!(settings.expansion_rate, 0.001);

        settings.adjust_step_interval(-100_000);
        assert_eq!(settings.step_interval_ms, 50);
        settings.adjust_step_interval(100_000);
        assert_eq!(settings.step_interval_ms, 5000);
    }

    #[test]
    fn viewport_clamp_and_contains() {
        let vp = Viewport::square(-1.0, 2.0);
        assert!(vp.contains(0.0, 0.0));
        assert!(!vp.contains(3.0, 0.0));
        assert_eq!(vp.clamp(5.0, -5.0), (2.0, -1.0));
        assert_eq!(vp.clamp(0.5, 0.5), (0.5, 0.5));
    }
}
