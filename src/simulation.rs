use crate::settings::SimulationSettings;

/// A placed circle center in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Collecting point placements; the run has not started
    #[default]
    Placing,
    Running,
    Paused,
    /// Step index reached the configured total; state stays visible
    Completed,
}

impl Phase {
    pub fn name(&self) -> &str {
        match self {
            Phase::Placing => "PLACING",
            Phase::Running => "RUNNING",
            Phase::Paused => "PAUSED",
            Phase::Completed => "COMPLETE",
        }
    }
}

/// Circle-growth simulation state.
///
/// Owns the placed centers, per-circle radii and isolation counters, and
/// the connectivity relation of the most recent step. Two circles are
/// connected when the distance between their centers is at most the sum
/// of their radii (tangency included). A circle that spends
/// `isolation_limit` consecutive steps without any connection freezes; a
/// frozen circle keeps its radius in the overlap test and thaws if a
/// growing neighbor reaches it.
pub struct GrowthSimulation {
    pub settings: SimulationSettings,
    points: Vec<Point>,
    radii: Vec<f64>,
    isolation: Vec<u32>,
    step: usize,
    phase: Phase,
    /// Connections of the most recent step, as index pairs with i < j.
    /// Computed once per step and shared by bookkeeping and rendering.
    connections: Vec<(usize, usize)>,
}

impl GrowthSimulation {
    pub fn new(settings: SimulationSettings) -> Self {
        let mut sim = Self {
            settings,
            points: Vec::new(),
            radii: Vec::new(),
            isolation: Vec::new(),
            step: 0,
            phase: Phase::Placing,
            connections: Vec::new(),
        };
        // A zero-point configuration is a valid degenerate run
        if sim.points.len() >= sim.settings.num_points {
            sim.begin_run();
        }
        sim
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn radius(&self, index: usize) -> f64 {
        self.radii[index]
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn isolation_count(&self, index: usize) -> u32 {
        self.isolation[index]
    }

    /// Connections of the most recent step, index pairs with i < j
    pub fn connections(&self) -> &[(usize, usize)] {
        &self.connections
    }

    /// Whether two points were connected on the most recent step.
    /// Symmetric; self-pairs are never connected.
    pub fn connected(&self, i: usize, j: usize) -> bool {
        let pair = if i < j { (i, j) } else { (j, i) };
        i != j && self.connections.contains(&pair)
    }

    /// A point is active while its isolation counter is below the limit
    pub fn is_active(&self, index: usize) -> bool {
        self.isolation[index] < self.settings.isolation_limit
    }

    /// Number of circles whose growth is currently frozen
    pub fn frozen_count(&self) -> usize {
        self.isolation
            .iter()
            .filter(|&&count| count >= self.settings.isolation_limit)
            .count()
    }

    /// Points still needed before the run can start
    pub fn points_remaining(&self) -> usize {
        self.settings.num_points.saturating_sub(self.points.len())
    }

    /// Accept a placement click. Only meaningful while placing; extra
    /// clicks are no-ops. Coordinates are clamped to the viewport.
    /// Returns true if a point was placed.
    pub fn place_point(&mut self, point: Point) -> bool {
        if self.phase != Phase::Placing || self.points.len() >= self.settings.num_points {
            return false;
        }
        let (x, y) = self.settings.viewport.clamp(point.x, point.y);
        self.points.push(Point::new(x, y));
        // Keep the three vectors in lockstep even before the run starts
        self.radii.push(0.0);
        self.isolation.push(0);
        if self.points.len() >= self.settings.num_points {
            self.begin_run();
        }
        true
    }

    /// Radius a circle placed now would freeze at if it never connects
    pub fn placement_preview_radius(&self) -> f64 {
        self.settings.isolation_limit as f64 * self.settings.expansion_rate
    }

    /// Adjust the target point count during placement. Never drops below
    /// the points already placed; shrinking to the placed count starts
    /// the run.
    pub fn adjust_num_points(&mut self, delta: i32) {
        if self.phase != Phase::Placing {
            return;
        }
        let floor = self.points.len().max(1) as i32;
        let max = crate::settings::MAX_POINTS as i32;
        self.settings.num_points =
            (self.settings.num_points as i32 + delta).clamp(floor, max) as usize;
        if self.points.len() >= self.settings.num_points {
            self.begin_run();
        }
    }

    /// Initialize per-run state and enter RUNNING. Positions persist.
    fn begin_run(&mut self) {
        let n = self.points.len();
        self.radii = vec![0.0; n];
        self.isolation = vec![0; n];
        self.step = 0;
        self.connections.clear();
        self.phase = Phase::Running;
    }

    /// Toggle the pause state. Only meaningful during a run.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.phase = Phase::Paused,
            Phase::Paused => self.phase = Phase::Running,
            Phase::Placing | Phase::Completed => {}
        }
    }

    /// Restart the run with the same placed points: radii and isolation
    /// counters back to zero, step index to 0, pause cleared. A restart
    /// while paused wins over the pause. No-op until placement is done.
    pub fn restart(&mut self) {
        match self.phase {
            Phase::Running | Phase::Paused | Phase::Completed => self.begin_run(),
            Phase::Placing => {}
        }
    }

    /// Advance the simulation by one step.
    /// Returns true while the run continues, false otherwise.
    pub fn step(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        let limit = self.settings.isolation_limit;
        let rate = self.settings.expansion_rate;
        let n = self.points.len();

        // 1+2. Grow every active circle; frozen radii stay put
        for i in 0..n {
            if self.isolation[i] < limit {
                self.radii[i] += rate;
            }
        }

        // 3. Recompute connectivity over all unordered pairs. Frozen
        // circles still participate with their frozen radius.
        self.connections.clear();
        let mut touched = vec![false; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let dist = self.points[i].distance(&self.points[j]);
                if dist <= self.radii[i] + self.radii[j] {
                    self.connections.push((i, j));
                    touched[i] = true;
                    touched[j] = true;
                }
            }
        }

        // 4. Touched counters reset; the rest climb toward the limit
        for i in 0..n {
            if touched[i] {
                self.isolation[i] = 0;
            } else {
                self.isolation[i] = self.isolation[i].saturating_add(1);
            }
        }

        // 5. Advance, completing the run at the configured step count
        self.step += 1;
        if self.step >= self.settings.total_steps {
            self.phase = Phase::Completed;
        }

        self.phase == Phase::Running
    }

    /// Advisory projection of a circle's eventual frozen radius assuming
    /// it never connects again. None for already-frozen circles.
    pub fn predicted_radius(&self, index: usize) -> Option<f64> {
        let limit = self.settings.isolation_limit;
        let count = self.isolation[index];
        if count >= limit {
            return None;
        }
        Some(self.radii[index] + (limit - count) as f64 * self.settings.expansion_rate)
    }

    /// Human-readable status summary for the current phase
    pub fn status_line(&self) -> String {
        match self.phase {
            Phase::Placing => format!(
                "Click to place point {}/{}",
                self.points.len() + 1,
                self.settings.num_points
            ),
            Phase::Running | Phase::Paused => {
                let mut line = format!(
                    "Step {}/{} - {} frozen",
                    self.step,
                    self.settings.total_steps,
                    self.frozen_count()
                );
                if self.phase == Phase::Paused {
                    line.push_str(" (PAUSED)");
                }
                line
            }
            Phase::Completed => format!(
                "Complete after {} steps - {} frozen",
                self.step,
                self.frozen_count()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimulationSettings;

    fn settings(
        num_points: usize,
        expansion_rate: f64,
        total_steps: usize,
        isolation_limit: u32,
    ) -> SimulationSettings {
        SimulationSettings {
            num_points,
            expansion_rate,
            total_steps,
            isolation_limit,
            viewport: crate::settings::Viewport::square(-20.0, 20.0),
            ..Default::default()
        }
    }

    fn sim_with_points(
        points: &[(f64, f64)],
        expansion_rate: f64,
        total_steps: usize,
        isolation_limit: u32,
    ) -> GrowthSimulation {
        let mut sim = GrowthSimulation::new(settings(
            points.len(),
            expansion_rate,
            total_steps,
            isolation_limit,
        ));
        for &(x, y) in points {
            assert!(sim.place_point(Point::new(x, y)));
        }
        assert_eq!(sim.phase(), Phase::Running);
        sim
    }

    #[test]
    fn placement_transitions_to_running_at_n() {
        let mut sim = GrowthSimulation::new(settings(2, 0.5, 10, 4));
        assert_eq!(sim.phase(), Phase::Placing);
        assert_eq!(sim.points_remaining(), 2);

        assert!(sim.place_point(Point::new(0.0, 0.0)));
        assert_eq!(sim.phase(), Phase::Placing);

        assert!(sim.place_point(Point::new(1.0, 0.0)));
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(sim.step_index(), 0);
        assert_eq!(sim.radii(), &[0.0, 0.0]);

        // Clicks after N points are collected are no-ops
        assert!(!sim.place_point(Point::new(5.0, 5.0)));
        assert_eq!(sim.points().len(), 2);
    }

    #[test]
    fn placement_clamps_to_viewport() {
        let mut sim = GrowthSimulation::new(settings(1, 0.5, 10, 4));
        sim.place_point(Point::new(100.0, -100.0));
        assert_eq!(sim.points()[0], Point::new(20.0, -20.0));
    }

    #[test]
    fn preview_radius_is_limit_times_rate() {
        let sim = GrowthSimulation::new(settings(3, 0.05, 20, 4));
        assert!((sim.placement_preview_radius() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn radius_grows_linearly_while_touched() {
        // Distance 1.0, rate 0.5, limit 4. Connected from
        // step 1 on, so both circles grow every step.
        let mut sim = sim_with_points(&[(0.0, 0.0), (1.0, 0.0)], 0.5, 10, 4);

        sim.step();
        assert_eq!(sim.radius(0), 0.5);
        assert_eq!(sim.radius(1), 0.5);
        // Sum of radii equals the distance exactly: tangency connects
        assert!(sim.connected(0, 1));
        assert_eq!(sim.isolation_count(0), 0);
        assert_eq!(sim.isolation_count(1), 0);

        for _ in 0..4 {
            sim.step();
        }
        assert_eq!(sim.step_index(), 5);
        assert_eq!(sim.radius(0), 2.5);
        assert_eq!(sim.radius(1), 2.5);
    }

    #[test]
    fn isolated_pair_freezes_at_limit() {
        // Distance 10.0, rate 0.05, limit 4, 20 steps.
        // Max radius sum is 2.0 so the pair never connects.
        let mut sim = sim_with_points(&[(0.0, 0.0), (10.0, 0.0)], 0.05, 20, 4);

        while sim.step() {}
        assert_eq!(sim.phase(), Phase::Completed);
        assert_eq!(sim.step_index(), 20);
        assert!(sim.connections().is_empty());

        // Frozen after 4 isolated steps at radius 4 * 0.05
        assert_eq!(sim.frozen_count(), 2);
        assert!((sim.radius(0) - 0.2).abs() < 1e-12);
        assert!((sim.radius(1) - 0.2).abs() < 1e-12);
        assert!(!sim.is_active(0));
        assert_eq!(sim.predicted_radius(0), None);
    }

    #[test]
    fn frozen_circle_thaws_when_touched() {
        // A and B stay connected and keep growing; C freezes alone, then
        // B grows into it and its counter resets.
        let mut sim = sim_with_points(&[(0.0, 0.0), (1.0, 0.0), (4.0, 0.0)], 0.5, 20, 2);

        // Steps 1-2: C isolated twice, frozen at radius 1.0
        sim.step();
        sim.step();
        assert!(!sim.is_active(2));
        assert_eq!(sim.radius(2), 1.0);

        // Step 3: C stays frozen while B grows on
        sim.step();
        assert_eq!(sim.radius(2), 1.0);
        assert_eq!(sim.radius(1), 1.5);

        // Step 4: B reaches 2.0; 2.0 + 1.0 covers the distance of 3.0,
        // so the frozen C is touched and its counter resets
        sim.step();
        assert!(sim.connected(1, 2));
        assert_eq!(sim.isolation_count(2), 0);
        assert!(sim.is_active(2));
        assert_eq!(sim.radius(2), 1.0);

        // Step 5: growth resumes from the frozen radius
        sim.step();
        assert_eq!(sim.radius(2), 1.5);
    }

    #[test]
    fn connectivity_is_symmetric_and_irreflexive() {
        let mut sim = sim_with_points(&[(0.0, 0.0), (1.0, 0.0), (10.0, 10.0)], 0.5, 10, 4);
        sim.step();
        assert!(sim.connected(0, 1));
        assert!(sim.connected(1, 0));
        assert!(!sim.connected(0, 2));
        assert!(!sim.connected(2, 0));
        assert!(!sim.connected(1, 1));
    }

    #[test]
    fn restart_resets_run_state_but_keeps_points() {
        let mut sim = sim_with_points(&[(0.0, 0.0), (1.0, 0.0)], 0.5, 20, 4);
        for _ in 0..10 {
            sim.step();
        }
        assert_eq!(sim.step_index(), 10);
        let points_before = sim.points().to_vec();

        sim.restart();
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(sim.step_index(), 0);
        assert_eq!(sim.radii(), &[0.0, 0.0]);
        assert_eq!(sim.isolation_count(0), 0);
        assert!(sim.connections().is_empty());
        assert_eq!(sim.points(), points_before.as_slice());
    }

    #[test]
    fn restart_while_paused_resumes_unpaused() {
        let mut sim = sim_with_points(&[(0.0, 0.0), (1.0, 0.0)], 0.5, 20, 4);
        sim.step();
        sim.toggle_pause();
        assert_eq!(sim.phase(), Phase::Paused);
        assert!(!sim.step());

        sim.restart();
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(sim.step_index(), 0);
    }

    #[test]
    fn restart_after_completion_reruns() {
        let mut sim = sim_with_points(&[(0.0, 0.0), (1.0, 0.0)], 0.5, 3, 4);
        while sim.step() {}
        assert_eq!(sim.phase(), Phase::Completed);

        sim.restart();
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(sim.radii(), &[0.0, 0.0]);
    }

    #[test]
    fn restart_during_placement_is_a_noop() {
        let mut sim = GrowthSimulation::new(settings(2, 0.5, 10, 4));
        sim.place_point(Point::new(0.0, 0.0));
        sim.restart();
        assert_eq!(sim.phase(), Phase::Placing);
        assert_eq!(sim.points().len(), 1);
    }

    #[test]
    fn pause_suspends_stepping() {
        let mut sim = sim_with_points(&[(0.0, 0.0), (1.0, 0.0)], 0.5, 10, 4);
        sim.step();
        sim.toggle_pause();
        assert!(!sim.step());
        assert_eq!(sim.step_index(), 1);
        // Connectivity stays queryable while paused
        assert!(sim.connected(0, 1));

        sim.toggle_pause();
        assert!(sim.step());
        assert_eq!(sim.step_index(), 2);
    }

    #[test]
    fn pause_is_meaningless_outside_a_run() {
        let mut sim = GrowthSimulation::new(settings(1, 0.5, 10, 4));
        sim.toggle_pause();
        assert_eq!(sim.phase(), Phase::Placing);
    }

    #[test]
    fn single_point_run_never_connects() {
        let mut sim = sim_with_points(&[(0.0, 0.0)], 0.5, 10, 3);
        while sim.step() {}
        assert_eq!(sim.phase(), Phase::Completed);
        assert!(sim.connections().is_empty());
        // Grew for 3 steps, then froze
        assert_eq!(sim.radius(0), 1.5);
        assert_eq!(sim.frozen_count(), 1);
    }

    #[test]
    fn zero_point_run_is_valid() {
        let mut sim = GrowthSimulation::new(settings(0, 0.5, 5, 3));
        assert_eq!(sim.phase(), Phase::Running);
        while sim.step() {}
        assert_eq!(sim.phase(), Phase::Completed);
        assert!(sim.connections().is_empty());
    }

    #[test]
    fn predicted_radius_projects_to_freeze() {
        let mut sim = sim_with_points(&[(0.0, 0.0), (10.0, 0.0)], 0.05, 20, 4);
        // Before the first step every circle has the full limit ahead
        assert!((sim.predicted_radius(0).unwrap() - 0.2).abs() < 1e-12);

        sim.step();
        // One isolated step down: radius 0.05 + 3 remaining * 0.05
        assert_eq!(sim.isolation_count(0), 1);
        assert!((sim.predicted_radius(0).unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn shrinking_target_count_to_placed_starts_run() {
        let mut sim = GrowthSimulation::new(settings(5, 0.5, 10, 4));
        sim.place_point(Point::new(0.0, 0.0));
        sim.place_point(Point::new(1.0, 0.0));

        // Cannot shrink below what is already placed
        sim.adjust_num_points(-10);
        assert_eq!(sim.settings.num_points, 2);
        assert_eq!(sim.phase(), Phase::Running);
    }

    #[test]
    fn num_points_is_fixed_once_running() {
        let mut sim = sim_with_points(&[(0.0, 0.0), (1.0, 0.0)], 0.5, 10, 4);
        sim.adjust_num_points(5);
        assert_eq!(sim.settings.num_points, 2);
    }

    #[test]
    fn status_line_tracks_phase() {
        let mut sim = GrowthSimulation::new(settings(2, 0.5, 3, 4));
        assert_eq!(sim.status_line(), "Click to place point 1/2");

        sim.place_point(Point::new(0.0, 0.0));
        sim.place_point(Point::new(1.0, 0.0));
        sim.step();
        assert_eq!(sim.status_line(), "Step 1/3 - 0 frozen");

        sim.toggle_pause();
        assert_eq!(sim.status_line(), "Step 1/3 - 0 frozen (PAUSED)");
        sim.toggle_pause();

        while sim.step() {}
        assert_eq!(sim.status_line(), "Complete after 3 steps - 0 frozen");
    }
}
