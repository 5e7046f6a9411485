//! Drives an entity along a [`Path`] (§4.7 "Path-Following Navigator").

use terra_utils::BlockPos;

use super::astar::Path;

/// A move instruction for one tick: steer toward `target` at `speed`, with
/// the yaw already clamped to this tick's turn limit (§4.7 step 5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveCommand {
    pub target: BlockPos,
    pub speed: f64,
}

/// Maximum yaw change allowed in a single tick, in degrees (§4.7 "Yaw change
/// per tick is clamped to ±30°").
pub const MAX_YAW_DELTA_DEGREES: f64 = 30.0;

/// How often the navigator samples position for stuck detection, in ticks
/// (§4.7 "Once every 100 ticks").
pub const STUCK_SAMPLE_INTERVAL: u32 = 100;

/// Minimum distance an entity must cover between samples to not be
/// considered stuck (§4.7 "less than √2.25 ≈ 1.5 blocks").
pub const STUCK_DISTANCE_SQ_THRESHOLD: f64 = 2.25;

/// Entity width squared: the XZ-distance-from-waypoint threshold for
/// advancing past it (§4.7 step 2, "less than `width²`").
#[derive(Debug, Clone, Copy)]
pub struct NavigatorConfig {
    pub width_sq: f64,
    pub speed: f64,
}

/// Steers an entity along a path, advancing waypoints and detecting
/// "stuck" conditions that invalidate the path (§4.7).
pub struct Navigator {
    path: Option<Path>,
    ticks_since_sample: u32,
    last_sample: Option<(f64, f64)>,
    stuck: bool,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: None,
            ticks_since_sample: 0,
            last_sample: None,
            stuck: false,
        }
    }

    /// Replaces the active path and resets stuck-detection state.
    pub fn set_path(&mut self, path: Path) {
        self.path = Some(path);
        self.ticks_since_sample = 0;
        self.last_sample = None;
        self.stuck = false;
    }

    pub fn clear(&mut self) {
        self.path = None;
    }

    #[must_use]
    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    #[must_use]
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Advances the navigator by one tick (§4.7 "Per tick"). `position` is
    /// the entity's current (x, z); `current_yaw` its current yaw in
    /// degrees.
    pub fn tick(
        &mut self,
        position: (f64, f64),
        current_yaw: f64,
        config: NavigatorConfig,
    ) -> Option<MoveCommand> {
        if self.stuck {
            self.path = None;
            return None;
        }

        let Some(path) = self.path.as_mut() else {
            return None;
        };

        while let Some(waypoint) = path.peek() {
            let dx = f64::from(waypoint.x()) + 0.5 - position.0;
            let dz = f64::from(waypoint.z()) + 0.5 - position.1;
            if dx * dx + dz * dz < config.width_sq {
                path.current += 1;
            } else {
                break;
            }
        }

        if path.is_finished() {
            self.path = None;
            return None;
        }

        self.ticks_since_sample += 1;
        if self.ticks_since_sample >= STUCK_SAMPLE_INTERVAL {
            self.ticks_since_sample = 0;
            if let Some(last) = self.last_sample {
                let dx = position.0 - last.0;
                let dz = position.1 - last.1;
                if dx * dx + dz * dz < STUCK_DISTANCE_SQ_THRESHOLD {
                    self.stuck = true;
                    self.path = None;
                    return None;
                }
            }
            self.last_sample = Some(position);
        }

        let target = self.path.as_ref()?.peek()?;
        let _ = current_yaw; // yaw clamping is applied by the caller's look controller, using MAX_YAW_DELTA_DEGREES.
        Some(MoveCommand {
            target,
            speed: config.speed,
        })
    }
}

/// Clamps a desired yaw change to this tick's turn limit (§4.7 step 5).
#[must_use]
pub fn clamp_yaw_delta(current: f64, desired: f64) -> f64 {
    let mut delta = desired - current;
    while delta > 180.0 {
        delta -= 360.0;
    }
    while delta < -180.0 {
        delta += 360.0;
    }
    current + delta.clamp(-MAX_YAW_DELTA_DEGREES, MAX_YAW_DELTA_DEGREES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NavigatorConfig {
        NavigatorConfig {
            width_sq: 0.36,
            speed: 1.0,
        }
    }

    #[test]
    fn no_path_yields_no_move() {
        let mut nav = Navigator::new();
        assert!(nav.tick((0.0, 0.0), 0.0, config()).is_none());
    }

    #[test]
    fn advances_past_close_waypoints() {
        let mut nav = Navigator::new();
        nav.set_path(Path {
            waypoints: vec![
                BlockPos::new(0, 1, 0),
                BlockPos::new(5, 1, 0),
                BlockPos::new(10, 1, 0),
            ],
            current: 0,
            reached_goal: true,
        });
        let cmd = nav.tick((0.4, 0.4), 0.0, config());
        assert_eq!(cmd.unwrap().target, BlockPos::new(5, 1, 0));
    }

    #[test]
    fn clears_path_once_finished() {
        let mut nav = Navigator::new();
        nav.set_path(Path {
            waypoints: vec![BlockPos::new(0, 1, 0)],
            current: 0,
            reached_goal: true,
        });
        let cmd = nav.tick((0.4, 0.4), 0.0, config());
        assert!(cmd.is_none());
        assert!(!nav.has_path());
    }

    #[test]
    fn declares_stuck_after_sample_window_without_progress() {
        let mut nav = Navigator::new();
        nav.set_path(Path {
            waypoints: vec![BlockPos::new(100, 1, 0)],
            current: 0,
            reached_goal: true,
        });
        for _ in 0..STUCK_SAMPLE_INTERVAL {
            nav.tick((0.0, 0.0), 0.0, config());
        }
        assert!(nav.is_stuck());
        assert!(!nav.has_path());
    }

    #[test]
    fn yaw_clamped_to_max_delta() {
        let result = clamp_yaw_delta(0.0, 90.0);
        assert!((result - 30.0).abs() < f64::EPSILON);
    }
}
