//! The A\* search (§4.6 "A\* loop").

use rustc_hash::FxHashMap;
use terra_utils::BlockPos;

use super::grid::PathGrid;
use super::heap::OpenHeap;
use super::point::PathPoint;

/// Tunables for a single search (§4.6 "Neighbours").
#[derive(Debug, Clone, Copy)]
pub struct PathfinderConfig {
    /// How far downward a drop may fall before giving up on that column.
    pub max_fall_height: i32,
    /// Heuristic pruning radius: neighbours farther than this from the goal
    /// (squared) are rejected outright.
    pub max_distance_sq: f64,
    /// Whether water cells are forbidden (non-swimmers).
    pub avoid_water: bool,
    /// Hard cap on expanded nodes, guarding against pathological searches.
    pub max_expansions: usize,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            max_fall_height: 4,
            max_distance_sq: 256.0 * 256.0,
            avoid_water: true,
            max_expansions: 4096,
        }
    }
}

/// A completed or partial route (§4.6 "reconstruct ... by walking back
/// pointers and reversing").
#[derive(Debug, Clone, Default)]
pub struct Path {
    pub waypoints: Vec<BlockPos>,
    /// Index of the next unconsumed waypoint (§4.7).
    pub current: usize,
    /// Whether the goal itself was reached, as opposed to a partial path.
    pub reached_goal: bool,
}

impl Path {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current >= self.waypoints.len()
    }

    #[must_use]
    pub fn peek(&self) -> Option<BlockPos> {
        self.waypoints.get(self.current).copied()
    }
}

const CARDINAL_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Runs A\* from `start` to `goal` over `grid` (§4.6). Always returns a
/// [`Path`]: if the goal is unreachable within `config.max_expansions`, the
/// path to the closest node seen is returned instead (§4.6 "partial paths
/// are considered useful").
pub fn find_path(
    grid: &dyn PathGrid,
    start: BlockPos,
    goal: BlockPos,
    config: PathfinderConfig,
) -> Path {
    let mut arena: Vec<PathPoint> = Vec::new();
    let mut index_of: FxHashMap<i32, usize> = FxHashMap::default();
    let mut open = OpenHeap::new();

    let mut start_point = PathPoint::new(start.x(), start.y(), start.z());
    let goal_point = PathPoint::new(goal.x(), goal.y(), goal.z());
    start_point.h = start_point.distance_squared(&goal_point);
    start_point.f = start_point.h;

    let start_index = arena.len();
    index_of.insert(start_point.hash(), start_index);
    arena.push(start_point);
    open.push(&mut arena, start_index);

    let mut closest_index = start_index;
    let mut closest_h = arena[start_index].h;

    let mut expansions = 0usize;
    while let Some(current_index) = open.pop(&mut arena) {
        if arena[current_index].visited {
            continue;
        }
        arena[current_index].visited = true;
        expansions += 1;

        let current = arena[current_index];
        if current.x == goal_point.x && current.y == goal_point.y && current.z == goal_point.z {
            return reconstruct(&arena, current_index, true);
        }
        if current.h < closest_h {
            closest_h = current.h;
            closest_index = current_index;
        }
        if expansions >= config.max_expansions {
            break;
        }

        for neighbour_pos in expand_neighbours(grid, current, &config) {
            let neighbour_point = PathPoint::new(neighbour_pos.0, neighbour_pos.1, neighbour_pos.2);
            if neighbour_point.distance_squared(&goal_point) > config.max_distance_sq {
                continue;
            }
            let step_cost = current.distance_squared(&neighbour_point).max(1.0);
            let tentative_g = current.g + step_cost;
            let hash = neighbour_point.hash();

            let neighbour_index = if let Some(&existing) = index_of.get(&hash) {
                existing
            } else {
                let mut point = neighbour_point;
                point.h = point.distance_squared(&goal_point);
                let idx = arena.len();
                index_of.insert(hash, idx);
                arena.push(point);
                idx
            };

            if arena[neighbour_index].visited {
                continue;
            }

            if tentative_g < arena[neighbour_index].g || arena[neighbour_index].previous_index.is_none() {
                arena[neighbour_index].g = tentative_g;
                arena[neighbour_index].f = tentative_g + arena[neighbour_index].h;
                arena[neighbour_index].previous_index = Some(current_index);

                if arena[neighbour_index].heap_index >= 0 {
                    open.decrease_key(&mut arena, neighbour_index);
                } else {
                    open.push(&mut arena, neighbour_index);
                }
            }
        }
    }

    reconstruct(&arena, closest_index, false)
}

fn expand_neighbours(
    grid: &dyn PathGrid,
    current: PathPoint,
    config: &PathfinderConfig,
) -> Vec<(i32, i32, i32)> {
    let mut out = Vec::with_capacity(4);
    for (dx, dz) in CARDINAL_OFFSETS {
        let x = current.x + dx;
        let z = current.z + dz;

        let above_current = BlockPos::new(current.x, current.y + 1, current.z);
        if grid.is_clear(above_current) {
            let step_up = BlockPos::new(x, current.y + 1, z);
            let node_type = grid.node_type(step_up);
            if node_type.is_walkable(config.avoid_water) && node_type.allows_step_up() {
                out.push((x, current.y + 1, z));
                continue;
            }
            let level = BlockPos::new(x, current.y, z);
            let level_type = grid.node_type(level);
            if level_type.is_walkable(config.avoid_water) {
                out.push((x, current.y, z));
                continue;
            }
        }

        let mut y = current.y;
        let mut fell = 0;
        let mut landed = None;
        while fell < config.max_fall_height {
            let below = BlockPos::new(x, y - 1, z);
            if grid.is_clear(below) {
                y -= 1;
                fell += 1;
                continue;
            }
            let node_type = grid.node_type(below.up());
            if node_type.is_walkable(config.avoid_water) {
                landed = Some(y);
            }
            break;
        }
        if let Some(final_y) = landed {
            out.push((x, final_y, z));
        }
    }
    out
}

fn reconstruct(arena: &[PathPoint], mut index: usize, reached_goal: bool) -> Path {
    let mut waypoints = Vec::new();
    loop {
        let point = arena[index];
        waypoints.push(BlockPos::new(point.x, point.y, point.z));
        match point.previous_index {
            Some(prev) => index = prev,
            None => break,
        }
    }
    waypoints.reverse();
    Path {
        waypoints,
        current: 0,
        reached_goal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::grid::PathBlockType;
    use std::collections::HashSet;

    /// A flat floor at y=0 with air above it, optionally punctured by walls.
    struct FlatFloor {
        walls: HashSet<(i32, i32)>,
    }

    impl PathGrid for FlatFloor {
        fn node_type(&self, pos: BlockPos) -> PathBlockType {
            if pos.y() != 1 {
                return PathBlockType::Blocked;
            }
            if self.walls.contains(&(pos.x(), pos.z())) {
                PathBlockType::Blocked
            } else {
                PathBlockType::Passable
            }
        }

        fn is_clear(&self, pos: BlockPos) -> bool {
            if self.walls.contains(&(pos.x(), pos.z())) {
                return pos.y() != 1 && pos.y() != 2;
            }
            pos.y() != 0
        }
    }

    #[test]
    fn finds_direct_path_on_open_floor() {
        let grid = FlatFloor {
            walls: HashSet::new(),
        };
        let path = find_path(
            &grid,
            BlockPos::new(0, 1, 0),
            BlockPos::new(5, 1, 0),
            PathfinderConfig::default(),
        );
        assert!(path.reached_goal);
        assert_eq!(path.waypoints.first(), Some(&BlockPos::new(0, 1, 0)));
        assert_eq!(path.waypoints.last(), Some(&BlockPos::new(5, 1, 0)));
    }

    #[test]
    fn returns_partial_path_when_goal_unreachable() {
        let mut walls = HashSet::new();
        for z in -10..=10 {
            walls.insert((3, z));
        }
        let grid = FlatFloor { walls };
        let path = find_path(
            &grid,
            BlockPos::new(0, 1, 0),
            BlockPos::new(10, 1, 0),
            PathfinderConfig::default(),
        );
        assert!(!path.reached_goal);
        assert!(!path.waypoints.is_empty());
    }
}
