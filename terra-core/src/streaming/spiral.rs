//! The spiral chunk send order (§4.3 step 3, §8 scenario 2).
//!
//! Walks the four cardinal unit vectors `(1,0), (0,1), (-1,0), (0,-1)` in
//! that order, advancing `layer` steps per direction per cycle: the center
//! chunk first, then run lengths `1, 1, 2, 2, 3, 3, ...` alternating through
//! the four directions. This produces the "inside-out" reveal pattern a
//! player sees as chunks pop in.

use terra_utils::ChunkPos;

const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Returns every chunk within Chebyshev distance `radius` of `center`, in
/// spiral send order, center first.
#[must_use]
pub fn spiral_order(center: ChunkPos, radius: i32) -> Vec<ChunkPos> {
    let side = 2 * radius + 1;
    let total = (side * side) as usize;
    let mut out = Vec::with_capacity(total);
    out.push(center);
    if total <= 1 {
        return out;
    }

    let mut pos = center;
    let mut dir_index = 0usize;
    let mut run_length = 1i32;
    let mut runs_at_this_length = 0u32;

    while out.len() < total {
        let (dx, dz) = DIRECTIONS[dir_index];
        for _ in 0..run_length {
            if out.len() >= total {
                break;
            }
            pos = ChunkPos::new(pos.x + dx, pos.z + dz);
            out.push(pos);
        }
        dir_index = (dir_index + 1) % 4;
        runs_at_this_length += 1;
        if runs_at_this_length == 2 {
            run_length += 1;
            runs_at_this_length = 0;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// §8 scenario 2, "Spiral chunk send": view distance 3, player at
    /// `(0, 64, 0)` (chunk `(0, 0)`). The listed prefix is the 5x5 ring
    /// (radius 2); we check it matches exactly before the outer ring.
    #[test]
    fn matches_the_documented_spiral_prefix() {
        let expected: Vec<ChunkPos> = [
            (0, 0),
            (1, 0),
            (1, 1),
            (0, 1),
            (-1, 1),
            (-1, 0),
            (-1, -1),
            (0, -1),
            (1, -1),
            (2, -1),
            (2, 0),
            (2, 1),
            (2, 2),
            (1, 2),
            (0, 2),
            (-1, 2),
            (-2, 2),
            (-2, 1),
            (-2, 0),
            (-2, -1),
            (-2, -2),
            (-1, -2),
            (0, -2),
            (1, -2),
            (2, -2),
        ]
        .into_iter()
        .map(|(x, z)| ChunkPos::new(x, z))
        .collect();

        let order = spiral_order(ChunkPos::new(0, 0), 3);
        assert_eq!(&order[..expected.len()], expected.as_slice());
    }

    #[test]
    fn covers_every_chunk_in_the_square_exactly_once() {
        let radius = 4;
        let order = spiral_order(ChunkPos::new(5, -5), radius);
        let side = 2 * radius + 1;
        assert_eq!(order.len(), (side * side) as usize);
        let unique: std::collections::HashSet<_> = order.iter().collect();
        assert_eq!(unique.len(), order.len());
        for pos in &order {
            assert!(ChunkPos::new(5, -5).chebyshev_distance(pos) <= radius);
        }
    }
}
