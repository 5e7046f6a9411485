//! Nether portal search and creation (§4.10 "Portals").
//!
//! Mirrors vanilla's two-phase behaviour: reuse a nearby existing portal if
//! one is in range, otherwise carve a fresh frame. Block placement is left
//! to the caller via [`PortalSink`] (§1); this module decides *where*.

use rustc_hash::FxHashMap;
use terra_utils::BlockPos;

/// Horizontal search radius for an existing portal (§4.10 "a 128-block XZ
/// radius scan across all Y layers").
pub const SEARCH_RADIUS_XZ: i32 = 128;

/// How long a negative/positive search result stays cached per chunk
/// coordinate before being re-scanned (§4.10 "cache keyed by chunk
/// coordinate with a 600-tick TTL").
pub const CACHE_TTL_TICKS: i64 = 600;

/// One of the two rectangular clearing shapes tried during portal creation,
/// tried in four (3x4x4) then two (1x4x4) rotations (§4.10 "two-pass
/// search: 3x4x4 clearings in four rotations, then 1x4x4 in two
/// rotations").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalOrientation {
    /// Frame's long axis runs along X.
    AlongX,
    /// Frame's long axis runs along Z.
    AlongZ,
}

impl PortalOrientation {
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::AlongX, Self::AlongZ]
    }
}

/// The Y band a forced platform is built in when no natural clearing is
/// found (§4.10 "a forced platform at `y` in `[70, height-10]`").
pub const FORCED_PLATFORM_MIN_Y: i32 = 70;
pub const FORCED_PLATFORM_MAX_Y_FROM_TOP: i32 = 10;

/// A cached portal search result keyed by chunk coordinate.
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    portal: Option<BlockPos>,
    recorded_tick: i64,
}

/// Caches portal search results so repeated searches from the same region
/// within the TTL window don't re-scan the world.
#[derive(Debug, Default)]
pub struct PortalCache {
    entries: FxHashMap<(i32, i32), CacheEntry>,
}

impl PortalCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key_for(pos: BlockPos) -> (i32, i32) {
        (pos.x().div_euclid(16), pos.z().div_euclid(16))
    }

    /// Returns a cached result for the chunk containing `pos`, if it's
    /// still within the TTL window at `current_tick`.
    #[must_use]
    pub fn lookup(&self, pos: BlockPos, current_tick: i64) -> Option<Option<BlockPos>> {
        let entry = self.entries.get(&Self::key_for(pos))?;
        if current_tick - entry.recorded_tick <= CACHE_TTL_TICKS {
            Some(entry.portal)
        } else {
            None
        }
    }

    pub fn record(&mut self, pos: BlockPos, current_tick: i64, portal: Option<BlockPos>) {
        self.entries.insert(
            Self::key_for(pos),
            CacheEntry {
                portal,
                recorded_tick: current_tick,
            },
        );
    }
}

/// Candidate XZ offsets to scan, ordered nearest-first by Chebyshev ring so
/// a caller walking the list stops at the first standable hit (§4.10).
#[must_use]
pub fn search_offsets() -> Vec<(i32, i32)> {
    let mut offsets = Vec::new();
    for radius in 0..=SEARCH_RADIUS_XZ {
        if radius == 0 {
            offsets.push((0, 0));
            continue;
        }
        for dx in -radius..=radius {
            offsets.push((dx, -radius));
            offsets.push((dx, radius));
        }
        for dz in (-radius + 1)..radius {
            offsets.push((-radius, dz));
            offsets.push((radius, dz));
        }
    }
    offsets
}

/// The set of relative block offsets the obsidian frame occupies for a
/// 4-tall, 4-wide portal in the given orientation, anchored at the frame's
/// bottom-left-front corner: the full perimeter of the rectangle minus its
/// 2x2 interior (§4.10 "obsidian frame ... portal-block fill").
#[must_use]
pub fn frame_offsets(orientation: PortalOrientation) -> Vec<BlockPos> {
    let mut offsets = Vec::new();
    // Frame: two vertical obsidian columns at the ends, obsidian caps at
    // top/bottom, portal blocks filling the 2x2 interior.
    for y in 0..4 {
        let (left, right) = match orientation {
            PortalOrientation::AlongX => (BlockPos::new(0, y, 0), BlockPos::new(3, y, 0)),
            PortalOrientation::AlongZ => (BlockPos::new(0, y, 0), BlockPos::new(0, y, 3)),
        };
        offsets.push(left);
        offsets.push(right);
    }
    for span in 1..3 {
        let (bottom, top) = match orientation {
            PortalOrientation::AlongX => (BlockPos::new(span, 0, 0), BlockPos::new(span, 3, 0)),
            PortalOrientation::AlongZ => (BlockPos::new(0, 0, span), BlockPos::new(0, 3, span)),
        };
        offsets.push(bottom);
        offsets.push(top);
    }
    offsets
}

/// The interior cells that get filled with portal blocks rather than
/// obsidian.
#[must_use]
pub fn interior_offsets(orientation: PortalOrientation) -> Vec<BlockPos> {
    let mut offsets = Vec::new();
    for y in 1..3 {
        for span in 1..3 {
            let pos = match orientation {
                PortalOrientation::AlongX => BlockPos::new(span, y, 0),
                PortalOrientation::AlongZ => BlockPos::new(0, y, span),
            };
            offsets.push(pos);
        }
    }
    offsets
}

/// Receives frame/interior placements and entity teleport motion rotation
/// (§1); this module only computes geometry.
pub trait PortalSink {
    fn place_obsidian(&mut self, pos: BlockPos);
    fn place_portal_block(&mut self, pos: BlockPos);
}

/// Builds a portal frame anchored at `anchor` with the given orientation
/// using `sink` to perform the actual block writes.
pub fn build_portal(sink: &mut impl PortalSink, anchor: BlockPos, orientation: PortalOrientation) {
    for offset in frame_offsets(orientation) {
        sink.place_obsidian(BlockPos::new(anchor.x() + offset.x(), anchor.y() + offset.y(), anchor.z() + offset.z()));
    }
    for offset in interior_offsets(orientation) {
        sink.place_portal_block(BlockPos::new(
            anchor.x() + offset.x(),
            anchor.y() + offset.y(),
            anchor.z() + offset.z(),
        ));
    }
}

/// Picks the forced-platform Y when no natural clearing is found, clamped
/// into `[70, height-10]` (§4.10).
#[must_use]
pub fn forced_platform_y(world_height: i32) -> i32 {
    let top = world_height - FORCED_PLATFORM_MAX_Y_FROM_TOP;
    if top < FORCED_PLATFORM_MIN_Y {
        top
    } else {
        FORCED_PLATFORM_MIN_Y
    }
}

/// The yaw delta (in degrees) an entity's motion is rotated by when it
/// steps through a portal between dimensions whose portal orientations
/// differ by 90 degrees.
#[must_use]
pub fn motion_rotation_degrees(from: PortalOrientation, to: PortalOrientation) -> f32 {
    if from == to {
        0.0
    } else {
        90.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_expires_after_ttl() {
        let mut cache = PortalCache::new();
        let pos = BlockPos::new(0, 64, 0);
        cache.record(pos, 0, Some(BlockPos::new(10, 64, 10)));
        assert!(cache.lookup(pos, 100).is_some());
        assert!(cache.lookup(pos, 601).is_none());
    }

    #[test]
    fn search_offsets_start_at_origin_and_cover_radius() {
        let offsets = search_offsets();
        assert_eq!(offsets[0], (0, 0));
        assert!(offsets.iter().any(|&(x, z)| x == SEARCH_RADIUS_XZ || z == SEARCH_RADIUS_XZ));
        assert!(offsets.iter().all(|&(x, z)| x.abs() <= SEARCH_RADIUS_XZ && z.abs() <= SEARCH_RADIUS_XZ));
    }

    #[test]
    fn frame_has_obsidian_perimeter_and_portal_interior() {
        let frame = frame_offsets(PortalOrientation::AlongX);
        let interior = interior_offsets(PortalOrientation::AlongX);
        assert_eq!(frame.len(), 12);
        assert_eq!(interior.len(), 4);
        for cell in &interior {
            assert!(!frame.contains(cell));
        }
    }

    #[test]
    fn forced_platform_y_respects_bounds() {
        assert_eq!(forced_platform_y(256), 70);
        assert_eq!(forced_platform_y(75), 65);
    }

    #[test]
    fn motion_rotation_depends_on_orientation_change() {
        assert_eq!(motion_rotation_degrees(PortalOrientation::AlongX, PortalOrientation::AlongX), 0.0);
        assert_eq!(motion_rotation_degrees(PortalOrientation::AlongX, PortalOrientation::AlongZ), 90.0);
    }
}
