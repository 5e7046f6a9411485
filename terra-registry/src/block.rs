//! Mechanics-relevant block properties.
//!
//! This registry deliberately stops well short of a full block/item
//! interaction model (that surface is an external collaborator, §1). It only
//! carries what the world tick, redstone engine, and pathfinder need to
//! decide: does this cell block movement and light, can a piston push it,
//! does it tick randomly, and how should the navigator classify standing on
//! it.
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

use crate::material::{materials, Material};

/// Standability classification for the A* pathfinder (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathBlockType {
    /// Not walkable.
    Blocked,
    /// Ordinary walkable surface (dirt, stone, wood).
    Passable,
    /// Walkable with a special consideration (open trapdoor, swimmable water).
    Open,
    /// A fence gate: forbids step-up, must be opened.
    FenceGate,
    /// A trapdoor: forbids step-up unless already open.
    Trapdoor,
    /// Water: forbidden when the navigator's water-avoidance flag is set.
    Water,
    /// Lava: always forbidden.
    Lava,
}

/// A single block definition keyed by its classic numeric id.
#[derive(Debug, Clone, Copy)]
pub struct BlockDefinition {
    pub id: u16,
    pub name: &'static str,
    pub material: &'static Material,
    /// Light blocked when passing through this block, in `[0, 15]`.
    pub light_opacity: u8,
    /// Light emitted by this block, in `[0, 15]`.
    pub light_emission: u8,
    /// Whether this block receives a random tick each tick cycle (§4.1 pass 5).
    pub ticks_randomly: bool,
    /// Whether this block carries an associated tile/block entity.
    pub has_block_entity: bool,
    /// Explicit piston-push exclusion, independent of material: obsidian and
    /// bedrock share a material with ordinary pushable stone but must never
    /// move (§4.8 `can_push`).
    pub immovable: bool,
    pub standability: PathBlockType,
}

impl BlockDefinition {
    /// Whether a piston can push this block (§4.8 `can_push`): excludes
    /// obsidian, bedrock, extended piston parts, portals, and
    /// tile-entity-bearing blocks.
    #[must_use]
    pub const fn can_push(&self) -> bool {
        !self.has_block_entity
            && !self.immovable
            && !matches!(self.material.kind, crate::material::MaterialKind::Portal)
    }

    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.material.blocks_movement()
    }
}

macro_rules! block {
    ($id:expr, $name:expr, $material:expr, $opacity:expr, $emission:expr, $random_tick:expr, $block_entity:expr, $standability:expr) => {
        block!(
            $id, $name, $material, $opacity, $emission, $random_tick, $block_entity, false,
            $standability
        )
    };
    ($id:expr, $name:expr, $material:expr, $opacity:expr, $emission:expr, $random_tick:expr, $block_entity:expr, $immovable:expr, $standability:expr) => {
        BlockDefinition {
            id: $id,
            name: $name,
            material: &$material,
            light_opacity: $opacity,
            light_emission: $emission,
            ticks_randomly: $random_tick,
            has_block_entity: $block_entity,
            immovable: $immovable,
            standability: $standability,
        }
    };
}

/// The classic (1.7.10-era) block table, restricted to blocks whose
/// mechanical properties this crate's simulation logic actually consults.
pub static BLOCKS: &[BlockDefinition] = &[
    block!(0, "air", materials::AIR, 0, 0, false, false, PathBlockType::Passable),
    block!(1, "stone", materials::ROCK, 15, 0, false, false, PathBlockType::Blocked),
    block!(2, "grass", materials::GRASS, 15, 0, true, false, PathBlockType::Blocked),
    block!(3, "dirt", materials::GROUND, 15, 0, false, false, PathBlockType::Blocked),
    block!(4, "cobblestone", materials::ROCK, 15, 0, false, false, PathBlockType::Blocked),
    block!(5, "planks", materials::WOOD, 15, 0, false, false, PathBlockType::Blocked),
    block!(7, "bedrock", materials::ROCK, 15, 0, false, false, true, PathBlockType::Blocked),
    block!(8, "flowing_water", materials::WATER, 3, 0, true, false, PathBlockType::Water),
    block!(9, "water", materials::WATER, 3, 0, true, false, PathBlockType::Water),
    block!(10, "flowing_lava", materials::LAVA, 0, 15, true, false, PathBlockType::Lava),
    block!(11, "lava", materials::LAVA, 0, 15, true, false, PathBlockType::Lava),
    block!(12, "sand", materials::SAND, 15, 0, true, false, PathBlockType::Blocked),
    block!(13, "gravel", materials::SAND, 15, 0, true, false, PathBlockType::Blocked),
    block!(17, "log", materials::WOOD, 15, 0, false, false, PathBlockType::Blocked),
    block!(18, "leaves", materials::LEAVES, 1, 0, true, false, PathBlockType::Blocked),
    block!(20, "glass", materials::GLASS, 0, 0, false, false, PathBlockType::Blocked),
    block!(24, "sandstone", materials::ROCK, 15, 0, false, false, PathBlockType::Blocked),
    block!(26, "bed", materials::WOOD, 0, 0, false, true, PathBlockType::Blocked),
    block!(29, "sticky_piston", materials::PISTON, 0, 0, false, true, PathBlockType::Blocked),
    block!(33, "piston", materials::PISTON, 0, 0, false, true, PathBlockType::Blocked),
    block!(34, "piston_head", materials::PISTON, 0, 0, false, false, true, PathBlockType::Blocked),
    block!(36, "piston_extension", materials::PISTON, 0, 0, false, false, true, PathBlockType::Blocked),
    block!(46, "tnt", materials::TNT, 0, 0, false, false, PathBlockType::Blocked),
    block!(49, "obsidian", materials::ROCK, 15, 0, false, false, true, PathBlockType::Blocked),
    block!(50, "torch", materials::CIRCUITS, 0, 14, false, false, PathBlockType::Open),
    block!(54, "chest", materials::WOOD, 0, 0, false, true, PathBlockType::Blocked),
    block!(55, "redstone_wire", materials::CIRCUITS, 0, 0, false, false, PathBlockType::Passable),
    block!(61, "furnace", materials::ROCK, 15, 0, false, true, PathBlockType::Blocked),
    block!(62, "lit_furnace", materials::ROCK, 15, 13, false, true, PathBlockType::Blocked),
    block!(63, "standing_sign", materials::WOOD, 0, 0, false, true, PathBlockType::Blocked),
    block!(64, "wooden_door", materials::WOOD, 0, 0, false, false, PathBlockType::Blocked),
    block!(65, "ladder", materials::CIRCUITS, 0, 0, false, false, PathBlockType::Open),
    block!(66, "rail", materials::CIRCUITS, 0, 0, false, false, PathBlockType::Passable),
    block!(69, "lever", materials::CIRCUITS, 0, 0, false, false, PathBlockType::Open),
    block!(
        70,
        "stone_pressure_plate",
        materials::CIRCUITS,
        0,
        0,
        false,
        false,
        PathBlockType::Open
    ),
    block!(71, "iron_door", materials::ROCK, 0, 0, false, false, PathBlockType::Blocked),
    block!(
        72,
        "wooden_pressure_plate",
        materials::CIRCUITS,
        0,
        0,
        false,
        false,
        PathBlockType::Open
    ),
    block!(73, "redstone_ore", materials::ROCK, 15, 0, true, false, PathBlockType::Blocked),
    block!(74, "lit_redstone_ore", materials::ROCK, 15, 9, true, false, PathBlockType::Blocked),
    block!(75, "unlit_redstone_torch", materials::CIRCUITS, 0, 0, true, false, PathBlockType::Open),
    block!(76, "redstone_torch", materials::CIRCUITS, 0, 7, true, false, PathBlockType::Open),
    block!(
        77,
        "stone_button",
        materials::CIRCUITS,
        0,
        0,
        false,
        false,
        PathBlockType::Open
    ),
    block!(79, "ice", materials::ICE, 3, 0, true, false, PathBlockType::Blocked),
    block!(81, "cactus", materials::PLANTS, 0, 0, true, false, PathBlockType::Blocked),
    block!(90, "portal", materials::PORTAL, 0, 11, true, false, true, PathBlockType::Blocked),
    block!(92, "cake", materials::PLANTS, 0, 0, false, false, PathBlockType::Blocked),
    block!(93, "unpowered_repeater", materials::CIRCUITS, 0, 0, true, false, PathBlockType::Passable),
    block!(94, "powered_repeater", materials::CIRCUITS, 0, 0, true, false, PathBlockType::Passable),
    block!(
        96,
        "trapdoor",
        materials::CIRCUITS,
        0,
        0,
        false,
        false,
        PathBlockType::Trapdoor
    ),
    block!(107, "fence_gate", materials::WOOD, 0, 0, false, false, PathBlockType::FenceGate),
    block!(120, "end_portal_frame", materials::GLASS, 0, 1, false, false, PathBlockType::Blocked),
    block!(123, "redstone_lamp", materials::ROCK, 15, 0, false, false, PathBlockType::Blocked),
    block!(124, "lit_redstone_lamp", materials::ROCK, 15, 15, false, false, PathBlockType::Blocked),
    block!(
        149,
        "unpowered_comparator",
        materials::CIRCUITS,
        0,
        0,
        false,
        true,
        PathBlockType::Passable
    ),
    block!(
        150,
        "powered_comparator",
        materials::CIRCUITS,
        0,
        9,
        false,
        true,
        PathBlockType::Passable
    ),
];

fn by_id_index() -> &'static FxHashMap<u16, usize> {
    static INDEX: OnceLock<FxHashMap<u16, usize>> = OnceLock::new();
    INDEX.get_or_init(|| BLOCKS.iter().enumerate().map(|(i, b)| (b.id, i)).collect())
}

/// Looks up a block definition by its classic numeric id.
///
/// Unknown ids resolve to `air`'s definition (the same fallback the classic
/// client applies when it encounters an id it doesn't recognize), matching
/// index 0 of [`BLOCKS`].
#[must_use]
pub fn get(id: u16) -> &'static BlockDefinition {
    by_id_index()
        .get(&id)
        .map_or(&BLOCKS[0], |&idx| &BLOCKS[idx])
}

/// Looks up a block definition by name, used by the command dispatcher's
/// `/setblock`-style argument parsing.
#[must_use]
pub fn by_name(name: &str) -> Option<&'static BlockDefinition> {
    BLOCKS.iter().find(|b| b.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_falls_back_to_air() {
        assert_eq!(get(9999).name, "air");
    }

    #[test]
    fn obsidian_and_bedrock_cannot_be_pushed() {
        assert!(!get(49).can_push());
        assert!(!get(7).can_push());
        assert!(get(1).can_push(), "ordinary stone shares obsidian's material but must be pushable");
    }

    #[test]
    fn redstone_torch_emits_light_and_ticks() {
        let torch = get(76);
        assert_eq!(torch.light_emission, 7);
        assert!(torch.ticks_randomly);
    }
}
