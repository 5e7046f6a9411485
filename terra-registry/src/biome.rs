//! Biome classification table (§4.9 "Biome"): surface block selection,
//! climate values consumed by `GenLayers`, and the decoration/mob-spawn
//! parameters the generator reads per column.

/// A height preset: root height and variation, the two parameters the
/// `GenLayers`/noise pipeline blends per biome (§4.9).
#[derive(Debug, Clone, Copy)]
pub struct BiomeHeight {
    pub root_height: f32,
    pub variation: f32,
}

impl BiomeHeight {
    const fn attenuate(&self) -> Self {
        Self {
            root_height: self.root_height * 0.8,
            variation: self.variation * 0.6,
        }
    }
}

#[allow(missing_docs)]
pub mod heights {
    use super::BiomeHeight;

    pub const DEFAULT: BiomeHeight = BiomeHeight { root_height: 0.1, variation: 0.2 };
    pub const SHALLOW_WATERS: BiomeHeight = BiomeHeight { root_height: -0.5, variation: 0.0 };
    pub const OCEANS: BiomeHeight = BiomeHeight { root_height: -1.0, variation: 0.1 };
    pub const DEEP_OCEANS: BiomeHeight = BiomeHeight { root_height: -1.8, variation: 0.1 };
    pub const LOW_PLAINS: BiomeHeight = BiomeHeight { root_height: 0.125, variation: 0.05 };
    pub const MID_PLAINS: BiomeHeight = BiomeHeight { root_height: 0.2, variation: 0.2 };
    pub const LOW_HILLS: BiomeHeight = BiomeHeight { root_height: 0.45, variation: 0.3 };
    pub const HIGH_PLATEAUS: BiomeHeight = BiomeHeight { root_height: 1.5, variation: 0.025 };
    pub const MID_HILLS: BiomeHeight = BiomeHeight { root_height: 1.0, variation: 0.5 };
    pub const SHORES: BiomeHeight = BiomeHeight { root_height: 0.0, variation: 0.025 };
    pub const ROCKY_WATERS: BiomeHeight = BiomeHeight { root_height: 0.1, variation: 0.8 };
    pub const LOW_ISLANDS: BiomeHeight = BiomeHeight { root_height: 0.2, variation: 0.3 };
    pub const PARTIALLY_SUBMERGED: BiomeHeight = BiomeHeight { root_height: -0.2, variation: 0.1 };
}

/// Climate-driven snow/cold banding, used by the temperature-noise pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempCategory {
    Cold,
    Medium,
    Warm,
}

/// A biome definition.
#[derive(Debug, Clone, Copy)]
pub struct Biome {
    pub id: u8,
    pub name: &'static str,
    pub color: u32,
    pub top_block: u16,
    pub filler_block: u16,
    pub height: BiomeHeight,
    pub temperature: f32,
    pub rainfall: f32,
    pub enable_snow: bool,
    pub enable_rain: bool,
}

impl Biome {
    #[must_use]
    pub const fn can_spawn_lightning_bolt(&self) -> bool {
        !self.enable_snow && self.enable_rain
    }

    #[must_use]
    pub fn is_high_humidity(&self) -> bool {
        self.rainfall > 0.85
    }

    /// Altitude-cooled temperature above y=64, matching the classic
    /// linear falloff used before the per-column temperature noise pass.
    #[must_use]
    pub fn float_temperature_at(&self, y: i32) -> f32 {
        if y > 64 {
            let reduction = (y - 64) as f32 * 0.05 / 30.0;
            self.temperature - reduction
        } else {
            self.temperature
        }
    }

    #[must_use]
    pub fn temp_category(&self) -> TempCategory {
        if self.temperature < 0.2 {
            TempCategory::Cold
        } else if self.temperature < 1.0 {
            TempCategory::Medium
        } else {
            TempCategory::Warm
        }
    }
}

const GRASS: u16 = 2;
const DIRT: u16 = 3;
const STONE: u16 = 1;
const SAND: u16 = 12;
const MYCELIUM: u16 = 110;
const NETHERRACK: u16 = 87;
const END_STONE: u16 = 121;
const HARDENED_CLAY: u16 = 172;
const RED_SAND: u16 = 12;

macro_rules! biome {
    ($id:expr, $name:expr, $color:expr, $height:expr, $temp:expr, $rain:expr) => {
        biome!($id, $name, $color, $height, $temp, $rain, false, true, GRASS, DIRT)
    };
    ($id:expr, $name:expr, $color:expr, $height:expr, $temp:expr, $rain:expr, $snow:expr, $rains:expr) => {
        biome!($id, $name, $color, $height, $temp, $rain, $snow, $rains, GRASS, DIRT)
    };
    ($id:expr, $name:expr, $color:expr, $height:expr, $temp:expr, $rain:expr, $snow:expr, $rains:expr, $top:expr, $filler:expr) => {
        Biome {
            id: $id,
            name: $name,
            color: $color,
            top_block: $top,
            filler_block: $filler,
            height: $height,
            temperature: $temp,
            rainfall: $rain,
            enable_snow: $snow,
            enable_rain: $rains,
        }
    };
}

/// The 40 base biomes (ids 0-39), matching the classic client's
/// `BiomeGenBase` static registrations.
pub static BIOMES: &[Biome] = &[
    biome!(0, "Ocean", 112, heights::OCEANS, 0.5, 0.5),
    biome!(1, "Plains", 9_286_496, heights::DEFAULT, 0.8, 0.4),
    biome!(2, "Desert", 16_421_912, heights::LOW_PLAINS, 2.0, 0.0, false, false, SAND, SAND),
    biome!(3, "Extreme Hills", 0x60_60_60, heights::MID_HILLS, 0.2, 0.3),
    biome!(4, "Forest", 353_825, heights::DEFAULT, 0.7, 0.8),
    biome!(5, "Taiga", 747_097, heights::MID_PLAINS, 0.25, 0.8),
    biome!(6, "Swampland", 522_674, heights::PARTIALLY_SUBMERGED, 0.8, 0.9),
    biome!(7, "River", 255, heights::SHALLOW_WATERS, 0.5, 0.5),
    biome!(8, "Hell", 0xFF_00_00, heights::DEFAULT, 2.0, 0.0, false, false, NETHERRACK, NETHERRACK),
    biome!(9, "Sky", 0x80_80_FF, heights::DEFAULT, 0.5, 0.5, false, false, END_STONE, END_STONE),
    biome!(10, "FrozenOcean", 0x90_90_A0, heights::OCEANS, 0.0, 0.5, true, true),
    biome!(11, "FrozenRiver", 0xA0_A0_FF, heights::SHALLOW_WATERS, 0.0, 0.5, true, true),
    biome!(12, "Ice Plains", 0xFF_FF_FF, heights::LOW_PLAINS, 0.0, 0.5, true, true),
    biome!(13, "Ice Mountains", 0xA0_A0_A0, heights::LOW_HILLS, 0.0, 0.5, true, true),
    biome!(14, "MushroomIsland", 0xFF_00_FF, heights::LOW_ISLANDS, 0.9, 1.0, false, true, MYCELIUM, DIRT),
    biome!(15, "MushroomIslandShore", 0xA0_00_FF, heights::SHORES, 0.9, 1.0, false, true, MYCELIUM, DIRT),
    biome!(16, "Beach", 16_440_917, heights::SHORES, 0.8, 0.4, false, true, SAND, SAND),
    biome!(17, "DesertHills", 13_786_898, heights::LOW_HILLS, 2.0, 0.0, false, false, SAND, SAND),
    biome!(18, "ForestHills", 2_250_012, heights::LOW_HILLS, 0.7, 0.8),
    biome!(19, "TaigaHills", 1_456_435, heights::LOW_HILLS, 0.25, 0.8),
    biome!(20, "Extreme Hills Edge", 7_501_978, heights::MID_HILLS.attenuate(), 0.2, 0.3),
    biome!(21, "Jungle", 5_470_985, heights::DEFAULT, 0.95, 0.9),
    biome!(22, "JungleHills", 2_900_485, heights::LOW_HILLS, 0.95, 0.9),
    biome!(23, "JungleEdge", 6_458_135, heights::DEFAULT, 0.95, 0.8),
    biome!(24, "Deep Ocean", 48, heights::DEEP_OCEANS, 0.5, 0.5),
    biome!(25, "Stone Beach", 10_658_436, heights::ROCKY_WATERS, 0.2, 0.3, false, true, STONE, STONE),
    biome!(26, "Cold Beach", 16_445_632, heights::SHORES, 0.05, 0.3, true, true, SAND, SAND),
    biome!(27, "Birch Forest", 3_175_492, heights::DEFAULT, 0.6, 0.6),
    biome!(28, "Birch Forest Hills", 2_055_986, heights::LOW_HILLS, 0.6, 0.6),
    biome!(29, "Roofed Forest", 4_215_066, heights::DEFAULT, 0.7, 0.8),
    biome!(30, "Cold Taiga", 3_233_098, heights::MID_PLAINS, -0.5, 0.4, true, true),
    biome!(31, "Cold Taiga Hills", 2_375_478, heights::LOW_HILLS, -0.5, 0.4, true, true),
    biome!(32, "Mega Taiga", 5_858_897, heights::MID_PLAINS, 0.3, 0.8),
    biome!(33, "Mega Taiga Hills", 4_542_270, heights::LOW_HILLS, 0.3, 0.8),
    biome!(34, "Extreme Hills+", 0x50_70_50, heights::MID_HILLS, 0.2, 0.3),
    biome!(35, "Savanna", 12_431_967, heights::LOW_PLAINS, 1.2, 0.0, false, false),
    biome!(36, "Savanna Plateau", 10_984_804, heights::HIGH_PLATEAUS, 1.0, 0.0, false, false),
    biome!(37, "Mesa", 14_238_997, heights::DEFAULT, 2.0, 0.0, false, false, RED_SAND, HARDENED_CLAY),
    biome!(38, "Mesa Plateau F", 11_573_093, heights::HIGH_PLATEAUS, 2.0, 0.0, false, false, RED_SAND, HARDENED_CLAY),
    biome!(39, "Mesa Plateau", 13_274_213, heights::HIGH_PLATEAUS, 2.0, 0.0, false, false, RED_SAND, HARDENED_CLAY),
];

/// The exploration (natural world generation) biome set: excludes Hell, Sky,
/// FrozenOcean, and Extreme Hills Edge, matching the classic client's list.
pub static EXPLORATION_BIOME_IDS: &[u8] = &[
    0, 1, 2, 3, 4, 5, 6, 7, 11, 12, 13, 14, 15, 16, 17, 18, 19, 21, 22, 23, 24, 25, 26, 27, 28, 29,
    30, 31, 32, 33, 34, 35, 36, 37, 38, 39,
];

/// Looks up a biome by id; out-of-range or unregistered ids fall back to
/// Ocean (id 0), matching the classic client's default.
#[must_use]
pub fn get(id: u8) -> &'static Biome {
    BIOMES.iter().find(|b| b.id == id).unwrap_or(&BIOMES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_biome_id_falls_back_to_ocean() {
        assert_eq!(get(200).name, "Ocean");
    }

    #[test]
    fn hell_is_excluded_from_exploration_set() {
        assert!(!EXPLORATION_BIOME_IDS.contains(&8));
        assert!(!EXPLORATION_BIOME_IDS.contains(&9));
    }

    #[test]
    fn desert_has_no_precipitation() {
        let desert = get(2);
        assert!(!desert.enable_rain);
        assert!(!desert.can_spawn_lightning_bolt());
    }
}
