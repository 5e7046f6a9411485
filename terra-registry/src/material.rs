//! Block material classification: the physical-property axis that sits
//! underneath individual block definitions (solidity, light blocking,
//! flammability, piston mobility).

/// Coarse material family, mirroring the vanilla `Material` subclasses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Solid,
    Liquid,
    Logic,
    Transparent,
    Portal,
}

/// A block's push behavior under a piston (§4.8 `can_push`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mobility {
    Pushable,
    NoPush,
    Immovable,
}

/// Physical material properties shared by a family of blocks.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub name: &'static str,
    pub kind: MaterialKind,
    pub can_burn: bool,
    pub replaceable: bool,
    pub is_translucent: bool,
    pub requires_no_tool: bool,
    pub mobility: Mobility,
}

impl Material {
    #[must_use]
    pub const fn is_liquid(&self) -> bool {
        matches!(self.kind, MaterialKind::Liquid)
    }

    #[must_use]
    pub const fn is_solid(&self) -> bool {
        matches!(self.kind, MaterialKind::Solid)
    }

    #[must_use]
    pub const fn blocks_light(&self) -> bool {
        matches!(self.kind, MaterialKind::Solid | MaterialKind::Liquid)
    }

    #[must_use]
    pub const fn blocks_movement(&self) -> bool {
        matches!(self.kind, MaterialKind::Solid)
    }

    #[must_use]
    pub const fn is_opaque(&self) -> bool {
        !self.is_translucent && self.blocks_movement()
    }
}

macro_rules! material {
    ($name:ident, $display:literal, $kind:expr) => {
        material!(
            $name,
            $display,
            $kind,
            can_burn: false,
            replaceable: false,
            is_translucent: false,
            requires_no_tool: false,
            mobility: Mobility::Pushable
        );
    };
    ($name:ident, $display:literal, $kind:expr, can_burn: $burn:expr, replaceable: $replaceable:expr, is_translucent: $translucent:expr, requires_no_tool: $no_tool:expr, mobility: $mobility:expr) => {
        pub const $name: Material = Material {
            name: $display,
            kind: $kind,
            can_burn: $burn,
            replaceable: $replaceable,
            is_translucent: $translucent,
            requires_no_tool: $no_tool,
            mobility: $mobility,
        };
    };
}

#[allow(missing_docs)]
pub mod materials {
    use super::{Material, MaterialKind, Mobility};

    material!(AIR, "air", MaterialKind::Transparent);
    material!(
        GRASS,
        "grass",
        MaterialKind::Solid,
        can_burn: true,
        replaceable: false,
        is_translucent: false,
        requires_no_tool: false,
        mobility: Mobility::Pushable
    );
    material!(GROUND, "ground", MaterialKind::Solid);
    material!(
        WOOD,
        "wood",
        MaterialKind::Solid,
        can_burn: true,
        replaceable: false,
        is_translucent: false,
        requires_no_tool: false,
        mobility: Mobility::Pushable
    );
    material!(ROCK, "rock", MaterialKind::Solid);
    material!(
        WATER,
        "water",
        MaterialKind::Liquid,
        can_burn: false,
        replaceable: true,
        is_translucent: true,
        requires_no_tool: true,
        mobility: Mobility::NoPush
    );
    material!(
        LAVA,
        "lava",
        MaterialKind::Liquid,
        can_burn: false,
        replaceable: true,
        is_translucent: false,
        requires_no_tool: true,
        mobility: Mobility::NoPush
    );
    material!(
        LEAVES,
        "leaves",
        MaterialKind::Solid,
        can_burn: true,
        replaceable: false,
        is_translucent: true,
        requires_no_tool: false,
        mobility: Mobility::Pushable
    );
    material!(
        PLANTS,
        "plants",
        MaterialKind::Logic,
        can_burn: true,
        replaceable: true,
        is_translucent: false,
        requires_no_tool: true,
        mobility: Mobility::Pushable
    );
    material!(
        SAND,
        "sand",
        MaterialKind::Solid,
        can_burn: false,
        replaceable: false,
        is_translucent: false,
        requires_no_tool: false,
        mobility: Mobility::Pushable
    );
    material!(
        CIRCUITS,
        "circuits",
        MaterialKind::Logic,
        can_burn: false,
        replaceable: true,
        is_translucent: false,
        requires_no_tool: true,
        mobility: Mobility::Pushable
    );
    material!(
        GLASS,
        "glass",
        MaterialKind::Solid,
        can_burn: false,
        replaceable: false,
        is_translucent: true,
        requires_no_tool: false,
        mobility: Mobility::Pushable
    );
    material!(
        TNT,
        "tnt",
        MaterialKind::Solid,
        can_burn: true,
        replaceable: false,
        is_translucent: true,
        requires_no_tool: false,
        mobility: Mobility::Pushable
    );
    material!(
        ICE,
        "ice",
        MaterialKind::Solid,
        can_burn: false,
        replaceable: false,
        is_translucent: true,
        requires_no_tool: false,
        mobility: Mobility::Pushable
    );
    material!(
        PORTAL,
        "portal",
        MaterialKind::Portal,
        can_burn: false,
        replaceable: false,
        is_translucent: true,
        requires_no_tool: true,
        mobility: Mobility::Immovable
    );
    material!(
        WEB,
        "web",
        MaterialKind::Solid,
        can_burn: true,
        replaceable: false,
        is_translucent: true,
        requires_no_tool: true,
        mobility: Mobility::Pushable
    );
    material!(
        PISTON,
        "piston",
        MaterialKind::Solid,
        can_burn: false,
        replaceable: false,
        is_translucent: true,
        requires_no_tool: false,
        mobility: Mobility::Immovable
    );
    material!(
        ANVIL,
        "anvil",
        MaterialKind::Solid,
        can_burn: false,
        replaceable: false,
        is_translucent: true,
        requires_no_tool: false,
        mobility: Mobility::NoPush
    );
}
