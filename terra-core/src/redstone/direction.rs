//! The six block faces (§4.8), matching the original's `RedstoneFace`
//! ordering so the facing-nibble math lines up with stored metadata.

use terra_utils::BlockPos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Self; 6] = [
        Self::Down,
        Self::Up,
        Self::North,
        Self::South,
        Self::West,
        Self::East,
    ];

    /// The four horizontal faces, in repeater/comparator facing-nibble
    /// order (`0=South, 1=West, 2=North, 3=East`).
    pub const HORIZONTAL: [Self; 4] = [Self::South, Self::West, Self::North, Self::East];

    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Down => (0, -1, 0),
            Self::Up => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Decodes a repeater/comparator facing nibble (`0=S,1=W,2=N,3=E`,
    /// §4.8 "Metadata encodes ... a facing").
    #[must_use]
    pub const fn from_facing_nibble(nibble: u8) -> Self {
        match nibble & 0x3 {
            0 => Self::South,
            1 => Self::West,
            2 => Self::North,
            _ => Self::East,
        }
    }

    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Self::Up | Self::Down)
    }

    /// Whether `self` and `other` lie on perpendicular horizontal axes
    /// (used by repeater locking, §4.8 "an adjacent repeater facing
    /// perpendicularly into it").
    #[must_use]
    pub const fn is_perpendicular_to(self, other: Self) -> bool {
        let self_on_x = matches!(self, Self::West | Self::East);
        let other_on_x = matches!(other, Self::West | Self::East);
        self_on_x != other_on_x
    }

    #[must_use]
    pub const fn apply(self, pos: BlockPos) -> BlockPos {
        let (dx, dy, dz) = self.offset();
        pos.offset(dx, dy, dz)
    }
}
