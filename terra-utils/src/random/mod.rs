//! Deterministic random number generation (§4.9 "Deterministic RNG").
mod legacy;

pub use legacy::{seed_for_position, LegacyRandom};
