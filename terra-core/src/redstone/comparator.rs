//! Comparators: compare/subtract signal logic (§4.8 "Comparator").

/// Comparator output given the rear signal `r` and the stronger of the two
/// side signals `s` (§4.8 "Compare: output = r if r >= s, else 0. Subtract:
/// output = max(0, r - s)").
#[must_use]
pub fn output(rear: u8, strongest_side: u8, subtract_mode: bool) -> u8 {
    if subtract_mode {
        rear.saturating_sub(strongest_side)
    } else if rear >= strongest_side {
        rear
    } else {
        0
    }
}

/// Reads a container's "fullness" as redstone power: `ceil(15 *
/// used_slots / max) + has_any` (§4.8).
#[must_use]
pub fn container_fullness(used_slots: u32, max_slots: u32) -> u8 {
    if max_slots == 0 {
        return 0;
    }
    let scaled = (15 * used_slots).div_ceil(max_slots);
    let has_any = u32::from(used_slots > 0);
    u8::try_from((scaled + has_any).min(15)).unwrap_or(15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_mode_passes_through_when_rear_dominates() {
        assert_eq!(output(10, 5, false), 10);
        assert_eq!(output(5, 10, false), 0);
        assert_eq!(output(7, 7, false), 7);
    }

    #[test]
    fn subtract_mode_clamps_at_zero() {
        assert_eq!(output(10, 4, true), 6);
        assert_eq!(output(4, 10, true), 0);
    }

    #[test]
    fn container_fullness_rounds_up_and_adds_has_any() {
        assert_eq!(container_fullness(0, 27), 0);
        assert_eq!(container_fullness(1, 27), 1);
        assert_eq!(container_fullness(27, 27), 15);
    }
}
