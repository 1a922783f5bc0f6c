/// Total drop below the calibrated baseline, clamped at zero. Noise can
/// push readings above the baseline; that reads as no drop at all.
pub fn strength(baseline_total: u16, sample1: u16, sample2: u16) -> u16 {
    let drop = baseline_total as i32 - (sample1 as i32 + sample2 as i32);
    drop.clamp(0, u16::MAX as i32) as u16
}

/// Millivolts of drop per lit LED: the baseline spread over 16 LEDs.
pub fn led_unit(baseline_total: u16) -> u16 {
    (baseline_total / 16).max(1)
}

/// Meter bitmask, filled from the top bit down: one LED per `unit` of drop.
pub fn intensity(baseline_total: u16, sample1: u16, sample2: u16, unit: u16) -> u16 {
    let drop = strength(baseline_total, sample1, sample2);
    if drop == 0 {
        return 0;
    }
    let lit = (drop / unit.max(1)).min(16) as u32;
    !0xFFFFu16.checked_shr(lit).unwrap_or(0)
}
