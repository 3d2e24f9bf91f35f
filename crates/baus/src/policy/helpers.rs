//! Pure helper functions for policy calculations.

/// Affordable units in a new building of `units` at the given share.
///
/// Rounds to nearest, guarantees at least one unit when the policy is active
/// and the building has units, and never exceeds the building.
pub fn affordable_units(units: u32, share: f64) -> u32 {
    if share <= 0.0 || units == 0 {
        return 0;
    }
    let raw = (units as f64 * share).round() as u32;
    raw.max(1).min(units)
}

/// Multiplier on residential revenue once affordable units earn discounted rent.
pub fn residential_revenue_factor(share: f64, discount: f64) -> f64 {
    (1.0 - share.clamp(0.0, 1.0) * discount.clamp(0.0, 1.0)).max(0.0)
}
